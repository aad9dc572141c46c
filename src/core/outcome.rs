use std::fmt;

use crate::error::DiffError;

/// Outcome of a single comparison
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiffResult {
    /// Inputs are considered identical
    Equal,

    /// Inputs differ; holds the rendered unified diff
    Different(String),

    /// The comparison could not be completed
    Failed(String),
}

impl DiffResult {
    pub fn is_equal(&self) -> bool {
        matches!(self, DiffResult::Equal)
    }

    pub fn is_different(&self) -> bool {
        matches!(self, DiffResult::Different(_))
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, DiffResult::Failed(_))
    }

    /// The rendered diff, if the inputs differed
    pub fn diff(&self) -> Option<&str> {
        match self {
            DiffResult::Different(diff) => Some(diff),
            _ => None,
        }
    }

    /// The failure cause, if the comparison failed
    pub fn error(&self) -> Option<&str> {
        match self {
            DiffResult::Failed(error) => Some(error),
            _ => None,
        }
    }

    /// Panic with the diff or failure cause unless the inputs were equal
    #[track_caller]
    pub fn assert_equal(&self) {
        match self {
            DiffResult::Equal => {}
            DiffResult::Different(diff) => panic!("inputs differ:\n{}", diff),
            DiffResult::Failed(error) => panic!("comparison failed: {}", error),
        }
    }
}

impl fmt::Display for DiffResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiffResult::Equal => Ok(()),
            DiffResult::Different(diff) => f.write_str(diff),
            DiffResult::Failed(error) => f.write_str(error),
        }
    }
}

impl From<DiffError> for DiffResult {
    fn from(err: DiffError) -> Self {
        DiffResult::Failed(err.to_string())
    }
}
