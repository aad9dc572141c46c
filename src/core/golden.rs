use tracing::{debug, info, warn};

use crate::error::{DiffError, Result};
use super::file::FileRef;
use super::outcome::DiffResult;

/// What the updater did with the fixture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateStatus {
    /// Update mode is off; the fixture was not touched
    Disabled,
    /// The fixture already matched, or the comparison failed; not touched
    Unchanged,
    /// The fixture now holds the actual text
    Written,
}

/// Regenerates fixture files from actual output
#[derive(Debug, Clone, Copy, Default)]
pub struct GoldenFileUpdater {
    enabled: bool,
}

impl GoldenFileUpdater {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Rewrite `fixture` with `actual` if updates are enabled and the last
    /// comparison reported a difference.
    ///
    /// An equal comparison never opens the fixture for writing.
    pub fn update(&self, fixture: &FileRef, actual: &str, last: &DiffResult) -> Result<UpdateStatus> {
        if !self.enabled {
            return Ok(UpdateStatus::Disabled);
        }

        match last {
            DiffResult::Equal => {
                debug!(path = %fixture.path().display(), "Fixture matches, leaving it alone");
                Ok(UpdateStatus::Unchanged)
            }
            DiffResult::Failed(error) => {
                warn!(path = %fixture.path().display(), "Not updating fixture after failed comparison: {}", error);
                Ok(UpdateStatus::Unchanged)
            }
            DiffResult::Different(_) => {
                fixture
                    .write_truncate(actual.as_bytes())
                    .map_err(|source| DiffError::Update {
                        path: fixture.path().to_path_buf(),
                        source,
                    })?;
                info!(path = %fixture.path().display(), bytes = actual.len(), "Updated golden file");
                Ok(UpdateStatus::Written)
            }
        }
    }
}
