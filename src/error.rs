use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Which side of a comparison an input or failure belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Expected,
    Actual,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Expected => f.write_str("expected"),
            Side::Actual => f.write_str("actual"),
        }
    }
}

/// Main error type for golden-diff operations
#[derive(Error, Debug)]
pub enum DiffError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Failed to read {side} input {}: {source}", .path.display())]
    Read {
        side: Side,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read {side} stream: {source}")]
    Stream {
        side: Side,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to hash directory {}: {source}", .path.display())]
    Walk {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to dump {side} {kind}: {message}")]
    Wire {
        side: Side,
        kind: &'static str,
        message: String,
    },

    #[error("Unsupported {side} input for {mode} comparison: {variant}")]
    Unsupported {
        side: Side,
        mode: &'static str,
        variant: &'static str,
    },

    #[error("Update failed: {}: {source}", .path.display())]
    Update {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, DiffError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_side() {
        let err = DiffError::Wire {
            side: Side::Expected,
            kind: "response",
            message: "unexpected end of headers".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Failed to dump expected response: unexpected end of headers"
        );

        let err = DiffError::Unsupported {
            side: Side::Actual,
            mode: "http",
            variant: "directory",
        };
        assert_eq!(
            err.to_string(),
            "Unsupported actual input for http comparison: directory"
        );
    }

    #[test]
    fn test_update_error_is_distinct() {
        let err = DiffError::Update {
            path: PathBuf::from("/nope/create.txt"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file or directory"),
        };
        assert_eq!(
            err.to_string(),
            "Update failed: /nope/create.txt: no such file or directory"
        );
    }
}
