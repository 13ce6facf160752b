//! Boundary errors.
//!
//! Resolution itself never fails: a token that cannot be found passes through
//! as a literal. The errors here are raised only when caller-supplied input
//! (an sx description or a theme document) has the wrong shape.

use thiserror::Error;

/// Error returned when sx descriptions or themes cannot be loaded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SxError {
    /// An sx description has a value of the wrong shape.
    #[error("invalid sx description at '{path}': {reason}")]
    InvalidSx { path: String, reason: String },

    /// A theme document is structurally invalid.
    #[error("invalid theme: {reason}")]
    InvalidTheme { reason: String },

    /// The input could not be parsed as JSON or YAML.
    #[error("failed to parse {format}: {message}")]
    Parse {
        format: &'static str,
        message: String,
    },
}

impl SxError {
    pub(crate) fn invalid_sx(path: impl Into<String>, reason: impl Into<String>) -> Self {
        SxError::InvalidSx {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_theme(reason: impl Into<String>) -> Self {
        SxError::InvalidTheme {
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for SxError {
    fn from(err: serde_json::Error) -> Self {
        SxError::Parse {
            format: "json",
            message: err.to_string(),
        }
    }
}

impl From<serde_yaml::Error> for SxError {
    fn from(err: serde_yaml::Error) -> Self {
        SxError::Parse {
            format: "yaml",
            message: err.to_string(),
        }
    }
}
