//! Error taxonomy for scaffolding.

use std::path::PathBuf;

use thiserror::Error;

/// Terminal scaffolding failures. `Skipped` outcomes are not errors.
#[derive(Debug, Error)]
pub enum ScaffoldError {
    /// The configuration file to scan does not exist.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// Reading the source or writing the destination failed.
    #[error("Failed to {action} {}", path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A placeholder family was configured with an unusable pattern.
    #[error("Invalid placeholder pattern for family '{family}': {reason}")]
    InvalidPattern { family: String, reason: String },
}

impl ScaffoldError {
    pub(crate) fn io(action: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ScaffoldError::Io {
            action,
            path: path.into(),
            source,
        }
    }
}
