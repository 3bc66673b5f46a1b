//! Error types for tmux-model.

use thiserror::Error;

use crate::EntityKind;

/// Main error type for tmux-model operations.
#[derive(Debug, Error)]
pub enum Error {
    /// tmux exited with a failure status
    #[error("tmux {command} failed: {stderr}")]
    Execution {
        /// Command line passed to tmux (arguments joined by spaces)
        command: String,
        /// Diagnostic text captured from stderr
        stderr: String,
    },

    /// tmux rejected an option key
    #[error("Invalid option '{key}': {message}")]
    InvalidOption {
        /// Option key that was rejected
        key: String,
        /// Diagnostic text from tmux
        message: String,
    },

    /// The entity no longer exists in tmux
    #[error("Stale {kind}: {id} no longer exists")]
    StaleEntity {
        /// Entity kind
        kind: EntityKind,
        /// Stable identifier of the vanished entity
        id: String,
    },

    /// An assumption about tmux state did not hold
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    /// Malformed record in tmux output
    #[error("Parse error: {0}")]
    Parse(String),

    /// Name does not belong to the attribute schema
    #[error("Unknown field: {0}")]
    UnknownField(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Whether this is an [`Error::InvalidOption`].
    pub fn is_invalid_option(&self) -> bool {
        matches!(self, Error::InvalidOption { .. })
    }

    /// Whether this is an [`Error::StaleEntity`].
    pub fn is_stale(&self) -> bool {
        matches!(self, Error::StaleEntity { .. })
    }

    /// Diagnostic text of an execution failure.
    pub fn stderr(&self) -> Option<&str> {
        match self {
            Error::Execution { stderr, .. } => Some(stderr),
            _ => None,
        }
    }
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;
