//! Error types for the notes sync engine.
//!
//! A `SyncError` never escapes `SyncEngine`: the engine renders it with
//! `to_string()` into the single error slot of the `ErrorReporter`, so the
//! `Display` output of each variant is the user-facing message.

use std::fmt;

use thiserror::Error;

/// Result type alias for remote note operations
pub type SyncResult<T> = Result<T, SyncError>;

/// The remote call an error came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    List,
    Create,
    Update,
    Delete,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::List => "list notes",
            Operation::Create => "create note",
            Operation::Update => "update note",
            Operation::Delete => "delete note",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug)]
pub enum SyncError {
    /// The request never completed, or its body could not be read.
    #[error("{op} failed: {message}")]
    Transport { op: Operation, message: String },

    /// The server answered with a non-2xx status.
    #[error("{op} failed with status {status}")]
    Rejected { op: Operation, status: u16 },

    /// The note only exists locally, so there is nothing to send yet.
    #[error("{op} failed: note has not been created yet")]
    Unconfirmed { op: Operation },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl SyncError {
    pub fn transport(op: Operation, message: impl fmt::Display) -> Self {
        SyncError::Transport {
            op,
            message: message.to_string(),
        }
    }

    pub fn rejected(op: Operation, status: u16) -> Self {
        SyncError::Rejected { op, status }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejected_message_names_operation_and_status() {
        let err = SyncError::rejected(Operation::Update, 500);
        assert_eq!(err.to_string(), "update note failed with status 500");
    }

    #[test]
    fn test_transport_message() {
        let err = SyncError::transport(Operation::List, "connection refused");
        assert_eq!(err.to_string(), "list notes failed: connection refused");
        assert!(matches!(err, SyncError::Transport { op: Operation::List, .. }));
    }

    #[test]
    fn test_unconfirmed_message() {
        let err = SyncError::Unconfirmed { op: Operation::Delete };
        assert_eq!(err.to_string(), "delete note failed: note has not been created yet");
    }
}
