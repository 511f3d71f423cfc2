//! Error types shared by every sqlmenu tool.
//!
//! A menu loop distinguishes two kinds of failure: fatal ones (the console
//! is gone) end the session, everything else is printed and the loop
//! continues.

use thiserror::Error;

use crate::validate::ValidationError;

/// Errors raised by backends, console I/O, and input validation.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Console or filesystem I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Standard input reached end of file.
    #[error("input closed")]
    InputClosed,

    /// User input rejected before any SQL was issued.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Failure reported by the database driver.
    #[error("database error: {0}")]
    Database(String),

    /// A result column could not be read as the expected type.
    #[error("conversion error: {0}")]
    Conversion(String),

    /// An operation needs a connection and none is open.
    #[error("not connected to a database")]
    NotConnected,
}

impl CoreError {
    /// Wraps any driver error into [`CoreError::Database`].
    pub fn database(err: impl std::fmt::Display) -> Self {
        Self::Database(err.to_string())
    }

    /// Returns `true` if the interactive session cannot continue.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Io(_) | Self::InputClosed)
    }
}

/// Convenience alias for results with [`CoreError`].
pub type Result<T> = std::result::Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_console_failures_are_fatal() {
        assert!(CoreError::InputClosed.is_fatal());
        assert!(CoreError::Io(std::io::Error::other("broken pipe")).is_fatal());
        assert!(!CoreError::database("no such table: t").is_fatal());
        assert!(!CoreError::NotConnected.is_fatal());
    }

    #[test]
    fn test_database_error_message() {
        let err = CoreError::database("UNIQUE constraint failed: users.email");
        assert_eq!(
            err.to_string(),
            "database error: UNIQUE constraint failed: users.email"
        );
    }
}
