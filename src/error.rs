//! Error types for the SQL sandbox.
//!
//! Defines the main error enum used throughout the application.

use thiserror::Error;

/// Main error type for sandbox operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SandboxError {
    /// Rejected input (empty or whitespace-only statements).
    #[error("Input error: {0}")]
    Input(String),

    /// Errors raised by the backing store (syntax errors, missing tables, etc.)
    #[error("Store error: {0}")]
    Store(String),

    /// Configuration errors (invalid config file, unreadable seed file, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// A submission was attempted while another one is still running.
    #[error("Busy: {0}")]
    Busy(String),

    /// Internal application errors (unexpected states, bugs, etc.)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl SandboxError {
    /// Creates an input error with the given message.
    pub fn input(msg: impl Into<String>) -> Self {
        Self::Input(msg.into())
    }

    /// Creates a store error with the given message.
    pub fn store(msg: impl Into<String>) -> Self {
        Self::Store(msg.into())
    }

    /// Creates a configuration error with the given message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Creates a busy error with the given message.
    pub fn busy(msg: impl Into<String>) -> Self {
        Self::Busy(msg.into())
    }

    /// Creates an internal error with the given message.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Returns the error category as a string for display purposes.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Input(_) => "Input Error",
            Self::Store(_) => "Store Error",
            Self::Config(_) => "Configuration Error",
            Self::Busy(_) => "Busy",
            Self::Internal(_) => "Internal Error",
        }
    }

    /// Returns the bare message without the category prefix.
    pub fn message(&self) -> &str {
        match self {
            Self::Input(msg)
            | Self::Store(msg)
            | Self::Config(msg)
            | Self::Busy(msg)
            | Self::Internal(msg) => msg,
        }
    }
}

impl From<sqlx::Error> for SandboxError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db_err) => Self::Store(db_err.message().to_string()),
            other => Self::Store(other.to_string()),
        }
    }
}

/// Result type alias using SandboxError.
pub type Result<T> = std::result::Result<T, SandboxError>;
