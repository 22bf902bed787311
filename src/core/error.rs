//! Error types for the session manager
//!
//! This module defines all error types that can occur while configuring a
//! session, talking to the database, or loading connection settings.

/// Result type alias for session operations
pub type Result<T> = std::result::Result<T, DatabaseError>;

/// Error types for session operations
#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    /// Missing or invalid connection parameters
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// `open()` was called before `configure()`
    #[error("Session is not configured")]
    NotConfigured,

    /// Connection error (driver or network failure, or no open connection)
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// No registered driver accepts the endpoint
    #[error("Unsupported database endpoint: {0}")]
    UnsupportedDatabase(String),

    /// Query execution error raised by the session itself
    #[error("Query execution error: {0}")]
    QueryError(String),

    /// Type conversion error
    #[error("Type mismatch: expected {expected}, got {actual}")]
    TypeMismatch { expected: String, actual: String },

    /// Transaction error
    #[error("Transaction error: {0}")]
    TransactionError(String),

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Settings file could not be parsed
    #[error("Settings parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// SQLite error
    #[cfg(feature = "sqlite")]
    #[error("SQLite error: {0}")]
    SqliteError(#[from] rusqlite::Error),
}

impl DatabaseError {
    /// Create a new configuration error
    pub fn configuration<S: Into<String>>(msg: S) -> Self {
        DatabaseError::Configuration(msg.into())
    }

    /// Create a new connection error
    pub fn connection<S: Into<String>>(msg: S) -> Self {
        DatabaseError::ConnectionError(msg.into())
    }

    /// Create a new unsupported-endpoint error
    pub fn unsupported<S: Into<String>>(url: S) -> Self {
        DatabaseError::UnsupportedDatabase(url.into())
    }

    /// Create a new query error
    pub fn query<S: Into<String>>(msg: S) -> Self {
        DatabaseError::QueryError(msg.into())
    }

    /// Create a new type mismatch error
    pub fn type_mismatch(expected: &str, actual: &str) -> Self {
        DatabaseError::TypeMismatch {
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }

    /// Create a new transaction error
    pub fn transaction<S: Into<String>>(msg: S) -> Self {
        DatabaseError::TransactionError(msg.into())
    }

    /// True when the error was raised by the database while running a statement
    pub fn is_statement_error(&self) -> bool {
        match self {
            DatabaseError::QueryError(_) | DatabaseError::TypeMismatch { .. } => true,
            #[cfg(feature = "sqlite")]
            DatabaseError::SqliteError(_) => true,
            _ => false,
        }
    }
}
