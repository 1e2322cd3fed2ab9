/// Error types for trackdeck
///
/// This module defines all possible errors that can occur in the application.
/// Uses thiserror for ergonomic error handling.

use thiserror::Error;

/// Main error type for trackdeck operations
#[derive(Error, Debug)]
pub enum TrackError {
    /// Database-related errors
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O errors (file operations, etc.)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Entity lookup by id came up empty
    #[error("{0} not found: {1}")]
    NotFound(&'static str, String),

    /// Invalid user input (empty titles, bad dates, unknown statuses)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Timestamp that does not parse as RFC 3339
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Exported data file is from a newer schema than this build understands
    #[error("Data file schema version {0} is newer than supported version {1}")]
    SchemaTooNew(u32, u32),
}

/// Result type alias for trackdeck operations
pub type Result<T> = std::result::Result<T, TrackError>;

/// Convert TrackError to a user-friendly error message
impl TrackError {
    pub fn user_message(&self) -> String {
        match self {
            TrackError::Database(e) => {
                format!("Database error occurred. Please try again. Details: {}", e)
            }
            TrackError::Io(e) => {
                format!("File system error. Check permissions. Details: {}", e)
            }
            TrackError::NotFound(entity, id) => {
                format!("{} '{}' not found", entity, id)
            }
            TrackError::InvalidInput(reason) => {
                format!("Invalid input: {}", reason)
            }
            TrackError::InvalidDate(value) => {
                format!("'{}' is not a valid RFC 3339 date", value)
            }
            TrackError::Config(msg) => {
                format!("Configuration issue: {}", msg)
            }
            TrackError::Serialization(e) => {
                format!("Data format error: {}", e)
            }
            TrackError::SchemaTooNew(found, supported) => {
                format!(
                    "Data file was written by a newer version (schema v{}, supported up to v{})",
                    found, supported
                )
            }
        }
    }
}
