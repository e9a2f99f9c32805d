//! Repository errors and row decoding helpers

use pm_core::error::PmError;

/// Error type for repository operations
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("Entity not found: {0}")]
    NotFound(&'static str),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Invalid value {value:?} in column {column}")]
    InvalidData { column: &'static str, value: String },
}

/// Result type for repository operations
pub type RepositoryResult<T> = Result<T, RepositoryError>;

impl From<RepositoryError> for PmError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound(entity) => PmError::NotFound {
                entity,
                field: "id",
                value: String::new(),
            },
            RepositoryError::Conflict(message) => PmError::Conflict { message },
            other => PmError::Database(other.to_string()),
        }
    }
}

/// Decode a text column into one of the model enums
pub(crate) fn decode<T>(
    column: &'static str,
    value: &str,
    parse: fn(&str) -> Option<T>,
) -> RepositoryResult<T> {
    parse(value).ok_or_else(|| RepositoryError::InvalidData {
        column,
        value: value.to_string(),
    })
}

/// Treat "no row affected" as not found
pub(crate) fn expect_affected(rows: u64, entity: &'static str) -> RepositoryResult<()> {
    if rows == 0 {
        Err(RepositoryError::NotFound(entity))
    } else {
        Ok(())
    }
}
