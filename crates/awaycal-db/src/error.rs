//! Error types for the database layer.

use thiserror::Error;

/// Result type alias for database operations.
pub type DbResult<T> = Result<T, DbError>;

/// Database error types.
#[derive(Debug, Error)]
pub enum DbError {
    /// Connection or query failure reported by the driver
    #[error("Database error: {0}")]
    Mysql(#[from] mysql::Error),

    /// A query result lacks an expected column
    #[error("Column '{column}' missing from {query} result")]
    MissingColumn {
        query: &'static str,
        column: &'static str,
    },

    /// A column value could not be converted
    #[error("Cannot decode column '{column}'")]
    Decode {
        column: &'static str,
        #[source]
        source: mysql::FromValueError,
    },
}

impl DbError {
    pub fn missing_column(query: &'static str, column: &'static str) -> Self {
        Self::MissingColumn { query, column }
    }
}
