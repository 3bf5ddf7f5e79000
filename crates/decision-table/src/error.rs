//! Decision table errors

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TableError {
    #[error("Invalid {table} table: {reason}")]
    InvalidTable { table: String, reason: String },
}

impl TableError {
    pub(crate) fn invalid(table: &str, reason: impl Into<String>) -> Self {
        TableError::InvalidTable {
            table: table.to_string(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, TableError>;
