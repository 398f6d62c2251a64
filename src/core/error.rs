use std::path::PathBuf;

use thiserror::Error;

use crate::core::records::TableKind;

/// Error type definitions
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[source] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[source] serde_json::Error),

    /// No candidate location held the table
    #[error("Missing input table '{table}': none of {} candidate paths exist", searched.len())]
    MissingInput {
        table: TableKind,
        searched: Vec<PathBuf>,
    },

    #[error("Table '{table}' is missing required column '{column}'")]
    MissingColumn { table: TableKind, column: String },

    /// A row could not be parsed after quote cleaning
    #[error("Malformed row in table '{table}' at line {line}: {message}")]
    MalformedRow {
        table: TableKind,
        line: u64,
        message: String,
    },

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    ConfigurationError(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json(err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

impl Error {
    /// Name of the table the error refers to, if any
    pub fn table(&self) -> Option<TableKind> {
        match self {
            Error::MissingInput { table, .. }
            | Error::MissingColumn { table, .. }
            | Error::MalformedRow { table, .. } => Some(*table),
            _ => None,
        }
    }
}
