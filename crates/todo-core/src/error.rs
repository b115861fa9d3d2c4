use std::path::PathBuf;
use thiserror::Error;

use crate::models::TodoId;

/// All errors produced by the todo crates.
#[derive(Error, Debug)]
pub enum TodoError {
    /// Todo text was empty after trimming.
    #[error("Todo text must not be empty")]
    EmptyText,

    /// Todo text exceeded the maximum length.
    #[error("Todo text must be at most {max} characters (got {len})")]
    TextTooLong { len: usize, max: usize },

    /// No todo with the given id exists in the list.
    #[error("Todo not found: {0}")]
    NotFound(TodoId),

    /// A file could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A file could not be written to disk.
    #[error("Failed to write file {path}: {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A persisted todo file exists but does not hold a todo list.
    #[error("Corrupt todo file {path}: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A JSON document could not be parsed or produced.
    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Every identifier up to `u64::MAX` is taken.
    #[error("No todo ids left")]
    IdsExhausted,
}

/// Convenience alias used throughout the todo crates.
pub type Result<T> = std::result::Result<T, TodoError>;
