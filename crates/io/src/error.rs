use std::fmt;

use retable_engine::error::EngineError;

/// Errors from the initial-table producers and exporters.
#[derive(Debug)]
pub enum LoadError {
    /// File read/write error.
    Io(String),
    /// File content could not be parsed into a table.
    Parse(String),
    /// Extension does not map to a supported format.
    UnsupportedFormat(String),
    /// SQLite open/query error.
    Database(String),
    /// Parsed data violated the table invariant.
    Table(EngineError),
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(msg) => write!(f, "IO error: {msg}"),
            Self::Parse(msg) => write!(f, "parse error: {msg}"),
            Self::UnsupportedFormat(ext) => write!(f, "unsupported file format: '{ext}'"),
            Self::Database(msg) => write!(f, "database error: {msg}"),
            Self::Table(err) => write!(f, "invalid table: {err}"),
        }
    }
}

impl std::error::Error for LoadError {}

impl From<EngineError> for LoadError {
    fn from(err: EngineError) -> Self {
        Self::Table(err)
    }
}
