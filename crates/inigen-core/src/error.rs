use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by generated configuration types at runtime.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("File cannot be opened: {}", path.display())]
    FileOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("File cannot be opened for reading: {}", path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("File cannot be opened for writing: {}", path.display())]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("No backing file has been loaded")]
    NoBackingFile,

    #[error("{0} does not exist")]
    MissingField(String),

    #[error("{field} cannot be parsed from {raw:?}: {message}")]
    Parse {
        field: String,
        raw: String,
        message: String,
    },

    /// One line per failing field, in schema order.
    #[error("{0}")]
    Validation(String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;
