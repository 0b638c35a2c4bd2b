use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while reading a schema file.
#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("Schema file cannot be opened: {}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Schema file cannot be read: {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Schema {} contains no fields", path.display())]
    Empty { path: PathBuf },

    #[error("{}:{line}: invalid field name {name:?}", path.display())]
    InvalidName {
        path: PathBuf,
        line: usize,
        name: String,
    },

    #[error("{}:{line}: field {name} has no type", path.display())]
    MissingType {
        path: PathBuf,
        line: usize,
        name: String,
    },

    #[error("{}:{line}: field {name} has invalid type {type_name:?}", path.display())]
    InvalidType {
        path: PathBuf,
        line: usize,
        name: String,
        type_name: String,
    },

    #[error("{}:{line}: field {name} clashes with the generated method {method}", path.display())]
    ReservedName {
        path: PathBuf,
        line: usize,
        name: String,
        method: String,
    },

    #[error("{}:{line}: field {name} duplicates field {previous} (both generate {method})", path.display())]
    DuplicateField {
        path: PathBuf,
        line: usize,
        name: String,
        previous: String,
        method: String,
    },
}

/// Errors raised while emitting code.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EmitError {
    #[error("Cannot generate code from an empty schema")]
    EmptySchema,

    #[error("Type name {0:?} is not a Rust identifier")]
    InvalidTypeName(String),

    #[error("Runtime path {0:?} is not a Rust path")]
    InvalidRuntimePath(String),
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Emit(#[from] EmitError),

    #[error("Output file cannot be written: {}", path.display())]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
