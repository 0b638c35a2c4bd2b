//! Code generation for inigen.
//!
//! This crate handles:
//! - Reading schema files into field descriptors
//! - Translating validator expressions into generated Rust
//! - Emitting the accessor type for a schema
//! - Writing generated sources for the CLI and build scripts

pub mod emitter;
pub mod error;
pub mod generator;
pub mod naming;
pub mod schema;
pub mod validator;

pub use emitter::{emit, CodeEmitter, DEFAULT_RUNTIME_PATH, DEFAULT_TYPE_NAME};
pub use error::{EmitError, Error, Result, SchemaError};
pub use generator::{GeneratedSource, Generator};
pub use inigen_core::{FieldDescriptor, FieldType};
pub use schema::{parse, parse_str};
pub use validator::{Translation, ValidatorTranslator};
