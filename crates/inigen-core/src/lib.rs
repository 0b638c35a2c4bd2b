//! Core types and runtime support for inigen.
//!
//! This crate is shared by the generator and by the code it generates:
//!
//! - [`field`] - the field descriptors read from a schema file
//! - [`delimited`] - the `$$`-escaped delimited line format used by both
//!   schema files and configuration files
//! - [`store`] - the key/value store that generated types delegate to
//!
//! Generated code refers to this crate by absolute path (`::inigen_core`), so
//! any crate that includes generated accessors must depend on it.

pub mod delimited;
pub mod error;
pub mod field;
pub mod store;

pub use error::{ConfigError, Result};
pub use field::{FieldDescriptor, FieldType};
pub use store::IniStore;
