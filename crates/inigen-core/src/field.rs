//! Field descriptors read from a schema file.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Raw values a boolean field reads as `true`.
pub const BOOL_TRUE_LITERALS: [&str; 3] = ["Y", "1", "true"];

/// Raw values a boolean field reads as `false`.
pub const BOOL_FALSE_LITERALS: [&str; 3] = ["N", "0", "false"];

/// Interpret raw text as a boolean. Anything outside
/// [`BOOL_TRUE_LITERALS`] reads as `false`, including unrecognised text.
pub fn parse_bool_literal(raw: &str) -> bool {
    BOOL_TRUE_LITERALS.contains(&raw)
}

/// Whether `raw` is one of the six recognised boolean literals.
pub fn is_bool_literal(raw: &str) -> bool {
    BOOL_TRUE_LITERALS.contains(&raw) || BOOL_FALSE_LITERALS.contains(&raw)
}

/// The value type of a field.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "name", rename_all = "snake_case")]
pub enum FieldType {
    /// The standard owned string type.
    String,
    /// A boolean read from the literal sets and written as `true`/`false`.
    Bool,
    /// Any other type, used verbatim. Generated code requires it to
    /// implement `FromStr` and `Display`.
    Named(String),
}

impl FieldType {
    /// Canonicalize a trimmed schema type token.
    ///
    /// `string` becomes [`FieldType::String`]; C-family spellings such as
    /// `int` or `double` map to their Rust equivalents; everything else is
    /// kept as written.
    pub fn from_token(token: &str) -> Self {
        match token {
            "string" | "std::string" | "String" => FieldType::String,
            "bool" => FieldType::Bool,
            other => FieldType::Named(canonical_alias(other).unwrap_or(other).to_string()),
        }
    }

    /// The Rust type name used in generated code.
    pub fn rust_name(&self) -> &str {
        match self {
            FieldType::String => "String",
            FieldType::Bool => "bool",
            FieldType::Named(name) => name,
        }
    }

    pub fn is_bool(&self) -> bool {
        matches!(self, FieldType::Bool)
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.rust_name())
    }
}

fn canonical_alias(token: &str) -> Option<&'static str> {
    let normalized = token.split_whitespace().collect::<Vec<_>>().join(" ");
    let alias = match normalized.as_str() {
        "int" | "signed" | "signed int" => "i32",
        "unsigned" | "unsigned int" => "u32",
        "short" => "i16",
        "unsigned short" => "u16",
        "long" | "long long" => "i64",
        "unsigned long" | "unsigned long long" => "u64",
        "float" => "f32",
        "double" => "f64",
        "size_t" | "std::size_t" => "usize",
        _ => return None,
    };
    Some(alias)
}

/// One schema entry: a named, typed field and its validator expression.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    /// Key in the configuration file; also the base of the accessor names.
    pub name: String,
    /// Canonicalized value type.
    pub field_type: FieldType,
    /// Rust boolean expression text, stored as written in the schema.
    pub validator: String,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, field_type: FieldType, validator: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            field_type,
            validator: validator.into(),
        }
    }
}
