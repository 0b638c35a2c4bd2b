//! Schema file reader.
//!
//! A schema lists one field per line:
//!
//! ```text
//! StartDate=string;true
//! EndDate=string;EndDate() >= StartDate()
//! Alpha=int;Alpha() >= 0 && Alpha() <= 255
//! ```
//!
//! The name runs up to the first `=`, the type up to the next `;`, and the
//! rest of the line is the validator expression. `$$` escapes the active
//! delimiter. Reading stops at the first blank line.

use crate::error::SchemaError;
use crate::naming::{self, Accessors, PROLOGUE_METHODS};
use inigen_core::delimited::{self, LineCursor, LineReader, KEY_DELIMITER, SCHEMA_DELIMITER};
use inigen_core::{FieldDescriptor, FieldType};
use std::collections::HashMap;
use std::io::{BufRead, Cursor};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Validator stored for lines that leave the expression empty.
pub const ALWAYS_VALID: &str = "true";

/// Read the schema file at `path` into field descriptors, in file order.
pub fn parse(path: impl AsRef<Path>) -> Result<Vec<FieldDescriptor>, SchemaError> {
    let path = path.as_ref();
    let reader = LineReader::open(path).map_err(|source| SchemaError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    read_fields(reader, path)
}

/// Parse schema text already in memory. `origin` is only used in errors.
pub fn parse_str(text: &str, origin: impl AsRef<Path>) -> Result<Vec<FieldDescriptor>, SchemaError> {
    read_fields(LineReader::new(Cursor::new(text)), origin.as_ref())
}

fn read_fields<R: BufRead>(
    reader: LineReader<R>,
    path: &Path,
) -> Result<Vec<FieldDescriptor>, SchemaError> {
    let mut checker = NameChecker::new(path);
    let mut fields = Vec::new();

    for line in reader {
        let (line_number, line) = line.map_err(|source| SchemaError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let field = parse_line(&line, line_number, path)?;
        checker.check(&field.name, line_number)?;

        debug!(
            line = line_number,
            name = %field.name,
            field_type = %field.field_type,
            "parsed schema field"
        );
        fields.push(field);
    }

    if fields.is_empty() {
        return Err(SchemaError::Empty {
            path: path.to_path_buf(),
        });
    }

    Ok(fields)
}

/// Parse one schema line.
fn parse_line(line: &str, line_number: usize, path: &Path) -> Result<FieldDescriptor, SchemaError> {
    let mut cursor = LineCursor::new(line, KEY_DELIMITER);
    let name = delimited::trim(&cursor.next_field()).to_string();

    cursor.set_delimiter(SCHEMA_DELIMITER);
    let type_token = cursor.next_field();
    let type_token = delimited::trim(&type_token);
    let validator = cursor.rest_of_line();
    let validator = delimited::trim(&validator);

    if !naming::is_valid_field_name(&name) {
        return Err(SchemaError::InvalidName {
            path: path.to_path_buf(),
            line: line_number,
            name,
        });
    }

    if type_token.is_empty() {
        return Err(SchemaError::MissingType {
            path: path.to_path_buf(),
            line: line_number,
            name,
        });
    }

    let field_type = FieldType::from_token(type_token);
    if let FieldType::Named(type_name) = &field_type {
        if syn::parse_str::<syn::Type>(type_name).is_err() {
            return Err(SchemaError::InvalidType {
                path: path.to_path_buf(),
                line: line_number,
                type_name: type_name.clone(),
                name,
            });
        }
    }

    let validator = if validator.is_empty() {
        ALWAYS_VALID
    } else {
        validator
    };

    Ok(FieldDescriptor::new(name, field_type, validator))
}

/// Rejects field names whose generated methods would collide.
struct NameChecker<'a> {
    path: &'a Path,
    /// Generated method name -> field that owns it.
    methods: HashMap<String, String>,
}

impl<'a> NameChecker<'a> {
    fn new(path: &'a Path) -> Self {
        Self {
            path,
            methods: HashMap::new(),
        }
    }

    fn check(&mut self, name: &str, line: usize) -> Result<(), SchemaError> {
        let reserved = |method: &str| SchemaError::ReservedName {
            path: self.path_buf(),
            line,
            name: name.to_string(),
            method: method.to_string(),
        };

        if naming::is_forbidden(name) {
            return Err(reserved(&naming::snake_case(name)));
        }

        let accessors = Accessors::for_field(name);

        for method in accessors.names() {
            if PROLOGUE_METHODS.contains(&method) {
                return Err(reserved(method));
            }
            if let Some(previous) = self.methods.get(method) {
                return Err(SchemaError::DuplicateField {
                    path: self.path_buf(),
                    line,
                    name: name.to_string(),
                    previous: previous.clone(),
                    method: method.to_string(),
                });
            }
        }

        for method in accessors.names() {
            self.methods.insert(method.to_string(), name.to_string());
        }
        Ok(())
    }

    fn path_buf(&self) -> PathBuf {
        self.path.to_path_buf()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const SCENARIO: &str = "StartDate=string;true\n\
                            EndDate=string;EndDate()>=StartDate()\n\
                            Alpha=int;Alpha()>=0 && Alpha()<=255\n";

    #[test]
    fn test_parse_scenario_in_order() {
        let fields = parse_str(SCENARIO, "scenario.schema").unwrap();
        assert_eq!(fields.len(), 3);

        assert_eq!(fields[0].name, "StartDate");
        assert_eq!(fields[0].field_type, FieldType::String);
        assert_eq!(fields[0].validator, "true");

        assert_eq!(fields[1].name, "EndDate");
        assert_eq!(fields[1].validator, "EndDate()>=StartDate()");

        assert_eq!(fields[2].name, "Alpha");
        assert_eq!(fields[2].field_type.rust_name(), "i32");
        assert_eq!(fields[2].validator, "Alpha()>=0 && Alpha()<=255");
    }

    #[test]
    fn test_trims_name_type_and_validator() {
        let fields = parse_str(" Alpha \t=  int ;  Alpha() >= 0 \t\n", "s").unwrap();
        assert_eq!(fields[0].name, "Alpha");
        assert_eq!(fields[0].field_type.rust_name(), "i32");
        assert_eq!(fields[0].validator, "Alpha() >= 0");
    }

    #[test]
    fn test_later_delimiters_stay_in_validator() {
        let fields = parse_str("Ratio=f64;Ratio() >= 0.0; // keep\n", "s").unwrap();
        assert_eq!(fields[0].validator, "Ratio() >= 0.0; // keep");
    }

    #[test]
    fn test_escaped_delimiter_in_type() {
        let fields = parse_str("Pairs=[u8$$ 2];true\n", "s").unwrap();
        assert_eq!(fields[0].field_type.rust_name(), "[u8; 2]");
    }

    #[test]
    fn test_blank_line_ends_schema() {
        let fields = parse_str("A=int;true\n\nB=int;true\n", "s").unwrap();
        assert_eq!(fields.len(), 1);
    }

    #[test]
    fn test_empty_validator_is_always_valid() {
        let fields = parse_str("Flag=bool;\nName=string\n", "s").unwrap();
        assert!(fields[0].field_type.is_bool());
        assert_eq!(fields[0].validator, ALWAYS_VALID);
        assert_eq!(fields[1].validator, ALWAYS_VALID);
    }

    #[test]
    fn test_empty_schema_is_error() {
        assert!(matches!(parse_str("", "s"), Err(SchemaError::Empty { .. })));
        assert!(matches!(
            parse_str("\nA=int;true\n", "s"),
            Err(SchemaError::Empty { .. })
        ));
    }

    #[test]
    fn test_unreadable_path_is_open_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = parse(dir.path().join("missing.schema")).unwrap_err();
        assert!(matches!(err, SchemaError::Open { .. }));
        assert!(err.to_string().contains("missing.schema"));
    }

    #[test]
    fn test_parse_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.schema");
        fs::write(&path, SCENARIO).unwrap();

        let fields = parse(&path).unwrap();
        assert_eq!(
            fields.iter().map(|f| f.name.as_str()).collect::<Vec<_>>(),
            vec!["StartDate", "EndDate", "Alpha"]
        );
    }

    #[test]
    fn test_line_errors() {
        assert!(matches!(
            parse_str("Start Date=string;true\n", "s"),
            Err(SchemaError::InvalidName { line: 1, .. })
        ));
        assert!(matches!(
            parse_str("A=int;true\nB\n", "s"),
            Err(SchemaError::MissingType { line: 2, .. })
        ));
        assert!(matches!(
            parse_str("A=not a type;true\n", "s"),
            Err(SchemaError::InvalidType { .. })
        ));
    }

    #[test]
    fn test_duplicate_fields_are_rejected() {
        let err = parse_str("Alpha=int;true\nAlpha=int;true\n", "s").unwrap_err();
        assert!(matches!(err, SchemaError::DuplicateField { line: 2, .. }));

        let err = parse_str("StartDate=string;true\nstart_date=string;true\n", "s").unwrap_err();
        match err {
            SchemaError::DuplicateField { previous, method, .. } => {
                assert_eq!(previous, "StartDate");
                assert_eq!(method, "start_date");
            }
            other => panic!("Expected DuplicateField, got {other:?}"),
        }
    }

    #[test]
    fn test_reserved_names_are_rejected() {
        for line in [
            "Validate=bool;true",
            "Exists=bool;true",
            "Self=int;true",
            "Default=int;Default() > 0",
            "Clone=bool;true",
            "Fmt=string;true",
        ] {
            assert!(
                matches!(parse_str(line, "s"), Err(SchemaError::ReservedName { .. })),
                "{line} should be reserved"
            );
        }

        match parse_str("Default=int;Default() > 0\n", "s").unwrap_err() {
            SchemaError::ReservedName { method, .. } => assert_eq!(method, "default"),
            other => panic!("Expected ReservedName, got {other:?}"),
        }
    }
}
