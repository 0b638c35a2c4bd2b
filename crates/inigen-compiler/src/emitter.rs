//! Rust source emitter for configuration accessor types.
//!
//! The emitted type wraps the runtime store from `inigen_core` and, for every
//! schema field in order, defines:
//!
//! - a getter returning `Result<T, ConfigError>`
//! - a safe getter returning a caller-supplied default on absence or error
//! - a validity check running the field's validator
//! - a setter that updates the value and rewrites the backing file
//!
//! followed by a `validate` method that reports every failing field at once.
//!
//! Generated code names the runtime and the standard library by absolute
//! path, so it can be `include!`d into any module without extra imports.

use crate::error::EmitError;
use crate::naming::Accessors;
use crate::validator::{Translation, ValidatorTranslator};
use inigen_core::FieldDescriptor;
use tracing::{debug, warn};

/// Type name used when none is given.
pub const DEFAULT_TYPE_NAME: &str = "IniFile";

/// Path generated code uses to reach the runtime crate.
pub const DEFAULT_RUNTIME_PATH: &str = "::inigen_core";

const BOXED_ERROR: &str = "::std::boxed::Box<dyn ::std::error::Error>";

/// Emit the accessor type for `fields` with the default type name and runtime.
pub fn emit(fields: &[FieldDescriptor]) -> Result<String, EmitError> {
    CodeEmitter::default().emit(fields)
}

/// Renders the Rust source of one accessor type.
#[derive(Debug, Clone)]
pub struct CodeEmitter {
    type_name: String,
    runtime_path: String,
}

impl Default for CodeEmitter {
    fn default() -> Self {
        Self::new(DEFAULT_TYPE_NAME)
    }
}

impl CodeEmitter {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            runtime_path: DEFAULT_RUNTIME_PATH.to_string(),
        }
    }

    /// Use a different path to the runtime crate, e.g. when it is re-exported.
    pub fn with_runtime_path(mut self, path: impl Into<String>) -> Self {
        self.runtime_path = path.into();
        self
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn runtime_path(&self) -> &str {
        &self.runtime_path
    }

    /// Emit the complete source for `fields`, in schema order.
    pub fn emit(&self, fields: &[FieldDescriptor]) -> Result<String, EmitError> {
        if fields.is_empty() {
            return Err(EmitError::EmptySchema);
        }
        if syn::parse_str::<syn::Ident>(&self.type_name).is_err() {
            return Err(EmitError::InvalidTypeName(self.type_name.clone()));
        }
        if syn::parse_str::<syn::Path>(&self.runtime_path).is_err() {
            return Err(EmitError::InvalidRuntimePath(self.runtime_path.clone()));
        }

        let translator = ValidatorTranslator::new(fields);
        let blocks: Vec<FieldBlock<'_>> = fields
            .iter()
            .map(|field| FieldBlock::new(field, &translator))
            .collect();

        let mut out = String::new();
        self.emit_prologue(&mut out, fields);

        out.push_str("\n    // Getters\n");
        for block in &blocks {
            self.emit_getter(&mut out, block);
        }

        out.push_str("\n    // Safe getters\n");
        for block in &blocks {
            emit_safe_getter(&mut out, block);
        }

        out.push_str("\n    // Validity checks\n");
        for block in &blocks {
            emit_validity_check(&mut out, block);
        }

        out.push_str("\n    // Setters\n");
        for block in &blocks {
            self.emit_setter(&mut out, block);
        }

        out.push_str("\n    // Overall validation\n");
        self.emit_validate(&mut out, &blocks);
        out.push_str("}\n");

        debug!(
            type_name = %self.type_name,
            fields = fields.len(),
            bytes = out.len(),
            "emitted accessor type"
        );
        Ok(out)
    }

    fn result_of(&self, ty: &str) -> String {
        format!(
            "::std::result::Result<{ty}, {rt}::ConfigError>",
            rt = self.runtime_path
        )
    }

    fn emit_prologue(&self, out: &mut String, fields: &[FieldDescriptor]) {
        let names = fields
            .iter()
            .map(|field| field.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");

        out.push_str(&format!(
            r#"// @generated by inigen. Do not edit by hand.
//
// Fields: {names}

/// Typed accessors for a `key=value` configuration file.
#[derive(Debug, Clone, Default)]
pub struct {ty} {{
    store: {rt}::IniStore,
}}

impl {ty} {{
    /// Create an accessor with no values loaded.
    pub fn new() -> Self {{
        <Self as ::std::default::Default>::default()
    }}

    /// Load and validate `file`.
    pub fn from_file(file: impl AsRef<::std::path::Path>) -> {result_self} {{
        let mut config = Self::new();
        config.parse_file(file)?;
        Ok(config)
    }}

    /// Replace the loaded values with the contents of `file`, then validate them.
    ///
    /// The values stay loaded when validation fails.
    pub fn parse_file(&mut self, file: impl AsRef<::std::path::Path>) -> {result_unit} {{
        self.store.load(file.as_ref())?;
        self.validate()
    }}

    /// Rewrite the backing file with `key` set to `value`.
    fn write_back(&self, key: &str, value: &str) -> {result_unit} {{
        self.store.write_back(key, value)
    }}

    /// Whether `name` has a value in the loaded file.
    pub fn exists(&self, name: &str) -> bool {{
        self.store.exists(name)
    }}
"#,
            ty = self.type_name,
            rt = self.runtime_path,
            result_self = self.result_of("Self"),
            result_unit = self.result_of("()"),
        ));
    }

    fn emit_getter(&self, out: &mut String, block: &FieldBlock<'_>) {
        let ty = block.rust_type();
        let (doc, body) = if block.field.field_type.is_bool() {
            (
                format!(
                    "Value of `{}`: `Y`, `1` and `true` read as true, anything else as false.",
                    block.field.name
                ),
                format!("self.store.bool_value({})", block.key),
            )
        } else {
            (
                format!("Value of `{}`.", block.field.name),
                format!("self.store.parse_value::<{ty}>({})", block.key),
            )
        };

        out.push_str(&format!(
            r#"
    /// {doc}
    pub fn {getter}(&self) -> {result} {{
        {body}
    }}
"#,
            getter = block.accessors.getter,
            result = self.result_of(ty),
        ));
    }

    fn emit_setter(&self, out: &mut String, block: &FieldBlock<'_>) {
        let serialize = if block.field.field_type.is_bool() {
            r#"::std::string::String::from(if val { "true" } else { "false" })"#
        } else {
            "val.to_string()"
        };

        out.push_str(&format!(
            r#"
    /// Set `{name}` and rewrite the backing file.
    pub fn {setter}(&mut self, val: {ty}) -> {result} {{
        let str_val = {serialize};
        self.store.set_raw({key}, &str_val);
        self.write_back({key}, &str_val)
    }}
"#,
            name = block.field.name,
            setter = block.accessors.setter,
            ty = block.rust_type(),
            result = self.result_of("()"),
            key = block.key,
        ));
    }

    fn emit_validate(&self, out: &mut String, blocks: &[FieldBlock<'_>]) {
        let mut checks = String::new();
        for block in blocks {
            let message = format!("{} validation fails!\n", block.field.name);
            checks.push_str(&format!(
                r#"        if !self.{validity}() {{
            report.push_str({message:?});
        }}
"#,
                validity = block.accessors.validity,
            ));
        }

        out.push_str(&format!(
            r#"
    /// Run every validity check in schema order, reporting all failures at once.
    pub fn validate(&self) -> {result} {{
        let mut report = ::std::string::String::new();
{checks}        if !report.is_empty() {{
            return Err({rt}::ConfigError::Validation(report));
        }}
        Ok(())
    }}
"#,
            result = self.result_of("()"),
            rt = self.runtime_path,
        ));
    }
}

fn emit_safe_getter(out: &mut String, block: &FieldBlock<'_>) {
    out.push_str(&format!(
        r#"
    /// Value of `{name}`, or `default_val` when it is absent or unreadable.
    pub fn {safe_getter}(&self, default_val: {ty}) -> {ty} {{
        if self.exists({key}) {{
            self.{getter}().unwrap_or(default_val)
        }} else {{
            default_val
        }}
    }}
"#,
        name = block.field.name,
        safe_getter = block.accessors.safe_getter,
        getter = block.accessors.getter,
        ty = block.rust_type(),
        key = block.key,
    ));
}

fn emit_validity_check(out: &mut String, block: &FieldBlock<'_>) {
    let literal_check = if block.field.field_type.is_bool() {
        format!(" && self.store.has_bool_literal({})", block.key)
    } else {
        String::new()
    };

    out.push_str(&format!(
        r#"
    /// Whether `{name}` satisfies {doc}.
    pub fn {validity}(&self) -> bool {{
        let check = || -> ::std::result::Result<bool, {BOXED_ERROR}> {{
            Ok({expr})
        }};
        check().unwrap_or(false){literal_check}
    }}
"#,
        name = block.field.name,
        doc = doc_code(&block.field.validator),
        validity = block.accessors.validity,
        expr = block.validator.text(),
    ));
}

/// Render `text` as inline code in a single-line doc comment.
fn doc_code(text: &str) -> String {
    let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.contains('`') {
        flat
    } else {
        format!("`{flat}`")
    }
}

/// Everything the emitter needs to know about one field.
struct FieldBlock<'a> {
    field: &'a FieldDescriptor,
    accessors: Accessors,
    /// The field name as a Rust string literal.
    key: String,
    validator: Translation,
}

impl<'a> FieldBlock<'a> {
    fn new(field: &'a FieldDescriptor, translator: &ValidatorTranslator) -> Self {
        let validator = translator.translate(&field.validator);
        if let Translation::Verbatim { reason, .. } = &validator {
            warn!(
                field = %field.name,
                validator = %field.validator,
                reason = %reason,
                "validator is not a Rust expression; embedding it verbatim"
            );
        }

        Self {
            field,
            accessors: Accessors::for_field(&field.name),
            key: format!("{:?}", field.name),
            validator,
        }
    }

    fn rust_type(&self) -> &str {
        self.field.field_type.rust_name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use inigen_core::FieldType;

    fn scenario() -> Vec<FieldDescriptor> {
        vec![
            FieldDescriptor::new("StartDate", FieldType::String, "true"),
            FieldDescriptor::new("EndDate", FieldType::String, "EndDate()>=StartDate()"),
            FieldDescriptor::new(
                "Alpha",
                FieldType::from_token("int"),
                "Alpha()>=0 && Alpha()<=255",
            ),
        ]
    }

    #[test]
    fn test_empty_schema_is_rejected() {
        assert_eq!(emit(&[]), Err(EmitError::EmptySchema));
    }

    #[test]
    fn test_emits_struct_and_prologue() {
        let source = CodeEmitter::new("MyIniFile").emit(&scenario()).unwrap();

        assert!(source.starts_with("// @generated by inigen."));
        assert!(source.contains("// Fields: StartDate, EndDate, Alpha\n"));
        assert!(source.contains("pub struct MyIniFile {\n    store: ::inigen_core::IniStore,\n}"));
        assert!(source.contains("impl MyIniFile {"));
        assert!(source.contains(
            "pub fn new() -> Self {\n        <Self as ::std::default::Default>::default()\n    }"
        ));
        assert!(source.contains(
            "pub fn from_file(file: impl AsRef<::std::path::Path>) -> \
             ::std::result::Result<Self, ::inigen_core::ConfigError>"
        ));
        assert!(source.contains("pub fn parse_file(&mut self"));
        assert!(source.contains("pub fn exists(&self, name: &str) -> bool"));
        assert!(source.ends_with("}\n"));
    }

    #[test]
    fn test_sections_follow_schema_order() {
        let source = emit(&scenario()).unwrap();

        let sections = [
            "// Getters",
            "// Safe getters",
            "// Validity checks",
            "// Setters",
            "// Overall validation",
        ];
        let positions: Vec<usize> = sections
            .iter()
            .map(|section| source.find(section).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));

        let start = source.find("pub fn start_date(").unwrap();
        let end = source.find("pub fn end_date(").unwrap();
        let alpha = source.find("pub fn alpha(").unwrap();
        assert!(start < end && end < alpha);
    }

    #[test]
    fn test_getters_read_through_the_store() {
        let source = emit(&scenario()).unwrap();
        assert!(source.contains(
            "pub fn alpha(&self) -> ::std::result::Result<i32, ::inigen_core::ConfigError> {\n        \
             self.store.parse_value::<i32>(\"Alpha\")\n    }"
        ));
        assert!(source.contains("self.store.parse_value::<String>(\"StartDate\")"));
    }

    #[test]
    fn test_safe_getter_falls_back_to_default() {
        let source = emit(&scenario()).unwrap();
        assert!(source.contains(
            "    pub fn get_safe_alpha(&self, default_val: i32) -> i32 {\n        \
             if self.exists(\"Alpha\") {\n            \
             self.alpha().unwrap_or(default_val)\n        \
             } else {\n            \
             default_val\n        \
             }\n    }"
        ));
    }

    #[test]
    fn test_validity_check_embeds_translated_validator() {
        let source = emit(&scenario()).unwrap();
        assert!(source.contains("pub fn is_valid_alpha(&self) -> bool {"));
        assert!(source.contains("Ok(self.alpha()?>=0 && self.alpha()?<=255)"));
        assert!(source.contains("Ok(self.end_date()?>=self.start_date()?)"));
        assert!(source.contains("Ok(true)"));
        assert!(source.contains("check().unwrap_or(false)\n"));
        assert!(source.contains("/// Whether `Alpha` satisfies `Alpha()>=0 && Alpha()<=255`."));
    }

    #[test]
    fn test_setter_writes_back() {
        let source = emit(&scenario()).unwrap();
        assert!(source.contains(
            "    pub fn set_alpha(&mut self, val: i32) -> \
             ::std::result::Result<(), ::inigen_core::ConfigError> {\n        \
             let str_val = val.to_string();\n        \
             self.store.set_raw(\"Alpha\", &str_val);\n        \
             self.write_back(\"Alpha\", &str_val)\n    }"
        ));
    }

    #[test]
    fn test_validate_reports_each_field_in_order() {
        let source = emit(&scenario()).unwrap();
        let start = source.find("report.push_str(\"StartDate validation fails!\\n\");").unwrap();
        let end = source.find("report.push_str(\"EndDate validation fails!\\n\");").unwrap();
        let alpha = source.find("report.push_str(\"Alpha validation fails!\\n\");").unwrap();
        assert!(start < end && end < alpha);
        assert!(source.contains("if !self.is_valid_end_date() {"));
        assert!(source.contains("return Err(::inigen_core::ConfigError::Validation(report));"));
    }

    #[test]
    fn test_bool_fields() {
        let fields = vec![FieldDescriptor::new("CheckFolder", FieldType::Bool, "true")];
        let source = emit(&fields).unwrap();

        assert!(source.contains("self.store.bool_value(\"CheckFolder\")"));
        assert!(source.contains(
            "check().unwrap_or(false) && self.store.has_bool_literal(\"CheckFolder\")"
        ));
        assert!(source.contains(
            "let str_val = ::std::string::String::from(if val { \"true\" } else { \"false\" });"
        ));
        assert!(source.contains("pub fn get_safe_check_folder(&self, default_val: bool) -> bool"));
    }

    #[test]
    fn test_named_type_is_used_verbatim() {
        let fields = vec![FieldDescriptor::new(
            "TintedColor",
            FieldType::from_token("Color"),
            "true",
        )];
        let source = emit(&fields).unwrap();
        assert!(source.contains("self.store.parse_value::<Color>(\"TintedColor\")"));
        assert!(source.contains("pub fn set_tinted_color(&mut self, val: Color)"));
    }

    #[test]
    fn test_custom_runtime_path() {
        let source = CodeEmitter::new("Settings")
            .with_runtime_path("crate::runtime")
            .emit(&scenario())
            .unwrap();
        assert!(source.contains("store: crate::runtime::IniStore,"));
        assert!(source.contains("crate::runtime::ConfigError::Validation(report)"));
        assert!(!source.contains("::inigen_core"));
    }

    #[test]
    fn test_block_validator_keeps_method_calls() {
        let fields = vec![FieldDescriptor::new(
            "Alpha",
            FieldType::from_token("int"),
            "{ let a = self.alpha()?; a > 0 }",
        )];
        let source = emit(&fields).unwrap();
        assert!(source.contains("Ok({ let a = self.alpha()?; a > 0 })"));
    }

    #[test]
    fn test_unparsable_validator_is_embedded_as_written() {
        let fields = vec![FieldDescriptor::new(
            "Alpha",
            FieldType::from_token("int"),
            "Alpha() >= 0 &&",
        )];
        let source = emit(&fields).unwrap();
        assert!(source.contains("Ok(Alpha() >= 0 &&)"));
    }

    #[test]
    fn test_invalid_type_name_is_rejected() {
        for name in ["My Type", "", "1Config", "struct", "Config<T>"] {
            assert_eq!(
                CodeEmitter::new(name).emit(&scenario()),
                Err(EmitError::InvalidTypeName(name.to_string())),
                "{name:?} should be rejected"
            );
        }
        assert!(CodeEmitter::new("Config_2").emit(&scenario()).is_ok());
    }

    #[test]
    fn test_invalid_runtime_path_is_rejected() {
        let err = CodeEmitter::new("Settings")
            .with_runtime_path("inigen core")
            .emit(&scenario())
            .unwrap_err();
        assert_eq!(err, EmitError::InvalidRuntimePath("inigen core".to_string()));
    }

    #[test]
    fn test_emission_is_deterministic() {
        assert_eq!(emit(&scenario()).unwrap(), emit(&scenario()).unwrap());
    }

    #[test]
    fn test_doc_code() {
        assert_eq!(doc_code("A() >\n 1"), "`A() > 1`");
        assert_eq!(doc_code("a `b`"), "a `b`");
    }
}
