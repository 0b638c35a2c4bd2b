//! Command implementations for the inigen CLI.

use anyhow::{Context, Result};
use inigen_compiler::{schema, Generator};
use inigen_core::FieldDescriptor;
use std::path::Path;

/// Generate command: write accessor source for `schema` to `output`.
pub fn generate(schema: &Path, output: &Path, type_name: &str, runtime: &str) -> Result<()> {
    let generated = Generator::new(type_name)
        .with_runtime_path(runtime)
        .generate_to_file(schema, output)
        .with_context(|| format!("Failed to generate code from {}", schema.display()))?;

    println!(
        "Generated {} ({} fields) -> {}",
        type_name,
        generated.fields.len(),
        output.display()
    );
    Ok(())
}

/// Fields command: list the descriptors read from `schema`.
pub fn fields(schema: &Path, json: bool) -> Result<()> {
    let fields = schema::parse(schema)
        .with_context(|| format!("Failed to read schema {}", schema.display()))?;

    if json {
        let rendered =
            serde_json::to_string_pretty(&fields).context("Failed to serialize fields")?;
        println!("{}", rendered);
    } else {
        print!("{}", format_fields(&fields));
    }
    Ok(())
}

/// Render fields as an aligned table: name, Rust type, validator.
fn format_fields(fields: &[FieldDescriptor]) -> String {
    let name_width = fields.iter().map(|f| f.name.len()).max().unwrap_or(0);
    let type_width = fields
        .iter()
        .map(|f| f.field_type.rust_name().len())
        .max()
        .unwrap_or(0);

    let mut out = format!("Fields: {}\n\n", fields.len());
    for field in fields {
        out.push_str(&format!(
            "  {:name_width$}  {:type_width$}  {}\n",
            field.name,
            field.field_type.rust_name(),
            field.validator,
        ));
    }
    out
}
