use crate::emitter::CodeEmitter;
use crate::error::{Error, Result};
use crate::schema;
use inigen_core::FieldDescriptor;
use std::fs;
use std::path::Path;
use tracing::info;

/// Reads a schema file and emits the accessor type for it.
///
/// Intended for the CLI and for build scripts:
///
/// ```no_run
/// // build.rs
/// let out_dir = std::path::PathBuf::from(std::env::var("OUT_DIR").unwrap());
/// inigen_compiler::Generator::new("AppConfig")
///     .generate_to_file("app.schema", out_dir.join("app_config.rs"))
///     .unwrap();
/// ```
#[derive(Debug, Clone, Default)]
pub struct Generator {
    emitter: CodeEmitter,
}

impl Generator {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            emitter: CodeEmitter::new(type_name),
        }
    }

    pub fn with_runtime_path(mut self, path: impl Into<String>) -> Self {
        self.emitter = self.emitter.with_runtime_path(path);
        self
    }

    pub fn emitter(&self) -> &CodeEmitter {
        &self.emitter
    }

    /// Read `schema_path` and emit source for it without touching the disk.
    pub fn generate(&self, schema_path: impl AsRef<Path>) -> Result<GeneratedSource> {
        let fields = schema::parse(schema_path)?;
        let source = self.emitter.emit(&fields)?;
        Ok(GeneratedSource { fields, source })
    }

    /// Read `schema_path` and write the emitted source to `output`.
    ///
    /// Nothing is written when the schema cannot be read or emitted.
    pub fn generate_to_file(
        &self,
        schema_path: impl AsRef<Path>,
        output: impl AsRef<Path>,
    ) -> Result<GeneratedSource> {
        let schema_path = schema_path.as_ref();
        let output = output.as_ref();

        let generated = self.generate(schema_path)?;
        fs::write(output, &generated.source).map_err(|source| Error::Output {
            path: output.to_path_buf(),
            source,
        })?;

        info!(
            schema = %schema_path.display(),
            output = %output.display(),
            type_name = self.emitter.type_name(),
            fields = generated.fields.len(),
            "generated accessor type"
        );
        Ok(generated)
    }
}

/// Output of one generator run.
#[derive(Debug, Clone)]
pub struct GeneratedSource {
    /// Fields read from the schema, in file order.
    pub fields: Vec<FieldDescriptor>,
    /// Emitted Rust source.
    pub source: String,
}
