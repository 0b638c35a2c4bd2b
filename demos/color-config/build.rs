//! Build script for color-config.
//!
//! Generates the configuration accessor types from the schema files at the
//! crate root into `OUT_DIR`.

use std::env;
use std::path::PathBuf;

const SCHEMAS: &[(&str, &str, &str)] = &[
    ("config.schema", "MyIniFile", "my_ini_file.rs"),
    ("date_range.schema", "DateRangeConfig", "date_range_config.rs"),
];

fn main() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").expect("OUT_DIR not set"));

    for (schema, type_name, output) in SCHEMAS {
        println!("cargo:rerun-if-changed={schema}");
        inigen_compiler::Generator::new(*type_name)
            .generate_to_file(schema, out_dir.join(output))
            .unwrap_or_else(|e| panic!("Failed to generate {type_name} from {schema}: {e}"));
    }
}
