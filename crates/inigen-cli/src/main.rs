//! CLI tool for inigen.
//!
//! Reads a schema file and writes the Rust source of a typed accessor for
//! configuration files that follow it.

mod commands;

use anyhow::Result;
use clap::Parser;
use inigen_compiler::{DEFAULT_RUNTIME_PATH, DEFAULT_TYPE_NAME};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "inigen")]
#[command(about = "Generate typed configuration accessors from a schema", long_about = None)]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace). RUST_LOG overrides.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Parser)]
enum Commands {
    /// Generate accessor source from a schema file
    Generate {
        /// Schema file, one `Name=type;validator` entry per line
        schema: PathBuf,

        /// Destination for the generated Rust source
        output: PathBuf,

        /// Name of the generated type
        #[arg(long, default_value = DEFAULT_TYPE_NAME)]
        type_name: String,

        /// Path generated code uses to reach the runtime crate
        #[arg(long, default_value = DEFAULT_RUNTIME_PATH)]
        runtime: String,
    },

    /// List the fields a schema file defines
    Fields {
        /// Schema file to read
        schema: PathBuf,

        /// Print the fields as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Generate {
            schema,
            output,
            type_name,
            runtime,
        } => commands::generate(&schema, &output, &type_name, &runtime),
        Commands::Fields { schema, json } => commands::fields(&schema, json),
    }
}
