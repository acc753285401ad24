//! Reads a timeline document, round-trips it through the in-memory object
//! model and writes it back out as normalized, schema-tagged JSON.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use timeline_core::value::AnyValue;
use timeline_core::{serialization, Result};

/// Read a timeline JSON document and re-emit it to stdout.
#[derive(Parser)]
#[command(name = "timeline-cli")]
struct Cli {
    /// Path to the document to read.
    path: PathBuf,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();
    match run(&cli.path) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("timeline-cli: {err}");
            ExitCode::from(1)
        }
    }
}

fn run(path: &Path) -> Result<()> {
    let object = serialization::deserialize_json_from_file(path)?;
    let text = serialization::serialize_json_to_string(&AnyValue::Retained(object), None, true)?;
    println!("{text}");
    Ok(())
}
