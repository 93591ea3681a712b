//! Static strategy pattern for CLI commands.
//!
//! Each command is a separate strategy type with its own input, dispatched
//! statically from `main`.

use anyhow::Context;
use clinsight_core::{ClinicalRecord, is_blank_chart};
use std::io::Write;
use std::path::Path;
use tracing::info;

mod extract;
mod fhir;
mod info;
mod ingest;
mod init;
mod version;

pub use extract::{ExtractInput, ExtractStrategy};
pub use fhir::{FhirInput, FhirStrategy};
pub use info::InfoStrategy;
pub use ingest::{IngestInput, IngestStrategy};
pub use init::InitStrategy;
pub use version::VersionStrategy;

/// Core trait defining the contract for all command strategies.
pub trait CommandStrategy {
    /// The input type this strategy accepts.
    type Input;

    /// Execute the command with the given input.
    ///
    /// # Errors
    /// Returns an error if command execution fails.
    fn execute(&self, input: Self::Input) -> anyhow::Result<()>;
}

/// Where and how a record is written.
#[derive(Debug, Clone, Default)]
pub struct OutputOptions {
    pub pretty: bool,
    pub output: Option<std::path::PathBuf>,
}

/// Refuse chart text with no content.
fn ensure_chart_text(text: &str) -> anyhow::Result<()> {
    if is_blank_chart(text) {
        anyhow::bail!(
            "No chart text provided. Pass the patient chart as an argument, with --file, or on stdin."
        );
    }
    Ok(())
}

fn render_record(record: &ClinicalRecord, pretty: bool) -> anyhow::Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(record)?
    } else {
        serde_json::to_string(record)?
    };
    Ok(json)
}

fn write_json_file(path: &Path, json: &str) -> anyhow::Result<()> {
    std::fs::write(path, format!("{json}\n"))
        .with_context(|| format!("Failed to write {}", path.display()))
}

/// Write `record` to the configured destination.
fn emit_record(record: &ClinicalRecord, options: &OutputOptions) -> anyhow::Result<()> {
    let json = render_record(record, options.pretty)?;
    match &options.output {
        Some(path) => {
            write_json_file(path, &json)?;
            info!("Wrote record to {}", path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{json}")?;
        }
    }
    Ok(())
}
