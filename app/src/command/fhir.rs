use anyhow::Context;
use chrono::Utc;
use clinsight_core::InsightAssembler;
use clinsight_fhir::PatientBundle;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use tracing::info;

use super::{OutputOptions, emit_record, ensure_chart_text};

/// Input for the fhir command.
#[derive(Debug, Clone)]
pub struct FhirInput {
    pub file: PathBuf,
    /// Print the generated chart text to stderr.
    pub show_text: bool,
    pub output: OutputOptions,
}

/// Strategy for extracting a record from a FHIR patient bundle.
#[derive(Debug, Clone, Copy)]
pub struct FhirStrategy;

impl super::CommandStrategy for FhirStrategy {
    type Input = FhirInput;

    fn execute(&self, input: Self::Input) -> anyhow::Result<()> {
        let file = File::open(&input.file)
            .with_context(|| format!("Failed to open {}", input.file.display()))?;
        let bundle = PatientBundle::from_reader(BufReader::new(file))
            .with_context(|| format!("Failed to parse {}", input.file.display()))?;

        let text = bundle.to_chart_text(Utc::now().date_naive());
        info!("Converted bundle to {} bytes of chart text", text.len());
        if input.show_text {
            eprintln!("=== Chart text ===\n{text}\n==================");
        }

        ensure_chart_text(&text)?;

        let record = InsightAssembler::standard().process_text(&text);
        emit_record(&record, &input.output)
    }
}
