use anyhow::Context;
use clinsight_core::InsightAssembler;
use std::io::Read;
use std::path::PathBuf;
use tracing::info;

use super::{OutputOptions, emit_record, ensure_chart_text};

/// Input for the extract command.
#[derive(Debug, Clone, Default)]
pub struct ExtractInput {
    /// Chart text given inline.
    pub text: Option<String>,
    /// Chart text file; takes precedence over `text`.
    pub file: Option<PathBuf>,
    pub output: OutputOptions,
}

/// Strategy for extracting a record from one chart.
///
/// Chart text comes from `--file`, the positional argument, or stdin, in
/// that order.
#[derive(Debug, Clone, Copy)]
pub struct ExtractStrategy;

impl super::CommandStrategy for ExtractStrategy {
    type Input = ExtractInput;

    fn execute(&self, input: Self::Input) -> anyhow::Result<()> {
        let bytes = match (&input.file, input.text) {
            (Some(path), _) => {
                info!("Reading chart from {}", path.display());
                std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?
            }
            (None, Some(text)) => text.into_bytes(),
            (None, None) => {
                let mut buffer = Vec::new();
                std::io::stdin()
                    .read_to_end(&mut buffer)
                    .context("Failed to read chart text from stdin")?;
                buffer
            }
        };

        ensure_chart_text(&String::from_utf8_lossy(&bytes))?;

        let record = InsightAssembler::standard().process_bytes(&bytes)?;
        emit_record(&record, &input.output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::CommandStrategy;

    #[test]
    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    fn test_extract_file_to_output() {
        let dir = tempfile::tempdir().expect("tempdir");
        let chart = dir.path().join("chart.txt");
        let out = dir.path().join("record.json");
        std::fs::write(&chart, "58-year-old man, ASA II, Mallampati 3").expect("write");

        ExtractStrategy
            .execute(ExtractInput {
                text: None,
                file: Some(chart),
                output: OutputOptions {
                    pretty: false,
                    output: Some(out.clone()),
                },
            })
            .expect("extract succeeds");

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&out).expect("output")).expect("json");
        assert_eq!(json["pre_operative"]["asa_status"], "ASA II");
        assert_eq!(json["risk_assessment"]["difficult_airway"], "Elevated");
    }

    #[test]
    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    fn test_extract_rejects_non_utf8_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let chart = dir.path().join("chart.txt");
        let out = dir.path().join("record.json");
        std::fs::write(&chart, b"ASA III \xff\xfe on warfarin").expect("write");

        let err = ExtractStrategy
            .execute(ExtractInput {
                text: None,
                file: Some(chart),
                output: OutputOptions {
                    pretty: true,
                    output: Some(out.clone()),
                },
            })
            .expect_err("invalid UTF-8 is rejected");

        assert!(err.to_string().starts_with("Invalid input"), "{err}");
        assert!(!out.exists());
    }

    #[test]
    fn test_extract_rejects_placeholder() {
        let result = ExtractStrategy.execute(ExtractInput {
            text: Some(clinsight_core::PLACEHOLDER_TEXT.to_string()),
            ..ExtractInput::default()
        });
        assert!(result.is_err());
    }
}
