use anyhow::Context;
use clinsight_core::InsightAssembler;
use clinsight_core::document::{clean_text, strip_html};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use super::{ensure_chart_text, render_record, write_json_file};

/// Input for the ingest command.
#[derive(Debug, Clone)]
pub struct IngestInput {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    /// Pattern matched against file names inside `input_dir`.
    pub glob: String,
    pub pretty: bool,
}

/// Strategy for batch extraction over a directory of case reports.
///
/// Files are processed in parallel; one failing file never stops the batch.
#[derive(Debug, Clone, Copy)]
pub struct IngestStrategy;

impl super::CommandStrategy for IngestStrategy {
    type Input = IngestInput;

    fn execute(&self, input: Self::Input) -> anyhow::Result<()> {
        if !input.input_dir.is_dir() {
            anyhow::bail!(
                "Input directory not found: {}. Pass --input-dir or set CASE_REPORTS_DIR.",
                input.input_dir.display()
            );
        }
        std::fs::create_dir_all(&input.output_dir).with_context(|| {
            format!("Failed to create {}", input.output_dir.display())
        })?;

        let files = collect_files(&input.input_dir, &input.glob)?;
        if files.is_empty() {
            anyhow::bail!(
                "No files found with pattern: {}",
                input.input_dir.join(&input.glob).display()
            );
        }
        info!("Found {} file(s), processing", files.len());

        let assembler = InsightAssembler::standard();
        let outcomes: Vec<(PathBuf, anyhow::Result<PathBuf>)> = files
            .into_par_iter()
            .map(|path| {
                let outcome = ingest_file(&assembler, &path, &input.output_dir, input.pretty);
                (path, outcome)
            })
            .collect();

        let mut failures = 0usize;
        for (path, outcome) in &outcomes {
            let name = file_name(path);
            match outcome {
                Ok(written) => println!("[ok] {name} -> {}", written.display()),
                Err(e) => {
                    failures += 1;
                    warn!("Failed to ingest {name}: {e:#}");
                    println!("[err] {name}: {e:#}");
                }
            }
        }

        if failures == 0 {
            println!("\nAll {} file(s) processed successfully.", outcomes.len());
        } else {
            println!(
                "\nCompleted with {failures} error(s) out of {} file(s).",
                outcomes.len()
            );
        }
        Ok(())
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned())
}

/// Regular files in `dir` matching `pattern`, sorted by path.
fn collect_files(dir: &Path, pattern: &str) -> anyhow::Result<Vec<PathBuf>> {
    let full = dir.join(pattern);
    let full = full.to_string_lossy();
    let mut files: Vec<PathBuf> = glob::glob(&full)
        .with_context(|| format!("Invalid glob pattern: {pattern}"))?
        .filter_map(|entry| match entry {
            Ok(path) => Some(path),
            Err(e) => {
                warn!("Skipping unreadable path: {e}");
                None
            }
        })
        .filter(|path| path.is_file())
        .collect();
    files.sort();
    Ok(files)
}

/// Read a case report as text according to its extension.
fn read_document(path: &Path) -> anyhow::Result<String> {
    let extension = path
        .extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    let read_bytes =
        || std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()));

    match extension.as_str() {
        "pdf" => read_pdf(&read_bytes()?),
        "html" | "htm" => Ok(strip_html(&String::from_utf8_lossy(&read_bytes()?))),
        _ => Ok(String::from_utf8_lossy(&read_bytes()?).into_owned()),
    }
}

/// Text layer of a PDF; scanned pages without one are an error.
fn read_pdf(bytes: &[u8]) -> anyhow::Result<String> {
    let text = pdf_extract::extract_text_from_mem(bytes)
        .map_err(|e| anyhow::anyhow!("PDF text extraction failed: {e}"))?;
    if text.trim().is_empty() {
        anyhow::bail!("PDF has no extractable text");
    }
    Ok(text)
}

fn ingest_file(
    assembler: &InsightAssembler<'_>,
    path: &Path,
    output_dir: &Path,
    pretty: bool,
) -> anyhow::Result<PathBuf> {
    let raw = read_document(path)?;
    if raw.trim().is_empty() {
        anyhow::bail!("Could not extract text");
    }
    let text = clean_text(&raw);
    ensure_chart_text(&text)?;

    let record = assembler.process_text(&text);
    let stem = path
        .file_stem()
        .map_or_else(|| "record".to_string(), |s| s.to_string_lossy().into_owned());
    let out_path = output_dir.join(format!("{stem}.json"));
    write_json_file(&out_path, &render_record(&record, pretty)?)?;
    Ok(out_path)
}
