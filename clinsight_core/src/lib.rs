#![warn(
    clippy::all,
    clippy::nursery,
    clippy::pedantic,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::correctness,
    clippy::suspicious,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(
    clippy::similar_names,
    clippy::missing_safety_doc,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc
)]

//! Extraction of anesthesia-relevant insights from free-text patient charts.
//!
//! Text flows through the field extractor and the keyword classifier, the
//! risk tables read their results, and the assembler emits a
//! [`ClinicalRecord`] in which every leaf is a string.

pub mod assembler;
pub mod document;
mod error;
pub mod extraction;
pub mod record;
pub mod risk;
pub mod taxonomy;

pub use assembler::{InsightAssembler, process_text};
pub use error::{BuildError, InsightError, Result};
pub use extraction::{ExtractionEngine, Field, PatternDef, default_patterns};
pub use record::{
    Classification, ClinicalRecord, EXTRACTION_DISCLAIMER, Finding, NOT_FOUND, RiskLevel,
    SCHEMA_VERSION,
};
pub use risk::{RiskFacts, RiskMarkers, RiskTable, assess};
pub use taxonomy::Category;
pub use taxonomy::classifier::KeywordClassifier;

/// Chart text that callers leave in templates when no chart was pasted.
pub const PLACEHOLDER_TEXT: &str = "<<INSERT PATIENT CHART TEXT>>";

/// Whether `text` carries no chart content.
#[must_use]
pub fn is_blank_chart(text: &str) -> bool {
    let trimmed = text.trim();
    trimmed.is_empty() || trimmed == PLACEHOLDER_TEXT
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_chart_detection() {
        assert!(is_blank_chart(""));
        assert!(is_blank_chart("  \n"));
        assert!(is_blank_chart("<<INSERT PATIENT CHART TEXT>>"));
        assert!(!is_blank_chart("ASA II"));
    }
}
