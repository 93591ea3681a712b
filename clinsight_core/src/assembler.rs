//! Assembly of the complete clinical record.

use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::{debug, info};

use crate::error::{InsightError, Result};
use crate::extraction::ExtractionEngine;
use crate::extraction::patterns::Field;
use crate::record::{ClinicalRecord, Metadata};
use crate::risk::{self, RiskFacts, RiskMarkers};
use crate::taxonomy::Category;
use crate::taxonomy::classifier::KeywordClassifier;

/// Turns chart text into a [`ClinicalRecord`].
///
/// Every field of the record is always present. Facts that could not be
/// found are left as the `"Not Found"` sentinel.
#[derive(Debug, Clone, Copy)]
pub struct InsightAssembler<'a> {
    engine: &'a ExtractionEngine,
    classifier: &'a KeywordClassifier,
}

impl Default for InsightAssembler<'static> {
    fn default() -> Self {
        Self::standard()
    }
}

impl InsightAssembler<'static> {
    /// An assembler over the built-in pattern library and taxonomy.
    #[must_use]
    pub fn standard() -> Self {
        Self::new(ExtractionEngine::standard(), KeywordClassifier::standard())
    }
}

impl<'a> InsightAssembler<'a> {
    #[must_use]
    pub const fn new(engine: &'a ExtractionEngine, classifier: &'a KeywordClassifier) -> Self {
        Self { engine, classifier }
    }

    /// Assemble a record stamped with the current time.
    #[must_use]
    pub fn assemble(&self, text: &str) -> ClinicalRecord {
        self.assemble_at(text, Utc::now())
    }

    /// Assemble a record stamped with `processed_at`.
    ///
    /// Output is a pure function of `text` and `processed_at`.
    #[must_use]
    pub fn assemble_at(&self, text: &str, processed_at: DateTime<Utc>) -> ClinicalRecord {
        let mut record = ClinicalRecord::default();

        let mut found = 0usize;
        for field in Field::ALL {
            let finding = self.engine.extract(text, field);
            found += usize::from(finding.is_found());
            *record.finding_mut(field) = finding;
        }

        let mut markers = RiskMarkers::default();
        for category in Category::ALL {
            let classification = self.classifier.classify(text, category);
            match category {
                Category::AspirationMarkers => markers.aspiration = classification,
                Category::BleedingMarkers => markers.bleeding = classification,
                _ => {
                    if let Some(slot) = record.classification_mut(category) {
                        *slot = classification;
                    }
                }
            }
        }

        let pre = &record.pre_operative;
        record.risk_assessment = risk::assess(&RiskFacts {
            comorbidities: &pre.comorbidities,
            medications: &pre.medications,
            labs: &pre.laboratory_values,
            airway: &pre.airway_assessment,
            markers: &markers,
        });
        record.metadata = Metadata::at(processed_at);

        debug!("Assembled record: {found} of {} fields found", Field::ALL.len());
        record
    }

    /// Assemble from raw bytes, which must be valid UTF-8.
    ///
    /// # Errors
    /// Returns [`InsightError::InvalidInput`] for non-UTF-8 input.
    pub fn process_bytes(&self, bytes: &[u8]) -> Result<ClinicalRecord> {
        let text = std::str::from_utf8(bytes)
            .map_err(|e| InsightError::InvalidInput(format!("text is not valid UTF-8: {e}")))?;
        Ok(self.process_text(text))
    }

    /// Assemble from a JSON value, which must be a string.
    ///
    /// # Errors
    /// Returns [`InsightError::InvalidInput`] for any other JSON type.
    pub fn process_value(&self, value: &Value) -> Result<ClinicalRecord> {
        match value {
            Value::String(text) => Ok(self.process_text(text)),
            other => Err(InsightError::InvalidInput(format!(
                "expected chart text as a JSON string, got {}",
                json_type_name(other)
            ))),
        }
    }

    /// Assemble a record from chart text.
    #[must_use]
    pub fn process_text(&self, text: &str) -> ClinicalRecord {
        info!("Processing chart text ({} bytes)", text.len());
        self.assemble(text)
    }
}

/// Assemble a record with the built-in libraries.
#[must_use]
pub fn process_text(text: &str) -> ClinicalRecord {
    InsightAssembler::standard().process_text(text)
}

const fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{NOT_FOUND, RiskLevel};
    use chrono::TimeZone;

    fn fixed_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0)
            .single()
            .unwrap_or_default()
    }

    #[test]
    fn test_empty_text_yields_full_schema() {
        let record = InsightAssembler::standard().assemble_at("", fixed_time());
        assert_eq!(record.patient_info.age.as_str(), NOT_FOUND);
        assert!(record.pre_operative.comorbidities.cardiac.is_empty());
        assert_eq!(record.risk_assessment.aspiration_risk, RiskLevel::Standard);
        assert_eq!(record.risk_assessment.bleeding_risk, RiskLevel::Low);
        assert_eq!(record.metadata.version, "1.0");
    }

    #[test]
    fn test_assemble_at_is_deterministic() {
        let text = "ASA II. On warfarin. Mallampati IV.";
        let assembler = InsightAssembler::standard();
        assert_eq!(
            assembler.assemble_at(text, fixed_time()),
            assembler.assemble_at(text, fixed_time())
        );
    }

    #[test]
    fn test_markers_drive_risk_without_being_rendered() {
        let record =
            InsightAssembler::standard().assemble_at("Severe GERD, full stomach.", fixed_time());
        assert_eq!(record.risk_assessment.aspiration_risk, RiskLevel::Elevated);
        assert!(record.pre_operative.comorbidities.hepatic.is_empty());
    }

    #[test]
    fn test_process_bytes_rejects_invalid_utf8() {
        let result = InsightAssembler::standard().process_bytes(&[0x41, 0xff, 0xfe]);
        assert!(matches!(result, Err(InsightError::InvalidInput(_))));
    }

    #[test]
    fn test_process_value_requires_string() {
        let assembler = InsightAssembler::standard();
        assert!(matches!(
            assembler.process_value(&serde_json::json!(42)),
            Err(InsightError::InvalidInput(_))
        ));
        assert!(matches!(
            assembler.process_value(&Value::Null),
            Err(InsightError::InvalidInput(_))
        ));
        assert!(assembler.process_value(&serde_json::json!("ASA I")).is_ok());
    }
}
