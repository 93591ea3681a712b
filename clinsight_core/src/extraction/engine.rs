//! Field extraction engine.
//!
//! The engine holds the compiled pattern library and resolves one field at a
//! time: rules are tried in declared order and the first rule that matches
//! anywhere in the text decides the value.

use once_cell::sync::Lazy;
use std::collections::HashMap;
use tracing::{debug, error};

use crate::error::BuildError;
use crate::extraction::patterns::{Field, FieldPattern, PatternDef, default_patterns};
use crate::record::Finding;

static STANDARD_ENGINE: Lazy<ExtractionEngine> =
    Lazy::new(|| ExtractionEngine::compile_lossy(&default_patterns()));

/// Compiled extraction rules, grouped by field in priority order.
#[derive(Debug, Clone)]
pub struct ExtractionEngine {
    rules: HashMap<Field, Vec<FieldPattern>>,
}

impl ExtractionEngine {
    /// Create an engine from pattern definitions.
    ///
    /// # Errors
    /// Returns an error if any pattern fails to compile.
    pub fn new(defs: &[PatternDef]) -> Result<Self, BuildError> {
        let mut rules: HashMap<Field, Vec<FieldPattern>> = HashMap::new();
        for def in defs {
            let pattern = def.build()?;
            rules.entry(pattern.field).or_default().push(pattern);
        }
        Ok(Self { rules })
    }

    /// The process-wide engine built from [`default_patterns`].
    #[must_use]
    pub fn standard() -> &'static Self {
        &STANDARD_ENGINE
    }

    /// Compile what compiles; log and skip the rest.
    fn compile_lossy(defs: &[PatternDef]) -> Self {
        let mut rules: HashMap<Field, Vec<FieldPattern>> = HashMap::new();
        for def in defs {
            match def.build() {
                Ok(pattern) => rules.entry(pattern.field).or_default().push(pattern),
                Err(e) => error!("Skipping extraction pattern: {e}"),
            }
        }
        Self { rules }
    }

    /// Rules for `field`, in priority order.
    #[must_use]
    pub fn rules(&self, field: Field) -> &[FieldPattern] {
        self.rules.get(&field).map_or(&[], Vec::as_slice)
    }

    /// Resolve a single field from `text`.
    #[must_use]
    pub fn extract(&self, text: &str, field: Field) -> Finding {
        for pattern in self.rules(field) {
            if let Some(value) = pattern.apply(text) {
                debug!(
                    "Field {} resolved by pattern {}: {value}",
                    field.as_str(),
                    pattern.id
                );
                return Finding::Found(value);
            }
        }
        Finding::NotFound
    }

    /// Resolve every field in [`Field::ALL`] order.
    #[must_use]
    pub fn extract_all(&self, text: &str) -> Vec<(Field, Finding)> {
        Field::ALL
            .iter()
            .map(|&field| (field, self.extract(text, field)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::patterns::Render;

    fn engine() -> &'static ExtractionEngine {
        ExtractionEngine::standard()
    }

    fn found(value: &str) -> Finding {
        Finding::Found(value.to_string())
    }

    #[test]
    fn test_standard_engine_has_all_rules() {
        let compiled: usize = Field::ALL.iter().map(|f| engine().rules(*f).len()).sum();
        assert_eq!(compiled, default_patterns().len());
    }

    #[test]
    fn test_empty_text_is_not_found() {
        for (field, finding) in engine().extract_all("") {
            assert_eq!(finding, Finding::NotFound, "{}", field.as_str());
        }
    }

    #[test]
    fn test_hemoglobin_unit_suffix() {
        assert_eq!(
            engine().extract("Hemoglobin 11.8", Field::Hemoglobin),
            found("11.8 g/dL")
        );
        assert_eq!(
            engine().extract("Hgb: 9 on admission", Field::Hemoglobin),
            found("9 g/dL")
        );
    }

    #[test]
    fn test_hemoglobin_ignores_a1c() {
        assert_eq!(
            engine().extract("Hemoglobin A1c 7.2%", Field::Hemoglobin),
            Finding::NotFound
        );
    }

    #[test]
    fn test_asa_status() {
        assert_eq!(engine().extract("ASA III", Field::AsaStatus), found("ASA III"));
        assert_eq!(
            engine().extract("asa class: ii, elective", Field::AsaStatus),
            found("ASA II")
        );
        assert_eq!(
            engine().extract("ASA physical status 4", Field::AsaStatus),
            found("ASA 4")
        );
    }

    #[test]
    fn test_asa_emergency_suffix() {
        assert_eq!(engine().extract("ASA IIIE", Field::AsaStatus), found("ASA III"));
        assert_eq!(engine().extract("ASA 3E", Field::AsaStatus), found("ASA 3"));
        assert_eq!(
            engine().extract("ASA class IVE, emergent laparotomy", Field::AsaStatus),
            found("ASA IV")
        );
        assert_eq!(engine().extract("ASA III-E", Field::AsaStatus), found("ASA III"));
    }

    #[test]
    fn test_asa_does_not_match_aspirin_dose() {
        assert_eq!(
            engine().extract("Takes ASA 81 mg daily. Nasal spray.", Field::AsaStatus),
            Finding::NotFound
        );
    }

    #[test]
    fn test_nkda_wins_by_priority_not_position() {
        let text = "Allergies: see below\nPatient reports NKDA";
        assert_eq!(
            engine().extract(text, Field::Allergies),
            found("NKDA (No Known Drug Allergies)")
        );
    }

    #[test]
    fn test_allergy_heading_list() {
        let text = "ALLERGIES:\n- Penicillin (rash)\n- Latex";
        assert_eq!(
            engine().extract(text, Field::Allergies),
            found("Penicillin (Rash)")
        );
    }

    #[test]
    fn test_allergy_without_colon_does_not_cross_lines() {
        let text = "Penicillin allergy\nHemoglobin 11.8";
        assert_eq!(engine().extract(text, Field::Allergies), Finding::NotFound);
    }

    #[test]
    fn test_weight_and_height_use_distinct_units() {
        let text = "Vitals: 82 kg, 178 cm";
        assert_eq!(engine().extract(text, Field::Weight), found("82 kg"));
        assert_eq!(engine().extract(text, Field::Height), found("178 cm"));

        let only_weight = "82 kg";
        assert_eq!(
            engine().extract(only_weight, Field::Height),
            Finding::NotFound
        );
        let only_height = "178 cm";
        assert_eq!(
            engine().extract(only_height, Field::Weight),
            Finding::NotFound
        );
    }

    #[test]
    fn test_weight_ignores_dose_per_kg() {
        assert_eq!(
            engine().extract("Cefazolin 30 mg/kg", Field::Weight),
            Finding::NotFound
        );
    }

    #[test]
    fn test_age_and_gender() {
        let text = "67-year-old male presenting for knee replacement";
        assert_eq!(engine().extract(text, Field::Age), found("67 years"));
        assert_eq!(engine().extract(text, Field::Gender), found("Male"));
        assert_eq!(
            engine().extract("Sex: F", Field::Gender),
            found("Female")
        );
    }

    #[test]
    fn test_age_label_beats_earlier_duration() {
        let text = "History of diabetes for 15 years.\nAge: 62";
        assert_eq!(engine().extract(text, Field::Age), found("62 years"));
    }

    #[test]
    fn test_labs() {
        let text = "Platelets: 95, INR 1.8, Cr 2.3, glucose 212, K 5.6";
        assert_eq!(engine().extract(text, Field::PlateletCount), found("95 K/uL"));
        assert_eq!(engine().extract(text, Field::InrPtPtt), found("INR 1.8"));
        assert_eq!(engine().extract(text, Field::Creatinine), found("2.3 mg/dL"));
        assert_eq!(engine().extract(text, Field::Glucose), found("212 mg/dL"));
        assert_eq!(engine().extract(text, Field::Electrolytes), found("K 5.6 mEq/L"));
    }

    #[test]
    fn test_airway_fields() {
        let text = "Airway: Mallampati 3, mouth opening 3 fingerbreadths, \
                    TMD < 6 cm, limited neck mobility. Dentition: upper dentures";
        assert_eq!(engine().extract(text, Field::Mallampati), found("Class 3"));
        assert_eq!(
            engine().extract(text, Field::MouthOpening),
            found("3 fingerbreadths")
        );
        assert_eq!(
            engine().extract(text, Field::ThyromentalDistance),
            found("< 6 cm")
        );
        assert_eq!(engine().extract(text, Field::NeckMobility), found("Limited"));
        assert_eq!(
            engine().extract(text, Field::Dentition),
            found("Upper Dentures")
        );
        assert_eq!(
            engine().extract(text, Field::PredictedDifficulty),
            found("Potentially difficult")
        );
    }

    #[test]
    fn test_surgical_plan_fields() {
        let text = "Procedure: laparoscopic cholecystectomy. Position: reverse Trendelenburg. \
                    Estimated duration: 2 hours. Surgeon: Dr. Patel";
        assert_eq!(
            engine().extract(text, Field::Procedure),
            found("Laparoscopic Cholecystectomy")
        );
        assert_eq!(
            engine().extract(text, Field::SurgicalPosition),
            found("Reverse Trendelenburg")
        );
        assert_eq!(
            engine().extract(text, Field::EstimatedDuration),
            found("2 hours")
        );
        assert_eq!(engine().extract(text, Field::Surgeon), found("Dr. Patel"));
        assert_eq!(engine().extract(text, Field::Approach), found("Laparoscopic"));
    }

    #[test]
    fn test_past_procedures_heading_is_not_the_plan() {
        let text = "PROCEDURES:\n- Appendectomy (2001-04-03)";
        assert_eq!(engine().extract(text, Field::Procedure), Finding::NotFound);
    }

    #[test]
    fn test_npo_status() {
        assert_eq!(
            engine().extract("NPO since midnight.", Field::NpoStatus),
            found("NPO since midnight")
        );
        assert_eq!(
            engine().extract("Patient is not NPO, ate at 7am", Field::NpoStatus),
            found("Not NPO")
        );
    }

    #[test]
    fn test_perioperative_plan_fields() {
        let text = "Plan: arterial line, 2 large-bore IVs, type and cross 2 units. \
                    Interscalene block. Forced-air warming. Goal-directed fluid therapy. \
                    Post-op: ICU admission, remain intubated, PCA.";
        assert_eq!(
            engine().extract(text, Field::SpecialMonitoring),
            found("arterial line")
        );
        assert_eq!(
            engine().extract(text, Field::VascularAccess),
            found("large-bore IVs")
        );
        assert_eq!(
            engine().extract(text, Field::BloodProducts),
            found("type and cross")
        );
        assert_eq!(
            engine().extract(text, Field::RegionalAnesthesia),
            found("Interscalene Block")
        );
        assert_eq!(
            engine().extract(text, Field::TemperatureManagement),
            found("Forced-Air Warming")
        );
        assert_eq!(
            engine().extract(text, Field::FluidManagement),
            found("Goal-Directed Fluid Therapy")
        );
        assert_eq!(
            engine().extract(text, Field::IcuMonitoring),
            found("ICU admission planned")
        );
        assert_eq!(
            engine().extract(text, Field::VentilatorWeaning),
            found("Remain Intubated")
        );
        assert_eq!(engine().extract(text, Field::PainManagement), found("PCA"));
    }

    #[test]
    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    fn test_custom_engine_respects_declared_order() {
        let defs = vec![
            PatternDef::new("late", Field::Surgeon, r"second (\w+)", Render::verbatim()),
            PatternDef::new("early", Field::Surgeon, r"first (\w+)", Render::verbatim()),
        ];
        let engine = ExtractionEngine::new(&defs).expect("custom engine should build");
        let finding = engine.extract("first alpha then second beta", Field::Surgeon);
        assert_eq!(finding, Finding::Found("beta".to_string()));
    }

    #[test]
    fn test_custom_engine_rejects_invalid_pattern() {
        let defs = vec![PatternDef::new(
            "bad",
            Field::Age,
            r"(\d+",
            Render::verbatim(),
        )];
        assert!(ExtractionEngine::new(&defs).is_err());
    }
}
