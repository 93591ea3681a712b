//! Patient bundle model and its chart-text rendering.
//!
//! Only the handful of FHIR fields the chart text needs are modeled; every
//! other field in the payload is ignored.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::io::Read;
use tracing::debug;

use crate::error::Result;

/// Resources fetched for one patient.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PatientBundle {
    pub patient: Option<Patient>,
    pub conditions: Vec<Entry<Condition>>,
    pub medications: Vec<Entry<MedicationRequest>>,
    pub allergies: Vec<Entry<AllergyIntolerance>>,
    pub observations: Vec<Entry<Observation>>,
    pub procedures: Vec<Entry<Procedure>>,
}

/// A resource, either bare or wrapped in a search-bundle entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Entry<T> {
    Wrapped { resource: T },
    Bare(T),
}

impl<T> Entry<T> {
    pub const fn resource(&self) -> &T {
        match self {
            Self::Wrapped { resource } | Self::Bare(resource) => resource,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Coding {
    pub display: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CodeableConcept {
    pub text: Option<String>,
    pub coding: Vec<Coding>,
}

impl CodeableConcept {
    /// The concept's text, or the display of its first coding.
    #[must_use]
    pub fn label(&self) -> Option<&str> {
        non_empty(self.text.as_deref())
            .or_else(|| non_empty(self.coding.first()?.display.as_deref()))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HumanName {
    pub given: Vec<String>,
    pub family: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Patient {
    pub name: Vec<HumanName>,
    pub birth_date: Option<String>,
    pub gender: Option<String>,
}

impl Patient {
    fn display_name(&self) -> String {
        let Some(name) = self.name.first() else {
            return "Unknown".to_string();
        };
        let parts: Vec<&str> = name
            .given
            .iter()
            .map(String::as_str)
            .chain(name.family.as_deref())
            .filter(|part| !part.is_empty())
            .collect();
        if parts.is_empty() {
            "Unknown".to_string()
        } else {
            parts.join(" ")
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Condition {
    pub code: Option<CodeableConcept>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Reference {
    pub display: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Dosage {
    pub text: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MedicationRequest {
    pub medication_codeable_concept: Option<CodeableConcept>,
    pub medication_reference: Option<Reference>,
    pub dosage_instruction: Vec<Dosage>,
}

impl MedicationRequest {
    fn name(&self) -> Option<&str> {
        self.medication_codeable_concept
            .as_ref()
            .and_then(CodeableConcept::label)
            .or_else(|| non_empty(self.medication_reference.as_ref()?.display.as_deref()))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Reaction {
    pub manifestation: Vec<CodeableConcept>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AllergyIntolerance {
    pub code: Option<CodeableConcept>,
    pub reaction: Vec<Reaction>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Quantity {
    pub value: Option<f64>,
    pub unit: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Observation {
    pub code: Option<CodeableConcept>,
    pub value_quantity: Option<Quantity>,
    pub value_string: Option<String>,
}

impl Observation {
    fn value(&self) -> Option<String> {
        if let Some(quantity) = &self.value_quantity {
            let number = quantity.value.map(|v| v.to_string()).unwrap_or_default();
            let unit = quantity.unit.as_deref().unwrap_or_default();
            let rendered = format!("{number} {unit}").trim().to_string();
            return (!rendered.is_empty()).then_some(rendered);
        }
        non_empty(self.value_string.as_deref()).map(str::to_string)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Procedure {
    pub code: Option<CodeableConcept>,
    pub performed_date_time: Option<String>,
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn concept_label(code: Option<&CodeableConcept>) -> Option<&str> {
    code.and_then(CodeableConcept::label)
}

fn title(value: &str) -> String {
    let mut chars = value.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect()
    })
}

impl PatientBundle {
    /// Parse a bundle from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parse a bundle from a reader.
    pub fn from_reader(reader: impl Read) -> Result<Self> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Render the bundle as chart text, computing age as of `today`.
    #[must_use]
    pub fn to_chart_text(&self, today: NaiveDate) -> String {
        let mut lines: Vec<String> = Vec::new();

        if let Some(patient) = &self.patient {
            lines.push(format!("PATIENT: {}", patient.display_name()));
            if let Some(birth_date) = non_empty(patient.birth_date.as_deref()) {
                match age_on(birth_date, today) {
                    Some(age) => lines.push(format!("AGE: {age} years old")),
                    None => lines.push(format!("BIRTH DATE: {birth_date}")),
                }
            }
            if let Some(gender) = non_empty(patient.gender.as_deref()) {
                lines.push(format!("GENDER: {}", title(gender)));
            }
        }

        let conditions: Vec<String> = self
            .conditions
            .iter()
            .filter_map(|entry| concept_label(entry.resource().code.as_ref()))
            .map(|label| format!("- {label}"))
            .collect();
        push_section(&mut lines, "PAST MEDICAL HISTORY:", conditions);

        let medications: Vec<String> = self
            .medications
            .iter()
            .map(Entry::resource)
            .filter_map(|med| {
                let name = med.name()?;
                let dosage = med
                    .dosage_instruction
                    .first()
                    .and_then(|d| non_empty(d.text.as_deref()));
                Some(match dosage {
                    Some(dosage) => format!("- {name} - {dosage}"),
                    None => format!("- {name}"),
                })
            })
            .collect();
        push_section(&mut lines, "MEDICATIONS:", medications);

        let allergies: Vec<String> = self
            .allergies
            .iter()
            .map(Entry::resource)
            .filter_map(|allergy| {
                let allergen = concept_label(allergy.code.as_ref())?;
                let reaction = allergy
                    .reaction
                    .first()
                    .and_then(|r| r.manifestation.first())
                    .and_then(|m| non_empty(m.text.as_deref()));
                Some(match reaction {
                    Some(reaction) => format!("- {allergen} ({reaction})"),
                    None => format!("- {allergen}"),
                })
            })
            .collect();
        push_section(&mut lines, "ALLERGIES:", allergies);

        let mut seen_labs: Vec<&str> = Vec::new();
        let mut labs: Vec<String> = Vec::new();
        for observation in self.observations.iter().map(Entry::resource) {
            let Some(name) = concept_label(observation.code.as_ref()) else {
                debug!("Skipping observation without a code");
                continue;
            };
            let Some(value) = observation.value() else {
                continue;
            };
            if seen_labs.contains(&name) {
                continue;
            }
            seen_labs.push(name);
            labs.push(format!("{name}: {value}"));
        }
        push_section(&mut lines, "LABORATORY VALUES:", labs);

        let procedures: Vec<String> = self
            .procedures
            .iter()
            .map(Entry::resource)
            .filter_map(|procedure| {
                let name = concept_label(procedure.code.as_ref())?;
                let date = non_empty(procedure.performed_date_time.as_deref())
                    .map(|d| d.get(..10).unwrap_or(d));
                Some(match date {
                    Some(date) => format!("- {name} ({date})"),
                    None => format!("- {name}"),
                })
            })
            .collect();
        push_section(&mut lines, "PROCEDURES:", procedures);

        lines.join("\n")
    }
}

fn push_section(lines: &mut Vec<String>, heading: &str, entries: Vec<String>) {
    if entries.is_empty() {
        return;
    }
    if !lines.is_empty() {
        lines.push(String::new());
    }
    lines.push(heading.to_string());
    lines.extend(entries);
}

/// Whole years between `birth_date` and `today`.
fn age_on(birth_date: &str, today: NaiveDate) -> Option<u32> {
    let date_part = birth_date.get(..10).unwrap_or(birth_date);
    let born = NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()?;
    today.years_since(born)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 1).unwrap_or_default()
    }

    #[test]
    fn test_age_respects_birthday() {
        assert_eq!(age_on("1955-02-15", today()), Some(70));
        assert_eq!(age_on("1955-07-15", today()), Some(69));
        assert_eq!(age_on("1955-02-15T00:00:00Z", today()), Some(70));
        assert_eq!(age_on("02/15/1955", today()), None);
        assert_eq!(age_on("2030-01-01", today()), None);
    }

    #[test]
    fn test_unparsable_birth_date_is_kept_raw() {
        let bundle = PatientBundle {
            patient: Some(Patient {
                birth_date: Some("unknown".to_string()),
                ..Patient::default()
            }),
            ..PatientBundle::default()
        };
        assert_eq!(
            bundle.to_chart_text(today()),
            "PATIENT: Unknown\nBIRTH DATE: unknown"
        );
    }

    #[test]
    fn test_wrapped_and_bare_entries() {
        let json = r#"{
            "conditions": [
                {"resource": {"code": {"text": "Asthma"}}},
                {"code": {"coding": [{"display": "Obstructive sleep apnea"}]}},
                {"code": {}}
            ]
        }"#;
        let bundle = PatientBundle::from_json_str(json).unwrap_or_default();
        assert_eq!(
            bundle.to_chart_text(today()),
            "PAST MEDICAL HISTORY:\n- Asthma\n- Obstructive sleep apnea"
        );
    }

    #[test]
    fn test_first_value_per_lab_and_string_values() {
        let json = r#"{
            "observations": [
                {"code": {"text": "Hemoglobin"}, "valueQuantity": {"value": 9.1, "unit": "g/dL"}},
                {"code": {"text": "Hemoglobin"}, "valueQuantity": {"value": 12.0, "unit": "g/dL"}},
                {"code": {"text": "Blood type"}, "valueString": "O+"},
                {"code": {"text": "Pending"}}
            ]
        }"#;
        let bundle = PatientBundle::from_json_str(json).unwrap_or_default();
        assert_eq!(
            bundle.to_chart_text(today()),
            "LABORATORY VALUES:\nHemoglobin: 9.1 g/dL\nBlood type: O+"
        );
    }

    #[test]
    fn test_medication_reference_and_procedure_date() {
        let json = r#"{
            "medications": [{"medicationReference": {"display": "Apixaban 5 mg"}}],
            "procedures": [{"code": {"text": "Appendectomy"}, "performedDateTime": "2001-04-03T10:00:00Z"}]
        }"#;
        let bundle = PatientBundle::from_json_str(json).unwrap_or_default();
        assert_eq!(
            bundle.to_chart_text(today()),
            "MEDICATIONS:\n- Apixaban 5 mg\n\nPROCEDURES:\n- Appendectomy (2001-04-03)"
        );
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        assert!(PatientBundle::from_json_str("{\"conditions\": 3}").is_err());
    }
}
