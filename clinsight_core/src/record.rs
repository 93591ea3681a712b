//! The fixed-schema clinical record.
//!
//! Every leaf of [`ClinicalRecord`] serializes to a JSON string. Absent facts
//! are modeled as [`Finding::NotFound`] or an empty [`Classification`] and only
//! become the literal `"Not Found"` at the serialization boundary, which keeps
//! the wire format stable for existing consumers.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use crate::extraction::patterns::Field;
use crate::taxonomy::Category;

/// Literal rendered for every fact that was searched for but not present.
pub const NOT_FOUND: &str = "Not Found";

/// Schema version written into every record's metadata.
pub const SCHEMA_VERSION: &str = "1.0";

/// Disclaimer written into every record's metadata.
pub const EXTRACTION_DISCLAIMER: &str = "Automated extraction - verify critical values";

/// A single-valued extraction result.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Finding {
    /// A value was extracted (already rendered, e.g. `"11.8 g/dL"`).
    Found(String),
    /// No rule matched.
    #[default]
    NotFound,
}

impl Finding {
    /// Returns the extracted value, if any.
    #[must_use]
    pub fn value(&self) -> Option<&str> {
        match self {
            Self::Found(value) => Some(value),
            Self::NotFound => None,
        }
    }

    #[must_use]
    pub const fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }

    /// Wire representation: the value or the `"Not Found"` sentinel.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.value().unwrap_or(NOT_FOUND)
    }

    /// First whitespace-separated token that parses as a number.
    ///
    /// `"1.4 mg/dL"` yields `1.4`, `"INR 1.2"` yields `1.2`.
    #[must_use]
    pub fn numeric(&self) -> Option<f64> {
        self.value()?
            .split_whitespace()
            .find_map(|token| token.parse::<f64>().ok())
    }
}

impl From<Option<String>> for Finding {
    fn from(value: Option<String>) -> Self {
        value.map_or(Self::NotFound, Self::Found)
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Finding {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Finding {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        if raw == NOT_FOUND {
            Ok(Self::NotFound)
        } else {
            Ok(Self::Found(raw))
        }
    }
}

/// A multi-valued keyword classification.
///
/// Holds distinct keywords in canonical casing, ordered by their first
/// occurrence in the source text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Classification {
    matches: Vec<String>,
}

impl Classification {
    #[must_use]
    pub const fn new(matches: Vec<String>) -> Self {
        Self { matches }
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.matches.len()
    }

    /// Whether `keyword` (canonical casing) was matched.
    #[must_use]
    pub fn contains(&self, keyword: &str) -> bool {
        self.matches.iter().any(|m| m == keyword)
    }

    /// Whether any of `keywords` was matched.
    #[must_use]
    pub fn contains_any(&self, keywords: &[&str]) -> bool {
        keywords.iter().any(|k| self.contains(k))
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.matches.iter().map(String::as_str)
    }

    /// Wire representation: `", "`-joined keywords or the sentinel.
    #[must_use]
    pub fn render(&self) -> String {
        if self.matches.is_empty() {
            NOT_FOUND.to_string()
        } else {
            self.matches.join(", ")
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl Serialize for Classification {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.render())
    }
}

impl<'de> Deserialize<'de> for Classification {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        if raw == NOT_FOUND || raw.is_empty() {
            return Ok(Self::default());
        }
        Ok(Self::new(raw.split(", ").map(str::to_string).collect()))
    }
}

/// Qualitative risk level, ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
#[derive(Default)]
pub enum RiskLevel {
    #[default]
    Low = 0,
    Standard = 1,
    Moderate = 2,
    Elevated = 3,
    High = 4,
}

impl RiskLevel {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Standard => "Standard",
            Self::Moderate => "Moderate",
            Self::Elevated => "Elevated",
            Self::High => "High",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PatientInfo {
    pub age: Finding,
    pub weight: Finding,
    pub height: Finding,
    pub gender: Finding,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Medications {
    pub anticoagulants: Classification,
    pub insulin: Classification,
    pub cardiac_meds: Classification,
    pub other_relevant: Classification,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Comorbidities {
    pub cardiac: Classification,
    pub pulmonary: Classification,
    pub renal: Classification,
    pub hepatic: Classification,
    pub neurologic: Classification,
    pub endocrine: Classification,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AirwayAssessment {
    pub mallampati: Finding,
    pub mouth_opening: Finding,
    pub neck_mobility: Finding,
    pub thyromental_distance: Finding,
    pub dentition: Finding,
    pub predicted_difficulty: Finding,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LaboratoryValues {
    pub hemoglobin: Finding,
    pub platelet_count: Finding,
    pub inr_pt_ptt: Finding,
    pub creatinine: Finding,
    pub glucose: Finding,
    pub electrolytes: Finding,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PreOperative {
    pub asa_status: Finding,
    pub allergies: Finding,
    pub medications: Medications,
    pub comorbidities: Comorbidities,
    pub airway_assessment: AirwayAssessment,
    pub laboratory_values: LaboratoryValues,
    pub device_implants: Finding,
    pub npo_status: Finding,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SurgicalPlan {
    pub procedure: Finding,
    pub surgical_position: Finding,
    pub estimated_duration: Finding,
    pub surgeon: Finding,
    pub approach: Finding,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct IntraOperative {
    pub special_monitoring: Finding,
    pub vascular_access: Finding,
    pub blood_products: Finding,
    pub regional_anesthesia: Finding,
    pub temperature_management: Finding,
    pub fluid_management: Finding,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PostOperative {
    pub planned_disposition: Finding,
    pub pain_management: Finding,
    pub icu_monitoring: Finding,
    pub ventilator_weaning: Finding,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub aspiration_risk: RiskLevel,
    pub difficult_airway: RiskLevel,
    pub cardiac_risk: RiskLevel,
    pub bleeding_risk: RiskLevel,
}

/// Processing metadata attached at assembly time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    /// RFC 3339 timestamp captured when the record was assembled.
    pub processed_timestamp: String,
    pub version: String,
    pub extraction_confidence: String,
}

impl Metadata {
    #[must_use]
    pub fn at(timestamp: DateTime<Utc>) -> Self {
        Self {
            processed_timestamp: timestamp.to_rfc3339_opts(SecondsFormat::Micros, true),
            version: SCHEMA_VERSION.to_string(),
            extraction_confidence: EXTRACTION_DISCLAIMER.to_string(),
        }
    }
}

impl Default for Metadata {
    fn default() -> Self {
        Self::at(DateTime::<Utc>::UNIX_EPOCH)
    }
}

/// The root record produced for one chart document.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ClinicalRecord {
    pub patient_info: PatientInfo,
    pub pre_operative: PreOperative,
    pub surgical_plan: SurgicalPlan,
    pub intra_operative: IntraOperative,
    pub post_operative: PostOperative,
    pub risk_assessment: RiskAssessment,
    pub metadata: Metadata,
}

impl ClinicalRecord {
    /// The slot a pattern-extracted field is written to.
    #[must_use]
    pub fn finding_mut(&mut self, field: Field) -> &mut Finding {
        let pre = &mut self.pre_operative;
        match field {
            Field::Age => &mut self.patient_info.age,
            Field::Weight => &mut self.patient_info.weight,
            Field::Height => &mut self.patient_info.height,
            Field::Gender => &mut self.patient_info.gender,
            Field::AsaStatus => &mut pre.asa_status,
            Field::Allergies => &mut pre.allergies,
            Field::DeviceImplants => &mut pre.device_implants,
            Field::NpoStatus => &mut pre.npo_status,
            Field::Mallampati => &mut pre.airway_assessment.mallampati,
            Field::MouthOpening => &mut pre.airway_assessment.mouth_opening,
            Field::NeckMobility => &mut pre.airway_assessment.neck_mobility,
            Field::ThyromentalDistance => &mut pre.airway_assessment.thyromental_distance,
            Field::Dentition => &mut pre.airway_assessment.dentition,
            Field::PredictedDifficulty => &mut pre.airway_assessment.predicted_difficulty,
            Field::Hemoglobin => &mut pre.laboratory_values.hemoglobin,
            Field::PlateletCount => &mut pre.laboratory_values.platelet_count,
            Field::InrPtPtt => &mut pre.laboratory_values.inr_pt_ptt,
            Field::Creatinine => &mut pre.laboratory_values.creatinine,
            Field::Glucose => &mut pre.laboratory_values.glucose,
            Field::Electrolytes => &mut pre.laboratory_values.electrolytes,
            Field::Procedure => &mut self.surgical_plan.procedure,
            Field::SurgicalPosition => &mut self.surgical_plan.surgical_position,
            Field::EstimatedDuration => &mut self.surgical_plan.estimated_duration,
            Field::Surgeon => &mut self.surgical_plan.surgeon,
            Field::Approach => &mut self.surgical_plan.approach,
            Field::SpecialMonitoring => &mut self.intra_operative.special_monitoring,
            Field::VascularAccess => &mut self.intra_operative.vascular_access,
            Field::BloodProducts => &mut self.intra_operative.blood_products,
            Field::RegionalAnesthesia => &mut self.intra_operative.regional_anesthesia,
            Field::TemperatureManagement => &mut self.intra_operative.temperature_management,
            Field::FluidManagement => &mut self.intra_operative.fluid_management,
            Field::PlannedDisposition => &mut self.post_operative.planned_disposition,
            Field::PainManagement => &mut self.post_operative.pain_management,
            Field::IcuMonitoring => &mut self.post_operative.icu_monitoring,
            Field::VentilatorWeaning => &mut self.post_operative.ventilator_weaning,
        }
    }

    /// The slot a keyword category is written to.
    ///
    /// Risk-marker categories feed the assessor only and have no slot.
    #[must_use]
    pub fn classification_mut(&mut self, category: Category) -> Option<&mut Classification> {
        let pre = &mut self.pre_operative;
        let slot = match category {
            Category::Cardiac => &mut pre.comorbidities.cardiac,
            Category::Pulmonary => &mut pre.comorbidities.pulmonary,
            Category::Renal => &mut pre.comorbidities.renal,
            Category::Hepatic => &mut pre.comorbidities.hepatic,
            Category::Neurologic => &mut pre.comorbidities.neurologic,
            Category::Endocrine => &mut pre.comorbidities.endocrine,
            Category::Anticoagulants => &mut pre.medications.anticoagulants,
            Category::DiabeticMedications => &mut pre.medications.insulin,
            Category::CardiacMedications => &mut pre.medications.cardiac_meds,
            Category::OtherRelevantMedications => &mut pre.medications.other_relevant,
            Category::AspirationMarkers | Category::BleedingMarkers => return None,
        };
        Some(slot)
    }
}
