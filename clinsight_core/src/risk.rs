//! Rule-based risk assessment.
//!
//! Each risk category is an ordered table of `(name, predicate, level)`
//! rules. The first rule whose predicate holds decides the level; when none
//! hold the table's default (its least severe level) applies. Predicates see
//! only the already-extracted record fields, never the raw text.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::record::{
    AirwayAssessment, Classification, Comorbidities, LaboratoryValues, Medications, RiskAssessment,
    RiskLevel,
};
use crate::taxonomy::{GLP1_AGONISTS, HIGH_RISK_CARDIAC, SLEEP_APNEA};

const PLATELET_THRESHOLD_K_UL: f64 = 100.0;
const INR_THRESHOLD: f64 = 1.5;

/// A risk category of the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskCategory {
    Aspiration,
    DifficultAirway,
    Cardiac,
    Bleeding,
}

impl RiskCategory {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Aspiration => "aspiration_risk",
            Self::DifficultAirway => "difficult_airway",
            Self::Cardiac => "cardiac_risk",
            Self::Bleeding => "bleeding_risk",
        }
    }
}

/// Marker categories that feed the assessor but are not part of the record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RiskMarkers {
    pub aspiration: Classification,
    pub bleeding: Classification,
}

/// Inputs to the risk tables.
#[derive(Debug, Clone, Copy)]
pub struct RiskFacts<'a> {
    pub comorbidities: &'a Comorbidities,
    pub medications: &'a Medications,
    pub labs: &'a LaboratoryValues,
    pub airway: &'a AirwayAssessment,
    pub markers: &'a RiskMarkers,
}

impl RiskFacts<'_> {
    /// Platelet count in K/uL.
    ///
    /// Values written as absolute counts (e.g. `150000`) are scaled down.
    fn platelets_k_ul(&self) -> Option<f64> {
        let value = self.labs.platelet_count.numeric()?;
        Some(if value >= 1000.0 { value / 1000.0 } else { value })
    }

    /// INR value, when the coagulation field holds an INR.
    fn inr(&self) -> Option<f64> {
        let value = self.labs.inr_pt_ptt.value()?;
        value.strip_prefix("INR ")?.trim().parse().ok()
    }

    fn mallampati_class(&self) -> Option<&str> {
        self.airway.mallampati.value()?.split_whitespace().last()
    }
}

/// A single risk rule.
#[derive(Debug, Clone, Copy)]
pub struct RiskRule {
    pub name: &'static str,
    pub level: RiskLevel,
    pub applies: fn(&RiskFacts<'_>) -> bool,
}

/// An ordered rule table for one risk category.
#[derive(Debug, Clone, Copy)]
pub struct RiskTable {
    pub category: RiskCategory,
    pub rules: &'static [RiskRule],
    pub default: RiskLevel,
}

impl RiskTable {
    /// Level decided by the first matching rule, or the default.
    #[must_use]
    pub fn evaluate(&self, facts: &RiskFacts<'_>) -> RiskLevel {
        for rule in self.rules {
            if (rule.applies)(facts) {
                debug!(
                    "Risk {} = {} by rule {}",
                    self.category.as_str(),
                    rule.level,
                    rule.name
                );
                return rule.level;
            }
        }
        self.default
    }
}

pub static ASPIRATION_RISK: RiskTable = RiskTable {
    category: RiskCategory::Aspiration,
    rules: &[
        RiskRule {
            name: "aspiration_marker",
            level: RiskLevel::Elevated,
            applies: |f| !f.markers.aspiration.is_empty(),
        },
        RiskRule {
            name: "glp1_agonist",
            level: RiskLevel::Elevated,
            applies: |f| f.medications.other_relevant.contains_any(GLP1_AGONISTS),
        },
    ],
    default: RiskLevel::Standard,
};

pub static CARDIAC_RISK: RiskTable = RiskTable {
    category: RiskCategory::Cardiac,
    rules: &[
        RiskRule {
            name: "high_risk_cardiac_condition",
            level: RiskLevel::High,
            applies: |f| f.comorbidities.cardiac.contains_any(HIGH_RISK_CARDIAC),
        },
        RiskRule {
            name: "cardiac_history",
            level: RiskLevel::Moderate,
            applies: |f| {
                !f.comorbidities.cardiac.is_empty() || !f.medications.cardiac_meds.is_empty()
            },
        },
    ],
    default: RiskLevel::Low,
};

pub static BLEEDING_RISK: RiskTable = RiskTable {
    category: RiskCategory::Bleeding,
    rules: &[
        RiskRule {
            name: "bleeding_marker",
            level: RiskLevel::Elevated,
            applies: |f| !f.markers.bleeding.is_empty(),
        },
        RiskRule {
            name: "anticoagulant",
            level: RiskLevel::Elevated,
            applies: |f| !f.medications.anticoagulants.is_empty(),
        },
        RiskRule {
            name: "thrombocytopenia",
            level: RiskLevel::Elevated,
            applies: |f| f.platelets_k_ul().is_some_and(|p| p < PLATELET_THRESHOLD_K_UL),
        },
        RiskRule {
            name: "elevated_inr",
            level: RiskLevel::Elevated,
            applies: |f| f.inr().is_some_and(|inr| inr > INR_THRESHOLD),
        },
    ],
    default: RiskLevel::Low,
};

pub static DIFFICULT_AIRWAY_RISK: RiskTable = RiskTable {
    category: RiskCategory::DifficultAirway,
    rules: &[
        RiskRule {
            name: "predicted_difficulty",
            level: RiskLevel::High,
            applies: |f| f.airway.predicted_difficulty.is_found(),
        },
        RiskRule {
            name: "mallampati_high_class",
            level: RiskLevel::Elevated,
            applies: |f| matches!(f.mallampati_class(), Some("III" | "IV" | "3" | "4")),
        },
        RiskRule {
            name: "limited_neck_mobility",
            level: RiskLevel::Elevated,
            applies: |f| {
                matches!(
                    f.airway.neck_mobility.value(),
                    Some("Limited" | "Reduced" | "Restricted" | "Decreased")
                )
            },
        },
        RiskRule {
            name: "sleep_apnea",
            level: RiskLevel::Elevated,
            applies: |f| f.comorbidities.pulmonary.contains_any(SLEEP_APNEA),
        },
    ],
    default: RiskLevel::Low,
};

/// Every risk table, in record order.
pub static RISK_TABLES: [&RiskTable; 4] = [
    &ASPIRATION_RISK,
    &DIFFICULT_AIRWAY_RISK,
    &CARDIAC_RISK,
    &BLEEDING_RISK,
];

/// Evaluate all risk tables.
#[must_use]
pub fn assess(facts: &RiskFacts<'_>) -> RiskAssessment {
    RiskAssessment {
        aspiration_risk: ASPIRATION_RISK.evaluate(facts),
        difficult_airway: DIFFICULT_AIRWAY_RISK.evaluate(facts),
        cardiac_risk: CARDIAC_RISK.evaluate(facts),
        bleeding_risk: BLEEDING_RISK.evaluate(facts),
    }
}
