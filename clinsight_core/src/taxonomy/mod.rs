//! Keyword taxonomy for multi-valued clinical categories.
//!
//! Keywords are stored in their canonical display casing; matching is
//! case-insensitive and whole-word (see [`classifier`]).

pub mod classifier;

use serde::{Deserialize, Serialize};

/// A keyword category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Cardiac,
    Pulmonary,
    Renal,
    Hepatic,
    Neurologic,
    Endocrine,
    Anticoagulants,
    DiabeticMedications,
    CardiacMedications,
    OtherRelevantMedications,
    /// Risk-assessor input only.
    AspirationMarkers,
    /// Risk-assessor input only.
    BleedingMarkers,
}

impl Category {
    pub const ALL: [Self; 12] = [
        Self::Cardiac,
        Self::Pulmonary,
        Self::Renal,
        Self::Hepatic,
        Self::Neurologic,
        Self::Endocrine,
        Self::Anticoagulants,
        Self::DiabeticMedications,
        Self::CardiacMedications,
        Self::OtherRelevantMedications,
        Self::AspirationMarkers,
        Self::BleedingMarkers,
    ];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Cardiac => "cardiac",
            Self::Pulmonary => "pulmonary",
            Self::Renal => "renal",
            Self::Hepatic => "hepatic",
            Self::Neurologic => "neurologic",
            Self::Endocrine => "endocrine",
            Self::Anticoagulants => "anticoagulants",
            Self::DiabeticMedications => "insulin",
            Self::CardiacMedications => "cardiac_meds",
            Self::OtherRelevantMedications => "other_relevant",
            Self::AspirationMarkers => "aspiration_markers",
            Self::BleedingMarkers => "bleeding_markers",
        }
    }

    /// Whether the category is rendered into the record.
    #[must_use]
    pub const fn is_reported(&self) -> bool {
        !matches!(self, Self::AspirationMarkers | Self::BleedingMarkers)
    }

    /// Canonical keywords of this category.
    #[must_use]
    pub fn keywords(&self) -> &'static [&'static str] {
        TAXONOMY
            .iter()
            .find(|entry| entry.category == *self)
            .map_or(&[], |entry| entry.keywords)
    }
}

/// A category and its keyword set.
#[derive(Debug, Clone, Copy)]
pub struct KeywordCategory {
    pub category: Category,
    pub keywords: &'static [&'static str],
}

/// Markers among cardiac conditions that indicate high cardiac risk.
pub const HIGH_RISK_CARDIAC: &[&str] = &[
    "recent MI",
    "unstable angina",
    "decompensated heart failure",
    "decompensated CHF",
    "severe aortic stenosis",
];

/// Pulmonary conditions that predict difficult mask ventilation.
pub const SLEEP_APNEA: &[&str] = &["sleep apnea", "obstructive sleep apnea", "OSA"];

/// GLP-1 receptor agonists, which delay gastric emptying.
pub const GLP1_AGONISTS: &[&str] = &[
    "Semaglutide",
    "Ozempic",
    "Wegovy",
    "Tirzepatide",
    "Mounjaro",
    "Liraglutide",
    "Dulaglutide",
];

/// The keyword taxonomy.
pub const TAXONOMY: &[KeywordCategory] = &[
    KeywordCategory {
        category: Category::Cardiac,
        keywords: &[
            "hypertension",
            "HTN",
            "CAD",
            "coronary artery disease",
            "MI",
            "myocardial infarction",
            "recent MI",
            "CHF",
            "heart failure",
            "decompensated heart failure",
            "decompensated CHF",
            "angina",
            "unstable angina",
            "arrhythmia",
            "atrial fibrillation",
            "AFib",
            "valve disease",
            "aortic stenosis",
            "severe aortic stenosis",
            "cardiomyopathy",
        ],
    },
    KeywordCategory {
        category: Category::Pulmonary,
        keywords: &[
            "COPD",
            "asthma",
            "sleep apnea",
            "obstructive sleep apnea",
            "OSA",
            "pulmonary embolism",
            "pneumonia",
            "lung disease",
            "emphysema",
            "pulmonary fibrosis",
            "pulmonary hypertension",
        ],
    },
    KeywordCategory {
        category: Category::Renal,
        keywords: &[
            "chronic kidney disease",
            "CKD",
            "renal failure",
            "renal insufficiency",
            "dialysis",
            "ESRD",
            "kidney disease",
            "acute kidney injury",
            "AKI",
        ],
    },
    KeywordCategory {
        category: Category::Hepatic,
        keywords: &[
            "cirrhosis",
            "hepatitis",
            "liver disease",
            "liver failure",
            "fatty liver",
            "NASH",
            "portal hypertension",
        ],
    },
    KeywordCategory {
        category: Category::Neurologic,
        keywords: &[
            "stroke",
            "CVA",
            "TIA",
            "seizure",
            "epilepsy",
            "dementia",
            "Parkinson's disease",
            "multiple sclerosis",
            "myasthenia gravis",
            "neuropathy",
        ],
    },
    KeywordCategory {
        category: Category::Endocrine,
        keywords: &[
            "diabetes",
            "diabetic",
            "DM",
            "T2DM",
            "insulin",
            "metformin",
            "hypothyroidism",
            "hyperthyroidism",
            "adrenal insufficiency",
            "obesity",
        ],
    },
    KeywordCategory {
        category: Category::Anticoagulants,
        keywords: &[
            "Warfarin",
            "Coumadin",
            "Heparin",
            "Enoxaparin",
            "Lovenox",
            "Rivaroxaban",
            "Xarelto",
            "Apixaban",
            "Eliquis",
            "Dabigatran",
            "Pradaxa",
            "Aspirin",
            "Clopidogrel",
            "Plavix",
            "Ticagrelor",
        ],
    },
    KeywordCategory {
        category: Category::DiabeticMedications,
        keywords: &["Insulin", "Metformin", "Glipizide", "Glyburide"],
    },
    KeywordCategory {
        category: Category::CardiacMedications,
        keywords: &[
            "Beta Blocker",
            "ACE Inhibitor",
            "Lisinopril",
            "Metoprolol",
            "Atenolol",
            "Carvedilol",
            "Amlodipine",
            "Losartan",
            "Diltiazem",
            "Digoxin",
            "Amiodarone",
        ],
    },
    KeywordCategory {
        category: Category::OtherRelevantMedications,
        keywords: &[
            "Semaglutide",
            "Ozempic",
            "Wegovy",
            "Tirzepatide",
            "Mounjaro",
            "Liraglutide",
            "Dulaglutide",
            "Empagliflozin",
            "Dapagliflozin",
            "Prednisone",
            "Phenelzine",
            "MAOI",
            "Methadone",
            "Buprenorphine",
            "Lithium",
        ],
    },
    KeywordCategory {
        category: Category::AspirationMarkers,
        keywords: &[
            "not NPO",
            "recent meal",
            "full stomach",
            "gastroparesis",
            "GERD",
            "bowel obstruction",
            "hiatal hernia",
        ],
    },
    KeywordCategory {
        category: Category::BleedingMarkers,
        keywords: &[
            "anticoagulant",
            "anticoagulation",
            "bleeding disorder",
            "thrombocytopenia",
            "coagulopathy",
            "hemophilia",
            "von Willebrand",
        ],
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_category_has_keywords() {
        for category in Category::ALL {
            assert!(
                !category.keywords().is_empty(),
                "{} has no keywords",
                category.as_str()
            );
        }
    }

    #[test]
    fn test_keywords_unique_within_category() {
        for entry in TAXONOMY {
            let mut lowered: Vec<String> =
                entry.keywords.iter().map(|k| k.to_lowercase()).collect();
            lowered.sort();
            let before = lowered.len();
            lowered.dedup();
            assert_eq!(before, lowered.len(), "{}", entry.category.as_str());
        }
    }

    #[test]
    fn test_risk_marker_lists_are_in_taxonomy() {
        for marker in HIGH_RISK_CARDIAC {
            assert!(Category::Cardiac.keywords().contains(marker));
        }
        for marker in SLEEP_APNEA {
            assert!(Category::Pulmonary.keywords().contains(marker));
        }
        for drug in GLP1_AGONISTS {
            assert!(Category::OtherRelevantMedications.keywords().contains(drug));
        }
    }

    #[test]
    fn test_keywords_have_word_edges() {
        for entry in TAXONOMY {
            for keyword in entry.keywords {
                let first = keyword.chars().next().is_some_and(char::is_alphanumeric);
                let last = keyword.chars().last().is_some_and(char::is_alphanumeric);
                assert!(first && last, "{keyword} must start and end on a word char");
            }
        }
    }
}
