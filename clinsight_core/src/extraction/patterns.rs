//! Pattern library for single-valued chart fields.
//!
//! Each [`PatternDef`] binds one regular expression to one [`Field`]. Rules
//! for the same field are tried in the order they are declared here; the
//! first rule that matches anywhere in the text wins, so declaration order is
//! the priority.
//!
//! Numeric fields that could collide (weight and height) are anchored on
//! disjoint unit tokens so one number can never satisfy both.

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::BuildError;

/// A single-valued field of the clinical record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Age,
    Weight,
    Height,
    Gender,
    AsaStatus,
    Allergies,
    DeviceImplants,
    NpoStatus,
    Mallampati,
    MouthOpening,
    NeckMobility,
    ThyromentalDistance,
    Dentition,
    PredictedDifficulty,
    Hemoglobin,
    PlateletCount,
    InrPtPtt,
    Creatinine,
    Glucose,
    Electrolytes,
    Procedure,
    SurgicalPosition,
    EstimatedDuration,
    Surgeon,
    Approach,
    SpecialMonitoring,
    VascularAccess,
    BloodProducts,
    RegionalAnesthesia,
    TemperatureManagement,
    FluidManagement,
    PlannedDisposition,
    PainManagement,
    IcuMonitoring,
    VentilatorWeaning,
}

impl Field {
    /// Every field, in record order.
    pub const ALL: [Self; 35] = [
        Self::Age,
        Self::Weight,
        Self::Height,
        Self::Gender,
        Self::AsaStatus,
        Self::Allergies,
        Self::DeviceImplants,
        Self::NpoStatus,
        Self::Mallampati,
        Self::MouthOpening,
        Self::NeckMobility,
        Self::ThyromentalDistance,
        Self::Dentition,
        Self::PredictedDifficulty,
        Self::Hemoglobin,
        Self::PlateletCount,
        Self::InrPtPtt,
        Self::Creatinine,
        Self::Glucose,
        Self::Electrolytes,
        Self::Procedure,
        Self::SurgicalPosition,
        Self::EstimatedDuration,
        Self::Surgeon,
        Self::Approach,
        Self::SpecialMonitoring,
        Self::VascularAccess,
        Self::BloodProducts,
        Self::RegionalAnesthesia,
        Self::TemperatureManagement,
        Self::FluidManagement,
        Self::PlannedDisposition,
        Self::PainManagement,
        Self::IcuMonitoring,
        Self::VentilatorWeaning,
    ];

    /// Returns the JSON key of this field.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Age => "age",
            Self::Weight => "weight",
            Self::Height => "height",
            Self::Gender => "gender",
            Self::AsaStatus => "asa_status",
            Self::Allergies => "allergies",
            Self::DeviceImplants => "device_implants",
            Self::NpoStatus => "npo_status",
            Self::Mallampati => "mallampati",
            Self::MouthOpening => "mouth_opening",
            Self::NeckMobility => "neck_mobility",
            Self::ThyromentalDistance => "thyromental_distance",
            Self::Dentition => "dentition",
            Self::PredictedDifficulty => "predicted_difficulty",
            Self::Hemoglobin => "hemoglobin",
            Self::PlateletCount => "platelet_count",
            Self::InrPtPtt => "inr_pt_ptt",
            Self::Creatinine => "creatinine",
            Self::Glucose => "glucose",
            Self::Electrolytes => "electrolytes",
            Self::Procedure => "procedure",
            Self::SurgicalPosition => "surgical_position",
            Self::EstimatedDuration => "estimated_duration",
            Self::Surgeon => "surgeon",
            Self::Approach => "approach",
            Self::SpecialMonitoring => "special_monitoring",
            Self::VascularAccess => "vascular_access",
            Self::BloodProducts => "blood_products",
            Self::RegionalAnesthesia => "regional_anesthesia",
            Self::TemperatureManagement => "temperature_management",
            Self::FluidManagement => "fluid_management",
            Self::PlannedDisposition => "planned_disposition",
            Self::PainManagement => "pain_management",
            Self::IcuMonitoring => "icu_monitoring",
            Self::VentilatorWeaning => "ventilator_weaning",
        }
    }
}

/// Letter-case adjustment applied to a captured value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Case {
    /// Keep the text's own casing.
    #[default]
    AsIs,
    Upper,
    /// Capitalize the first letter of every alphabetic run.
    Title,
}

impl Case {
    fn apply(self, value: &str) -> String {
        match self {
            Self::AsIs => value.to_string(),
            Self::Upper => value.to_uppercase(),
            Self::Title => title_case(value),
        }
    }
}

/// How a captured group becomes the field value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Render {
    /// Substitute the (case-adjusted) capture for the first `{}`.
    Template {
        template: String,
        #[serde(default)]
        case: Case,
    },
    /// Emit a fixed literal whenever the rule matches.
    Fixed { value: String },
    /// Map `m`/`male`/`man` and `f`/`female`/`woman` to `Male`/`Female`.
    Sex,
}

impl Render {
    /// The capture exactly as written.
    #[must_use]
    pub fn verbatim() -> Self {
        Self::Template {
            template: "{}".to_string(),
            case: Case::AsIs,
        }
    }

    #[must_use]
    pub fn title() -> Self {
        Self::Template {
            template: "{}".to_string(),
            case: Case::Title,
        }
    }

    /// Append a unit suffix: `"11.8"` becomes `"11.8 g/dL"`.
    #[must_use]
    pub fn unit(unit: &str) -> Self {
        Self::Template {
            template: format!("{{}} {unit}"),
            case: Case::AsIs,
        }
    }

    /// Prefix a label and upper-case the capture: `"iii"` becomes `"ASA III"`.
    #[must_use]
    pub fn label(label: &str) -> Self {
        Self::Template {
            template: format!("{label} {{}}"),
            case: Case::Upper,
        }
    }

    #[must_use]
    pub fn fixed(value: &str) -> Self {
        Self::Fixed {
            value: value.to_string(),
        }
    }

    /// Render a trimmed capture. `None` means the capture is not acceptable.
    #[must_use]
    pub fn apply(&self, captured: &str) -> Option<String> {
        match self {
            Self::Template { template, case } => {
                Some(template.replacen("{}", &case.apply(captured), 1))
            }
            Self::Fixed { value } => Some(value.clone()),
            Self::Sex => match captured.to_lowercase().as_str() {
                "m" | "male" | "man" => Some("Male".to_string()),
                "f" | "female" | "woman" => Some("Female".to_string()),
                _ => None,
            },
        }
    }
}

/// Capitalize the first letter of every alphabetic run, lower-case the rest.
#[must_use]
pub fn title_case(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut in_word = false;
    for c in value.chars() {
        if c.is_alphabetic() {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(c);
            in_word = false;
        }
    }
    out
}

/// Definition of a single extraction rule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatternDef {
    /// Unique identifier for this rule.
    pub id: String,

    /// The field this rule fills.
    pub field: Field,

    /// Regex pattern to match text.
    pub pattern: String,

    /// Capture group holding the value (0 is the whole match).
    #[serde(default = "default_group")]
    pub group: usize,

    /// How the capture becomes the field value.
    pub render: Render,

    /// Captures shorter than this (after trimming) do not count as a match.
    #[serde(default)]
    pub min_len: usize,
}

const fn default_group() -> usize {
    1
}

impl PatternDef {
    /// Create a rule reading capture group 1.
    #[must_use]
    pub fn new(id: &str, field: Field, pattern: &str, render: Render) -> Self {
        Self {
            id: id.to_string(),
            field,
            pattern: pattern.to_string(),
            group: default_group(),
            render,
            min_len: 0,
        }
    }

    /// Read a different capture group.
    #[must_use]
    pub const fn with_group(mut self, group: usize) -> Self {
        self.group = group;
        self
    }

    /// Reject captures shorter than `min_len` characters.
    #[must_use]
    pub const fn with_min_len(mut self, min_len: usize) -> Self {
        self.min_len = min_len;
        self
    }

    /// Compile into a [`FieldPattern`].
    ///
    /// # Errors
    /// Returns an error if the regex is invalid or lacks the configured group.
    pub fn build(&self) -> Result<FieldPattern, BuildError> {
        let regex = Regex::new(&self.pattern).map_err(|source| BuildError::Regex {
            id: self.id.clone(),
            source,
        })?;

        if self.group >= regex.captures_len() {
            return Err(BuildError::MissingGroup {
                id: self.id.clone(),
                group: self.group,
            });
        }

        Ok(FieldPattern {
            id: self.id.clone(),
            field: self.field,
            regex,
            group: self.group,
            render: self.render.clone(),
            min_len: self.min_len,
        })
    }
}

/// A compiled extraction rule.
#[derive(Debug, Clone)]
pub struct FieldPattern {
    pub id: String,
    pub field: Field,
    pub regex: Regex,
    pub group: usize,
    pub render: Render,
    pub min_len: usize,
}

impl FieldPattern {
    /// Apply this rule to `text`, returning the rendered value on a match.
    #[must_use]
    pub fn apply(&self, text: &str) -> Option<String> {
        let caps = self.regex.captures(text)?;
        let captured = caps.get(self.group)?.as_str().trim();
        if captured.is_empty() || captured.chars().count() < self.min_len {
            return None;
        }
        self.render.apply(captured)
    }
}

/// The built-in rule set, grouped by record section.
#[must_use]
pub fn default_patterns() -> Vec<PatternDef> {
    let mut patterns = Vec::new();
    patterns.extend(demographic_patterns());
    patterns.extend(pre_operative_patterns());
    patterns.extend(airway_patterns());
    patterns.extend(laboratory_patterns());
    patterns.extend(surgical_plan_patterns());
    patterns.extend(intra_operative_patterns());
    patterns.extend(post_operative_patterns());
    patterns
}

fn demographic_patterns() -> Vec<PatternDef> {
    vec![
        PatternDef::new(
            "age_label",
            Field::Age,
            r"(?i)\bage[ \t]*:?[ \t]*(\d{1,3})\b",
            Render::unit("years"),
        ),
        PatternDef::new(
            "age_years_old",
            Field::Age,
            r"(?i)\b(\d{1,3})[-\s]?(?:years?|yrs?|yo|y/o)\b",
            Render::unit("years"),
        ),
        PatternDef::new(
            "age_abbrev",
            Field::Age,
            r"(?i)\b(\d{1,3})[ \t]?y\.o\.?",
            Render::unit("years"),
        ),
        PatternDef::new(
            "weight_label",
            Field::Weight,
            r"(?i)\bweight[ \t]*:?[ \t]*(\d+(?:\.\d+)?[ \t]*(?:kg|lbs?|pounds?))\b",
            Render::verbatim(),
        ),
        PatternDef::new(
            "weight_unit",
            Field::Weight,
            r"(?i)\b(\d+(?:\.\d+)?[ \t]*(?:kg|lbs?|pounds?))\b",
            Render::verbatim(),
        ),
        PatternDef::new(
            "height_label",
            Field::Height,
            r"(?i)\bheight[ \t]*:?[ \t]*(\d+(?:\.\d+)?[ \t]*(?:cm|m|inches|inch|in|ft|feet))\b",
            Render::verbatim(),
        ),
        PatternDef::new(
            "height_unit",
            Field::Height,
            r"(?i)\b(\d+(?:\.\d+)?[ \t]*(?:cm|inches|inch))\b",
            Render::verbatim(),
        ),
        PatternDef::new(
            "gender_label",
            Field::Gender,
            r"(?i)\b(?:gender|sex)[ \t]*:?[ \t]*(female|male|f|m)\b",
            Render::Sex,
        ),
        PatternDef::new(
            "gender_word",
            Field::Gender,
            r"(?i)\b(female|male|woman|man)\b",
            Render::Sex,
        ),
    ]
}

fn pre_operative_patterns() -> Vec<PatternDef> {
    vec![
        PatternDef::new(
            "asa_class",
            Field::AsaStatus,
            r"(?i)\bASA[ \t]*(?:physical[ \t]+status|status|class(?:ification)?)?[ \t]*:?[ \t]*(VI|IV|V|I{1,3}|[1-6])(?-i:E)?\b",
            Render::label("ASA"),
        ),
        PatternDef::new(
            "asa_long_form",
            Field::AsaStatus,
            r"(?i)American Society of Anesthesiologists[^\n]*?\b(VI|IV|V|I{1,3}|[1-6])(?-i:E)?\b",
            Render::label("ASA"),
        ),
        PatternDef::new(
            "allergies_none_known",
            Field::Allergies,
            r"(?i)\b(?:NKDA|NKA|no known (?:drug )?allergies)\b",
            Render::fixed("NKDA (No Known Drug Allergies)"),
        )
        .with_group(0),
        PatternDef::new(
            "allergies_label",
            Field::Allergies,
            r"(?i)\ballerg(?:ies|y)[ \t]*:[ \t]*(?:\r?\n[ \t]*)?(?:-[ \t]*)?([^.\r\n]+)",
            Render::title(),
        )
        .with_min_len(3),
        PatternDef::new(
            "allergic_to",
            Field::Allergies,
            r"(?i)\ballergic[ \t]+to[ \t]*:?[ \t]*([^.\r\n]+)",
            Render::title(),
        )
        .with_min_len(3),
        PatternDef::new(
            "device_label",
            Field::DeviceImplants,
            r"(?i)\b(?:implants?|devices?|implanted devices?)[ \t]*:[ \t]*([^.\r\n]+)",
            Render::title(),
        )
        .with_min_len(3),
        PatternDef::new(
            "device_named",
            Field::DeviceImplants,
            r"(?i)\b(pacemaker|AICD|implantable cardioverter[- ]defibrillator|defibrillator|LVAD|spinal cord stimulator|deep brain stimulator|vagal nerve stimulator|insulin pump|cochlear implant)\b",
            Render::verbatim(),
        ),
        PatternDef::new(
            "npo_negated",
            Field::NpoStatus,
            r"(?i)\bnot[ \t]+NPO\b",
            Render::fixed("Not NPO"),
        )
        .with_group(0),
        PatternDef::new(
            "npo_since",
            Field::NpoStatus,
            r"(?i)\bNPO[ \t]+(?:since|after|from|for|x)[ \t]+[^.,;\r\n]+",
            Render::verbatim(),
        )
        .with_group(0),
        PatternDef::new(
            "npo_bare",
            Field::NpoStatus,
            r"(?i)\b(?:NPO|nil per os|fasting)\b",
            Render::fixed("NPO"),
        )
        .with_group(0),
    ]
}

fn airway_patterns() -> Vec<PatternDef> {
    vec![
        PatternDef::new(
            "mallampati_class",
            Field::Mallampati,
            r"(?i)\bmallampati(?:[ \t]+(?:class|score|grade))?[ \t]*:?[ \t]*(IV|I{1,3}|[1-4])\b",
            Render::label("Class"),
        ),
        PatternDef::new(
            "mouth_opening_measured",
            Field::MouthOpening,
            r"(?i)\bmouth[ \t]+opening[ \t]*:?[ \t]*(\d+(?:\.\d+)?[ \t]*(?:cm|fingerbreadths?|FB))\b",
            Render::verbatim(),
        ),
        PatternDef::new(
            "mouth_opening_described",
            Field::MouthOpening,
            r"(?i)\bmouth[ \t]+opening[ \t]*:?[ \t]*(adequate|normal|limited|reduced|restricted)\b",
            Render::title(),
        ),
        PatternDef::new(
            "neck_mobility_label",
            Field::NeckMobility,
            r"(?i)\bneck[ \t]+(?:mobility|ROM|range of motion|extension)[ \t]*:?[ \t]*(full|normal|good|limited|reduced|restricted|decreased)\b",
            Render::title(),
        ),
        PatternDef::new(
            "neck_mobility_prefix",
            Field::NeckMobility,
            r"(?i)\b(full|normal|good|limited|reduced|restricted|decreased)[ \t]+(?:neck|cervical)[ \t]+(?:mobility|ROM|range of motion|extension)\b",
            Render::title(),
        ),
        PatternDef::new(
            "thyromental_measured",
            Field::ThyromentalDistance,
            r"(?i)\b(?:thyromental[ \t]+distance|TMD)[ \t]*:?[ \t]*([<>]?[ \t]*\d+(?:\.\d+)?[ \t]*(?:cm|fingerbreadths?|FB))\b",
            Render::verbatim(),
        ),
        PatternDef::new(
            "thyromental_described",
            Field::ThyromentalDistance,
            r"(?i)\b(?:thyromental[ \t]+distance|TMD)[ \t]*:?[ \t]*(adequate|normal|short|reduced)\b",
            Render::title(),
        ),
        PatternDef::new(
            "dentition_label",
            Field::Dentition,
            r"(?i)\b(?:dentition|teeth)[ \t]*:[ \t]*([^.\r\n]+)",
            Render::title(),
        )
        .with_min_len(3),
        PatternDef::new(
            "dentition_named",
            Field::Dentition,
            r"(?i)\b(edentulous|full dentures|partial dentures|dentures|loose teeth|poor dentition|dental caps|crowns|intact dentition)\b",
            Render::title(),
        ),
        PatternDef::new(
            "predicted_difficulty",
            Field::PredictedDifficulty,
            r"(?i)\b(?:difficult airway|difficult intubation|difficult mask ventilation|short neck|limited neck mobility)\b",
            Render::fixed("Potentially difficult"),
        )
        .with_group(0),
    ]
}

fn laboratory_patterns() -> Vec<PatternDef> {
    vec![
        PatternDef::new(
            "hemoglobin",
            Field::Hemoglobin,
            r"(?i)\b(?:hemoglobin|haemoglobin|hgb|hb)\b[ \t]*:?[ \t]*(\d+(?:\.\d+)?)",
            Render::unit("g/dL"),
        ),
        PatternDef::new(
            "platelets",
            Field::PlateletCount,
            r"(?i)\b(?:platelets?|plt)(?:[ \t]+count)?\b[ \t]*:?[ \t]*(\d+(?:\.\d+)?)",
            Render::unit("K/uL"),
        ),
        PatternDef::new(
            "inr",
            Field::InrPtPtt,
            r"(?i)\bINR\b[ \t]*:?[ \t]*(\d+(?:\.\d+)?)",
            Render::label("INR"),
        ),
        PatternDef::new(
            "ptt",
            Field::InrPtPtt,
            r"(?i)\ba?PTT\b[ \t]*:?[ \t]*(\d+(?:\.\d+)?)",
            Render::label("PTT"),
        ),
        PatternDef::new(
            "pt_seconds",
            Field::InrPtPtt,
            r"(?i)\bPT\b[ \t]*:?[ \t]*(\d+(?:\.\d+)?)[ \t]*(?:s|sec|seconds)\b",
            Render::label("PT"),
        ),
        PatternDef::new(
            "creatinine",
            Field::Creatinine,
            r"(?i)\b(?:creatinine|cr)\b[ \t]*:?[ \t]*(\d+(?:\.\d+)?)",
            Render::unit("mg/dL"),
        ),
        PatternDef::new(
            "glucose",
            Field::Glucose,
            r"(?i)\b(?:glucose|blood sugar|BG|FSBG)\b[ \t]*:?[ \t]*(\d+(?:\.\d+)?)",
            Render::unit("mg/dL"),
        ),
        PatternDef::new(
            "potassium",
            Field::Electrolytes,
            r"(?i)\b(?:potassium|K\+?)[ \t]*:?[ \t]*(\d(?:\.\d+)?)\b",
            Render::Template {
                template: "K {} mEq/L".to_string(),
                case: Case::AsIs,
            },
        ),
        PatternDef::new(
            "sodium",
            Field::Electrolytes,
            r"(?i)\b(?:sodium|Na\+?)[ \t]*:?[ \t]*(1\d\d(?:\.\d+)?)\b",
            Render::Template {
                template: "Na {} mEq/L".to_string(),
                case: Case::AsIs,
            },
        ),
    ]
}

fn surgical_plan_patterns() -> Vec<PatternDef> {
    let positions = [
        ("position_reverse_trendelenburg", "reverse trendelenburg"),
        ("position_trendelenburg", "trendelenburg"),
        ("position_beach_chair", "beach chair"),
        ("position_lithotomy", "lithotomy"),
        ("position_prone", "prone"),
        ("position_supine", "supine"),
        ("position_lateral_decubitus", "lateral decubitus"),
        ("position_lateral", "lateral"),
        ("position_sitting", "sitting"),
        ("position_jackknife", "jackknife"),
    ];

    let mut patterns = vec![
        PatternDef::new(
            "procedure_label",
            Field::Procedure,
            r"(?i)\b(?:planned[ \t]+)?(?:procedure|surgery|operation)\b[ \t]*:[ \t]*([^.\r\n]+)",
            Render::title(),
        )
        .with_min_len(4),
        PatternDef::new(
            "procedure_scheduled",
            Field::Procedure,
            r"(?i)\bscheduled[ \t]+for[ \t]*:?[ \t]*([^.\r\n]+)",
            Render::title(),
        )
        .with_min_len(4),
        PatternDef::new(
            "procedure_undergoing",
            Field::Procedure,
            r"(?i)\bundergoing[ \t]*:?[ \t]*([^.\r\n]+)",
            Render::title(),
        )
        .with_min_len(4),
    ];

    patterns.extend(positions.iter().map(|(id, position)| {
        PatternDef::new(
            id,
            Field::SurgicalPosition,
            &format!(r"(?i)\b({})\b", position.replace(' ', r"[ \t]+")),
            Render::title(),
        )
    }));

    patterns.extend([
        PatternDef::new(
            "duration",
            Field::EstimatedDuration,
            r"(?i)\b(?:estimated[ \t]+)?(?:duration|time)[ \t]*:?[ \t]*(\d+(?:\.\d+)?[ \t]*(?:hours?|hrs?|minutes?|mins?))\b",
            Render::verbatim(),
        ),
        PatternDef::new(
            "surgeon_label",
            Field::Surgeon,
            r"(?i:\bsurgeon)[ \t]*:?[ \t]*((?:Dr\.?[ \t]+)?[A-Z][\w'-]*(?:[ \t]+[A-Z][\w'-]*)?)",
            Render::verbatim(),
        ),
        PatternDef::new(
            "approach_named",
            Field::Approach,
            r"(?i)\b(robotic|robot-assisted|laparoscopic|thoracoscopic|arthroscopic|endoscopic|percutaneous|minimally invasive)\b",
            Render::title(),
        ),
        PatternDef::new(
            "approach_open",
            Field::Approach,
            r"(?i)\b(open)[ \t]+(?:approach|repair|reduction|procedure|surgery|laparotomy)\b",
            Render::title(),
        ),
    ]);

    patterns
}

fn intra_operative_patterns() -> Vec<PatternDef> {
    vec![
        PatternDef::new(
            "monitoring_label",
            Field::SpecialMonitoring,
            r"(?i)\bmonitoring[ \t]*:[ \t]*([^.\r\n]+)",
            Render::verbatim(),
        )
        .with_min_len(3),
        PatternDef::new(
            "monitoring_named",
            Field::SpecialMonitoring,
            r"(?i)\b(arterial line|a-line|art line|central venous pressure monitoring|CVP monitoring|TEE|transesophageal echo(?:cardiography)?|BIS monitor(?:ing)?|neuromonitoring|SSEP|pulmonary artery catheter|swan[- ]ganz)\b",
            Render::verbatim(),
        ),
        PatternDef::new(
            "access_label",
            Field::VascularAccess,
            r"(?i)\b(?:IV|vascular)[ \t]+access[ \t]*:[ \t]*([^.\r\n]+)",
            Render::verbatim(),
        )
        .with_min_len(3),
        PatternDef::new(
            "access_named",
            Field::VascularAccess,
            r"(?i)\b(central line|central venous catheter|PICC(?: line)?|large[- ]bore (?:PIV|IV)s?|\d{2}[ \t]?(?:g|gauge) (?:PIV|IV)s?|port-a-cath)\b",
            Render::verbatim(),
        ),
        PatternDef::new(
            "blood_products_named",
            Field::BloodProducts,
            r"(?i)\b(type and cross(?:match)?|type and screen|(?:\d+[ \t]+units?[ \t]+(?:of[ \t]+)?)?(?:PRBCs?|packed red blood cells|FFP|fresh frozen plasma|cryoprecipitate))\b",
            Render::verbatim(),
        ),
        PatternDef::new(
            "regional_named",
            Field::RegionalAnesthesia,
            r"(?i)\b(epidural|spinal anesthesia|spinal block|interscalene block|supraclavicular block|femoral nerve block|adductor canal block|TAP block|paravertebral block|erector spinae(?: plane)? block|peripheral nerve block|nerve block|regional anesthesia)\b",
            Render::title(),
        ),
        PatternDef::new(
            "temperature_named",
            Field::TemperatureManagement,
            r"(?i)\b(forced[- ]air warm(?:ing|er)|bair hugger|warming blanket|fluid warmer|active warming|normothermia|therapeutic hypothermia)\b",
            Render::title(),
        ),
        PatternDef::new(
            "fluid_label",
            Field::FluidManagement,
            r"(?i)\bfluids?(?:[ \t]+management)?[ \t]*:[ \t]*([^.\r\n]+)",
            Render::verbatim(),
        )
        .with_min_len(3),
        PatternDef::new(
            "fluid_named",
            Field::FluidManagement,
            r"(?i)\b(goal[- ]directed fluid therapy|restrictive fluid (?:strategy|management)|liberal fluid (?:strategy|management)|fluid restriction|euvolemia)\b",
            Render::title(),
        ),
    ]
}

fn post_operative_patterns() -> Vec<PatternDef> {
    vec![
        PatternDef::new(
            "disposition_label",
            Field::PlannedDisposition,
            r"(?i)\b(?:disposition|dispo)[ \t]*:[ \t]*([^.\r\n]+)",
            Render::title(),
        )
        .with_min_len(3),
        PatternDef::new(
            "disposition_named",
            Field::PlannedDisposition,
            r"(?i)\b(same[- ]day discharge|ambulatory|outpatient|overnight observation|23[- ]hour observation|admit to (?:the )?(?:floor|ward|ICU|step[- ]?down))\b",
            Render::title(),
        ),
        PatternDef::new(
            "pain_label",
            Field::PainManagement,
            r"(?i)\bpain[ \t]+(?:management|plan|control)[ \t]*:[ \t]*([^.\r\n]+)",
            Render::verbatim(),
        )
        .with_min_len(3),
        PatternDef::new(
            "pain_named",
            Field::PainManagement,
            r"(?i)\b(PCA|patient[- ]controlled analgesia|multimodal analgesia|epidural analgesia|opioid[- ]sparing(?: analgesia)?|nerve block catheter)\b",
            Render::verbatim(),
        ),
        PatternDef::new(
            "icu_admission",
            Field::IcuMonitoring,
            r"(?i)\b(?:(?:ICU|SICU|CVICU|intensive care unit)[ \t]+(?:admission|bed|monitoring|stay)|admit(?:ted)?[ \t]+to[ \t]+(?:the[ \t]+)?(?:ICU|SICU|CVICU|intensive care))\b",
            Render::fixed("ICU admission planned"),
        )
        .with_group(0),
        PatternDef::new(
            "ventilation_named",
            Field::VentilatorWeaning,
            r"(?i)\b(remain intubated|keep intubated|planned extubation|deep extubation|awake extubation|ventilator weaning|wean(?:ing)? from (?:the )?ventilator|postoperative ventilation|prolonged ventilation)\b",
            Render::title(),
        ),
    ]
}
