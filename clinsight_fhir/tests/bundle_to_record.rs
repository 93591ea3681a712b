//! A FHIR bundle flows through chart text into the same record as the
//! hand-written chart.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use clinsight_core::{InsightAssembler, NOT_FOUND, RiskLevel};
use clinsight_fhir::PatientBundle;

const BUNDLE: &str = include_str!("../../demos/jane_smith_bundle.json");
const JANE_SMITH: &str = include_str!("../../demos/jane_smith.txt");

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 1).unwrap_or_default()
}

fn processed_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 8, 30, 0)
        .single()
        .unwrap_or_default()
}

#[expect(clippy::expect_used, reason = "Test failure should panic with context")]
fn bundle() -> PatientBundle {
    PatientBundle::from_json_str(BUNDLE).expect("demo bundle should parse")
}

#[test]
fn test_chart_text_matches_hand_written_chart() {
    let expected = JANE_SMITH.replace("ASA III\n", "");
    assert_eq!(bundle().to_chart_text(today()), expected.trim_end());
}

#[test]
fn test_bundle_record_matches_chart_record() {
    let assembler = InsightAssembler::standard();
    let from_bundle = assembler.assemble_at(&bundle().to_chart_text(today()), processed_at());
    let from_chart = assembler.assemble_at(JANE_SMITH, processed_at());

    assert_eq!(from_bundle.patient_info, from_chart.patient_info);
    assert_eq!(
        from_bundle.pre_operative.comorbidities,
        from_chart.pre_operative.comorbidities
    );
    assert_eq!(
        from_bundle.pre_operative.medications,
        from_chart.pre_operative.medications
    );
    assert_eq!(
        from_bundle.pre_operative.laboratory_values,
        from_chart.pre_operative.laboratory_values
    );
    assert_eq!(from_bundle.risk_assessment, from_chart.risk_assessment);

    assert_eq!(from_bundle.pre_operative.asa_status.as_str(), NOT_FOUND);
    assert_eq!(
        from_bundle.pre_operative.allergies.as_str(),
        "Penicillin (Rash)"
    );
    assert_eq!(from_bundle.risk_assessment.cardiac_risk, RiskLevel::Moderate);
}

#[test]
#[expect(clippy::expect_used, reason = "Test failure should panic with context")]
fn test_bundle_from_reader() {
    let parsed = PatientBundle::from_reader(BUNDLE.as_bytes()).expect("reader should parse");
    assert_eq!(parsed.conditions.len(), 3);
    assert_eq!(parsed.observations.len(), 2);
    assert!(parsed.procedures.is_empty());
}
