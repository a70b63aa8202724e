use std::fs;

use tempfile::tempdir;

use super::generator::{generate, label, leadership_label};
use super::io::{csv_columns, read_records, record_from_value, write_records, DatasetFormat};
use crate::error::ScoringError;
use crate::logic::features::BaseFeatures;
use crate::logic::personnel::{validate_record, LeadershipPotential, PersonnelRecord};
use crate::logic::scoring::formulas::{attrition_risk_points, readiness_score};

#[test]
fn test_generation_is_seeded() {
    assert_eq!(generate(25, 7), generate(25, 7));
    assert_ne!(generate(25, 7), generate(25, 8));
}

#[test]
fn test_generated_records_are_valid_and_labelled() {
    let records = generate(200, 42);
    assert_eq!(records.len(), 200);
    assert_eq!(records[0].id, "IAF_000001");
    assert_eq!(records[199].id, "IAF_000200");

    for r in &records {
        validate_record(r).unwrap();
        assert!(r.rank.is_some());
        assert!(!r.skills.is_empty());

        let base = BaseFeatures::resolve(r);
        assert_eq!(r.readiness_score, Some(readiness_score(&base)));
        assert_eq!(
            r.leadership_potential,
            Some(leadership_label(base.leadership_score, base.peer_review_score))
        );
        if r.attrition_risk == Some(true) {
            assert!(attrition_risk_points(&base) > 40);
        }
    }
}

#[test]
fn test_leadership_label_rule() {
    assert_eq!(leadership_label(8.0, 8.0), LeadershipPotential::High);
    assert_eq!(leadership_label(9.0, 7.0), LeadershipPotential::Medium);
    assert_eq!(leadership_label(6.0, 10.0), LeadershipPotential::Medium);
    assert_eq!(leadership_label(5.0, 10.0), LeadershipPotential::Low);
}

#[test]
fn test_attrition_label_depends_on_draw() {
    let mut r = PersonnelRecord::default();
    r.engagement_score = Some(50.0);
    r.disciplinary_actions = Some(2.0);

    label(&mut r, 0.9);
    assert_eq!(r.attrition_risk, Some(true));
    label(&mut r, 0.5);
    assert_eq!(r.attrition_risk, Some(false));
}

#[test]
fn test_dataset_round_trip_every_format() {
    let dir = tempdir().unwrap();
    let records = generate(10, 3);

    for name in ["people.json", "people.jsonl", "people.csv"] {
        let path = dir.path().join(name);
        assert_eq!(write_records(&path, &records).unwrap(), 10);
        assert_eq!(read_records(&path).unwrap(), records);
    }
}

#[test]
fn test_read_loose_mapping() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("loose.jsonl");
    fs::write(
        &path,
        "{\"id\": \"IAF_000009\", \"fitness_score\": \"88\", \"skills_str\": \"Avionics,Logistics\"}\n\n",
    )
    .unwrap();

    let records = read_records(&path).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].fitness_score, Some(88.0));
    assert_eq!(records[0].skills.len(), 2);
}

#[test]
fn test_csv_header_and_sparse_rows() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("personnel_data.csv");
    fs::write(
        &path,
        "id,name,rank,fitness_score,skills,attrition_risk,readiness_score\n\
         IAF_000001,Officer_1,Wing Commander,88,\"Avionics,Logistics\",True,81.5\n\
         IAF_000002,Officer_2,,,,False,\n",
    )
    .unwrap();

    let records = read_records(&path).unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].fitness_score, Some(88.0));
    assert_eq!(records[0].skills.len(), 2);
    assert_eq!(records[0].attrition_risk, Some(true));
    assert_eq!(records[0].readiness_score, Some(81.5));
    assert_eq!(records[1].rank, None);
    assert_eq!(records[1].fitness_score, None);
    assert_eq!(records[1].attrition_risk, Some(false));

    let written = dir.path().join("out.csv");
    write_records(&written, &records).unwrap();
    let header = fs::read_to_string(&written).unwrap();
    let first_line = header.lines().next().unwrap().to_string();
    assert_eq!(first_line, csv_columns().join(","));
}

#[test]
fn test_record_must_be_an_object() {
    let err = record_from_value(&serde_json::json!(["IAF_000001"])).unwrap_err();
    assert!(matches!(err, ScoringError::InvalidField { ref field, .. } if field == "record"));
}

#[test]
fn test_unsupported_extension() {
    assert_eq!(
        DatasetFormat::from_path(std::path::Path::new("people.csv")).unwrap(),
        DatasetFormat::Csv
    );
    assert!(matches!(
        DatasetFormat::from_path(std::path::Path::new("people.xlsx")),
        Err(ScoringError::InvalidField { .. })
    ));
}
