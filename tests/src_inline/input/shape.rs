use super::*;
use serde_json::json;

fn entry(id: &str) -> Value {
    json!({
        "sampleId": id,
        "raw": { "iod_total_cells": 100, "pos_cells_1_weak": 10 },
        "derived": { "h_score": 150, "irs": null }
    })
}

#[test]
fn test_cohort_must_be_an_array() {
    let err = parse_cohort(&json!({ "samples": [] }), "c1").unwrap_err();
    match err {
        VizError::InvalidInputShape(msg) => assert!(msg.contains("array")),
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn test_parse_cohort_reads_entries() {
    let cohort = parse_cohort(&json!([entry("a"), entry("b")]), "c1").unwrap();
    assert_eq!(cohort.len(), 2);
    let a = cohort.get("a").unwrap();
    assert_eq!(a.case_id, "c1");
    assert_eq!(a.analysis.raw.total_cells, Some(100.0));
    assert_eq!(a.analysis.derived.h_score, Some(150.0));
    assert_eq!(a.analysis.derived.irs, None);
}

#[test]
fn test_entries_from_other_cases_are_dropped() {
    let mut foreign = entry("x");
    foreign["caseId"] = json!("c2");
    let cohort = parse_cohort(&json!([entry("a"), foreign]), "c1").unwrap();
    assert_eq!(cohort.len(), 1);
    assert!(cohort.get("x").is_none());
}

#[test]
fn test_nested_analysis_is_accepted() {
    let value = json!({
        "sample_id": "n1",
        "analysis": { "raw": {}, "derived": { "mean_density": "0.11" } }
    });
    let target = parse_target(&value).unwrap();
    assert_eq!(target.sample_id, "n1");
    assert_eq!(target.analysis.derived.mean_density, Some(0.11));
}

#[test]
fn test_target_shape_violations() {
    let cases = [
        json!([1, 2]),
        json!({ "raw": {}, "derived": {} }),
        json!({ "sampleId": "s", "raw": 3, "derived": {} }),
        json!({ "sampleId": "s", "raw": {} }),
        json!({ "sampleId": "s", "raw": { "tissue_area_px": [1] }, "derived": {} }),
        json!({ "sampleId": "s", "raw": {}, "derived": { "irs": true } }),
    ];
    for value in cases {
        assert!(
            matches!(parse_target(&value), Err(VizError::InvalidInputShape(_))),
            "{value}"
        );
    }
}

#[test]
fn test_garbage_numbers_are_data_not_shape() {
    let value = json!({
        "sampleId": "s",
        "raw": { "tissue_area_px": "n/a" },
        "derived": { "h_score": "" }
    });
    let target = parse_target(&value).unwrap();
    assert_eq!(target.analysis.raw.tissue_area_px, None);
    assert_eq!(target.analysis.derived.h_score, None);
}

#[test]
fn test_error_names_the_entry() {
    let bad = json!([entry("a"), "oops"]);
    match parse_cohort(&bad, "c1") {
        Err(VizError::InvalidInputShape(msg)) => assert!(msg.starts_with("cohort[1]")),
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn test_check_snapshot() {
    assert!(check_snapshot(&json!({ "cases": [] })).is_ok());
    assert!(check_snapshot(&json!([])).is_err());
    assert!(check_snapshot(&json!({ "cases": {} })).is_err());
    assert!(check_snapshot(&json!({ "cases": [{ "samples": [{ "analysis": 5 }] }] })).is_err());
    assert!(check_snapshot(&json!({ "cases": [{ "samples": [{ "analysis": null }] }] })).is_ok());
}

#[test]
fn test_target_decodes_like_the_typed_analysis() {
    let record = json!({
        "raw": {
            "pos_cells_1_weak": "12",
            "pos_cells_2_moderate": 8,
            "iod_total_cells": 40.0,
            "tissue_area_px": "n/a",
            "stain": "DAB"
        },
        "derived": { "h_score": 150, "irs": null, "mean_density": " 0.25 " }
    });
    let mut value = record.clone();
    value["sampleId"] = json!("s");
    let target = parse_target(&value).unwrap();
    let typed: TissueAnalysis = serde_json::from_value(record).unwrap();
    assert_eq!(target.analysis, typed);
    assert_eq!(target.analysis.raw.weak_cells, Some(12.0));
    assert_eq!(target.analysis.derived.mean_density, Some(0.25));
}
