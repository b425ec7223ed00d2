use super::*;

const SNAPSHOT: &str = r#"{
  "cases": [
    {
      "id": "case-1",
      "identifier": "BC-001",
      "samples": [
        {
          "id": "s-1",
          "modality": "组织切片",
          "display_name": "Left lobe",
          "analysis": {
            "raw": { "iod_total_cells": 5060, "tissue_area_mm2": 1.8 },
            "derived": { "positive_cells_ratio": 82, "h_score": "186" }
          }
        },
        {
          "id": "s-2",
          "modality": "tissue",
          "original_filename": "slide-2.svs",
          "analysis": { "raw": {}, "derived": { "irs": 8 } }
        },
        { "id": "s-3", "modality": "组织切片" },
        {
          "id": "ct-1",
          "modality": "CT片",
          "analysis": { "raw": {}, "derived": { "irs": 2 } }
        },
        {
          "id": "x-1",
          "case_id": "case-2",
          "modality": "组织切片",
          "analysis": { "raw": {}, "derived": { "irs": 12 } }
        }
      ]
    },
    { "id": "case-2", "identifier": "BC-002", "samples": [] }
  ]
}"#;

#[test]
fn test_find_case_by_id_or_identifier() {
    let snap = parse_snapshot(SNAPSHOT, RatioConvention::Fraction).unwrap();
    assert_eq!(snap.find_case("case-1").unwrap().identifier, "BC-001");
    assert_eq!(snap.find_case("BC-002").unwrap().id, "case-2");
    assert!(matches!(
        snap.find_case("missing"),
        Err(VizError::CaseNotFound(_))
    ));
}

#[test]
fn test_cohort_keeps_analyzed_tissue_of_the_case_only() {
    let snap = parse_snapshot(SNAPSHOT, RatioConvention::Fraction).unwrap();
    let cohort = Cohort::for_case(snap.find_case("case-1").unwrap());
    let ids: Vec<&str> = cohort.samples().iter().map(|s| s.sample_id.as_str()).collect();
    assert_eq!(ids, vec!["s-1", "s-2"]);
    assert_eq!(cohort.case_id(), "case-1");
    assert!(cohort.samples().iter().all(|s| s.case_id == "case-1"));
}

#[test]
fn test_sample_labels() {
    let snap = parse_snapshot(SNAPSHOT, RatioConvention::Fraction).unwrap();
    let cohort = Cohort::for_case(snap.find_case("case-1").unwrap());
    assert_eq!(cohort.get("s-1").unwrap().label, "BC-001 · Left lobe");
    assert_eq!(cohort.get("s-2").unwrap().label, "BC-001 · slide-2.svs");
}

#[test]
fn test_numeric_strings_are_read() {
    let snap = parse_snapshot(SNAPSHOT, RatioConvention::Fraction).unwrap();
    let cohort = Cohort::for_case(snap.find_case("case-1").unwrap());
    let s1 = cohort.get("s-1").unwrap();
    assert_eq!(s1.analysis.derived.h_score, Some(186.0));
    assert_eq!(s1.analysis.derived.mean_density, None);
}

#[test]
fn test_percent_convention_divides_ratio() {
    let snap = parse_snapshot(SNAPSHOT, RatioConvention::Percent).unwrap();
    let cohort = Cohort::for_case(snap.find_case("case-1").unwrap());
    let ratio = cohort.get("s-1").unwrap().analysis.derived.positive_cells_ratio;
    assert!((ratio.unwrap() - 0.82).abs() < 1e-12);

    let snap = parse_snapshot(SNAPSHOT, RatioConvention::Fraction).unwrap();
    let cohort = Cohort::for_case(snap.find_case("case-1").unwrap());
    let ratio = cohort.get("s-1").unwrap().analysis.derived.positive_cells_ratio;
    assert_eq!(ratio, Some(82.0));
}

#[test]
fn test_from_samples_drops_other_cases() {
    let sample = |id: &str, case: &str| CohortSample {
        sample_id: id.to_string(),
        case_id: case.to_string(),
        label: id.to_string(),
        analysis: TissueAnalysis::default(),
    };
    let cohort = Cohort::from_samples("a", vec![sample("1", "a"), sample("2", "b")]);
    assert_eq!(cohort.len(), 1);
    assert!(cohort.contains(&sample("1", "a")));
    assert!(!cohort.contains(&sample("2", "b")));
}

#[test]
fn test_target_placeholder_is_outside_cohort() {
    let snap = parse_snapshot(SNAPSHOT, RatioConvention::Fraction).unwrap();
    let cohort = Cohort::for_case(snap.find_case("case-1").unwrap());
    assert!(cohort.contains(&cohort.target("s-2")));
    let missing = cohort.target("s-3");
    assert_eq!(missing.sample_id, "s-3");
    assert!(!cohort.contains(&missing));
}

#[test]
fn test_bad_analysis_shape_is_rejected() {
    let text = r#"{"cases":[{"id":"c","identifier":"C","samples":[
        {"id":"s","modality":"tissue","analysis":{"raw":[],"derived":{}}}]}]}"#;
    match parse_snapshot(text, RatioConvention::Fraction) {
        Err(VizError::InvalidInputShape(msg)) => assert!(msg.contains("raw")),
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn test_load_snapshot_reads_file() {
    let mut path = std::env::temp_dir();
    path.push(format!("kira_tissueviz_snapshot_{}.json", std::process::id()));
    fs::write(&path, SNAPSHOT).unwrap();
    let snap = load_snapshot(&path, RatioConvention::Fraction).unwrap();
    assert_eq!(snap.cases.len(), 2);
    fs::remove_file(&path).unwrap();

    assert!(matches!(
        load_snapshot(&path, RatioConvention::Fraction),
        Err(VizError::Io(_))
    ));
}
