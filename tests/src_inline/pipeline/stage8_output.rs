use super::*;
use crate::input::CohortSample;
use crate::model::charts::FallbackReason;
use crate::model::measurement::TissueAnalysis;
use std::sync::atomic::{AtomicUsize, Ordering};

static DIR_COUNTER: AtomicUsize = AtomicUsize::new(0);

fn make_temp_dir() -> std::path::PathBuf {
    let mut dir = std::env::temp_dir();
    let id = DIR_COUNTER.fetch_add(1, Ordering::SeqCst);
    dir.push(format!("kira_tissueviz_output_{}_{}", std::process::id(), id));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn cohort() -> Cohort {
    let mut high = TissueAnalysis::fallback();
    high.derived.h_score = Some(290.0);
    let mut low = TissueAnalysis::fallback();
    low.derived.h_score = Some(40.0);
    let samples = [
        ("s-1", TissueAnalysis::fallback()),
        ("s-2", low),
        ("s-3", high),
    ]
    .into_iter()
    .map(|(id, analysis)| CohortSample {
        sample_id: id.to_string(),
        case_id: "case-1".to_string(),
        label: format!("BC-001 · {id}"),
        analysis,
    })
    .collect();
    Cohort::from_samples("case-1", samples)
}

#[test]
fn test_write_outputs_creates_all_files() {
    let dir = make_temp_dir();
    let c = cohort();
    write_outputs(&c, c.get("s-3"), &OutputContext::default(), &dir).unwrap();
    for name in [
        "radial.json",
        "heatmap.json",
        "models.json",
        "cohort.tsv",
        "summary.json",
        "report.txt",
    ] {
        assert!(dir.join(name).exists(), "{name}");
    }

    let radial: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(dir.join("radial.json")).unwrap()).unwrap();
    assert_eq!(radial["series"][0]["type"], "gauge");

    let models: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(dir.join("models.json")).unwrap()).unwrap();
    assert_eq!(models["radial"]["sample_id"], "s-3");
    assert_eq!(models["heatmap"]["cells"].as_array().unwrap().len(), 196);
}

#[test]
fn test_cohort_tsv_layout() {
    let dir = make_temp_dir();
    let c = cohort();
    write_outputs(&c, c.get("s-1"), &OutputContext::default(), &dir).unwrap();
    let tsv = std::fs::read_to_string(dir.join("cohort.tsv")).unwrap();
    let lines: Vec<&str> = tsv.lines().collect();
    assert_eq!(lines.len(), 4);
    let header: Vec<&str> = lines[0].split('\t').collect();
    assert_eq!(header.len(), 4 + 28);
    assert_eq!(header[0], "sample_id");
    assert_eq!(header[6], "h_score");
    assert!(header.contains(&"risk_score_z01"));
    let first: Vec<&str> = lines[1].split('\t').collect();
    assert_eq!(first[0], "s-1");
    assert_eq!(first[3], "1.000000");
    assert_eq!(first[6], "0.620000");
}

#[test]
fn test_summary_flags_features_above_cohort() {
    let c = cohort();
    let out = build_outputs(&c, c.get("s-3"), &OutputContext::default());
    let s = &out.summary;
    assert_eq!(s.cohort_size, 3);
    assert_eq!(s.fallback, None);
    assert!(s.above_cohort.contains(&FeatureId::HScore));
    assert!(!s.above_cohort.contains(&FeatureId::Irs));
    assert_eq!(s.feature(FeatureId::HScore).unwrap().raw, 290.0);
    assert_eq!(s.confidence, 1.0);
}

#[test]
fn test_empty_cohort_summary_reports_fallback() {
    let dir = make_temp_dir();
    let empty = Cohort::from_samples("case-9", Vec::new());
    let out = write_outputs(&empty, None, &OutputContext::default(), &dir).unwrap();
    assert_eq!(out.summary.fallback, Some(FallbackReason::EmptyCohort));
    assert_eq!(out.summary.sample_id, "current");
    assert_eq!(out.matrix.rows.len(), 1);

    let summary: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(dir.join("summary.json")).unwrap()).unwrap();
    assert_eq!(summary["fallback"], "empty_cohort");
    assert_eq!(summary["tool"]["name"], "kira-tissueviz");
    let report = std::fs::read_to_string(dir.join("report.txt")).unwrap();
    assert!(report.contains("Note: No analysis results in this case yet"));
    assert!(report.contains("Dominant grade: Moderate"));
}
