use super::*;

fn scenario_raw() -> RawTissueMeasurement {
    TissueAnalysis::fallback().raw
}

fn all_fields(n: &NormalizedFeatureVector) -> [f64; 13] {
    [
        n.ratio,
        n.mean_density,
        n.h_score,
        n.irs,
        n.density,
        n.composition.negative,
        n.composition.weak,
        n.composition.moderate,
        n.composition.strong,
        n.area_ratio,
        n.area_ratio_px,
        n.surface_density,
        n.positive_intensity,
    ]
}

#[test]
fn test_composition_of_documented_sample() {
    let c = composition(&scenario_raw());
    assert!(c.negative.abs() < 1e-12);
    assert!((c.weak - 0.23715415019762845).abs() < 1e-12);
    assert!((c.moderate - 0.6324110671936759).abs() < 1e-12);
    assert!((c.strong - 0.13043478260869565).abs() < 1e-12);
    assert!((c.sum() - 1.0).abs() < 1e-6);
}

#[test]
fn test_total_below_positive_sum_uses_positive_sum() {
    let raw = RawTissueMeasurement {
        weak_cells: Some(30.0),
        moderate_cells: Some(20.0),
        strong_cells: Some(50.0),
        total_cells: Some(10.0),
        ..Default::default()
    };
    let c = composition(&raw);
    assert_eq!(c.negative, 0.0);
    assert!((c.weak - 0.3).abs() < 1e-12);
    assert!((c.strong - 0.5).abs() < 1e-12);
}

#[test]
fn test_empty_measurement_yields_zeros_not_nan() {
    let n = compute_normalized(
        &RawTissueMeasurement::default(),
        &DerivedTissueMetrics::default(),
    );
    for v in all_fields(&n) {
        assert!(!v.is_nan());
    }
    // No counted cells: nothing is positive.
    assert_eq!(n.composition.negative, 1.0);
    assert_eq!(n.composition.weak, 0.0);
    assert_eq!(n.area_ratio, 0.0);
    assert_eq!(n.surface_density, 0.0);
}

#[test]
fn test_scales() {
    let n = normalize_analysis(&TissueAnalysis::fallback());
    assert!((n.h_score - 0.62).abs() < 1e-12);
    assert!((n.irs - 8.0 / 12.0).abs() < 1e-12);
    assert!((n.mean_density - 0.55).abs() < 1e-12);
    assert!((n.ratio - 0.82).abs() < 1e-12);
    assert!((n.density - 0.12).abs() < 1e-12);
    assert!((n.positive_intensity - 2.0 / 3.0).abs() < 1e-12);
}

#[test]
fn test_area_ratio_prefers_mm2() {
    let raw = scenario_raw();
    assert!((area_ratio_raw(&raw) - 0.52 / 1.8).abs() < 1e-12);
    assert!((area_ratio_px_raw(&raw) - 0.2752).abs() < 1e-12);

    let px_only = RawTissueMeasurement {
        tissue_area_mm2: None,
        ..raw.clone()
    };
    assert!((area_ratio(&px_only) - 0.2752).abs() < 1e-12);

    let zero_mm2 = RawTissueMeasurement {
        tissue_area_mm2: Some(0.0),
        ..raw
    };
    assert!((area_ratio(&zero_mm2) - 0.2752).abs() < 1e-12);
}

#[test]
fn test_surface_density() {
    let raw = scenario_raw();
    assert!((surface_density_raw(&raw) - 2.0 / 6_250_000.0).abs() < 1e-18);
    let tiny = RawTissueMeasurement {
        positive_intensity: Some(0.5),
        tissue_area_px: Some(0.25),
        ..Default::default()
    };
    // Pixel count is floored at 1.
    assert_eq!(surface_density_raw(&tiny), 0.5);
}

#[test]
fn test_out_of_range_inputs_are_clamped() {
    let raw = RawTissueMeasurement {
        weak_cells: Some(-5.0),
        total_cells: Some(-100.0),
        positive_area_mm2: Some(9.0),
        tissue_area_mm2: Some(1.0),
        positive_intensity: Some(1e9),
        tissue_area_px: Some(1.0),
        ..Default::default()
    };
    let derived = DerivedTissueMetrics {
        positive_cells_ratio: Some(82.0),
        positive_cells_density: Some(-1.0),
        mean_density: Some(f64::NAN),
        h_score: Some(f64::INFINITY),
        irs: Some(400.0),
    };
    let n = compute_normalized(&raw, &derived);
    for v in all_fields(&n) {
        assert!((0.0..=1.0).contains(&v), "{v}");
    }
    assert_eq!(n.mean_density, 0.0);
    assert_eq!(n.h_score, 0.0);
    assert_eq!(n.ratio, 1.0);
}
