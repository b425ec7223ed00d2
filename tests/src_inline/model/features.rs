use super::*;

#[test]
fn test_clip01_bounds_and_nan() {
    assert_eq!(clip01(-0.2), 0.0);
    assert_eq!(clip01(0.4), 0.4);
    assert_eq!(clip01(3.0), 1.0);
    assert_eq!(clip01(f64::NAN), 0.0);
    assert_eq!(clip01(f64::INFINITY), 1.0);
    assert!(clip01(-0.0).is_sign_positive());
}

#[test]
fn test_feature_ids_are_unique_and_parse_back() {
    for (i, f) in FEATURE_ORDER.iter().enumerate() {
        assert_eq!(FeatureId::parse(f.id()), Some(*f));
        assert_eq!(f.row_index(), i);
    }
    let mut ids: Vec<&str> = FEATURE_ORDER.iter().map(|f| f.id()).collect();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), 14);
    assert_eq!(FeatureId::parse("nope"), None);
}

#[test]
fn test_core_features_are_rows_of_the_matrix() {
    for f in CORE_FEATURES {
        assert!(FEATURE_ORDER.contains(&f));
    }
    assert_eq!(CORE_FEATURES[0], FeatureId::HScore);
}

#[test]
fn test_composition_sum() {
    let c = Composition {
        negative: 0.1,
        weak: 0.2,
        moderate: 0.3,
        strong: 0.4,
    };
    assert!((c.sum() - 1.0).abs() < 1e-12);
}
