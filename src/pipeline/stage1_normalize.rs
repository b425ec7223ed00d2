use crate::model::features::{Composition, NormalizedFeatureVector, clip01};
use crate::model::measurement::{
    DerivedTissueMetrics, RawTissueMeasurement, TissueAnalysis, as_number, or_zero,
};
use crate::model::thresholds::ScoringProfile;

pub fn compute_normalized(
    raw: &RawTissueMeasurement,
    derived: &DerivedTissueMetrics,
) -> NormalizedFeatureVector {
    normalize_with(raw, derived, &ScoringProfile::v1())
}

pub fn normalize_analysis(analysis: &TissueAnalysis) -> NormalizedFeatureVector {
    compute_normalized(&analysis.raw, &analysis.derived)
}

pub fn normalize_with(
    raw: &RawTissueMeasurement,
    derived: &DerivedTissueMetrics,
    profile: &ScoringProfile,
) -> NormalizedFeatureVector {
    NormalizedFeatureVector {
        ratio: clip01(or_zero(derived.positive_cells_ratio)),
        mean_density: clip01(or_zero(derived.mean_density) / profile.mean_density_ceiling),
        h_score: clip01(or_zero(derived.h_score) / profile.h_score_max),
        irs: clip01(or_zero(derived.irs) / profile.irs_max),
        density: clip01(or_zero(derived.positive_cells_density)),
        composition: composition(raw),
        area_ratio: area_ratio(raw),
        area_ratio_px: area_ratio_px(raw),
        surface_density: clip01(surface_density_raw(raw)),
        positive_intensity: clip01(or_zero(raw.positive_intensity) / profile.intensity_max),
    }
}

/// Negative/weak/moderate/strong shares over
/// `max(total_cells, weak + moderate + strong)`.
pub fn composition(raw: &RawTissueMeasurement) -> Composition {
    let weak = or_zero(raw.weak_cells);
    let moderate = or_zero(raw.moderate_cells);
    let strong = or_zero(raw.strong_cells);
    let positive = weak + moderate + strong;
    let total = or_zero(raw.total_cells).max(positive);

    let share = |x: f64| if total > 0.0 { x / total } else { 0.0 };
    let positive_fraction = share(positive);

    Composition {
        negative: clip01(1.0 - positive_fraction),
        weak: clip01(share(weak)),
        moderate: clip01(share(moderate)),
        strong: clip01(share(strong)),
    }
}

/// Positive over tissue area; mm² when both are known, pixels otherwise.
pub fn area_ratio_raw(raw: &RawTissueMeasurement) -> f64 {
    let pos = as_number(raw.positive_area_mm2);
    let tissue = as_number(raw.tissue_area_mm2);
    if let (Some(pos), Some(tissue)) = (pos, tissue) {
        if tissue > 0.0 {
            return pos / tissue;
        }
    }
    area_ratio_px_raw(raw)
}

pub fn area_ratio(raw: &RawTissueMeasurement) -> f64 {
    clip01(area_ratio_raw(raw))
}

pub fn area_ratio_px_raw(raw: &RawTissueMeasurement) -> f64 {
    let pos = or_zero(raw.positive_area_px);
    let tissue = or_zero(raw.tissue_area_px);
    if tissue > 0.0 { pos / tissue } else { 0.0 }
}

pub fn area_ratio_px(raw: &RawTissueMeasurement) -> f64 {
    clip01(area_ratio_px_raw(raw))
}

/// Intensity per tissue pixel.
pub fn surface_density_raw(raw: &RawTissueMeasurement) -> f64 {
    let intensity = or_zero(raw.positive_intensity);
    let tissue = or_zero(raw.tissue_area_px);
    if tissue > 0.0 {
        intensity / tissue.max(1.0)
    } else {
        0.0
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage1_normalize.rs"]
mod tests;
