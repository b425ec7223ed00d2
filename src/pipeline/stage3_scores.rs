use crate::model::features::{NormalizedFeatureVector, clip01};
use crate::model::levels::{LevelTally, RiskLevel};
use crate::model::measurement::{
    DerivedTissueMetrics, RawTissueMeasurement, TissueAnalysis, as_number, or_zero,
};
use crate::model::scores::{ConfidenceBreakdown, SampleScores};
use crate::model::thresholds::ScoringProfile;
use crate::pipeline::stage1_normalize::{composition, normalize_analysis};

pub fn compute_risk(normalized: &NormalizedFeatureVector) -> f64 {
    risk_with(normalized, &ScoringProfile::v1())
}

pub fn risk_with(n: &NormalizedFeatureVector, profile: &ScoringProfile) -> f64 {
    clip01(
        profile
            .weights
            .combine(n.h_score, n.irs, n.ratio, n.mean_density),
    )
}

pub fn compute_confidence(raw: &RawTissueMeasurement, derived: &DerivedTissueMetrics) -> f64 {
    confidence_breakdown(raw, derived, &ScoringProfile::v1()).0
}

/// Confidence from cell-count adequacy, tissue-area adequacy and the
/// unstained share. `derived` does not enter the formula.
pub fn confidence_breakdown(
    raw: &RawTissueMeasurement,
    _derived: &DerivedTissueMetrics,
    profile: &ScoringProfile,
) -> (f64, ConfidenceBreakdown) {
    let total_cells = or_zero(raw.total_cells);
    let cells_score = (total_cells / profile.cells_adequate).min(1.0);

    let area_score = match as_number(raw.tissue_area_mm2) {
        Some(mm2) => (mm2 / profile.tissue_mm2_adequate).min(1.0),
        None => (or_zero(raw.tissue_area_px) / profile.tissue_px_adequate).min(1.0),
    };

    let negative_penalty = composition(raw).negative;

    let unclamped = profile.confidence_cells_weight * cells_score
        + profile.confidence_area_weight * area_score
        - profile.confidence_negative_penalty * negative_penalty;

    (
        clip01(unclamped),
        ConfidenceBreakdown {
            cells_score,
            area_score,
            negative_penalty,
            unclamped,
        },
    )
}

/// Classifies H-Score, IRS, ratio and mean density and tallies the levels.
pub fn level_tally(n: &NormalizedFeatureVector, profile: &ScoringProfile) -> LevelTally {
    let values = [n.h_score, n.irs, n.ratio, n.mean_density];
    let mut tally = LevelTally::default();
    for v in values {
        match RiskLevel::classify(v, profile.level_high, profile.level_mid) {
            RiskLevel::High => tally.high_count += 1,
            RiskLevel::Mid => tally.mid_count += 1,
            RiskLevel::Low => tally.low_count += 1,
        }
    }
    let total = values.len() as f64;
    tally.high = tally.high_count as f64 / total;
    tally.mid = tally.mid_count as f64 / total;
    tally.low = tally.low_count as f64 / total;
    tally
}

pub fn score_sample(analysis: &TissueAnalysis) -> SampleScores {
    let profile = ScoringProfile::v1();
    let normalized = normalize_analysis(analysis);
    let (confidence, breakdown) =
        confidence_breakdown(&analysis.raw, &analysis.derived, &profile);
    SampleScores {
        risk: risk_with(&normalized, &profile),
        confidence,
        confidence_breakdown: breakdown,
        levels: level_tally(&normalized, &profile),
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage3_scores.rs"]
mod tests;
