use crate::model::features::FeatureId;

/// Fixed scale constants used by the normalizer and the confidence model.
#[derive(Debug, Clone)]
pub struct ScoringProfile {
    pub mean_density_ceiling: f64,
    pub h_score_max: f64,
    pub irs_max: f64,
    pub intensity_max: f64,
    pub cells_adequate: f64,
    pub tissue_mm2_adequate: f64,
    pub tissue_px_adequate: f64,
    pub confidence_cells_weight: f64,
    pub confidence_area_weight: f64,
    pub confidence_negative_penalty: f64,
    pub level_high: f64,
    pub level_mid: f64,
    pub weights: RiskWeights,
}

impl ScoringProfile {
    pub fn v1() -> Self {
        Self {
            mean_density_ceiling: 0.2,
            h_score_max: 300.0,
            irs_max: 12.0,
            intensity_max: 3.0,
            cells_adequate: 5000.0,
            tissue_mm2_adequate: 1.5,
            tissue_px_adequate: 5_000_000.0,
            confidence_cells_weight: 0.5,
            confidence_area_weight: 0.5,
            confidence_negative_penalty: 0.3,
            level_high: 0.75,
            level_mid: 0.5,
            weights: RiskWeights::v1(),
        }
    }
}

impl Default for ScoringProfile {
    fn default() -> Self {
        Self::v1()
    }
}

/// Cohort size below which variance-based measures fall back to neutral.
pub const MIN_COHORT_FOR_VARIANCE: usize = 3;
/// Cohort size below which the IQR position falls back to neutral.
pub const MIN_COHORT_FOR_IQR: usize = 4;
/// Cohort size below which the percentile falls back to neutral.
pub const MIN_COHORT_FOR_PERCENTILE: usize = 2;
/// z-scores are winsorized at this many standard deviations.
pub const Z_CLAMP: f64 = 2.5;
pub const NEUTRAL: f64 = 0.5;

/// Risk weights over the pre-normalized core indicators. They sum to 1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiskWeights {
    pub h_score: f64,
    pub irs: f64,
    pub ratio: f64,
    pub mean_density: f64,
}

impl RiskWeights {
    pub fn v1() -> Self {
        Self {
            h_score: 0.4,
            irs: 0.3,
            ratio: 0.2,
            mean_density: 0.1,
        }
    }

    // Smallest weight first: 0.1 + 0.2 + 0.3 + 0.4 rounds to exactly 1.0.
    pub fn combine(&self, h_score: f64, irs: f64, ratio: f64, mean_density: f64) -> f64 {
        self.mean_density * mean_density
            + self.ratio * ratio
            + self.irs * irs
            + self.h_score * h_score
    }

    pub fn sum(&self) -> f64 {
        self.combine(1.0, 1.0, 1.0, 1.0)
    }

    pub fn weight_of(&self, feature: FeatureId) -> f64 {
        match feature {
            FeatureId::HScore => self.h_score,
            FeatureId::Irs => self.irs,
            FeatureId::PositiveCellsRatio => self.ratio,
            FeatureId::MeanDensity => self.mean_density,
            _ => 0.0,
        }
    }
}
