use serde::{Deserialize, Serialize};

pub fn clip01(x: f64) -> f64 {
    if x <= 0.0 {
        0.0
    } else if x > 1.0 {
        1.0
    } else if x.is_nan() {
        0.0
    } else {
        x
    }
}

/// Staining composition of the counted cells. The four shares are clamped
/// individually and not renormalized.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Composition {
    pub negative: f64,
    pub weak: f64,
    pub moderate: f64,
    pub strong: f64,
}

impl Composition {
    pub fn sum(&self) -> f64 {
        self.negative + self.weak + self.moderate + self.strong
    }
}

/// Per-sample indicators, each in [0, 1].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NormalizedFeatureVector {
    pub ratio: f64,
    pub mean_density: f64,
    pub h_score: f64,
    pub irs: f64,
    pub density: f64,
    pub composition: Composition,
    pub area_ratio: f64,
    pub area_ratio_px: f64,
    pub surface_density: f64,
    pub positive_intensity: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureId {
    PositiveCellsRatio,
    MeanDensity,
    HScore,
    Irs,
    PositiveCellsDensity,
    PWeak,
    PModerate,
    PStrong,
    PNegative,
    AreaRatio,
    AreaRatioPx,
    SurfaceDensity,
    PositiveIntensity,
    RiskScore,
}

/// Heatmap row order.
pub const FEATURE_ORDER: [FeatureId; 14] = [
    FeatureId::PositiveCellsRatio,
    FeatureId::MeanDensity,
    FeatureId::HScore,
    FeatureId::Irs,
    FeatureId::PositiveCellsDensity,
    FeatureId::PWeak,
    FeatureId::PModerate,
    FeatureId::PStrong,
    FeatureId::PNegative,
    FeatureId::AreaRatio,
    FeatureId::AreaRatioPx,
    FeatureId::SurfaceDensity,
    FeatureId::PositiveIntensity,
    FeatureId::RiskScore,
];

/// The four indicators that feed the risk score, in descending weight.
pub const CORE_FEATURES: [FeatureId; 4] = [
    FeatureId::HScore,
    FeatureId::Irs,
    FeatureId::PositiveCellsRatio,
    FeatureId::MeanDensity,
];

impl FeatureId {
    pub fn id(self) -> &'static str {
        match self {
            FeatureId::PositiveCellsRatio => "positive_cells_ratio",
            FeatureId::MeanDensity => "mean_density",
            FeatureId::HScore => "h_score",
            FeatureId::Irs => "irs",
            FeatureId::PositiveCellsDensity => "positive_cells_density",
            FeatureId::PWeak => "p_weak",
            FeatureId::PModerate => "p_moderate",
            FeatureId::PStrong => "p_strong",
            FeatureId::PNegative => "p_negative",
            FeatureId::AreaRatio => "area_ratio",
            FeatureId::AreaRatioPx => "area_ratio_px",
            FeatureId::SurfaceDensity => "surface_density",
            FeatureId::PositiveIntensity => "positive_intensity",
            FeatureId::RiskScore => "risk_score",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FeatureId::PositiveCellsRatio => "Positive cell ratio",
            FeatureId::MeanDensity => "Mean optical density",
            FeatureId::HScore => "H-Score",
            FeatureId::Irs => "IRS",
            FeatureId::PositiveCellsDensity => "Positive cell density",
            FeatureId::PWeak => "Weak positive share",
            FeatureId::PModerate => "Moderate positive share",
            FeatureId::PStrong => "Strong positive share",
            FeatureId::PNegative => "Negative share",
            FeatureId::AreaRatio => "Positive area ratio",
            FeatureId::AreaRatioPx => "Positive area ratio (px)",
            FeatureId::SurfaceDensity => "Positive surface density",
            FeatureId::PositiveIntensity => "Positive intensity",
            FeatureId::RiskScore => "Composite risk",
        }
    }

    pub fn parse(id: &str) -> Option<Self> {
        FEATURE_ORDER.iter().copied().find(|f| f.id() == id)
    }

    pub fn row_index(self) -> usize {
        FEATURE_ORDER
            .iter()
            .position(|&f| f == self)
            .unwrap_or_default()
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/model/features.rs"]
mod tests;
