use serde::{Deserialize, Serialize};

use crate::model::levels::LevelTally;

/// Sample-level scores; none of them depend on the cohort.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SampleScores {
    pub risk: f64,
    pub confidence: f64,
    pub confidence_breakdown: ConfidenceBreakdown,
    pub levels: LevelTally,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceBreakdown {
    pub cells_score: f64,
    pub area_score: f64,
    pub negative_penalty: f64,
    /// Before clamping; may be negative.
    pub unclamped: f64,
}
