pub mod json;
pub mod text;

use serde::Serialize;

use crate::model::charts::FallbackReason;
use crate::model::features::{Composition, FeatureId};
use crate::model::levels::{LevelTally, RiskLevel};
use crate::model::scores::ConfidenceBreakdown;

#[derive(Debug, Clone, Serialize)]
pub struct ToolMeta {
    pub name: String,
    pub version: String,
    pub ratio_convention: String,
}

/// One feature of the displayed sample against its cohort.
#[derive(Debug, Clone, Serialize)]
pub struct FeatureSummary {
    pub feature: FeatureId,
    pub label: &'static str,
    /// Source units.
    pub raw: f64,
    pub value: f64,
    pub cohort_mean: f64,
    pub cohort_sd: f64,
    pub n: usize,
    pub z: Option<f64>,
    pub percentile: f64,
    pub completeness: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct SummaryData {
    pub tool: ToolMeta,
    pub case_id: String,
    pub sample_id: String,
    pub cohort_size: usize,
    pub fallback: Option<FallbackReason>,
    pub notice: Option<String>,

    pub risk: f64,
    pub risk_band: RiskLevel,
    pub confidence: f64,
    pub confidence_breakdown: ConfidenceBreakdown,
    pub levels: LevelTally,
    pub composition: Composition,

    pub features: Vec<FeatureSummary>,
    /// Features at least one cohort SD above the cohort mean.
    pub above_cohort: Vec<FeatureId>,
}

impl SummaryData {
    pub fn feature(&self, id: FeatureId) -> Option<&FeatureSummary> {
        self.features.iter().find(|f| f.feature == id)
    }
}

pub fn format_f64_6(v: f64) -> String {
    format!("{:.6}", v)
}

pub fn format_percent(v: f64) -> String {
    format!("{:.1}%", v * 100.0)
}

#[cfg(test)]
#[path = "../../tests/src_inline/report/mod.rs"]
mod tests;
