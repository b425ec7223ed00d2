use serde::Serialize;

use crate::model::dimensions::Dimension;
use crate::model::features::FeatureId;
use crate::model::levels::RiskLevel;
use crate::model::palette::Color;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackReason {
    /// No sample in the case has analysis data.
    EmptyCohort,
    /// A target was named but is not part of the analyzed cohort.
    TargetNotInCohort,
    NoTarget,
}

impl FallbackReason {
    pub fn notice(self) -> &'static str {
        match self {
            FallbackReason::EmptyCohort => {
                "No analysis results in this case yet; showing demo data"
            }
            FallbackReason::TargetNotInCohort | FallbackReason::NoTarget => {
                "No analysis results for this sample; showing demo data"
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GaugePoint {
    pub value: f64,
    pub min: f64,
    pub max: f64,
    pub display: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RingKind {
    RiskLevels,
    Contribution,
    CohortQuantiles,
    Composition,
    Missingness,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StainGrade {
    Negative,
    Weak,
    Moderate,
    Strong,
}

impl StainGrade {
    pub fn label(self) -> &'static str {
        match self {
            StainGrade::Negative => "Negative",
            StainGrade::Weak => "Weak",
            StainGrade::Moderate => "Moderate",
            StainGrade::Strong => "Strong",
        }
    }
}

/// Ring-specific payload of a segment.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SegmentDetail {
    Level {
        level: RiskLevel,
        count: usize,
    },
    Contribution {
        feature: FeatureId,
        weight: f64,
        mean: f64,
    },
    Quantile {
        feature: FeatureId,
        bin: u8,
        count: usize,
        mean: f64,
        low: f64,
        high: f64,
    },
    Composition {
        grade: StainGrade,
    },
    Missing {
        feature: FeatureId,
        rate: f64,
        opacity: f64,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RingSegment {
    pub name: String,
    pub value: f64,
    pub color: Color,
    pub tooltip: String,
    pub detail: SegmentDetail,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ring {
    pub kind: RingKind,
    /// Inner and outer radius as a share of the chart radius.
    pub radius: (f64, f64),
    pub segments: Vec<RingSegment>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RadialChartModel {
    pub case_id: String,
    pub sample_id: String,
    pub gauge: GaugePoint,
    pub rings: Vec<Ring>,
    pub fallback: Option<FallbackReason>,
    pub notice: Option<String>,
}

impl RadialChartModel {
    pub fn ring(&self, kind: RingKind) -> Option<&Ring> {
        self.rings.iter().find(|r| r.kind == kind)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeatmapCell {
    /// Column (dimension) index.
    pub x: usize,
    /// Row (feature) index.
    pub y: usize,
    /// Jittered display value.
    pub value: f64,
    /// The statistic before jitter.
    pub statistic: f64,
    pub feature: FeatureId,
    pub dimension: Dimension,
    pub feature_label: &'static str,
    pub dimension_label: &'static str,
    pub display: String,
}

impl HeatmapCell {
    pub fn tooltip(&self) -> String {
        format!(
            "{} · {}: {}",
            self.feature_label, self.dimension_label, self.display
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeatmapChartModel {
    pub case_id: String,
    pub sample_id: String,
    pub row_labels: Vec<&'static str>,
    pub column_labels: Vec<&'static str>,
    pub cells: Vec<HeatmapCell>,
    pub fallback: Option<FallbackReason>,
    pub notice: Option<String>,
}

impl HeatmapChartModel {
    pub fn cell(&self, feature: FeatureId, dimension: Dimension) -> Option<&HeatmapCell> {
        self.cells
            .iter()
            .find(|c| c.feature == feature && c.dimension == dimension)
    }
}

/// Any data point a chart series can carry.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "series", rename_all = "snake_case")]
pub enum SeriesPoint {
    Gauge(GaugePoint),
    Segment(RingSegment),
    Cell(HeatmapCell),
}

impl SeriesPoint {
    pub fn tooltip(&self) -> String {
        match self {
            SeriesPoint::Gauge(g) => g.display.clone(),
            SeriesPoint::Segment(s) => s.tooltip.clone(),
            SeriesPoint::Cell(c) => c.tooltip(),
        }
    }
}
