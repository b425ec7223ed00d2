use tracing::debug;

use crate::input::{Cohort, CohortSample};
use crate::model::charts::{HeatmapCell, HeatmapChartModel};
use crate::model::dimensions::{DIMENSION_ORDER, Dimension};
use crate::model::features::{FEATURE_ORDER, FeatureId, clip01};
use crate::model::thresholds::ScoringProfile;
use crate::pipeline::stage1_normalize::normalize_analysis;
use crate::pipeline::stage2_cohort::{
    CohortPosition, cohort_position, cohort_values, feature_value,
};
use crate::pipeline::stage3_scores::compute_confidence;
use crate::pipeline::stage4_jitter::jitter_cell;
use crate::pipeline::view::{ChartView, resolve_view};

/// 14 features × 14 judgment dimensions for the displayed sample.
pub fn build_heatmap_model(cohort: &Cohort, target: Option<&CohortSample>) -> HeatmapChartModel {
    let view = resolve_view(cohort, target);
    build_heatmap_from_view(&view)
}

pub fn build_heatmap_from_view(view: &ChartView) -> HeatmapChartModel {
    let profile = ScoringProfile::v1();
    let normalized = normalize_analysis(&view.target);
    let confidence = compute_confidence(&view.target.raw, &view.target.derived);

    let mut cells = Vec::with_capacity(FEATURE_ORDER.len() * DIMENSION_ORDER.len());
    for (y, &feature) in FEATURE_ORDER.iter().enumerate() {
        let value = feature_value(&normalized, feature);
        let values = cohort_values(&view.cohort, feature);
        let pos = cohort_position(&values, value);
        let weight = profile.weights.weight_of(feature);

        for (x, &dimension) in DIMENSION_ORDER.iter().enumerate() {
            let (statistic, display) = dimension_value(dimension, &pos, confidence, weight);
            cells.push(HeatmapCell {
                x,
                y,
                value: jitter_cell(statistic, &view.case_id, &view.sample_id, feature, dimension),
                statistic,
                feature,
                dimension,
                feature_label: feature.label(),
                dimension_label: dimension.label(),
                display,
            });
        }
    }
    debug!(
        case = %view.case_id,
        sample = %view.sample_id,
        cohort = view.cohort.len(),
        cells = cells.len(),
        "heatmap model built"
    );

    HeatmapChartModel {
        case_id: view.case_id.clone(),
        sample_id: view.sample_id.clone(),
        row_labels: FEATURE_ORDER.iter().map(|f| f.label()).collect(),
        column_labels: DIMENSION_ORDER.iter().map(|d| d.label()).collect(),
        cells,
        fallback: view.fallback,
        notice: view.notice(),
    }
}

/// Unjittered cell statistic in [0, 1] and its tooltip text.
pub fn dimension_value(
    dimension: Dimension,
    pos: &CohortPosition,
    confidence: f64,
    weight: f64,
) -> (f64, String) {
    match dimension {
        Dimension::Normalized => {
            let v = clip01(pos.value);
            (v, percent1(v))
        }
        Dimension::Decile => {
            let v = (clip01(pos.value) * 9.0).round() / 9.0;
            (v, percent1(v))
        }
        Dimension::ZScore => (pos.z01, format!("z {:.2}", pos.z01 * 5.0 - 2.5)),
        Dimension::AbsZ => (pos.abs_z, format!("|z| {:.2}", pos.abs_z * 3.0)),
        Dimension::Percentile => (
            pos.percentile,
            format!("{} pctl", (pos.percentile * 100.0).round()),
        ),
        Dimension::QuantileGroup => (
            pos.quantile_group_value(),
            format!("Q{}", pos.quantile_group),
        ),
        Dimension::Rank => (pos.rank, percent1(pos.rank)),
        Dimension::PositiveDeviation => (pos.positive_deviation, percent1(pos.positive_deviation)),
        Dimension::NegativeDeviation => (pos.negative_deviation, percent1(pos.negative_deviation)),
        Dimension::IqrPosition => (pos.iqr_position, percent1(pos.iqr_position)),
        Dimension::Confidence => (confidence, percent0(confidence)),
        Dimension::Stability => (pos.stability, percent1(pos.stability)),
        Dimension::Weight => (weight, percent0(weight)),
        Dimension::Completeness => (pos.completeness, percent0(pos.completeness)),
    }
}

fn percent1(v: f64) -> String {
    format!("{:.1}%", v * 100.0)
}

fn percent0(v: f64) -> String {
    format!("{}%", (v * 100.0).round())
}

/// Cell lookup by ids, for callers holding only the string form.
pub fn find_cell<'a>(
    model: &'a HeatmapChartModel,
    feature_id: &str,
    dimension_id: &str,
) -> Option<&'a HeatmapCell> {
    let feature = FeatureId::parse(feature_id)?;
    let dimension = DIMENSION_ORDER.iter().copied().find(|d| d.id() == dimension_id)?;
    model.cell(feature, dimension)
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage6_heatmap.rs"]
mod tests;
