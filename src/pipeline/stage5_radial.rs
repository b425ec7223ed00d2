use tracing::debug;

use crate::input::{Cohort, CohortSample};
use crate::model::charts::{
    GaugePoint, RadialChartModel, Ring, RingKind, RingSegment, SegmentDetail, StainGrade,
};
use crate::model::features::{CORE_FEATURES, FeatureId};
use crate::model::levels::{LevelTally, RiskLevel, level_order};
use crate::model::measurement::TissueAnalysis;
use crate::model::palette::{
    Color, NEGATIVE_GREY, level_color, missing_color, missing_opacity, ramp,
};
use crate::model::thresholds::ScoringProfile;
use crate::pipeline::stage1_normalize::normalize_analysis;
use crate::pipeline::stage2_cohort::{
    feature_present, feature_value, quantile_sorted, sorted_copy,
};
use crate::pipeline::stage3_scores::{level_tally, risk_with};
use crate::pipeline::view::{ChartView, resolve_view};

const QUANTILE_EDGES: [f64; 6] = [0.0, 0.2, 0.4, 0.6, 0.8, 1.0];
const MIN_MISSING_SEGMENT: f64 = 0.001;

/// Gauge plus the risk-level, contribution, cohort-quantile, composition and
/// missingness rings, inner to outer.
pub fn build_radial_model(cohort: &Cohort, target: Option<&CohortSample>) -> RadialChartModel {
    let view = resolve_view(cohort, target);
    build_radial_from_view(&view)
}

pub fn build_radial_from_view(view: &ChartView) -> RadialChartModel {
    let profile = ScoringProfile::v1();
    let normalized = normalize_analysis(&view.target);
    let risk = risk_with(&normalized, &profile);

    let rings = vec![
        levels_ring(&level_tally(&normalized, &profile)),
        contribution_ring(&view.target, &profile),
        quantile_ring(&view.cohort),
        composition_ring(&view.target),
        missing_ring(&view.cohort),
    ];
    debug!(
        case = %view.case_id,
        sample = %view.sample_id,
        risk,
        segments = rings.iter().map(|r| r.segments.len()).sum::<usize>(),
        "radial model built"
    );

    RadialChartModel {
        case_id: view.case_id.clone(),
        sample_id: view.sample_id.clone(),
        gauge: GaugePoint {
            value: risk,
            min: 0.0,
            max: 1.0,
            display: format!("Risk {:.0}%", risk * 100.0),
        },
        rings,
        fallback: view.fallback,
        notice: view.notice(),
    }
}

fn levels_ring(tally: &LevelTally) -> Ring {
    let segments = level_order()
        .iter()
        .map(|&level| {
            let value = tally.fraction(level);
            RingSegment {
                name: level.label().to_string(),
                value,
                color: level_color(level),
                tooltip: share_tooltip(level.label(), value),
                detail: SegmentDetail::Level {
                    level,
                    count: tally.count(level),
                },
            }
        })
        .collect();
    Ring {
        kind: RingKind::RiskLevels,
        radius: (0.30, 0.36),
        segments,
    }
}

fn contribution_ring(target: &TissueAnalysis, profile: &ScoringProfile) -> Ring {
    let n = normalize_analysis(target);
    let segments = CORE_FEATURES
        .iter()
        .map(|&feature| {
            let weight = profile.weights.weight_of(feature);
            let mean = feature_value(&n, feature);
            RingSegment {
                name: feature.label().to_string(),
                value: weight,
                color: ramp(mean),
                tooltip: format!("{}<br/>Mean: {:.1}%", feature.label(), mean * 100.0),
                detail: SegmentDetail::Contribution {
                    feature,
                    weight,
                    mean,
                },
            }
        })
        .collect();
    Ring {
        kind: RingKind::Contribution,
        radius: (0.40, 0.54),
        segments,
    }
}

/// Five quantile bins per core feature over the whole cohort. Bin `i` holds
/// `edge[i] <= v < edge[i + 1]`; the last bin is closed.
fn quantile_ring(cohort: &Cohort) -> Ring {
    let normalized: Vec<_> = cohort
        .samples()
        .iter()
        .map(|s| normalize_analysis(&s.analysis))
        .collect();

    let mut segments = Vec::with_capacity(CORE_FEATURES.len() * 5);
    for &feature in &CORE_FEATURES {
        let values: Vec<f64> = normalized.iter().map(|n| feature_value(n, feature)).collect();
        let sorted = sorted_copy(&values);
        let edges: Vec<f64> = QUANTILE_EDGES
            .iter()
            .map(|&q| quantile_sorted(&sorted, q))
            .collect();

        for bin in 0..5 {
            let low = edges[bin];
            let high = edges[bin + 1];
            let members: Vec<f64> = values
                .iter()
                .copied()
                .filter(|&v| v >= low && if bin == 4 { v <= high } else { v < high })
                .collect();
            let mean = if members.is_empty() {
                0.0
            } else {
                members.iter().sum::<f64>() / members.len() as f64
            };
            let name = format!("{} Q{}", feature.label(), bin + 1);
            segments.push(RingSegment {
                tooltip: format!("{}<br/>Mean: {:.1}%", name, mean * 100.0),
                name,
                value: members.len().max(1) as f64,
                color: ramp(mean),
                detail: SegmentDetail::Quantile {
                    feature,
                    bin: bin as u8 + 1,
                    count: members.len(),
                    mean,
                    low,
                    high,
                },
            });
        }
    }
    Ring {
        kind: RingKind::CohortQuantiles,
        radius: (0.58, 0.66),
        segments,
    }
}

fn composition_ring(target: &TissueAnalysis) -> Ring {
    let c = normalize_analysis(target).composition;
    let grades = [
        (StainGrade::Negative, c.negative, Color::Hex(NEGATIVE_GREY)),
        (StainGrade::Weak, c.weak, level_color(RiskLevel::Low)),
        (StainGrade::Moderate, c.moderate, level_color(RiskLevel::Mid)),
        (StainGrade::Strong, c.strong, level_color(RiskLevel::High)),
    ];
    let segments = grades
        .into_iter()
        .map(|(grade, value, color)| RingSegment {
            name: grade.label().to_string(),
            value,
            color,
            tooltip: share_tooltip(grade.label(), value),
            detail: SegmentDetail::Composition { grade },
        })
        .collect();
    Ring {
        kind: RingKind::Composition,
        radius: (0.70, 0.78),
        segments,
    }
}

/// Share of cohort samples that do not report a feature.
pub fn missing_rate(cohort: &Cohort, feature: FeatureId) -> f64 {
    let total = cohort.len();
    if total == 0 {
        return 0.0;
    }
    let missing = cohort
        .samples()
        .iter()
        .filter(|s| !feature_present(&s.analysis, feature))
        .count();
    missing as f64 / total as f64
}

fn missing_ring(cohort: &Cohort) -> Ring {
    let features = [
        FeatureId::PositiveCellsRatio,
        FeatureId::MeanDensity,
        FeatureId::HScore,
        FeatureId::Irs,
    ];
    let segments = features
        .into_iter()
        .map(|feature| {
            let rate = missing_rate(cohort, feature);
            let name = format!("Missing · {}", feature.id());
            RingSegment {
                tooltip: share_tooltip(&name, rate),
                name,
                value: rate.max(MIN_MISSING_SEGMENT),
                color: missing_color(rate),
                detail: SegmentDetail::Missing {
                    feature,
                    rate,
                    opacity: missing_opacity(rate),
                },
            }
        })
        .collect();
    Ring {
        kind: RingKind::Missingness,
        radius: (0.82, 0.86),
        segments,
    }
}

fn share_tooltip(name: &str, share: f64) -> String {
    format!("{}: {:.1}%", name, share * 100.0)
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage5_radial.rs"]
mod tests;
