use serde::Serialize;

use crate::input::Cohort;
use crate::model::features::{FEATURE_ORDER, FeatureId, NormalizedFeatureVector, clip01};
use crate::model::measurement::{TissueAnalysis, as_number, or_zero};
use crate::model::thresholds::{
    MIN_COHORT_FOR_IQR, MIN_COHORT_FOR_PERCENTILE, MIN_COHORT_FOR_VARIANCE, NEUTRAL, Z_CLAMP,
};
use crate::pipeline::stage1_normalize::{
    area_ratio_px_raw, area_ratio_raw, normalize_analysis, surface_density_raw,
};
use crate::pipeline::stage3_scores::{compute_confidence, compute_risk};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FeatureStats {
    pub mean: f64,
    /// Population SD; 1 when the spread is zero.
    pub sd: f64,
    pub n: usize,
}

/// Normalized value of one feature for one sample.
pub fn feature_value(n: &NormalizedFeatureVector, feature: FeatureId) -> f64 {
    match feature {
        FeatureId::PositiveCellsRatio => n.ratio,
        FeatureId::MeanDensity => n.mean_density,
        FeatureId::HScore => n.h_score,
        FeatureId::Irs => n.irs,
        FeatureId::PositiveCellsDensity => n.density,
        FeatureId::PWeak => n.composition.weak,
        FeatureId::PModerate => n.composition.moderate,
        FeatureId::PStrong => n.composition.strong,
        FeatureId::PNegative => n.composition.negative,
        FeatureId::AreaRatio => n.area_ratio,
        FeatureId::AreaRatioPx => n.area_ratio_px,
        FeatureId::SurfaceDensity => n.surface_density,
        FeatureId::PositiveIntensity => n.positive_intensity,
        FeatureId::RiskScore => compute_risk(n),
    }
}

/// Value in source units, for tooltips and tables.
pub fn feature_raw(a: &TissueAnalysis, feature: FeatureId) -> f64 {
    match feature {
        FeatureId::PositiveCellsRatio => or_zero(a.derived.positive_cells_ratio),
        FeatureId::MeanDensity => or_zero(a.derived.mean_density),
        FeatureId::HScore => or_zero(a.derived.h_score),
        FeatureId::Irs => or_zero(a.derived.irs),
        FeatureId::PositiveCellsDensity => or_zero(a.derived.positive_cells_density),
        FeatureId::AreaRatio => area_ratio_raw(&a.raw),
        FeatureId::AreaRatioPx => area_ratio_px_raw(&a.raw),
        FeatureId::SurfaceDensity => surface_density_raw(&a.raw),
        FeatureId::PositiveIntensity => or_zero(a.raw.positive_intensity),
        other => feature_value(&normalize_analysis(a), other),
    }
}

/// Whether the sample actually reports the inputs of a feature.
pub fn feature_present(a: &TissueAnalysis, feature: FeatureId) -> bool {
    let d = &a.derived;
    let r = &a.raw;
    let has = |v: Option<f64>| as_number(v).is_some();
    match feature {
        FeatureId::PositiveCellsRatio => has(d.positive_cells_ratio),
        FeatureId::MeanDensity => has(d.mean_density),
        FeatureId::HScore => has(d.h_score),
        FeatureId::Irs => has(d.irs),
        FeatureId::PositiveCellsDensity => has(d.positive_cells_density),
        FeatureId::PWeak | FeatureId::PModerate | FeatureId::PStrong | FeatureId::PNegative => {
            r.has_cell_counts()
        }
        FeatureId::AreaRatio => {
            (has(r.positive_area_mm2) && has(r.tissue_area_mm2))
                || (has(r.positive_area_px) && has(r.tissue_area_px))
        }
        FeatureId::AreaRatioPx => has(r.positive_area_px) && has(r.tissue_area_px),
        FeatureId::SurfaceDensity => has(r.positive_intensity) && has(r.tissue_area_px),
        FeatureId::PositiveIntensity => has(r.positive_intensity),
        FeatureId::RiskScore => {
            has(d.h_score) || has(d.irs) || has(d.positive_cells_ratio) || has(d.mean_density)
        }
    }
}

/// Per-sample values of one feature across the cohort; `None` where the
/// sample does not report it.
pub fn cohort_values(cohort: &Cohort, feature: FeatureId) -> Vec<Option<f64>> {
    cohort
        .samples()
        .iter()
        .map(|s| {
            if feature_present(&s.analysis, feature) {
                Some(feature_value(&normalize_analysis(&s.analysis), feature))
            } else {
                None
            }
        })
        .collect()
}

pub fn compute_cohort_stats(cohort: &Cohort, feature: FeatureId) -> FeatureStats {
    let present: Vec<f64> = cohort_values(cohort, feature).into_iter().flatten().collect();
    stats_of(&present)
}

pub fn stats_of(values: &[f64]) -> FeatureStats {
    let n = values.len();
    let denom = n.max(1) as f64;
    let mean = values.iter().sum::<f64>() / denom;
    let var = values.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / denom;
    let sd = var.sqrt();
    FeatureStats {
        mean,
        sd: if sd == 0.0 || sd.is_nan() { 1.0 } else { sd },
        n,
    }
}

/// Linear interpolation between the order statistics around `(n-1)*q`.
pub fn quantile_sorted(sorted: &[f64], q: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let pos = (sorted.len() - 1) as f64 * q;
    let base = pos.floor() as usize;
    let rest = pos - base as f64;
    match sorted.get(base + 1) {
        Some(next) => sorted[base] + rest * (next - sorted[base]),
        None => sorted[base],
    }
}

pub fn quantiles(values: &[f64], qs: &[f64]) -> Vec<f64> {
    let sorted = sorted_copy(values);
    qs.iter().map(|&q| quantile_sorted(&sorted, q)).collect()
}

pub fn sorted_copy(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    sorted
}

/// Where one value sits inside the cohort distribution of a feature. All
/// fields except `z` are in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CohortPosition {
    pub value: f64,
    pub stats: FeatureStats,
    /// Raw z-score; `None` below the variance threshold.
    pub z: Option<f64>,
    pub z01: f64,
    pub abs_z: f64,
    pub percentile: f64,
    /// 1..=5.
    pub quantile_group: u8,
    pub rank: f64,
    pub positive_deviation: f64,
    pub negative_deviation: f64,
    pub iqr_position: f64,
    pub stability: f64,
    pub completeness: f64,
    pub n_total: usize,
}

impl CohortPosition {
    pub fn quantile_group_value(&self) -> f64 {
        (self.quantile_group - 1) as f64 / 4.0
    }
}

pub fn cohort_position(values: &[Option<f64>], value: f64) -> CohortPosition {
    let present: Vec<f64> = values.iter().flatten().copied().collect();
    let n = present.len();
    let stats = stats_of(&present);
    let sorted = sorted_copy(&present);

    let (z, z01, abs_z, positive_deviation, negative_deviation, stability) =
        if n >= MIN_COHORT_FOR_VARIANCE {
            let z = (value - stats.mean) / stats.sd;
            let z01 = z_to_unit(z);
            let cv = (stats.sd / if stats.mean == 0.0 { 1.0 } else { stats.mean }).abs();
            (
                Some(z),
                z01,
                clip01(z.abs() / 3.0),
                if z > 0.0 { z01 } else { 0.0 },
                if z < 0.0 { clip01(-z01) } else { 0.0 },
                clip01(1.0 / (1.0 + cv)),
            )
        } else {
            (None, clip01(value), NEUTRAL, NEUTRAL, NEUTRAL, NEUTRAL)
        };

    let percentile = if n >= MIN_COHORT_FOR_PERCENTILE {
        sorted_position(&sorted, value)
    } else {
        NEUTRAL
    };
    let rank = if n == 0 {
        NEUTRAL
    } else {
        sorted_position(&sorted, value)
    };
    let quantile_group = (percentile * 4.0).round() as u8 + 1;

    let iqr_position = if n >= MIN_COHORT_FOR_IQR {
        let q1 = quantile_sorted(&sorted, 0.25);
        let q3 = quantile_sorted(&sorted, 0.75);
        clip01((value - q1) / (q3 - q1).max(1e-6))
    } else {
        NEUTRAL
    };

    let total = values.len();
    let missing = total - n;
    let completeness = if total > 0 {
        clip01(1.0 - missing as f64 / total as f64)
    } else {
        0.0
    };

    CohortPosition {
        value,
        stats,
        z,
        z01,
        abs_z,
        percentile,
        quantile_group,
        rank,
        positive_deviation,
        negative_deviation,
        iqr_position,
        stability,
        completeness,
        n_total: total,
    }
}

/// Winsorize at ±2.5σ and map onto [0, 1].
pub fn z_to_unit(z: f64) -> f64 {
    clip01((z.clamp(-Z_CLAMP, Z_CLAMP) + Z_CLAMP) / (2.0 * Z_CLAMP))
}

// First index holding a value >= `value`, over (n - 1).
fn sorted_position(sorted: &[f64], value: f64) -> f64 {
    if sorted.is_empty() {
        return NEUTRAL;
    }
    let idx = sorted
        .iter()
        .position(|&v| v >= value)
        .unwrap_or(sorted.len() - 1);
    idx as f64 / (sorted.len() - 1).max(1) as f64
}

#[derive(Debug, Clone, Serialize)]
pub struct CohortRow {
    pub sample_id: String,
    pub label: String,
    pub values: [f64; 14],
    pub z01: [f64; 14],
    pub risk: f64,
    pub confidence: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct CohortMatrix {
    pub case_id: String,
    pub features: [FeatureId; 14],
    pub stats: Vec<FeatureStats>,
    pub rows: Vec<CohortRow>,
}

/// Sample × feature table with cohort-scaled values. Each feature is scaled
/// over the samples that report it, so a row's `z01` matches the heatmap's
/// z cell for that sample.
pub fn build_cohort_matrix(cohort: &Cohort) -> CohortMatrix {
    let columns: Vec<Vec<Option<f64>>> = FEATURE_ORDER
        .iter()
        .map(|&f| cohort_values(cohort, f))
        .collect();
    let stats: Vec<FeatureStats> = columns
        .iter()
        .map(|col| stats_of(&col.iter().flatten().copied().collect::<Vec<_>>()))
        .collect();

    let rows = cohort
        .samples()
        .iter()
        .map(|s| {
            let n = normalize_analysis(&s.analysis);
            let mut values = [0.0; 14];
            let mut z01 = [0.0; 14];
            for (i, &f) in FEATURE_ORDER.iter().enumerate() {
                let v = feature_value(&n, f);
                values[i] = v;
                z01[i] = cohort_position(&columns[i], v).z01;
            }
            CohortRow {
                sample_id: s.sample_id.clone(),
                label: s.label.clone(),
                values,
                z01,
                risk: compute_risk(&n),
                confidence: compute_confidence(&s.analysis.raw, &s.analysis.derived),
            }
        })
        .collect();

    CohortMatrix {
        case_id: cohort.case_id().to_string(),
        features: FEATURE_ORDER,
        stats,
        rows,
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage2_cohort.rs"]
mod tests;
