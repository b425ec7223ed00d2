use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::Serialize;
use tracing::info;

use crate::error::Result;
use crate::input::{Cohort, CohortSample};
use crate::model::charts::{HeatmapChartModel, RadialChartModel};
use crate::model::features::{FEATURE_ORDER, FeatureId};
use crate::model::levels::RiskLevel;
use crate::model::thresholds::ScoringProfile;
use crate::pipeline::stage1_normalize::normalize_analysis;
use crate::pipeline::stage2_cohort::{
    CohortMatrix, build_cohort_matrix, cohort_position, cohort_values, feature_raw, feature_value,
};
use crate::pipeline::stage3_scores::score_sample;
use crate::pipeline::stage5_radial::build_radial_from_view;
use crate::pipeline::stage6_heatmap::build_heatmap_from_view;
use crate::pipeline::stage7_render::{ChartHandle, JsonSurface, render_heatmap, render_radial};
use crate::pipeline::view::{ChartView, resolve_view};
use crate::report::json::{render_pretty, render_summary_json};
use crate::report::text::render_report_text;
use crate::report::{FeatureSummary, SummaryData, ToolMeta, format_f64_6};

#[derive(Debug, Clone)]
pub struct OutputContext {
    pub tool_name: String,
    pub tool_version: String,
    pub ratio_convention: String,
}

impl Default for OutputContext {
    fn default() -> Self {
        Self {
            tool_name: env!("CARGO_PKG_NAME").to_string(),
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
            ratio_convention: "fraction".to_string(),
        }
    }
}

/// Everything computed for one case/sample pair.
#[derive(Debug, Clone)]
pub struct RunOutputs {
    pub radial: RadialChartModel,
    pub heatmap: HeatmapChartModel,
    pub matrix: CohortMatrix,
    pub summary: SummaryData,
}

#[derive(Serialize)]
struct ModelsDoc<'a> {
    radial: &'a RadialChartModel,
    heatmap: &'a HeatmapChartModel,
}

pub fn build_outputs(
    cohort: &Cohort,
    target: Option<&CohortSample>,
    ctx: &OutputContext,
) -> RunOutputs {
    let view = resolve_view(cohort, target);
    RunOutputs {
        radial: build_radial_from_view(&view),
        heatmap: build_heatmap_from_view(&view),
        matrix: build_cohort_matrix(&view.cohort),
        summary: build_summary(&view, ctx),
    }
}

pub fn write_outputs(
    cohort: &Cohort,
    target: Option<&CohortSample>,
    ctx: &OutputContext,
    out_dir: &Path,
) -> Result<RunOutputs> {
    let outputs = build_outputs(cohort, target, ctx);
    write_run(&outputs, out_dir)?;
    Ok(outputs)
}

pub fn write_run(outputs: &RunOutputs, out_dir: &Path) -> Result<()> {
    fs::create_dir_all(out_dir)?;

    let mut radial = ChartHandle::new(JsonSurface::default());
    render_radial(&mut radial, &outputs.radial);
    write_option(radial.surface(), &out_dir.join("radial.json"))?;

    let mut heatmap = ChartHandle::new(JsonSurface::default());
    render_heatmap(&mut heatmap, &outputs.heatmap);
    write_option(heatmap.surface(), &out_dir.join("heatmap.json"))?;

    let models = ModelsDoc {
        radial: &outputs.radial,
        heatmap: &outputs.heatmap,
    };
    write_text(&out_dir.join("models.json"), &render_pretty(&models)?)?;

    write_cohort_tsv(&outputs.matrix, &out_dir.join("cohort.tsv"))?;
    write_text(
        &out_dir.join("summary.json"),
        &render_summary_json(&outputs.summary)?,
    )?;
    write_text(
        &out_dir.join("report.txt"),
        &render_report_text(&outputs.summary),
    )?;

    info!(
        out_dir = %out_dir.display(),
        case = %outputs.summary.case_id,
        sample = %outputs.summary.sample_id,
        fallback = outputs.summary.fallback.is_some(),
        "outputs written"
    );
    Ok(())
}

fn write_option(surface: &JsonSurface, path: &Path) -> Result<()> {
    let text = match &surface.option {
        Some(option) => render_pretty(option)?,
        None => render_pretty(&serde_json::Value::Null)?,
    };
    write_text(path, &text)
}

pub fn build_summary(view: &ChartView, ctx: &OutputContext) -> SummaryData {
    let profile = ScoringProfile::v1();
    let scores = score_sample(&view.target);
    let normalized = normalize_analysis(&view.target);

    let features: Vec<FeatureSummary> = FEATURE_ORDER
        .iter()
        .map(|&feature| {
            let value = feature_value(&normalized, feature);
            let pos = cohort_position(&cohort_values(&view.cohort, feature), value);
            FeatureSummary {
                feature,
                label: feature.label(),
                raw: feature_raw(&view.target, feature),
                value,
                cohort_mean: pos.stats.mean,
                cohort_sd: pos.stats.sd,
                n: pos.stats.n,
                z: pos.z,
                percentile: pos.percentile,
                completeness: pos.completeness,
            }
        })
        .collect();
    let above_cohort: Vec<FeatureId> = features
        .iter()
        .filter(|f| f.z.is_some_and(|z| z >= 1.0))
        .map(|f| f.feature)
        .collect();

    SummaryData {
        tool: ToolMeta {
            name: ctx.tool_name.clone(),
            version: ctx.tool_version.clone(),
            ratio_convention: ctx.ratio_convention.clone(),
        },
        case_id: view.case_id.clone(),
        sample_id: view.sample_id.clone(),
        cohort_size: view.cohort.len(),
        fallback: view.fallback,
        notice: view.notice(),
        risk: scores.risk,
        risk_band: RiskLevel::classify(scores.risk, profile.level_high, profile.level_mid),
        confidence: scores.confidence,
        confidence_breakdown: scores.confidence_breakdown,
        levels: scores.levels,
        composition: normalized.composition,
        features,
        above_cohort,
    }
}

fn write_cohort_tsv(matrix: &CohortMatrix, path: &Path) -> Result<()> {
    let mut w = BufWriter::new(File::create(path)?);
    let mut header = vec![
        "sample_id".to_string(),
        "label".to_string(),
        "risk".to_string(),
        "confidence".to_string(),
    ];
    header.extend(matrix.features.iter().map(|f| f.id().to_string()));
    header.extend(matrix.features.iter().map(|f| format!("{}_z01", f.id())));
    writeln!(w, "{}", header.join("\t"))?;

    for row in &matrix.rows {
        let mut fields = vec![
            sanitize(&row.sample_id),
            sanitize(&row.label),
            format_f64_6(row.risk),
            format_f64_6(row.confidence),
        ];
        fields.extend(row.values.iter().map(|&v| format_f64_6(v)));
        fields.extend(row.z01.iter().map(|&v| format_f64_6(v)));
        writeln!(w, "{}", fields.join("\t"))?;
    }
    w.flush()?;
    Ok(())
}

fn sanitize(s: &str) -> String {
    s.replace(['\t', '\n', '\r'], " ")
}

fn write_text(path: &Path, contents: &str) -> Result<()> {
    let mut w = BufWriter::new(File::create(path)?);
    w.write_all(contents.as_bytes())?;
    w.flush()?;
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage8_output.rs"]
mod tests;
