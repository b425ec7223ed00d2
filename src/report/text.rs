use crate::model::charts::StainGrade;
use crate::model::features::Composition;
use crate::model::levels::RiskLevel;
use crate::model::thresholds::MIN_COHORT_FOR_VARIANCE;
use crate::report::{SummaryData, format_f64_6, format_percent};

pub fn render_report_text(data: &SummaryData) -> String {
    let mut out = String::new();

    out.push_str("Tissue Staining Summary\n");
    out.push_str("=======================\n\n");
    out.push_str(&format!("Case: {}\n", data.case_id));
    out.push_str(&format!("Sample: {}\n", data.sample_id));
    out.push_str(&format!("Cohort size: {}\n", data.cohort_size));
    if let Some(notice) = &data.notice {
        out.push_str(&format!("Note: {}\n", notice));
    }
    out.push('\n');

    out.push_str("1. Composite risk\n");
    out.push_str(&format!(
        "Risk score: {} ({})\n",
        format_f64_6(data.risk),
        risk_band_label(data.risk_band)
    ));
    out.push_str(&format!(
        "Sub-indicator levels: high={}, mid={}, low={}\n\n",
        data.levels.high_count, data.levels.mid_count, data.levels.low_count
    ));

    out.push_str("2. Confidence\n");
    out.push_str(&format!("Confidence: {}\n", format_f64_6(data.confidence)));
    let b = &data.confidence_breakdown;
    out.push_str(&format!(
        "Breakdown: cells={}, area={}, negative_penalty={}\n",
        format_f64_6(b.cells_score),
        format_f64_6(b.area_score),
        format_f64_6(b.negative_penalty)
    ));
    out.push_str(&format!("{}\n\n", confidence_statement(data.confidence)));

    out.push_str("3. Staining composition\n");
    let c = &data.composition;
    out.push_str(&format!(
        "Negative {} | Weak {} | Moderate {} | Strong {}\n",
        format_percent(c.negative),
        format_percent(c.weak),
        format_percent(c.moderate),
        format_percent(c.strong)
    ));
    out.push_str(&format!(
        "Dominant grade: {}\n\n",
        dominant_grade(c).label()
    ));

    out.push_str("4. Position in cohort\n");
    if data.above_cohort.is_empty() {
        out.push_str("No feature stands more than one SD above the cohort.\n");
    } else {
        let labels: Vec<&str> = data.above_cohort.iter().map(|f| f.label()).collect();
        out.push_str(&format!("Above cohort: {}\n", labels.join(", ")));
    }
    if data.cohort_size < MIN_COHORT_FOR_VARIANCE {
        out.push_str("Cohort too small for z-scores; positions are neutral.\n");
    }

    out
}

pub fn risk_band_label(level: RiskLevel) -> &'static str {
    match level {
        RiskLevel::High => "high",
        RiskLevel::Mid => "intermediate",
        RiskLevel::Low => "low",
    }
}

fn confidence_statement(confidence: f64) -> &'static str {
    if confidence >= 0.75 {
        "Adequate cell count and tissue area."
    } else if confidence >= 0.5 {
        "Usable, with limited cell count or tissue area."
    } else {
        "Low confidence: small section or few counted cells."
    }
}

/// Largest share; ties go to the stronger grade.
pub fn dominant_grade(c: &Composition) -> StainGrade {
    let grades = [
        (StainGrade::Negative, c.negative),
        (StainGrade::Weak, c.weak),
        (StainGrade::Moderate, c.moderate),
        (StainGrade::Strong, c.strong),
    ];
    let mut best = grades[0];
    for g in &grades[1..] {
        if g.1 >= best.1 {
            best = *g;
        }
    }
    best.0
}
