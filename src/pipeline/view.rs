use tracing::warn;

use crate::input::{Cohort, CohortSample};
use crate::model::charts::FallbackReason;
use crate::model::measurement::TissueAnalysis;

pub const FALLBACK_SAMPLE_ID: &str = "current";
pub const FALLBACK_LABEL: &str = "Current sample";

/// The cohort and displayed sample a chart is built from, after the
/// fallback rules have been applied.
#[derive(Debug, Clone)]
pub struct ChartView {
    pub case_id: String,
    pub sample_id: String,
    pub cohort: Cohort,
    pub target: TissueAnalysis,
    pub fallback: Option<FallbackReason>,
}

impl ChartView {
    pub fn notice(&self) -> Option<String> {
        self.fallback.map(|r| r.notice().to_string())
    }
}

pub fn resolve_view(cohort: &Cohort, target: Option<&CohortSample>) -> ChartView {
    let case_id = cohort.case_id().to_string();

    let member = target
        .filter(|t| cohort.contains(t))
        .and_then(|t| cohort.get(&t.sample_id));
    if let Some(member) = member {
        return ChartView {
            case_id,
            sample_id: member.sample_id.clone(),
            cohort: cohort.clone(),
            target: member.analysis.clone(),
            fallback: None,
        };
    }

    let reason = if cohort.is_empty() {
        FallbackReason::EmptyCohort
    } else if target.is_some() {
        FallbackReason::TargetNotInCohort
    } else {
        FallbackReason::NoTarget
    };
    warn!(
        case = %case_id,
        sample = target.map(|t| t.sample_id.as_str()).unwrap_or("-"),
        reason = ?reason,
        "showing fallback analysis"
    );

    let fallback = TissueAnalysis::fallback();
    let cohort = if cohort.is_empty() {
        Cohort::from_samples(
            &case_id,
            vec![CohortSample {
                sample_id: FALLBACK_SAMPLE_ID.to_string(),
                case_id: case_id.clone(),
                label: FALLBACK_LABEL.to_string(),
                analysis: fallback.clone(),
            }],
        )
    } else {
        cohort.clone()
    };

    ChartView {
        case_id,
        sample_id: target
            .map(|t| t.sample_id.clone())
            .unwrap_or_else(|| FALLBACK_SAMPLE_ID.to_string()),
        cohort,
        target: fallback,
        fallback: Some(reason),
    }
}
