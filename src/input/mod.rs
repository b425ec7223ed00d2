use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, VizError};
use crate::model::measurement::TissueAnalysis;

pub mod shape;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Modality {
    #[serde(rename = "组织切片", alias = "tissue")]
    Tissue,
    #[serde(rename = "CT片", alias = "ct")]
    Ct,
    #[serde(rename = "核磁共振片", alias = "mri")]
    Mri,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SampleRecord {
    pub id: String,
    #[serde(default)]
    pub case_id: Option<String>,
    pub modality: Modality,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub original_filename: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub analysis: Option<TissueAnalysis>,
}

impl SampleRecord {
    pub fn display_label(&self) -> &str {
        non_empty(self.display_name.as_deref())
            .or_else(|| non_empty(self.original_filename.as_deref()))
            .unwrap_or(&self.id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseRecord {
    pub id: String,
    pub identifier: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub samples: Vec<SampleRecord>,
}

/// A consistent read of the case store, as handed over by the API layer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CaseSnapshot {
    #[serde(default)]
    pub cases: Vec<CaseRecord>,
}

impl CaseSnapshot {
    /// Looks a case up by id first, then by its human identifier.
    pub fn find_case(&self, key: &str) -> Result<&CaseRecord> {
        self.cases
            .iter()
            .find(|c| c.id == key)
            .or_else(|| self.cases.iter().find(|c| c.identifier == key))
            .ok_or_else(|| VizError::CaseNotFound(key.to_string()))
    }
}

/// How the upstream producer expressed `positive_cells_ratio`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RatioConvention {
    #[default]
    Fraction,
    Percent,
}

impl RatioConvention {
    pub fn apply(self, analysis: &mut TissueAnalysis) {
        if self == RatioConvention::Percent {
            if let Some(v) = analysis.derived.positive_cells_ratio.as_mut() {
                *v /= 100.0;
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CohortSample {
    pub sample_id: String,
    pub case_id: String,
    pub label: String,
    pub analysis: TissueAnalysis,
}

/// All analyzed tissue samples of one case.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Cohort {
    case_id: String,
    samples: Vec<CohortSample>,
}

impl Cohort {
    /// Keeps only samples that belong to `case`, are tissue sections and
    /// carry an analysis. Input order is preserved.
    pub fn for_case(case: &CaseRecord) -> Self {
        let mut samples = Vec::new();
        for s in &case.samples {
            if s.case_id.as_deref().is_some_and(|id| id != case.id) {
                continue;
            }
            if s.modality != Modality::Tissue {
                continue;
            }
            let Some(analysis) = &s.analysis else {
                continue;
            };
            samples.push(CohortSample {
                sample_id: s.id.clone(),
                case_id: case.id.clone(),
                label: format!("{} · {}", case.identifier, s.display_label()),
                analysis: analysis.clone(),
            });
        }
        debug!(
            case = %case.id,
            total = case.samples.len(),
            cohort = samples.len(),
            "cohort resolved"
        );
        Self {
            case_id: case.id.clone(),
            samples,
        }
    }

    /// Builds a cohort from already-shaped samples, dropping any that belong
    /// to another case.
    pub fn from_samples(case_id: &str, samples: Vec<CohortSample>) -> Self {
        let before = samples.len();
        let samples: Vec<CohortSample> = samples
            .into_iter()
            .filter(|s| s.case_id == case_id)
            .collect();
        if samples.len() != before {
            debug!(
                case = case_id,
                dropped = before - samples.len(),
                "dropped samples from other cases"
            );
        }
        Self {
            case_id: case_id.to_string(),
            samples,
        }
    }

    pub fn case_id(&self) -> &str {
        &self.case_id
    }

    pub fn samples(&self) -> &[CohortSample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn get(&self, sample_id: &str) -> Option<&CohortSample> {
        self.samples.iter().find(|s| s.sample_id == sample_id)
    }

    pub fn contains(&self, sample: &CohortSample) -> bool {
        sample.case_id == self.case_id && self.get(&sample.sample_id).is_some()
    }

    /// The member named `sample_id`, or an empty placeholder that the chart
    /// builders treat as outside the cohort.
    pub fn target(&self, sample_id: &str) -> CohortSample {
        self.get(sample_id).cloned().unwrap_or_else(|| CohortSample {
            sample_id: sample_id.to_string(),
            case_id: self.case_id.clone(),
            label: sample_id.to_string(),
            analysis: TissueAnalysis::default(),
        })
    }
}

pub fn load_snapshot(path: &Path, convention: RatioConvention) -> Result<CaseSnapshot> {
    let text = fs::read_to_string(path)?;
    parse_snapshot(&text, convention)
}

pub fn parse_snapshot(text: &str, convention: RatioConvention) -> Result<CaseSnapshot> {
    let value: serde_json::Value = serde_json::from_str(text)?;
    shape::check_snapshot(&value)?;
    let mut snapshot: CaseSnapshot = serde_json::from_value(value)?;
    for case in &mut snapshot.cases {
        for sample in &mut case.samples {
            if let Some(analysis) = sample.analysis.as_mut() {
                convention.apply(analysis);
            }
        }
    }
    debug!(cases = snapshot.cases.len(), "snapshot parsed");
    Ok(snapshot)
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
#[path = "../../tests/src_inline/input/tests.rs"]
mod tests;
