//! Structural checks for untyped cohort payloads.
//!
//! Missing or unusable numbers are data quality, not shape: they pass and are
//! handled downstream. Only records that cannot be a cohort or a sample at
//! all are rejected here.

use serde_json::{Map, Value};

use crate::error::{Result, VizError};
use crate::input::{Cohort, CohortSample};
use crate::model::measurement::TissueAnalysis;

const RAW_FIELDS: &[&str] = &[
    "pos_cells_1_weak",
    "pos_cells_2_moderate",
    "pos_cells_3_strong",
    "iod_total_cells",
    "positive_area_mm2",
    "tissue_area_mm2",
    "positive_area_px",
    "tissue_area_px",
    "positive_intensity",
];

const DERIVED_FIELDS: &[&str] = &[
    "positive_cells_ratio",
    "positive_cells_density",
    "mean_density",
    "h_score",
    "irs",
];

/// Parses `[{sampleId, raw, derived}, ...]`. Entries that carry a case id
/// other than `case_id` are dropped.
pub fn parse_cohort(value: &Value, case_id: &str) -> Result<Cohort> {
    let Value::Array(entries) = value else {
        return Err(VizError::InvalidInputShape(format!(
            "cohort must be an array, got {}",
            kind(value)
        )));
    };
    let mut samples = Vec::with_capacity(entries.len());
    for (idx, entry) in entries.iter().enumerate() {
        let sample = parse_entry(entry, Some(case_id))
            .map_err(|e| prefix(e, &format!("cohort[{idx}]")))?;
        samples.push(sample);
    }
    Ok(Cohort::from_samples(case_id, samples))
}

/// Parses a single `{sampleId, raw, derived}` record.
pub fn parse_target(value: &Value) -> Result<CohortSample> {
    parse_entry(value, None).map_err(|e| prefix(e, "target"))
}

/// Checks the `{ "cases": [...] }` document ahead of typed decoding.
pub fn check_snapshot(value: &Value) -> Result<()> {
    let obj = value.as_object().ok_or_else(|| {
        VizError::InvalidInputShape(format!("snapshot must be an object, got {}", kind(value)))
    })?;
    let Some(cases) = obj.get("cases") else {
        return Ok(());
    };
    let cases = cases.as_array().ok_or_else(|| {
        VizError::InvalidInputShape(format!("cases must be an array, got {}", kind(cases)))
    })?;
    for (ci, case) in cases.iter().enumerate() {
        let case = case.as_object().ok_or_else(|| {
            VizError::InvalidInputShape(format!("cases[{ci}] must be an object"))
        })?;
        let Some(samples) = case.get("samples") else {
            continue;
        };
        let samples = samples.as_array().ok_or_else(|| {
            VizError::InvalidInputShape(format!("cases[{ci}].samples must be an array"))
        })?;
        for (si, sample) in samples.iter().enumerate() {
            let sample = sample.as_object().ok_or_else(|| {
                VizError::InvalidInputShape(format!("cases[{ci}].samples[{si}] must be an object"))
            })?;
            match sample.get("analysis") {
                None | Some(Value::Null) => {}
                Some(Value::Object(analysis)) => check_analysis(analysis)
                    .map_err(|e| prefix(e, &format!("cases[{ci}].samples[{si}].analysis")))?,
                Some(other) => {
                    return Err(VizError::InvalidInputShape(format!(
                        "cases[{ci}].samples[{si}].analysis must be an object, got {}",
                        kind(other)
                    )));
                }
            }
        }
    }
    Ok(())
}

fn parse_entry(value: &Value, cohort_case: Option<&str>) -> Result<CohortSample> {
    let obj = value.as_object().ok_or_else(|| {
        VizError::InvalidInputShape(format!("expected an object, got {}", kind(value)))
    })?;
    let sample_id = string_field(obj, &["sampleId", "sample_id", "id"])?
        .ok_or_else(|| VizError::InvalidInputShape("missing sampleId".to_string()))?;
    let case_id = string_field(obj, &["caseId", "case_id"])?
        .or_else(|| cohort_case.map(str::to_string))
        .unwrap_or_default();
    let label = string_field(obj, &["label"])?.unwrap_or_else(|| sample_id.clone());

    // Either inline {raw, derived} or nested under "analysis".
    let analysis_obj = match obj.get("analysis") {
        Some(Value::Object(a)) => a,
        Some(other) if !other.is_null() => {
            return Err(VizError::InvalidInputShape(format!(
                "analysis must be an object, got {}",
                kind(other)
            )));
        }
        _ => obj,
    };
    check_analysis(analysis_obj)?;
    let mut sections = Map::new();
    for key in ["raw", "derived"] {
        sections.insert(key.to_string(), Value::Object(section(analysis_obj, key)?.clone()));
    }
    let analysis: TissueAnalysis = serde_json::from_value(Value::Object(sections))?;
    Ok(CohortSample {
        sample_id,
        case_id,
        label,
        analysis,
    })
}

fn check_analysis(obj: &Map<String, Value>) -> Result<()> {
    let raw = section(obj, "raw")?;
    let derived = section(obj, "derived")?;
    check_numeric(raw, RAW_FIELDS, "raw")?;
    check_numeric(derived, DERIVED_FIELDS, "derived")?;
    Ok(())
}

fn section<'a>(obj: &'a Map<String, Value>, key: &str) -> Result<&'a Map<String, Value>> {
    match obj.get(key) {
        Some(Value::Object(m)) => Ok(m),
        Some(other) => Err(VizError::InvalidInputShape(format!(
            "{key} must be an object, got {}",
            kind(other)
        ))),
        None => Err(VizError::InvalidInputShape(format!("missing {key}"))),
    }
}

fn check_numeric(obj: &Map<String, Value>, fields: &[&str], section: &str) -> Result<()> {
    for &field in fields {
        match obj.get(field) {
            None | Some(Value::Null) | Some(Value::Number(_)) => {}
            // Numeric strings are tolerated; anything else is not a reading.
            Some(Value::String(_)) => {}
            Some(other) => {
                return Err(VizError::InvalidInputShape(format!(
                    "{section}.{field} must be a number or null, got {}",
                    kind(other)
                )));
            }
        }
    }
    Ok(())
}

fn string_field(obj: &Map<String, Value>, keys: &[&str]) -> Result<Option<String>> {
    for &key in keys {
        match obj.get(key) {
            None | Some(Value::Null) => continue,
            Some(Value::String(s)) => return Ok(Some(s.clone())),
            Some(Value::Number(n)) => return Ok(Some(n.to_string())),
            Some(other) => {
                return Err(VizError::InvalidInputShape(format!(
                    "{key} must be a string, got {}",
                    kind(other)
                )));
            }
        }
    }
    Ok(None)
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn prefix(err: VizError, at: &str) -> VizError {
    match err {
        VizError::InvalidInputShape(msg) => VizError::InvalidInputShape(format!("{at}: {msg}")),
        other => other,
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/input/shape.rs"]
mod tests;
