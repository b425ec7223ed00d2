use serde::{Deserialize, Deserializer, Serialize};

/// Per-sample scanner readout. Every field may be absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawTissueMeasurement {
    #[serde(default, deserialize_with = "lenient_number", rename = "pos_cells_1_weak")]
    pub weak_cells: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number", rename = "pos_cells_2_moderate")]
    pub moderate_cells: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number", rename = "pos_cells_3_strong")]
    pub strong_cells: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number", rename = "iod_total_cells")]
    pub total_cells: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub positive_area_mm2: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub tissue_area_mm2: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub positive_area_px: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub tissue_area_px: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub positive_intensity: Option<f64>,
}

/// Indicators computed by the recognition step upstream.
///
/// `positive_cells_ratio` is a fraction in [0, 1]; percent-valued sources are
/// converted when the snapshot is loaded (see `input::RatioConvention`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DerivedTissueMetrics {
    #[serde(default, deserialize_with = "lenient_number")]
    pub positive_cells_ratio: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub positive_cells_density: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub mean_density: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub h_score: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub irs: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TissueAnalysis {
    #[serde(default)]
    pub raw: RawTissueMeasurement,
    #[serde(default)]
    pub derived: DerivedTissueMetrics,
}

// Database numeric columns may arrive as strings.
fn lenient_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrText {
        Number(f64),
        Text(String),
    }

    let value = Option::<NumberOrText>::deserialize(deserializer)?;
    let parsed = match value {
        Some(NumberOrText::Number(n)) => Some(n),
        Some(NumberOrText::Text(s)) => s.trim().parse::<f64>().ok(),
        None => None,
    };
    Ok(parsed.filter(|v| v.is_finite()))
}

/// Finite value or nothing. NaN and infinities count as missing.
pub fn as_number(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

/// Arithmetic view of a nullable field: missing reads as 0.
pub fn or_zero(value: Option<f64>) -> f64 {
    as_number(value).unwrap_or(0.0)
}

impl RawTissueMeasurement {
    pub fn has_cell_counts(&self) -> bool {
        [
            self.weak_cells,
            self.moderate_cells,
            self.strong_cells,
            self.total_cells,
        ]
        .into_iter()
        .any(|v| as_number(v).is_some())
    }
}

impl TissueAnalysis {
    /// The representative sample shown when a case has nothing analyzed yet.
    pub fn fallback() -> Self {
        Self {
            raw: RawTissueMeasurement {
                weak_cells: Some(1200.0),
                moderate_cells: Some(3200.0),
                strong_cells: Some(660.0),
                total_cells: Some(5060.0),
                positive_area_mm2: Some(0.52),
                tissue_area_mm2: Some(1.8),
                positive_area_px: Some(1_720_000.0),
                tissue_area_px: Some(6_250_000.0),
                positive_intensity: Some(2.0),
            },
            derived: DerivedTissueMetrics {
                positive_cells_ratio: Some(0.82),
                positive_cells_density: Some(0.12),
                mean_density: Some(0.11),
                h_score: Some(186.0),
                irs: Some(8.0),
            },
        }
    }
}
