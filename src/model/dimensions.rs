use serde::{Deserialize, Serialize};

/// Heatmap columns: the ways a reviewer looks at one feature value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    Normalized,
    Decile,
    ZScore,
    AbsZ,
    Percentile,
    QuantileGroup,
    Rank,
    PositiveDeviation,
    NegativeDeviation,
    IqrPosition,
    Confidence,
    Stability,
    Weight,
    Completeness,
}

pub const DIMENSION_ORDER: [Dimension; 14] = [
    Dimension::Normalized,
    Dimension::Decile,
    Dimension::ZScore,
    Dimension::AbsZ,
    Dimension::Percentile,
    Dimension::QuantileGroup,
    Dimension::Rank,
    Dimension::PositiveDeviation,
    Dimension::NegativeDeviation,
    Dimension::IqrPosition,
    Dimension::Confidence,
    Dimension::Stability,
    Dimension::Weight,
    Dimension::Completeness,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JitterClass {
    Deviation,
    Binned,
    Default,
}

impl JitterClass {
    pub fn magnitude(self) -> f64 {
        match self {
            JitterClass::Deviation => 0.18,
            JitterClass::Binned => 0.12,
            JitterClass::Default => 0.10,
        }
    }
}

impl Dimension {
    /// Stable id, used in jitter keys.
    pub fn id(self) -> &'static str {
        match self {
            Dimension::Normalized => "norm",
            Dimension::Decile => "norm_dec",
            Dimension::ZScore => "z",
            Dimension::AbsZ => "z_abs",
            Dimension::Percentile => "pct",
            Dimension::QuantileGroup => "qgrp",
            Dimension::Rank => "rank",
            Dimension::PositiveDeviation => "dev_pos",
            Dimension::NegativeDeviation => "dev_neg",
            Dimension::IqrPosition => "iqr",
            Dimension::Confidence => "conf",
            Dimension::Stability => "stab",
            Dimension::Weight => "w",
            Dimension::Completeness => "comp",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Dimension::Normalized => "Normalized",
            Dimension::Decile => "Decile",
            Dimension::ZScore => "z-score",
            Dimension::AbsZ => "|z|",
            Dimension::Percentile => "Percentile",
            Dimension::QuantileGroup => "Quantile group",
            Dimension::Rank => "Rank",
            Dimension::PositiveDeviation => "Positive deviation",
            Dimension::NegativeDeviation => "Negative deviation",
            Dimension::IqrPosition => "IQR position",
            Dimension::Confidence => "Confidence",
            Dimension::Stability => "Stability",
            Dimension::Weight => "Weight",
            Dimension::Completeness => "Completeness",
        }
    }

    pub fn jitter_class(self) -> JitterClass {
        match self {
            Dimension::AbsZ | Dimension::PositiveDeviation | Dimension::NegativeDeviation => {
                JitterClass::Deviation
            }
            Dimension::Decile | Dimension::QuantileGroup => JitterClass::Binned,
            _ => JitterClass::Default,
        }
    }

    pub fn column_index(self) -> usize {
        DIMENSION_ORDER
            .iter()
            .position(|&d| d == self)
            .unwrap_or_default()
    }
}
