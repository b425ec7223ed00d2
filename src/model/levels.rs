use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    High,
    Mid,
    Low,
}

pub fn level_order() -> &'static [RiskLevel] {
    &[RiskLevel::High, RiskLevel::Mid, RiskLevel::Low]
}

impl RiskLevel {
    pub fn classify(value: f64, high: f64, mid: f64) -> Self {
        if value >= high {
            RiskLevel::High
        } else if value >= mid {
            RiskLevel::Mid
        } else {
            RiskLevel::Low
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RiskLevel::High => "High",
            RiskLevel::Mid => "Mid",
            RiskLevel::Low => "Low",
        }
    }
}

/// Share of the sub-indicators falling in each level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LevelTally {
    pub high: f64,
    pub mid: f64,
    pub low: f64,
    pub high_count: usize,
    pub mid_count: usize,
    pub low_count: usize,
}

impl LevelTally {
    pub fn fraction(&self, level: RiskLevel) -> f64 {
        match level {
            RiskLevel::High => self.high,
            RiskLevel::Mid => self.mid,
            RiskLevel::Low => self.low,
        }
    }

    pub fn count(&self, level: RiskLevel) -> usize {
        match level {
            RiskLevel::High => self.high_count,
            RiskLevel::Mid => self.mid_count,
            RiskLevel::Low => self.low_count,
        }
    }
}
