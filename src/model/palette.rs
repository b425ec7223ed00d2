use std::fmt;

use serde::{Serialize, Serializer};

use crate::model::features::clip01;
use crate::model::levels::RiskLevel;

/// Sequential yellow-orange-red ramp, low to high.
pub const YL_OR_RD: [&str; 6] = [
    "#fff7bc", "#fee391", "#fec44f", "#fe9929", "#ec7014", "#cc4c02",
];

pub const NEGATIVE_GREY: &str = "#bbbbbb";

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Color {
    Hex(&'static str),
    Rgba { r: u8, g: u8, b: u8, a: f64 },
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::Hex(hex) => f.write_str(hex),
            Color::Rgba { r, g, b, a } => write!(f, "rgba({r},{g},{b},{})", trim_alpha(*a)),
        }
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

fn trim_alpha(a: f64) -> String {
    let s = format!("{:.3}", a);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s.is_empty() { "0".to_string() } else { s.to_string() }
}

pub fn ramp_index(v: f64) -> usize {
    let last = YL_OR_RD.len() - 1;
    let idx = (clip01(v) * last as f64).floor() as usize;
    idx.min(last)
}

pub fn ramp(v: f64) -> Color {
    Color::Hex(YL_OR_RD[ramp_index(v)])
}

pub fn level_color(level: RiskLevel) -> Color {
    match level {
        RiskLevel::High => Color::Hex("#d73027"),
        RiskLevel::Mid => Color::Hex("#fc8d59"),
        RiskLevel::Low => Color::Hex("#fee090"),
    }
}

/// Grey whose opacity grows with the missing-data rate.
pub fn missing_color(rate: f64) -> Color {
    Color::Rgba {
        r: 120,
        g: 120,
        b: 120,
        a: missing_opacity(rate),
    }
}

pub fn missing_opacity(rate: f64) -> f64 {
    0.3 + 0.7 * clip01(rate)
}
