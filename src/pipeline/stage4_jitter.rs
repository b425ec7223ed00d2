//! Seeded per-cell jitter so neighbouring heatmap cells do not merge into
//! flat bands. Presentation only: no score or threshold ever reads a
//! jittered value.
//!
//! The hash and generator match the browser implementation bit for bit:
//! FNV-1a over UTF-16 code units, then one Mulberry32 draw.

use crate::model::dimensions::Dimension;
use crate::model::features::{FeatureId, clip01};

const FNV_OFFSET: u32 = 2_166_136_261;
const FNV_PRIME: u32 = 16_777_619;

pub fn fnv1a32(key: &str) -> u32 {
    let mut h = FNV_OFFSET;
    for unit in key.encode_utf16() {
        h ^= unit as u32;
        h = h.wrapping_mul(FNV_PRIME);
    }
    h
}

#[derive(Debug, Clone)]
pub struct Mulberry32 {
    state: u32,
}

impl Mulberry32 {
    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    /// Uniform in [0, 1).
    pub fn next_f64(&mut self) -> f64 {
        self.state = self.state.wrapping_add(0x6D2B_79F5);
        let mut t = self.state;
        t = (t ^ (t >> 15)).wrapping_mul(t | 1);
        t ^= t.wrapping_add((t ^ (t >> 7)).wrapping_mul(t | 61));
        (t ^ (t >> 14)) as f64 / 4_294_967_296.0
    }
}

pub fn jitter01(value: f64, key: &str, magnitude: f64) -> f64 {
    let rnd = Mulberry32::new(fnv1a32(key)).next_f64();
    clip01(value + (rnd * 2.0 - 1.0) * magnitude)
}

/// `case|sample|feature|dimension`.
pub fn cell_key(case_id: &str, sample_id: &str, feature: FeatureId, dimension: Dimension) -> String {
    format!("{}|{}|{}|{}", case_id, sample_id, feature.id(), dimension.id())
}

pub fn jitter_cell(
    value: f64,
    case_id: &str,
    sample_id: &str,
    feature: FeatureId,
    dimension: Dimension,
) -> f64 {
    let key = cell_key(case_id, sample_id, feature, dimension);
    jitter01(value, &key, dimension.jitter_class().magnitude())
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage4_jitter.rs"]
mod tests;
