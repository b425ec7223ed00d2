pub mod charts;
pub mod dimensions;
pub mod features;
pub mod levels;
pub mod measurement;
pub mod palette;
pub mod scores;
pub mod thresholds;
