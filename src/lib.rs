pub mod cli;
pub mod error;
pub mod input;
pub mod logging;
pub mod model;
pub mod pipeline;
pub mod report;

pub use error::VizError;
pub use input::{Cohort, CohortSample};
pub use model::charts::{HeatmapChartModel, RadialChartModel};
pub use model::features::NormalizedFeatureVector;
pub use model::measurement::{DerivedTissueMetrics, RawTissueMeasurement, TissueAnalysis};
pub use pipeline::stage1_normalize::compute_normalized;
pub use pipeline::stage2_cohort::{FeatureStats, compute_cohort_stats};
pub use pipeline::stage3_scores::{compute_confidence, compute_risk};
pub use pipeline::stage4_jitter::jitter01;
pub use pipeline::stage5_radial::build_radial_model;
pub use pipeline::stage6_heatmap::build_heatmap_model;
