pub mod stage1_normalize;
pub mod stage2_cohort;
pub mod stage3_scores;
pub mod stage4_jitter;
pub mod stage5_radial;
pub mod stage6_heatmap;
pub mod stage7_render;
pub mod stage8_output;
pub mod view;
