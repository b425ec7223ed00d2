use thiserror::Error;

#[derive(Debug, Error)]
pub enum VizError {
    /// The caller handed over data that is not shaped like a cohort or a
    /// sample record. Missing or odd numbers never end up here.
    #[error("invalid input shape: {0}")]
    InvalidInputShape(String),

    #[error("case not found: {0}")]
    CaseNotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, VizError>;
