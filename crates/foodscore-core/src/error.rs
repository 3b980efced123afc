use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum FoodScoreError {
    #[error("failed to parse product: {0}")]
    ProductParse(String),

    #[error("product not found: {0}")]
    ProductNotFound(String),

    #[error("no reference entry for {0}")]
    UnknownReference(String),

    #[error("failed to load threshold set from {path}: {reason}")]
    ThresholdsLoad { path: PathBuf, reason: String },

    #[error("invalid threshold set: {0}")]
    ThresholdsInvalid(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
