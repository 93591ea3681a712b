use thiserror::Error;

pub type Result<T> = std::result::Result<T, FhirError>;

#[derive(Debug, Error)]
pub enum FhirError {
    #[error("Invalid patient bundle: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to read patient bundle: {0}")]
    Io(#[from] std::io::Error),
}
