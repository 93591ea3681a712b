use thiserror::Error;

pub type Result<T> = std::result::Result<T, InsightError>;

/// Errors surfaced to callers of the insight pipeline.
///
/// Missing clinical facts are never errors; they are reported as
/// `"Not Found"` in the record.
#[derive(Debug, Error)]
pub enum InsightError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Errors raised while compiling extraction rules.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("invalid regex in pattern `{id}`: {source}")]
    Regex {
        id: String,
        #[source]
        source: regex::Error,
    },

    #[error("pattern `{id}` has no capture group {group}")]
    MissingGroup { id: String, group: usize },
}
