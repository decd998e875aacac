use std::path::PathBuf;

/// Errors surfaced by the hotspot engine and its reporters.
///
/// An empty history or an empty filtered file set is not an error; see
/// [`crate::engine::Outcome`].
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    /// `git log` could not run, or the path is not a git repository.
    #[error("history unavailable for {}: {reason}", repo.display())]
    HistoryUnavailable { repo: PathBuf, reason: String },

    /// Every weight is zero, so there is nothing to normalize against.
    #[error("all scoring weights are zero; at least one weight must be greater than 0")]
    DegenerateWeights,

    #[error("invalid weight '{name}': {value} (weights must be finite and >= 0)")]
    InvalidWeight { name: &'static str, value: f64 },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ScanError>;
