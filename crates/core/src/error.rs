use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed reading catalog file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("catalog is not a valid POI array: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("catalog record {index} is invalid: {reason}")]
    InvalidRecord { index: usize, reason: &'static str },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PreferenceError {
    #[error("days must be between 1 and {max}, got {value}")]
    InvalidDays { value: i64, max: u32 },
    #[error("max_walk_min must not be negative, got {0}")]
    InvalidWalkLimit(i64),
}
