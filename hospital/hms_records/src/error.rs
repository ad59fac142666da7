use serde::Serialize;
use thiserror::Error;

/// Failure to read a payload at all. Individual bad entries inside an
/// otherwise well-formed payload are reported as [`ValidationError`]s instead.
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unexpected payload shape: {0}")]
    Envelope(String),
}

/// A single rejected entry, identified by its position in the source array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[error("entry {index}: {message}")]
pub struct ValidationError {
    pub index: usize,
    pub message: String,
}

impl ValidationError {
    pub fn new(index: usize, message: impl Into<String>) -> Self {
        Self {
            index,
            message: message.into(),
        }
    }
}
