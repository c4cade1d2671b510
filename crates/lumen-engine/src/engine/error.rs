use thiserror::Error;

/// Errors reported by engine builders and uploads.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EngineError {
    #[error("unknown {0} handle")]
    UnknownHandle(&'static str),

    #[error("invalid {builder} builder: {reason}")]
    InvalidBuilder {
        builder: &'static str,
        reason: String,
    },

    #[error("buffer size mismatch: expected {expected} bytes, got {actual}")]
    BufferSize { expected: usize, actual: usize },

    #[error("buffer slot {index} out of range (buffer count {count})")]
    BufferSlot { index: usize, count: usize },

    #[error("invalid material package: {0}")]
    MaterialPackage(String),
}

impl EngineError {
    pub(crate) fn builder(builder: &'static str, reason: impl Into<String>) -> Self {
        EngineError::InvalidBuilder { builder, reason: reason.into() }
    }
}
