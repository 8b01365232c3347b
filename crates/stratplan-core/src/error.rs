//! Engine error taxonomy.
//!
//! Only caller errors and external generation failures are ever returned.
//! Malformed or missing reply fields are recovered inside the normalizer and
//! never become an error value.

use stratplan_model::CanonicalKey;
use thiserror::Error;

/// Failures of the external text-generation call.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("generator {generator:?} is unavailable: {reason}")]
    Unavailable { generator: String, reason: String },

    #[error("generator {generator:?} timed out after {seconds}s")]
    Timeout { generator: String, seconds: u64 },

    #[error("generator returned a reply that is not JSON: {0}")]
    InvalidReply(#[from] serde_json::Error),

    #[error("failed to read generator reply: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors surfaced to callers of the engine.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("unknown phase: {0:?}")]
    UnknownPhase(String),

    #[error("update for branch {found} cannot be applied to branch {key}")]
    UpdateKeyMismatch {
        key: CanonicalKey,
        found: CanonicalKey,
    },

    #[error("text generation failed: {0}")]
    Generation(#[from] GenerationError),
}

impl EngineError {
    /// `true` for programming mistakes by the caller (as opposed to
    /// failures of the external generation service).
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            Self::UnknownPhase(_) | Self::UpdateKeyMismatch { .. }
        )
    }
}
