//! The text-generation service seam.
//!
//! The engine never talks to a model directly. A [`Generator`] receives the
//! built prompt and the advisory schema and returns the raw reply as JSON.
//! [`ReplayGenerator`] serves a reply captured earlier from a file, which is
//! what the CLI uses.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use crate::error::GenerationError;

/// An external text-generation service.
///
/// The trait is object-safe so sessions can hold a `&dyn Generator`.
#[async_trait]
pub trait Generator: Send + Sync {
    /// Short name used in logs and errors.
    fn name(&self) -> &str;

    /// Produce a raw reply for `prompt`. `schema` is advisory.
    async fn generate(&self, prompt: &str, schema: &Value) -> Result<Value, GenerationError>;
}

/// Replays a reply stored in a file.
///
/// The file may hold JSON, or free text with a fenced JSON block (as models
/// often answer). Free text is handed on as a JSON string and unwrapped by
/// the normalizer.
#[derive(Debug, Clone)]
pub struct ReplayGenerator {
    path: PathBuf,
}

impl ReplayGenerator {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl Generator for ReplayGenerator {
    fn name(&self) -> &str {
        "replay"
    }

    async fn generate(&self, _prompt: &str, _schema: &Value) -> Result<Value, GenerationError> {
        let text = tokio::fs::read_to_string(&self.path).await?;
        debug!(path = %self.path.display(), bytes = text.len(), "replaying reply");
        match serde_json::from_str::<Value>(&text) {
            Ok(value) => Ok(value),
            Err(_) if text.contains("```") => Ok(Value::String(text)),
            Err(e) => Err(GenerationError::InvalidReply(e)),
        }
    }
}
