use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Instant;

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::constants::REGRESSOR_INPUT_DIM;
use crate::regression::{Score, predict_score, resize_embedding};
use crate::registry::ModelRegistry;

use super::envelope::Envelope;
use super::error::GradeError;

/// Event field holding the essay.
pub const TEXT_FIELD: &str = "text";

/// Orchestrates one scoring request: normalize, embed, resize, predict.
#[derive(Debug, Clone)]
pub struct EssayGrader {
    registry: Arc<ModelRegistry>,
    target_dim: usize,
}

impl EssayGrader {
    pub fn new(registry: Arc<ModelRegistry>) -> Self {
        Self {
            registry,
            target_dim: REGRESSOR_INPUT_DIM,
        }
    }

    /// Overrides the width embeddings are resized to before prediction.
    pub fn with_target_dim(mut self, target_dim: usize) -> Self {
        self.target_dim = target_dim;
        self
    }

    pub fn registry(&self) -> &Arc<ModelRegistry> {
        &self.registry
    }

    pub fn target_dim(&self) -> usize {
        self.target_dim
    }

    /// Scores an invocation event. Never fails: every error, including a
    /// panic inside a model, becomes a failure envelope.
    pub fn handle(&self, event: &Value) -> Envelope {
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| self.grade_event(event)))
            .unwrap_or_else(|payload| Err(GradeError::Internal(panic_message(payload))));

        match outcome {
            Ok(score) => Envelope::success(score),
            Err(e) => {
                warn!(kind = e.kind(), error = %e, "Essay scoring failed");
                Envelope::failure(&e)
            }
        }
    }

    pub fn grade_event(&self, event: &Value) -> Result<Score, GradeError> {
        let text = extract_text(event)?;
        self.grade(text)
    }

    /// Loads models if needed, then scores `text`.
    pub fn grade(&self, text: &str) -> Result<Score, GradeError> {
        self.registry.ensure_loaded()?;
        self.grade_loaded(text)
    }

    /// Scores `text` with already-loaded models.
    pub fn grade_loaded(&self, text: &str) -> Result<Score, GradeError> {
        let models = self.registry.models()?;
        let essay_id = essay_digest(text);
        let started = Instant::now();

        let normalized = models.normalizer().normalize(text, true);
        debug!(
            essay_id = %essay_id,
            essay_len = text.len(),
            normalized_len = normalized.len(),
            "Essay normalized"
        );

        let embedding = models.encoder().embed(&normalized)?;
        let source_dim = embedding.len();
        let adapted = resize_embedding(embedding, self.target_dim);
        debug!(
            essay_id = %essay_id,
            source_dim,
            target_dim = self.target_dim,
            "Embedding adapted"
        );

        let score = predict_score(models.regressor(), &adapted)?;

        info!(
            essay_id = %essay_id,
            score,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Essay scored"
        );

        Ok(score)
    }
}

/// Pulls the essay out of an event, rejecting absent or non-string values.
pub fn extract_text(event: &Value) -> Result<&str, GradeError> {
    match event.get(TEXT_FIELD) {
        None => Err(GradeError::MissingField { field: TEXT_FIELD }),
        Some(Value::String(text)) => Ok(text),
        Some(_) => Err(GradeError::InvalidField { field: TEXT_FIELD }),
    }
}

/// Short content digest used to correlate log lines without logging the essay.
pub fn essay_digest(text: &str) -> String {
    blake3::hash(text.as_bytes()).to_hex()[..12].to_string()
}

fn panic_message(payload: Box<dyn std::any::Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        format!("panic during scoring: {}", s)
    } else if let Some(s) = payload.downcast_ref::<String>() {
        format!("panic during scoring: {}", s)
    } else {
        "panic during scoring".to_string()
    }
}
