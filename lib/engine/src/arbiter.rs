//! Prototype first, generative model second, hard prototype match last.

use crate::cache::PrototypeCache;
use crate::generative::ModelError;
use crate::prompt::{field_prompt, parse_answer};
use crate::session::SessionManager;
use fieldsense_core::{ClassificationResult, FieldSignals, FieldType};
use fieldsense_storage::LearningStore;
use std::sync::Arc;
use tracing::{debug, warn};

pub struct FallbackArbiter {
    cache: Arc<PrototypeCache>,
    learning: Arc<LearningStore>,
    sessions: SessionManager,
}

impl FallbackArbiter {
    pub fn new(
        cache: Arc<PrototypeCache>,
        learning: Arc<LearningStore>,
        sessions: SessionManager,
    ) -> Self {
        Self {
            cache,
            learning,
            sessions,
        }
    }

    pub fn sessions(&self) -> &SessionManager {
        &self.sessions
    }

    /// Classify a field, asking the model only when the prototypes are not
    /// confident.
    ///
    /// A model answer is stored as a learned entry under the field's
    /// normalized signal text and returned with confidence 1. If the model
    /// is disabled, unavailable, slow, failing or answers with something
    /// that is not a field type, the best prototype match is returned
    /// whatever its score. `None` only for signals that normalize to nothing.
    pub async fn classify(&self, signals: &FieldSignals) -> Option<ClassificationResult> {
        let text = signals.signal_text();
        if text.is_empty() {
            return None;
        }

        let set = self.cache.get().await;
        if let Some(result) = set.classify_soft(&text) {
            debug!(
                signals = %text,
                field_type = %result.field_type,
                confidence = result.confidence,
                "Prototype match"
            );
            return Some(result);
        }

        if self.sessions.config().enabled {
            match self.ask_model(signals).await {
                Ok(field_type) => {
                    debug!(signals = %text, %field_type, "Model classification");
                    self.learning.store_learned_entry(&text, field_type).await;
                    return Some(ClassificationResult::ai(field_type));
                }
                Err(ModelError::Unavailable(reason)) => {
                    debug!("Model unavailable, using best prototype: {}", reason);
                }
                Err(e) => {
                    warn!("Model classification failed, using best prototype: {}", e);
                }
            }
        }

        set.classify(&text)
    }

    async fn ask_model(&self, signals: &FieldSignals) -> Result<FieldType, ModelError> {
        let answer = self.sessions.prompt(&field_prompt(signals)).await?;
        parse_answer(&answer)
    }
}
