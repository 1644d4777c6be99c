//! Shared generative session with bounded calls.
//!
//! One session is created lazily and reused across calls. A timed-out call
//! is cancelled but keeps the session; any other failure destroys it and the
//! next call creates a new one. After the model reports itself unavailable,
//! no availability probe is made until the cool-down has elapsed.

use crate::config::ModelConfig;
use crate::generative::{
    Availability, AvailabilityOptions, CancellationToken, GenerativeService, GenerativeSession,
    ModelError, SessionConfig,
};
use crate::prompt::system_prompt;
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::time::Instant;
use tracing::{debug, warn};

pub struct SessionManager {
    service: Arc<dyn GenerativeService>,
    config: ModelConfig,
    session: tokio::sync::Mutex<Option<Arc<dyn GenerativeSession>>>,
    unavailable_since: Mutex<Option<Instant>>,
}

impl SessionManager {
    pub fn new(service: Arc<dyn GenerativeService>, config: ModelConfig) -> Self {
        Self {
            service,
            config,
            session: tokio::sync::Mutex::new(None),
            unavailable_since: Mutex::new(None),
        }
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    fn session_config(&self) -> SessionConfig {
        SessionConfig {
            system_prompt: system_prompt(),
            temperature: self.config.temperature,
            output_language: self.config.output_language.clone(),
        }
    }

    fn mark_unavailable(&self) {
        *self.unavailable_since.lock() = Some(Instant::now());
    }

    fn in_cooldown(&self) -> bool {
        match *self.unavailable_since.lock() {
            Some(since) => since.elapsed() < self.config.cooldown(),
            None => false,
        }
    }

    /// Probe the service unless a recent probe already said no.
    ///
    /// Anything other than [`Availability::Available`] counts as unavailable
    /// and starts a cool-down.
    pub async fn is_available(&self) -> bool {
        if self.in_cooldown() {
            return false;
        }
        let options = AvailabilityOptions {
            expected_output_language: Some(self.config.output_language.clone()),
        };
        match self.service.availability(&options).await {
            Availability::Available => {
                *self.unavailable_since.lock() = None;
                true
            }
            status => {
                debug!(?status, "Generative model not available");
                self.mark_unavailable();
                false
            }
        }
    }

    /// Whether a session is currently held
    pub async fn has_session(&self) -> bool {
        self.session.lock().await.is_some()
    }

    async fn session(&self) -> Result<Arc<dyn GenerativeSession>, ModelError> {
        let mut slot = self.session.lock().await;
        if let Some(session) = slot.as_ref() {
            return Ok(session.clone());
        }

        if !self.is_available().await {
            return Err(ModelError::Unavailable("model not ready".into()));
        }

        match self.service.create(&self.session_config()).await {
            Ok(session) => {
                debug!("Created generative session");
                *slot = Some(session.clone());
                Ok(session)
            }
            Err(e) => {
                if matches!(e, ModelError::Unavailable(_)) {
                    self.mark_unavailable();
                }
                Err(e)
            }
        }
    }

    /// Prompt the shared session, bounded by the configured timeout.
    pub async fn prompt(&self, text: &str) -> Result<String, ModelError> {
        let session = self.session().await?;
        let cancel = CancellationToken::new();
        let timeout = self.config.timeout();

        match tokio::time::timeout(timeout, session.prompt(text, &cancel)).await {
            Ok(Ok(answer)) => Ok(answer),
            Ok(Err(e)) => {
                warn!("Generative session failed, discarding it: {}", e);
                if matches!(e, ModelError::Unavailable(_)) {
                    self.mark_unavailable();
                }
                self.discard(&session).await;
                Err(e)
            }
            Err(_) => {
                cancel.cancel();
                warn!("Generative model call timed out after {:?}", timeout);
                Err(ModelError::Timeout(timeout))
            }
        }
    }

    /// Destroy the held session, if any
    pub async fn reset(&self) {
        let taken = self.session.lock().await.take();
        if let Some(session) = taken {
            session.destroy().await;
        }
    }

    async fn discard(&self, session: &Arc<dyn GenerativeSession>) {
        {
            let mut slot = self.session.lock().await;
            let held = slot
                .as_ref()
                .is_some_and(|s| Arc::as_ptr(s) as *const () == Arc::as_ptr(session) as *const ());
            if held {
                *slot = None;
            }
        }
        session.destroy().await;
    }
}
