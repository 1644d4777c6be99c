//! Port to an on-device generative model.
//!
//! Only the call contract is modelled: probe availability, open a session
//! with a system prompt, prompt it with a cancellation token, destroy it.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::Notify;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Availability {
    Available,
    /// Supported but the model has to be downloaded first
    Downloadable,
    Downloading,
    Unavailable,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityOptions {
    pub expected_output_language: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    pub system_prompt: String,
    pub temperature: f32,
    pub output_language: String,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    #[error("Model unavailable: {0}")]
    Unavailable(String),

    #[error("Model call timed out after {0:?}")]
    Timeout(Duration),

    #[error("Model call cancelled")]
    Cancelled,

    #[error("Model failure: {0}")]
    Failure(String),

    #[error("Unrecognized model answer: {0:?}")]
    InvalidAnswer(String),
}

/// Cooperative cancellation flag shared between the caller and a session.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    inner: Arc<TokenInner>,
}

#[derive(Debug, Default)]
struct TokenInner {
    cancelled: AtomicBool,
    notify: Notify,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::Acquire)
    }

    pub fn cancel(&self) {
        self.inner.cancelled.store(true, Ordering::Release);
        self.inner.notify.notify_waiters();
    }

    /// Resolves once [`cancel`](Self::cancel) has been called
    pub async fn cancelled(&self) {
        while !self.is_cancelled() {
            let notified = self.inner.notify.notified();
            if self.is_cancelled() {
                return;
            }
            notified.await;
        }
    }
}

#[async_trait]
pub trait GenerativeSession: Send + Sync {
    async fn prompt(&self, text: &str, cancel: &CancellationToken) -> Result<String, ModelError>;

    async fn destroy(&self);
}

#[async_trait]
pub trait GenerativeService: Send + Sync {
    async fn availability(&self, options: &AvailabilityOptions) -> Availability;

    async fn create(&self, config: &SessionConfig)
        -> Result<Arc<dyn GenerativeSession>, ModelError>;
}

/// Service for environments without a model. Always unavailable.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoGenerativeService;

#[async_trait]
impl GenerativeService for NoGenerativeService {
    async fn availability(&self, _options: &AvailabilityOptions) -> Availability {
        Availability::Unavailable
    }

    async fn create(
        &self,
        _config: &SessionConfig,
    ) -> Result<Arc<dyn GenerativeSession>, ModelError> {
        Err(ModelError::Unavailable("no generative model configured".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_token_wakes_waiter() {
        let token = CancellationToken::new();
        let waiter = {
            let token = token.clone();
            tokio::spawn(async move { token.cancelled().await })
        };
        tokio::task::yield_now().await;
        assert!(!token.is_cancelled());
        token.cancel();
        waiter.await.unwrap();
        assert!(token.is_cancelled());
    }

    #[tokio::test]
    async fn test_cancelled_returns_immediately_when_already_cancelled() {
        let token = CancellationToken::new();
        token.cancel();
        token.cancelled().await;
    }

    #[tokio::test]
    async fn test_no_service_is_unavailable() {
        let service = NoGenerativeService;
        assert_eq!(
            service.availability(&AvailabilityOptions::default()).await,
            Availability::Unavailable
        );
        let config = SessionConfig {
            system_prompt: String::new(),
            temperature: 0.0,
            output_language: "en".into(),
        };
        assert!(matches!(
            service.create(&config).await,
            Err(ModelError::Unavailable(_))
        ));
    }
}
