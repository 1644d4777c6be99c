//! # fieldsense Engine
//!
//! Runtime side of the field classifier.
//!
//! - [`PrototypeCache`] - Lazily built prototype set with explicit invalidate and reload
//! - [`SessionManager`] - Shared generative session with timeout, cancellation and cool-down
//! - [`FallbackArbiter`] - Prototype match first, model second, best prototype last
//! - [`FieldEngine`] - Facade over all of the above and the learning store
//! - [`EngineConfig`] - TOML-loadable settings
//!
//! ## Example
//!
//! ```rust,no_run
//! use fieldsense_core::FieldSignals;
//! use fieldsense_engine::{EngineConfig, FieldEngine, NoGenerativeService};
//! use fieldsense_storage::MemoryStore;
//! use std::sync::Arc;
//!
//! # async fn run() -> fieldsense_core::Result<()> {
//! let engine = FieldEngine::new(
//!     Arc::new(MemoryStore::new()),
//!     Arc::new(NoGenerativeService),
//!     EngineConfig::default(),
//! )?;
//! let signals = FieldSignals::new(vec!["E-mail".into()], vec!["email".into()], vec![]);
//! if let Some(result) = engine.classify(&signals).await {
//!     println!("{} ({:.2})", result.field_type, result.confidence);
//! }
//! # Ok(())
//! # }
//! ```

pub mod arbiter;
pub mod cache;
pub mod config;
pub mod engine;
pub mod generative;
pub mod prompt;
pub mod session;

pub use arbiter::FallbackArbiter;
pub use cache::PrototypeCache;
pub use config::{EngineConfig, ModelConfig};
pub use engine::FieldEngine;
pub use generative::{
    Availability, AvailabilityOptions, CancellationToken, GenerativeService, GenerativeSession,
    ModelError, NoGenerativeService, SessionConfig,
};
pub use prompt::{field_prompt, parse_answer, system_prompt};
pub use session::SessionManager;
