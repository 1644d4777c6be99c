//! # fieldsense
//!
//! Classifies HTML form fields (e-mail, zip code, CPF, card number...) from
//! the free text around them.
//!
//! A field's signals are normalized, split into character trigrams and
//! compared by cosine similarity against one prototype per field type, built
//! from a bundled dataset plus the user's rules and learned corrections.
//! When no prototype is confident enough, an optional on-device generative
//! model is asked; its answer is remembered for the next rebuild.
//!
//! ## Quick Start
//!
//! ### From the command line
//!
//! ```bash
//! fieldsense classify "Zip Code" --context Address
//! fieldsense learn "Código promocional" coupon
//! fieldsense evaluate
//! ```
//!
//! ### As a Library
//!
//! ```rust
//! use fieldsense::prelude::*;
//! use std::sync::Arc;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<()> {
//! let engine = FieldEngine::new(
//!     Arc::new(MemoryStore::new()),
//!     Arc::new(NoGenerativeService),
//!     EngineConfig::default(),
//! )?;
//!
//! let signals = FieldSignals::new(vec!["Zip Code".into()], vec![], vec!["Address".into()]);
//! let result = engine.classify(&signals).await.unwrap();
//! assert_eq!(result.field_type, FieldType::ZipCode);
//! # Ok(())
//! # }
//! ```
//!
//! ## Crate Structure
//!
//! - [`fieldsense-core`](fieldsense_core) - Normalization, trigram vectors, dataset, corpus, prototype classifier
//! - [`fieldsense-storage`](fieldsense_storage) - Key-value port, learning store, rule store
//! - [`fieldsense-engine`](fieldsense_engine) - Prototype cache, generative fallback, engine facade

// Re-export core types
pub use fieldsense_core::{
    bundled_samples, build_corpus, char_ngrams, discover_label, dot_product, evaluate, normalize,
    rule_signals, vectorize, Category, ClassificationResult, ClassificationSource,
    ClassifierConfig, DatasetStats, Error, EvaluationReport, FieldRule, FieldSignals, FieldType,
    InputElement, LearnedEntry, NGramVector, PrototypeSet, Result, TrainingSample, Vocabulary,
};

// Re-export storage
pub use fieldsense_storage::{FileStore, KeyValueStore, LearningStore, MemoryStore, RuleStore};

// Re-export engine
pub use fieldsense_engine::{
    Availability, AvailabilityOptions, CancellationToken, EngineConfig, FieldEngine,
    GenerativeService, GenerativeSession, ModelConfig, ModelError, NoGenerativeService,
    SessionConfig,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        ClassificationResult, ClassificationSource, EngineConfig, Error, FieldEngine,
        FieldSignals, FieldType, FileStore, InputElement, MemoryStore, NoGenerativeService,
        Result,
    };
}
