//! # fieldsense Core
//!
//! Core library for the fieldsense field classifier.
//!
//! This crate provides the pure, synchronous building blocks:
//!
//! - [`text`] - Signal normalization, character n-grams, [`Vocabulary`] and vectorization
//! - [`NGramVector`] - Dense trigram vector with dot product and normalization
//! - [`FieldType`] / [`Category`] - The closed set of semantic field labels
//! - [`FieldSignals`] - Text groups describing a field, plus label discovery
//! - [`dataset`] - Bundled training samples
//! - [`corpus`] - Merges samples, rule signals and learned entries into training pairs
//! - [`PrototypeSet`] - Centroid classifier with hard and soft modes
//!
//! ## Example
//!
//! ```rust
//! use fieldsense_core::{bundled_samples, build_corpus, ClassifierConfig, FieldType, PrototypeSet};
//!
//! let samples = bundled_samples().unwrap();
//! let corpus = build_corpus(&samples, &[], &[]);
//! let set = PrototypeSet::build(&corpus, ClassifierConfig::default());
//!
//! let result = set.classify("Zip Code Address").unwrap();
//! assert_eq!(result.field_type, FieldType::ZipCode);
//! ```

pub mod classifier;
pub mod corpus;
pub mod dataset;
pub mod error;
pub mod evaluation;
pub mod field_type;
pub mod signals;
pub mod text;
pub mod vector;

pub use classifier::{
    ClassificationResult, ClassificationSource, ClassifierConfig, Prototype, PrototypeSet,
    DEFAULT_HARD_ACCEPT_THRESHOLD,
};
pub use corpus::{build_corpus, rule_signals, FieldRule, LearnedEntry, PairOrigin, TrainingPair};
pub use dataset::{bundled_samples, DatasetStats, Difficulty, SampleSource, TrainingSample};
pub use error::{Error, Result};
pub use evaluation::{evaluate, EvaluationReport};
pub use field_type::{Category, FieldType};
pub use signals::{discover_label, FieldSignals, InputElement};
pub use text::{char_ngrams, normalize, vectorize, Vocabulary};
pub use vector::{dot_product, NGramVector};
