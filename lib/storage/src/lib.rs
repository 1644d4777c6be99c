//! # fieldsense Storage
//!
//! Persistence for the continuous learning loop.
//!
//! - [`KeyValueStore`] - Narrow async get/set/remove port, with [`MemoryStore`] and [`FileStore`]
//! - [`LearningStore`] - Capacity-bounded, deduplicated learned entries
//! - [`RuleStore`] - Read access to user field rules
//!
//! Nothing here is transactional. Read-modify-write sequences on one key
//! can interleave between concurrent callers and lose updates; callers that
//! need per-key atomicity serialize above this layer.

pub mod kv;
pub mod learning;
pub mod rules;

pub use kv::{decode_list, FileStore, KeyValueStore, MemoryStore};
pub use learning::{LearningConfig, LearningStore, DEFAULT_LEARNED_CAPACITY, LEARNED_ENTRIES_KEY};
pub use rules::{RuleStore, FIELD_RULES_KEY};
