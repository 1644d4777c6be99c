//! Continuous learning store.
//!
//! Confirmed signal to type mappings are kept as one JSON array under
//! [`LEARNED_ENTRIES_KEY`]. Entries are unique by normalized signal text
//! (last write wins), ordered oldest first, and capped at
//! [`LearningConfig::capacity`] with the oldest evicted.
//!
//! Every operation is a read-modify-write of that single record with no
//! locking. Storage failures are logged and degrade to an empty result.
//! Entries that no longer parse are skipped on read and dropped by the next
//! write.

use crate::kv::{decode_list, KeyValueStore};
use chrono::Utc;
use fieldsense_core::{normalize, rule_signals, FieldRule, FieldType, LearnedEntry, Result};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};

pub const LEARNED_ENTRIES_KEY: &str = "learned_entries";

pub const DEFAULT_LEARNED_CAPACITY: usize = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LearningConfig {
    pub capacity: usize,
}

impl Default for LearningConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_LEARNED_CAPACITY,
        }
    }
}

/// Insert `entry`, replacing any entry with the same key, then trim the
/// oldest entries beyond `capacity`.
fn upsert(entries: &mut Vec<LearnedEntry>, entry: LearnedEntry, capacity: usize) {
    entries.retain(|e| e.normalized_signals != entry.normalized_signals);
    entries.push(entry);
    if entries.len() > capacity {
        let excess = entries.len() - capacity;
        entries.drain(..excess);
    }
}

pub struct LearningStore {
    store: Arc<dyn KeyValueStore>,
    config: LearningConfig,
}

impl LearningStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self::with_config(store, LearningConfig::default())
    }

    pub fn with_config(store: Arc<dyn KeyValueStore>, config: LearningConfig) -> Self {
        Self { store, config }
    }

    pub fn config(&self) -> &LearningConfig {
        &self.config
    }

    /// Record a confirmed mapping. Returns whether an entry was persisted;
    /// signals that normalize to nothing are ignored.
    pub async fn store_learned_entry(&self, signals: &str, field_type: FieldType) -> bool {
        let normalized = normalize(signals);
        if normalized.is_empty() {
            return false;
        }

        let mut entries = match self.load().await {
            Ok(entries) => entries,
            Err(e) => {
                warn!("Skipping learned entry for {:?}: read failed: {}", normalized, e);
                return false;
            }
        };

        let entry = LearnedEntry {
            normalized_signals: normalized,
            field_type,
            timestamp: Utc::now().timestamp_millis(),
        };
        debug!(signals = %entry.normalized_signals, %field_type, "Storing learned entry");
        upsert(&mut entries, entry, self.config.capacity);

        match self.save(&entries).await {
            Ok(()) => true,
            Err(e) => {
                warn!("Failed to persist learned entries: {}", e);
                false
            }
        }
    }

    /// All entries, oldest first. Empty when nothing was stored yet or the
    /// record cannot be read.
    pub async fn get_learned_entries(&self) -> Vec<LearnedEntry> {
        self.load().await.unwrap_or_else(|e| {
            warn!("Failed to read learned entries: {}", e);
            Vec::new()
        })
    }

    pub async fn clear_learned_entries(&self) {
        if let Err(e) = self.store.remove(LEARNED_ENTRIES_KEY).await {
            warn!("Failed to clear learned entries: {}", e);
        }
    }

    /// Replace all learned entries with ones derived from `rules`.
    ///
    /// Rules whose synthesized signal text is empty are skipped. Returns the
    /// number of rules imported.
    pub async fn retrain_learned_from_rules(&self, rules: &[FieldRule]) -> usize {
        self.clear_learned_entries().await;

        let now = Utc::now().timestamp_millis();
        let mut entries = Vec::new();
        let mut imported = 0;
        for rule in rules {
            let signals = rule_signals(rule);
            if signals.is_empty() {
                continue;
            }
            upsert(
                &mut entries,
                LearnedEntry {
                    normalized_signals: signals,
                    field_type: rule.field_type,
                    timestamp: now,
                },
                self.config.capacity,
            );
            imported += 1;
        }

        if imported > 0 {
            if let Err(e) = self.save(&entries).await {
                warn!("Failed to persist retrained entries: {}", e);
                return 0;
            }
        }
        info!("Retrained learned entries from {} rules", imported);
        imported
    }

    async fn load(&self) -> Result<Vec<LearnedEntry>> {
        match self.store.get(LEARNED_ENTRIES_KEY).await? {
            Some(value) => decode_list(LEARNED_ENTRIES_KEY, value),
            None => Ok(Vec::new()),
        }
    }

    async fn save(&self, entries: &[LearnedEntry]) -> Result<()> {
        let value = serde_json::to_value(entries)?;
        self.store.set(LEARNED_ENTRIES_KEY, value).await
    }
}
