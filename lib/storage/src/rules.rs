use crate::kv::{decode_list, KeyValueStore};
use fieldsense_core::{FieldRule, Result};
use std::sync::Arc;
use tracing::warn;

pub const FIELD_RULES_KEY: &str = "field_rules";

/// Access to the user's field rules, stored as one JSON array.
///
/// Rule editing lives elsewhere; this side only needs the current list to
/// feed the training corpus, plus a bulk replace for imports.
pub struct RuleStore {
    store: Arc<dyn KeyValueStore>,
}

impl RuleStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Current rules; empty if none were saved or the record is unreadable.
    /// Individual rules that do not parse are skipped.
    pub async fn load_rules(&self) -> Vec<FieldRule> {
        let loaded: Result<Vec<FieldRule>> = async {
            match self.store.get(FIELD_RULES_KEY).await? {
                Some(value) => decode_list(FIELD_RULES_KEY, value),
                None => Ok(Vec::new()),
            }
        }
        .await;

        loaded.unwrap_or_else(|e| {
            warn!("Failed to read field rules: {}", e);
            Vec::new()
        })
    }

    pub async fn replace_rules(&self, rules: &[FieldRule]) -> Result<()> {
        self.store
            .set(FIELD_RULES_KEY, serde_json::to_value(rules)?)
            .await
    }
}
