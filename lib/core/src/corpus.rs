//! Training corpus reconciliation.
//!
//! Bundled samples, user rules and learned entries each contribute labeled
//! pairs independently. Nothing here resolves conflicts between sources; two
//! pairs with the same text and different types both reach the classifier,
//! where centroid averaging settles them.

use crate::dataset::TrainingSample;
use crate::field_type::FieldType;
use crate::text::normalize;
use serde::{Deserialize, Serialize};

/// A user-defined field mapping rule. Only the parts that feed rule signal
/// synthesis are modelled here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldRule {
    pub id: String,
    #[serde(default)]
    pub url_pattern: String,
    pub selector: String,
    pub field_type: FieldType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_name: Option<String>,
}

/// A confirmed signal to type mapping recorded at runtime
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LearnedEntry {
    pub normalized_signals: String,
    pub field_type: FieldType,
    /// Unix milliseconds
    pub timestamp: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PairOrigin {
    Dataset,
    Rule,
    Learned,
}

/// Normalized signal text with its label
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainingPair {
    pub text: String,
    pub field_type: FieldType,
    pub origin: PairOrigin,
}

/// Split a CSS selector into words: every character that is not a letter or
/// digit (ids, classes, attribute brackets, quotes, combinators) becomes a
/// space, and runs of spaces collapse.
pub fn tokenize_selector(selector: &str) -> String {
    selector
        .split(|c: char| !c.is_alphanumeric())
        .filter(|token| !token.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Signal string synthesized from a rule: its field type, field name and
/// tokenized selector, joined and normalized. May be empty.
pub fn rule_signals(rule: &FieldRule) -> String {
    let selector = tokenize_selector(&rule.selector);
    let parts = [
        rule.field_type.as_str(),
        rule.field_name.as_deref().unwrap_or_default(),
        selector.as_str(),
    ];
    normalize(&parts.join(" "))
}

/// Flatten the three sources into labeled pairs.
///
/// Order is dataset, then rules, then learned entries, each in input order.
/// Empty texts are skipped.
pub fn build_corpus(
    samples: &[TrainingSample],
    rules: &[FieldRule],
    learned: &[LearnedEntry],
) -> Vec<TrainingPair> {
    let dataset = samples
        .iter()
        .map(|s| (s.signal_text(), s.field_type, PairOrigin::Dataset));
    let from_rules = rules
        .iter()
        .map(|r| (rule_signals(r), r.field_type, PairOrigin::Rule));
    let from_learned = learned.iter().map(|e| {
        (
            normalize(&e.normalized_signals),
            e.field_type,
            PairOrigin::Learned,
        )
    });

    dataset
        .chain(from_rules)
        .chain(from_learned)
        .filter(|(text, _, _)| !text.is_empty())
        .map(|(text, field_type, origin)| TrainingPair {
            text,
            field_type,
            origin,
        })
        .collect()
}
