//! Nearest-prototype classifier.
//!
//! Each field type is represented by one centroid: the mean of the trigram
//! vectors of its training texts, renormalized to unit length. Scoring a
//! query is one dot product per type, independent of corpus size.
//!
//! Ties on the maximum score go to the type that appeared first in the
//! corpus. A query with no vocabulary overlap scores zero everywhere and so
//! resolves to the first prototype in hard mode.

use crate::corpus::TrainingPair;
use crate::field_type::FieldType;
use crate::text::{normalize, vectorize, Vocabulary, DEFAULT_NGRAM_SIZE};
use crate::vector::NGramVector;
use crate::{Error, Result};
use ahash::AHashMap;
use ordered_float::OrderedFloat;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use tracing::debug;

/// Minimum similarity for a soft classification to be accepted
pub const DEFAULT_HARD_ACCEPT_THRESHOLD: f32 = 0.35;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    pub hard_accept_threshold: f32,
    pub ngram_size: usize,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            hard_accept_threshold: DEFAULT_HARD_ACCEPT_THRESHOLD,
            ngram_size: DEFAULT_NGRAM_SIZE,
        }
    }
}

impl ClassifierConfig {
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.hard_accept_threshold) {
            return Err(Error::InvalidConfig(format!(
                "hard_accept_threshold must be within [0, 1], got {}",
                self.hard_accept_threshold
            )));
        }
        if self.ngram_size == 0 {
            return Err(Error::InvalidConfig("ngram_size must be positive".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassificationSource {
    Prototype,
    Ai,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationResult {
    pub field_type: FieldType,
    pub confidence: f32,
    pub source: ClassificationSource,
}

impl ClassificationResult {
    pub fn prototype(field_type: FieldType, confidence: f32) -> Self {
        Self {
            field_type,
            confidence,
            source: ClassificationSource::Prototype,
        }
    }

    /// A model answer; always reported with full confidence
    pub fn ai(field_type: FieldType) -> Self {
        Self {
            field_type,
            confidence: 1.0,
            source: ClassificationSource::Ai,
        }
    }
}

/// Unit-length centroid for one field type
#[derive(Debug, Clone)]
pub struct Prototype {
    pub field_type: FieldType,
    pub centroid: NGramVector,
    /// Number of training texts averaged into the centroid
    pub support: usize,
}

/// Prototypes plus the vocabulary they were built over
#[derive(Debug, Clone)]
pub struct PrototypeSet {
    vocabulary: Vocabulary,
    prototypes: Vec<Prototype>,
    config: ClassifierConfig,
}

impl PrototypeSet {
    /// Build centroids from a training corpus.
    ///
    /// The vocabulary is every n-gram of the corpus. Prototype order follows
    /// the first appearance of each type in `pairs`.
    pub fn build(pairs: &[TrainingPair], config: ClassifierConfig) -> Self {
        let vocabulary =
            Vocabulary::from_texts(pairs.iter().map(|p| p.text.as_str()), config.ngram_size);

        let vectors: Vec<NGramVector> = pairs
            .par_iter()
            .map(|p| vectorize(&p.text, &vocabulary))
            .collect();

        let mut positions: AHashMap<FieldType, usize> = AHashMap::new();
        let mut prototypes: Vec<Prototype> = Vec::new();
        for (pair, vector) in pairs.iter().zip(&vectors) {
            let pos = *positions.entry(pair.field_type).or_insert_with(|| {
                prototypes.push(Prototype {
                    field_type: pair.field_type,
                    centroid: NGramVector::zeros(vocabulary.len()),
                    support: 0,
                });
                prototypes.len() - 1
            });
            let prototype = &mut prototypes[pos];
            prototype.centroid.accumulate(vector);
            prototype.support += 1;
        }

        for prototype in &mut prototypes {
            prototype.centroid.scale(1.0 / prototype.support as f32);
            prototype.centroid.normalize();
        }

        debug!(
            pairs = pairs.len(),
            vocabulary = vocabulary.len(),
            prototypes = prototypes.len(),
            "Built prototype set"
        );

        Self {
            vocabulary,
            prototypes,
            config,
        }
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    pub fn prototypes(&self) -> &[Prototype] {
        &self.prototypes
    }

    pub fn prototype(&self, field_type: FieldType) -> Option<&Prototype> {
        self.prototypes.iter().find(|p| p.field_type == field_type)
    }

    pub fn len(&self) -> usize {
        self.prototypes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prototypes.is_empty()
    }

    /// Vectorize with this set's vocabulary
    pub fn vectorize(&self, text: &str) -> NGramVector {
        vectorize(text, &self.vocabulary)
    }

    /// Hard classification: the best scoring type, whatever its score.
    ///
    /// `None` only when the text normalizes to nothing or the set is empty.
    pub fn classify(&self, text: &str) -> Option<ClassificationResult> {
        let normalized = normalize(text);
        if normalized.is_empty() {
            return None;
        }
        let query = self.vectorize(&normalized);
        self.best_match(&query)
            .map(|(field_type, score)| ClassificationResult::prototype(field_type, score))
    }

    /// Soft classification: like [`classify`](Self::classify), but `None`
    /// when the best score is under the hard-accept threshold.
    pub fn classify_soft(&self, text: &str) -> Option<ClassificationResult> {
        self.classify(text)
            .filter(|result| result.confidence >= self.config.hard_accept_threshold)
    }

    /// Every prototype's score, best first. Equal scores keep prototype order.
    pub fn scores(&self, text: &str) -> Vec<(FieldType, f32)> {
        let query = self.vectorize(text);
        let mut scores: Vec<(FieldType, f32)> = self
            .prototypes
            .iter()
            .map(|p| (p.field_type, query.dot(&p.centroid)))
            .collect();
        scores.sort_by_key(|(_, score)| Reverse(OrderedFloat(*score)));
        scores
    }

    fn best_match(&self, query: &NGramVector) -> Option<(FieldType, f32)> {
        let mut best: Option<(FieldType, f32)> = None;
        for prototype in &self.prototypes {
            let score = query.dot(&prototype.centroid);
            match best {
                Some((_, best_score)) if score <= best_score => {}
                _ => best = Some((prototype.field_type, score)),
            }
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::PairOrigin;

    fn pair(text: &str, field_type: FieldType) -> TrainingPair {
        TrainingPair {
            text: normalize(text),
            field_type,
            origin: PairOrigin::Dataset,
        }
    }

    fn small_set() -> PrototypeSet {
        PrototypeSet::build(
            &[
                pair("email", FieldType::Email),
                pair("e mail address", FieldType::Email),
                pair("phone", FieldType::Phone),
                pair("telephone", FieldType::Phone),
            ],
            ClassifierConfig::default(),
        )
    }

    #[test]
    fn test_centroids_are_unit_length() {
        let set = small_set();
        assert_eq!(set.len(), 2);
        for prototype in set.prototypes() {
            assert!((prototype.centroid.norm() - 1.0).abs() < 1e-5);
            assert_eq!(prototype.support, 2);
        }
    }

    #[test]
    fn test_classify_picks_nearest_prototype() {
        let set = small_set();
        let result = set.classify("E-mail").unwrap();
        assert_eq!(result.field_type, FieldType::Email);
        assert_eq!(result.source, ClassificationSource::Prototype);
        assert!(result.confidence > 0.6);

        let result = set.classify("Phone number").unwrap();
        assert_eq!(result.field_type, FieldType::Phone);
    }

    #[test]
    fn test_soft_rejects_below_threshold_while_hard_accepts() {
        let set = small_set();
        let hard = set.classify("emxxxx").unwrap();
        assert_eq!(hard.field_type, FieldType::Email);
        assert!(hard.confidence > 0.0);
        assert!(hard.confidence < DEFAULT_HARD_ACCEPT_THRESHOLD);
        assert_eq!(set.classify_soft("emxxxx"), None);
        assert!(set.classify_soft("email").is_some());
    }

    #[test]
    fn test_zero_overlap_resolves_to_first_prototype() {
        let set = small_set();
        let result = set.classify("qqq").unwrap();
        assert_eq!(result.field_type, FieldType::Email);
        assert_eq!(result.confidence, 0.0);
        assert_eq!(set.classify_soft("qqq"), None);
        assert!(set.scores("qqq").iter().all(|(_, s)| *s == 0.0));
    }

    #[test]
    fn test_equal_scores_go_to_first_inserted_type() {
        let set = PrototypeSet::build(
            &[pair("name", FieldType::FirstName), pair("name", FieldType::LastName)],
            ClassifierConfig::default(),
        );
        let result = set.classify("name").unwrap();
        assert_eq!(result.field_type, FieldType::FirstName);
        assert!((result.confidence - 1.0).abs() < 1e-5);

        let scores = set.scores("name");
        assert_eq!(scores[0].0, FieldType::FirstName);
        assert_eq!(scores[1].0, FieldType::LastName);
    }

    #[test]
    fn test_empty_input_and_empty_set() {
        let set = small_set();
        assert_eq!(set.classify(""), None);
        assert_eq!(set.classify("  _-  "), None);

        let empty = PrototypeSet::build(&[], ClassifierConfig::default());
        assert!(empty.is_empty());
        assert_eq!(empty.classify("email"), None);
    }

    #[test]
    fn test_classification_is_deterministic() {
        let a = small_set();
        let b = small_set();
        for text in ["email", "telefone", "mail", "qqq"] {
            assert_eq!(a.classify(text), a.classify(text));
            assert_eq!(a.classify(text), b.classify(text));
        }
    }

    #[test]
    fn test_scores_sorted_descending() {
        let scores = small_set().scores("telephone");
        assert_eq!(scores[0].0, FieldType::Phone);
        assert!(scores[0].1 >= scores[1].1);
    }

    #[test]
    fn test_config_validation() {
        assert!(ClassifierConfig::default().validate().is_ok());
        let bad = ClassifierConfig {
            hard_accept_threshold: 1.5,
            ..Default::default()
        };
        assert!(bad.validate().is_err());
        let bad = ClassifierConfig {
            ngram_size: 0,
            ..Default::default()
        };
        assert!(bad.validate().is_err());
    }
}
