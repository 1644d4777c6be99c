//! Bundled training samples.
//!
//! Samples are authored as JSON, one file per [`Category`], and embedded at
//! compile time. Hard samples are deliberate near-misses ("birth city" is a
//! city, not a birth date) kept in the same files as the easy ones.

use crate::field_type::{Category, FieldType};
use crate::signals::FieldSignals;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Where a sample came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SampleSource {
    Synthetic,
    Augmented,
    Manual,
    Rule,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

/// Optional DOM hints recorded with a sample. Not used for scoring.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DomFeatures {
    pub input_type: Option<String>,
    pub max_length: Option<u32>,
    pub pattern: Option<String>,
    pub required: Option<bool>,
}

/// A labeled, immutable training sample
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingSample {
    pub signals: FieldSignals,
    pub category: Category,
    pub field_type: FieldType,
    pub source: SampleSource,
    pub difficulty: Difficulty,
    pub language: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dom_features: Option<DomFeatures>,
}

impl TrainingSample {
    /// Normalized text of all signal groups
    pub fn signal_text(&self) -> String {
        self.signals.signal_text()
    }
}

const BUNDLED: [(Category, &str); 8] = [
    (Category::Address, include_str!("../data/address.json")),
    (Category::Contact, include_str!("../data/contact.json")),
    (Category::Financial, include_str!("../data/financial.json")),
    (Category::Personal, include_str!("../data/personal.json")),
    (Category::Ecommerce, include_str!("../data/ecommerce.json")),
    (Category::System, include_str!("../data/system.json")),
    (Category::Generic, include_str!("../data/generic.json")),
    (Category::Company, include_str!("../data/company.json")),
];

/// Parse one category's dataset, checking every sample is filed under it
pub fn parse_samples(category: Category, json: &str) -> Result<Vec<TrainingSample>> {
    let samples: Vec<TrainingSample> =
        serde_json::from_str(json).map_err(|e| Error::Dataset {
            category: category.to_string(),
            message: e.to_string(),
        })?;

    if let Some(stray) = samples.iter().find(|s| s.category != category) {
        return Err(Error::Dataset {
            category: category.to_string(),
            message: format!(
                "sample for {} is tagged {}",
                stray.field_type, stray.category
            ),
        });
    }

    Ok(samples)
}

/// All bundled samples in fixed category order
pub fn bundled_samples() -> Result<Vec<TrainingSample>> {
    let mut all = Vec::new();
    for (category, json) in BUNDLED {
        all.extend(parse_samples(category, json)?);
    }
    Ok(all)
}

/// Sample counts for a dataset
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DatasetStats {
    pub total: usize,
    pub by_category: BTreeMap<Category, usize>,
    pub by_field_type: BTreeMap<FieldType, usize>,
    pub by_difficulty: BTreeMap<Difficulty, usize>,
}

impl DatasetStats {
    pub fn from_samples(samples: &[TrainingSample]) -> Self {
        let mut stats = Self {
            total: samples.len(),
            ..Self::default()
        };
        for sample in samples {
            *stats.by_category.entry(sample.category).or_insert(0) += 1;
            *stats.by_field_type.entry(sample.field_type).or_insert(0) += 1;
            *stats.by_difficulty.entry(sample.difficulty).or_insert(0) += 1;
        }
        stats
    }
}
