//! Accuracy report of a prototype set over labeled samples.

use crate::classifier::PrototypeSet;
use crate::dataset::{Difficulty, TrainingSample};
use crate::field_type::FieldType;
use rayon::prelude::*;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Misclassification {
    pub text: String,
    pub expected: FieldType,
    pub predicted: Option<FieldType>,
    pub confidence: f32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Tally {
    pub correct: usize,
    pub total: usize,
}

impl Tally {
    pub fn accuracy(&self) -> f32 {
        if self.total == 0 {
            0.0
        } else {
            self.correct as f32 / self.total as f32
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EvaluationReport {
    pub overall: Tally,
    /// Samples whose best score cleared the hard-accept threshold
    pub confident: usize,
    pub by_difficulty: BTreeMap<Difficulty, Tally>,
    pub misses: Vec<Misclassification>,
}

impl EvaluationReport {
    pub fn accuracy(&self) -> f32 {
        self.overall.accuracy()
    }
}

/// Hard-classify every sample's signal text against `set`
pub fn evaluate(set: &PrototypeSet, samples: &[TrainingSample]) -> EvaluationReport {
    let threshold = set.config().hard_accept_threshold;
    let outcomes: Vec<_> = samples
        .par_iter()
        .map(|sample| {
            let text = sample.signal_text();
            let result = set.classify(&text);
            (sample, text, result)
        })
        .collect();

    let mut report = EvaluationReport::default();
    for (sample, text, result) in outcomes {
        let predicted = result.as_ref().map(|r| r.field_type);
        let confidence = result.as_ref().map(|r| r.confidence).unwrap_or(0.0);
        let hit = predicted == Some(sample.field_type);

        let tally = report.by_difficulty.entry(sample.difficulty).or_default();
        tally.total += 1;
        report.overall.total += 1;
        if hit {
            tally.correct += 1;
            report.overall.correct += 1;
        } else {
            report.misses.push(Misclassification {
                text,
                expected: sample.field_type,
                predicted,
                confidence,
            });
        }
        if confidence >= threshold {
            report.confident += 1;
        }
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::ClassifierConfig;
    use crate::corpus::build_corpus;
    use crate::dataset::bundled_samples;

    #[test]
    fn test_bundled_dataset_is_mostly_self_consistent() {
        let samples = bundled_samples().unwrap();
        let set = PrototypeSet::build(&build_corpus(&samples, &[], &[]), ClassifierConfig::default());
        let report = evaluate(&set, &samples);
        assert_eq!(report.overall.total, samples.len());
        assert!(report.accuracy() > 0.95, "accuracy {}", report.accuracy());
        assert_eq!(report.misses.len(), report.overall.total - report.overall.correct);
    }

    #[test]
    fn test_empty_tally_accuracy() {
        assert_eq!(Tally::default().accuracy(), 0.0);
    }
}
