use crate::arbiter::FallbackArbiter;
use crate::cache::PrototypeCache;
use crate::config::EngineConfig;
use crate::generative::GenerativeService;
use crate::session::SessionManager;
use fieldsense_core::{
    bundled_samples, evaluate, ClassificationResult, DatasetStats, EvaluationReport, FieldRule,
    FieldSignals, FieldType, LearnedEntry, PrototypeSet, Result, TrainingSample,
};
use fieldsense_storage::{KeyValueStore, LearningStore, RuleStore};
use std::sync::Arc;
use tracing::info;

/// Entry point tying the prototype cache, the learning loop and the model
/// fallback together over one key-value store.
pub struct FieldEngine {
    config: EngineConfig,
    samples: Arc<Vec<TrainingSample>>,
    learning: Arc<LearningStore>,
    rules: Arc<RuleStore>,
    cache: Arc<PrototypeCache>,
    arbiter: FallbackArbiter,
}

impl FieldEngine {
    /// Engine trained on the bundled dataset
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        service: Arc<dyn GenerativeService>,
        config: EngineConfig,
    ) -> Result<Self> {
        let samples = bundled_samples()?;
        Self::with_samples(store, service, config, samples)
    }

    pub fn with_samples(
        store: Arc<dyn KeyValueStore>,
        service: Arc<dyn GenerativeService>,
        config: EngineConfig,
        samples: Vec<TrainingSample>,
    ) -> Result<Self> {
        config.validate()?;

        let samples = Arc::new(samples);
        let learning = Arc::new(LearningStore::with_config(store.clone(), config.learning));
        let rules = Arc::new(RuleStore::new(store));
        let cache = Arc::new(PrototypeCache::new(
            samples.clone(),
            learning.clone(),
            rules.clone(),
            config.classifier,
        ));
        let sessions = SessionManager::new(service, config.model.clone());
        let arbiter = FallbackArbiter::new(cache.clone(), learning.clone(), sessions);

        Ok(Self {
            config,
            samples,
            learning,
            rules,
            cache,
            arbiter,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn samples(&self) -> &[TrainingSample] {
        &self.samples
    }

    pub fn dataset_stats(&self) -> DatasetStats {
        DatasetStats::from_samples(&self.samples)
    }

    /// Full classification with model fallback
    pub async fn classify(&self, signals: &FieldSignals) -> Option<ClassificationResult> {
        self.arbiter.classify(signals).await
    }

    /// Prototype match only if it clears the hard-accept threshold
    pub async fn classify_soft(&self, signals: &FieldSignals) -> Option<ClassificationResult> {
        self.cache.get().await.classify_soft(&signals.signal_text())
    }

    /// Best prototype match whatever its score
    pub async fn classify_hard(&self, signals: &FieldSignals) -> Option<ClassificationResult> {
        self.cache.get().await.classify(&signals.signal_text())
    }

    /// Every prototype's score for `signals`, best first
    pub async fn scores(&self, signals: &FieldSignals) -> Vec<(FieldType, f32)> {
        self.cache.get().await.scores(&signals.signal_text())
    }

    /// Store a confirmed mapping. It takes part in classification after the
    /// next [`invalidate`](Self::invalidate) or [`reload`](Self::reload).
    pub async fn record_learned_mapping(
        &self,
        signals: &FieldSignals,
        field_type: FieldType,
    ) -> bool {
        self.learning
            .store_learned_entry(&signals.signal_text(), field_type)
            .await
    }

    pub fn invalidate(&self) {
        self.cache.invalidate();
    }

    pub async fn reload(&self) -> Arc<PrototypeSet> {
        self.cache.reload().await
    }

    /// Replace learned entries with ones derived from `rules`, then drop the
    /// cached prototypes. Returns how many rules were imported.
    pub async fn retrain_from_rules(&self, rules: &[FieldRule]) -> usize {
        let imported = self.learning.retrain_learned_from_rules(rules).await;
        self.cache.invalidate();
        imported
    }

    /// Save `rules` as the current rule list and retrain from them
    pub async fn import_rules(&self, rules: &[FieldRule]) -> Result<usize> {
        self.rules.replace_rules(rules).await?;
        let imported = self.retrain_from_rules(rules).await;
        info!("Imported {} of {} rules", imported, rules.len());
        Ok(imported)
    }

    pub async fn rules(&self) -> Vec<FieldRule> {
        self.rules.load_rules().await
    }

    pub async fn learned_entries(&self) -> Vec<LearnedEntry> {
        self.learning.get_learned_entries().await
    }

    pub async fn clear_learned(&self) {
        self.learning.clear_learned_entries().await;
    }

    /// Score the current prototypes against the engine's own samples
    pub async fn evaluate(&self) -> EvaluationReport {
        let set = self.cache.get().await;
        evaluate(&set, &self.samples)
    }

    /// Destroy the generative session, if one is open
    pub async fn shutdown(&self) {
        self.arbiter.sessions().reset().await;
    }
}
