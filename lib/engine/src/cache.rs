//! Lazily built prototype set.
//!
//! The set is built from the bundled samples, the user's rules and the
//! learned entries on first use and kept until [`PrototypeCache::invalidate`]
//! or [`PrototypeCache::reload`]. Writes to the learning store do not touch
//! the cache.

use fieldsense_core::{build_corpus, ClassifierConfig, PrototypeSet, TrainingSample};
use fieldsense_storage::{LearningStore, RuleStore};
use parking_lot::RwLock;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

pub struct PrototypeCache {
    samples: Arc<Vec<TrainingSample>>,
    learning: Arc<LearningStore>,
    rules: Arc<RuleStore>,
    config: ClassifierConfig,
    cached: RwLock<Option<Arc<PrototypeSet>>>,
    builds: AtomicUsize,
}

impl PrototypeCache {
    pub fn new(
        samples: Arc<Vec<TrainingSample>>,
        learning: Arc<LearningStore>,
        rules: Arc<RuleStore>,
        config: ClassifierConfig,
    ) -> Self {
        Self {
            samples,
            learning,
            rules,
            config,
            cached: RwLock::new(None),
            builds: AtomicUsize::new(0),
        }
    }

    /// The cached set, building it first if needed.
    ///
    /// Two callers racing on an empty cache may both build; the last one to
    /// finish is kept. Both sets come from the same inputs.
    pub async fn get(&self) -> Arc<PrototypeSet> {
        let cached = self.cached.read().clone();
        match cached {
            Some(set) => set,
            None => self.reload().await,
        }
    }

    /// Rebuild now and replace the cached set
    pub async fn reload(&self) -> Arc<PrototypeSet> {
        let set = Arc::new(self.build().await);
        *self.cached.write() = Some(set.clone());
        set
    }

    /// Drop the cached set; the next [`get`](Self::get) rebuilds it
    pub fn invalidate(&self) {
        if self.cached.write().take().is_some() {
            info!("Prototype cache invalidated");
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.cached.read().is_some()
    }

    /// How many times the set has been built
    pub fn build_count(&self) -> usize {
        self.builds.load(Ordering::Relaxed)
    }

    async fn build(&self) -> PrototypeSet {
        let start = Instant::now();
        let rules = self.rules.load_rules().await;
        let learned = self.learning.get_learned_entries().await;
        let corpus = build_corpus(&self.samples, &rules, &learned);
        let set = PrototypeSet::build(&corpus, self.config);
        self.builds.fetch_add(1, Ordering::Relaxed);

        info!(
            "Built {} prototypes from {} pairs ({} samples, {} rules, {} learned) in {:?}",
            set.len(),
            corpus.len(),
            self.samples.len(),
            rules.len(),
            learned.len(),
            start.elapsed()
        );
        set
    }
}
