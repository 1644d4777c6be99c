// Integration tests for fieldsense
use async_trait::async_trait;
use fieldsense::{
    build_corpus, bundled_samples, char_ngrams, Availability, AvailabilityOptions,
    CancellationToken, ClassificationSource, ClassifierConfig, EngineConfig, FieldEngine,
    FieldRule, FieldSignals, FieldType, FileStore, GenerativeService, GenerativeSession,
    InputElement, MemoryStore, ModelError, NoGenerativeService, PrototypeSet, SessionConfig,
};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

fn engine() -> FieldEngine {
    FieldEngine::new(
        Arc::new(MemoryStore::new()),
        Arc::new(NoGenerativeService),
        EngineConfig::default(),
    )
    .unwrap()
}

/// Model that always answers with the same text
struct FixedModel {
    answer: String,
    prompts: Arc<AtomicUsize>,
    last_prompt: Arc<Mutex<String>>,
}

struct FixedSession {
    answer: String,
    prompts: Arc<AtomicUsize>,
    last_prompt: Arc<Mutex<String>>,
}

#[async_trait]
impl GenerativeSession for FixedSession {
    async fn prompt(&self, text: &str, _cancel: &CancellationToken) -> Result<String, ModelError> {
        self.prompts.fetch_add(1, Ordering::SeqCst);
        *self.last_prompt.lock() = text.to_string();
        Ok(self.answer.clone())
    }

    async fn destroy(&self) {}
}

#[async_trait]
impl GenerativeService for FixedModel {
    async fn availability(&self, _options: &AvailabilityOptions) -> Availability {
        Availability::Available
    }

    async fn create(
        &self,
        config: &SessionConfig,
    ) -> Result<Arc<dyn GenerativeSession>, ModelError> {
        assert!(config.system_prompt.contains("coupon"));
        Ok(Arc::new(FixedSession {
            answer: self.answer.clone(),
            prompts: self.prompts.clone(),
            last_prompt: self.last_prompt.clone(),
        }))
    }
}

#[test]
fn test_trigrams() {
    assert_eq!(char_ngrams("email", 3), vec!["_em", "ema", "mai", "ail", "il_"]);
    assert!(char_ngrams("", 3).is_empty());
    assert_eq!(char_ngrams("Endereço", 3), char_ngrams("endereco", 3));
}

#[test]
fn test_bundled_dataset_covers_every_type() {
    let samples = bundled_samples().unwrap();
    let corpus = build_corpus(&samples, &[], &[]);
    let set = PrototypeSet::build(&corpus, ClassifierConfig::default());
    assert_eq!(set.len(), FieldType::ALL.len());
}

#[tokio::test]
async fn test_zip_code_with_address_context() {
    let engine = engine();
    let signals = FieldSignals::new(vec!["Zip Code".into()], vec![], vec!["Address".into()]);

    let result = engine.classify_soft(&signals).await.unwrap();
    assert_eq!(result.field_type, FieldType::ZipCode);
    assert!(result.confidence >= ClassifierConfig::default().hard_accept_threshold);
}

#[tokio::test]
async fn test_zero_overlap_returns_first_prototype() {
    let engine = engine();
    let signals = FieldSignals::from_primary("xqxqzk");

    assert!(engine.classify_soft(&signals).await.is_none());
    let hard = engine.classify_hard(&signals).await.unwrap();
    assert_eq!(hard.field_type, FieldType::ZipCode);
    assert_eq!(hard.confidence, 0.0);
    assert!(engine
        .scores(&signals)
        .await
        .iter()
        .all(|(_, score)| *score == 0.0));
}

#[tokio::test]
async fn test_classification_is_deterministic() {
    let a = engine();
    let b = engine();
    for text in ["E-mail", "Telefone celular", "Número do cartão", "qwerty"] {
        let signals = FieldSignals::from_primary(text);
        assert_eq!(
            a.classify_hard(&signals).await,
            b.classify_hard(&signals).await
        );
        assert_eq!(
            a.classify_hard(&signals).await,
            a.classify_hard(&signals).await
        );
    }
}

#[tokio::test]
async fn test_discovered_label_feeds_classifier() {
    let element = InputElement {
        aria_label: Some("E-mail".into()),
        name: Some("email".into()),
        autocomplete: Some("email".into()),
        ..InputElement::default()
    };
    let signals = FieldSignals::from_element(&element);
    let result = engine().classify(&signals).await.unwrap();
    assert_eq!(result.field_type, FieldType::Email);
    assert_eq!(result.source, ClassificationSource::Prototype);
}

#[tokio::test]
async fn test_model_answer_is_learned_and_survives_rebuild() {
    let prompts = Arc::new(AtomicUsize::new(0));
    let last_prompt = Arc::new(Mutex::new(String::new()));
    let model = FixedModel {
        answer: "coupon".into(),
        prompts: prompts.clone(),
        last_prompt: last_prompt.clone(),
    };
    let engine = FieldEngine::new(
        Arc::new(MemoryStore::new()),
        Arc::new(model),
        EngineConfig::default(),
    )
    .unwrap();

    let signals = FieldSignals::from_primary("xqxqzk");
    let result = engine.classify(&signals).await.unwrap();
    assert_eq!(result.field_type, FieldType::Coupon);
    assert_eq!(result.source, ClassificationSource::Ai);
    assert_eq!(result.confidence, 1.0);
    assert!(last_prompt.lock().contains("Label: xqxqzk"));

    let learned = engine.learned_entries().await;
    assert_eq!(learned.len(), 1);
    assert_eq!(learned[0].normalized_signals, "xqxqzk");

    engine.reload().await;
    let result = engine.classify(&signals).await.unwrap();
    assert_eq!(result.field_type, FieldType::Coupon);
    assert_eq!(result.source, ClassificationSource::Prototype);
    assert_eq!(prompts.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_learned_entries_persist_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let signals = FieldSignals::from_primary("Código promocional");
    {
        let store = Arc::new(FileStore::new(dir.path()).unwrap());
        let engine =
            FieldEngine::new(store, Arc::new(NoGenerativeService), EngineConfig::default())
                .unwrap();
        assert!(engine.record_learned_mapping(&signals, FieldType::Coupon).await);
    }

    let store = Arc::new(FileStore::new(dir.path()).unwrap());
    let engine =
        FieldEngine::new(store, Arc::new(NoGenerativeService), EngineConfig::default()).unwrap();
    let learned = engine.learned_entries().await;
    assert_eq!(learned.len(), 1);
    assert_eq!(learned[0].normalized_signals, "codigo promocional");
    assert_eq!(learned[0].field_type, FieldType::Coupon);
}

#[tokio::test]
async fn test_retrain_from_rules() {
    let engine = engine();
    assert_eq!(engine.retrain_from_rules(&[]).await, 0);

    let rules = vec![
        FieldRule {
            id: "r1".into(),
            url_pattern: "https://loja.example/*".into(),
            selector: "#documento".into(),
            field_type: FieldType::Cpf,
            field_name: Some("Documento".into()),
        },
        FieldRule {
            id: "r2".into(),
            url_pattern: "*".into(),
            selector: "input[name=promo]".into(),
            field_type: FieldType::Coupon,
            field_name: None,
        },
    ];
    assert_eq!(engine.import_rules(&rules).await.unwrap(), 2);
    assert_eq!(engine.rules().await, rules);

    let types: Vec<_> = engine
        .learned_entries()
        .await
        .into_iter()
        .map(|e| e.field_type)
        .collect();
    assert_eq!(types, vec![FieldType::Cpf, FieldType::Coupon]);
}

#[test]
fn test_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("fieldsense.toml");
    std::fs::write(&path, "[model]\nenabled = false\ntimeout_ms = 2500\n").unwrap();

    let config = EngineConfig::load(&path).unwrap();
    assert!(!config.model.enabled);
    assert_eq!(config.model.timeout_ms, 2500);
    assert_eq!(config.learning.capacity, 500);
}
