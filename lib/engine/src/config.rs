use fieldsense_core::{ClassifierConfig, Error, Result};
use fieldsense_storage::LearningConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Generative model fallback settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// When false the arbiter never calls the model
    pub enabled: bool,
    /// Upper bound on a single prompt
    pub timeout_ms: u64,
    /// Wait after an unavailable probe before probing again
    pub cooldown_secs: u64,
    pub temperature: f32,
    pub output_language: String,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            timeout_ms: 5_000,
            cooldown_secs: 60,
            temperature: 0.1,
            output_language: "en".to_string(),
        }
    }
}

impl ModelConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn cooldown(&self) -> Duration {
        Duration::from_secs(self.cooldown_secs)
    }
}

/// Full engine configuration, loadable from TOML.
///
/// ```toml
/// [classifier]
/// hard_accept_threshold = 0.4
///
/// [learning]
/// capacity = 1000
///
/// [model]
/// timeout_ms = 3000
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub classifier: ClassifierConfig,
    pub learning: LearningConfig,
    pub model: ModelConfig,
}

impl EngineConfig {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: Self = toml::from_str(s).map_err(|e| Error::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> Result<()> {
        self.classifier.validate()?;
        if self.learning.capacity == 0 {
            return Err(Error::InvalidConfig("learning.capacity must be positive".into()));
        }
        if self.model.timeout_ms == 0 {
            return Err(Error::InvalidConfig("model.timeout_ms must be positive".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.learning.capacity, 500);
        assert_eq!(config.model.timeout(), Duration::from_secs(5));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = EngineConfig::from_toml_str(
            r#"
            [classifier]
            hard_accept_threshold = 0.5

            [model]
            enabled = false
            "#,
        )
        .unwrap();
        assert_eq!(config.classifier.hard_accept_threshold, 0.5);
        assert_eq!(config.classifier.ngram_size, 3);
        assert!(!config.model.enabled);
        assert_eq!(config.model.cooldown_secs, 60);
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(EngineConfig::from_toml_str("[learning]\ncapacity = 0").is_err());
        assert!(EngineConfig::from_toml_str("[classifier]\nhard_accept_threshold = 2.0").is_err());
        assert!(EngineConfig::from_toml_str("[model\n").is_err());
    }
}
