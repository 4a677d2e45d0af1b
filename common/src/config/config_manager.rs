use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard};

use super::{
    ConfigContentProvider, ConfigSerializer, FileContentConfigProvider, Validate,
    YamlConfigSerializer,
};

/// Loads a YAML document once, validates it and caches the parsed value.
/// A missing document yields `TConfig::default()` without touching the cache.
pub struct ConfigManager<TConfigContentProvider, TConfig, TConfigSerializer = YamlConfigSerializer>
where
    TConfigContentProvider: ConfigContentProvider,
    TConfig: Clone + for<'de> Deserialize<'de> + Serialize + Validate + Default,
    TConfigSerializer: ConfigSerializer<TConfig>,
{
    config_serializer: TConfigSerializer,
    config_content_provider: TConfigContentProvider,
    config: Arc<Mutex<Option<TConfig>>>,
}

impl<TConfig> ConfigManager<FileContentConfigProvider, TConfig, YamlConfigSerializer>
where
    TConfig: Clone + for<'de> Deserialize<'de> + Serialize + Validate + Default,
{
    pub fn from_yaml_file(file_path: &str) -> Self {
        Self::new(
            FileContentConfigProvider::new(file_path.to_string()),
            YamlConfigSerializer::new(),
        )
    }
}

impl<TConfigContentProvider, TConfig, TConfigSerializer>
    ConfigManager<TConfigContentProvider, TConfig, TConfigSerializer>
where
    TConfigContentProvider: ConfigContentProvider,
    TConfig: Clone + for<'de> Deserialize<'de> + Serialize + Validate + Default,
    TConfigSerializer: ConfigSerializer<TConfig>,
{
    pub fn new(
        config_content_provider: TConfigContentProvider,
        config_serializer: TConfigSerializer,
    ) -> Self {
        Self {
            config: Arc::new(Mutex::new(None)),
            config_content_provider,
            config_serializer,
        }
    }

    pub fn get_config(&self) -> Result<TConfig, String> {
        let mut current = self.lock()?;

        if let Some(config) = current.as_ref() {
            return Ok(config.clone());
        }

        let Some(config_data) = self.config_content_provider.get_config_content()? else {
            return Ok(TConfig::default());
        };

        let config = self.config_serializer.deserialize(&config_data)?;
        config
            .validate()
            .map_err(|e| format!("Config validation error: {}", e))?;

        *current = Some(config.clone());
        Ok(config)
    }

    pub fn set_config(&self, config: &TConfig) -> Result<(), String> {
        config
            .validate()
            .map_err(|e| format!("Config validation error: {}", e))?;

        let serialized_config = self.config_serializer.serialize(config)?;
        self.config_content_provider
            .set_config_content(&serialized_config)?;

        *self.lock()? = Some(config.clone());
        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Option<TConfig>>, String> {
        self.config
            .lock()
            .map_err(|_| "Config cache lock poisoned".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MemoryContentConfigProvider;

    #[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
    struct Sample {
        value: u32,
    }

    impl Validate for Sample {
        fn validate(&self) -> Result<(), String> {
            if self.value > 100 {
                return Err(format!("value must be at most 100, got {}", self.value));
            }
            Ok(())
        }
    }

    #[test]
    fn test_missing_content_returns_default() {
        let manager: ConfigManager<_, Sample, _> =
            ConfigManager::new(MemoryContentConfigProvider::new(), YamlConfigSerializer::new());
        assert_eq!(manager.get_config().unwrap(), Sample::default());
    }

    #[test]
    fn test_set_then_get_returns_saved_value() {
        let provider = MemoryContentConfigProvider::new();
        let manager = ConfigManager::new(provider.clone(), YamlConfigSerializer::new());
        manager.set_config(&Sample { value: 7 }).unwrap();

        let reloaded: ConfigManager<_, Sample, _> =
            ConfigManager::new(provider, YamlConfigSerializer::new());
        assert_eq!(reloaded.get_config().unwrap(), Sample { value: 7 });
    }

    #[test]
    fn test_invalid_content_is_rejected() {
        let provider = MemoryContentConfigProvider::with_content("value: 500\n");
        let manager: ConfigManager<_, Sample, _> =
            ConfigManager::new(provider, YamlConfigSerializer::new());
        let result = manager.get_config();
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("validation"));
    }

    #[test]
    fn test_set_invalid_config_fails_without_writing() {
        let provider = MemoryContentConfigProvider::new();
        let manager = ConfigManager::new(provider.clone(), YamlConfigSerializer::new());
        assert!(manager.set_config(&Sample { value: 101 }).is_err());
        assert!(provider.get_config_content().unwrap().is_none());
    }
}
