use std::sync::Mutex;

use chrono::Local;
use serde::{Deserialize, Serialize};

use crate::config::{ConfigManager, FileContentConfigProvider, Validate};

#[derive(Debug)]
pub enum HighScoreError {
    Storage(String),
    LockPoisoned,
}

impl std::fmt::Display for HighScoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HighScoreError::Storage(e) => write!(f, "High score storage error: {}", e),
            HighScoreError::LockPoisoned => write!(f, "High score lock poisoned"),
        }
    }
}

impl std::error::Error for HighScoreError {}

impl From<String> for HighScoreError {
    fn from(e: String) -> Self {
        HighScoreError::Storage(e)
    }
}

/// One persisted integer. Implementations must be cheap to call from the session task.
pub trait HighScoreStore: Send + Sync + 'static {
    fn load(&self) -> Result<u32, HighScoreError>;
    fn save(&self, value: u32) -> Result<(), HighScoreError>;
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HighScoreRecord {
    pub high_score: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub achieved_at: Option<String>,
}

impl Validate for HighScoreRecord {
    fn validate(&self) -> Result<(), String> {
        if self.high_score == 0 && self.achieved_at.is_some() {
            return Err("achievedAt set without a high score".to_string());
        }
        Ok(())
    }
}

pub struct FileHighScoreStore {
    manager: ConfigManager<FileContentConfigProvider, HighScoreRecord>,
}

impl FileHighScoreStore {
    pub fn new(file_path: &str) -> Self {
        Self {
            manager: ConfigManager::from_yaml_file(file_path),
        }
    }

    pub fn record(&self) -> Result<HighScoreRecord, HighScoreError> {
        Ok(self.manager.get_config()?)
    }
}

impl HighScoreStore for FileHighScoreStore {
    fn load(&self) -> Result<u32, HighScoreError> {
        Ok(self.record()?.high_score)
    }

    fn save(&self, value: u32) -> Result<(), HighScoreError> {
        let record = HighScoreRecord {
            high_score: value,
            achieved_at: (value > 0).then(|| Local::now().to_rfc3339()),
        };
        self.manager.set_config(&record)?;
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryHighScoreStore {
    value: Mutex<u32>,
}

impl MemoryHighScoreStore {
    pub fn new(value: u32) -> Self {
        Self {
            value: Mutex::new(value),
        }
    }
}

impl HighScoreStore for MemoryHighScoreStore {
    fn load(&self) -> Result<u32, HighScoreError> {
        let value = self.value.lock().map_err(|_| HighScoreError::LockPoisoned)?;
        Ok(*value)
    }

    fn save(&self, value: u32) -> Result<(), HighScoreError> {
        let mut current = self.value.lock().map_err(|_| HighScoreError::LockPoisoned)?;
        *current = value;
        Ok(())
    }
}

impl<T: HighScoreStore> HighScoreStore for std::sync::Arc<T> {
    fn load(&self) -> Result<u32, HighScoreError> {
        (**self).load()
    }

    fn save(&self, value: u32) -> Result<(), HighScoreError> {
        (**self).save(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> String {
        let path = std::env::temp_dir()
            .join(format!("snake_arcade_{}_{}", std::process::id(), name))
            .join("high_score.yaml");
        let _ = std::fs::remove_file(&path);
        path.to_string_lossy().into_owned()
    }

    #[test]
    fn test_missing_file_loads_zero() {
        let store = FileHighScoreStore::new(&temp_path("missing"));
        assert_eq!(store.load().unwrap(), 0);
    }

    #[test]
    fn test_save_then_load_in_new_store() {
        let path = temp_path("roundtrip");
        FileHighScoreStore::new(&path).save(340).unwrap();

        let reloaded = FileHighScoreStore::new(&path);
        assert_eq!(reloaded.load().unwrap(), 340);
        assert!(reloaded.record().unwrap().achieved_at.is_some());
    }

    #[test]
    fn test_corrupt_file_is_storage_error() {
        let path = temp_path("corrupt");
        std::fs::create_dir_all(std::path::Path::new(&path).parent().unwrap()).unwrap();
        std::fs::write(&path, "highScore: [not a number\n").unwrap();

        let result = FileHighScoreStore::new(&path).load();
        assert!(matches!(result, Err(HighScoreError::Storage(_))));
    }

    #[test]
    fn test_memory_store() {
        let store = MemoryHighScoreStore::new(12);
        assert_eq!(store.load().unwrap(), 12);
        store.save(90).unwrap();
        assert_eq!(store.load().unwrap(), 90);
    }
}
