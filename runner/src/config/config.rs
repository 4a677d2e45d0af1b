use common::config::{ConfigManager, FileContentConfigProvider, Validate, YamlConfigSerializer};
use common::{GameConfig, GameMode};
use serde::{Deserialize, Serialize};

use super::DisplayConfig;

const CONFIG_FILE_NAME: &str = "snake_arcade_config.yaml";
const HIGH_SCORE_FILE_NAME: &str = "snake_arcade_high_score.yaml";

fn exe_dir_path(file_name: &str) -> String {
    if let Ok(exe_path) = std::env::current_exe()
        && let Some(exe_dir) = exe_path.parent()
    {
        return exe_dir.join(file_name).to_string_lossy().into_owned();
    }
    file_name.to_string()
}

pub fn get_config_manager(
    path: Option<&str>,
) -> ConfigManager<FileContentConfigProvider, Config, YamlConfigSerializer> {
    match path {
        Some(path) => ConfigManager::from_yaml_file(path),
        None => ConfigManager::from_yaml_file(&exe_dir_path(CONFIG_FILE_NAME)),
    }
}

#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
pub struct Config {
    pub game: GameConfig,
    pub default_mode: GameMode,
    pub high_score_file: String,
    #[serde(default)]
    pub display: DisplayConfig,
}

impl Validate for Config {
    fn validate(&self) -> Result<(), String> {
        self.game.validate()?;
        self.display.validate()?;
        if self.high_score_file.trim().is_empty() {
            return Err("high_score_file must not be empty".to_string());
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            game: GameConfig::default(),
            default_mode: GameMode::Human,
            high_score_file: exe_dir_path(HIGH_SCORE_FILE_NAME),
            display: DisplayConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::config::{ConfigContentProvider, ConfigSerializer};

    fn get_temp_file_path() -> String {
        use std::env;
        let mut path = env::temp_dir();
        let random_number: u32 = rand::random();
        let file_name = format!("temp_snake_arcade_config_{}.yaml", random_number);
        path.push(file_name);
        path.to_str().unwrap().to_string()
    }

    #[test]
    fn test_default_config_can_be_serialized_and_deserialized_string() {
        let default_config = Config::default();
        let serializer = YamlConfigSerializer::new();
        let serialized_string = serializer.serialize(&default_config).unwrap();
        let deserialized_config: Config = serializer.deserialize(&serialized_string).unwrap();
        assert_eq!(default_config, deserialized_config);
    }

    #[test]
    fn test_default_config_can_be_serialized_and_deserialized_manager() {
        let config = Config {
            default_mode: GameMode::Versus,
            ..Config::default()
        };
        let file_path = get_temp_file_path();
        let manager = get_config_manager(Some(&file_path));
        assert!(manager.set_config(&config).is_ok());

        let reloaded = get_config_manager(Some(&file_path));
        assert_eq!(reloaded.get_config().unwrap(), config);
    }

    #[test]
    fn test_missing_file_gives_default() {
        let manager = get_config_manager(Some(&get_temp_file_path()));
        assert_eq!(manager.get_config().unwrap(), Config::default());
    }

    #[test]
    fn test_game_section_uses_recognised_option_names() {
        let content = r#"
            game:
              gridSize: 16
              canvasSize: 480
              initialSpeed: 120
            default_mode: ai
            high_score_file: scores.yaml
        "#;
        let file_path = get_temp_file_path();
        let content_provider = FileContentConfigProvider::new(file_path.clone());
        content_provider.set_config_content(content).unwrap();

        let config = get_config_manager(Some(&file_path)).get_config().unwrap();
        assert_eq!(config.game.tile_count(), 30);
        assert_eq!(config.game.initial_speed, 120);
        assert_eq!(config.game.points_per_food, 10);
        assert_eq!(config.default_mode, GameMode::Ai);
        assert_eq!(config.display, DisplayConfig::default());
    }

    #[test]
    fn test_invalid_config_cant_be_read() {
        let invalid_config_content = r#"
            game:
              gridSize: 7
              canvasSize: 480
            default_mode: human
            high_score_file: scores.yaml
        "#;

        let file_path = get_temp_file_path();
        let content_provider = FileContentConfigProvider::new(file_path.clone());
        content_provider
            .set_config_content(invalid_config_content)
            .unwrap();

        let get_result = get_config_manager(Some(&file_path)).get_config();
        assert!(get_result.is_err());
    }
}
