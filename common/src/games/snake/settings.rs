use serde::{Deserialize, Serialize};

use crate::config::Validate;
use super::grid::Grid;
use super::types::Millis;

pub const MIN_TICK_INTERVAL_MS: Millis = 50;
pub const SPEED_BOOST_DELTA_MS: Millis = 60;
pub const SPEED_BOOST_FLOOR_MS: Millis = 45;
pub const SLOW_DOWN_DELTA_MS: Millis = 80;
pub const BONUS_POINTS: u32 = 50;

pub const POWERUP_LIFETIME_MS: Millis = 35_000;
pub const POWERUP_SPAWN_JITTER_MS: Millis = 4_000;
pub const POWERUP_SWEEP_INTERVAL_MS: Millis = 5_000;
pub const POWER_EXPIRY_POLL_INTERVAL_MS: Millis = 500;

pub const FOOD_PLACEMENT_ATTEMPTS: usize = 1_000;
pub const POWERUP_PLACEMENT_ATTEMPTS: usize = 200;

const MIN_TILE_COUNT: u32 = 16;
const MAX_TILE_COUNT: u32 = 100;

/// Static game tuning, deserialized with the option names the UI shell uses.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GameConfig {
    pub grid_size: u32,
    pub canvas_size: u32,
    pub initial_speed: Millis,
    pub speed_increase: Millis,
    pub points_per_food: u32,
    pub points_per_level: u32,
    pub powerup_spawn_freq: Millis,
    pub powerup_duration: Millis,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_size: 20,
            canvas_size: 480,
            initial_speed: 160,
            speed_increase: 10,
            points_per_food: 10,
            points_per_level: 100,
            powerup_spawn_freq: 12_000,
            powerup_duration: 8_000,
        }
    }
}

impl GameConfig {
    pub fn tile_count(&self) -> i32 {
        (self.canvas_size / self.grid_size.max(1)) as i32
    }

    pub fn grid(&self) -> Grid {
        Grid::new(self.tile_count())
    }

    /// Tick interval implied by the level alone, ignoring any active power-up.
    pub fn baseline_interval(&self, level: u32) -> Millis {
        let decrease = Millis::from(level).saturating_mul(self.speed_increase);
        self.initial_speed
            .saturating_sub(decrease)
            .max(MIN_TICK_INTERVAL_MS)
    }

    pub fn level_for_score(&self, score: u32) -> u32 {
        score / self.points_per_level + 1
    }
}

impl Validate for GameConfig {
    fn validate(&self) -> Result<(), String> {
        if self.grid_size == 0 {
            return Err("gridSize must be positive".to_string());
        }
        if self.canvas_size % self.grid_size != 0 {
            return Err(format!(
                "canvasSize {} must be a multiple of gridSize {}",
                self.canvas_size, self.grid_size
            ));
        }
        let tiles = self.canvas_size / self.grid_size;
        if !(MIN_TILE_COUNT..=MAX_TILE_COUNT).contains(&tiles) {
            return Err(format!(
                "Board must be between {} and {} tiles wide, got {}",
                MIN_TILE_COUNT, MAX_TILE_COUNT, tiles
            ));
        }
        if self.initial_speed < MIN_TICK_INTERVAL_MS {
            return Err(format!(
                "initialSpeed must be at least {}ms, got {}",
                MIN_TICK_INTERVAL_MS, self.initial_speed
            ));
        }
        if self.points_per_level == 0 {
            return Err("pointsPerLevel must be positive".to_string());
        }
        if self.powerup_spawn_freq == 0 {
            return Err("powerupSpawnFreq must be positive".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConfigSerializer, YamlConfigSerializer};

    #[test]
    fn test_default_is_valid_24_tiles() {
        let config = GameConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.tile_count(), 24);
    }

    #[test]
    fn test_baseline_interval_is_clamped() {
        let config = GameConfig::default();
        assert_eq!(config.baseline_interval(1), 150);
        assert_eq!(config.baseline_interval(3), 130);
        assert_eq!(config.baseline_interval(11), 50);
        assert_eq!(config.baseline_interval(500), MIN_TICK_INTERVAL_MS);
    }

    #[test]
    fn test_level_for_score() {
        let config = GameConfig::default();
        assert_eq!(config.level_for_score(0), 1);
        assert_eq!(config.level_for_score(99), 1);
        assert_eq!(config.level_for_score(100), 2);
        assert_eq!(config.level_for_score(250), 3);
    }

    #[test]
    fn test_rejects_partial_tiles() {
        let config = GameConfig {
            canvas_size: 490,
            ..GameConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_tiny_board() {
        let config = GameConfig {
            canvas_size: 200,
            ..GameConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_yaml_uses_camel_case_and_fills_defaults() {
        let serializer = YamlConfigSerializer::new();
        let config: GameConfig = serializer
            .deserialize("gridSize: 10\ncanvasSize: 300\npointsPerFood: 5\n")
            .unwrap();
        assert_eq!(config.grid_size, 10);
        assert_eq!(config.tile_count(), 30);
        assert_eq!(config.points_per_food, 5);
        assert_eq!(config.initial_speed, 160);

        let text = serializer.serialize(&config).unwrap();
        assert!(text.contains("powerupSpawnFreq"));
    }
}
