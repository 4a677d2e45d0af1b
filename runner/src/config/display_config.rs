use common::config::Validate;
use serde::{Deserialize, Serialize};

const MIN_FRAME_INTERVAL_MS: u64 = 10;

#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
pub struct DisplayConfig {
    pub render: bool,
    pub clear_screen: bool,
    /// Frames closer together than this are dropped. Zero renders every frame.
    #[serde(default)]
    pub min_frame_interval_ms: u64,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            render: true,
            clear_screen: true,
            min_frame_interval_ms: 0,
        }
    }
}

impl Validate for DisplayConfig {
    fn validate(&self) -> Result<(), String> {
        if self.min_frame_interval_ms != 0 && self.min_frame_interval_ms < MIN_FRAME_INTERVAL_MS {
            return Err(format!(
                "min_frame_interval_ms must be 0 or at least {}, got {}",
                MIN_FRAME_INTERVAL_MS, self.min_frame_interval_ms
            ));
        }
        Ok(())
    }
}
