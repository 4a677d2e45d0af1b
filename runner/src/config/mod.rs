mod config;
mod display_config;

pub use config::{get_config_manager, Config};
pub use display_config::DisplayConfig;
