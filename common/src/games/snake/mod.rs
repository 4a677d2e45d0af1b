mod bot_controller;
mod collision;
mod entity;
mod game_state;
mod grid;
mod powerup;
mod session;
mod settings;
mod snapshot;
mod spawner;
mod types;

pub use bot_controller::BotController;
pub use collision::{Collision, check_wall_or_self, resolve as resolve_collisions};
pub use entity::Snake;
pub use game_state::{GameSession, OPPONENT_START, PLAYER_START};
pub use grid::Grid;
pub use powerup::{ActivePower, PowerEffects, Powerup, PowerupKind};
pub use session::{SessionCommand, SnakeSession};
pub use settings::*;
pub use snapshot::{ActivePowerView, Snapshot, TickResult};
pub use spawner::{PowerupSpawner, place_food, sweep_expired};
pub use types::{DeathReason, Direction, GameMode, GameOver, Millis, Point, Winner};
