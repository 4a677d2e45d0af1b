use super::powerup::{Powerup, PowerupKind};
use super::types::{GameMode, GameOver, Millis, Point};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ActivePowerView {
    pub kind: PowerupKind,
    pub remaining: Millis,
}

/// Read-only picture of a session handed to renderers.
#[derive(Clone, Debug, PartialEq)]
pub struct Snapshot {
    pub tick: u64,
    pub tile_count: i32,
    pub mode: GameMode,
    pub player: Vec<Point>,
    pub opponent: Vec<Point>,
    pub food: Point,
    pub powerups: Vec<Powerup>,
    pub score: u32,
    pub level: u32,
    pub level_progress: u32,
    pub points_per_level: u32,
    pub high_score: u32,
    pub tick_interval: Millis,
    pub running: bool,
    pub paused: bool,
    pub active_power: Option<ActivePowerView>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TickResult {
    pub snapshot: Snapshot,
    pub game_over: Option<GameOver>,
    /// The cadence must be rebuilt before the next tick.
    pub interval_changed: bool,
    pub high_score_beaten: bool,
}
