pub mod config;
pub mod games;
pub mod high_score;
pub mod logger;

pub use games::snake::{
    GameConfig, GameMode, GameOver, GameSession, SessionCommand, SnakeSession, Snapshot,
    TickResult, Winner,
};
pub use high_score::{FileHighScoreStore, HighScoreError, HighScoreStore, MemoryHighScoreStore};
