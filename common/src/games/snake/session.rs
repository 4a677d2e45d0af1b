use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{Instant, Interval, MissedTickBehavior, interval, interval_at};

use crate::games::GameBroadcaster;
use crate::high_score::HighScoreStore;
use crate::{log, log_warn};
use super::game_state::GameSession;
use super::settings::{POWER_EXPIRY_POLL_INTERVAL_MS, POWERUP_SWEEP_INTERVAL_MS};
use super::types::{GameMode, Millis};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionCommand {
    Start,
    /// Starts an idle session, otherwise toggles pause.
    StartOrPause,
    SetDirection { x: i32, y: i32 },
    TogglePause,
    Reset,
    SetMode(GameMode),
    Shutdown,
}

/// Millisecond timeline of one session, starting at zero.
struct SessionClock {
    origin: Instant,
}

impl SessionClock {
    fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }

    fn now(&self) -> Millis {
        self.origin.elapsed().as_millis() as Millis
    }
}

/// First tick fires one full period from now, like a freshly armed timer.
fn tick_timer(period_ms: Millis) -> Interval {
    let period = Duration::from_millis(period_ms.max(1));
    let mut timer = interval_at(Instant::now() + period, period);
    timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
    timer
}

pub struct SnakeSession;

impl SnakeSession {
    /// Owns `game` until a `Shutdown` command arrives or every sender is dropped.
    ///
    /// Ticks, the power-up sweep, the expiry poll and commands are all arms of one
    /// select loop, so the session is never mutated concurrently.
    pub async fn run<B, S>(
        mut game: GameSession,
        mut commands: mpsc::UnboundedReceiver<SessionCommand>,
        broadcaster: B,
        high_score_store: S,
    ) -> GameSession
    where
        B: GameBroadcaster,
        S: HighScoreStore,
    {
        let clock = SessionClock::new();
        let mut tick_interval = tick_timer(game.tick_interval());
        let mut sweep_interval = interval(Duration::from_millis(POWERUP_SWEEP_INTERVAL_MS));
        let mut expiry_interval = interval(Duration::from_millis(POWER_EXPIRY_POLL_INTERVAL_MS));

        broadcaster.broadcast_state(game.snapshot(clock.now())).await;

        loop {
            tokio::select! {
                _ = tick_interval.tick(), if game.is_ticking() => {
                    let result = game.tick(clock.now());

                    if result.high_score_beaten {
                        Self::persist_high_score(&high_score_store, game.high_score());
                    }

                    match result.game_over {
                        Some(game_over) => {
                            broadcaster.broadcast_game_over(game_over, result.snapshot).await;
                        }
                        None => {
                            if result.interval_changed {
                                tick_interval = tick_timer(game.tick_interval());
                            }
                            broadcaster.broadcast_state(result.snapshot).await;
                        }
                    }
                }
                _ = sweep_interval.tick() => {
                    if game.sweep_powerups(clock.now()) > 0 {
                        broadcaster.broadcast_state(game.snapshot(clock.now())).await;
                    }
                }
                _ = expiry_interval.tick() => {
                    if game.expire_power(clock.now()) {
                        tick_interval = tick_timer(game.tick_interval());
                        broadcaster.broadcast_state(game.snapshot(clock.now())).await;
                    }
                }
                command = commands.recv() => {
                    let Some(command) = command else {
                        log!("Command channel closed, stopping session");
                        break;
                    };
                    if command == SessionCommand::Shutdown {
                        log!("Session shutdown requested");
                        break;
                    }

                    let now = clock.now();
                    let changed = match command {
                        SessionCommand::Start => game.start(now),
                        SessionCommand::StartOrPause if game.is_running() => {
                            game.toggle_pause().is_some()
                        }
                        SessionCommand::StartOrPause => game.start(now),
                        SessionCommand::SetDirection { x, y } => game.set_direction(x, y),
                        SessionCommand::TogglePause => game.toggle_pause().is_some(),
                        SessionCommand::Reset => {
                            game.reset();
                            true
                        }
                        SessionCommand::SetMode(mode) => game.set_mode(mode),
                        SessionCommand::Shutdown => false,
                    };

                    // Start, resume and reset all need a freshly armed cadence.
                    if changed && !matches!(command, SessionCommand::SetDirection { .. }) {
                        tick_interval = tick_timer(game.tick_interval());
                        broadcaster.broadcast_state(game.snapshot(now)).await;
                    }
                }
            }
        }

        game
    }

    fn persist_high_score<S: HighScoreStore>(store: &S, value: u32) {
        if let Err(e) = store.save(value) {
            log_warn!("Failed to persist high score {}: {}", value, e);
        }
    }
}
