use std::collections::HashSet;

use crate::config::Validate;
use crate::games::SessionRng;
use crate::{log, log_debug};
use super::bot_controller::BotController;
use super::collision::{self, Collision};
use super::entity::Snake;
use super::grid::Grid;
use super::powerup::{PowerEffects, Powerup, PowerupKind};
use super::settings::{BONUS_POINTS, GameConfig};
use super::snapshot::{ActivePowerView, Snapshot, TickResult};
use super::spawner::{self, PowerupSpawner};
use super::types::{Direction, GameMode, GameOver, Millis, Point};

pub const PLAYER_START: Point = Point::new(10, 10);
pub const OPPONENT_START: Point = Point::new(15, 15);

/// The whole state of one round, owned by a single task.
pub struct GameSession {
    config: GameConfig,
    grid: Grid,
    mode: GameMode,
    player: Snake,
    player_heading: Option<Direction>,
    opponent: Option<Snake>,
    opponent_heading: Direction,
    food: Point,
    powerups: Vec<Powerup>,
    effects: PowerEffects,
    score: u32,
    level: u32,
    tick_interval: Millis,
    running: bool,
    paused: bool,
    spawner: PowerupSpawner,
    high_score: u32,
    high_score_at_start: u32,
    tick: u64,
    rng: SessionRng,
}

impl GameSession {
    /// Idle session in its canonical reset state. Call `start` to begin a round.
    pub fn new(
        config: GameConfig,
        mode: GameMode,
        rng: SessionRng,
        high_score: u32,
    ) -> Result<Self, String> {
        config.validate()?;
        let grid = config.grid();
        let mut session = Self {
            config,
            grid,
            mode,
            player: Snake::new(PLAYER_START),
            player_heading: None,
            opponent: None,
            opponent_heading: Direction::Right,
            food: Point::default(),
            powerups: Vec::new(),
            effects: PowerEffects::default(),
            score: 0,
            level: 1,
            tick_interval: config.initial_speed,
            running: false,
            paused: false,
            spawner: PowerupSpawner::new(0, config.powerup_spawn_freq),
            high_score,
            high_score_at_start: high_score,
            tick: 0,
            rng,
        };
        session.respawn_food();
        Ok(session)
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn player(&self) -> &Snake {
        &self.player
    }

    pub fn opponent(&self) -> Option<&Snake> {
        self.opponent.as_ref()
    }

    pub fn food(&self) -> Point {
        self.food
    }

    pub fn powerups(&self) -> &[Powerup] {
        &self.powerups
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    pub fn tick_interval(&self) -> Millis {
        self.tick_interval
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// True when ticks should be scheduled.
    pub fn is_ticking(&self) -> bool {
        self.running && !self.paused
    }

    pub fn seed(&self) -> u64 {
        self.rng.seed()
    }

    /// Begins a fresh round. Ignored while a round is already running.
    pub fn start(&mut self, now: Millis) -> bool {
        if self.running {
            return false;
        }

        self.reset_round();
        if self.mode.has_opponent() {
            self.opponent = Some(Snake::new(OPPONENT_START));
        }
        self.opponent_heading = Direction::Right;
        if self.mode.primary_is_bot() {
            self.player_heading = Some(Direction::Right);
        }
        self.running = true;
        self.spawner.restart(now);
        self.respawn_food();

        log!(
            "Game started: mode={}, interval={}ms, seed={}",
            self.mode,
            self.tick_interval,
            self.rng.seed()
        );
        true
    }

    /// Flips pause while running. Returns the new paused state, or `None` when idle.
    pub fn toggle_pause(&mut self) -> Option<bool> {
        if !self.running {
            return None;
        }
        self.paused = !self.paused;
        log!("Game {}", if self.paused { "paused" } else { "resumed" });
        Some(self.paused)
    }

    /// Stops the round and returns to the idle canonical state.
    pub fn reset(&mut self) {
        self.reset_round();
        self.respawn_food();
        log!("Game reset");
    }

    /// Switches mode. Only allowed while no round is running; resets the session.
    pub fn set_mode(&mut self, mode: GameMode) -> bool {
        if self.running {
            return false;
        }
        self.mode = mode;
        self.reset();
        log!("Mode set to {}", mode);
        true
    }

    /// Player input as a direction vector. Returns whether the heading changed.
    ///
    /// Ignored while idle, paused, or when the primary snake is bot driven.
    /// Non-unit vectors and a reversal of a multi-segment snake are rejected.
    pub fn set_direction(&mut self, x: i32, y: i32) -> bool {
        if !self.is_ticking() || self.mode.primary_is_bot() {
            return false;
        }
        let Some(direction) = Direction::from_delta(x, y) else {
            return false;
        };
        if self.player.len() > 1
            && let Some(current) = self.player_heading
            && direction.is_opposite(&current)
        {
            return false;
        }
        self.player_heading = Some(direction);
        true
    }

    /// Reverts an expired timed power to the level baseline.
    /// Returns true when the tick interval changed.
    pub fn expire_power(&mut self, now: Millis) -> bool {
        let Some(baseline) = self.effects.expire(now, self.level, &self.config) else {
            return false;
        };
        log!("Power expired, interval back to {}ms", baseline);
        let changed = baseline != self.tick_interval;
        self.tick_interval = baseline;
        changed
    }

    /// Drops uncollected power-ups past their lifetime.
    pub fn sweep_powerups(&mut self, now: Millis) -> usize {
        let removed = spawner::sweep_expired(&mut self.powerups, now);
        if removed > 0 {
            log_debug!("Swept {} expired power-ups", removed);
        }
        removed
    }

    /// Advances the simulation by one step.
    pub fn tick(&mut self, now: Millis) -> TickResult {
        if !self.is_ticking() {
            return TickResult {
                snapshot: self.snapshot(now),
                game_over: None,
                interval_changed: false,
                high_score_beaten: false,
            };
        }

        let interval_before = self.tick_interval;
        self.expire_power(now);
        self.try_spawn_powerup(now);

        self.move_player();
        self.move_opponent();

        if let Some(collision) =
            collision::resolve(&self.player, self.opponent.as_ref(), &self.grid)
        {
            let game_over = self.finish(collision);
            return TickResult {
                snapshot: self.snapshot(now),
                game_over: Some(game_over),
                interval_changed: false,
                high_score_beaten: false,
            };
        }

        self.resolve_food();
        self.resolve_powerups(now);

        let high_score_beaten = self.score > self.high_score;
        if high_score_beaten {
            self.high_score = self.score;
        }

        self.tick += 1;
        TickResult {
            snapshot: self.snapshot(now),
            game_over: None,
            interval_changed: self.tick_interval != interval_before,
            high_score_beaten,
        }
    }

    pub fn snapshot(&self, now: Millis) -> Snapshot {
        Snapshot {
            tick: self.tick,
            tile_count: self.grid.tile_count(),
            mode: self.mode,
            player: self.player.to_vec(),
            opponent: self.opponent.as_ref().map(Snake::to_vec).unwrap_or_default(),
            food: self.food,
            powerups: self.powerups.clone(),
            score: self.score,
            level: self.level,
            level_progress: self.score % self.config.points_per_level,
            points_per_level: self.config.points_per_level,
            high_score: self.high_score,
            tick_interval: self.tick_interval,
            running: self.running,
            paused: self.paused,
            active_power: self.effects.active().map(|active| ActivePowerView {
                kind: active.kind,
                remaining: active.remaining(now),
            }),
        }
    }

    fn reset_round(&mut self) {
        self.running = false;
        self.paused = false;
        self.player = Snake::new(PLAYER_START);
        self.player_heading = None;
        self.opponent = None;
        self.opponent_heading = Direction::Right;
        self.score = 0;
        self.level = 1;
        self.tick_interval = self.config.initial_speed;
        self.powerups.clear();
        self.effects.cancel();
        self.high_score_at_start = self.high_score;
        self.tick = 0;
    }

    fn occupied_cells(&self) -> HashSet<Point> {
        self.player
            .segments()
            .chain(self.opponent.iter().flat_map(|snake| snake.segments()))
            .copied()
            .chain(self.powerups.iter().map(|p| p.position))
            .collect()
    }

    fn respawn_food(&mut self) {
        let occupied = self.occupied_cells();
        self.food = spawner::place_food(&self.grid, &occupied, &mut self.rng);
    }

    fn try_spawn_powerup(&mut self, now: Millis) {
        let occupied = self.occupied_cells();
        if let Some(powerup) =
            self.spawner.maybe_spawn(now, &self.grid, &occupied, self.food, &mut self.rng)
        {
            self.powerups.push(powerup);
        }
    }

    fn move_player(&mut self) {
        if self.mode.primary_is_bot()
            && let Some(direction) =
                BotController::calculate_move(&self.player, &[&self.player], self.food, &self.grid)
        {
            self.player_heading = Some(direction);
        }
        self.player.advance(self.player_heading);
    }

    /// Runs after the player has moved, so the bot plans against the new board.
    fn move_opponent(&mut self) {
        let Some(opponent) = self.opponent.as_ref() else {
            return;
        };
        let board = [&self.player, opponent];
        if let Some(direction) =
            BotController::calculate_move(opponent, &board, self.food, &self.grid)
        {
            self.opponent_heading = direction;
        }
        let heading = self.opponent_heading;
        if let Some(opponent) = self.opponent.as_mut() {
            opponent.advance(Some(heading));
        }
    }

    fn finish(&mut self, collision: Collision) -> GameOver {
        self.running = false;
        self.paused = false;
        self.effects.cancel();

        let game_over = GameOver {
            winner: collision.winner,
            reason: collision.reason,
            new_high_score: self.score > self.high_score_at_start,
        };
        log!(
            "Game over: winner={:?}, reason={:?}, score={}, level={}",
            game_over.winner,
            game_over.reason,
            self.score,
            self.level
        );
        game_over
    }

    fn resolve_food(&mut self) {
        if self.player.head() == self.food {
            self.player.mark_ate();
            self.score += self.config.points_per_food;
            log_debug!("Player ate food at {}, score {}", self.food, self.score);
            self.check_level_up();
            self.respawn_food();
        }

        if let Some(opponent) = self.opponent.as_mut()
            && opponent.head() == self.food
        {
            opponent.mark_ate();
            log_debug!("Opponent ate food at {}", self.food);
            self.respawn_food();
        }
    }

    fn check_level_up(&mut self) {
        let new_level = self.config.level_for_score(self.score);
        if new_level > self.level {
            self.level = new_level;
            self.tick_interval = self.config.baseline_interval(new_level);
            log!("Level up: level {}, interval {}ms", self.level, self.tick_interval);
        }
    }

    fn resolve_powerups(&mut self, now: Millis) {
        let head = self.player.head();
        if let Some(index) = self.powerups.iter().position(|p| p.position == head) {
            let powerup = self.powerups.remove(index);
            self.apply_powerup(powerup.kind, now);
        }

        if let Some(opponent) = self.opponent.as_ref() {
            let head = opponent.head();
            if let Some(index) = self.powerups.iter().position(|p| p.position == head) {
                let powerup = self.powerups.remove(index);
                log_debug!("Opponent took {} at {}", powerup.kind, powerup.position);
            }
        }
    }

    fn apply_powerup(&mut self, kind: PowerupKind, now: Millis) {
        match kind {
            PowerupKind::Bonus => {
                self.score += BONUS_POINTS;
            }
            PowerupKind::Speed | PowerupKind::Slow => {
                self.tick_interval =
                    self.effects.activate(kind, now, self.tick_interval, &self.config);
            }
        }
        log!("Picked up {}, score {}, interval {}ms", kind, self.score, self.tick_interval);
    }
}

#[cfg(test)]
impl GameSession {
    pub(crate) fn place_powerup(&mut self, position: Point, kind: PowerupKind, now: Millis) {
        self.powerups.push(Powerup {
            position,
            kind,
            created_at: now,
        });
    }
}
