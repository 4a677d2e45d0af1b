use std::fmt::Write as _;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use common::games::GameBroadcaster;
use common::games::snake::{Point, PowerupKind};
use common::{GameOver, Snapshot, Winner};

use crate::config::DisplayConfig;

const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

const EMPTY: char = '.';
const FOOD: char = '*';
const PLAYER_HEAD: char = '@';
const PLAYER_BODY: char = 'o';
const OPPONENT_HEAD: char = 'X';
const OPPONENT_BODY: char = 'x';

fn powerup_glyph(kind: PowerupKind) -> char {
    match kind {
        PowerupKind::Speed => '>',
        PowerupKind::Slow => '<',
        PowerupKind::Bonus => '$',
    }
}

fn status_line(snapshot: &Snapshot) -> &'static str {
    if !snapshot.running {
        "PRESS <ENTER> TO START"
    } else if snapshot.paused {
        "GAME PAUSED"
    } else {
        ""
    }
}

pub fn game_over_message(game_over: &GameOver) -> &'static str {
    if game_over.new_high_score {
        return "NEW HIGH SCORE!";
    }
    match game_over.winner {
        Some(Winner::Player) => "YOU WIN! GREAT JOB!",
        Some(Winner::Ai) => "AI WINS, TRY AGAIN!",
        Some(Winner::Tie) => "IT'S A TIE!",
        None => "TRY AGAIN TO BEAT YOUR HIGH SCORE!",
    }
}

/// Draws a snapshot as plain text, one character per cell.
pub fn render_frame(snapshot: &Snapshot) -> String {
    let size = snapshot.tile_count.max(0) as usize;
    let mut cells = vec![vec![EMPTY; size]; size];
    let mut put = |pos: Point, glyph: char| {
        if pos.x >= 0 && pos.y >= 0 && (pos.x as usize) < size && (pos.y as usize) < size {
            cells[pos.y as usize][pos.x as usize] = glyph;
        }
    };

    put(snapshot.food, FOOD);
    for powerup in &snapshot.powerups {
        put(powerup.position, powerup_glyph(powerup.kind));
    }
    for (i, segment) in snapshot.opponent.iter().enumerate() {
        put(*segment, if i == 0 { OPPONENT_HEAD } else { OPPONENT_BODY });
    }
    for (i, segment) in snapshot.player.iter().enumerate() {
        put(*segment, if i == 0 { PLAYER_HEAD } else { PLAYER_BODY });
    }

    let mut frame = String::new();
    let _ = writeln!(
        frame,
        "SCORE {:06}  LEVEL {} ({}/{})  HIGH {:06}  SPEED {}ms  MODE {}",
        snapshot.score,
        snapshot.level,
        snapshot.level_progress,
        snapshot.points_per_level,
        snapshot.high_score,
        snapshot.tick_interval,
        snapshot.mode
    );
    match snapshot.active_power {
        Some(power) => {
            let _ = writeln!(frame, "POWER {} {:.1}s", power.kind, power.remaining as f64 / 1000.0);
        }
        None => frame.push('\n'),
    }

    let border = format!("+{}+", "-".repeat(size));
    frame.push_str(&border);
    frame.push('\n');
    for row in cells {
        frame.push('|');
        frame.extend(row);
        frame.push_str("|\n");
    }
    frame.push_str(&border);
    frame.push('\n');
    frame.push_str(status_line(snapshot));
    frame.push('\n');
    frame
}

#[derive(Clone)]
pub struct TerminalBroadcaster {
    display: DisplayConfig,
    last_frame: Arc<Mutex<Option<Instant>>>,
}

impl TerminalBroadcaster {
    pub fn new(display: DisplayConfig) -> Self {
        Self {
            display,
            last_frame: Arc::new(Mutex::new(None)),
        }
    }

    fn should_draw(&self) -> bool {
        if !self.display.render {
            return false;
        }
        if self.display.min_frame_interval_ms == 0 {
            return true;
        }
        let Ok(mut last_frame) = self.last_frame.lock() else {
            return true;
        };
        let min_interval = Duration::from_millis(self.display.min_frame_interval_ms);
        let now = Instant::now();
        if let Some(last) = *last_frame
            && now.duration_since(last) < min_interval
        {
            return false;
        }
        *last_frame = Some(now);
        true
    }

    fn draw(&self, text: &str) {
        if self.display.clear_screen {
            print!("{}{}", CLEAR_SCREEN, text);
        } else {
            print!("{}", text);
        }
    }
}

impl GameBroadcaster for TerminalBroadcaster {
    async fn broadcast_state(&self, snapshot: Snapshot) {
        if self.should_draw() {
            self.draw(&render_frame(&snapshot));
        }
    }

    async fn broadcast_game_over(&self, game_over: GameOver, snapshot: Snapshot) {
        common::log!(
            "Round finished: winner={:?}, reason={:?}, score={}",
            game_over.winner,
            game_over.reason,
            snapshot.score
        );
        if !self.display.render {
            println!("GAME OVER: {} SCORE {:06}", game_over_message(&game_over), snapshot.score);
            return;
        }
        let mut text = render_frame(&snapshot);
        let _ = writeln!(
            text,
            "GAME OVER: {}  FINAL SCORE {:06}",
            game_over_message(&game_over),
            snapshot.score
        );
        self.draw(&text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::GameMode;
    use common::games::snake::{ActivePowerView, DeathReason, Powerup};

    fn snapshot() -> Snapshot {
        Snapshot {
            tick: 3,
            tile_count: 4,
            mode: GameMode::Versus,
            player: vec![Point::new(1, 1), Point::new(0, 1)],
            opponent: vec![Point::new(3, 3), Point::new(3, 2)],
            food: Point::new(2, 0),
            powerups: vec![Powerup {
                position: Point::new(0, 3),
                kind: PowerupKind::Slow,
                created_at: 0,
            }],
            score: 120,
            level: 2,
            level_progress: 20,
            points_per_level: 100,
            high_score: 340,
            tick_interval: 140,
            running: true,
            paused: false,
            active_power: None,
        }
    }

    #[test]
    fn test_render_places_every_entity() {
        let frame = render_frame(&snapshot());
        let lines: Vec<&str> = frame.lines().collect();
        assert_eq!(lines[2], "+----+");
        assert_eq!(lines[3], "|..*.|");
        assert_eq!(lines[4], "|o@..|");
        assert_eq!(lines[5], "|...x|");
        assert_eq!(lines[6], "|<..X|");
        assert_eq!(lines[7], "+----+");
    }

    #[test]
    fn test_header_shows_score_and_mode() {
        let frame = render_frame(&snapshot());
        let header = frame.lines().next().unwrap();
        assert!(header.starts_with("SCORE 000120"));
        assert!(header.contains("LEVEL 2 (20/100)"));
        assert!(header.contains("HIGH 000340"));
        assert!(header.contains("MODE VS AI"));
    }

    #[test]
    fn test_active_power_and_pause_lines() {
        let mut s = snapshot();
        s.paused = true;
        s.active_power = Some(ActivePowerView {
            kind: PowerupKind::Speed,
            remaining: 2_500,
        });
        let frame = render_frame(&s);
        assert!(frame.contains("POWER SPEED BOOST 2.5s"));
        assert!(frame.trim_end().ends_with("GAME PAUSED"));
    }

    #[test]
    fn test_game_over_messages() {
        let mut game_over = GameOver {
            winner: Some(Winner::Tie),
            reason: DeathReason::HeadToHead,
            new_high_score: false,
        };
        assert_eq!(game_over_message(&game_over), "IT'S A TIE!");
        game_over.new_high_score = true;
        assert_eq!(game_over_message(&game_over), "NEW HIGH SCORE!");
    }
}
