use std::collections::HashSet;

use crate::games::SessionRng;
use crate::{log, log_debug, log_warn};
use super::grid::Grid;
use super::powerup::{Powerup, PowerupKind};
use super::settings::{
    FOOD_PLACEMENT_ATTEMPTS, POWERUP_LIFETIME_MS, POWERUP_PLACEMENT_ATTEMPTS,
    POWERUP_SPAWN_JITTER_MS,
};
use super::types::{Millis, Point};

fn random_cell(grid: &Grid, rng: &mut SessionRng) -> Point {
    let n = grid.tile_count();
    Point::new(rng.random_range(0..n), rng.random_range(0..n))
}

/// Rejection-samples a free cell for the food.
///
/// After `FOOD_PLACEMENT_ATTEMPTS` misses the first free cell in row-major order is
/// used; a completely full board falls back to the origin.
pub fn place_food(grid: &Grid, occupied: &HashSet<Point>, rng: &mut SessionRng) -> Point {
    for _ in 0..FOOD_PLACEMENT_ATTEMPTS {
        let pos = random_cell(grid, rng);
        if !occupied.contains(&pos) {
            return pos;
        }
    }

    log_warn!(
        "Food placement gave up after {} attempts ({} of {} cells occupied)",
        FOOD_PLACEMENT_ATTEMPTS,
        occupied.len(),
        grid.cell_count()
    );

    grid.cells()
        .find(|pos| !occupied.contains(pos))
        .unwrap_or_default()
}

/// Decides when the next power-up appears and where.
#[derive(Clone, Debug)]
pub struct PowerupSpawner {
    last_spawn: Millis,
    spawn_interval: Millis,
}

impl PowerupSpawner {
    pub fn new(now: Millis, spawn_interval: Millis) -> Self {
        Self {
            last_spawn: now,
            spawn_interval,
        }
    }

    pub fn restart(&mut self, now: Millis) {
        self.last_spawn = now;
    }

    pub fn next_eligible_at(&self) -> Millis {
        self.last_spawn + self.spawn_interval
    }

    /// `occupied` must already include snakes and existing power-ups.
    pub fn maybe_spawn(
        &mut self,
        now: Millis,
        grid: &Grid,
        occupied: &HashSet<Point>,
        food: Point,
        rng: &mut SessionRng,
    ) -> Option<Powerup> {
        if now < self.next_eligible_at() {
            return None;
        }

        self.last_spawn = now + rng.random_range(0..POWERUP_SPAWN_JITTER_MS);

        let mut position = None;
        for _ in 0..POWERUP_PLACEMENT_ATTEMPTS {
            let candidate = random_cell(grid, rng);
            if candidate != food && !occupied.contains(&candidate) {
                position = Some(candidate);
                break;
            }
        }

        let Some(position) = position else {
            log_debug!("Skipping power-up spawn, no free cell found");
            return None;
        };

        let kind = PowerupKind::from_roll(rng.unit());
        log!("Power-up {:?} spawned at {}", kind, position);
        Some(Powerup {
            position,
            kind,
            created_at: now,
        })
    }
}

/// Drops power-ups older than the lifetime. Returns how many were removed.
pub fn sweep_expired(powerups: &mut Vec<Powerup>, now: Millis) -> usize {
    let before = powerups.len();
    powerups.retain(|p| !p.is_expired(now, POWERUP_LIFETIME_MS));
    before - powerups.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_place_food_avoids_occupied() {
        let grid = Grid::new(16);
        let mut rng = SessionRng::new(42);
        let occupied: HashSet<Point> = grid.cells().filter(|p| p.y < 15).collect();
        for _ in 0..20 {
            let food = place_food(&grid, &occupied, &mut rng);
            assert!(grid.in_bounds(food));
            assert!(!occupied.contains(&food));
        }
    }

    #[test]
    fn test_place_food_falls_back_to_last_free_cell() {
        let grid = Grid::new(16);
        let mut rng = SessionRng::new(1);
        let free = Point::new(15, 15);
        let occupied: HashSet<Point> = grid.cells().filter(|p| *p != free).collect();
        assert_eq!(place_food(&grid, &occupied, &mut rng), free);
    }

    #[test]
    fn test_place_food_on_full_board_does_not_hang() {
        let grid = Grid::new(16);
        let mut rng = SessionRng::new(1);
        let occupied: HashSet<Point> = grid.cells().collect();
        assert_eq!(place_food(&grid, &occupied, &mut rng), Point::new(0, 0));
    }

    #[test]
    fn test_spawner_waits_for_interval() {
        let grid = Grid::new(24);
        let mut rng = SessionRng::new(42);
        let mut spawner = PowerupSpawner::new(0, 12_000);
        let occupied = HashSet::new();
        let early = spawner.maybe_spawn(11_999, &grid, &occupied, Point::new(0, 0), &mut rng);
        assert!(early.is_none());
        let spawned = spawner.maybe_spawn(12_000, &grid, &occupied, Point::new(0, 0), &mut rng);
        assert!(spawned.is_some());
        assert_eq!(spawned.unwrap().created_at, 12_000);
    }

    #[test]
    fn test_spawner_jitters_next_eligible_time() {
        let grid = Grid::new(24);
        let mut rng = SessionRng::new(42);
        let mut spawner = PowerupSpawner::new(0, 12_000);
        spawner.maybe_spawn(12_000, &grid, &HashSet::new(), Point::new(0, 0), &mut rng);
        let next = spawner.next_eligible_at();
        assert!((24_000..28_000).contains(&next));
    }

    #[test]
    fn test_spawner_avoids_food_and_occupied() {
        let grid = Grid::new(16);
        let food = Point::new(0, 0);
        let free = Point::new(1, 0);
        let occupied: HashSet<Point> = grid
            .cells()
            .filter(|p| *p != food && *p != free)
            .collect();
        let mut rng = SessionRng::new(3);
        let mut now = 0;
        let mut spawner = PowerupSpawner::new(0, 1_000);
        for _ in 0..50 {
            now += 10_000;
            if let Some(p) = spawner.maybe_spawn(now, &grid, &occupied, food, &mut rng) {
                assert_eq!(p.position, free);
            }
        }
    }

    #[test]
    fn test_spawner_skips_when_board_full() {
        let grid = Grid::new(16);
        let occupied: HashSet<Point> = grid.cells().collect();
        let mut rng = SessionRng::new(42);
        let mut spawner = PowerupSpawner::new(0, 1_000);
        assert!(spawner.maybe_spawn(5_000, &grid, &occupied, Point::new(0, 0), &mut rng).is_none());
        assert!(spawner.next_eligible_at() > 5_000);
    }

    #[test]
    fn test_sweep_expired() {
        let mut powerups = vec![
            Powerup { position: Point::new(1, 1), kind: PowerupKind::Speed, created_at: 0 },
            Powerup { position: Point::new(2, 2), kind: PowerupKind::Slow, created_at: 10_000 },
        ];
        assert_eq!(sweep_expired(&mut powerups, 34_999), 0);
        assert_eq!(sweep_expired(&mut powerups, 35_000), 1);
        assert_eq!(powerups.len(), 1);
        assert_eq!(powerups[0].kind, PowerupKind::Slow);
    }
}
