use std::cmp::Ordering;

use super::entity::Snake;
use super::grid::Grid;
use super::types::{DeathReason, Winner};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Collision {
    pub winner: Option<Winner>,
    pub reason: DeathReason,
}

/// Wall or self hit for a single snake, using its post-move head.
pub fn check_wall_or_self(snake: &Snake, grid: &Grid) -> Option<DeathReason> {
    let head = snake.head();
    if !grid.in_bounds(head) {
        return Some(DeathReason::WallCollision);
    }
    if snake.tail_segments().any(|segment| *segment == head) {
        return Some(DeathReason::SelfCollision);
    }
    None
}

fn head_on_body(attacker: &Snake, target: &Snake) -> bool {
    let head = attacker.head();
    target.tail_segments().any(|segment| *segment == head)
}

/// Resolves every fatal outcome of one tick, in a fixed order.
///
/// Own wall/self hits come first (player, then opponent), then a head landing on
/// the other body, then a head-to-head meeting decided by length.
pub fn resolve(player: &Snake, opponent: Option<&Snake>, grid: &Grid) -> Option<Collision> {
    let Some(opponent) = opponent else {
        return check_wall_or_self(player, grid).map(|reason| Collision {
            winner: None,
            reason,
        });
    };

    if let Some(reason) = check_wall_or_self(player, grid) {
        return Some(Collision {
            winner: Some(Winner::Ai),
            reason,
        });
    }
    if let Some(reason) = check_wall_or_self(opponent, grid) {
        return Some(Collision {
            winner: Some(Winner::Player),
            reason,
        });
    }

    if head_on_body(player, opponent) {
        return Some(Collision {
            winner: Some(Winner::Ai),
            reason: DeathReason::OtherSnakeCollision,
        });
    }
    if head_on_body(opponent, player) {
        return Some(Collision {
            winner: Some(Winner::Player),
            reason: DeathReason::OtherSnakeCollision,
        });
    }

    if player.head() == opponent.head() {
        let winner = match player.len().cmp(&opponent.len()) {
            Ordering::Greater => Winner::Player,
            Ordering::Less => Winner::Ai,
            Ordering::Equal => Winner::Tie,
        };
        return Some(Collision {
            winner: Some(winner),
            reason: DeathReason::HeadToHead,
        });
    }

    None
}
