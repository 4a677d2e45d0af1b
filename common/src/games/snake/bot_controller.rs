use std::collections::{HashMap, HashSet, VecDeque};

use super::entity::Snake;
use super::grid::Grid;
use super::types::{Direction, Point};

const CENTER_WEIGHT: f64 = 0.1;

pub struct BotController;

impl BotController {
    /// Next move for `agent` towards `food`. `board` lists every snake on the
    /// field, the agent included. `None` means no safe move exists.
    pub fn calculate_move(
        agent: &Snake,
        board: &[&Snake],
        food: Point,
        grid: &Grid,
    ) -> Option<Direction> {
        Self::shortest_path_step(agent, board, food, grid)
            .or_else(|| Self::greedy_move(agent, board, food, grid))
    }

    /// First step of a breadth-first shortest path from the head to the food.
    pub fn shortest_path_step(
        agent: &Snake,
        board: &[&Snake],
        food: Point,
        grid: &Grid,
    ) -> Option<Direction> {
        let blocked = Self::blocked_cells(agent, board);
        let start = agent.head();

        let mut parent: HashMap<Point, Point> = HashMap::new();
        let mut visited: HashSet<Point> = HashSet::from([start]);
        let mut queue = VecDeque::from([start]);

        let mut goal_found = false;
        'search: while let Some(current) = queue.pop_front() {
            for direction in Direction::ALL {
                let next = current.step(direction);
                if !grid.in_bounds(next) || visited.contains(&next) {
                    continue;
                }
                // The food cell is always enterable, even when it sits under a body.
                if next == food {
                    parent.insert(next, current);
                    goal_found = true;
                    break 'search;
                }
                if blocked.contains(&next) {
                    continue;
                }
                visited.insert(next);
                parent.insert(next, current);
                queue.push_back(next);
            }
        }

        if !goal_found {
            return None;
        }

        let mut step = food;
        while let Some(&previous) = parent.get(&step) {
            if previous == start {
                let (dx, dy) = (step.x - start.x, step.y - start.y);
                return Direction::from_delta(dx, dy);
            }
            step = previous;
        }
        None
    }

    /// One-step fallback: the safe neighbour closest to the food, nudged towards the centre.
    pub fn greedy_move(
        agent: &Snake,
        board: &[&Snake],
        food: Point,
        grid: &Grid,
    ) -> Option<Direction> {
        let head = agent.head();
        let center = grid.center();

        let mut best: Option<(Direction, f64)> = None;
        for direction in Direction::ALL {
            let next = head.step(direction);
            if !Self::is_safe_position(next, board, grid) {
                continue;
            }

            let distance = f64::from(next.manhattan(food));
            let center_distance =
                (f64::from(next.x) - center).abs() + (f64::from(next.y) - center).abs();
            let score = -distance - center_distance * CENTER_WEIGHT;

            if best.is_none_or(|(_, best_score)| score > best_score) {
                best = Some((direction, score));
            }
        }

        best.map(|(direction, _)| direction)
    }

    fn is_safe_position(pos: Point, board: &[&Snake], grid: &Grid) -> bool {
        grid.in_bounds(pos) && !board.iter().any(|snake| snake.occupies(pos))
    }

    fn blocked_cells(agent: &Snake, board: &[&Snake]) -> HashSet<Point> {
        board
            .iter()
            .flat_map(|snake| snake.segments())
            .chain(agent.tail_segments())
            .copied()
            .collect()
    }
}
