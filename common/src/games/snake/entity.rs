use std::collections::VecDeque;

use super::types::{Direction, Point};

/// Ordered body, head at the front. Never empty.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Snake {
    body: VecDeque<Point>,
    just_ate: bool,
}

impl Snake {
    pub fn new(start_pos: Point) -> Self {
        Self {
            body: VecDeque::from([start_pos]),
            just_ate: false,
        }
    }

    /// Builds a snake from explicit segments, head first. Empty input yields `None`.
    pub fn from_segments(segments: impl IntoIterator<Item = Point>) -> Option<Self> {
        let body: VecDeque<Point> = segments.into_iter().collect();
        if body.is_empty() {
            return None;
        }
        Some(Self {
            body,
            just_ate: false,
        })
    }

    pub fn head(&self) -> Point {
        self.body[0]
    }

    pub fn neck(&self) -> Option<Point> {
        self.body.get(1).copied()
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub fn just_ate(&self) -> bool {
        self.just_ate
    }

    pub fn segments(&self) -> impl Iterator<Item = &Point> {
        self.body.iter()
    }

    pub fn tail_segments(&self) -> impl Iterator<Item = &Point> {
        self.body.iter().skip(1)
    }

    pub fn occupies(&self, pos: Point) -> bool {
        self.body.contains(&pos)
    }

    pub fn to_vec(&self) -> Vec<Point> {
        self.body.iter().copied().collect()
    }

    /// Moves one cell. Returns `false` for a null heading or a step back onto the neck.
    pub fn advance(&mut self, direction: Option<Direction>) -> bool {
        let Some(direction) = direction else {
            return false;
        };

        let next_head = self.head().step(direction);
        if self.neck() == Some(next_head) {
            return false;
        }

        self.body.push_front(next_head);
        if self.just_ate {
            self.just_ate = false;
        } else {
            self.body.pop_back();
        }
        true
    }

    pub fn mark_ate(&mut self) {
        self.just_ate = true;
    }
}
