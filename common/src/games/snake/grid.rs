use super::types::Point;

/// The square playfield, `tile_count` cells per side.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Grid {
    tile_count: i32,
}

impl Grid {
    pub fn new(tile_count: i32) -> Self {
        Self { tile_count }
    }

    pub fn tile_count(&self) -> i32 {
        self.tile_count
    }

    pub fn in_bounds(&self, pos: Point) -> bool {
        pos.x >= 0 && pos.y >= 0 && pos.x < self.tile_count && pos.y < self.tile_count
    }

    /// Centre coordinate on both axes, fractional for odd sizes.
    pub fn center(&self) -> f64 {
        f64::from(self.tile_count) / 2.0
    }

    pub fn cell_count(&self) -> usize {
        (self.tile_count.max(0) as usize).pow(2)
    }

    /// Row-major walk over every cell.
    pub fn cells(&self) -> impl Iterator<Item = Point> + '_ {
        (0..self.tile_count).flat_map(move |y| (0..self.tile_count).map(move |x| Point::new(x, y)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_bounds_edges() {
        let grid = Grid::new(24);
        assert!(grid.in_bounds(Point::new(0, 0)));
        assert!(grid.in_bounds(Point::new(23, 23)));
        assert!(!grid.in_bounds(Point::new(-1, 0)));
        assert!(!grid.in_bounds(Point::new(0, 24)));
        assert!(!grid.in_bounds(Point::new(24, 5)));
    }

    #[test]
    fn test_cells_are_row_major_and_complete() {
        let grid = Grid::new(3);
        let cells: Vec<Point> = grid.cells().collect();
        assert_eq!(cells.len(), grid.cell_count());
        assert_eq!(cells[0], Point::new(0, 0));
        assert_eq!(cells[1], Point::new(1, 0));
        assert_eq!(cells[3], Point::new(0, 1));
    }

    #[test]
    fn test_center() {
        assert_eq!(Grid::new(24).center(), 12.0);
    }
}
