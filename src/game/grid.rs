use super::{config::GameConfig, state::Position};

/// Static geometry of the square playing field.
///
/// Positions are expressed in pixel units: every cell origin is a multiple of
/// `cell_size`, and the field spans `0..size_pixels()` on both axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridModel {
    cells: i32,
    cell_size: i32,
}

impl GridModel {
    pub fn new(cells: i32, cell_size: i32) -> Self {
        Self {
            cells: cells.max(2),
            cell_size: cell_size.max(1),
        }
    }

    pub fn from_config(config: &GameConfig) -> Self {
        Self::new(config.grid_cells, config.cell_size)
    }

    /// Cells per side; rows and columns are equal
    pub fn cells(&self) -> i32 {
        self.cells
    }

    pub fn cell_size(&self) -> i32 {
        self.cell_size
    }

    pub fn size_pixels(&self) -> i32 {
        self.cells * self.cell_size
    }

    /// Largest valid cell origin on either axis
    pub fn max_coordinate(&self) -> i32 {
        self.size_pixels() - self.cell_size
    }

    pub fn total_cells(&self) -> usize {
        (self.cells * self.cells) as usize
    }

    /// Check if a position lies on the field
    pub fn contains(&self, pos: Position) -> bool {
        let size = self.size_pixels();
        pos.x >= 0 && pos.x < size && pos.y >= 0 && pos.y < size
    }

    /// Fold a position that stepped off one edge back onto the opposite edge
    pub fn wrap(&self, pos: Position) -> Position {
        let max = self.max_coordinate();
        let fold = |v: i32| {
            if v < 0 {
                max
            } else if v > max {
                0
            } else {
                v
            }
        };
        Position::new(fold(pos.x), fold(pos.y))
    }

    /// Linear render index of a position
    pub fn position_index(&self, pos: Position) -> usize {
        (pos.x / self.cell_size + (pos.y / self.cell_size) * self.cells) as usize
    }

    /// Pixel origin of the cell at (column, row)
    pub fn cell_origin(&self, column: i32, row: i32) -> Position {
        Position::new(column * self.cell_size, row * self.cell_size)
    }

    /// (column, row) of the cell containing a position
    pub fn cell_coords(&self, pos: Position) -> (i32, i32) {
        (pos.x / self.cell_size, pos.y / self.cell_size)
    }

    /// Starting cell for a new snake
    pub fn center(&self) -> Position {
        self.cell_origin(self.cells / 2, self.cells / 2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimensions() {
        let grid = GridModel::new(40, 10);
        assert_eq!(grid.size_pixels(), 400);
        assert_eq!(grid.max_coordinate(), 390);
        assert_eq!(grid.total_cells(), 1600);
        assert_eq!(grid.center(), Position::new(200, 200));
    }

    #[test]
    fn test_position_index() {
        let grid = GridModel::new(40, 10);
        assert_eq!(grid.position_index(Position::new(0, 0)), 0);
        assert_eq!(grid.position_index(Position::new(200, 200)), 20 + 20 * 40);
        assert_eq!(grid.position_index(Position::new(390, 390)), 1599);
    }

    #[test]
    fn test_bounds_checking() {
        let grid = GridModel::new(20, 10);

        assert!(grid.contains(Position::new(0, 0)));
        assert!(grid.contains(Position::new(190, 190)));
        assert!(!grid.contains(Position::new(-10, 0)));
        assert!(!grid.contains(Position::new(200, 0)));
        assert!(!grid.contains(Position::new(0, 200)));
    }

    #[test]
    fn test_wrap() {
        let grid = GridModel::new(20, 10);

        assert_eq!(grid.wrap(Position::new(200, 50)), Position::new(0, 50));
        assert_eq!(grid.wrap(Position::new(-10, 50)), Position::new(190, 50));
        assert_eq!(grid.wrap(Position::new(50, -10)), Position::new(50, 190));
        assert_eq!(grid.wrap(Position::new(50, 200)), Position::new(50, 0));
        assert_eq!(grid.wrap(Position::new(70, 80)), Position::new(70, 80));
    }

    #[test]
    fn test_cell_coords_round_trip() {
        let grid = GridModel::new(20, 10);
        let origin = grid.cell_origin(3, 7);
        assert_eq!(origin, Position::new(30, 70));
        assert_eq!(grid.cell_coords(origin), (3, 7));
    }
}
