//! Play area bounds and the tile grid laid over it

use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// The rectangle bodies bounce inside
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Arena {
    pub width: f32,
    pub height: f32,
}

impl Arena {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Rejected grid request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridError {
    OutOfBounds { col: i32, row: i32 },
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GridError::OutOfBounds { col, row } => {
                write!(f, "grid cell ({col}, {row}) is outside the grid")
            }
        }
    }
}

impl std::error::Error for GridError {}

/// Square tiles centered in the play area.
///
/// When the area is not an exact multiple of the cell size the leftover
/// pixels are split evenly between both sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    pub cell: u32,
    pub cols: u32,
    pub rows: u32,
    /// Pixels not covered by whole cells horizontally
    pub rest_x: u32,
    /// Pixels not covered by whole cells vertically
    pub rest_y: u32,
}

impl Grid {
    pub fn new(width: u32, height: u32, cell: u32) -> Self {
        let cell = cell.max(1);
        Self {
            cell,
            cols: width / cell,
            rows: height / cell,
            rest_x: width % cell,
            rest_y: height % cell,
        }
    }

    pub fn contains(&self, col: i32, row: i32) -> bool {
        col >= 0 && row >= 0 && (col as u32) < self.cols && (row as u32) < self.rows
    }

    /// Center point of cell (`col`, `row`)
    pub fn cell_center(&self, col: i32, row: i32) -> Result<Vec2, GridError> {
        if !self.contains(col, row) {
            return Err(GridError::OutOfBounds { col, row });
        }
        let x = self.rest_x / 2 + self.cell / 2 + self.cell * col as u32;
        let y = self.rest_y / 2 + self.cell / 2 + self.cell * row as u32;
        Ok(Vec2::new(x as f32, y as f32))
    }

    /// The cell containing `point`, or `None` outside the gridded area
    pub fn cell_at(&self, point: Vec2) -> Option<(u32, u32)> {
        let left = (self.rest_x / 2) as f32;
        let top = (self.rest_y / 2) as f32;
        let cell = self.cell as f32;
        let x = point.x - left;
        let y = point.y - top;
        if x < 0.0 || y < 0.0 {
            return None;
        }
        let col = (x / cell).floor() as u32;
        let row = (y / cell).floor() as u32;
        (col < self.cols && row < self.rows).then_some((col, row))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_dimensions_with_remainder() {
        let grid = Grid::new(640, 400, 50);
        assert_eq!(grid.cols, 12);
        assert_eq!(grid.rows, 8);
        assert_eq!(grid.rest_x, 40);
        assert_eq!(grid.rest_y, 0);
    }

    #[test]
    fn test_cell_center_includes_offset() {
        let grid = Grid::new(640, 400, 50);
        assert_eq!(grid.cell_center(0, 0), Ok(Vec2::new(45.0, 25.0)));
        assert_eq!(grid.cell_center(9, 2), Ok(Vec2::new(495.0, 125.0)));
    }

    #[test]
    fn test_cell_center_rejects_out_of_range() {
        let grid = Grid::new(640, 400, 50);
        assert_eq!(
            grid.cell_center(12, 0),
            Err(GridError::OutOfBounds { col: 12, row: 0 })
        );
        assert!(grid.cell_center(-1, 3).is_err());
        assert!(grid.cell_center(0, 8).is_err());
    }

    #[test]
    fn test_cell_at_round_trips_centers() {
        let grid = Grid::new(640, 400, 50);
        let center = grid.cell_center(4, 5).unwrap();
        assert_eq!(grid.cell_at(center), Some((4, 5)));
        assert_eq!(grid.cell_at(Vec2::new(5.0, 5.0)), None);
        assert_eq!(grid.cell_at(Vec2::new(635.0, 5.0)), None);
    }
}
