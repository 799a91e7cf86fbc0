//! Landmass grid - fixed rows x cols of square cells

use serde::{Deserialize, Serialize};

use crate::error::GenError;

/// Cell position in the grid. This is the identity every other structure
/// uses to refer to a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CellPos {
    pub row: u32,
    pub col: u32,
}

impl CellPos {
    pub fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }

    /// Absolute row and column offsets to another cell
    pub fn offset_to(self, other: CellPos) -> (u32, u32) {
        (self.row.abs_diff(other.row), self.col.abs_diff(other.col))
    }

    /// Euclidean distance in row/col index space
    pub fn distance(self, other: CellPos) -> f64 {
        let (dr, dc) = self.offset_to(other);
        (dr as f64).hypot(dc as f64)
    }
}

#[derive(Debug, Clone)]
pub struct Cell {
    pos: CellPos,
}

impl Cell {
    pub fn pos(&self) -> CellPos {
        self.pos
    }
}

/// Grid of cells covering a `length` x `width` landmass.
///
/// Cells are created once here and never added or removed afterwards.
#[derive(Debug, Clone)]
pub struct Grid {
    rows: u32,
    cols: u32,
    cell_size: f64,
    cells: Vec<Cell>,
}

impl Grid {
    /// Builds the grid with `rows = ceil(length / cell_size)` and
    /// `cols = ceil(width / cell_size)`.
    pub fn new(length: f64, width: f64, cell_size: f64) -> Result<Self, GenError> {
        for (label, value) in [("length", length), ("width", width), ("cell size", cell_size)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(GenError::invalid(format!(
                    "landmass {label} must be a positive number, got {value}"
                )));
            }
        }

        let rows = cell_span(length, cell_size)?;
        let cols = cell_span(width, cell_size)?;
        let count = (rows as usize)
            .checked_mul(cols as usize)
            .ok_or_else(|| GenError::invalid(format!("grid of {rows}x{cols} cells is too large")))?;

        let mut cells = Vec::with_capacity(count);
        for row in 0..rows {
            for col in 0..cols {
                cells.push(Cell {
                    pos: CellPos { row, col },
                });
            }
        }

        Ok(Self {
            rows,
            cols,
            cell_size,
            cells,
        })
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    pub fn cols(&self) -> u32 {
        self.cols
    }

    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    pub fn longest_dimension(&self) -> u32 {
        self.rows.max(self.cols)
    }

    /// Grid diagonal in cells, rounded up
    pub fn diagonal(&self) -> u32 {
        (self.rows as f64).hypot(self.cols as f64).ceil() as u32
    }

    pub fn contains(&self, pos: CellPos) -> bool {
        pos.row < self.rows && pos.col < self.cols
    }

    /// Convert a cell position to its index in row-major order
    pub fn index_of(&self, pos: CellPos) -> Option<usize> {
        if self.contains(pos) {
            Some(pos.row as usize * self.cols as usize + pos.col as usize)
        } else {
            None
        }
    }

    /// Convert a row-major index to its cell position
    pub fn pos_at(&self, index: usize) -> Option<CellPos> {
        self.cells.get(index).map(Cell::pos)
    }

    pub fn cell(&self, pos: CellPos) -> Option<&Cell> {
        self.index_of(pos).map(|index| &self.cells[index])
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Apply a signed offset to a position, filtering out anything that falls
    /// off the grid.
    pub fn offset(&self, pos: CellPos, d_row: i64, d_col: i64) -> Option<CellPos> {
        let row = pos.row as i64 + d_row;
        let col = pos.col as i64 + d_col;
        if row < 0 || col < 0 || row >= self.rows as i64 || col >= self.cols as i64 {
            None
        } else {
            Some(CellPos::new(row as u32, col as u32))
        }
    }
}

fn cell_span(extent: f64, cell_size: f64) -> Result<u32, GenError> {
    let span = (extent / cell_size).ceil();
    if span < 1.0 || span > u32::MAX as f64 {
        return Err(GenError::invalid(format!(
            "extent {extent} with cell size {cell_size} gives {span} cells"
        )));
    }
    Ok(span as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_dimensions_round_up() {
        let grid = Grid::new(100_000.0, 45_500.0, 1_000.0).unwrap();

        assert_eq!(grid.rows(), 100);
        assert_eq!(grid.cols(), 46);
        assert_eq!(grid.cell_count(), 4_600);
        assert_eq!(grid.longest_dimension(), 100);
        assert_eq!(grid.cell_size(), 1_000.0);
    }

    #[test]
    fn test_grid_rejects_non_positive_dimensions() {
        assert!(matches!(
            Grid::new(0.0, 10.0, 1.0),
            Err(GenError::InvalidConfiguration(_))
        ));
        assert!(Grid::new(10.0, -1.0, 1.0).is_err());
        assert!(Grid::new(10.0, 10.0, 0.0).is_err());
        assert!(Grid::new(f64::NAN, 10.0, 1.0).is_err());
    }

    #[test]
    fn test_pos_index_conversion() {
        let grid = Grid::new(5.0, 10.0, 1.0).unwrap();

        let pos = CellPos::new(2, 3);
        let index = grid.index_of(pos).unwrap();
        assert_eq!(index, 23);
        assert_eq!(grid.pos_at(index), Some(pos));
        assert_eq!(grid.index_of(CellPos::new(5, 0)), None);
        assert_eq!(grid.cell(pos).map(Cell::pos), Some(pos));
        assert!(grid.cell(CellPos::new(0, 10)).is_none());
    }

    #[test]
    fn test_offset_filters_out_of_bounds() {
        let grid = Grid::new(4.0, 4.0, 1.0).unwrap();
        let corner = CellPos::new(0, 0);

        assert_eq!(grid.offset(corner, -1, 0), None);
        assert_eq!(grid.offset(corner, 0, 4), None);
        assert_eq!(grid.offset(corner, 3, 2), Some(CellPos::new(3, 2)));
    }

    #[test]
    fn test_distance() {
        let a = CellPos::new(0, 0);
        let b = CellPos::new(3, 4);

        assert_eq!(a.offset_to(b), (3, 4));
        assert!((a.distance(b) - 5.0).abs() < 1e-12);
    }
}
