use ndarray::Array2;

use crate::error::{Error, Result};

/// Occupancy of a single grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Cell {
    #[default]
    Free,
    Obstacle,
}

impl Cell {
    pub fn is_free(self) -> bool {
        self == Cell::Free
    }
}

impl TryFrom<u8> for Cell {
    type Error = u8;

    fn try_from(value: u8) -> std::result::Result<Self, Self::Error> {
        match value {
            0 => Ok(Cell::Free),
            1 => Ok(Cell::Obstacle),
            other => Err(other),
        }
    }
}

/// The four moves available to the agent, in policy-vector order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Left,
    Up,
    Right,
    Down,
}

impl Action {
    pub const COUNT: usize = 4;
    pub const ALL: [Action; Action::COUNT] = [Action::Left, Action::Up, Action::Right, Action::Down];

    /// Position of this action inside a policy vector.
    pub fn index(self) -> usize {
        match self {
            Action::Left => 0,
            Action::Up => 1,
            Action::Right => 2,
            Action::Down => 3,
        }
    }

    pub fn from_index(index: usize) -> Option<Action> {
        Action::ALL.get(index).copied()
    }

    /// Row and column offsets of the move.
    pub fn delta(self) -> (isize, isize) {
        match self {
            Action::Left => (0, -1),
            Action::Up => (-1, 0),
            Action::Right => (0, 1),
            Action::Down => (1, 0),
        }
    }
}

/// A square occupancy grid.
///
/// The top-left cell is the start and the bottom-right cell is the far
/// corner; both are guaranteed free by construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    cells: Array2<Cell>,
}

impl Grid {
    /// Builds a grid from rows of markers, 0 for free and 1 for obstacle.
    ///
    /// # Examples
    ///
    /// ```
    /// use maze_mdp::mdp::Grid;
    ///
    /// let grid = Grid::from_rows(&[vec![0, 1], vec![0, 0]]).unwrap();
    /// assert_eq!(grid.size(), 2);
    /// assert!(!grid.is_free(0, 1));
    /// ```
    pub fn from_rows(rows: &[Vec<u8>]) -> Result<Self> {
        let n = rows.len();
        if n == 0 {
            return Err(Error::EmptyGrid);
        }

        let mut cells = Array2::from_elem((n, n), Cell::Free);
        for (r, row) in rows.iter().enumerate() {
            if row.len() != n {
                return Err(Error::NotSquare {
                    row: r,
                    len: row.len(),
                    expected: n,
                });
            }
            for (c, &value) in row.iter().enumerate() {
                cells[[r, c]] = Cell::try_from(value).map_err(|value| Error::InvalidCell {
                    row: r,
                    col: c,
                    value,
                })?;
            }
        }

        Self::from_cells(cells)
    }

    /// Wraps an existing cell array, checking shape and the free corners.
    pub fn from_cells(cells: Array2<Cell>) -> Result<Self> {
        let (rows, cols) = cells.dim();
        if rows == 0 || cols == 0 {
            return Err(Error::EmptyGrid);
        }
        if rows != cols {
            return Err(Error::NotSquareArray { rows, cols });
        }
        if !cells[[0, 0]].is_free() {
            return Err(Error::BlockedStart);
        }
        if !cells[[rows - 1, cols - 1]].is_free() {
            return Err(Error::BlockedCorner);
        }
        Ok(Self { cells })
    }

    /// Clears the start and far corner of a non-empty square array.
    pub(crate) fn with_free_corners(mut cells: Array2<Cell>) -> Self {
        debug_assert!(cells.is_square() && !cells.is_empty());
        let last = cells.nrows() - 1;
        cells[[0, 0]] = Cell::Free;
        cells[[last, last]] = Cell::Free;
        Self { cells }
    }

    /// An N×N grid with no obstacles.
    pub fn open(size: usize) -> Result<Self> {
        if size == 0 {
            return Err(Error::InvalidSize(size));
        }
        Self::from_cells(Array2::from_elem((size, size), Cell::Free))
    }

    pub fn size(&self) -> usize {
        self.cells.nrows()
    }

    pub fn cell(&self, row: usize, col: usize) -> Cell {
        self.cells[[row, col]]
    }

    pub fn is_free(&self, row: usize, col: usize) -> bool {
        self.cell(row, col).is_free()
    }

    pub fn cells(&self) -> &Array2<Cell> {
        &self.cells
    }

    /// Row-major copy of the cells, index = row * N + col.
    pub fn flatten(&self) -> Vec<Cell> {
        self.cells.iter().copied().collect()
    }

    pub fn obstacle_count(&self) -> usize {
        self.cells.iter().filter(|c| !c.is_free()).count()
    }
}
