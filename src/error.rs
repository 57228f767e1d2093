use thiserror::Error;

/// Errors raised while validating grids and solver settings.
///
/// Walls and unreachable cells are never errors: moving into a wall is a
/// self-loop and an unreachable cell is reported as stuck in the solution.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error("grid has no cells")]
    EmptyGrid,

    #[error("grid is not square: row {row} has {len} cells, expected {expected}")]
    NotSquare {
        row: usize,
        len: usize,
        expected: usize,
    },

    #[error("grid array is {rows}x{cols}, expected a square shape")]
    NotSquareArray { rows: usize, cols: usize },

    #[error("invalid cell marker {value} at ({row}, {col}); expected 0 (free) or 1 (obstacle)")]
    InvalidCell { row: usize, col: usize, value: u8 },

    #[error("start cell (0, 0) must be free")]
    BlockedStart,

    #[error("bottom-right cell must be free")]
    BlockedCorner,

    #[error("convergence tolerance must be positive and finite, got {0}")]
    InvalidTolerance(f64),

    #[error("obstacle density must lie in [0, 1], got {0}")]
    InvalidDensity(f64),

    #[error("maze size must be at least 1, got {0}")]
    InvalidSize(usize),
}

pub type Result<T> = std::result::Result<T, Error>;
