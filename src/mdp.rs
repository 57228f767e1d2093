pub mod grid;
pub mod model;

pub use grid::{Action, Cell, Grid};
pub use model::{GoalPlacement, GridMdp, STEP_PENALTY};
