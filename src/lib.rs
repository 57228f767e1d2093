pub mod error;
pub mod maze;
pub mod mdp;
pub mod render;
pub mod solver;

pub use error::{Error, Result};
pub use maze::{MazeConfig, MazeGenerator};
pub use mdp::{Action, Cell, GoalPlacement, Grid, GridMdp};
pub use render::{PolicyRenderer, Symbol};
pub use solver::{
    solve, Method, PolicyIterationSolver, Solution, SolveStatus, Solver, SolverConfig,
    ValueIterationSolver,
};
