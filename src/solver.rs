//! Dynamic-programming solvers for grid-world MDPs.
//!
//! Both strategies share one [`Solver`] interface and produce a
//! [`Solution`]; which one runs is chosen through [`SolverConfig::method`].

pub mod policy_iteration;
mod sweep;
pub mod value_iteration;

#[cfg(test)]
mod tests;

use ndarray::Array2;

use crate::error::{Error, Result};
use crate::mdp::{Action, GoalPlacement, Grid, GridMdp};

pub use policy_iteration::PolicyIterationSolver;
pub use sweep::STUCK_VALUE;
pub use value_iteration::ValueIterationSolver;

/// Default convergence threshold on the largest per-sweep value change.
pub const DEFAULT_TOLERANCE: f64 = 1e-4;

/// Upper bound on the length of any shortest free-cell path in an N×N grid,
/// `⌊2N²/3⌋`. Winding corridors cannot do better than two free cells out of
/// every three.
pub fn longest_path_bound(size: usize) -> usize {
    2 * size * size / 3
}

/// Number of sweeps after which a solve stops even without convergence:
/// `round(N² × 2.5 / 3)`.
///
/// The margin over [`longest_path_bound`] leaves room for the wavefront to
/// reach every solvable cell plus the sweep that confirms convergence, while
/// bounding the work spent on cells that can never be solved.
///
/// # Examples
///
/// ```
/// use maze_mdp::solver::{iteration_cap, longest_path_bound};
///
/// assert_eq!(iteration_cap(3), 8);
/// assert!(iteration_cap(25) >= longest_path_bound(25));
/// ```
pub fn iteration_cap(size: usize) -> usize {
    ((size * size) as f64 * 2.5 / 3.0).round() as usize
}

/// Why a solve stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveStatus {
    /// Value iteration: the largest change among solvable states fell below
    /// the tolerance.
    Converged,
    /// Policy iteration: no solvable state changed its greedy policy.
    PolicyStable,
    /// The sweep budget ran out first.
    MaxIterationsReached,
}

/// Which dynamic-programming strategy to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Method {
    #[default]
    ValueIteration,
    PolicyIteration,
}

impl std::str::FromStr for Method {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "value" | "value-iteration" | "vi" => Ok(Method::ValueIteration),
            "policy" | "policy-iteration" | "pi" => Ok(Method::PolicyIteration),
            other => Err(format!("unknown solver method `{}`", other)),
        }
    }
}

/// Configuration options for a solve.
#[derive(Debug, Clone, PartialEq)]
pub struct SolverConfig {
    /// Strategy to run
    pub method: Method,
    /// Convergence threshold for value iteration
    pub tolerance: f64,
    /// Sweep budget; `None` uses [`iteration_cap`] for the grid size
    pub max_iterations: Option<usize>,
    /// Which corner is the absorbing goal
    pub goal: GoalPlacement,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            method: Method::ValueIteration,
            tolerance: DEFAULT_TOLERANCE,
            max_iterations: None,
            goal: GoalPlacement::Origin,
        }
    }
}

impl SolverConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.tolerance.is_finite() && self.tolerance > 0.0) {
            return Err(Error::InvalidTolerance(self.tolerance));
        }
        Ok(())
    }

    /// Boxed solver for the configured method.
    pub fn solver(&self) -> Box<dyn Solver> {
        match self.method {
            Method::ValueIteration => Box::new(ValueIterationSolver::new(
                self.tolerance,
                self.max_iterations,
            )),
            Method::PolicyIteration => Box::new(PolicyIterationSolver::new(self.max_iterations)),
        }
    }
}

/// Common interface of the value- and policy-iteration strategies.
pub trait Solver {
    fn solve(&self, mdp: &GridMdp) -> Solution;
}

/// Result of one solve. All arrays are row-major, one entry per cell.
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    pub size: usize,
    pub goal: usize,
    /// State values, `None` for obstacles
    pub values: Vec<Option<f64>>,
    /// Action weights in [`Action::ALL`] order, `None` for obstacles
    pub policy: Vec<Option<[f64; Action::COUNT]>>,
    /// Whether a path to the goal was discovered for each state
    pub solvable: Vec<bool>,
    /// Sweeps performed (outer iterations for policy iteration)
    pub iterations: usize,
    pub status: SolveStatus,
}

impl Solution {
    pub fn value(&self, state: usize) -> Option<f64> {
        self.values[state]
    }

    pub fn is_solvable(&self, state: usize) -> bool {
        self.solvable[state]
    }

    /// Highest-weight action of a state's policy, lowest index on ties.
    pub fn greedy_action(&self, state: usize) -> Option<Action> {
        let weights = self.policy[state]?;
        let mut best = 0;
        for (i, &w) in weights.iter().enumerate().skip(1) {
            if w > weights[best] {
                best = i;
            }
        }
        Action::from_index(best)
    }

    /// Values reshaped to the grid layout.
    pub fn value_grid(&self) -> Array2<Option<f64>> {
        Array2::from_shape_fn((self.size, self.size), |(r, c)| {
            self.values[r * self.size + c]
        })
    }
}

/// Validates `config`, builds the MDP for `grid` and runs the configured
/// strategy.
///
/// # Examples
///
/// ```
/// use maze_mdp::mdp::Grid;
/// use maze_mdp::solver::{solve, SolverConfig};
///
/// let grid = Grid::open(3).unwrap();
/// let solution = solve(&grid, &SolverConfig::default()).unwrap();
///
/// assert_eq!(solution.value(4), Some(-2.0));
/// assert!(solution.solvable.iter().all(|&s| s));
/// ```
pub fn solve(grid: &Grid, config: &SolverConfig) -> Result<Solution> {
    config.validate()?;
    let mdp = GridMdp::with_goal(grid, config.goal);
    Ok(config.solver().solve(&mdp))
}
