//! Value iteration: repeated Bellman optimality sweeps followed by a single
//! greedy policy extraction.

use log::{debug, trace};

use crate::mdp::GridMdp;
use crate::solver::sweep::{optimal_backup, SweepContext};
use crate::solver::{iteration_cap, Solution, SolveStatus, Solver, DEFAULT_TOLERANCE};

/// Solves a grid MDP by value iteration.
///
/// Each sweep sets `V(s) = max_a [r(s, a) + V(s')]` for every free,
/// non-terminal state, or [`STUCK_VALUE`](crate::solver::STUCK_VALUE) when a
/// state has no legal move. The loop stops once the largest change among
/// solvable states drops below `tolerance`, or after the sweep budget.
///
/// # Examples
///
/// ```
/// use maze_mdp::mdp::{Grid, GridMdp};
/// use maze_mdp::solver::{SolveStatus, Solver, ValueIterationSolver};
///
/// let mdp = GridMdp::new(&Grid::open(3).unwrap());
/// let solution = ValueIterationSolver::default().solve(&mdp);
///
/// assert_eq!(solution.status, SolveStatus::Converged);
/// assert_eq!(solution.value(8), Some(-4.0));
/// ```
#[derive(Debug, Clone)]
pub struct ValueIterationSolver {
    tolerance: f64,
    max_iterations: Option<usize>,
}

impl ValueIterationSolver {
    pub fn new(tolerance: f64, max_iterations: Option<usize>) -> Self {
        Self {
            tolerance,
            max_iterations,
        }
    }
}

impl Default for ValueIterationSolver {
    fn default() -> Self {
        Self::new(DEFAULT_TOLERANCE, None)
    }
}

impl Solver for ValueIterationSolver {
    fn solve(&self, mdp: &GridMdp) -> Solution {
        let max_iterations = self
            .max_iterations
            .unwrap_or_else(|| iteration_cap(mdp.size()));
        debug!(
            "value iteration on {}x{} grid, budget {} sweeps",
            mdp.size(),
            mdp.size(),
            max_iterations
        );

        let mut ctx = SweepContext::new(mdp);
        let mut status = SolveStatus::MaxIterationsReached;
        let mut iterations = 0;

        while iterations < max_iterations {
            let report = ctx.sweep(optimal_backup);
            iterations += 1;
            trace!(
                "sweep {}: delta {:.6}, {} newly solvable",
                iterations,
                report.delta,
                report.newly_solvable
            );
            if report.delta < self.tolerance {
                status = SolveStatus::Converged;
                break;
            }
        }

        ctx.improve_policy();
        debug!(
            "value iteration stopped after {} sweeps ({:?}), {} solvable states",
            iterations,
            status,
            ctx.solvable_count()
        );
        ctx.into_solution(iterations, status)
    }
}
