//! Policy iteration with a one-sweep evaluation step.

use log::{debug, trace};

use crate::mdp::GridMdp;
use crate::solver::sweep::{uniform_backup, SweepContext};
use crate::solver::{iteration_cap, Solution, SolveStatus, Solver};

/// Solves a grid MDP by alternating evaluation and greedy improvement.
///
/// Evaluation is a single synchronous sweep of the expectation over all four
/// moves (walls bounce back), which is one step of evaluating the uniform
/// random policy. Improvement replaces every policy with the indicator of its
/// max-Q actions.
///
/// The loop ends when no solvable state changes its policy and no state
/// became solvable during the iteration, or when the budget runs out. Waiting
/// for the solvability wavefront to settle keeps the loop from stopping while
/// reachable cells are still unmarked, since an unsolved cell's policy may
/// already match the one it will get once solvable.
///
/// The values are a truncated evaluation of the random-walk policy, not the
/// optimal values, so the resulting arrows are not guaranteed to be shortest
/// paths. In cluttered mazes a few solvable cells may point into a loop or a
/// dead end; use [`ValueIterationSolver`](crate::solver::ValueIterationSolver)
/// when every arrow must lead to the goal.
#[derive(Debug, Clone, Default)]
pub struct PolicyIterationSolver {
    max_iterations: Option<usize>,
}

impl PolicyIterationSolver {
    pub fn new(max_iterations: Option<usize>) -> Self {
        Self { max_iterations }
    }
}

impl Solver for PolicyIterationSolver {
    fn solve(&self, mdp: &GridMdp) -> Solution {
        let max_iterations = self
            .max_iterations
            .unwrap_or_else(|| iteration_cap(mdp.size()));
        debug!(
            "policy iteration on {}x{} grid, budget {} iterations",
            mdp.size(),
            mdp.size(),
            max_iterations
        );

        let mut ctx = SweepContext::new(mdp);
        let mut status = SolveStatus::MaxIterationsReached;
        let mut iterations = 0;

        while iterations < max_iterations {
            let report = ctx.sweep(uniform_backup);
            let changed = ctx.improve_policy();
            iterations += 1;
            trace!(
                "iteration {}: {} policies changed, {} newly solvable",
                iterations,
                changed,
                report.newly_solvable
            );
            if changed == 0 && report.newly_solvable == 0 {
                status = SolveStatus::PolicyStable;
                break;
            }
        }

        debug!(
            "policy iteration stopped after {} iterations ({:?}), {} solvable states",
            iterations,
            status,
            ctx.solvable_count()
        );
        ctx.into_solution(iterations, status)
    }
}
