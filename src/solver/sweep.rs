//! Per-solve working state shared by both dynamic-programming strategies.
//!
//! A [`SweepContext`] owns the value, policy and solvability arrays of exactly
//! one `solve` call. Sweeps are synchronous: every backup of a sweep reads the
//! arrays as they were when the sweep started and the new values replace the
//! old ones wholesale at the end.

use approx::abs_diff_eq;
#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::mdp::{Action, GridMdp};
use crate::solver::{Solution, SolveStatus};

/// Value given to a free cell that has no legal move at all.
pub const STUCK_VALUE: f64 = -100.0;

/// Q-values closer than this are treated as tied during policy improvement.
const TIE_EPSILON: f64 = 1e-9;

const UNIFORM_POLICY: [f64; Action::COUNT] = [1.0 / Action::COUNT as f64; Action::COUNT];

/// Outcome of one sweep.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct SweepReport {
    /// Largest absolute value change among states solvable after the sweep.
    pub delta: f64,
    /// States that became solvable during the sweep.
    pub newly_solvable: usize,
}

pub(crate) struct SweepContext<'a> {
    mdp: &'a GridMdp,
    states: Vec<usize>,
    values: Vec<f64>,
    policy: Vec<Option<[f64; Action::COUNT]>>,
    solvable: Vec<bool>,
}

impl<'a> SweepContext<'a> {
    /// Zero values, uniform policy on free cells, only the goal solvable.
    pub fn new(mdp: &'a GridMdp) -> Self {
        let n = mdp.num_states();
        let policy = (0..n)
            .map(|s| (!mdp.is_obstacle(s)).then_some(UNIFORM_POLICY))
            .collect();
        let mut solvable = vec![false; n];
        solvable[mdp.goal()] = true;

        Self {
            mdp,
            states: mdp.states().collect(),
            values: vec![0.0; n],
            policy,
            solvable,
        }
    }

    pub fn solvable_count(&self) -> usize {
        self.solvable.iter().filter(|&&s| s).count()
    }

    /// Runs one synchronous sweep with `backup` computing each new value
    /// from the previous value array. Solvability spreads one step outward
    /// from the states that were solvable when the sweep began.
    pub fn sweep<F>(&mut self, backup: F) -> SweepReport
    where
        F: Fn(&GridMdp, &[f64], usize) -> f64 + Sync,
    {
        let mdp = self.mdp;
        let values = &self.values;
        let solvable = &self.solvable;
        let update = |&s: &usize| {
            let reaches = mdp
                .actions(s)
                .into_iter()
                .any(|a| solvable[mdp.next_state(s, a)]);
            (s, backup(mdp, values, s), reaches)
        };

        #[cfg(feature = "parallel")]
        let updates: Vec<(usize, f64, bool)> = self.states.par_iter().map(update).collect();
        #[cfg(not(feature = "parallel"))]
        let updates: Vec<(usize, f64, bool)> = self.states.iter().map(update).collect();

        let mut report = SweepReport {
            delta: 0.0,
            newly_solvable: 0,
        };
        for (s, value, reaches) in updates {
            if reaches && !self.solvable[s] {
                self.solvable[s] = true;
                report.newly_solvable += 1;
            }
            if self.solvable[s] {
                report.delta = report.delta.max((value - self.values[s]).abs());
            }
            self.values[s] = value;
        }
        report
    }

    /// Replaces each state's policy with the indicator of its max-Q actions.
    ///
    /// Returns how many currently solvable states changed policy.
    pub fn improve_policy(&mut self) -> usize {
        let mut changed = 0;
        for &s in &self.states {
            let greedy = greedy_indicator(self.mdp, &self.values, s);
            if self.policy[s] != Some(greedy) {
                if self.solvable[s] {
                    changed += 1;
                }
                self.policy[s] = Some(greedy);
            }
        }
        changed
    }

    pub fn into_solution(self, iterations: usize, status: SolveStatus) -> Solution {
        let mdp = self.mdp;
        let values = self
            .values
            .iter()
            .enumerate()
            .map(|(s, &v)| (!mdp.is_obstacle(s)).then_some(v))
            .collect();

        Solution {
            size: mdp.size(),
            goal: mdp.goal(),
            values,
            policy: self.policy,
            solvable: self.solvable,
            iterations,
            status,
        }
    }
}

/// Q(s, a) = r(s, a) + V(s') for the deterministic successor s'.
pub(crate) fn q_value(mdp: &GridMdp, values: &[f64], state: usize, action: Action) -> f64 {
    mdp.reward(state, action) + values[mdp.next_state(state, action)]
}

/// Bellman optimality backup over the legal actions.
pub(crate) fn optimal_backup(mdp: &GridMdp, values: &[f64], state: usize) -> f64 {
    let actions = mdp.actions(state);
    if actions.is_empty() {
        return STUCK_VALUE;
    }
    actions
        .into_iter()
        .map(|a| q_value(mdp, values, state, a))
        .fold(f64::NEG_INFINITY, f64::max)
}

/// Uniform expectation over all four moves, walls included as self-loops.
pub(crate) fn uniform_backup(mdp: &GridMdp, values: &[f64], state: usize) -> f64 {
    let total: f64 = Action::ALL
        .iter()
        .map(|&a| q_value(mdp, values, state, a))
        .sum();
    total / Action::COUNT as f64
}

/// Weight 1 on every legal action attaining the max Q-value, 0 elsewhere.
fn greedy_indicator(mdp: &GridMdp, values: &[f64], state: usize) -> [f64; Action::COUNT] {
    let actions = mdp.actions(state);
    let mut indicator = [0.0; Action::COUNT];
    let best = actions
        .iter()
        .map(|&a| q_value(mdp, values, state, a))
        .fold(f64::NEG_INFINITY, f64::max);
    for a in actions {
        if abs_diff_eq!(q_value(mdp, values, state, a), best, epsilon = TIE_EPSILON) {
            indicator[a.index()] = 1.0;
        }
    }
    indicator
}
