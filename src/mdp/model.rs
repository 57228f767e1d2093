//! Deterministic transition and reward model over a flattened grid.

use std::collections::VecDeque;

use crate::mdp::grid::{Action, Cell, Grid};

/// Reward collected by every non-terminal move.
pub const STEP_PENALTY: f64 = -1.0;

/// Which cell acts as the absorbing goal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GoalPlacement {
    /// Flattened index 0, the top-left cell.
    #[default]
    Origin,
    /// Flattened index N² - 1, the bottom-right cell.
    Corner,
}

impl GoalPlacement {
    pub fn index(self, size: usize) -> usize {
        match self {
            GoalPlacement::Origin => 0,
            GoalPlacement::Corner => size * size - 1,
        }
    }
}

/// A grid world seen as a Markov Decision Process.
///
/// States are flattened cell indices (`row * size + col`). Obstacle cells
/// keep their index but are never updated. The goal state is terminal: it
/// has no outgoing actions and its value stays at zero.
#[derive(Debug, Clone)]
pub struct GridMdp {
    cells: Vec<Cell>,
    size: usize,
    goal: usize,
}

impl GridMdp {
    /// Builds the model with the goal at index 0.
    pub fn new(grid: &Grid) -> Self {
        Self::with_goal(grid, GoalPlacement::Origin)
    }

    pub fn with_goal(grid: &Grid, placement: GoalPlacement) -> Self {
        let size = grid.size();
        Self {
            cells: grid.flatten(),
            size,
            goal: placement.index(size),
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn num_states(&self) -> usize {
        self.cells.len()
    }

    pub fn goal(&self) -> usize {
        self.goal
    }

    pub fn is_terminal(&self, state: usize) -> bool {
        state == self.goal
    }

    pub fn is_obstacle(&self, state: usize) -> bool {
        !self.cells[state].is_free()
    }

    pub fn index(&self, row: usize, col: usize) -> usize {
        row * self.size + col
    }

    pub fn coordinates(&self, state: usize) -> (usize, usize) {
        (state / self.size, state % self.size)
    }

    /// Free, non-terminal states in increasing index order.
    pub fn states(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.num_states()).filter(move |&s| !self.is_obstacle(s) && !self.is_terminal(s))
    }

    /// In-bounds neighbour reached by `action`, ignoring obstacles.
    fn neighbour(&self, state: usize, action: Action) -> Option<usize> {
        let (row, col) = self.coordinates(state);
        let (dr, dc) = action.delta();
        let row = row.checked_add_signed(dr)?;
        let col = col.checked_add_signed(dc)?;
        if row < self.size && col < self.size {
            Some(self.index(row, col))
        } else {
            None
        }
    }

    /// Actions whose target cell is in bounds and free. The goal has none.
    pub fn actions(&self, state: usize) -> Vec<Action> {
        if self.is_terminal(state) || self.is_obstacle(state) {
            return Vec::new();
        }
        Action::ALL
            .iter()
            .copied()
            .filter(|&a| matches!(self.neighbour(state, a), Some(next) if !self.is_obstacle(next)))
            .collect()
    }

    /// Deterministic successor. Walls and the grid edge bounce back to `state`.
    pub fn next_state(&self, state: usize, action: Action) -> usize {
        match self.neighbour(state, action) {
            Some(next) if !self.is_obstacle(next) => next,
            _ => state,
        }
    }

    pub fn reward(&self, _state: usize, _action: Action) -> f64 {
        STEP_PENALTY
    }

    /// Free cells connected to the goal, found by breadth-first search.
    pub fn reachable_from_goal(&self) -> Vec<bool> {
        let mut seen = vec![false; self.num_states()];
        let mut queue = VecDeque::new();
        seen[self.goal] = true;
        queue.push_back(self.goal);

        while let Some(state) = queue.pop_front() {
            for action in Action::ALL {
                if let Some(next) = self.neighbour(state, action) {
                    if !self.is_obstacle(next) && !seen[next] {
                        seen[next] = true;
                        queue.push_back(next);
                    }
                }
            }
        }
        seen
    }
}
