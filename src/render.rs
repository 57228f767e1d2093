//! Turns a solved policy into one display symbol per cell.

use std::fmt;

use ndarray::Array2;

use crate::mdp::{Action, GridMdp};
use crate::solver::Solution;

/// Direction marker for a single cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Symbol {
    Left,
    Up,
    Right,
    Down,
    /// No path to the goal was found from this cell.
    Stuck,
}

impl Symbol {
    pub fn as_char(self) -> char {
        match self {
            Symbol::Left => 'L',
            Symbol::Up => 'U',
            Symbol::Right => 'R',
            Symbol::Down => 'D',
            Symbol::Stuck => 'S',
        }
    }

    pub fn action(self) -> Option<Action> {
        match self {
            Symbol::Left => Some(Action::Left),
            Symbol::Up => Some(Action::Up),
            Symbol::Right => Some(Action::Right),
            Symbol::Down => Some(Action::Down),
            Symbol::Stuck => None,
        }
    }
}

impl From<Action> for Symbol {
    fn from(action: Action) -> Self {
        match action {
            Action::Left => Symbol::Left,
            Action::Up => Symbol::Up,
            Action::Right => Symbol::Right,
            Action::Down => Symbol::Down,
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Maps a [`Solution`] onto display symbols.
#[derive(Debug, Clone, Copy, Default)]
pub struct PolicyRenderer;

impl PolicyRenderer {
    /// One entry per state in row-major order: `None` for the goal and for
    /// obstacles, [`Symbol::Stuck`] for cells never proven solvable, and the
    /// highest-weight direction otherwise (lowest action index on ties).
    ///
    /// # Examples
    ///
    /// ```
    /// use maze_mdp::mdp::Grid;
    /// use maze_mdp::render::{PolicyRenderer, Symbol};
    /// use maze_mdp::solver::{solve, SolverConfig};
    ///
    /// let grid = Grid::from_rows(&[vec![0, 0], vec![1, 0]]).unwrap();
    /// let solution = solve(&grid, &SolverConfig::default()).unwrap();
    ///
    /// assert_eq!(
    ///     PolicyRenderer.represent(&solution),
    ///     vec![None, Some(Symbol::Left), None, Some(Symbol::Up)]
    /// );
    /// ```
    pub fn represent(&self, solution: &Solution) -> Vec<Option<Symbol>> {
        (0..solution.policy.len())
            .map(|s| self.symbol(solution, s))
            .collect()
    }

    pub fn symbol(&self, solution: &Solution, state: usize) -> Option<Symbol> {
        if state == solution.goal {
            return None;
        }
        if solution.policy[state].is_none() {
            return None;
        }
        if !solution.solvable[state] {
            return Some(Symbol::Stuck);
        }
        solution.greedy_action(state).map(Symbol::from)
    }

    /// Symbols reshaped to the grid layout.
    pub fn represent_grid(&self, solution: &Solution) -> Array2<Option<Symbol>> {
        Array2::from_shape_fn((solution.size, solution.size), |(r, c)| {
            self.symbol(solution, r * solution.size + c)
        })
    }

    /// Follows the rendered arrows from `start`.
    ///
    /// Returns the visited states, `start` first and the goal last, or `None`
    /// when the walk hits a stuck or obstacle cell or revisits a state.
    pub fn trace(&self, mdp: &GridMdp, solution: &Solution, start: usize) -> Option<Vec<usize>> {
        let mut path = vec![start];
        let mut visited = vec![false; mdp.num_states()];
        let mut state = start;
        visited[state] = true;

        while !mdp.is_terminal(state) {
            let action = self.symbol(solution, state)?.action()?;
            let next = mdp.next_state(state, action);
            if visited[next] {
                return None;
            }
            visited[next] = true;
            path.push(next);
            state = next;
        }
        Some(path)
    }
}
