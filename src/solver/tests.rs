use approx::assert_abs_diff_eq;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::error::Error;
use crate::maze::{MazeConfig, MazeGenerator};
use crate::mdp::{Action, GoalPlacement, Grid, GridMdp};
use crate::render::{PolicyRenderer, Symbol};
use crate::solver::{
    iteration_cap, longest_path_bound, solve, Method, PolicyIterationSolver, SolveStatus, Solver,
    SolverConfig, ValueIterationSolver,
};

fn random_mazes(size: usize, density: f64, count: u64) -> Vec<Grid> {
    let generator = MazeGenerator::new(MazeConfig {
        size,
        obstacle_density: density,
    })
    .unwrap();
    (0..count)
        .map(|seed| generator.generate(&mut ChaCha8Rng::seed_from_u64(seed)))
        .collect()
}

fn solvers() -> Vec<Box<dyn Solver>> {
    vec![
        Box::new(ValueIterationSolver::default()),
        Box::new(PolicyIterationSolver::default()),
    ]
}

/// Goal sealed behind a ring of obstacles.
fn walled_off_goal(size: usize) -> Grid {
    let mut rows = vec![vec![0u8; size]; size];
    rows[0][1] = 1;
    rows[1][0] = 1;
    Grid::from_rows(&rows).unwrap()
}

#[test]
fn test_iteration_cap_values() {
    assert_eq!(iteration_cap(1), 1);
    assert_eq!(iteration_cap(2), 3);
    assert_eq!(iteration_cap(3), 8);
    assert_eq!(iteration_cap(4), 13);
    assert_eq!(iteration_cap(25), 521);
}

#[test]
fn test_iteration_cap_covers_longest_path() {
    for n in 1..=60 {
        assert!(
            iteration_cap(n) > longest_path_bound(n),
            "cap {} does not exceed bound {} for n = {}",
            iteration_cap(n),
            longest_path_bound(n),
            n
        );
    }
}

#[test]
fn test_bellman_fixed_point_on_random_mazes() {
    for grid in random_mazes(9, 0.3, 20) {
        let mdp = GridMdp::new(&grid);
        let solution = ValueIterationSolver::default().solve(&mdp);
        for s in mdp.states().filter(|&s| solution.is_solvable(s)) {
            let best = mdp
                .actions(s)
                .into_iter()
                .map(|a| mdp.reward(s, a) + solution.value(mdp.next_state(s, a)).unwrap())
                .fold(f64::NEG_INFINITY, f64::max);
            assert_abs_diff_eq!(solution.value(s).unwrap(), best, epsilon = 1e-4);
        }
    }
}

#[test]
fn test_values_are_negative_distances() {
    for grid in random_mazes(8, 0.25, 10) {
        let mdp = GridMdp::new(&grid);
        let solution = ValueIterationSolver::default().solve(&mdp);
        for s in mdp.states().filter(|&s| solution.is_solvable(s)) {
            let path = PolicyRenderer.trace(&mdp, &solution, s).unwrap();
            assert_abs_diff_eq!(solution.value(s).unwrap(), -((path.len() - 1) as f64));
        }
    }
}

#[test]
fn test_solvability_matches_reachability() {
    for grid in random_mazes(10, 0.35, 25) {
        let mdp = GridMdp::new(&grid);
        let expected = mdp.reachable_from_goal();
        for solver in solvers() {
            let solution = solver.solve(&mdp);
            assert_eq!(solution.solvable, expected);
        }
    }
}

#[test]
fn test_solvability_is_monotone_over_budgets() {
    let grid = &random_mazes(8, 0.2, 1)[0];
    let mdp = GridMdp::new(grid);
    let mut previous = vec![false; mdp.num_states()];
    for budget in 1..=iteration_cap(8) {
        let solution = ValueIterationSolver::new(1e-4, Some(budget)).solve(&mdp);
        for (before, after) in previous.iter().zip(&solution.solvable) {
            assert!(!before || *after);
        }
        previous = solution.solvable;
    }

    let mut previous = vec![false; mdp.num_states()];
    for budget in 1..=iteration_cap(8) {
        let solution = PolicyIterationSolver::new(Some(budget)).solve(&mdp);
        for (before, after) in previous.iter().zip(&solution.solvable) {
            assert!(!before || *after, "budget {} lost a solvable state", budget);
        }
        previous = solution.solvable;
    }
    assert_eq!(previous, mdp.reachable_from_goal());
}

#[test]
fn test_open_grid_paths_follow_manhattan_distance() {
    for n in 2..=8 {
        let mdp = GridMdp::new(&Grid::open(n).unwrap());
        let solution = ValueIterationSolver::default().solve(&mdp);
        assert_eq!(solution.status, SolveStatus::Converged);
        for s in 1..mdp.num_states() {
            let (row, col) = mdp.coordinates(s);
            let path = PolicyRenderer.trace(&mdp, &solution, s).unwrap();
            assert_eq!(path.len() - 1, row + col);
        }
    }
}

#[test]
fn test_policy_iteration_reaches_goal_on_open_grid() {
    for n in 2..=12 {
        let mdp = GridMdp::new(&Grid::open(n).unwrap());
        let solution = PolicyIterationSolver::default().solve(&mdp);
        assert!(solution.solvable.iter().all(|&s| s));
        assert_eq!(PolicyRenderer.represent(&solution)[0], None);
        assert_eq!(solution.greedy_action(1), Some(Action::Left));
        assert_eq!(solution.greedy_action(n), Some(Action::Up));
        for s in 1..mdp.num_states() {
            let (row, col) = mdp.coordinates(s);
            let path = PolicyRenderer.trace(&mdp, &solution, s).unwrap();
            assert_eq!(path.len() - 1, row + col, "state {} of {}x{}", s, n, n);
        }
    }
}

#[test]
fn test_value_iteration_arrows_reach_goal_on_mazes() {
    for grid in random_mazes(12, 0.3, 10) {
        let mdp = GridMdp::new(&grid);
        let value = ValueIterationSolver::default().solve(&mdp);
        let policy = PolicyIterationSolver::default().solve(&mdp);
        assert_eq!(policy.solvable, value.solvable);
        for s in mdp.states().filter(|&s| value.is_solvable(s)) {
            assert!(PolicyRenderer.trace(&mdp, &value, s).is_some());
        }
    }
}

#[test]
fn test_walled_off_goal_renders_stuck() {
    for n in 3..=7 {
        let grid = walled_off_goal(n);
        let mdp = GridMdp::new(&grid);
        for solver in solvers() {
            let solution = solver.solve(&mdp);
            assert!(solution.iterations <= iteration_cap(n));
            let symbols = PolicyRenderer.represent(&solution);
            for (s, symbol) in symbols.iter().enumerate() {
                let expected = if s == 0 || mdp.is_obstacle(s) {
                    None
                } else {
                    Some(Symbol::Stuck)
                };
                assert_eq!(*symbol, expected, "state {} of {}x{}", s, n, n);
            }
        }
    }
}

#[test]
fn test_repeated_solves_are_identical() {
    for grid in random_mazes(12, 0.3, 5) {
        let mdp = GridMdp::new(&grid);
        for solver in solvers() {
            let first = solver.solve(&mdp);
            let second = solver.solve(&mdp);
            assert_eq!(first, second);
        }
    }
}

#[test]
fn test_three_by_three_example_for_both_methods() {
    let grid = Grid::open(3).unwrap();
    for method in [Method::ValueIteration, Method::PolicyIteration] {
        let config = SolverConfig {
            method,
            ..SolverConfig::default()
        };
        let solution = solve(&grid, &config).unwrap();
        let symbols = PolicyRenderer.represent(&solution);
        assert_eq!(symbols[1], Some(Symbol::Left));
        assert!(matches!(symbols[4], Some(Symbol::Left) | Some(Symbol::Up)));
        if method == Method::ValueIteration {
            assert_abs_diff_eq!(solution.value(1).unwrap(), -1.0);
            assert_abs_diff_eq!(solution.value(3).unwrap(), -1.0);
            assert_abs_diff_eq!(solution.value(4).unwrap(), -2.0);
        }
    }
}

#[test]
fn test_solve_rejects_bad_tolerance() {
    let grid = Grid::open(2).unwrap();
    for tolerance in [0.0, -1.0, f64::NAN, f64::INFINITY] {
        let config = SolverConfig {
            tolerance,
            ..SolverConfig::default()
        };
        assert!(matches!(
            solve(&grid, &config),
            Err(Error::InvalidTolerance(_))
        ));
    }
}

#[test]
fn test_solve_with_corner_goal() {
    let grid = Grid::from_rows(&[vec![0, 0, 0], vec![0, 1, 0], vec![0, 0, 0]]).unwrap();
    let config = SolverConfig {
        goal: GoalPlacement::Corner,
        ..SolverConfig::default()
    };
    let solution = solve(&grid, &config).unwrap();
    assert_eq!(solution.goal, 8);
    assert_eq!(solution.value(8), Some(0.0));
    assert_abs_diff_eq!(solution.value(0).unwrap(), -4.0);
    assert_eq!(PolicyRenderer.represent(&solution)[8], None);
    assert_eq!(solution.value(4), None);
}

#[test]
fn test_method_parsing() {
    assert_eq!("value".parse::<Method>(), Ok(Method::ValueIteration));
    assert_eq!("Policy".parse::<Method>(), Ok(Method::PolicyIteration));
    assert!("bogus".parse::<Method>().is_err());
}

#[test]
fn test_value_grid_layout() {
    let grid = Grid::from_rows(&[vec![0, 1], vec![0, 0]]).unwrap();
    let solution = solve(&grid, &SolverConfig::default()).unwrap();
    let values = solution.value_grid();
    assert_eq!(values[[0, 1]], None);
    assert_eq!(values[[1, 0]], Some(-1.0));
    assert_eq!(values[[1, 1]], Some(-2.0));
}
