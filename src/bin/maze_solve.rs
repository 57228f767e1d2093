use std::env;
use std::error::Error;

use maze_mdp::maze::{MazeConfig, MazeGenerator};
use maze_mdp::mdp::GridMdp;
use maze_mdp::render::PolicyRenderer;
use maze_mdp::solver::{solve, Method, SolverConfig};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

const USAGE: &str = "usage: maze-solve [size] [obstacle-density] [value|policy] [seed]";

fn main() -> Result<(), Box<dyn Error>> {
    let args: Vec<String> = env::args().skip(1).collect();
    if args.iter().any(|a| a == "-h" || a == "--help") {
        println!("{}", USAGE);
        return Ok(());
    }

    let defaults = MazeConfig::default();
    let maze_config = MazeConfig {
        size: match args.first() {
            Some(s) => s.parse()?,
            None => defaults.size,
        },
        obstacle_density: match args.get(1) {
            Some(d) => d.parse()?,
            None => defaults.obstacle_density,
        },
    };
    let method: Method = match args.get(2) {
        Some(m) => m.parse()?,
        None => Method::default(),
    };
    let mut rng = match args.get(3) {
        Some(seed) => ChaCha20Rng::seed_from_u64(seed.parse()?),
        None => ChaCha20Rng::from_entropy(),
    };

    let grid = MazeGenerator::new(maze_config)?.generate(&mut rng);
    let config = SolverConfig {
        method,
        ..SolverConfig::default()
    };
    let solution = solve(&grid, &config)?;
    let mdp = GridMdp::with_goal(&grid, config.goal);
    let symbols = PolicyRenderer.represent(&solution);

    for row in 0..grid.size() {
        let line: String = (0..grid.size())
            .map(|col| {
                let s = mdp.index(row, col);
                if mdp.is_terminal(s) {
                    'G'
                } else if mdp.is_obstacle(s) {
                    '#'
                } else {
                    symbols[s].map_or('?', |sym| sym.as_char())
                }
            })
            .collect();
        println!("{}", line);
    }

    let solvable = solution.solvable.iter().filter(|&&s| s).count();
    let reachable = mdp.reachable_from_goal().iter().filter(|&&r| r).count();
    println!(
        "{:?}: {:?} after {} iterations, {} of {} reachable cells solved",
        method, solution.status, solution.iterations, solvable, reachable
    );
    Ok(())
}
