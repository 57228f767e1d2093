//! Random maze generation.

use ndarray::Array2;
use rand::Rng;

use crate::error::{Error, Result};
use crate::mdp::{Cell, Grid};

/// Configuration for random obstacle placement.
#[derive(Debug, Clone, PartialEq)]
pub struct MazeConfig {
    /// Number of rows (and columns)
    pub size: usize,
    /// Probability of each cell being an obstacle
    pub obstacle_density: f64,
}

impl Default for MazeConfig {
    fn default() -> Self {
        Self {
            size: 25,
            obstacle_density: 0.2,
        }
    }
}

/// Places obstacles independently at random, then clears the start and the
/// far corner.
///
/// # Examples
///
/// ```
/// use maze_mdp::maze::{MazeConfig, MazeGenerator};
/// use rand::SeedableRng;
/// use rand_chacha::ChaCha8Rng;
///
/// let generator = MazeGenerator::new(MazeConfig { size: 10, obstacle_density: 0.3 }).unwrap();
/// let mut rng = ChaCha8Rng::seed_from_u64(7);
/// let grid = generator.generate(&mut rng);
///
/// assert_eq!(grid.size(), 10);
/// assert!(grid.is_free(0, 0) && grid.is_free(9, 9));
/// ```
#[derive(Debug, Clone)]
pub struct MazeGenerator {
    config: MazeConfig,
}

impl MazeGenerator {
    pub fn new(config: MazeConfig) -> Result<Self> {
        if config.size == 0 {
            return Err(Error::InvalidSize(config.size));
        }
        if !(0.0..=1.0).contains(&config.obstacle_density) {
            return Err(Error::InvalidDensity(config.obstacle_density));
        }
        Ok(Self { config })
    }

    pub fn config(&self) -> &MazeConfig {
        &self.config
    }

    pub fn generate<R: Rng>(&self, rng: &mut R) -> Grid {
        let n = self.config.size;
        let density = self.config.obstacle_density;
        let cells = Array2::from_shape_simple_fn((n, n), || {
            if rng.gen::<f64>() < density {
                Cell::Obstacle
            } else {
                Cell::Free
            }
        });
        Grid::with_free_corners(cells)
    }
}
