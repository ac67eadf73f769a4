//! Map generation

use anyhow::bail;
use itertools::iproduct;
use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::{Cell, Difficulty, Grid, Player};

/// Random maze generator with a start, a key and a door.
pub struct MazeGenerator {
    random: StdRng,
}

impl MazeGenerator {
    const DIRECTIONS: [(isize, isize); 4] = [(0, 1), (1, 0), (0, -1), (-1, 0)];

    /// Rejected grids tolerated before the wall density is lowered
    pub const MAX_ATTEMPTS: usize = 1000;
    /// How much the wall density drops after [Self::MAX_ATTEMPTS] rejections
    pub const DENSITY_STEP: f64 = 0.05;

    pub fn new(seed: Option<u64>) -> Self {
        Self {
            random: if let Some(state) = seed {
                StdRng::seed_from_u64(state)
            } else {
                StdRng::from_entropy()
            },
        }
    }

    /// Generate a solvable maze for the given difficulty
    ///
    /// The player is reset to the top left corner, without the key.
    pub fn generate(&mut self, difficulty: Difficulty) -> (Grid, Player) {
        let grid = self.generate_accepted(difficulty.size(), difficulty.wall_density());
        (grid, Player::default())
    }

    /// Generate a solvable `size` x `size` grid
    ///
    /// Every cell except the start becomes a wall with probability
    /// `wall_density`. Key and door go to random empty cells, and grids where
    /// they cannot both be reached from the start are thrown away.
    ///
    /// Returns error if the grid is too small to hold a start, a key and a
    /// door, or if `wall_density` is not a probability.
    pub fn generate_grid(&mut self, size: usize, wall_density: f64) -> anyhow::Result<Grid> {
        if size < 2 {
            bail!("Grid of size {} has no room for both key and door", size);
        }
        if !(0.0..=1.0).contains(&wall_density) {
            bail!("Wall density {} is not within [0, 1]", wall_density);
        }
        Ok(self.generate_accepted(size, wall_density))
    }

    /// Retry until a grid passes [Self::is_solvable]
    ///
    /// After [Self::MAX_ATTEMPTS] rejections in a row the density is lowered
    /// by [Self::DENSITY_STEP]. At zero density a grid of size two or more is
    /// always accepted, so this terminates.
    fn generate_accepted(&mut self, size: usize, wall_density: f64) -> Grid {
        let mut density = wall_density.clamp(0.0, 1.0);
        loop {
            for _ in 0..Self::MAX_ATTEMPTS {
                if let Some(grid) = self.try_generate(size, density) {
                    return grid;
                }
            }
            density = (density - Self::DENSITY_STEP).max(0.0);
        }
    }

    /// Single generation attempt, `None` if the result is not usable
    fn try_generate(&mut self, size: usize, wall_density: f64) -> Option<Grid> {
        let mut grid = Grid::new(size);
        self.scatter_walls(&mut grid, wall_density);

        let (x, y) = self.random_empty_cell(&grid)?;
        grid.set(x, y, Cell::Key);
        let (x, y) = self.random_empty_cell(&grid)?;
        grid.set(x, y, Cell::Door);

        Self::is_solvable(&grid).then_some(grid)
    }

    /// Turn each cell but the start into a wall with the given probability
    fn scatter_walls(&mut self, grid: &mut Grid, wall_density: f64) {
        let size = grid.size();
        for (y, x) in iproduct!(0..size, 0..size) {
            if (x, y) != (0, 0) && self.random.gen_bool(wall_density) {
                grid.set(x, y, Cell::Wall);
            }
        }
    }

    /// Pick a uniformly random empty cell other than the start
    ///
    /// Positions are drawn until a free one comes up. Returns `None` when
    /// there is no such cell at all.
    fn random_empty_cell(&mut self, grid: &Grid) -> Option<(usize, usize)> {
        let size = grid.size();
        let free = |x: usize, y: usize| (x, y) != (0, 0) && grid.get(x, y) == Some(Cell::Empty);
        if !iproduct!(0..size, 0..size).any(|(y, x)| free(x, y)) {
            return None;
        }
        loop {
            let x = self.random.gen_range(0..size);
            let y = self.random.gen_range(0..size);
            if free(x, y) {
                return Some((x, y));
            }
        }
    }

    /// Whether a key and a door can both be reached from the start
    ///
    /// Depth-first search over the four neighbours of each open cell. The
    /// search stops as soon as both have been seen.
    pub fn is_solvable(grid: &Grid) -> bool {
        if !grid.is_open(0, 0) {
            return false;
        }
        let size = grid.size();
        let mut visited = vec![vec![false; size]; size];
        let mut stack: Vec<(usize, usize)> = vec![(0, 0)];
        let mut found_key = false;
        let mut found_door = false;

        while let Some((x, y)) = stack.pop() {
            if visited[y][x] {
                continue;
            }
            visited[y][x] = true;

            match grid.get(x, y) {
                Some(Cell::Key) => found_key = true,
                Some(Cell::Door) => found_door = true,
                _ => (),
            }
            if found_key && found_door {
                return true;
            }

            for (dx, dy) in Self::DIRECTIONS {
                let (Some(nx), Some(ny)) = (x.checked_add_signed(dx), y.checked_add_signed(dy))
                else {
                    continue;
                };
                if grid.is_open(nx, ny) && !visited[ny][nx] {
                    stack.push((nx, ny));
                }
            }
        }
        false
    }
}
