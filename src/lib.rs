//! Find the key, open the door: random mazes played with typed commands
//!
//! A [Game] owns one [Grid] and one [Player]. Mazes come from the
//! [MazeGenerator], which only hands out grids where the start, the key and
//! the door are connected. Players move with plain commands (`up`, `down`,
//! `left`, `right`, `pickup`, `unlock`) or with loops such as `for 3 right`.
//!
//! # Examples
//! ## Walking a hand-made maze
//! ```
//! use key_maze::{Game, Grid, MazeGenerator};
//!
//! let emojis = "
//! 🏃🔑🚪
//! 🟩🟩🟩
//! 🟩🟩🟩";
//! let (grid, player) = Grid::parse_emojis(emojis.trim()).unwrap();
//! let mut game = Game::with_maze(grid, player, MazeGenerator::new(Some(7)));
//!
//! for command in ["right", "pickup", "right"] {
//!     game.execute_command(command);
//! }
//! assert_eq!((game.player().x, game.player().y), (2, 0));
//! assert!(game.player().has_key);
//!
//! // Opening the door wins, and a fresh easy maze is generated
//! game.execute_command("unlock");
//! assert_eq!(game.wins(), 1);
//! assert_eq!(game.grid().size(), 8);
//! ```
//!
//! ## Generating a maze
//! ```
//! use key_maze::{Cell, Difficulty, MazeGenerator};
//!
//! let mut gen = MazeGenerator::new(Some(42));
//! let (grid, player) = gen.generate(Difficulty::Hard);
//! assert_eq!(grid.size(), 12);
//! assert_eq!(grid.count(Cell::Key), 1);
//! assert_eq!(grid.count(Cell::Door), 1);
//! assert_eq!((player.x, player.y), (0, 0));
//! println!("{}", grid.render(&player));
//! ```

use std::fmt;
use std::str::FromStr;

use anyhow::{anyhow, bail};
use itertools::Itertools;

pub mod command;
pub mod game;
pub mod input;
pub mod maze_generator;

pub use command::{Command, Direction};
pub use game::{Game, GameObserver};
pub use input::CommandBuffer;
pub use maze_generator::MazeGenerator;

/// Contents of a single square
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Cell {
    Empty,
    Wall,
    Key,
    Door,
}

impl Cell {
    const S_EMPTY: char = '🟩';
    const S_WALL: char = '🟫';
    const S_KEY: char = '🔑';
    const S_DOOR: char = '🚪';

    /// Emoji used when drawing the square
    pub const fn symbol(self) -> char {
        match self {
            Cell::Empty => Self::S_EMPTY,
            Cell::Wall => Self::S_WALL,
            Cell::Key => Self::S_KEY,
            Cell::Door => Self::S_DOOR,
        }
    }

    fn from_symbol(c: char) -> Option<Self> {
        match c {
            Self::S_EMPTY => Some(Cell::Empty),
            Self::S_WALL => Some(Cell::Wall),
            Self::S_KEY => Some(Cell::Key),
            Self::S_DOOR => Some(Cell::Door),
            _ => None,
        }
    }
}

/// The one who walks the maze
///
/// `x` is the column and `y` the row, both counted from the top left corner.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Player {
    pub x: usize,
    pub y: usize,
    pub has_key: bool,
}

/// How big and how crowded with walls a maze is
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

/// Difficulty name was not one of `easy`, `medium` or `hard`
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown difficulty `{0}`, expected one of: easy, medium, hard")]
pub struct ParseDifficultyError(String);

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    /// Side length of the square grid
    pub const fn size(self) -> usize {
        match self {
            Difficulty::Easy => 8,
            Difficulty::Medium => 10,
            Difficulty::Hard => 12,
        }
    }

    /// Probability that any square other than the start becomes a wall
    pub const fn wall_density(self) -> f64 {
        match self {
            Difficulty::Easy => 0.2,
            Difficulty::Medium => 0.3,
            Difficulty::Hard => 0.4,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        };
        f.write_str(name)
    }
}

impl FromStr for Difficulty {
    type Err = ParseDifficultyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            _ => Err(ParseDifficultyError(s.to_string())),
        }
    }
}

/// Square board of cells, indexed as `(x, y)` = (column, row)
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    /// Rows of the board, top to bottom
    cells: Vec<Vec<Cell>>,
}

impl Grid {
    const S_PLAYER: char = '🏃';

    /// Create a `size` x `size` grid with every cell empty
    pub fn new(size: usize) -> Self {
        Self {
            cells: (0..size)
                .map(|_| (0..size).map(|_| Cell::Empty).collect())
                .collect(),
        }
    }

    /// Side length of the grid
    pub fn size(&self) -> usize {
        self.cells.len()
    }

    /// Cell at column `x`, row `y`, or `None` when out of bounds
    pub fn get(&self, x: usize, y: usize) -> Option<Cell> {
        self.cells.get(y).and_then(|row| row.get(x)).copied()
    }

    /// Overwrite the cell at column `x`, row `y`
    ///
    /// Panics if the position is out of bounds.
    pub fn set(&mut self, x: usize, y: usize, cell: Cell) {
        self.cells[y][x] = cell;
    }

    /// Whether the player could stand at `(x, y)`
    pub fn is_open(&self, x: usize, y: usize) -> bool {
        matches!(self.get(x, y), Some(c) if c != Cell::Wall)
    }

    /// Number of cells carrying the given tag
    pub fn count(&self, cell: Cell) -> usize {
        self.cells.iter().flatten().filter(|&&c| c == cell).count()
    }

    /// First position (row-major) carrying the given tag
    pub fn find(&self, cell: Cell) -> Option<(usize, usize)> {
        self.positions().find(|&(x, y)| self.cells[y][x] == cell)
    }

    /// Share of walls among the cells that may hold one (all but the start)
    pub fn wall_density(&self) -> f64 {
        let candidates = (self.size() * self.size()).saturating_sub(1);
        if candidates == 0 {
            return 0.0;
        }
        self.count(Cell::Wall) as f64 / candidates as f64
    }

    /// All positions `(x, y)` in row-major order
    pub fn positions(&self) -> impl Iterator<Item = (usize, usize)> {
        let size = self.size();
        itertools::iproduct!(0..size, 0..size).map(|(y, x)| (x, y))
    }

    /// Draw the grid as emoji rows, with the player on top of its cell
    pub fn render(&self, player: &Player) -> String {
        self.cells
            .iter()
            .enumerate()
            .map(|(y, row)| {
                row.iter()
                    .enumerate()
                    .map(|(x, cell)| {
                        if (x, y) == (player.x, player.y) {
                            Self::S_PLAYER
                        } else {
                            cell.symbol()
                        }
                    })
                    .join("")
            })
            .join("\n")
    }

    /// Parse a grid and player from the emoji format produced by [Grid::render]
    ///
    /// The player marker `🏃` stands on an empty cell. Without a marker, the
    /// player starts at the top left corner.
    ///
    /// Returns error if the rows do not form a square, if the grid contains
    /// unknown characters or several players, or if the player would stand
    /// on a wall.
    ///
    /// # Examples
    /// ```
    /// use key_maze::{Cell, Grid};
    ///
    /// let (grid, player) = Grid::parse_emojis("🏃🟫\n🔑🚪").unwrap();
    /// assert_eq!(grid.get(1, 0), Some(Cell::Wall));
    /// assert_eq!(grid.get(0, 0), Some(Cell::Empty));
    /// assert_eq!((player.x, player.y), (0, 0));
    /// ```
    pub fn parse_emojis(emojis: &str) -> anyhow::Result<(Self, Player)> {
        let rows: Vec<Vec<char>> = emojis
            .split('\n')
            .map(|row| row.trim().chars().collect())
            .collect();

        let size = rows.len();
        if let Some((y, row)) = rows.iter().find_position(|row| row.len() != size) {
            bail!(
                "Grid is not square: row {} has {} cells, expected {}",
                y,
                row.len(),
                size
            );
        }

        let mut player = None;
        let mut grid = Grid::new(size);
        for (y, row) in rows.iter().enumerate() {
            for (x, &c) in row.iter().enumerate() {
                if c == Self::S_PLAYER {
                    if player.is_some() {
                        bail!("Second player found at y={}, x={}", y, x);
                    }
                    player = Some(Player {
                        x,
                        y,
                        has_key: false,
                    });
                    continue;
                }
                let cell = Cell::from_symbol(c)
                    .ok_or_else(|| anyhow!("Unexpected character `{}` at y={}, x={}", c, y, x))?;
                grid.set(x, y, cell);
            }
        }

        let player = player.unwrap_or_default();
        if !grid.is_open(player.x, player.y) {
            bail!("Player cannot stand at y={}, x={}", player.y, player.x);
        }
        Ok((grid, player))
    }
}
