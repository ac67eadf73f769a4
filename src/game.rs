//! Game state and command execution

use crate::command::{Command, Direction};
use crate::maze_generator::MazeGenerator;
use crate::{Cell, Difficulty, Grid, Player};

/// Receives notifications after each change to the game
///
/// Handlers are called synchronously, in registration order. Every method
/// has an empty default, so observers only implement what they care about.
pub trait GameObserver {
    /// A cell changed, or a new grid was generated
    fn on_board_changed(&mut self, _grid: &Grid) {}
    /// The player moved or picked up the key
    fn on_player_changed(&mut self, _player: &Player) {}
    /// The door was unlocked. Fires before the next maze is published.
    fn on_win(&mut self) {}
}

/// Current maze, the player inside it, and everyone watching
pub struct Game {
    generator: MazeGenerator,
    grid: Grid,
    player: Player,
    observers: Vec<Box<dyn GameObserver>>,
    /// Number of doors unlocked so far
    wins: usize,
}

impl Game {
    /// Difficulty of the maze generated after a win
    pub const WIN_DIFFICULTY: Difficulty = Difficulty::Easy;

    /// Start a game on a fresh maze of the given difficulty
    pub fn new(difficulty: Difficulty, seed: Option<u64>) -> Self {
        let mut generator = MazeGenerator::new(seed);
        let (grid, player) = generator.generate(difficulty);
        Self::with_maze(grid, player, generator)
    }

    /// Start a game on an existing maze
    ///
    /// `generator` is used for the mazes that follow a win.
    pub fn with_maze(grid: Grid, player: Player, generator: MazeGenerator) -> Self {
        Self {
            generator,
            grid,
            player,
            observers: Vec::new(),
            wins: 0,
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn wins(&self) -> usize {
        self.wins
    }

    /// Register an observer for all following changes
    pub fn subscribe(&mut self, observer: Box<dyn GameObserver>) {
        self.observers.push(observer);
    }

    /// Replace the maze with a new one and reset the player
    ///
    /// Observers see the new grid first, then the new player.
    pub fn generate_maze(&mut self, difficulty: Difficulty) {
        let (grid, player) = self.generator.generate(difficulty);
        self.grid = grid;
        self.player = player;
        self.notify_board();
        self.notify_player();
    }

    /// Parse and execute a raw command line
    ///
    /// Unknown or malformed commands are ignored.
    pub fn execute_command(&mut self, raw: &str) {
        if let Some(command) = Command::parse(raw) {
            self.execute(&command);
        }
    }

    /// Execute a parsed command
    ///
    /// Each repetition of [Command::Repeat] is completed, notifications
    /// included, before the next one starts. A loop stops at the first
    /// repetition that leaves the game unchanged.
    pub fn execute(&mut self, command: &Command) {
        self.apply(command);
    }

    /// Execute a command, returning whether it changed anything
    fn apply(&mut self, command: &Command) -> bool {
        match command {
            Command::Move(direction) => self.move_player(*direction),
            Command::Pickup => self.pickup_key(),
            Command::Unlock => self.unlock_door(),
            Command::Repeat(count, inner) => {
                let mut changed = false;
                for _ in 0..*count {
                    if !self.apply(inner) {
                        break;
                    }
                    changed = true;
                }
                changed
            }
        }
    }

    /// Step into the neighbouring cell if it is inside the grid and not a wall
    fn move_player(&mut self, direction: Direction) -> bool {
        let (dx, dy) = direction.delta();
        let (Some(x), Some(y)) = (
            self.player.x.checked_add_signed(dx),
            self.player.y.checked_add_signed(dy),
        ) else {
            return false;
        };
        if !self.grid.is_open(x, y) {
            return false;
        }
        self.player.x = x;
        self.player.y = y;
        self.notify_player();
        true
    }

    fn pickup_key(&mut self) -> bool {
        let Player { x, y, .. } = self.player;
        if self.grid.get(x, y) != Some(Cell::Key) {
            return false;
        }
        self.player.has_key = true;
        self.grid.set(x, y, Cell::Empty);
        self.notify_board();
        self.notify_player();
        true
    }

    fn unlock_door(&mut self) -> bool {
        let Player { x, y, has_key } = self.player;
        if !has_key || self.grid.get(x, y) != Some(Cell::Door) {
            return false;
        }
        self.wins += 1;
        for observer in self.observers.iter_mut() {
            observer.on_win();
        }
        self.generate_maze(Self::WIN_DIFFICULTY);
        true
    }

    fn notify_board(&mut self) {
        let grid = &self.grid;
        for observer in self.observers.iter_mut() {
            observer.on_board_changed(grid);
        }
    }

    fn notify_player(&mut self) {
        let player = &self.player;
        for observer in self.observers.iter_mut() {
            observer.on_player_changed(player);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use crate::game::{Game, GameObserver};
    use crate::maze_generator::MazeGenerator;
    use crate::{Cell, Difficulty, Grid, Player};

    #[derive(Debug, PartialEq)]
    enum Event {
        Board,
        Player(usize, usize, bool),
        Win,
    }

    #[derive(Clone, Default)]
    struct Recorder {
        events: Rc<RefCell<Vec<Event>>>,
    }

    impl Recorder {
        fn take(&self) -> Vec<Event> {
            self.events.borrow_mut().drain(..).collect()
        }
    }

    impl GameObserver for Recorder {
        fn on_board_changed(&mut self, _grid: &Grid) {
            self.events.borrow_mut().push(Event::Board);
        }

        fn on_player_changed(&mut self, player: &Player) {
            self.events
                .borrow_mut()
                .push(Event::Player(player.x, player.y, player.has_key));
        }

        fn on_win(&mut self) {
            self.events.borrow_mut().push(Event::Win);
        }
    }

    fn game_from(emojis: &str) -> (Game, Recorder) {
        let (grid, player) = Grid::parse_emojis(emojis.trim()).unwrap();
        let mut game = Game::with_maze(grid, player, MazeGenerator::new(Some(0)));
        let recorder = Recorder::default();
        game.subscribe(Box::new(recorder.clone()));
        (game, recorder)
    }

    fn position(game: &Game) -> (usize, usize) {
        (game.player().x, game.player().y)
    }

    #[test]
    fn walk_to_key_and_door() {
        let (mut game, recorder) = game_from(
            "
🏃🔑🚪
🟩🟩🟩
🟩🟩🟩",
        );

        game.execute_command("right");
        game.execute_command("pickup");
        game.execute_command("right");
        assert_eq!(position(&game), (2, 0));
        assert!(game.player().has_key);
        assert_eq!(game.grid().get(1, 0), Some(Cell::Empty));

        game.execute_command("unlock");
        assert_eq!(game.wins(), 1);
        assert_eq!(
            recorder.take(),
            vec![
                Event::Player(1, 0, false),
                Event::Board,
                Event::Player(1, 0, true),
                Event::Player(2, 0, true),
                Event::Win,
                Event::Board,
                Event::Player(0, 0, false),
            ]
        );

        // Next maze is a fresh easy one
        assert_eq!(game.grid().size(), Difficulty::Easy.size());
        assert_eq!(*game.player(), Player::default());
        assert_eq!(game.grid().count(Cell::Key), 1);
    }

    #[test]
    fn blocked_moves_change_nothing() {
        let (mut game, recorder) = game_from(
            "
🏃🟫🔑
🟫🟩🚪
🟩🟩🟩",
        );
        for command in ["up", "left", "right", "down"] {
            game.execute_command(command);
        }
        assert_eq!(*game.player(), Player::default());
        assert!(recorder.take().is_empty());
    }

    #[test]
    fn loop_stops_at_obstruction() {
        let (mut game, recorder) = game_from(
            "
🏃🟩🟩🟫🟩
🟩🟩🟩🟩🟩
🟩🟩🔑🚪🟩
🟩🟩🟩🟩🟩
🟩🟩🟩🟩🟩",
        );
        game.execute_command("for 5 right");
        assert_eq!(position(&game), (2, 0));
        assert_eq!(
            recorder.take(),
            vec![Event::Player(1, 0, false), Event::Player(2, 0, false)]
        );

        game.execute_command("for 3 down");
        assert_eq!(position(&game), (2, 3));
        game.execute_command("for 9 down");
        assert_eq!(position(&game), (2, 4));
    }

    #[test]
    fn loop_moves_exactly_count_cells() {
        let (mut game, _) = game_from(
            "
🏃🟩🟩🟩🟩
🔑🚪🟩🟩🟩
🟩🟩🟩🟩🟩
🟩🟩🟩🟩🟩
🟩🟩🟩🟩🟩",
        );
        game.execute_command("for 3 right");
        assert_eq!(position(&game), (3, 0));
        game.execute_command("for 0 left");
        assert_eq!(position(&game), (3, 0));
    }

    #[test]
    fn huge_loop_count_ends_at_edge() {
        let (mut game, recorder) = game_from(
            "
🏃🟩🟩🟩
🟩🟩🟩🟩
🟩🟩🔑🟩
🟩🟩🟩🚪",
        );
        game.execute_command("for 4294967296 right");
        assert_eq!(position(&game), (3, 0));
        assert_eq!(recorder.take().len(), 3);

        game.execute_command("for 99999999999999999999999 down");
        assert_eq!(position(&game), (3, 3));
        assert_eq!(recorder.take().len(), 3);
    }

    #[test]
    fn pickup_twice() {
        let (mut game, recorder) = game_from(
            "
🟩🟩🟩
🟩🟩🟩
🟩🔑🚪",
        );
        game.execute_command("pickup");
        assert!(!game.player().has_key);
        assert!(recorder.take().is_empty());

        game.execute_command("for 2 down");
        game.execute_command("right");
        game.execute_command("pickup");
        assert!(game.player().has_key);
        recorder.take();

        game.execute_command("pickup");
        assert!(game.player().has_key);
        assert_eq!(game.grid().count(Cell::Key), 0);
        assert!(recorder.take().is_empty());
    }

    #[test]
    fn unlock_requires_key() {
        let (mut game, recorder) = game_from(
            "
🏃🚪🔑
🟩🟩🟩
🟩🟩🟩",
        );
        game.execute_command("right");
        game.execute_command("unlock");
        game.execute_command("for 4 unlock");
        assert_eq!(game.wins(), 0);
        assert_eq!(position(&game), (1, 0));
        assert!(!recorder.take().contains(&Event::Win));
    }

    #[test]
    fn unlock_needs_the_door() {
        let (mut game, _) = game_from(
            "
🏃🔑🟩
🟩🟩🟩
🟩🟩🚪",
        );
        game.execute_command("right");
        game.execute_command("pickup");
        game.execute_command("unlock");
        assert_eq!(game.wins(), 0);
        assert_eq!(position(&game), (1, 0));
    }

    #[test]
    fn unknown_commands_are_ignored() {
        let (mut game, recorder) = game_from(
            "
🏃🔑🚪
🟩🟩🟩
🟩🟩🟩",
        );
        let grid = game.grid().clone();
        for command in ["fly", "", "for x right", "right right", "for 3 jump"] {
            game.execute_command(command);
        }
        assert_eq!(*game.player(), Player::default());
        assert_eq!(*game.grid(), grid);
        assert!(recorder.take().is_empty());
    }

    #[test]
    fn generate_maze_publishes_grid_then_player() {
        let mut game = Game::new(Difficulty::Easy, Some(9));
        let recorder = Recorder::default();
        game.subscribe(Box::new(recorder.clone()));

        game.generate_maze(Difficulty::Hard);
        assert_eq!(game.grid().size(), 12);
        assert_eq!(
            recorder.take(),
            vec![Event::Board, Event::Player(0, 0, false)]
        );
    }
}
