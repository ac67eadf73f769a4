//! CLI for playing mazes

use std::{
    fs::File,
    io::{self, BufRead, BufReader},
    path::PathBuf,
    thread,
    time::Duration,
};

use anyhow::Context;
use clap::Parser;
use key_maze::{CommandBuffer, Difficulty, Game, GameObserver, Grid, Player};

/// Find the key and unlock the door, one typed command at a time
///
/// Commands: up, down, left, right, pickup, unlock, and loops such as
/// `for 3 right`. One command per line.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Difficulty of the first maze: easy, medium or hard
    #[arg(short, long, default_value_t = Difficulty::Easy)]
    difficulty: Difficulty,

    /// Random seed
    #[arg(long)]
    seed: Option<u64>,

    /// Display the board after every move
    #[arg(short, long)]
    playback: bool,

    /// Playback frame length in milliseconds
    #[arg(short, long, default_value_t = 300)]
    frame_length: u64,

    /// File, where to read the commands. Use `-` or leave out for stdin.
    file: Option<PathBuf>,
}

/// Prints the board and wins on the terminal
struct TerminalView {
    grid: Grid,
    player: Player,
    playback: bool,
    frame: Duration,
}

impl TerminalView {
    fn draw(&self) {
        print!("\x1B[2J\x1B[1;1H");
        println!("{}", self.grid.render(&self.player));
        let key = if self.player.has_key { "🔑" } else { "" };
        println!("x={} y={} {}", self.player.x, self.player.y, key);
    }
}

impl GameObserver for TerminalView {
    fn on_board_changed(&mut self, grid: &Grid) {
        // Drawn together with the player update that always follows
        self.grid = grid.clone();
    }

    fn on_player_changed(&mut self, player: &Player) {
        self.player = *player;
        if self.playback {
            thread::sleep(self.frame);
            self.draw();
        }
    }

    fn on_win(&mut self) {
        println!("Congratulations! You completed the maze!");
        if self.playback {
            thread::sleep(self.frame * 3);
        }
    }
}

/// Read commands line by line, play them, print report
fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut game = Game::new(args.difficulty, args.seed);
    let view = TerminalView {
        grid: game.grid().clone(),
        player: *game.player(),
        playback: args.playback,
        frame: Duration::from_millis(args.frame_length),
    };
    if view.playback {
        view.draw();
    }
    game.subscribe(Box::new(view));

    let mut reader: Box<dyn BufRead> = match args.file {
        Some(path) if path.to_str() != Some("-") => Box::new(BufReader::new(
            File::open(&path).with_context(|| format!("Cannot open {}", path.display()))?,
        )),
        _ => Box::new(io::stdin().lock()),
    };

    let mut chunk = String::new();
    let mut buffer = CommandBuffer::new();
    while reader.read_line(&mut chunk)? > 0 {
        for command in buffer.push(&chunk) {
            game.execute_command(&command);
        }
        chunk.clear();
    }
    if let Some(command) = buffer.finish() {
        game.execute_command(&command);
    }

    if !args.playback {
        println!("{}", game.grid().render(game.player()));
    }
    let player = game.player();
    println!(
        "Player at x={}, y={}, {} the key. Doors unlocked: {}.",
        player.x,
        player.y,
        if player.has_key { "holding" } else { "without" },
        game.wins()
    );
    Ok(())
}
