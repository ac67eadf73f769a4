//! CLI for maze generation

use clap::Parser;
use key_maze::{Difficulty, MazeGenerator};

/// Map generator for key-and-door mazes
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Maze difficulty: easy, medium or hard
    #[arg(short, long, default_value_t = Difficulty::Easy)]
    difficulty: Difficulty,

    /// Random seed
    #[arg(long)]
    seed: Option<u64>,
}

/// Generate maze, print it as emojis
fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut gen = MazeGenerator::new(args.seed);
    let (grid, player) = gen.generate(args.difficulty);
    println!("{}", grid.render(&player));
    Ok(())
}
