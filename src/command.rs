//! Player commands and their text form
//!
//! Commands are case insensitive and surrounding whitespace is ignored.
//!
//! | Text            | Command                          |
//! |-----------------|----------------------------------|
//! | `up`, `down`    | [Command::Move]                  |
//! | `left`, `right` | [Command::Move]                  |
//! | `pickup`        | [Command::Pickup]                |
//! | `unlock`        | [Command::Unlock]                |
//! | `for 3 right`   | [Command::Repeat] of a primitive |

/// Direction of a single step
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Change in `(x, y)` caused by one step
    pub const fn delta(self) -> (isize, isize) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }
}

/// Parsed player command
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Take one step, unless a wall or the edge is in the way
    Move(Direction),
    /// Pick up the key from the current cell
    Pickup,
    /// Open the door on the current cell, if the key is at hand
    Unlock,
    /// Run the inner command the given number of times
    Repeat(u64, Box<Command>),
}

impl Command {
    /// Parse a raw command line
    ///
    /// Returns `None` for anything that is not a command. Callers treat
    /// that as doing nothing. The loop form is `for <count> <command>`, with
    /// single spaces, a decimal count and a primitive inner command. Counts
    /// too large for `u64` saturate to `u64::MAX`.
    ///
    /// # Examples
    /// ```
    /// use key_maze::{Command, Direction};
    ///
    /// assert_eq!(Command::parse("  UP "), Some(Command::Move(Direction::Up)));
    /// assert_eq!(
    ///     Command::parse("for 3 right"),
    ///     Some(Command::Repeat(3, Box::new(Command::Move(Direction::Right))))
    /// );
    /// assert_eq!(Command::parse("fly"), None);
    /// ```
    pub fn parse(raw: &str) -> Option<Self> {
        let command = raw.trim().to_lowercase();
        Self::parse_repeat(&command).or_else(|| Self::parse_primitive(&command))
    }

    fn parse_repeat(command: &str) -> Option<Self> {
        let (count, inner) = command.strip_prefix("for ")?.split_once(' ')?;
        if count.is_empty() || !count.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let count = count.parse().unwrap_or(u64::MAX);
        let inner = Self::parse_primitive(inner)?;
        Some(Command::Repeat(count, Box::new(inner)))
    }

    fn parse_primitive(command: &str) -> Option<Self> {
        let command = match command {
            "up" => Command::Move(Direction::Up),
            "down" => Command::Move(Direction::Down),
            "left" => Command::Move(Direction::Left),
            "right" => Command::Move(Direction::Right),
            "pickup" => Command::Pickup,
            "unlock" => Command::Unlock,
            _ => return None,
        };
        Some(command)
    }
}
