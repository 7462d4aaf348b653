//! Text commands read from the terminal.

use abalone_core::{Direction, ParseError, Position};
use std::str::FromStr;
use thiserror::Error;

pub const HELP: &str = "\
Commands:
  select q,r              toggle one of your pieces (up to 3)
  clear                   drop the current selection
  move <dir> [q,r ...]    move the selection (or the listed cells)
                          dir: e ne nw w sw se, or 0-5
  board                   show the board
  moves                   list every legal move
  state                   print the game as JSON
  draw                    end the game drawn by agreement
  new                     start a new game
  help                    show this text
  quit                    leave";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("Empty command")]
    Empty,

    #[error("Unknown command '{0}' (type 'help')")]
    Unknown(String),

    #[error("'{0}' needs {1}")]
    MissingArgument(&'static str, &'static str),

    #[error("'{0}' takes no arguments")]
    UnexpectedArgument(&'static str),

    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// One line of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Select(Position),
    Clear,
    /// Move the listed cells, or the current selection when none are given
    Move {
        direction: Direction,
        group: Vec<Position>,
    },
    Board,
    Moves,
    State,
    Draw,
    New,
    Help,
    Quit,
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut words = s.split_whitespace();
        let head = words.next().ok_or(CommandError::Empty)?.to_ascii_lowercase();
        let rest: Vec<&str> = words.collect();

        let bare = |name: &'static str, command: Command| {
            if rest.is_empty() {
                Ok(command)
            } else {
                Err(CommandError::UnexpectedArgument(name))
            }
        };

        match head.as_str() {
            "select" | "s" => match rest.as_slice() {
                [cell] => Ok(Command::Select(cell.parse::<Position>()?)),
                [] => Err(CommandError::MissingArgument("select", "a cell")),
                _ => Err(CommandError::UnexpectedArgument("select")),
            },
            "move" | "m" => {
                let (dir, cells) = rest
                    .split_first()
                    .ok_or(CommandError::MissingArgument("move", "a direction"))?;
                let direction: Direction = dir.parse()?;
                let group = cells
                    .iter()
                    .map(|c| c.parse::<Position>())
                    .collect::<Result<Vec<Position>, _>>()?;
                Ok(Command::Move { direction, group })
            }
            "clear" => bare("clear", Command::Clear),
            "board" | "b" => bare("board", Command::Board),
            "moves" => bare("moves", Command::Moves),
            "state" => bare("state", Command::State),
            "draw" => bare("draw", Command::Draw),
            "new" => bare("new", Command::New),
            "help" | "?" => bare("help", Command::Help),
            "quit" | "exit" | "q" => bare("quit", Command::Quit),
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }
}
