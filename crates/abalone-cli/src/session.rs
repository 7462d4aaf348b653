//! Hot-seat game session: the piece selection and text rendering the engine
//! leaves to its host.

use abalone_core::{
    Color, ConfigError, Direction, GameAction, GameConfig, GameError, GameEvent, GameState,
    GameStatus, MoveKind, Position, MAX_GROUP_SIZE,
};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::command::{Command, HELP};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("No {0} piece at {1}")]
    NotYourPiece(Color, Position),

    #[error("Game is over (type 'new' to start again)")]
    GameOver,

    #[error("Nothing to do for '{0}' here")]
    Unsupported(&'static str),

    #[error(transparent)]
    Game(#[from] GameError),

    #[error("Could not encode state: {0}")]
    Encode(String),
}

/// Up to three cells picked by the player to move.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Selection {
    cells: Vec<Position>,
}

impl Selection {
    /// Add or remove a cell. A cell added to a full selection starts a new one.
    pub fn toggle(&mut self, pos: Position) {
        if let Some(index) = self.cells.iter().position(|&c| c == pos) {
            self.cells.remove(index);
        } else if self.cells.len() < MAX_GROUP_SIZE {
            self.cells.push(pos);
        } else {
            self.cells = vec![pos];
        }
    }

    pub fn clear(&mut self) {
        self.cells.clear();
    }

    pub fn cells(&self) -> &[Position] {
        &self.cells
    }

    pub fn contains(&self, pos: Position) -> bool {
        self.cells.contains(&pos)
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

#[derive(Serialize)]
struct SessionView<'a> {
    game: &'a GameState,
    selection: &'a Selection,
}

/// A game being played at one terminal.
pub struct Session {
    game: GameState,
    selection: Selection,
}

impl Session {
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            game: GameState::with_config(config)?,
            selection: Selection::default(),
        })
    }

    pub fn game(&self) -> &GameState {
        &self.game
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Toggle a cell in the selection.
    ///
    /// Picking anything but one of the current player's pieces drops the
    /// whole selection.
    pub fn select(&mut self, pos: Position) -> Result<(), SessionError> {
        if self.game.is_finished() {
            return Err(SessionError::GameOver);
        }
        let player = self.game.current_player();
        if self.game.board().color_at(pos) != Some(player) {
            self.selection.clear();
            return Err(SessionError::NotYourPiece(player, pos));
        }
        self.selection.toggle(pos);
        Ok(())
    }

    /// Play the given cells, or the selection when `group` is empty.
    /// The selection is cleared once the move is accepted.
    pub fn play(
        &mut self,
        direction: Direction,
        group: &[Position],
        timestamp: u64,
    ) -> Result<Vec<GameEvent>, SessionError> {
        let group = if group.is_empty() {
            self.selection.cells().to_vec()
        } else {
            group.to_vec()
        };
        let action = GameAction::Move { group, direction };
        let (next, events) = self.game.apply_action(&action, timestamp)?;
        self.game = next;
        self.selection.clear();
        Ok(events)
    }

    pub fn agree_draw(&mut self, timestamp: u64) -> Result<Vec<GameEvent>, SessionError> {
        let (next, events) = self.game.apply_action(&GameAction::AgreeDraw, timestamp)?;
        self.game = next;
        self.selection.clear();
        Ok(events)
    }

    /// Start over with the same rules
    pub fn restart(&mut self) {
        self.game = self.game.reset();
        self.selection.clear();
        info!("new game started");
    }

    /// Run one command and return the text to show. `Quit` is left to the caller.
    pub fn handle(&mut self, command: &Command, timestamp: u64) -> Result<String, SessionError> {
        debug!(?command, "handling command");
        match command {
            Command::Select(pos) => {
                self.select(*pos)?;
                Ok(self.render())
            }
            Command::Clear => {
                self.selection.clear();
                Ok(self.render())
            }
            Command::Move { direction, group } => {
                let events = self.play(*direction, group, timestamp)?;
                let mut lines: Vec<String> = events.iter().map(describe).collect();
                lines.push(self.render());
                Ok(lines.join("\n"))
            }
            Command::Board => Ok(self.render()),
            Command::Moves => Ok(self.list_moves()),
            Command::State => {
                let view = SessionView {
                    game: &self.game,
                    selection: &self.selection,
                };
                serde_json::to_string_pretty(&view).map_err(|e| SessionError::Encode(e.to_string()))
            }
            Command::Draw => {
                let events = self.agree_draw(timestamp)?;
                Ok(events.iter().map(describe).collect::<Vec<_>>().join("\n"))
            }
            Command::New => {
                self.restart();
                Ok(self.render())
            }
            Command::Help => Ok(HELP.to_string()),
            Command::Quit => Err(SessionError::Unsupported("quit")),
        }
    }

    fn list_moves(&self) -> String {
        let moves = self.game.legal_moves();
        let mut lines = vec![format!("{} legal moves for {}", moves.len(), self.game.current_player())];
        for mv in &moves {
            let cells: Vec<String> = mv.group().iter().map(|p| format!("{},{}", p.q, p.r)).collect();
            let kind = match mv.kind() {
                MoveKind::Inline => "inline",
                MoveKind::Broadside => "broadside",
            };
            let mut line = format!("  move {} {} ({})", mv.direction(), cells.join(" "), kind);
            if let Some(piece) = mv.capture() {
                line.push_str(&format!(" captures {}", piece.position));
            }
            lines.push(line);
        }
        lines.join("\n")
    }

    /// The board as hex rows, north at the top.
    ///
    /// `B`/`W` mark pieces, lowercase marks a selected piece and `.` an empty
    /// cell. Each row is indented so the cells line up as a hexagon.
    pub fn render(&self) -> String {
        let board = self.game.board();
        let extent = board.radius() - 1;
        let mut out = String::new();

        for r in -extent..=extent {
            out.push_str(&format!("{:>3} ", r));
            out.push_str(&" ".repeat(r.unsigned_abs() as usize));
            let row: Vec<String> = (-extent..=extent)
                .map(|q| Position::new(q, r))
                .filter(|&p| board.is_on_board(p))
                .map(|p| {
                    let symbol = board.color_at(p).map_or('.', |c| c.symbol());
                    let symbol = if self.selection.contains(p) {
                        symbol.to_ascii_lowercase()
                    } else {
                        symbol
                    };
                    symbol.to_string()
                })
                .collect();
            out.push_str(&row.join(" "));
            out.push('\n');
        }

        let captures = self.game.captures();
        out.push_str(&format!(
            "lost: black {} white {} | ",
            captures.black, captures.white
        ));
        out.push_str(&match self.game.status() {
            GameStatus::InProgress => format!("{} to move", self.game.current_player()),
            GameStatus::Won { winner } => format!("{} wins", winner),
            GameStatus::Drawn => "drawn".to_string(),
        });
        out
    }
}

/// One line of text for an engine event
pub fn describe(event: &GameEvent) -> String {
    match event {
        GameEvent::PieceMoved { color, from, to, .. } => format!("{} {} -> {}", color, from, to),
        GameEvent::PieceCaptured { color, from, lost, .. } => {
            format!("{} piece at {} pushed off ({} lost)", color, from, lost)
        }
        GameEvent::TurnEnded { next_player, .. } => format!("{} to move", next_player),
        GameEvent::GameWon { winner, captures } => {
            format!("{} wins after pushing off {} pieces", winner, captures)
        }
        GameEvent::GameDrawn => "game drawn by agreement".to_string(),
    }
}
