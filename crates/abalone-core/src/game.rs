//! Core game state machine.
//!
//! `GameState` is an immutable snapshot. Every accepted move produces a new
//! snapshot; the old one stays valid, which makes replay and concurrent
//! readers trivial. Turn flow:
//!
//! ```text
//! group + direction ──validate──> LegalMove ──execute──> Execution ──apply_turn──> GameState
//! ```

use crate::actions::{GameAction, GameEvent};
use crate::board::{Board, Color, Piece, PIECES_PER_COLOR};
use crate::config::{ConfigError, GameConfig};
use crate::execute::{self, Execution};
use crate::hex::{Direction, Position};
use crate::line::MoveKind;
use crate::movegen;
use crate::rules::{self, IllegalMove, LegalMove};
use im::Vector;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

/// Game status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    /// Moves are accepted
    InProgress,
    /// Game is over; the opponent lost `captures_to_win` pieces
    Won { winner: Color },
    /// Game is over by agreement
    Drawn,
}

impl GameStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, GameStatus::InProgress)
    }
}

/// Errors that can occur when applying actions
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("Game is over")]
    GameOver,

    #[error("Move was validated against a different position")]
    StaleMove,

    #[error(transparent)]
    Illegal(#[from] IllegalMove),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Reasons a stored snapshot cannot be loaded
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SnapshotError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Board radius {board} does not match configured radius {config}")]
    RadiusMismatch { board: i32, config: i32 },

    #[error("{color} cannot have lost {lost} pieces with {on_board} still on the board")]
    TooManyLosses { color: Color, lost: u32, on_board: usize },

    #[error("Status {status:?} does not match the losses {captures:?}")]
    StatusMismatch { status: GameStatus, captures: Captures },
}

/// Pieces lost by each color
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Captures {
    pub black: u32,
    pub white: u32,
}

impl Captures {
    /// Pieces `color` has lost
    pub fn lost(&self, color: Color) -> u32 {
        match color {
            Color::Black => self.black,
            Color::White => self.white,
        }
    }

    fn record_loss(&mut self, color: Color) -> u32 {
        let counter = match color {
            Color::Black => &mut self.black,
            Color::White => &mut self.white,
        };
        *counter += 1;
        *counter
    }
}

/// One executed move in the game history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRecord {
    /// Who moved
    pub player: Color,
    /// Selected cells in line order
    pub group: Vec<Position>,
    pub direction: Direction,
    pub kind: MoveKind,
    /// Caller-supplied time of the move (milliseconds since the Unix epoch)
    pub timestamp: u64,
    /// Piece pushed off the board, as it stood before the push
    pub captured: Option<Piece>,
}

/// The complete game state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "GameStateJson")]
pub struct GameState {
    /// Active pieces
    board: Board,
    /// Whose turn it is
    current_player: Color,
    /// Pieces lost per color
    captures: Captures,
    /// Every executed move, oldest first
    history: Vector<MoveRecord>,
    status: GameStatus,
    config: GameConfig,
}

impl GameState {
    /// Create a standard game; Black moves first
    pub fn new() -> Self {
        Self::start(GameConfig::standard())
    }

    /// Create a game with custom rule parameters
    pub fn with_config(config: GameConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::start(config))
    }

    fn start(config: GameConfig) -> Self {
        Self {
            board: Board::standard_with_radius(config.board_radius),
            current_player: Color::Black,
            captures: Captures::default(),
            history: Vector::new(),
            status: GameStatus::InProgress,
            config,
        }
    }

    /// Start from an arbitrary position (puzzles, tests, resumed games).
    ///
    /// Uses standard rules on the board's own radius.
    pub fn from_position(board: Board, current_player: Color) -> Self {
        Self {
            config: GameConfig {
                board_radius: board.radius(),
                ..GameConfig::standard()
            },
            board,
            current_player,
            captures: Captures::default(),
            history: Vector::new(),
            status: GameStatus::InProgress,
        }
    }

    /// A fresh game with the same rule parameters
    pub fn reset(&self) -> Self {
        Self::start(self.config)
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Color whose turn it is
    pub fn current_player(&self) -> Color {
        self.current_player
    }

    pub fn captures(&self) -> Captures {
        self.captures
    }

    pub fn history(&self) -> &Vector<MoveRecord> {
        &self.history
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Check if the game is finished
    pub fn is_finished(&self) -> bool {
        self.status.is_terminal()
    }

    /// Get the winner if the game was won
    pub fn winner(&self) -> Option<Color> {
        match self.status {
            GameStatus::Won { winner } => Some(winner),
            _ => None,
        }
    }

    fn ensure_in_progress(&self) -> Result<(), GameError> {
        if self.is_finished() {
            return Err(GameError::GameOver);
        }
        Ok(())
    }

    /// Validate a move for the side to move
    pub fn validate(&self, group: &[Position], direction: Direction) -> Result<LegalMove, GameError> {
        self.ensure_in_progress()?;
        Ok(rules::validate(group, direction, &self.board, self.current_player)?)
    }

    /// Execute a move previously validated against this snapshot
    pub fn execute(&self, legal: &LegalMove) -> Result<Execution, GameError> {
        self.ensure_in_progress()?;
        if legal.mover() != self.current_player {
            return Err(GameError::StaleMove);
        }
        execute::execute(&self.board, legal)
    }

    /// Produce the next snapshot from an execution of a move on this one.
    ///
    /// Records the loss if a piece was captured, ends the game when a color
    /// has lost `captures_to_win` pieces, and otherwise passes the turn.
    pub fn apply_turn(&self, execution: Execution, timestamp: u64) -> Result<GameState, GameError> {
        self.ensure_in_progress()?;
        let stale = execution.legal.mover() != self.current_player
            || execution
                .moves
                .iter()
                .any(|m| self.board.get(m.piece).map(|p| p.position) != Some(m.from))
            || !capture_matches_moves(&execution)
            || execution.board.len() + usize::from(execution.captured.is_some()) != self.board.len();
        if stale {
            return Err(GameError::StaleMove);
        }

        let mut next = self.clone();
        if let Some(piece) = execution.captured {
            let lost = next.captures.record_loss(piece.color);
            info!(color = %piece.color, lost, "piece captured");
            if lost >= self.config.captures_to_win {
                let winner = piece.color.opponent();
                info!(%winner, "game won");
                next.status = GameStatus::Won { winner };
            }
        }
        if !next.is_finished() {
            next.current_player = self.current_player.opponent();
        }

        next.history.push_back(MoveRecord {
            player: self.current_player,
            group: execution.legal.group().to_vec(),
            direction: execution.legal.direction(),
            kind: execution.legal.kind(),
            timestamp,
            captured: execution.captured,
        });
        next.board = execution.board;
        Ok(next)
    }

    /// Validate, execute and apply a move in one step
    pub fn play(
        &self,
        group: &[Position],
        direction: Direction,
        timestamp: u64,
    ) -> Result<(GameState, Vec<GameEvent>), GameError> {
        let legal = self.validate(group, direction)?;
        let execution = self.execute(&legal)?;

        let mut events: Vec<GameEvent> = execution
            .moves
            .iter()
            .map(|m| match m.to {
                Some(to) => GameEvent::PieceMoved {
                    piece: m.piece,
                    color: m.color,
                    from: m.from,
                    to,
                },
                None => GameEvent::PieceCaptured {
                    piece: m.piece,
                    color: m.color,
                    from: m.from,
                    lost: self.captures.lost(m.color) + 1,
                },
            })
            .collect();

        let next = self.apply_turn(execution, timestamp)?;
        match next.status {
            GameStatus::Won { winner } => events.push(GameEvent::GameWon {
                winner,
                captures: next.captures.lost(winner.opponent()),
            }),
            _ => events.push(GameEvent::TurnEnded {
                player: self.current_player,
                next_player: next.current_player,
            }),
        }
        Ok((next, events))
    }

    /// End the game drawn by mutual agreement
    pub fn agree_draw(&self) -> Result<GameState, GameError> {
        self.ensure_in_progress()?;
        info!("game drawn by agreement");
        Ok(Self {
            status: GameStatus::Drawn,
            ..self.clone()
        })
    }

    /// Apply an action to the game state
    pub fn apply_action(
        &self,
        action: &GameAction,
        timestamp: u64,
    ) -> Result<(GameState, Vec<GameEvent>), GameError> {
        match action {
            GameAction::Move { group, direction } => self.play(group, *direction, timestamp),
            GameAction::AgreeDraw => Ok((self.agree_draw()?, vec![GameEvent::GameDrawn])),
        }
    }

    /// Every legal move for the side to move
    pub fn legal_moves(&self) -> Vec<LegalMove> {
        movegen::legal_moves(self)
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

/// The captured piece, if any, is exactly the one move that left the board
fn capture_matches_moves(execution: &Execution) -> bool {
    let fallen: Vec<_> = execution.moves.iter().filter(|m| m.to.is_none()).collect();
    match (&execution.captured, fallen.as_slice()) {
        (None, []) => true,
        (Some(piece), [m]) => piece.id == m.piece && piece.position == m.from,
        _ => false,
    }
}

/// Serialized form of [`GameState`], checked on the way back in
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameStateJson {
    pub board: Board,
    pub current_player: Color,
    pub captures: Captures,
    pub history: Vector<MoveRecord>,
    pub status: GameStatus,
    pub config: GameConfig,
}

impl TryFrom<GameStateJson> for GameState {
    type Error = SnapshotError;

    fn try_from(json: GameStateJson) -> Result<Self, Self::Error> {
        json.config.validate()?;
        if json.board.radius() != json.config.board_radius {
            return Err(SnapshotError::RadiusMismatch {
                board: json.board.radius(),
                config: json.config.board_radius,
            });
        }

        for color in Color::ALL {
            let lost = json.captures.lost(color);
            let on_board = json.board.count(color);
            if lost as usize + on_board > PIECES_PER_COLOR {
                return Err(SnapshotError::TooManyLosses { color, lost, on_board });
            }
        }

        let threshold = json.config.captures_to_win;
        let decided = |color: Color| json.captures.lost(color.opponent()) >= threshold;
        let consistent = match json.status {
            GameStatus::InProgress | GameStatus::Drawn => !Color::ALL.into_iter().any(decided),
            GameStatus::Won { winner } => decided(winner) && !decided(winner.opponent()),
        };
        if !consistent {
            return Err(SnapshotError::StatusMismatch {
                status: json.status,
                captures: json.captures,
            });
        }

        Ok(Self {
            board: json.board,
            current_player: json.current_player,
            captures: json.captures,
            history: json.history,
            status: json.status,
            config: json.config,
        })
    }
}
