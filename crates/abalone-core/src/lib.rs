//! Abalone rule engine.
//!
//! This crate decides whether a proposed move is legal and, if so, computes the
//! resulting position, including any piece pushed off the board:
//! - Hex coordinate system for the 61-cell board
//! - Straight-line group detection and in-line/broadside classification
//! - Sumito push resolution and capture
//! - Immutable game snapshots with turn, score and history tracking
//!
//! # Architecture
//!
//! The engine is synchronous and free of I/O. Validation and execution are pure
//! functions of a snapshot and a proposed move; each accepted move yields a new
//! `GameState` value. It can be compiled to:
//! - Native Rust for terminal or server hosts
//! - WebAssembly for a browser front end (feature `wasm`)
//!
//! # Modules
//!
//! - [`hex`]: Cube coordinates, directions and the on-board predicate
//! - [`board`]: Pieces and the persistent piece/position index
//! - [`line`]: Line detection and move classification
//! - [`rules`]: Move validation (ownership, sumito, broadside)
//! - [`execute`]: Move execution and capture
//! - [`game`]: Game state machine

pub mod actions;
pub mod board;
pub mod config;
pub mod execute;
pub mod game;
pub mod hex;
pub mod line;
pub mod movegen;
pub mod rules;
#[cfg(feature = "wasm")]
pub mod wasm;

// Re-export commonly used types
pub use actions::{GameAction, GameEvent};
pub use board::{Board, BoardError, BoardJson, Color, Piece, PieceId};
pub use config::{ConfigError, GameConfig};
pub use execute::{execute, Execution, PieceMove};
pub use game::{Captures, GameError, GameState, GameStateJson, GameStatus, MoveRecord, SnapshotError};
pub use hex::{board_positions, Direction, ParseError, Position, BOARD_RADIUS};
pub use line::{Line, MoveKind, MAX_GROUP_SIZE};
pub use rules::{validate, IllegalMove, LegalMove};
