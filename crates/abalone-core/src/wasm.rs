//! WebAssembly bindings for the Abalone engine.
//!
//! This module exposes the game engine to JavaScript through wasm-bindgen.
//! Structured values cross the boundary as JSON strings.

use wasm_bindgen::prelude::*;

use crate::actions::GameAction;
use crate::board::Color;
use crate::game::GameState;
use crate::hex::{Direction, Position};

/// Initialize panic hook for better error messages in browser console
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

fn parse_group(group_json: &str) -> Result<Vec<Position>, JsValue> {
    serde_json::from_str(group_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid group JSON: {}", e)))
}

fn parse_direction(direction: u8) -> Result<Direction, JsValue> {
    Direction::from_index(direction)
        .ok_or_else(|| JsValue::from_str(&format!("Invalid direction index: {}", direction)))
}

/// WASM-exposed game wrapper
#[wasm_bindgen]
pub struct WasmGame {
    state: GameState,
}

#[wasm_bindgen]
impl WasmGame {
    /// Create a standard game
    #[wasm_bindgen(constructor)]
    pub fn new() -> WasmGame {
        WasmGame {
            state: GameState::new(),
        }
    }

    /// Get the current game state as JSON
    #[wasm_bindgen(js_name = getState)]
    pub fn get_state(&self) -> String {
        serde_json::to_string(&self.state).unwrap_or_else(|_| "{}".to_string())
    }

    /// Get board state as JSON (for rendering)
    #[wasm_bindgen(js_name = getBoard)]
    pub fn get_board(&self) -> String {
        let board_json = self.state.board().to_json_friendly();
        serde_json::to_string(&board_json).unwrap_or_else(|_| "{}".to_string())
    }

    /// "black" or "white"
    #[wasm_bindgen(js_name = getCurrentPlayer)]
    pub fn get_current_player(&self) -> String {
        self.state.current_player().to_string()
    }

    /// Check a move without playing it.
    ///
    /// Returns `{"valid":true,"kind":...,"captured":...}` or
    /// `{"valid":false,"reason":"..."}`.
    #[wasm_bindgen(js_name = validateMove)]
    pub fn validate_move(&self, group_json: &str, direction: u8) -> Result<String, JsValue> {
        let group = parse_group(group_json)?;
        let direction = parse_direction(direction)?;

        let result = match self.state.validate(&group, direction) {
            Ok(legal) => serde_json::json!({
                "valid": true,
                "kind": legal.kind(),
                "captured": legal.capture(),
            }),
            Err(e) => serde_json::json!({
                "valid": false,
                "reason": e.to_string(),
            }),
        };
        Ok(result.to_string())
    }

    /// Play a move, returns events JSON or error
    pub fn play(&mut self, group_json: &str, direction: u8, timestamp: f64) -> Result<String, JsValue> {
        let group = parse_group(group_json)?;
        let direction = parse_direction(direction)?;
        let action = GameAction::Move { group, direction };

        match self.state.apply_action(&action, timestamp as u64) {
            Ok((next, events)) => {
                self.state = next;
                Ok(serde_json::to_string(&events).unwrap_or_else(|_| "[]".to_string()))
            }
            Err(e) => Err(JsValue::from_str(&format!("Move failed: {}", e))),
        }
    }

    /// End the game drawn by agreement
    #[wasm_bindgen(js_name = agreeDraw)]
    pub fn agree_draw(&mut self) -> Result<(), JsValue> {
        let next = self
            .state
            .agree_draw()
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        self.state = next;
        Ok(())
    }

    /// All legal moves for the side to move as a JSON array
    #[wasm_bindgen(js_name = legalMoves)]
    pub fn legal_moves(&self) -> String {
        let moves: Vec<_> = self
            .state
            .legal_moves()
            .iter()
            .map(|m| {
                serde_json::json!({
                    "group": m.group(),
                    "direction": m.direction().index(),
                    "kind": m.kind(),
                })
            })
            .collect();
        serde_json::to_string(&moves).unwrap_or_else(|_| "[]".to_string())
    }

    /// Check if the game is finished
    #[wasm_bindgen(js_name = isFinished)]
    pub fn is_finished(&self) -> bool {
        self.state.is_finished()
    }

    /// Get the winner ("black"/"white") if the game was won
    #[wasm_bindgen(js_name = getWinner)]
    pub fn get_winner(&self) -> Option<String> {
        self.state.winner().map(|c| c.to_string())
    }

    /// Pieces lost by a color ("black" or "white")
    #[wasm_bindgen(js_name = getCaptured)]
    pub fn get_captured(&self, color: &str) -> Result<u32, JsValue> {
        let color = match color {
            "black" => Color::Black,
            "white" => Color::White,
            other => return Err(JsValue::from_str(&format!("Unknown color: {}", other))),
        };
        Ok(self.state.captures().lost(color))
    }

    /// Start over with the same rules
    pub fn reset(&mut self) {
        self.state = self.state.reset();
    }
}

impl Default for WasmGame {
    fn default() -> Self {
        Self::new()
    }
}
