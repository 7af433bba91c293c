use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::apply::{apply_move, apply_moves};
use crate::board::GameState;
use crate::error::TakError;

/// One half-move of a game record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ply {
    pub move_number: u32,
    pub half: u8, // 1 = first player's half, 2 = second's
    pub token: String,
    pub comment: Option<String>,
}

/// A game extracted from a PTN document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PtnGame {
    pub tags: BTreeMap<String, String>,
    pub initial_state: GameState,
    pub plies: Vec<Ply>,
    pub result: Option<String>, // "R-0", "0-F", "1/2-1/2", ...
}

impl PtnGame {
    pub fn tokens(&self) -> Vec<&str> {
        self.plies.iter().map(|p| p.token.as_str()).collect()
    }

    pub fn ply(&self, move_number: u32, half: u8) -> Option<&Ply> {
        self.plies
            .iter()
            .find(|p| p.move_number == move_number && p.half == half)
    }

    /// Position after every ply has been played.
    pub fn final_state(&self) -> Result<GameState, TakError> {
        apply_moves(&self.initial_state, &self.tokens())
    }

    /// The initial position followed by the position after each ply.
    pub fn states(&self) -> Result<Vec<GameState>, TakError> {
        let mut states = Vec::with_capacity(self.plies.len() + 1);
        let mut current = self.initial_state.clone();
        for ply in &self.plies {
            let next = apply_move(&current, &ply.token)?;
            states.push(std::mem::replace(&mut current, next));
        }
        states.push(current);
        Ok(states)
    }
}
