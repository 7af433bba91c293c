//! Opt-in legality checks, run before [`crate::apply::apply_parsed`].
//!
//! Covers board bounds, occupancy, stack control, lift height and blocking
//! pieces. Road wins, reserve counts and game end are not considered.

use crate::apply::{apply_parsed, path};
use crate::board::{GameState, PieceKind, Stack};
use crate::error::{TakError, ValidationError};
use crate::moves::Move;

/// Check that `mv` may legally be played from `state`.
pub fn check_move(state: &GameState, mv: &Move) -> Result<(), ValidationError> {
    let board = &state.board;
    let size = board.size();
    let opening = state.move_number == 1;

    match mv {
        Move::Placement { kind, square, .. } => {
            let target = board.get(*square).ok_or(ValidationError::OutOfBounds {
                square: square.to_string(),
                size,
            })?;
            if !target.is_empty() {
                return Err(ValidationError::Occupied(square.to_string()));
            }
            if opening && *kind != PieceKind::Flat {
                return Err(ValidationError::OpeningNotFlat);
            }
        }
        Move::Movement {
            count,
            square,
            direction,
            drops,
            ..
        } => {
            if opening {
                return Err(ValidationError::OpeningMovement);
            }
            let squares = path(board, *square, *direction, drops.len())?;
            let source: &Stack = board.get(*square).ok_or(ValidationError::OutOfBounds {
                square: square.to_string(),
                size,
            })?;
            let top = source
                .last()
                .ok_or_else(|| ValidationError::EmptySource(square.to_string()))?;
            if top.owner != state.active_color {
                return Err(ValidationError::NotController(square.to_string()));
            }
            if *count > source.len() {
                return Err(ValidationError::LiftTooTall {
                    count: *count,
                    height: source.len(),
                });
            }
            if *count > size {
                return Err(ValidationError::CarryLimit { count: *count, size });
            }

            // Only a lone capstone, dropped last, may flatten a standing stone.
            let crushes = top.is_capstone() && drops.last() == Some(&1);
            for (i, dest) in squares.iter().enumerate() {
                let Some(dest_top) = board.get(*dest).and_then(|stack| stack.last()) else {
                    continue;
                };
                if dest_top.is_capstone() {
                    return Err(ValidationError::BlockedByCapstone(dest.to_string()));
                }
                if dest_top.is_standing() && !(crushes && i + 1 == squares.len()) {
                    return Err(ValidationError::BlockedByStanding(dest.to_string()));
                }
            }
        }
    }

    Ok(())
}

/// Parse, check and apply a token. Unlike [`crate::apply::apply_move`] this
/// refuses illegal moves instead of playing them anyway.
pub fn apply_move_checked(state: &GameState, token: &str) -> Result<GameState, TakError> {
    let mv: Move = token.parse()?;
    check_move(state, &mv)?;
    Ok(apply_parsed(state, &mv)?)
}

/// Checked counterpart of [`crate::apply::apply_moves`].
pub fn apply_moves_checked<S: AsRef<str>>(
    state: &GameState,
    tokens: &[S],
) -> Result<GameState, TakError> {
    let mut current = state.clone();
    for token in tokens {
        current = apply_move_checked(&current, token.as_ref())?;
    }
    Ok(current)
}
