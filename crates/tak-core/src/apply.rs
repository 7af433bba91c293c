//! Move application: turns one move token and a game state into the next
//! game state.
//!
//! This layer is permissive. It trusts the caller on occupancy, stack height
//! and blocking pieces (use [`crate::validate`] to check those first); only
//! squares outside the board are rejected, since they cannot be represented.

use tracing::{trace, warn};

use crate::board::{Board, GameState, Piece, Stack};
use crate::error::{TakError, ValidationError};
use crate::moves::{Direction, Move};
use crate::square::Square;

/// Apply a single PTN move token, returning a brand-new state.
pub fn apply_move(state: &GameState, token: &str) -> Result<GameState, TakError> {
    let mv: Move = token.parse()?;
    Ok(apply_parsed(state, &mv)?)
}

/// Fold a sequence of tokens over `state`, stopping at the first error.
pub fn apply_moves<S: AsRef<str>>(state: &GameState, tokens: &[S]) -> Result<GameState, TakError> {
    let mut current = state.clone();
    for token in tokens {
        current = apply_move(&current, token.as_ref())?;
    }
    Ok(current)
}

/// Apply an already tokenized move.
pub fn apply_parsed(state: &GameState, mv: &Move) -> Result<GameState, ValidationError> {
    let mut next = state.clone();

    match mv {
        Move::Placement { kind, square, .. } => {
            let piece = Piece::new(state.placement_color(), *kind);
            let target = stack_mut(&mut next.board, *square)?;
            *target = vec![piece];
        }
        Move::Movement {
            count,
            square,
            direction,
            drops,
            ..
        } => {
            let path = path(&state.board, *square, *direction, drops.len())?;
            let carried = lift(&mut next.board, *square, *count)?;
            spread(&mut next.board, &path, carried, drops)?;
        }
    }

    trace!(
        ply = %mv,
        color = %state.active_color,
        move_number = state.move_number,
        "applied move"
    );

    next.advance_turn()?;
    Ok(next)
}

fn stack_mut(board: &mut Board, square: Square) -> Result<&mut Stack, ValidationError> {
    let size = board.size();
    board.get_mut(square).ok_or(ValidationError::OutOfBounds {
        square: square.to_string(),
        size,
    })
}

/// The `steps` squares visited after leaving `from` in `direction`, checked
/// against the board edges.
pub(crate) fn path(
    board: &Board,
    from: Square,
    direction: Direction,
    steps: usize,
) -> Result<Vec<Square>, ValidationError> {
    let size = board.size();
    if !board.contains(from) {
        return Err(ValidationError::OutOfBounds {
            square: from.to_string(),
            size,
        });
    }

    let mut squares = Vec::with_capacity(steps);
    let mut current = from;
    for _ in 0..steps {
        current = match current.offset(direction.delta()) {
            Some(next) if board.contains(next) => next,
            Some(next) => {
                return Err(ValidationError::OutOfBounds {
                    square: next.to_string(),
                    size,
                })
            }
            None => {
                return Err(ValidationError::OutOfBounds {
                    square: format!("{current}{}", direction.symbol()),
                    size,
                })
            }
        };
        squares.push(current);
    }
    Ok(squares)
}

/// Remove the top `count` pieces from the stack on `square`, keeping their
/// bottom-to-top order. A count taller than the stack lifts the whole stack.
fn lift(board: &mut Board, square: Square, count: usize) -> Result<Vec<Piece>, ValidationError> {
    let stack = stack_mut(board, square)?;
    if count > stack.len() {
        warn!(%square, count, height = stack.len(), "lift count exceeds stack height");
    }
    let keep = stack.len().saturating_sub(count);
    Ok(stack.split_off(keep))
}

/// Drop the carried pieces along `path`, `drops[i]` of them on `path[i]`.
/// A capstone landing first on a standing stone flattens it.
fn spread(
    board: &mut Board,
    path: &[Square],
    mut carried: Vec<Piece>,
    drops: &[usize],
) -> Result<(), ValidationError> {
    for (&square, &drop) in path.iter().zip(drops) {
        let take = drop.min(carried.len());
        let batch: Vec<Piece> = carried.drain(..take).collect();

        let stack = stack_mut(board, square)?;
        if let (Some(top), Some(first)) = (stack.last_mut(), batch.first()) {
            if top.is_standing() && first.is_capstone() {
                *top = Piece::flat(top.owner);
            }
        }
        stack.extend(batch);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{initial_state, Color, PieceKind};
    use crate::error::ParseError;
    use crate::tps::{decode, encode};

    fn at<'a>(state: &'a GameState, label: &str) -> &'a Stack {
        state.board.square_at(label).unwrap().unwrap()
    }

    #[test]
    fn test_first_move_swaps_colors() {
        let state = apply_move(&initial_state(5), "a1").unwrap();
        assert_eq!(at(&state, "a1"), &vec![Piece::flat(Color::Second)]);
        assert_eq!(state.active_color, Color::Second);
        assert_eq!(state.move_number, 1);

        let state = apply_move(&state, "e5").unwrap();
        assert_eq!(at(&state, "e5"), &vec![Piece::flat(Color::First)]);
        assert_eq!(state.active_color, Color::First);
        assert_eq!(state.move_number, 2);

        let state = apply_move(&state, "c3").unwrap();
        assert_eq!(at(&state, "c3"), &vec![Piece::flat(Color::First)]);
        assert_eq!(state.active_color, Color::Second);
    }

    #[test]
    fn test_placement_kinds() {
        let state = decode(r#"[TPS "x3/x3/x3 2 2"]"#).unwrap();
        let state = apply_move(&state, "Sb2").unwrap();
        assert_eq!(
            at(&state, "b2"),
            &vec![Piece::new(Color::Second, PieceKind::Standing)]
        );
        let state = apply_move(&state, "Cc3").unwrap();
        assert_eq!(
            at(&state, "c3"),
            &vec![Piece::new(Color::First, PieceKind::Capstone)]
        );
        assert_eq!(state.move_number, 3);
    }

    #[test]
    fn test_capstone_flattens_standing() {
        let state = decode(r#"[TPS "1,2,x2/x4/x4/1C,2S,x2 1 3"]"#).unwrap();
        let next = apply_move(&state, "a1>").unwrap();
        assert_eq!(
            at(&next, "b1"),
            &vec![
                Piece::flat(Color::Second),
                Piece::new(Color::First, PieceKind::Capstone)
            ]
        );
        assert!(at(&next, "a1").is_empty());
    }

    #[test]
    fn test_capstone_flattens_at_end_of_spread() {
        let state = decode(r#"[TPS "x3/x3/11C,x,2S 1 4"]"#).unwrap();
        let next = apply_move(&state, "2a1>11").unwrap();
        assert!(at(&next, "a1").is_empty());
        assert_eq!(at(&next, "b1"), &vec![Piece::flat(Color::First)]);
        assert_eq!(
            at(&next, "c1"),
            &vec![
                Piece::flat(Color::Second),
                Piece::new(Color::First, PieceKind::Capstone)
            ]
        );
        assert_eq!(next.board.piece_count(), state.board.piece_count());
    }

    #[test]
    fn test_flat_does_not_flatten_standing() {
        let state = decode(r#"[TPS "x3/x3/1,2S,x 1 3"]"#).unwrap();
        let next = apply_move(&state, "a1>").unwrap();
        assert_eq!(
            at(&next, "b1"),
            &vec![
                Piece::new(Color::Second, PieceKind::Standing),
                Piece::flat(Color::First)
            ]
        );
    }

    #[test]
    fn test_spread_preserves_order_and_count() {
        let state = decode(r#"[TPS "x4/x4/x4/1212,x3 1 5"]"#).unwrap();
        let next = apply_move(&state, "4a1>121").unwrap();
        assert_eq!(next.board.piece_count(), state.board.piece_count());
        assert!(at(&next, "a1").is_empty());
        assert_eq!(at(&next, "b1"), &vec![Piece::flat(Color::First)]);
        assert_eq!(
            at(&next, "c1"),
            &vec![Piece::flat(Color::Second), Piece::flat(Color::First)]
        );
        assert_eq!(at(&next, "d1"), &vec![Piece::flat(Color::Second)]);
    }

    #[test]
    fn test_partial_lift_leaves_remainder() {
        let state = decode(r#"[TPS "x3/x3/2121,x2 1 5"]"#).unwrap();
        let next = apply_move(&state, "2a1+").unwrap();
        assert_eq!(
            at(&next, "a1"),
            &vec![Piece::flat(Color::Second), Piece::flat(Color::First)]
        );
        assert_eq!(
            at(&next, "a2"),
            &vec![Piece::flat(Color::Second), Piece::flat(Color::First)]
        );
    }

    #[test]
    fn test_input_state_is_untouched() {
        let state = decode(r#"[TPS "x3/x3/21,x2 2 4"]"#).unwrap();
        let before = encode(&state);
        let next = apply_move(&state, "2a1>").unwrap();
        assert_eq!(encode(&state), before);
        assert_ne!(encode(&next), before);
    }

    #[test]
    fn test_over_lift_is_clamped() {
        let state = decode(r#"[TPS "x3/x3/1,x2 1 5"]"#).unwrap();
        let next = apply_move(&state, "3a1>").unwrap();
        assert_eq!(at(&next, "b1"), &vec![Piece::flat(Color::First)]);
        assert_eq!(next.board.piece_count(), 1);
    }

    #[test]
    fn test_off_board_is_rejected() {
        let state = decode(r#"[TPS "x3/x3/1,x2 1 5"]"#).unwrap();
        assert!(matches!(
            apply_move(&state, "a1<"),
            Err(TakError::Validation(ValidationError::OutOfBounds { .. }))
        ));
        assert!(matches!(
            apply_move(&state, "e5"),
            Err(TakError::Validation(ValidationError::OutOfBounds { .. }))
        ));
        assert!(matches!(
            apply_move(&state, "3a1>111"),
            Err(TakError::Validation(ValidationError::OutOfBounds { .. }))
        ));
    }

    #[test]
    fn test_move_number_overflow_is_rejected() {
        let state = decode(r#"[TPS "x3/x3/x3 1 4294967295"]"#).unwrap();
        let next = apply_move(&state, "a1").unwrap();
        assert_eq!(next.move_number, u32::MAX);
        assert_eq!(next.active_color, Color::Second);

        assert_eq!(
            apply_move(&next, "b1"),
            Err(TakError::Validation(ValidationError::MoveNumberOverflow(
                u32::MAX
            )))
        );
    }

    #[test]
    fn test_apply_moves_short_circuits() {
        let state = initial_state(3);
        assert_eq!(
            apply_moves(&state, &["a1", "b2", "zz", "c3"]),
            Err(TakError::Parse(ParseError::Move("zz".to_string())))
        );
    }
}
