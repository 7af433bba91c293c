//! Tak notation engine.
//!
//! Decodes TPS board snapshots, applies PTN move tokens to produce successor
//! states, and encodes states back to TPS. Every applied move returns a new
//! [`GameState`]; inputs are never mutated, so earlier states stay valid for
//! replay and search.
//!
//! ```
//! use tak_core::{apply_moves, tps};
//!
//! let state = tps::decode(r#"[TPS "x3/x3/x3 1 1"]"#).unwrap();
//! let state = apply_moves(&state, &["a1", "c3", "b2"]).unwrap();
//! assert_eq!(tps::encode(&state), r#"[TPS "x2,1/x,1,x/2,x2 2 2"]"#);
//! ```

pub mod apply;
pub mod board;
pub mod error;
pub mod game_data;
pub mod moves;
pub mod ptn;
pub mod square;
pub mod tps;
pub mod validate;

pub use self::apply::{apply_move, apply_moves, apply_parsed};
pub use self::board::{initial_state, square_at, Board, Color, GameState, Piece, PieceKind, Stack};
pub use self::error::{ParseError, PtnError, TakError, ValidationError};
pub use self::game_data::{Ply, PtnGame};
pub use self::moves::{Annotation, Direction, Move};
pub use self::ptn::parse_ptn;
pub use self::square::{square_to_coords, Square};
pub use self::validate::{apply_move_checked, apply_moves_checked, check_move};
