//! Square labels ("a1" .. "h8") and their zero-based board coordinates.

use std::fmt;
use std::str::FromStr;

use crate::error::ParseError;

const FILES: &[u8] = b"abcdefgh";
const RANKS: &[u8] = b"12345678";

/// A board coordinate. Rank 0 is the row labelled "1", file 0 is column "a".
///
/// Parsing only checks the label grammar; whether the square exists on a
/// particular board is up to the caller (see [`crate::Board::get`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Square {
    pub rank: usize,
    pub file: usize,
}

impl Square {
    pub fn new(rank: usize, file: usize) -> Self {
        Self { rank, file }
    }

    /// Step one square by a (rank, file) delta. `None` when the step falls
    /// off the low edge; the high edge is checked against the board instead.
    pub fn offset(self, (dr, df): (isize, isize)) -> Option<Self> {
        let rank = self.rank.checked_add_signed(dr)?;
        let file = self.file.checked_add_signed(df)?;
        Some(Self { rank, file })
    }
}

impl FromStr for Square {
    type Err = ParseError;

    fn from_str(label: &str) -> Result<Self, Self::Err> {
        let bytes = label.as_bytes();
        if bytes.len() != 2 {
            return Err(ParseError::Square(label.to_string()));
        }
        let file = FILES
            .iter()
            .position(|&c| c == bytes[0])
            .ok_or_else(|| ParseError::Square(label.to_string()))?;
        let rank = RANKS
            .iter()
            .position(|&c| c == bytes[1])
            .ok_or_else(|| ParseError::Square(label.to_string()))?;
        Ok(Self { rank, file })
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (FILES.get(self.file), RANKS.get(self.rank)) {
            (Some(&file), Some(&rank)) => write!(f, "{}{}", file as char, rank as char),
            // Off-board coordinates produced by stepping past the h-file or 8th rank
            _ => write!(f, "({},{})", self.rank, self.file),
        }
    }
}

/// Convert a square label to its zero-based `(rank, file)` pair.
pub fn square_to_coords(label: &str) -> Result<(usize, usize), ParseError> {
    let square: Square = label.parse()?;
    Ok((square.rank, square.file))
}
