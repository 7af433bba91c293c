//! Board state model: pieces, stacks, the board grid and the game state.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ParseError, ValidationError};
use crate::square::Square;

/// Player colour. "1" is White (moves first), "2" is Black.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Color {
    #[serde(rename = "1")]
    First,
    #[serde(rename = "2")]
    Second,
}

impl Color {
    pub fn other(self) -> Self {
        match self {
            Color::First => Color::Second,
            Color::Second => Color::First,
        }
    }

    pub fn digit(self) -> char {
        match self {
            Color::First => '1',
            Color::Second => '2',
        }
    }

    pub fn from_digit(c: char) -> Option<Self> {
        match c {
            '1' => Some(Color::First),
            '2' => Some(Color::Second),
            _ => None,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.digit())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PieceKind {
    Flat,
    Standing,
    Capstone,
}

impl PieceKind {
    /// Notation suffix; flats have none.
    pub fn suffix(self) -> Option<char> {
        match self {
            PieceKind::Flat => None,
            PieceKind::Standing => Some('S'),
            PieceKind::Capstone => Some('C'),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    pub owner: Color,
    pub kind: PieceKind,
}

impl Piece {
    pub fn new(owner: Color, kind: PieceKind) -> Self {
        Self { owner, kind }
    }

    pub fn flat(owner: Color) -> Self {
        Self::new(owner, PieceKind::Flat)
    }

    pub fn is_standing(self) -> bool {
        self.kind == PieceKind::Standing
    }

    pub fn is_capstone(self) -> bool {
        self.kind == PieceKind::Capstone
    }

    /// Split a square token such as "2112S" into its pieces, bottom to top.
    pub fn parse_stack(token: &str) -> Option<Stack> {
        let mut stack = Vec::new();
        let mut chars = token.chars().peekable();
        while let Some(c) = chars.next() {
            let owner = Color::from_digit(c)?;
            let kind = match chars.peek() {
                Some('S') => PieceKind::Standing,
                Some('C') => PieceKind::Capstone,
                _ => PieceKind::Flat,
            };
            if kind != PieceKind::Flat {
                chars.next();
            }
            stack.push(Piece::new(owner, kind));
        }
        if stack.is_empty() {
            None
        } else {
            Some(stack)
        }
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.owner)?;
        if let Some(suffix) = self.kind.suffix() {
            write!(f, "{suffix}")?;
        }
        Ok(())
    }
}

/// Pieces on one square, bottom to top. Empty means an empty square.
pub type Stack = Vec<Piece>;

/// Square grid of stacks indexed `[rank][file]`. The size never changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawBoard")]
pub struct Board {
    size: usize,
    ranks: Vec<Vec<Stack>>,
}

/// Unchecked wire form of [`Board`].
#[derive(Deserialize)]
struct RawBoard {
    size: usize,
    ranks: Vec<Vec<Stack>>,
}

impl TryFrom<RawBoard> for Board {
    type Error = String;

    fn try_from(raw: RawBoard) -> Result<Self, Self::Error> {
        let board = Board::from_ranks(raw.ranks)
            .ok_or_else(|| "board ranks must form a non-empty N x N grid".to_string())?;
        if board.size != raw.size {
            return Err(format!(
                "board size {} does not match {} ranks",
                raw.size, board.size
            ));
        }
        Ok(board)
    }
}

impl Board {
    pub fn empty(size: usize) -> Self {
        Self {
            size,
            ranks: vec![vec![Vec::new(); size]; size],
        }
    }

    /// Build a board from rank rows (rank 0 first). Returns `None` unless the
    /// rows form an N x N grid.
    pub fn from_ranks(ranks: Vec<Vec<Stack>>) -> Option<Self> {
        let size = ranks.len();
        if size == 0 || ranks.iter().any(|rank| rank.len() != size) {
            return None;
        }
        Some(Self { size, ranks })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn ranks(&self) -> &[Vec<Stack>] {
        &self.ranks
    }

    pub fn contains(&self, square: Square) -> bool {
        square.rank < self.size && square.file < self.size
    }

    pub fn get(&self, square: Square) -> Option<&Stack> {
        self.ranks.get(square.rank)?.get(square.file)
    }

    pub fn get_mut(&mut self, square: Square) -> Option<&mut Stack> {
        self.ranks.get_mut(square.rank)?.get_mut(square.file)
    }

    /// Stack on the square named by `label`, or `None` when the label is
    /// well-formed but off this board.
    pub fn square_at(&self, label: &str) -> Result<Option<&Stack>, ParseError> {
        let square: Square = label.parse()?;
        Ok(self.get(square))
    }

    pub fn piece_count(&self) -> usize {
        self.ranks.iter().flatten().map(Vec::len).sum()
    }
}

/// Look up the stack at a square label. See [`Board::square_at`].
pub fn square_at<'a>(board: &'a Board, label: &str) -> Result<Option<&'a Stack>, ParseError> {
    board.square_at(label)
}

/// A board position together with the side to move and the move number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    pub board: Board,
    pub active_color: Color,
    pub move_number: u32,
}

impl GameState {
    /// Colour of a stone placed this ply. On move 1 each side places the
    /// opponent's stone.
    pub fn placement_color(&self) -> Color {
        if self.move_number == 1 {
            self.active_color.other()
        } else {
            self.active_color
        }
    }

    /// Hand the turn over after a half-move by `active_color`. Leaves the
    /// state untouched when the move number would overflow.
    pub(crate) fn advance_turn(&mut self) -> Result<(), ValidationError> {
        if self.active_color == Color::Second {
            self.move_number = self
                .move_number
                .checked_add(1)
                .ok_or(ValidationError::MoveNumberOverflow(self.move_number))?;
        }
        self.active_color = self.active_color.other();
        Ok(())
    }
}

/// Empty board of the given size, White to move, move 1.
pub fn initial_state(size: usize) -> GameState {
    GameState {
        board: Board::empty(size),
        active_color: Color::First,
        move_number: 1,
    }
}
