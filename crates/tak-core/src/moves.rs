//! PTN move tokens: placements ("a1", "Sc3", "Cd4'") and stack movements
//! ("c2>", "3b3+12*").

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

use crate::board::PieceKind;
use crate::error::ParseError;
use crate::square::Square;

static PLACEMENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^(?P<kind>[FSC])?(?P<square>[a-h][1-8])(?P<notes>['"*!?]*)$"#)
        .expect("placement pattern is valid")
});

static MOVEMENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"^(?P<count>[1-8])?(?P<square>[a-h][1-8])(?P<dir>[<>+-])(?P<drops>[1-8]*)(?P<notes>['"*!?]*)$"#,
    )
    .expect("movement pattern is valid")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// `+`, towards higher ranks
    Up,
    /// `-`
    Down,
    /// `<`, towards file a
    Left,
    /// `>`
    Right,
}

impl Direction {
    pub fn from_symbol(c: char) -> Option<Self> {
        match c {
            '+' => Some(Direction::Up),
            '-' => Some(Direction::Down),
            '<' => Some(Direction::Left),
            '>' => Some(Direction::Right),
            _ => None,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Direction::Up => '+',
            Direction::Down => '-',
            Direction::Left => '<',
            Direction::Right => '>',
        }
    }

    /// Unit step as a (rank, file) delta.
    pub fn delta(self) -> (isize, isize) {
        match self {
            Direction::Up => (1, 0),
            Direction::Down => (-1, 0),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
        }
    }
}

/// Trailing marks on a move. They carry commentary only and never affect
/// the resulting position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Annotation {
    Tak,
    DoubleTak,
    Crush,
    Good,
    Questionable,
}

impl Annotation {
    fn from_char(c: char) -> Option<Self> {
        match c {
            '\'' => Some(Annotation::Tak),
            '"' => Some(Annotation::DoubleTak),
            '*' => Some(Annotation::Crush),
            '!' => Some(Annotation::Good),
            '?' => Some(Annotation::Questionable),
            _ => None,
        }
    }

    fn symbol(self) -> char {
        match self {
            Annotation::Tak => '\'',
            Annotation::DoubleTak => '"',
            Annotation::Crush => '*',
            Annotation::Good => '!',
            Annotation::Questionable => '?',
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Move {
    Placement {
        kind: PieceKind,
        square: Square,
        annotations: Vec<Annotation>,
    },
    Movement {
        count: usize,
        square: Square,
        direction: Direction,
        /// Stones dropped on each successive square; sums to `count`.
        drops: Vec<usize>,
        annotations: Vec<Annotation>,
    },
}

impl Move {
    pub fn square(&self) -> Square {
        match self {
            Move::Placement { square, .. } | Move::Movement { square, .. } => *square,
        }
    }

    pub fn annotations(&self) -> &[Annotation] {
        match self {
            Move::Placement { annotations, .. } | Move::Movement { annotations, .. } => annotations,
        }
    }

    pub fn is_movement(&self) -> bool {
        matches!(self, Move::Movement { .. })
    }
}

fn parse_annotations(notes: &str) -> Vec<Annotation> {
    notes.chars().filter_map(Annotation::from_char).collect()
}

fn digit(c: char) -> usize {
    c.to_digit(10).unwrap_or(0) as usize
}

impl FromStr for Move {
    type Err = ParseError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseError::Move(token.to_string());

        if let Some(caps) = MOVEMENT_RE.captures(token) {
            let square: Square = caps["square"].parse().map_err(|_| invalid())?;
            let direction = caps["dir"]
                .chars()
                .next()
                .and_then(Direction::from_symbol)
                .ok_or_else(invalid)?;
            let count = caps
                .name("count")
                .and_then(|m| m.as_str().chars().next())
                .map(digit)
                .unwrap_or(1);
            let drops: Vec<usize> = if caps["drops"].is_empty() {
                vec![count]
            } else {
                caps["drops"].chars().map(digit).collect()
            };
            if drops.iter().sum::<usize>() != count {
                return Err(invalid());
            }
            return Ok(Move::Movement {
                count,
                square,
                direction,
                drops,
                annotations: parse_annotations(&caps["notes"]),
            });
        }

        if let Some(caps) = PLACEMENT_RE.captures(token) {
            let square: Square = caps["square"].parse().map_err(|_| invalid())?;
            let kind = match caps.name("kind").map(|m| m.as_str()) {
                Some("S") => PieceKind::Standing,
                Some("C") => PieceKind::Capstone,
                _ => PieceKind::Flat,
            };
            return Ok(Move::Placement {
                kind,
                square,
                annotations: parse_annotations(&caps["notes"]),
            });
        }

        Err(invalid())
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Move::Placement { kind, square, .. } => {
                if let Some(suffix) = kind.suffix() {
                    write!(f, "{suffix}")?;
                }
                write!(f, "{square}")?;
            }
            Move::Movement {
                count,
                square,
                direction,
                drops,
                ..
            } => {
                if *count != 1 {
                    write!(f, "{count}")?;
                }
                write!(f, "{square}{}", direction.symbol())?;
                if drops.len() > 1 {
                    for drop in drops {
                        write!(f, "{drop}")?;
                    }
                }
            }
        }
        for annotation in self.annotations() {
            write!(f, "{}", annotation.symbol())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_placements() {
        assert_eq!(
            "a3".parse::<Move>().unwrap(),
            Move::Placement {
                kind: PieceKind::Flat,
                square: Square::new(2, 0),
                annotations: vec![],
            }
        );
        assert_eq!(
            "Cc5?".parse::<Move>().unwrap(),
            Move::Placement {
                kind: PieceKind::Capstone,
                square: Square::new(4, 2),
                annotations: vec![Annotation::Questionable],
            }
        );
        let standing: Move = "Sb2".parse().unwrap();
        assert!(matches!(standing, Move::Placement { kind: PieceKind::Standing, .. }));
        let explicit_flat: Move = "Fb2".parse().unwrap();
        assert!(matches!(explicit_flat, Move::Placement { kind: PieceKind::Flat, .. }));
    }

    #[test]
    fn test_parse_movements() {
        assert_eq!(
            "c2>".parse::<Move>().unwrap(),
            Move::Movement {
                count: 1,
                square: Square::new(1, 2),
                direction: Direction::Right,
                drops: vec![1],
                annotations: vec![],
            }
        );
        assert_eq!(
            "2c3-2!".parse::<Move>().unwrap(),
            Move::Movement {
                count: 2,
                square: Square::new(2, 2),
                direction: Direction::Down,
                drops: vec![2],
                annotations: vec![Annotation::Good],
            }
        );
        assert_eq!(
            "5a1+212*'".parse::<Move>().unwrap(),
            Move::Movement {
                count: 5,
                square: Square::new(0, 0),
                direction: Direction::Up,
                drops: vec![2, 1, 2],
                annotations: vec![Annotation::Crush, Annotation::Tak],
            }
        );
    }

    #[test]
    fn test_rejects_malformed_tokens() {
        for token in [
            "", "a", "a9", "i1", "Xa1", "a1x", "c2>>", "2c2", "3c2>11", "c2>0", "2c2>11 ", "0a1+",
            "a1+ ",
        ] {
            assert_eq!(
                token.parse::<Move>(),
                Err(ParseError::Move(token.to_string())),
                "{token:?} should not parse"
            );
        }
    }

    #[test]
    fn test_display_is_canonical() {
        for (token, canonical) in [
            ("a1", "a1"),
            ("Fa1", "a1"),
            ("Sd4", "Sd4"),
            ("Cc5?", "Cc5?"),
            ("1c2>", "c2>"),
            ("3c2>3", "3c2>"),
            ("3c2<12'", "3c2<12'"),
        ] {
            assert_eq!(token.parse::<Move>().unwrap().to_string(), canonical);
        }
    }
}
