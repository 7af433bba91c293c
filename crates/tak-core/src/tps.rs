//! TPS (Tak Positional System) snapshot encoder/decoder.
//!
//! A snapshot looks like `[TPS "x3,12,2S/x,22S,22C,11,21/... 1 26"]`: ranks
//! top-first separated by '/', squares by ',', then the side to move and the
//! move number. Runs of empty squares are written `xK`.

use std::sync::LazyLock;

use regex::Regex;

use crate::apply::apply_moves;
use crate::board::{Board, Color, GameState, Piece, Stack};
use crate::error::{ParseError, TakError};

static TPS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^\[TPS "(?P<board>[^" ]+) (?P<color>[12]) (?P<move>[1-9]\d*)"\]$"#)
        .expect("TPS pattern is valid")
});

/// Decode a TPS snapshot into a game state.
///
/// The whole string must be the bracketed snapshot; surrounding whitespace
/// is rejected. Non-canonical empty runs such as `x,x` or `x1` are accepted,
/// so `encode(&decode(t)?) == t` only holds for canonical text, which is
/// what [`encode`] always produces.
pub fn decode(text: &str) -> Result<GameState, ParseError> {
    let invalid = |reason: &str| ParseError::InvalidSnapshot(format!("{reason}: {text}"));

    let caps = TPS_RE
        .captures(text)
        .ok_or_else(|| invalid("does not match the TPS pattern"))?;

    let active_color = caps["color"]
        .chars()
        .next()
        .and_then(Color::from_digit)
        .ok_or_else(|| invalid("bad colour digit"))?;
    let move_number: u32 = caps["move"]
        .parse()
        .map_err(|_| invalid("bad move number"))?;

    let text_ranks: Vec<&str> = caps["board"].split('/').collect();
    let size = text_ranks.len();
    let mut ranks = Vec::with_capacity(size);
    // Text lists the top rank first; rank 0 of the board is the last one.
    for text_rank in text_ranks.iter().rev() {
        ranks.push(decode_rank(text_rank, size).ok_or_else(|| invalid("bad rank"))?);
    }

    let board = Board::from_ranks(ranks).ok_or_else(|| invalid("board is not square"))?;

    Ok(GameState {
        board,
        active_color,
        move_number,
    })
}

fn decode_rank(text_rank: &str, size: usize) -> Option<Vec<Stack>> {
    let mut rank = Vec::with_capacity(size);
    for token in text_rank.split(',') {
        if let Some(count) = token.strip_prefix('x') {
            let count: usize = if count.is_empty() {
                1
            } else if count.bytes().all(|b| b.is_ascii_digit()) {
                count.parse().ok()?
            } else {
                return None;
            };
            if count == 0 || rank.len() + count > size {
                return None;
            }
            rank.extend(std::iter::repeat_with(Vec::new).take(count));
        } else {
            rank.push(Piece::parse_stack(token)?);
        }
    }
    Some(rank)
}

/// Encode a game state as a TPS snapshot, compressing runs of empty squares.
pub fn encode(state: &GameState) -> String {
    let ranks: Vec<String> = state
        .board
        .ranks()
        .iter()
        .rev()
        .map(|rank| encode_rank(rank))
        .collect();

    format!(
        "[TPS \"{} {} {}\"]",
        ranks.join("/"),
        state.active_color,
        state.move_number
    )
}

fn encode_rank(rank: &[Stack]) -> String {
    let mut tokens: Vec<String> = Vec::with_capacity(rank.len());
    let mut empty_run = 0usize;

    for stack in rank {
        if stack.is_empty() {
            empty_run += 1;
            continue;
        }
        flush_empty_run(&mut tokens, &mut empty_run);
        tokens.push(stack.iter().map(Piece::to_string).collect());
    }
    flush_empty_run(&mut tokens, &mut empty_run);

    tokens.join(",")
}

fn flush_empty_run(tokens: &mut Vec<String>, run: &mut usize) {
    match *run {
        0 => {}
        1 => tokens.push("x".to_string()),
        n => tokens.push(format!("x{n}")),
    }
    *run = 0;
}

/// Decode `text`, apply `tokens` in order and re-encode the final position.
pub fn apply_tps<S: AsRef<str>>(text: &str, tokens: &[S]) -> Result<String, TakError> {
    let state = decode(text)?;
    let state = apply_moves(&state, tokens)?;
    Ok(encode(&state))
}
