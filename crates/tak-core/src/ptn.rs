//! PTN parsing utilities: a lightweight regex-based extractor.
//!
//! Pulls tags, the starting position, move tokens and comments out of a game
//! record. Move tokens are passed through as text; they are only interpreted
//! when the game is replayed.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::board::{initial_state, Color, GameState};
use crate::error::PtnError;
use crate::game_data::{Ply, PtnGame};
use crate::tps;

static TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?m)^\s*\[(?P<key>\w+)\s+"(?P<value>[^"]*)"\]\s*$"#).expect("tag pattern is valid")
});

static BODY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"\{(?P<comment>[^}]*)\}|(?P<number>\d+)\.(?P<dots>\.*)|(?P<result>R-0|0-R|F-0|0-F|1-0|0-1|1/2-1/2|0-0)|(?P<ply>[^\s{}]+)"#,
    )
    .expect("body pattern is valid")
});

/// Parse a PTN document into a [`PtnGame`].
pub fn parse_ptn(ptn: &str) -> Result<PtnGame, PtnError> {
    let tags = extract_tags(ptn);
    let initial_state = initial_state_from_tags(&tags)?;
    let body = TAG_RE.replace_all(ptn, "");
    let (plies, result) = extract_plies(&body, &initial_state);

    debug!(
        tags = tags.len(),
        plies = plies.len(),
        size = initial_state.board.size(),
        "parsed PTN"
    );

    Ok(PtnGame {
        tags,
        initial_state,
        plies,
        result,
    })
}

/// Extract all `[Name "value"]` tags. Later duplicates win.
pub fn extract_tags(ptn: &str) -> BTreeMap<String, String> {
    TAG_RE
        .captures_iter(ptn)
        .map(|cap| (cap["key"].to_string(), cap["value"].to_string()))
        .collect()
}

/// Extract a single tag value, `None` when missing or empty.
pub fn extract_tag(ptn: &str, name: &str) -> Option<String> {
    extract_tags(ptn).remove(name).filter(|v| !v.is_empty())
}

fn initial_state_from_tags(tags: &BTreeMap<String, String>) -> Result<GameState, PtnError> {
    if let Some(snapshot) = tags.get("TPS") {
        return Ok(tps::decode(&format!("[TPS \"{snapshot}\"]"))?);
    }

    let size = tags.get("Size").ok_or(PtnError::MissingBoardSize)?;
    match size.trim().parse::<usize>() {
        Ok(n) if n > 0 => Ok(initial_state(n)),
        _ => Err(PtnError::InvalidSize(size.clone())),
    }
}

fn extract_plies(body: &str, start: &GameState) -> (Vec<Ply>, Option<String>) {
    let mut plies: Vec<Ply> = Vec::new();
    let mut result = None;

    let mut move_number = start.move_number;
    let mut half: u8 = if start.active_color == Color::Second { 2 } else { 1 };
    let mut seen_number = false;

    for cap in BODY_RE.captures_iter(body) {
        if let Some(comment) = cap.name("comment") {
            let text = comment.as_str().trim();
            match plies.last_mut() {
                Some(ply) => {
                    let existing = ply.comment.get_or_insert_with(String::new);
                    if !existing.is_empty() {
                        existing.push(' ');
                    }
                    existing.push_str(text);
                }
                None => debug!(comment = text, "dropping comment before first move"),
            }
        } else if let Some(number) = cap.name("number") {
            let Ok(n) = number.as_str().parse::<u32>() else {
                continue;
            };
            let continuation = cap.name("dots").is_some_and(|d| !d.as_str().is_empty());
            let second_to_open = !seen_number
                && n == start.move_number
                && start.active_color == Color::Second;
            move_number = n;
            half = if continuation || second_to_open { 2 } else { 1 };
            seen_number = true;
        } else if let Some(r) = cap.name("result") {
            result = Some(r.as_str().to_string());
        } else if let Some(token) = cap.name("ply") {
            plies.push(Ply {
                move_number,
                half,
                token: token.as_str().to_string(),
                comment: None,
            });
            if half == 1 {
                half = 2;
            } else {
                half = 1;
                move_number = move_number.saturating_add(1);
            }
        }
    }

    (plies, result)
}
