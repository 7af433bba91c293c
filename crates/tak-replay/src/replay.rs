//! Replays a move sequence and records the snapshot after every ply.

use serde::Serialize;
use tak_core::{apply_move, apply_move_checked, tps, GameState, TakError};

#[derive(Debug, Clone, Serialize)]
pub struct TimelineEntry {
    pub ply: usize,
    /// `None` for the starting position
    #[serde(rename = "move")]
    pub mv: Option<String>,
    pub tps: String,
}

/// Play `tokens` from `start`, returning the starting snapshot followed by one
/// entry per ply.
pub fn replay<S: AsRef<str>>(
    start: &GameState,
    tokens: &[S],
    validate: bool,
) -> Result<Vec<TimelineEntry>, TakError> {
    let mut timeline = vec![TimelineEntry {
        ply: 0,
        mv: None,
        tps: tps::encode(start),
    }];

    let mut state = start.clone();
    for (i, token) in tokens.iter().enumerate() {
        let token = token.as_ref();
        state = if validate {
            apply_move_checked(&state, token)?
        } else {
            apply_move(&state, token)?
        };
        timeline.push(TimelineEntry {
            ply: i + 1,
            mv: Some(token.to_string()),
            tps: tps::encode(&state),
        });
    }

    Ok(timeline)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tak_core::{initial_state, ValidationError};

    #[test]
    fn test_replay_records_every_ply() {
        let timeline = replay(&initial_state(3), &["a1", "c3"], false).unwrap();
        assert_eq!(timeline.len(), 3);
        assert_eq!(timeline[0].tps, r#"[TPS "x3/x3/x3 1 1"]"#);
        assert_eq!(timeline[2].mv.as_deref(), Some("c3"));
        assert_eq!(timeline[2].tps, r#"[TPS "x2,1/x3/2,x2 1 2"]"#);
    }

    #[test]
    fn test_validation_toggle() {
        let start = initial_state(3);
        assert!(replay(&start, &["a1", "a1"], false).is_ok());
        assert_eq!(
            replay(&start, &["a1", "a1"], true).unwrap_err(),
            TakError::Validation(ValidationError::Occupied("a1".into()))
        );
    }

    #[test]
    fn test_timeline_json_shape() {
        let timeline = replay(&initial_state(3), &["b2"], false).unwrap();
        let json = serde_json::to_value(&timeline).unwrap();
        assert_eq!(json[0]["move"], serde_json::Value::Null);
        assert_eq!(json[1]["move"], "b2");
        assert_eq!(json[1]["ply"], 1);
    }
}
