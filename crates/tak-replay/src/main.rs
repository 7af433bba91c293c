//! Tak replay tool
//!
//! Replays a PTN game record, or a TPS snapshot plus move tokens, and prints
//! the resulting position.
//!
//! Usage:
//!   tak-replay game.ptn
//!   tak-replay --tps '[TPS "x5/x5/x5/x5/x5 1 1"]' a1 e5 c3

mod config;
mod replay;

use std::fs;

use anyhow::{bail, Context};
use tak_core::{parse_ptn, ptn, tps, GameState};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::{OutputFormat, ReplayConfig};

/// Where the starting position and move tokens come from.
enum Source {
    Ptn(String),
    Tps { snapshot: String, moves: Vec<String> },
}

fn parse_args(args: &[String]) -> anyhow::Result<Source> {
    match args {
        [flag, snapshot, moves @ ..] if flag == "--tps" => Ok(Source::Tps {
            snapshot: snapshot.clone(),
            moves: moves.to_vec(),
        }),
        [path] if !path.starts_with("--") => Ok(Source::Ptn(path.clone())),
        _ => bail!("usage: tak-replay <game.ptn> | tak-replay --tps <snapshot> [move...]"),
    }
}

fn load(source: &Source) -> anyhow::Result<(GameState, Vec<String>)> {
    match source {
        Source::Ptn(path) => {
            let text = fs::read_to_string(path).with_context(|| format!("reading {path}"))?;
            let game = parse_ptn(&text).with_context(|| format!("parsing {path}"))?;
            let player1 = ptn::extract_tag(&text, "Player1").unwrap_or_else(|| "?".into());
            let player2 = ptn::extract_tag(&text, "Player2").unwrap_or_else(|| "?".into());
            info!(
                %player1,
                %player2,
                plies = game.plies.len(),
                tags = game.tags.len(),
                "Loaded PTN game"
            );
            let moves = game.plies.into_iter().map(|p| p.token).collect();
            Ok((game.initial_state, moves))
        }
        Source::Tps { snapshot, moves } => {
            let state = tps::decode(snapshot).context("decoding --tps snapshot")?;
            Ok((state, moves.clone()))
        }
    }
}

fn main() -> anyhow::Result<()> {
    // Load .env if present
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let config = ReplayConfig::from_env()?;
    let args: Vec<String> = std::env::args().skip(1).collect();
    let source = parse_args(&args)?;
    let (start, moves) = load(&source)?;

    info!(
        size = start.board.size(),
        moves = moves.len(),
        validate = config.validate,
        "Replaying"
    );

    let timeline = replay::replay(&start, &moves, config.validate).context("replaying moves")?;

    match config.output {
        OutputFormat::Tps => {
            if let Some(last) = timeline.last() {
                println!("{}", last.tps);
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&timeline)?),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_args() {
        assert!(matches!(parse_args(&args(&["game.ptn"])), Ok(Source::Ptn(p)) if p == "game.ptn"));
        match parse_args(&args(&["--tps", "[TPS \"x3/x3/x3 1 1\"]", "a1", "c3"])).unwrap() {
            Source::Tps { snapshot, moves } => {
                assert_eq!(snapshot, "[TPS \"x3/x3/x3 1 1\"]");
                assert_eq!(moves, vec!["a1", "c3"]);
            }
            Source::Ptn(_) => panic!("expected a TPS source"),
        }
        assert!(parse_args(&args(&[])).is_err());
        assert!(parse_args(&args(&["--tps"])).is_err());
        assert!(parse_args(&args(&["--verbose"])).is_err());
    }

    #[test]
    fn test_load_tps_source() {
        let source = Source::Tps {
            snapshot: "[TPS \"x3/x3/x3 2 3\"]".to_string(),
            moves: vec!["b2".to_string()],
        };
        let (state, moves) = load(&source).unwrap();
        assert_eq!(state.move_number, 3);
        assert_eq!(moves, vec!["b2"]);
    }

    #[test]
    fn test_load_ptn_source() {
        let path = std::env::temp_dir().join(format!("tak-replay-load-{}.ptn", std::process::id()));
        fs::write(&path, "[Player1 \"alice\"]\n[Size \"4\"]\n\n1. a1 d4 2. b2\n").unwrap();

        let source = Source::Ptn(path.to_string_lossy().into_owned());
        let loaded = load(&source);
        fs::remove_file(&path).unwrap();

        let (state, moves) = loaded.unwrap();
        assert_eq!(state, tak_core::initial_state(4));
        assert_eq!(moves, vec!["a1", "d4", "b2"]);
    }
}
