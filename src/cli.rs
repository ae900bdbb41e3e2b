//! Command-line argument parsing.
//!
//! Hand-rolled token scanning rather than a derive-based parser, in the
//! same style as this workspace's other line-oriented command parsers: a
//! flat `while` loop over tokens, matching on the flag and consuming the
//! following token as its value.

use score4_engine::MctsConfig;

/// A malformed command line.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CliError {
    #[error("unknown flag: \"{flag}\"")]
    UnknownFlag { flag: String },
    #[error("flag \"{flag}\" requires a value")]
    MissingValue { flag: String },
    #[error("flag \"{flag}\" expects an integer, got \"{value}\"")]
    InvalidInt { flag: String, value: String },
    #[error("flag \"{flag}\" expects a number, got \"{value}\"")]
    InvalidFloat { flag: String, value: String },
}

/// One player's command-line configuration: the agent tag plus every
/// setting an agent of that tag might need. Tag validity is not checked
/// here — [`score4_engine::Agent::from_tag`] is the single source of
/// truth for which tags exist.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerSpec {
    pub tag: String,
    pub depth: i64,
    pub mcts: MctsConfig,
}

/// Parsed command line.
#[derive(Debug, Clone, PartialEq)]
pub struct CliArgs {
    pub player1: PlayerSpec,
    pub player2: PlayerSpec,
    pub show_board: bool,
    pub show_result: bool,
}

pub fn parse(args: &[String]) -> Result<CliArgs, CliError> {
    let mut tag1 = "h".to_string();
    let mut tag2 = "h".to_string();
    let mut depth1: i64 = 0;
    let mut depth2: i64 = 0;
    let mut shared_mcts = MctsConfig::default();
    let mut overrides1: Vec<(String, String)> = Vec::new();
    let mut overrides2: Vec<(String, String)> = Vec::new();
    let mut show_board = true;
    let mut show_result = true;

    let mut i = 0;
    while i < args.len() {
        let flag = args[i].as_str();
        match flag {
            "--player1" => tag1 = take_value(flag, &mut i, args)?,
            "--player2" => tag2 = take_value(flag, &mut i, args)?,
            "--player1-depth" => depth1 = parse_int(flag, &take_value(flag, &mut i, args)?)?,
            "--player2-depth" => depth2 = parse_int(flag, &take_value(flag, &mut i, args)?)?,
            "--no-board" => {
                show_board = false;
                i += 1;
            }
            "--no-result" => {
                show_result = false;
                i += 1;
            }
            _ if flag.starts_with("--player1-mcts-") => {
                let key = flag.trim_start_matches("--player1-").to_string();
                let value = take_value(flag, &mut i, args)?;
                overrides1.push((key, value));
            }
            _ if flag.starts_with("--player2-mcts-") => {
                let key = flag.trim_start_matches("--player2-").to_string();
                let value = take_value(flag, &mut i, args)?;
                overrides2.push((key, value));
            }
            _ if flag.starts_with("--mcts-") => {
                let key = flag.trim_start_matches("--").to_string();
                let value = take_value(flag, &mut i, args)?;
                apply_mcts_flag(&mut shared_mcts, flag, &key, &value)?;
            }
            other => return Err(CliError::UnknownFlag { flag: other.to_string() }),
        }
    }

    let mut mcts1 = shared_mcts;
    for (key, value) in overrides1 {
        let flag = format!("--player1-{key}");
        apply_mcts_flag(&mut mcts1, &flag, &key, &value)?;
    }
    let mut mcts2 = shared_mcts;
    for (key, value) in overrides2 {
        let flag = format!("--player2-{key}");
        apply_mcts_flag(&mut mcts2, &flag, &key, &value)?;
    }

    Ok(CliArgs {
        player1: PlayerSpec { tag: tag1, depth: depth1, mcts: mcts1 },
        player2: PlayerSpec { tag: tag2, depth: depth2, mcts: mcts2 },
        show_board,
        show_result,
    })
}

fn take_value(flag: &str, i: &mut usize, args: &[String]) -> Result<String, CliError> {
    let value = args.get(*i + 1).ok_or_else(|| CliError::MissingValue { flag: flag.to_string() })?.clone();
    *i += 2;
    Ok(value)
}

fn parse_int(flag: &str, value: &str) -> Result<i64, CliError> {
    value.parse().map_err(|_| CliError::InvalidInt { flag: flag.to_string(), value: value.to_string() })
}

fn parse_float(flag: &str, value: &str) -> Result<f64, CliError> {
    value.parse().map_err(|_| CliError::InvalidFloat { flag: flag.to_string(), value: value.to_string() })
}

fn apply_mcts_flag(cfg: &mut MctsConfig, flag: &str, key: &str, value: &str) -> Result<(), CliError> {
    match key {
        "mcts-iterations" => cfg.iterations = parse_int(flag, value)?,
        "mcts-time-ms" => cfg.time_ms = parse_int(flag, value)?,
        "mcts-threads" => cfg.threads = parse_int(flag, value)?,
        "mcts-c" => cfg.c = parse_float(flag, value)?,
        "mcts-rollout-depth" => cfg.rollout_max_depth = parse_int(flag, value)?,
        "mcts-max-nodes" => cfg.max_nodes = parse_int(flag, value)?,
        "mcts-verbose" => cfg.verbose = parse_int(flag, value)? as u8,
        "mcts-seed" => cfg.seed = parse_int(flag, value)? as u64,
        _ => return Err(CliError::UnknownFlag { flag: flag.to_string() }),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(tokens: &[&str]) -> Vec<String> {
        tokens.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn defaults_are_two_human_players() {
        let parsed = parse(&args(&[])).unwrap();
        assert_eq!(parsed.player1.tag, "h");
        assert_eq!(parsed.player2.tag, "h");
        assert!(parsed.show_board);
        assert!(parsed.show_result);
    }

    #[test]
    fn parses_agent_tags_and_depth() {
        let parsed = parse(&args(&["--player1", "m", "--player1-depth", "4", "--player2", "r"])).unwrap();
        assert_eq!(parsed.player1.tag, "m");
        assert_eq!(parsed.player1.depth, 4);
        assert_eq!(parsed.player2.tag, "r");
    }

    #[test]
    fn shared_mcts_flags_apply_to_both_players() {
        let parsed = parse(&args(&["--mcts-iterations", "500"])).unwrap();
        assert_eq!(parsed.player1.mcts.iterations, 500);
        assert_eq!(parsed.player2.mcts.iterations, 500);
    }

    #[test]
    fn per_player_override_wins_over_shared() {
        let parsed =
            parse(&args(&["--mcts-iterations", "500", "--player1-mcts-iterations", "2000"])).unwrap();
        assert_eq!(parsed.player1.mcts.iterations, 2000);
        assert_eq!(parsed.player2.mcts.iterations, 500);
    }

    #[test]
    fn display_suppression_flags() {
        let parsed = parse(&args(&["--no-board", "--no-result"])).unwrap();
        assert!(!parsed.show_board);
        assert!(!parsed.show_result);
    }

    #[test]
    fn unknown_flag_is_rejected() {
        assert!(matches!(parse(&args(&["--bogus"])), Err(CliError::UnknownFlag { .. })));
    }

    #[test]
    fn missing_value_is_rejected() {
        assert!(matches!(parse(&args(&["--player1-depth"])), Err(CliError::MissingValue { .. })));
    }

    #[test]
    fn invalid_int_is_rejected() {
        assert!(matches!(
            parse(&args(&["--player1-depth", "deep"])),
            Err(CliError::InvalidInt { .. })
        ));
    }
}
