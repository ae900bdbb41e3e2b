//! Agent selection: the uniform `choose` surface the driver calls each
//! turn, and the validation that turns a bad configuration into a
//! [`ConfigError`] before any game starts.

use score4_core::{Bitboard, Position, Side};

use crate::error::ConfigError;
use crate::rng::Rng;
use crate::search::{AlphaBetaConfig, MctsConfig, choose_alphabeta, choose_mcts};

/// A configured agent. `Human` is deliberately not a variant here: the
/// driver reads a move from the user directly and never calls `choose`
/// for a human player.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Agent {
    Random { seed: u64 },
    AlphaBeta(AlphaBetaConfig),
    Mcts(MctsConfig),
}

impl Agent {
    /// Parse a CLI agent tag (`r`, `m`, `c`) together with the depth/MCTS
    /// settings that apply to it, applying the validation rules in the
    /// external interface contract.
    pub fn from_tag(
        tag: &str,
        depth: i64,
        mcts: MctsConfig,
        seed: u64,
    ) -> Result<Agent, ConfigError> {
        match tag {
            "r" => Ok(Agent::Random { seed }),
            "m" => {
                if depth <= 0 {
                    return Err(ConfigError::MissingDepth);
                }
                Ok(Agent::AlphaBeta(AlphaBetaConfig { depth: depth as u8 }))
            }
            "c" => {
                if mcts.iterations <= 0 && mcts.time_ms <= 0 {
                    return Err(ConfigError::NoMctsBudget);
                }
                Ok(Agent::Mcts(mcts))
            }
            other => Err(ConfigError::UnknownAgentTag { tag: other.to_string() }),
        }
    }

    /// Choose a move for `side` to play in `pos`. Returns
    /// [`Bitboard::EMPTY`] when there are no legal moves.
    pub fn choose(&self, pos: Position, side: Side) -> Bitboard {
        match self {
            Agent::Random { seed } => choose_random(pos, *seed),
            Agent::AlphaBeta(cfg) => choose_alphabeta(pos, side, *cfg),
            Agent::Mcts(cfg) => choose_mcts(pos, side, *cfg),
        }
    }
}

fn choose_random(pos: Position, seed: u64) -> Bitboard {
    let legal: Vec<Bitboard> = pos.legal_moves().collect();
    if legal.is_empty() {
        return Bitboard::EMPTY;
    }
    let mut rng = Rng::new(seed);
    legal[rng.below(legal.len() as u32) as usize]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_tag_is_rejected() {
        let err = Agent::from_tag("z", 0, MctsConfig::default(), 1).unwrap_err();
        assert_eq!(err, ConfigError::UnknownAgentTag { tag: "z".to_string() });
    }

    #[test]
    fn alphabeta_requires_positive_depth() {
        let err = Agent::from_tag("m", 0, MctsConfig::default(), 1).unwrap_err();
        assert_eq!(err, ConfigError::MissingDepth);
    }

    #[test]
    fn alphabeta_accepts_positive_depth() {
        let agent = Agent::from_tag("m", 4, MctsConfig::default(), 1).unwrap();
        assert_eq!(agent, Agent::AlphaBeta(AlphaBetaConfig { depth: 4 }));
    }

    #[test]
    fn mcts_requires_a_budget() {
        let cfg = MctsConfig { iterations: 0, time_ms: 0, ..MctsConfig::default() };
        let err = Agent::from_tag("c", 0, cfg, 1).unwrap_err();
        assert_eq!(err, ConfigError::NoMctsBudget);
    }

    #[test]
    fn mcts_accepts_a_time_only_budget() {
        let cfg = MctsConfig { iterations: 0, time_ms: 50, ..MctsConfig::default() };
        assert!(Agent::from_tag("c", 0, cfg, 1).is_ok());
    }

    #[test]
    fn random_agent_returns_a_legal_move() {
        let agent = Agent::Random { seed: 42 };
        let mv = agent.choose(Position::EMPTY, Side::Black);
        assert!(Position::EMPTY.legal_mask().contains_index(mv.index_of()));
    }

    #[test]
    fn random_agent_on_full_board_returns_sentinel() {
        const BLACK_CELLS: [u8; 28] = [
            0, 5, 6, 9, 14, 15, 17, 20, 23, 25, 27, 28, 30, 31, 35, 36, 37, 40, 42, 47, 48, 50,
            51, 52, 55, 56, 59, 61,
        ];
        let mut pos = Position::EMPTY;
        for cell in 0u8..64 {
            if BLACK_CELLS.contains(&cell) {
                pos.black |= Bitboard::bit_of(cell);
            } else {
                pos.white |= Bitboard::bit_of(cell);
            }
        }
        let agent = Agent::Random { seed: 1 };
        assert_eq!(agent.choose(pos, Side::Black), Bitboard::EMPTY);
    }
}
