//! The match loop: alternates turns between two players, each either a
//! human (read from stdin) or an [`Agent`], until the game reaches a
//! terminal result.

use std::io::{self, BufRead, Write};

use score4_core::{Bitboard, Outcome, Position, Side};
use score4_engine::Agent;

/// One seat at the board.
pub enum Player {
    Human,
    Agent(Agent),
}

pub struct MatchConfig {
    pub black: Player,
    pub white: Player,
    pub show_board: bool,
    pub show_result: bool,
}

/// Play one game to completion, returning the final outcome.
pub fn play(cfg: MatchConfig) -> Outcome {
    let mut pos = Position::EMPTY;
    let mut side = Side::Black;

    loop {
        let result = pos.result();
        if result.is_terminal() {
            if cfg.show_result {
                report_result(result);
            }
            return result;
        }

        if cfg.show_board {
            println!("{}", crate::board_display::render(pos));
        }

        let player = match side {
            Side::Black => &cfg.black,
            Side::White => &cfg.white,
        };

        let mv = match player {
            Player::Human => prompt_human_move(pos),
            Player::Agent(agent) => agent.choose(pos, side),
        };

        if mv == Bitboard::EMPTY {
            // No legal move for a non-terminal position cannot happen
            // given the invariants in score4-core; treat it as a draw
            // rather than looping forever.
            if cfg.show_result {
                report_result(Outcome::Draw);
            }
            return Outcome::Draw;
        }

        tracing::debug!(side = %side, cell = mv.index_of(), "move applied");
        pos = pos.apply_move(side, mv);
        side = !side;
    }
}

fn report_result(result: Outcome) {
    debug_assert!(result.is_terminal(), "report_result called on a non-terminal outcome");
    match result.winner() {
        Some(side) => println!("winner: {side}"),
        None => println!("draw"),
    }
}

fn prompt_human_move(pos: Position) -> Bitboard {
    let legal: Vec<Bitboard> = pos.legal_moves().collect();
    loop {
        print!("enter cell index: ");
        let _ = io::stdout().flush();
        let mut line = String::new();
        if io::stdin().lock().read_line(&mut line).unwrap_or(0) == 0 {
            // EOF on stdin: fall back to the first legal move so the
            // driver terminates instead of spinning.
            return legal[0];
        }
        if let Ok(cell) = line.trim().parse::<u8>() {
            if let Some(mv) = legal.iter().find(|mv| mv.index_of() == cell) {
                return *mv;
            }
        }
        println!("not a legal cell, try again");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use score4_engine::{AlphaBetaConfig, MctsConfig};

    #[test]
    fn two_random_agents_reach_a_terminal_result() {
        let cfg = MatchConfig {
            black: Player::Agent(Agent::Random { seed: 1 }),
            white: Player::Agent(Agent::Random { seed: 2 }),
            show_board: false,
            show_result: false,
        };
        assert!(play(cfg).is_terminal());
    }

    #[test]
    fn alphabeta_beats_random_or_at_least_finishes() {
        let cfg = MatchConfig {
            black: Player::Agent(Agent::AlphaBeta(AlphaBetaConfig { depth: 2 })),
            white: Player::Agent(Agent::Random { seed: 3 }),
            show_board: false,
            show_result: false,
        };
        assert!(play(cfg).is_terminal());
    }

    #[test]
    fn mcts_vs_alphabeta_reaches_a_terminal_result() {
        let cfg = MatchConfig {
            black: Player::Agent(Agent::Mcts(MctsConfig { iterations: 200, threads: 1, seed: 4, ..MctsConfig::default() })),
            white: Player::Agent(Agent::AlphaBeta(AlphaBetaConfig { depth: 2 })),
            show_board: false,
            show_result: false,
        };
        assert!(play(cfg).is_terminal());
    }
}
