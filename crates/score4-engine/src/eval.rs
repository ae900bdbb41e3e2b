//! Static position evaluation.
//!
//! Coarse by design: it exists to order alpha-beta children and to give
//! MCTS rollouts a bounded cutoff reward, not to play well on its own.

use score4_core::{LINES, Outcome, Position, Side};

/// Score a position from `perspective`'s point of view.
///
/// Terminal positions return a fixed payoff (+100 won / -100 lost / 0
/// draw). Otherwise, every line contributes +1 if only `perspective`'s
/// stones occupy it (and at least one does), -1 if only the opponent's do,
/// and 0 if the line is empty or mixed.
pub fn evaluate(pos: Position, perspective: Side) -> i32 {
    match pos.result() {
        Outcome::BlackWin => terminal_payoff(Side::Black, perspective),
        Outcome::WhiteWin => terminal_payoff(Side::White, perspective),
        Outcome::Draw => 0,
        Outcome::Ongoing => line_potential(pos, perspective),
    }
}

fn terminal_payoff(winner: Side, perspective: Side) -> i32 {
    if winner == perspective { 100 } else { -100 }
}

fn line_potential(pos: Position, perspective: Side) -> i32 {
    let mine = pos.board_of(perspective);
    let theirs = pos.board_of(!perspective);
    let mut score = 0;
    for mask in LINES {
        let mine_here = (mine & mask).is_nonempty();
        let theirs_here = (theirs & mask).is_nonempty();
        if mine_here && !theirs_here {
            score += 1;
        } else if theirs_here && !mine_here {
            score -= 1;
        }
    }
    score
}
