//! Root-parallel Monte Carlo tree search.
//!
//! Each worker grows its own arena-allocated tree from the same root
//! position; there is no shared tree state. Workers share only an
//! iteration counter (checked every 64 simulations) and, after all of them
//! join, their root-level visit/reward totals are combined with an ordered
//! sum rather than atomic float adds — the spec permits either and this one
//! is bit-stable across runs with the same seed and thread count.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use score4_core::{Bitboard, Outcome, Position, Side};

use crate::eval::evaluate;
use crate::rng::Rng;

/// Configuration for the MCTS agent. Non-positive fields fall back to their
/// documented defaults in [`MctsConfig::resolve`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MctsConfig {
    /// Target total simulations across all workers. `<= 0` means unlimited
    /// (a positive `time_ms` is then required).
    pub iterations: i64,
    /// Wall-clock budget in milliseconds. `<= 0` means unlimited.
    pub time_ms: i64,
    /// Worker count. `<= 0` uses hardware parallelism.
    pub threads: i64,
    /// UCT exploration constant. `<= 0` falls back to `sqrt(2)`.
    pub c: f64,
    /// Rollout depth cap in plies. `<= 0` falls back to 64.
    pub rollout_max_depth: i64,
    /// Per-worker arena capacity. `<= 0` auto-sizes from `iterations`.
    pub max_nodes: i64,
    /// Stats verbosity passed through to the driver; unused by the search
    /// itself beyond being threaded through to log output.
    pub verbose: u8,
    /// PRNG seed. `0` auto-seeds.
    pub seed: u64,
}

impl Default for MctsConfig {
    fn default() -> Self {
        MctsConfig {
            iterations: 10_000,
            time_ms: 0,
            threads: 0,
            c: 0.0,
            rollout_max_depth: 0,
            max_nodes: 0,
            verbose: 0,
            seed: 0,
        }
    }
}

impl MctsConfig {
    /// Apply documented fallbacks and clamps, producing a config every
    /// worker can use directly.
    fn resolve(self) -> ResolvedConfig {
        let threads = if self.threads <= 0 {
            std::thread::available_parallelism().map(|n| n.get()).unwrap_or(1)
        } else {
            self.threads as usize
        };
        let c = if self.c <= 0.0 { std::f64::consts::SQRT_2 } else { self.c };
        let rollout_max_depth = if self.rollout_max_depth <= 0 { 64 } else { self.rollout_max_depth as u32 };
        let max_nodes = if self.max_nodes <= 0 {
            let base = if self.iterations > 0 {
                (self.iterations as usize).div_ceil(threads) + 2048
            } else {
                100_000
            };
            base.clamp(4096, 2_000_000)
        } else {
            (self.max_nodes as usize).clamp(4096, 2_000_000)
        };
        ResolvedConfig {
            iterations: self.iterations,
            time_ms: self.time_ms,
            threads,
            c,
            rollout_max_depth,
            max_nodes,
            seed: self.seed,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct ResolvedConfig {
    iterations: i64,
    time_ms: i64,
    threads: usize,
    c: f64,
    rollout_max_depth: u32,
    max_nodes: usize,
    seed: u64,
}

const MAX_CHILDREN: usize = 16;
const NONE: u32 = u32::MAX;

#[derive(Debug, Clone, Copy)]
struct Node {
    black: Bitboard,
    white: Bitboard,
    parent: u32,
    to_move: Side,
    outcome: Outcome,
    visits: u32,
    reward: f64,
    children: [u32; MAX_CHILDREN],
    child_count: u8,
}

impl Node {
    fn position(&self) -> Position {
        Position { black: self.black, white: self.white }
    }

    fn board_of(&self, side: Side) -> Bitboard {
        self.position().board_of(side)
    }
}

/// A worker's private tree. Nodes are bump-allocated by index; there is no
/// freeing until the arena itself is dropped at the end of `choose`.
struct Arena {
    nodes: Vec<Node>,
    cap: usize,
}

impl Arena {
    fn try_new(cap: usize, root: Position, root_side: Side) -> Result<Arena, std::collections::TryReserveError> {
        let mut nodes = Vec::new();
        nodes.try_reserve_exact(cap)?;
        nodes.push(Node {
            black: root.black,
            white: root.white,
            parent: NONE,
            to_move: root_side,
            outcome: root.result(),
            visits: 0,
            reward: 0.0,
            children: [NONE; MAX_CHILDREN],
            child_count: 0,
        });
        Ok(Arena { nodes, cap })
    }

    fn has_room(&self) -> bool {
        self.nodes.len() < self.cap
    }

    fn push(&mut self, node: Node) -> Option<u32> {
        if !self.has_room() {
            return None;
        }
        self.nodes.push(node);
        Some((self.nodes.len() - 1) as u32)
    }
}

/// Per-worker root-level totals, combined by [`choose`] after all workers
/// join.
struct WorkerTotals {
    visits: Vec<f64>,
    wins: Vec<f64>,
}

impl WorkerTotals {
    fn empty(moves: usize) -> WorkerTotals {
        WorkerTotals { visits: vec![0.0; moves], wins: vec![0.0; moves] }
    }
}

/// Choose a move for `side` to play in `pos` by root-parallel MCTS. Returns
/// [`Bitboard::EMPTY`] if there are no legal moves.
pub fn choose(pos: Position, side: Side, cfg: MctsConfig) -> Bitboard {
    let legal_root_moves: Vec<Bitboard> = pos.legal_moves().collect();
    if legal_root_moves.is_empty() {
        return Bitboard::EMPTY;
    }

    let resolved = cfg.resolve();
    let deadline = if resolved.time_ms > 0 {
        Some(Instant::now() + Duration::from_millis(resolved.time_ms as u64))
    } else {
        None
    };
    let iteration_target = if resolved.iterations > 0 { Some(resolved.iterations as u64) } else { None };
    let sims_done = AtomicU64::new(0);

    let mut worker_totals: Vec<Option<WorkerTotals>> = (0..resolved.threads).map(|_| None).collect();

    std::thread::scope(|scope| {
        for (worker_index, slot) in worker_totals.iter_mut().enumerate() {
            let legal_root_moves = &legal_root_moves;
            let resolved = &resolved;
            let sims_done = &sims_done;
            scope.spawn(move || {
                *slot = Some(run_worker(
                    pos,
                    side,
                    legal_root_moves,
                    resolved,
                    worker_index,
                    sims_done,
                    iteration_target,
                    deadline,
                ));
            });
        }
    });

    let mut total_visits = vec![0.0f64; legal_root_moves.len()];
    let mut total_wins = vec![0.0f64; legal_root_moves.len()];
    for totals in worker_totals.into_iter().flatten() {
        for i in 0..legal_root_moves.len() {
            total_visits[i] += totals.visits[i];
            total_wins[i] += totals.wins[i];
        }
    }

    let grand_total: f64 = total_visits.iter().sum();
    if grand_total == 0.0 {
        tracing::warn!("mcts: every worker reported zero visits, falling back to a random legal move");
        let mut rng = Rng::new(resolved.seed);
        return legal_root_moves[rng.below(legal_root_moves.len() as u32) as usize];
    }

    let winrate = |i: usize| if total_visits[i] <= 0.0 { 0.0 } else { total_wins[i] / total_visits[i] };
    let mut best = 0;
    for i in 1..legal_root_moves.len() {
        if total_visits[i] > total_visits[best]
            || (total_visits[i] == total_visits[best] && winrate(i) > winrate(best))
        {
            best = i;
        }
    }
    legal_root_moves[best]
}

#[allow(clippy::too_many_arguments)]
fn run_worker(
    root_pos: Position,
    root_side: Side,
    legal_root_moves: &[Bitboard],
    cfg: &ResolvedConfig,
    worker_index: usize,
    sims_done: &AtomicU64,
    iteration_target: Option<u64>,
    deadline: Option<Instant>,
) -> WorkerTotals {
    let mut arena = match Arena::try_new(cfg.max_nodes, root_pos, root_side) {
        Ok(arena) => arena,
        Err(_) => {
            tracing::warn!(worker_index, cap = cfg.max_nodes, "mcts worker failed to allocate its arena, skipping");
            return WorkerTotals::empty(legal_root_moves.len());
        }
    };

    let mut rng = Rng::for_worker(cfg.seed, worker_index);
    let mut local_iters: u64 = 0;
    let mut warned_exhausted = false;

    loop {
        if local_iters > 0 && local_iters % 64 == 0 {
            let total = sims_done.fetch_add(64, Ordering::Relaxed) + 64;
            if let Some(target) = iteration_target {
                if total >= target {
                    break;
                }
            }
            if let Some(deadline) = deadline {
                if Instant::now() >= deadline {
                    break;
                }
            }
            if iteration_target.is_none() && deadline.is_none() {
                break;
            }
        }

        let selected = select(&arena, cfg);
        let node = arena.nodes[selected as usize];
        let legal_count = node.position().legal_move_count();
        let expandable = !node.outcome.is_terminal() && (node.child_count as u32) < legal_count;

        let target_idx = if expandable && arena.has_room() {
            expand(&mut arena, selected, &mut rng).unwrap_or(selected)
        } else {
            if expandable && !arena.has_room() && !warned_exhausted {
                tracing::warn!(worker_index, cap = cfg.max_nodes, "mcts worker exhausted its arena capacity");
                warned_exhausted = true;
            }
            selected
        };

        let reward = simulate(&arena, target_idx, root_side, cfg, &mut rng);
        backpropagate(&mut arena, target_idx, reward);
        local_iters += 1;
    }

    let remainder = local_iters % 64;
    if remainder != 0 {
        sims_done.fetch_add(remainder, Ordering::Relaxed);
    }

    root_totals(&arena, legal_root_moves, root_side)
}

/// Descend from the root picking the highest-UCT child until a node is
/// reached that is terminal, has no children to compare by UCT, or is
/// expandable with room left in the arena (spec: stop once "legal-move
/// count exceeds child count AND the arena has room" — otherwise keep
/// descending into the existing children).
fn select(arena: &Arena, cfg: &ResolvedConfig) -> u32 {
    let mut idx = 0u32;
    loop {
        let node = arena.nodes[idx as usize];
        if node.outcome.is_terminal() {
            return idx;
        }
        if node.child_count == 0 {
            return idx;
        }
        let legal_count = node.position().legal_move_count();
        if (node.child_count as u32) < legal_count && arena.has_room() {
            return idx;
        }

        let parent_visits = node.visits as f64;
        let mut best_child = node.children[0];
        let mut best_uct = f64::NEG_INFINITY;
        for &child_idx in &node.children[..node.child_count as usize] {
            let child = arena.nodes[child_idx as usize];
            let uct = if child.visits == 0 {
                f64::INFINITY
            } else {
                let mean_reward = child.reward / child.visits as f64;
                mean_reward + cfg.c * ((parent_visits + 1.0).ln() / child.visits as f64).sqrt()
            };
            if uct > best_uct {
                best_uct = uct;
                best_child = child_idx;
            }
        }
        idx = best_child;
    }
}

/// Add one unexpanded legal move as a new child of `idx`, chosen by a
/// random cyclic scan so no move is systematically favored by iteration
/// order.
fn expand(arena: &mut Arena, idx: u32, rng: &mut Rng) -> Option<u32> {
    let node = arena.nodes[idx as usize];
    let pos = node.position();
    let to_move = node.to_move;
    let legal: Vec<Bitboard> = pos.legal_moves().collect();
    if legal.is_empty() {
        return None;
    }

    let existing: Vec<Bitboard> = node.children[..node.child_count as usize]
        .iter()
        .map(|&c| {
            let child = arena.nodes[c as usize];
            Bitboard::new(child.board_of(to_move).inner() ^ pos.board_of(to_move).inner())
        })
        .collect();

    let n = legal.len();
    let start = rng.below(n as u32) as usize;
    let mv = (0..n).map(|i| legal[(start + i) % n]).find(|mv| !existing.contains(mv))?;

    let child_pos = pos.apply_move(to_move, mv);
    let outcome = if child_pos.wins_through(to_move, mv) {
        match to_move {
            Side::Black => Outcome::BlackWin,
            Side::White => Outcome::WhiteWin,
        }
    } else if child_pos.legal_mask().is_empty() {
        Outcome::Draw
    } else {
        Outcome::Ongoing
    };

    let child = Node {
        black: child_pos.black,
        white: child_pos.white,
        parent: idx,
        to_move: !to_move,
        outcome,
        visits: 0,
        reward: 0.0,
        children: [NONE; MAX_CHILDREN],
        child_count: 0,
    };
    let child_idx = arena.push(child)?;
    let parent = &mut arena.nodes[idx as usize];
    parent.children[parent.child_count as usize] = child_idx;
    parent.child_count += 1;
    Some(child_idx)
}

/// Reward in `[0, 1]` from the root player's perspective: a terminal
/// payoff if `idx` is already decided, otherwise a heuristic rollout.
fn simulate(arena: &Arena, idx: u32, root_side: Side, cfg: &ResolvedConfig, rng: &mut Rng) -> f64 {
    let node = arena.nodes[idx as usize];
    if node.outcome.is_terminal() {
        return terminal_reward(node.outcome, root_side);
    }

    let mut pos = node.position();
    let mut to_move = node.to_move;
    for _ in 0..cfg.rollout_max_depth {
        let legal: Vec<Bitboard> = pos.legal_moves().collect();
        if legal.is_empty() {
            return 0.5;
        }
        let mv = rollout_move(pos, to_move, &legal, rng);
        let next = pos.apply_move(to_move, mv);
        if next.wins_through(to_move, mv) {
            return if to_move == root_side { 1.0 } else { 0.0 };
        }
        pos = next;
        to_move = !to_move;
    }

    let s = evaluate(pos, root_side) as f64;
    (0.5 + 0.25 * (s / 20.0).tanh()).clamp(0.0, 1.0)
}

fn terminal_reward(outcome: Outcome, root_side: Side) -> f64 {
    match outcome {
        Outcome::Draw => 0.5,
        Outcome::BlackWin => if root_side == Side::Black { 1.0 } else { 0.0 },
        Outcome::WhiteWin => if root_side == Side::White { 1.0 } else { 0.0 },
        Outcome::Ongoing => unreachable!("simulate called on a non-terminal node without Ongoing handling"),
    }
}

/// Rollout policy: take an immediate win, else block an immediate
/// opponent win, else play uniformly at random.
fn rollout_move(pos: Position, to_move: Side, legal: &[Bitboard], rng: &mut Rng) -> Bitboard {
    for &mv in legal {
        if pos.apply_move(to_move, mv).wins_through(to_move, mv) {
            return mv;
        }
    }
    let opponent = !to_move;
    for &mv in legal {
        if pos.apply_move(opponent, mv).wins_through(opponent, mv) {
            return mv;
        }
    }
    legal[rng.below(legal.len() as u32) as usize]
}

fn backpropagate(arena: &mut Arena, mut idx: u32, reward: f64) {
    loop {
        let node = &mut arena.nodes[idx as usize];
        node.visits += 1;
        node.reward += reward;
        if node.parent == NONE {
            return;
        }
        idx = node.parent;
    }
}

/// Sum this worker's root children into per-move visit/reward totals,
/// identifying each child's move by XORing its board against the root's.
fn root_totals(arena: &Arena, legal_root_moves: &[Bitboard], root_side: Side) -> WorkerTotals {
    let mut totals = WorkerTotals::empty(legal_root_moves.len());
    let root = arena.nodes[0];
    let root_board = root.board_of(root_side);
    for &child_idx in &root.children[..root.child_count as usize] {
        let child = arena.nodes[child_idx as usize];
        let mv = Bitboard::new(child.board_of(root_side).inner() ^ root_board.inner());
        if let Some(i) = legal_root_moves.iter().position(|&m| m == mv) {
            totals.visits[i] = child.visits as f64;
            totals.wins[i] = child.reward;
        }
    }
    totals
}
