mod board_display;
mod cli;
mod driver;

use anyhow::Result;
use score4_engine::Agent;
use tracing::info;

use cli::PlayerSpec;
use driver::{MatchConfig, Player};

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    info!("score4 starting");

    let args: Vec<String> = std::env::args().skip(1).collect();
    let parsed = cli::parse(&args)?;

    let black = build_player(&parsed.player1)?;
    let white = build_player(&parsed.player2)?;

    let cfg = MatchConfig { black, white, show_board: parsed.show_board, show_result: parsed.show_result };
    driver::play(cfg);
    Ok(())
}

fn build_player(spec: &PlayerSpec) -> Result<Player> {
    if spec.tag == "h" {
        return Ok(Player::Human);
    }
    let agent = Agent::from_tag(&spec.tag, spec.depth, spec.mcts, spec.mcts.seed)?;
    Ok(Player::Agent(agent))
}
