//! Search and evaluation for Score Four: the static evaluator, the two
//! move-choosing agents, and the dispatcher the driver calls each turn.

pub mod dispatch;
pub mod error;
pub mod eval;
pub mod rng;
pub mod search;

pub use dispatch::Agent;
pub use error::ConfigError;
pub use eval::evaluate;
pub use rng::Rng;
pub use search::{AlphaBetaConfig, MctsConfig};
