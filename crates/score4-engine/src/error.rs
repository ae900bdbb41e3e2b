//! Configuration errors surfaced before a game starts.

/// A configuration error: always a programmer/user mistake discovered
/// before any search runs. The only fallible surface in this workspace —
/// everything downstream of a validated [`crate::Agent`] is infallible.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// An agent tag the dispatcher does not recognize.
    #[error("unknown agent tag: \"{tag}\"")]
    UnknownAgentTag {
        /// The offending tag as given on the command line.
        tag: String,
    },
    /// The alpha-beta agent (`m`) was selected without a positive depth.
    #[error("alpha-beta agent requires a depth > 0")]
    MissingDepth,
    /// The MCTS agent (`c`) was selected without an iteration or time budget.
    #[error("mcts agent requires --mcts-iterations > 0 or --mcts-time-ms > 0")]
    NoMctsBudget,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_tag_display() {
        let err = ConfigError::UnknownAgentTag { tag: "z".to_string() };
        assert_eq!(format!("{err}"), "unknown agent tag: \"z\"");
    }

    #[test]
    fn missing_depth_display() {
        assert_eq!(format!("{}", ConfigError::MissingDepth), "alpha-beta agent requires a depth > 0");
    }

    #[test]
    fn no_budget_display() {
        assert_eq!(
            format!("{}", ConfigError::NoMctsBudget),
            "mcts agent requires --mcts-iterations > 0 or --mcts-time-ms > 0"
        );
    }
}
