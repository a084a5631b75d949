use crate::types::{Phase, PlayerId};

/// Result type for session engine operations
pub type EngineResult<T> = Result<T, EngineError>;

/// Rejected intents. None of these are fatal: the session is left exactly as
/// it was before the call.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EngineError {
    #[error("Need at least {required} players, have {actual}")]
    InsufficientPlayers { required: usize, actual: usize },

    #[error("No category selected")]
    NoCategorySelected,

    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    #[error("Category '{0}' has no word pairs")]
    EmptyCategory(String),

    #[error("Invalid vote: {0}")]
    InvalidVote(String),

    #[error("Cannot {action} during {phase:?} phase")]
    PhaseViolation { action: &'static str, phase: Phase },

    #[error("Invalid player name: {0}")]
    InvalidPlayerName(String),

    #[error("Player not found: {0}")]
    PlayerNotFound(PlayerId),

    #[error("Invalid settings: {0}")]
    InvalidSettings(String),
}

impl EngineError {
    /// Stable code for the wire protocol
    pub fn code(&self) -> &'static str {
        match self {
            EngineError::InsufficientPlayers { .. } => "INSUFFICIENT_PLAYERS",
            EngineError::NoCategorySelected => "NO_CATEGORY_SELECTED",
            EngineError::UnknownCategory(_) => "UNKNOWN_CATEGORY",
            EngineError::EmptyCategory(_) => "EMPTY_CATEGORY",
            EngineError::InvalidVote(_) => "INVALID_VOTE",
            EngineError::PhaseViolation { .. } => "PHASE_VIOLATION",
            EngineError::InvalidPlayerName(_) => "INVALID_PLAYER_NAME",
            EngineError::PlayerNotFound(_) => "PLAYER_NOT_FOUND",
            EngineError::InvalidSettings(_) => "INVALID_SETTINGS",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = EngineError::InsufficientPlayers {
            required: 3,
            actual: 2,
        };
        assert_eq!(err.to_string(), "Need at least 3 players, have 2");
        assert_eq!(err.code(), "INSUFFICIENT_PLAYERS");

        let err = EngineError::PhaseViolation {
            action: "submit votes",
            phase: Phase::Setup,
        };
        assert_eq!(err.to_string(), "Cannot submit votes during Setup phase");
        assert_eq!(err.code(), "PHASE_VIOLATION");
    }
}
