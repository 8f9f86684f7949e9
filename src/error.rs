//! Error types for the match function
//!
//! Engine operations return [`MatchResult`] so callers can branch on the
//! failure kind. Application wiring (config, CLI) uses anyhow through
//! [`Result`].

/// Result type alias for application-level code
pub type Result<T> = anyhow::Result<T>;

/// Result type alias for matching engine operations
pub type MatchResult<T> = std::result::Result<T, MatchmakingError>;

/// Custom error types for specific matchmaking scenarios
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MatchmakingError {
    #[error("Invalid rules type: expected {expected} rules, got {actual} rules")]
    InvalidRuleType { expected: String, actual: String },

    #[error("Ticket constraint violated: {reason}")]
    ConstraintViolation { reason: String },

    #[error("Malformed rules payload: {reason}")]
    MalformedRules { reason: String },

    #[error("Configuration error: {message}")]
    ConfigurationError { message: String },

    #[error("Internal service error: {message}")]
    InternalError { message: String },
}

impl MatchmakingError {
    /// Shorthand for a constraint violation with the given reason
    pub fn constraint(reason: impl Into<String>) -> Self {
        Self::ConstraintViolation {
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = MatchmakingError::InvalidRuleType {
            expected: "crew".to_string(),
            actual: "game".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid rules type: expected crew rules, got game rules"
        );

        let err = MatchmakingError::constraint("too many players");
        assert_eq!(err.to_string(), "Ticket constraint violated: too many players");
    }

    #[test]
    fn test_converts_into_anyhow() {
        let err: anyhow::Error = MatchmakingError::MalformedRules {
            reason: "eof".to_string(),
        }
        .into();
        assert!(matches!(
            err.downcast_ref::<MatchmakingError>(),
            Some(MatchmakingError::MalformedRules { .. })
        ));
    }
}
