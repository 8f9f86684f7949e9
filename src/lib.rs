//! Match Function - rule-driven matchmaking engine
//!
//! Validates and enriches match tickets against a pool's rule set and groups
//! them into matches that respect the pool's alliance size constraints.

pub mod config;
pub mod error;
pub mod matchmaker;
pub mod metrics;
pub mod rules;
pub mod service;
pub mod types;
pub mod utils;

// Re-export commonly used types and traits
pub use error::{MatchResult, MatchmakingError, Result};
pub use types::*;

// Re-export key components
pub use matchmaker::{
    cancellation, CancelHandle, CancelSignal, ChannelTicketProvider, MatchLogic, Matchmaker,
    StaticTicketProvider, TicketProvider,
};
pub use rules::{AllianceRule, CrewRules, GameRules, MatchShape, RuleSet};
pub use service::MatchFunctionService;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
