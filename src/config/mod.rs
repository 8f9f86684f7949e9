//! Configuration management for the match function
//!
//! Loads configuration from environment variables or a TOML file and
//! validates it before the service starts.

pub mod app;

pub use app::{validate_config, AppConfig, MatchmakingSettings, ServiceSettings};
