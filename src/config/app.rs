//! Main application configuration
//!
//! Defines the configuration for the match function, loaded from environment
//! variables or a TOML file and validated before use.

use crate::matchmaker::DEFAULT_OUTPUT_BUFFER;
use crate::types::MatcherKind;
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;

/// Main application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub service: ServiceSettings,
    #[serde(default)]
    pub matchmaking: MatchmakingSettings,
}

/// Service-level settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceSettings {
    /// Service name for logging and metrics
    pub name: String,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

/// Matchmaking-specific settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchmakingSettings {
    /// Matcher variant serving this pool
    pub matcher_kind: MatcherKind,
    /// Capacity of the match output channel
    pub output_buffer: usize,
    /// Fixed seed for enrichment randomness; fresh entropy per call when unset
    pub rng_seed: Option<u64>,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            name: "match-function".to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl Default for MatchmakingSettings {
    fn default() -> Self {
        Self {
            matcher_kind: MatcherKind::Game,
            output_buffer: DEFAULT_OUTPUT_BUFFER,
            rng_seed: None,
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables with fallback to defaults
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env()?;
        validate_config(&config)?;
        Ok(config)
    }

    /// Load configuration from a TOML file, then apply environment overrides
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let mut config = Self::from_toml(&contents)?;
        config.apply_env()?;
        validate_config(&config)?;
        Ok(config)
    }

    /// Parse configuration from TOML text without consulting the environment
    pub fn from_toml(contents: &str) -> Result<Self> {
        toml::from_str(contents).map_err(|e| anyhow!("Invalid configuration file: {}", e))
    }

    fn apply_env(&mut self) -> Result<()> {
        // Service settings
        if let Ok(name) = env::var("SERVICE_NAME") {
            self.service.name = name;
        }
        if let Ok(log_level) = env::var("LOG_LEVEL") {
            self.service.log_level = log_level;
        }

        // Matchmaking settings
        if let Ok(kind) = env::var("MATCHER_KIND") {
            self.matchmaking.matcher_kind = kind
                .parse()
                .map_err(|_| anyhow!("Invalid MATCHER_KIND value: {}", kind))?;
        }
        if let Ok(buffer) = env::var("MATCH_OUTPUT_BUFFER") {
            self.matchmaking.output_buffer = buffer
                .parse()
                .map_err(|_| anyhow!("Invalid MATCH_OUTPUT_BUFFER value: {}", buffer))?;
        }
        if let Ok(seed) = env::var("MATCH_RNG_SEED") {
            self.matchmaking.rng_seed = Some(
                seed.parse()
                    .map_err(|_| anyhow!("Invalid MATCH_RNG_SEED value: {}", seed))?,
            );
        }
        Ok(())
    }
}

/// Validate configuration values
pub fn validate_config(config: &AppConfig) -> Result<()> {
    match config.service.log_level.to_lowercase().as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => {}
        _ => return Err(anyhow!("Invalid log level: {}", config.service.log_level)),
    }

    if config.service.name.is_empty() {
        return Err(anyhow!("Service name cannot be empty"));
    }

    if config.matchmaking.output_buffer == 0 {
        return Err(anyhow!("Match output buffer must be greater than 0"));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = AppConfig::default();
        assert!(validate_config(&config).is_ok());
        assert_eq!(config.matchmaking.matcher_kind, MatcherKind::Game);
        assert_eq!(config.matchmaking.output_buffer, 1);
        assert!(config.matchmaking.rng_seed.is_none());
    }

    #[test]
    fn test_invalid_log_level() {
        let mut config = AppConfig::default();
        config.service.log_level = "loud".to_string();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_zero_output_buffer() {
        let mut config = AppConfig::default();
        config.matchmaking.output_buffer = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_from_toml_fills_missing_sections() {
        let config = AppConfig::from_toml(
            r#"
            [matchmaking]
            matcher_kind = "crew"
            rng_seed = 42
            "#,
        )
        .unwrap();

        assert_eq!(config.matchmaking.matcher_kind, MatcherKind::Crew);
        assert_eq!(config.matchmaking.rng_seed, Some(42));
        assert_eq!(config.matchmaking.output_buffer, DEFAULT_OUTPUT_BUFFER);
        assert_eq!(config.service, ServiceSettings::default());
    }

    #[test]
    fn test_from_toml_rejects_unknown_kind() {
        assert!(AppConfig::from_toml("[matchmaking]\nmatcher_kind = \"ranked\"\n").is_err());
    }
}
