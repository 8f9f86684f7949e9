//! Rules for the base and game matchers

use super::{AllianceRule, MatchRules, MatchShape};
use serde::{Deserialize, Serialize};

fn default_spawn_location_count() -> u32 {
    4
}

/// Game pool rules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameRules {
    #[serde(rename = "alliance", default)]
    pub alliance_rule: AllianceRule,
    #[serde(default)]
    pub shape: MatchShape,
    /// Reject tickets without a non-zero `spawnLocation` attribute
    #[serde(rename = "requireSpawnLocation", default)]
    pub require_spawn_location: bool,
    /// Spawn locations are drawn from `1..=spawn_location_count`
    #[serde(rename = "spawnLocationCount", default = "default_spawn_location_count")]
    pub spawn_location_count: u32,
}

impl GameRules {
    pub fn new(alliance_rule: AllianceRule) -> Self {
        Self {
            alliance_rule,
            shape: MatchShape::default(),
            require_spawn_location: false,
            spawn_location_count: default_spawn_location_count(),
        }
    }

    pub fn with_shape(mut self, shape: MatchShape) -> Self {
        self.shape = shape;
        self
    }
}

impl MatchRules for GameRules {
    fn alliance_rule(&self) -> &AllianceRule {
        &self.alliance_rule
    }

    fn shape(&self) -> MatchShape {
        self.shape
    }
}
