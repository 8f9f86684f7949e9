//! Rules for the crew matcher

use super::{AllianceRule, MatchRules, MatchShape};
use serde::{Deserialize, Serialize};

/// Crew pool rules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrewRules {
    #[serde(rename = "alliance", default)]
    pub alliance_rule: AllianceRule,
    /// Required `queAsType` ticket attribute; empty accepts any
    #[serde(rename = "queAsType", default)]
    pub que_as_type: String,
    #[serde(default)]
    pub shape: MatchShape,
}

impl CrewRules {
    pub fn new(alliance_rule: AllianceRule) -> Self {
        Self {
            alliance_rule,
            que_as_type: String::new(),
            shape: MatchShape::default(),
        }
    }
}

impl MatchRules for CrewRules {
    fn alliance_rule(&self) -> &AllianceRule {
        &self.alliance_rule
    }

    fn shape(&self) -> MatchShape {
        self.shape
    }
}
