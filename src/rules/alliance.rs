//! Alliance constraints and match shaping

use serde::{Deserialize, Serialize};

/// Bounds on tickets and players combined into one match
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllianceRule {
    /// Minimum number of tickets per match
    #[serde(default)]
    pub min_number: usize,
    /// Maximum number of tickets per match
    #[serde(default)]
    pub max_number: usize,
    /// Minimum total players per match
    #[serde(default)]
    pub player_min_number: usize,
    /// Maximum total players per match
    #[serde(default)]
    pub player_max_number: usize,
}

impl AllianceRule {
    pub fn new(
        min_number: usize,
        max_number: usize,
        player_min_number: usize,
        player_max_number: usize,
    ) -> Self {
        Self {
            min_number,
            max_number,
            player_min_number,
            player_max_number,
        }
    }

    /// Tickets per group for the fixed-size shapers
    pub fn group_size(&self) -> usize {
        self.max_number.max(2)
    }
}

/// Match shaping policy carried by a rule set
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchShape {
    /// Greedy size-bucketed building bounded by player counts
    #[default]
    Bucketed,
    /// Fixed groups of tickets in arrival order, one team per match
    Pairwise,
    /// Fixed groups of tickets in arrival order, one team per ticket
    TwoTeam,
}

impl std::fmt::Display for MatchShape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchShape::Bucketed => write!(f, "bucketed"),
            MatchShape::Pairwise => write!(f, "pairwise"),
            MatchShape::TwoTeam => write!(f, "two_team"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_size_never_below_two() {
        assert_eq!(AllianceRule::new(0, 0, 0, 4).group_size(), 2);
        assert_eq!(AllianceRule::new(0, 1, 0, 4).group_size(), 2);
        assert_eq!(AllianceRule::new(0, 3, 0, 4).group_size(), 3);
    }

    #[test]
    fn test_shape_defaults_to_bucketed() {
        assert_eq!(MatchShape::default(), MatchShape::Bucketed);
        let shape: MatchShape = serde_json::from_str("\"two_team\"").unwrap();
        assert_eq!(shape, MatchShape::TwoTeam);
    }
}
