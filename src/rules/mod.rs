//! Rule sets that drive ticket validation and match building
//!
//! A rule set is parsed once per call from its JSON payload. Every variant
//! wraps an [`AllianceRule`] and may add discriminating fields.

pub mod alliance;
pub mod crew;
pub mod game;

pub use alliance::{AllianceRule, MatchShape};
pub use crew::CrewRules;
pub use game::GameRules;

use crate::types::MatcherKind;

/// Common view over every rule set type
pub trait MatchRules: Clone + Send + Sync + 'static {
    /// Alliance constraints for matches built under these rules
    fn alliance_rule(&self) -> &AllianceRule;

    /// How tickets are grouped into matches
    fn shape(&self) -> MatchShape;
}

/// Rule set tagged with the matcher kind it was parsed for
#[derive(Debug, Clone, PartialEq)]
pub enum RuleSet {
    Base(GameRules),
    Game(GameRules),
    Crew(CrewRules),
}

impl RuleSet {
    /// Matcher kind these rules were parsed for
    pub fn kind(&self) -> MatcherKind {
        match self {
            RuleSet::Base(_) => MatcherKind::Base,
            RuleSet::Game(_) => MatcherKind::Game,
            RuleSet::Crew(_) => MatcherKind::Crew,
        }
    }

    pub fn alliance_rule(&self) -> &AllianceRule {
        match self {
            RuleSet::Base(rules) | RuleSet::Game(rules) => rules.alliance_rule(),
            RuleSet::Crew(rules) => rules.alliance_rule(),
        }
    }
}
