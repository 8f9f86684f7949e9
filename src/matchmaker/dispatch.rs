//! Closed set of matcher variants selected by pool configuration
//!
//! Rules arrive as a tagged [`RuleSet`]; each call checks the tag against
//! the matcher before handing the concrete rules to the variant.

use crate::error::{MatchResult, MatchmakingError};
use crate::matchmaker::base::BaseMatchmaker;
use crate::matchmaker::cancel::CancelSignal;
use crate::matchmaker::crew::CrewMatchmaker;
use crate::matchmaker::game::GameMatchmaker;
use crate::matchmaker::logic::{MatchLogic, MatchOptions};
use crate::matchmaker::provider::TicketProvider;
use crate::rules::RuleSet;
use crate::types::{Match, MatcherKind, Ticket};
use rand::Rng;
use tokio::sync::mpsc;
use tracing::{error, warn};

#[derive(Debug, Clone, Copy)]
pub enum Matchmaker {
    Base(BaseMatchmaker),
    Game(GameMatchmaker),
    Crew(CrewMatchmaker),
}

impl Matchmaker {
    pub fn new(kind: MatcherKind) -> Self {
        match kind {
            MatcherKind::Base => Matchmaker::Base(BaseMatchmaker),
            MatcherKind::Game => Matchmaker::Game(GameMatchmaker),
            MatcherKind::Crew => Matchmaker::Crew(CrewMatchmaker),
        }
    }

    pub fn kind(&self) -> MatcherKind {
        match self {
            Matchmaker::Base(_) => BaseMatchmaker::KIND,
            Matchmaker::Game(_) => GameMatchmaker::KIND,
            Matchmaker::Crew(_) => CrewMatchmaker::KIND,
        }
    }

    fn mismatch(&self, rules: &RuleSet) -> MatchmakingError {
        MatchmakingError::InvalidRuleType {
            expected: self.kind().to_string(),
            actual: rules.kind().to_string(),
        }
    }

    /// Parse a rule payload into this matcher's rule set
    pub fn rules_from_json(&self, json: &str) -> MatchResult<RuleSet> {
        Ok(match self {
            Matchmaker::Base(m) => RuleSet::Base(m.rules_from_json(json)?),
            Matchmaker::Game(m) => RuleSet::Game(m.rules_from_json(json)?),
            Matchmaker::Crew(m) => RuleSet::Crew(m.rules_from_json(json)?),
        })
    }

    pub fn validate_ticket(&self, ticket: &Ticket, rules: &RuleSet) -> MatchResult<bool> {
        match (self, rules) {
            (Matchmaker::Base(m), RuleSet::Base(r)) => m.validate_ticket(ticket, r),
            (Matchmaker::Game(m), RuleSet::Game(r)) => m.validate_ticket(ticket, r),
            (Matchmaker::Crew(m), RuleSet::Crew(r)) => m.validate_ticket(ticket, r),
            _ => Err(self.mismatch(rules)),
        }
    }

    pub fn enrich_ticket<R: Rng>(
        &self,
        ticket: Ticket,
        rules: &RuleSet,
        rng: &mut R,
    ) -> MatchResult<Ticket> {
        match (self, rules) {
            (Matchmaker::Base(m), RuleSet::Base(r)) => m.enrich_ticket(ticket, r, rng),
            (Matchmaker::Game(m), RuleSet::Game(r)) => m.enrich_ticket(ticket, r, rng),
            (Matchmaker::Crew(m), RuleSet::Crew(r)) => m.enrich_ticket(ticket, r, rng),
            _ => Err(self.mismatch(rules)),
        }
    }

    pub fn get_stat_codes(&self, rules: &RuleSet) -> Vec<String> {
        match (self, rules) {
            (Matchmaker::Base(m), RuleSet::Base(r)) => m.get_stat_codes(r),
            (Matchmaker::Game(m), RuleSet::Game(r)) => m.get_stat_codes(r),
            (Matchmaker::Crew(m), RuleSet::Crew(r)) => m.get_stat_codes(r),
            _ => {
                warn!(error = %self.mismatch(rules), "Stat codes requested with foreign rules");
                Vec::new()
            }
        }
    }

    pub fn make_matches<P>(
        &self,
        provider: P,
        rules: RuleSet,
        cancel: CancelSignal,
    ) -> mpsc::Receiver<Match>
    where
        P: TicketProvider + 'static,
    {
        self.make_matches_with(provider, rules, cancel, MatchOptions::default())
    }

    /// Start a matching pass; a rule set of another kind yields a closed, empty stream
    pub fn make_matches_with<P>(
        &self,
        provider: P,
        rules: RuleSet,
        cancel: CancelSignal,
        options: MatchOptions,
    ) -> mpsc::Receiver<Match>
    where
        P: TicketProvider + 'static,
    {
        match (self, rules) {
            (Matchmaker::Base(m), RuleSet::Base(r)) => {
                m.make_matches_with(provider, r, cancel, options)
            }
            (Matchmaker::Game(m), RuleSet::Game(r)) => {
                m.make_matches_with(provider, r, cancel, options)
            }
            (Matchmaker::Crew(m), RuleSet::Crew(r)) => {
                m.make_matches_with(provider, r, cancel, options)
            }
            (_, rules) => {
                error!(error = %self.mismatch(&rules), "Refusing to make matches");
                let (_tx, rx) = mpsc::channel(1);
                rx
            }
        }
    }
}

impl From<MatcherKind> for Matchmaker {
    fn from(kind: MatcherKind) -> Self {
        Self::new(kind)
    }
}
