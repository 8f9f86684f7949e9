//! Base matcher: accepts every ticket and tags it with a fixed score

use crate::error::MatchResult;
use crate::matchmaker::logic::MatchLogic;
use crate::rules::GameRules;
use crate::types::{MatcherKind, Ticket};
use rand::Rng;
use serde_json::json;
use tracing::{debug, info};

/// Attribute written by base enrichment
pub const ENRICHED_NUMBER_KEY: &str = "enrichedNumber";

/// Score assigned by enrichment
pub const ENRICHED_SCORE: f64 = 20.0;

#[derive(Debug, Clone, Copy, Default)]
pub struct BaseMatchmaker;

impl BaseMatchmaker {
    pub fn new() -> Self {
        Self
    }
}

impl MatchLogic for BaseMatchmaker {
    type Rules = GameRules;

    const KIND: MatcherKind = MatcherKind::Base;

    fn validate_ticket(&self, ticket: &Ticket, _rules: &GameRules) -> MatchResult<bool> {
        info!(matcher = %Self::KIND, ticket_id = %ticket.ticket_id, "Ticket validation successful");
        Ok(true)
    }

    fn enrich_ticket<R: Rng>(
        &self,
        mut ticket: Ticket,
        _rules: &GameRules,
        _rng: &mut R,
    ) -> MatchResult<Ticket> {
        if ticket.ticket_attributes.is_empty() {
            debug!(matcher = %Self::KIND, ticket_id = %ticket.ticket_id, "Ticket attributes are empty, adding some");
        }
        ticket
            .ticket_attributes
            .insert(ENRICHED_NUMBER_KEY.to_string(), json!(ENRICHED_SCORE));

        info!(
            matcher = %Self::KIND,
            ticket_id = %ticket.ticket_id,
            attributes = ?ticket.ticket_attributes,
            "Enriched ticket"
        );
        Ok(ticket)
    }
}
