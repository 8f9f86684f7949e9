//! Game matcher
//!
//! Rejects tickets carrying more players than a match can hold and, when
//! the pool asks for it, tickets without a spawn location. Enrichment
//! assigns a fixed MMR and fills in a random spawn location.

use crate::error::{MatchResult, MatchmakingError};
use crate::matchmaker::base::ENRICHED_SCORE;
use crate::matchmaker::logic::MatchLogic;
use crate::rules::GameRules;
use crate::types::{Attributes, MatcherKind, Ticket};
use rand::Rng;
use serde_json::{json, Value};
use tracing::{debug, info, warn};

pub const GAME_MMR_KEY: &str = "gameMMR";
pub const SPAWN_LOCATION_KEY: &str = "spawnLocation";

#[derive(Debug, Clone, Copy, Default)]
pub struct GameMatchmaker;

impl GameMatchmaker {
    pub fn new() -> Self {
        Self
    }
}

fn spawn_location(attributes: &Attributes) -> Option<f64> {
    attributes.get(SPAWN_LOCATION_KEY).and_then(Value::as_f64)
}

impl MatchLogic for GameMatchmaker {
    type Rules = GameRules;

    const KIND: MatcherKind = MatcherKind::Game;

    fn validate_ticket(&self, ticket: &Ticket, rules: &GameRules) -> MatchResult<bool> {
        let max = rules.alliance_rule.player_max_number;
        if ticket.player_count() > max {
            warn!(matcher = %Self::KIND, ticket_id = %ticket.ticket_id, players = ticket.player_count(), max, "Too many players on ticket");
            return Err(MatchmakingError::constraint(format!(
                "too many players on the ticket, player count {}, max is {}",
                ticket.player_count(),
                max
            )));
        }

        if rules.require_spawn_location {
            match spawn_location(&ticket.ticket_attributes) {
                Some(location) if location != 0.0 => {}
                Some(_) => {
                    return Err(MatchmakingError::constraint(
                        "spawnLocation must be non-zero",
                    ))
                }
                None => {
                    return Err(MatchmakingError::constraint(
                        "ticket is missing a numeric spawnLocation",
                    ))
                }
            }
        }

        info!(matcher = %Self::KIND, ticket_id = %ticket.ticket_id, "Ticket validation successful");
        Ok(true)
    }

    fn enrich_ticket<R: Rng>(
        &self,
        mut ticket: Ticket,
        rules: &GameRules,
        rng: &mut R,
    ) -> MatchResult<Ticket> {
        if ticket.ticket_attributes.is_empty() {
            debug!(matcher = %Self::KIND, ticket_id = %ticket.ticket_id, "Ticket attributes are empty, adding some");
        }

        let attributes = &mut ticket.ticket_attributes;
        attributes.insert(GAME_MMR_KEY.to_string(), json!(ENRICHED_SCORE));

        let has_location = spawn_location(attributes).is_some_and(|l| l != 0.0);
        if !has_location && rules.spawn_location_count > 0 {
            let location = rng.gen_range(1..=rules.spawn_location_count);
            attributes.insert(SPAWN_LOCATION_KEY.to_string(), json!(location));
        }

        info!(
            matcher = %Self::KIND,
            ticket_id = %ticket.ticket_id,
            attributes = ?ticket.ticket_attributes,
            "Enriched ticket"
        );
        Ok(ticket)
    }
}
