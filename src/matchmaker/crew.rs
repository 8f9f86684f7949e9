//! Crew matcher
//!
//! Builds crews out of tickets queued as the pool's `queAsType`, tagging
//! every ticket as a mercenary crew.

use crate::error::{MatchResult, MatchmakingError};
use crate::matchmaker::logic::MatchLogic;
use crate::rules::CrewRules;
use crate::types::{MatcherKind, Ticket};
use rand::Rng;
use serde_json::{json, Value};
use tracing::{debug, info, warn};

pub const CREW_TYPE_KEY: &str = "crewType";
pub const QUE_AS_TYPE_KEY: &str = "queAsType";

/// Crew type assigned by enrichment
pub const CREW_TYPE: &str = "mercenary";

#[derive(Debug, Clone, Copy, Default)]
pub struct CrewMatchmaker;

impl CrewMatchmaker {
    pub fn new() -> Self {
        Self
    }
}

impl MatchLogic for CrewMatchmaker {
    type Rules = CrewRules;

    const KIND: MatcherKind = MatcherKind::Crew;

    fn validate_ticket(&self, ticket: &Ticket, rules: &CrewRules) -> MatchResult<bool> {
        let max = rules.alliance_rule.player_max_number;
        if ticket.player_count() > max {
            warn!(matcher = %Self::KIND, ticket_id = %ticket.ticket_id, players = ticket.player_count(), max, "Too many players on ticket");
            return Err(MatchmakingError::constraint(format!(
                "max number of players exceeded, player count {}, max {}",
                ticket.player_count(),
                max
            )));
        }

        if !rules.que_as_type.is_empty() {
            let que_as = ticket
                .ticket_attributes
                .get(QUE_AS_TYPE_KEY)
                .and_then(Value::as_str);
            if que_as != Some(rules.que_as_type.as_str()) {
                return Err(MatchmakingError::constraint(format!(
                    "player on ticket is not a queAsType {}",
                    rules.que_as_type
                )));
            }
        }

        info!(matcher = %Self::KIND, ticket_id = %ticket.ticket_id, "Ticket validation successful");
        Ok(true)
    }

    fn enrich_ticket<R: Rng>(
        &self,
        mut ticket: Ticket,
        _rules: &CrewRules,
        _rng: &mut R,
    ) -> MatchResult<Ticket> {
        if ticket.ticket_attributes.is_empty() {
            debug!(matcher = %Self::KIND, ticket_id = %ticket.ticket_id, "Ticket attributes are empty, adding some");
        }
        ticket
            .ticket_attributes
            .insert(CREW_TYPE_KEY.to_string(), json!(CREW_TYPE));

        info!(
            matcher = %Self::KIND,
            ticket_id = %ticket.ticket_id,
            attributes = ?ticket.ticket_attributes,
            "Enriched ticket"
        );
        Ok(ticket)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::AllianceRule;
    use crate::types::Player;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn crew_rules(que_as_type: &str) -> CrewRules {
        let mut rules = CrewRules::new(AllianceRule::new(0, 2, 0, 1));
        rules.que_as_type = que_as_type.to_string();
        rules
    }

    #[test]
    fn test_rejects_multi_player_tickets() {
        let ticket = Ticket::new("t", vec![Player::new("p1"), Player::new("p2")]);
        let err = CrewMatchmaker
            .validate_ticket(&ticket, &crew_rules(""))
            .unwrap_err();
        assert!(matches!(err, MatchmakingError::ConstraintViolation { .. }));
    }

    #[test]
    fn test_que_as_type_must_match() {
        let rules = crew_rules("pilot");

        let pilot = Ticket::new("a", vec![Player::new("p1")])
            .with_attribute(QUE_AS_TYPE_KEY, json!("pilot"));
        assert!(CrewMatchmaker.validate_ticket(&pilot, &rules).unwrap());

        let gunner = Ticket::new("b", vec![Player::new("p2")])
            .with_attribute(QUE_AS_TYPE_KEY, json!("gunner"));
        let err = CrewMatchmaker.validate_ticket(&gunner, &rules).unwrap_err();
        assert!(err.to_string().contains("queAsType pilot"));

        let missing = Ticket::new("c", vec![Player::new("p3")]);
        assert!(CrewMatchmaker.validate_ticket(&missing, &rules).is_err());
    }

    #[test]
    fn test_enrich_tags_mercenary() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let ticket = Ticket::new("a", vec![Player::new("p1")]).with_attribute("x", json!(1));

        let enriched = CrewMatchmaker
            .enrich_ticket(ticket, &crew_rules(""), &mut rng)
            .unwrap();
        assert_eq!(enriched.ticket_attributes["x"], json!(1));
        assert_eq!(enriched.ticket_attributes[CREW_TYPE_KEY], json!("mercenary"));
    }
}
