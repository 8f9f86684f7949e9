//! Utility functions for the match function

use crate::types::{PlayerId, Team, Ticket};
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Region preference attached to matches that do not pin a region
pub const ANY_REGION: &str = "any";

/// Generate a new unique ticket ID
pub fn generate_ticket_id() -> String {
    Uuid::new_v4().to_string()
}

/// Get the current UTC timestamp
pub fn current_timestamp() -> DateTime<Utc> {
    Utc::now()
}

/// Collect every player ID across the tickets, in ticket order
pub fn collect_player_ids(tickets: &[Ticket]) -> Vec<PlayerId> {
    tickets
        .iter()
        .flat_map(|t| t.player_ids().cloned())
        .collect()
}

/// One team holding every player of the given tickets
pub fn single_team(tickets: &[Ticket]) -> Team {
    Team {
        user_ids: collect_player_ids(tickets),
    }
}

/// Default region preference for new matches
pub fn any_region() -> Vec<String> {
    vec![ANY_REGION.to_string()]
}
