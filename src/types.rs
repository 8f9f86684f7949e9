//! Common types used throughout the match function

use crate::error::MatchmakingError;
use crate::utils::current_timestamp;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::str::FromStr;

/// Unique identifier for players
pub type PlayerId = String;

/// Unique identifier for match tickets
pub type TicketId = String;

/// Attribute mapping carried by tickets, players and matches
pub type Attributes = serde_json::Map<String, Value>;

/// Matcher variant selected by the pool configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatcherKind {
    Base,
    Game,
    Crew,
}

impl std::fmt::Display for MatcherKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatcherKind::Base => write!(f, "base"),
            MatcherKind::Game => write!(f, "game"),
            MatcherKind::Crew => write!(f, "crew"),
        }
    }
}

impl FromStr for MatcherKind {
    type Err = MatchmakingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "base" => Ok(MatcherKind::Base),
            "game" => Ok(MatcherKind::Game),
            "crew" => Ok(MatcherKind::Crew),
            other => Err(MatchmakingError::ConfigurationError {
                message: format!("Unknown matcher kind: {}", other),
            }),
        }
    }
}

/// A player placed on a ticket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub player_id: PlayerId,
    #[serde(default, skip_serializing_if = "Attributes::is_empty")]
    pub attributes: Attributes,
}

impl Player {
    pub fn new(player_id: impl Into<PlayerId>) -> Self {
        Self {
            player_id: player_id.into(),
            attributes: Attributes::new(),
        }
    }
}

/// A request to be matched, holding one or more players
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ticket {
    pub ticket_id: TicketId,
    #[serde(default)]
    pub match_pool: String,
    #[serde(default = "current_timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub players: Vec<Player>,
    #[serde(default)]
    pub ticket_attributes: Attributes,
    /// Round-trip latency in milliseconds, keyed by region
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub latencies: BTreeMap<String, i64>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub party_session_id: String,
}

impl Ticket {
    /// Create a ticket with the given players and no attributes
    pub fn new(ticket_id: impl Into<TicketId>, players: Vec<Player>) -> Self {
        Self {
            ticket_id: ticket_id.into(),
            match_pool: String::new(),
            created_at: current_timestamp(),
            players,
            ticket_attributes: Attributes::new(),
            latencies: BTreeMap::new(),
            party_session_id: String::new(),
        }
    }

    /// Builder-style attribute setter
    pub fn with_attribute(mut self, key: impl Into<String>, value: Value) -> Self {
        self.ticket_attributes.insert(key.into(), value);
        self
    }

    /// Number of players on this ticket
    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    /// Player IDs in ticket order
    pub fn player_ids(&self) -> impl Iterator<Item = &PlayerId> + '_ {
        self.players.iter().map(|p| &p.player_id)
    }
}

/// One side of a match, or the sole group in a free-for-all match
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Team {
    pub user_ids: Vec<PlayerId>,
}

/// A finalized grouping of tickets into teams
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub tickets: Vec<Ticket>,
    pub teams: Vec<Team>,
    #[serde(default, skip_serializing_if = "Attributes::is_empty")]
    pub match_attributes: Attributes,
    #[serde(default)]
    pub region_preference: Vec<String>,
}

impl Match {
    /// Total players across every ticket in the match
    pub fn total_players(&self) -> usize {
        self.tickets.iter().map(Ticket::player_count).sum()
    }

    /// Ticket IDs in consumption order
    pub fn ticket_ids(&self) -> Vec<&str> {
        self.tickets.iter().map(|t| t.ticket_id.as_str()).collect()
    }
}
