//! Fixed-size match shaping
//!
//! The pairwise and two-team policies group tickets purely by arrival order:
//! every `group_size` tickets become one match as soon as the group fills.
//! Player counts are not consulted.

use crate::types::{Attributes, Match, Team, Ticket};
use crate::utils::{any_region, single_team};
use tracing::debug;

/// How a completed group is split into teams
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grouping {
    /// Every player on one team
    SingleTeam,
    /// One team per ticket
    TeamPerTicket,
}

/// Accumulates tickets into fixed-size groups
#[derive(Debug)]
pub struct GroupShaper {
    grouping: Grouping,
    group_size: usize,
    pending: Vec<Ticket>,
}

impl GroupShaper {
    pub fn new(grouping: Grouping, group_size: usize) -> Self {
        Self {
            grouping,
            group_size: group_size.max(1),
            pending: Vec::with_capacity(group_size),
        }
    }

    /// Add a ticket, returning a match once the group is complete
    pub fn push(&mut self, ticket: Ticket) -> Option<Match> {
        self.pending.push(ticket);
        if self.pending.len() < self.group_size {
            debug!(
                pending = self.pending.len(),
                group_size = self.group_size,
                "Not enough tickets to build a match"
            );
            return None;
        }

        let tickets = std::mem::replace(&mut self.pending, Vec::with_capacity(self.group_size));
        let teams = match self.grouping {
            Grouping::TeamPerTicket => tickets
                .iter()
                .map(|t| Team {
                    user_ids: t.player_ids().cloned().collect(),
                })
                .collect(),
            Grouping::SingleTeam => vec![single_team(&tickets)],
        };

        debug!(grouping = ?self.grouping, tickets = tickets.len(), "Group complete, building match");
        Some(Match {
            tickets,
            teams,
            match_attributes: Attributes::new(),
            region_preference: any_region(),
        })
    }

    /// Tickets still waiting for a group
    pub fn pending(&self) -> &[Ticket] {
        &self.pending
    }

    /// Consume the shaper, returning the incomplete trailing group
    pub fn into_pending(self) -> Vec<Ticket> {
        self.pending
    }
}
