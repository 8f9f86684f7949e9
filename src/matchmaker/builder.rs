//! Greedy bucketed match building
//!
//! Each match starts from a root ticket taken from the largest bucket that
//! fits under `player_max_number`, then keeps pulling the largest ticket that
//! fits the remaining capacity until nothing fits or the match holds
//! `max_number` tickets. The match is emitted if it reaches both
//! `player_min_number` and `min_number`; otherwise its tickets are dropped
//! and building stops. A `max_number` of zero leaves the ticket count
//! unbounded.

use crate::matchmaker::queue::TicketQueue;
use crate::rules::AllianceRule;
use crate::types::{Attributes, Match, Ticket};
use crate::utils::{any_region, single_team};
use tracing::{debug, info};

/// Iterator over the matches that can be built from a drained queue
#[derive(Debug)]
pub struct MatchBuilder<'q> {
    queue: &'q mut TicketQueue,
    rule: AllianceRule,
    dropped: Vec<Ticket>,
    finished: bool,
}

impl<'q> MatchBuilder<'q> {
    pub fn new(queue: &'q mut TicketQueue, rule: AllianceRule) -> Self {
        Self {
            queue,
            rule,
            dropped: Vec::new(),
            finished: false,
        }
    }

    /// Tickets discarded as an undersized remainder
    pub fn dropped(&self) -> &[Ticket] {
        &self.dropped
    }

    /// Consume the builder, returning the dropped tickets
    pub fn into_dropped(self) -> Vec<Ticket> {
        self.dropped
    }

    fn ticket_limit_reached(&self, count: usize) -> bool {
        self.rule.max_number > 0 && count >= self.rule.max_number
    }

    fn build_next(&mut self) -> Option<Match> {
        let max = self.rule.player_max_number;

        let Some(root) = self.queue.pop_at_most(max) else {
            debug!(
                remaining = self.queue.len(),
                "No eligible root ticket, match building finished"
            );
            return None;
        };

        let mut remaining = max - root.player_count();
        let mut tickets = vec![root];

        while remaining > 0 && !self.ticket_limit_reached(tickets.len()) {
            match self.queue.pop_at_most(remaining) {
                Some(ticket) => {
                    remaining -= ticket.player_count();
                    tickets.push(ticket);
                }
                None => break,
            }
        }

        let total = max - remaining;
        if total < self.rule.player_min_number || tickets.len() < self.rule.min_number {
            info!(
                tickets = tickets.len(),
                players = total,
                player_min_number = self.rule.player_min_number,
                min_number = self.rule.min_number,
                "Dropping undersized remainder, no further matches possible"
            );
            self.dropped.extend(tickets);
            return None;
        }

        debug!(
            tickets = tickets.len(),
            players = total,
            "Built match from bucketed tickets"
        );

        let team = single_team(&tickets);
        Some(Match {
            tickets,
            teams: vec![team],
            match_attributes: Attributes::new(),
            region_preference: any_region(),
        })
    }
}

impl Iterator for MatchBuilder<'_> {
    type Item = Match;

    fn next(&mut self) -> Option<Match> {
        if self.finished {
            return None;
        }
        let next = self.build_next();
        if next.is_none() {
            self.finished = true;
        }
        next
    }
}

/// Build every match from `queue`, returning the matches and the dropped tickets
pub fn build_all(queue: &mut TicketQueue, rule: AllianceRule) -> (Vec<Match>, Vec<Ticket>) {
    let mut builder = MatchBuilder::new(queue, rule);
    let matches: Vec<Match> = builder.by_ref().collect();
    (matches, builder.into_dropped())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Player;

    fn ticket(id: &str, players: usize) -> Ticket {
        let players = (0..players)
            .map(|i| Player::new(format!("{}-p{}", id, i)))
            .collect();
        Ticket::new(id, players)
    }

    fn queue_of(sizes: &[(&str, usize)]) -> TicketQueue {
        sizes.iter().map(|(id, n)| ticket(id, *n)).collect()
    }

    #[test]
    fn test_two_pairs_fill_capacity_and_single_is_dropped() {
        let mut queue = queue_of(&[("a", 2), ("b", 2), ("c", 1)]);
        let (matches, dropped) = build_all(&mut queue, AllianceRule::new(0, 0, 3, 4));

        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].ticket_ids(), vec!["a", "b"]);
        assert_eq!(matches[0].total_players(), 4);
        assert_eq!(dropped.len(), 1);
        assert_eq!(dropped[0].ticket_id, "c");
        assert!(queue.is_empty());
    }

    #[test]
    fn test_single_team_concatenates_players_in_ticket_order() {
        let mut queue = queue_of(&[("a", 1), ("b", 2)]);
        let (matches, _) = build_all(&mut queue, AllianceRule::new(0, 0, 0, 3));

        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].ticket_ids(), vec!["b", "a"]);
        assert_eq!(matches[0].teams.len(), 1);
        assert_eq!(matches[0].teams[0].user_ids, vec!["b-p0", "b-p1", "a-p0"]);
        assert_eq!(matches[0].region_preference, vec!["any"]);
    }

    #[test]
    fn test_oversized_tickets_are_never_selected() {
        let mut queue = queue_of(&[("huge", 5), ("a", 2), ("b", 2)]);
        let (matches, dropped) = build_all(&mut queue, AllianceRule::new(0, 0, 2, 4));

        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].ticket_ids(), vec!["a", "b"]);
        assert!(dropped.is_empty());
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.bucket_len(5), 1);
    }

    #[test]
    fn test_partial_match_meeting_minimum_is_accepted() {
        let mut queue = queue_of(&[("a", 3), ("b", 3), ("c", 3)]);
        let (matches, dropped) = build_all(&mut queue, AllianceRule::new(0, 0, 3, 4));

        assert_eq!(matches.len(), 3);
        for m in &matches {
            assert_eq!(m.total_players(), 3);
        }
        assert!(dropped.is_empty());
    }

    #[test]
    fn test_undersized_remainder_stops_building() {
        // The 3-player root cannot be topped up to the minimum, and building
        // stops there even though the two 2-player tickets would fit together.
        let mut queue = queue_of(&[("a", 3), ("b", 2), ("c", 2)]);
        let (matches, dropped) = build_all(&mut queue, AllianceRule::new(0, 0, 4, 4));

        assert!(matches.is_empty());
        assert_eq!(dropped.len(), 1);
        assert_eq!(dropped[0].ticket_id, "a");
        assert_eq!(queue.len(), 2);
    }

    #[test]
    fn test_builder_is_fused_after_finishing() {
        let mut queue = queue_of(&[("a", 1)]);
        let mut builder = MatchBuilder::new(&mut queue, AllianceRule::new(0, 0, 2, 2));

        assert!(builder.next().is_none());
        assert!(builder.next().is_none());
        assert_eq!(builder.dropped().len(), 1);
    }

    #[test]
    fn test_max_number_caps_tickets_per_match() {
        let mut queue = queue_of(&[("a", 1), ("b", 1), ("c", 1), ("d", 1)]);
        let (matches, dropped) = build_all(&mut queue, AllianceRule::new(0, 2, 0, 8));

        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].ticket_ids(), vec!["a", "b"]);
        assert_eq!(matches[1].ticket_ids(), vec!["c", "d"]);
        assert!(dropped.is_empty());
    }

    #[test]
    fn test_zero_max_number_leaves_ticket_count_open() {
        let mut queue = queue_of(&[("a", 1), ("b", 1), ("c", 1), ("d", 1)]);
        let (matches, _) = build_all(&mut queue, AllianceRule::new(0, 0, 0, 8));

        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].tickets.len(), 4);
    }

    #[test]
    fn test_too_few_tickets_are_dropped() {
        // Enough players, but only one ticket where two are required.
        let mut queue = queue_of(&[("big", 4), ("a", 1)]);
        let (matches, dropped) = build_all(&mut queue, AllianceRule::new(2, 0, 4, 4));

        assert!(matches.is_empty());
        assert_eq!(dropped.len(), 1);
        assert_eq!(dropped[0].ticket_id, "big");
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn test_largest_bucket_is_preferred_for_fill() {
        let mut queue = queue_of(&[("one", 1), ("two", 2), ("three", 3)]);
        let (matches, _) = build_all(&mut queue, AllianceRule::new(0, 0, 1, 5));

        assert_eq!(matches[0].ticket_ids(), vec!["three", "two"]);
        assert_eq!(matches[1].ticket_ids(), vec!["one"]);
    }
}
