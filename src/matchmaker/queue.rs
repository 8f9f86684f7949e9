//! Size-keyed ticket buckets
//!
//! Pending tickets are grouped by player count. Each bucket is a FIFO queue
//! so equally sized tickets are matched in arrival order. The whole set is
//! owned by a single matching pass and never shared between passes.

use crate::types::Ticket;
use std::collections::{BTreeMap, VecDeque};

/// Pending tickets bucketed by player count
#[derive(Debug, Clone, Default)]
pub struct TicketQueue {
    buckets: BTreeMap<usize, VecDeque<Ticket>>,
    len: usize,
}

impl TicketQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a ticket to the tail of its size bucket
    pub fn push(&mut self, ticket: Ticket) {
        self.buckets
            .entry(ticket.player_count())
            .or_default()
            .push_back(ticket);
        self.len += 1;
    }

    /// Pop the head of the largest non-empty bucket whose key is at most `bound`
    pub fn pop_at_most(&mut self, bound: usize) -> Option<Ticket> {
        let key = self
            .buckets
            .range(..=bound)
            .rev()
            .find(|(_, bucket)| !bucket.is_empty())
            .map(|(key, _)| *key)?;

        let bucket = self.buckets.get_mut(&key)?;
        let ticket = bucket.pop_front();
        if bucket.is_empty() {
            self.buckets.remove(&key);
        }
        if ticket.is_some() {
            self.len -= 1;
        }
        ticket
    }

    /// Total tickets across all buckets
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of tickets waiting in the bucket for `player_count`
    pub fn bucket_len(&self, player_count: usize) -> usize {
        self.buckets.get(&player_count).map_or(0, VecDeque::len)
    }

    /// Bucket keys in ascending order
    pub fn bucket_sizes(&self) -> Vec<usize> {
        self.buckets.keys().copied().collect()
    }

    /// Take every remaining ticket, largest bucket first
    pub fn drain_remaining(&mut self) -> Vec<Ticket> {
        let buckets = std::mem::take(&mut self.buckets);
        self.len = 0;
        buckets.into_values().rev().flatten().collect()
    }
}

impl FromIterator<Ticket> for TicketQueue {
    fn from_iter<I: IntoIterator<Item = Ticket>>(iter: I) -> Self {
        let mut queue = Self::new();
        for ticket in iter {
            queue.push(ticket);
        }
        queue
    }
}
