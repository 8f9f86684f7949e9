//! Ticket providers feeding a matching pass
//!
//! A provider hands out its ticket sequence exactly once. The sequence ends
//! when the provider closes it; it is never replayed.

use crate::types::Ticket;
use std::pin::Pin;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tokio_stream::Stream;

/// Lazy, finite ticket sequence
pub type TicketStream = Pin<Box<dyn Stream<Item = Ticket> + Send>>;

/// Source of tickets for one matching pass
#[cfg_attr(test, mockall::automock)]
pub trait TicketProvider: Send {
    /// Take the ticket sequence. Calls after the first yield an empty sequence.
    fn get_tickets(&mut self) -> TicketStream;
}

fn empty_stream() -> TicketStream {
    Box::pin(tokio_stream::empty())
}

/// Provider backed by an mpsc channel; the sequence closes when every sender is dropped
#[derive(Debug)]
pub struct ChannelTicketProvider {
    receiver: Option<mpsc::Receiver<Ticket>>,
}

impl ChannelTicketProvider {
    /// Create a provider and the sender used to feed it
    pub fn new(buffer: usize) -> (mpsc::Sender<Ticket>, Self) {
        let (tx, rx) = mpsc::channel(buffer.max(1));
        (tx, Self::from_receiver(rx))
    }

    pub fn from_receiver(receiver: mpsc::Receiver<Ticket>) -> Self {
        Self {
            receiver: Some(receiver),
        }
    }
}

impl TicketProvider for ChannelTicketProvider {
    fn get_tickets(&mut self) -> TicketStream {
        match self.receiver.take() {
            Some(rx) => Box::pin(ReceiverStream::new(rx)),
            None => empty_stream(),
        }
    }
}

/// Provider over a fixed list of tickets
#[derive(Debug, Clone, Default)]
pub struct StaticTicketProvider {
    tickets: Option<Vec<Ticket>>,
}

impl StaticTicketProvider {
    pub fn new(tickets: Vec<Ticket>) -> Self {
        Self {
            tickets: Some(tickets),
        }
    }
}

impl TicketProvider for StaticTicketProvider {
    fn get_tickets(&mut self) -> TicketStream {
        match self.tickets.take() {
            Some(tickets) => Box::pin(tokio_stream::iter(tickets)),
            None => empty_stream(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Player;
    use tokio_stream::StreamExt;

    fn ticket(id: &str) -> Ticket {
        Ticket::new(id, vec![Player::new(format!("{}-p0", id))])
    }

    #[tokio::test]
    async fn test_static_provider_is_single_consumption() {
        let mut provider = StaticTicketProvider::new(vec![ticket("a"), ticket("b")]);

        let first: Vec<_> = provider.get_tickets().collect().await;
        assert_eq!(first.len(), 2);

        let second: Vec<_> = provider.get_tickets().collect().await;
        assert!(second.is_empty());
    }

    #[test]
    fn test_static_provider_preserves_order() {
        let mut provider =
            StaticTicketProvider::new(vec![ticket("c"), ticket("a"), ticket("b")]);
        let ids: Vec<_> =
            tokio_test::block_on(provider.get_tickets().map(|t| t.ticket_id).collect());
        assert_eq!(ids, vec!["c", "a", "b"]);
    }

    #[tokio::test]
    async fn test_channel_provider_closes_when_senders_drop() {
        let (tx, mut provider) = ChannelTicketProvider::new(4);
        tx.send(ticket("a")).await.unwrap();
        tx.send(ticket("b")).await.unwrap();
        drop(tx);

        let ids: Vec<_> = provider
            .get_tickets()
            .map(|t| t.ticket_id)
            .collect()
            .await;
        assert_eq!(ids, vec!["a", "b"]);
        assert!(provider.get_tickets().next().await.is_none());
    }
}
