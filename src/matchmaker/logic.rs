//! The match logic contract and the shared matching driver
//!
//! Every matcher variant binds the contract to one concrete rule set type,
//! so a variant can never be handed rules it does not understand. The
//! driver runs one matching pass as a spawned task: it drains the ticket
//! provider, builds matches, and emits them over a bounded channel. Emission
//! waits for the receiver, which is the only backpressure.

use crate::error::{MatchResult, MatchmakingError};
use crate::matchmaker::builder::MatchBuilder;
use crate::matchmaker::cancel::CancelSignal;
use crate::matchmaker::provider::{TicketProvider, TicketStream};
use crate::matchmaker::queue::TicketQueue;
use crate::matchmaker::shaper::{GroupShaper, Grouping};
use crate::metrics::{MetricsCollector, MetricsTimer};
use crate::rules::{AllianceRule, MatchRules, MatchShape};
use crate::types::{Match, MatcherKind, Ticket};
use rand::Rng;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_stream::StreamExt;
use tracing::{debug, info, warn};

/// Default capacity of the match output channel
pub const DEFAULT_OUTPUT_BUFFER: usize = 1;

/// Options for one matching pass
#[derive(Clone, Default)]
pub struct MatchOptions {
    /// Capacity of the output channel; values below one are raised to one
    pub output_buffer: usize,
    /// Collector to report ingestion, matches and drops to
    pub metrics: Option<Arc<MetricsCollector>>,
}

impl MatchOptions {
    pub fn with_metrics(mut self, metrics: Arc<MetricsCollector>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn with_output_buffer(mut self, output_buffer: usize) -> Self {
        self.output_buffer = output_buffer;
        self
    }
}

/// Capability set implemented by every matcher variant
pub trait MatchLogic: Send + Sync + 'static {
    /// Rule set type this variant is bound to
    type Rules: MatchRules + DeserializeOwned;

    /// Kind tag used in logs, metrics and rule dispatch
    const KIND: MatcherKind;

    /// Check a ticket against the rules, failing with a constraint violation
    fn validate_ticket(&self, ticket: &Ticket, rules: &Self::Rules) -> MatchResult<bool>;

    /// Add or overwrite ticket attributes before matching
    fn enrich_ticket<R: Rng>(
        &self,
        ticket: Ticket,
        rules: &Self::Rules,
        rng: &mut R,
    ) -> MatchResult<Ticket>;

    /// Attribute names used for skill comparisons
    fn get_stat_codes(&self, _rules: &Self::Rules) -> Vec<String> {
        debug!(matcher = %Self::KIND, "No stat codes configured");
        Vec::new()
    }

    /// Parse the variant's rule set from its JSON payload
    ///
    /// The payload must be a JSON object.
    fn rules_from_json(&self, json: &str) -> MatchResult<Self::Rules> {
        let malformed = |e: serde_json::Error| MatchmakingError::MalformedRules {
            reason: format!("Failed to parse {} rules: {}", Self::KIND, e),
        };
        match serde_json::from_str(json).map_err(malformed)? {
            value @ Value::Object(_) => serde_json::from_value(value).map_err(malformed),
            other => Err(MatchmakingError::MalformedRules {
                reason: format!(
                    "Failed to parse {} rules: expected a JSON object, got {}",
                    Self::KIND,
                    json_type(&other)
                ),
            }),
        }
    }

    /// Start a matching pass with default options
    ///
    /// Must be called from within a tokio runtime.
    fn make_matches<P>(
        &self,
        provider: P,
        rules: Self::Rules,
        cancel: CancelSignal,
    ) -> mpsc::Receiver<Match>
    where
        P: TicketProvider + 'static,
    {
        self.make_matches_with(provider, rules, cancel, MatchOptions::default())
    }

    /// Start a matching pass with explicit options
    fn make_matches_with<P>(
        &self,
        provider: P,
        rules: Self::Rules,
        cancel: CancelSignal,
        options: MatchOptions,
    ) -> mpsc::Receiver<Match>
    where
        P: TicketProvider + 'static,
    {
        info!(matcher = %Self::KIND, shape = %rules.shape(), "Making matches");
        spawn_matching(Self::KIND, provider, rules, cancel, options)
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Spawn a matching pass and return the receiving end of its match stream
pub fn spawn_matching<P, R>(
    kind: MatcherKind,
    mut provider: P,
    rules: R,
    cancel: CancelSignal,
    options: MatchOptions,
) -> mpsc::Receiver<Match>
where
    P: TicketProvider + 'static,
    R: MatchRules,
{
    let (tx, rx) = mpsc::channel(options.output_buffer.max(DEFAULT_OUTPUT_BUFFER));

    tokio::spawn(async move {
        let tickets = provider.get_tickets();
        let metrics = options.metrics.clone();
        let pass = MatchingPass {
            kind,
            cancel,
            tx,
            metrics: options.metrics,
        };
        let timer = MetricsTimer::new();

        let rule = *rules.alliance_rule();
        let emitted = match rules.shape() {
            MatchShape::Bucketed => pass.run_bucketed(tickets, rule).await,
            MatchShape::Pairwise => {
                pass.run_grouped(tickets, Grouping::SingleTeam, rule.group_size())
                    .await
            }
            MatchShape::TwoTeam => {
                pass.run_grouped(tickets, Grouping::TeamPerTicket, rule.group_size())
                    .await
            }
        };

        let elapsed = timer.stop();
        if let Some(metrics) = metrics {
            metrics.record_matching_pass(kind, elapsed);
        }
        info!(
            matcher = %kind,
            matches = emitted,
            elapsed_ms = elapsed.as_secs_f64() * 1000.0,
            "Matching pass finished, closing match stream"
        );
    });

    rx
}

/// State for a single spawned matching pass
struct MatchingPass {
    kind: MatcherKind,
    cancel: CancelSignal,
    tx: mpsc::Sender<Match>,
    metrics: Option<Arc<MetricsCollector>>,
}

/// Outcome of handing one match to the receiver
enum Emission {
    Sent,
    ReceiverGone,
    /// Cancelled while waiting for room; the match was not sent
    Cancelled(Match),
}

impl MatchingPass {
    /// Wait for the next ticket, or `None` on end of input or cancellation
    async fn next_ticket(&mut self, tickets: &mut TicketStream) -> Option<Ticket> {
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => {
                info!(matcher = %self.kind, "Cancellation requested, stopping ticket ingestion");
                None
            }
            next = tickets.next() => {
                if next.is_none() {
                    debug!(matcher = %self.kind, "Ticket provider closed");
                }
                next
            }
        }
    }

    /// Hand a match to the receiver
    ///
    /// A match is sent whenever the channel has room. Once cancellation is
    /// raised, waiting for room ends and the match is handed back.
    async fn emit(&mut self, m: Match) -> Emission {
        let players = m.total_players();
        debug!(
            matcher = %self.kind,
            tickets = m.tickets.len(),
            players,
            "Sending match to results channel"
        );

        let permit = tokio::select! {
            biased;
            permit = self.tx.reserve() => permit,
            _ = self.cancel.cancelled() => {
                info!(matcher = %self.kind, "Cancellation requested while the receiver is stalled, stopping emission");
                return Emission::Cancelled(m);
            }
        };
        let Ok(permit) = permit else {
            warn!(matcher = %self.kind, "Match receiver dropped, abandoning matching pass");
            return Emission::ReceiverGone;
        };
        permit.send(m);

        if let Some(metrics) = &self.metrics {
            metrics.record_match(self.kind, players);
        }
        Emission::Sent
    }

    fn report_ingested(&self, count: usize) {
        if let Some(metrics) = &self.metrics {
            metrics.record_tickets_ingested(self.kind, count);
        }
    }

    fn report_dropped(&self, dropped: &[Ticket]) {
        if dropped.is_empty() {
            return;
        }
        info!(
            matcher = %self.kind,
            tickets = dropped.len(),
            "Tickets left without a match"
        );
        if let Some(metrics) = &self.metrics {
            metrics.record_tickets_dropped(self.kind, dropped.len());
        }
    }

    async fn run_bucketed(mut self, mut tickets: TicketStream, rule: AllianceRule) -> usize {
        let mut queue = TicketQueue::new();
        while let Some(ticket) = self.next_ticket(&mut tickets).await {
            debug!(matcher = %self.kind, ticket_id = %ticket.ticket_id, "Got a ticket");
            queue.push(ticket);
        }
        drop(tickets);

        info!(
            matcher = %self.kind,
            tickets = queue.len(),
            buckets = ?queue.bucket_sizes(),
            "Ticket ingestion complete, building matches"
        );
        self.report_ingested(queue.len());

        let mut emitted = 0;
        let mut unsent = None;
        let mut builder = MatchBuilder::new(&mut queue, rule);
        for m in builder.by_ref() {
            match self.emit(m).await {
                Emission::Sent => emitted += 1,
                Emission::ReceiverGone => return emitted,
                Emission::Cancelled(m) => {
                    unsent = Some(m);
                    break;
                }
            }
        }

        let mut dropped = builder.into_dropped();
        if let Some(m) = unsent {
            dropped.extend(m.tickets);
            dropped.extend(queue.drain_remaining());
        }
        self.report_dropped(&dropped);
        emitted
    }

    async fn run_grouped(
        mut self,
        mut tickets: TicketStream,
        grouping: Grouping,
        group_size: usize,
    ) -> usize {
        let mut shaper = GroupShaper::new(grouping, group_size);
        let mut ingested = 0;
        let mut emitted = 0;
        let mut dropped = Vec::new();

        while let Some(ticket) = self.next_ticket(&mut tickets).await {
            debug!(matcher = %self.kind, ticket_id = %ticket.ticket_id, "Got a ticket");
            ingested += 1;
            let Some(m) = shaper.push(ticket) else {
                continue;
            };
            match self.emit(m).await {
                Emission::Sent => emitted += 1,
                Emission::ReceiverGone => {
                    self.report_ingested(ingested);
                    return emitted;
                }
                Emission::Cancelled(m) => {
                    dropped.extend(m.tickets);
                    break;
                }
            }
        }

        self.report_ingested(ingested);
        dropped.extend(shaper.into_pending());
        self.report_dropped(&dropped);
        emitted
    }
}
