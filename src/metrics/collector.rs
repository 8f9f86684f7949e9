//! Metrics collection using Prometheus
//!
//! Counters and histograms for ticket handling and match building. The
//! collector only gathers; exposing the registry is left to the transport.

use crate::types::MatcherKind;
use anyhow::Result;
use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder,
};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Main metrics collector for the match function
#[derive(Clone)]
pub struct MetricsCollector {
    /// Prometheus registry
    registry: Arc<Registry>,

    /// Ticket validation and enrichment metrics
    ticket_metrics: TicketMetrics,

    /// Match building metrics
    match_metrics: MatchMetrics,
}

/// Ticket-related metrics
#[derive(Clone)]
pub struct TicketMetrics {
    /// Tickets validated, by matcher and outcome
    pub tickets_validated_total: IntCounterVec,

    /// Tickets enriched, by matcher
    pub tickets_enriched_total: IntCounterVec,

    /// Tickets drained from providers, by matcher
    pub tickets_ingested_total: IntCounterVec,

    /// Tickets discarded as an undersized remainder or incomplete group
    pub tickets_dropped_total: IntCounterVec,
}

/// Match-related metrics
#[derive(Clone)]
pub struct MatchMetrics {
    /// Matches emitted, by matcher
    pub matches_made_total: IntCounterVec,

    /// Players per emitted match
    pub players_per_match: HistogramVec,

    /// Wall time of one matching pass
    pub matching_pass_duration: HistogramVec,
}

impl MetricsCollector {
    /// Create a new metrics collector with its own registry
    pub fn new() -> Result<Self> {
        let registry = Arc::new(Registry::new());
        Self::with_registry(registry)
    }

    /// Create a new metrics collector with custom registry
    pub fn with_registry(registry: Arc<Registry>) -> Result<Self> {
        let ticket_metrics = TicketMetrics::new(&registry)?;
        let match_metrics = MatchMetrics::new(&registry)?;

        Ok(Self {
            registry,
            ticket_metrics,
            match_metrics,
        })
    }

    pub fn tickets(&self) -> &TicketMetrics {
        &self.ticket_metrics
    }

    pub fn matches(&self) -> &MatchMetrics {
        &self.match_metrics
    }

    /// Record the outcome of a ticket validation
    pub fn record_validation(&self, kind: MatcherKind, valid: bool) {
        let outcome = if valid { "valid" } else { "rejected" };
        self.ticket_metrics
            .tickets_validated_total
            .with_label_values(&[&kind.to_string(), outcome])
            .inc();
    }

    pub fn record_enrichment(&self, kind: MatcherKind) {
        self.ticket_metrics
            .tickets_enriched_total
            .with_label_values(&[&kind.to_string()])
            .inc();
    }

    pub fn record_tickets_ingested(&self, kind: MatcherKind, count: usize) {
        self.ticket_metrics
            .tickets_ingested_total
            .with_label_values(&[&kind.to_string()])
            .inc_by(count as u64);
    }

    pub fn record_tickets_dropped(&self, kind: MatcherKind, count: usize) {
        self.ticket_metrics
            .tickets_dropped_total
            .with_label_values(&[&kind.to_string()])
            .inc_by(count as u64);
    }

    /// Record an emitted match and its size
    pub fn record_match(&self, kind: MatcherKind, players: usize) {
        let label = kind.to_string();
        self.match_metrics
            .matches_made_total
            .with_label_values(&[&label])
            .inc();
        self.match_metrics
            .players_per_match
            .with_label_values(&[&label])
            .observe(players as f64);
    }

    pub fn record_matching_pass(&self, kind: MatcherKind, duration: Duration) {
        self.match_metrics
            .matching_pass_duration
            .with_label_values(&[&kind.to_string()])
            .observe(duration.as_secs_f64());
    }

    /// Render every registered metric in the text exposition format
    pub fn gather_text(&self) -> Result<String> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }
}

/// Timer for measuring operation durations
#[derive(Debug)]
pub struct MetricsTimer {
    start: Instant,
}

impl MetricsTimer {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Get the elapsed duration
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Stop the timer and return the duration
    pub fn stop(self) -> Duration {
        self.elapsed()
    }
}

impl Default for MetricsTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl TicketMetrics {
    fn new(registry: &Registry) -> Result<Self> {
        let tickets_validated_total = IntCounterVec::new(
            Opts::new(
                "match_function_tickets_validated_total",
                "Total tickets validated",
            ),
            &["matcher", "outcome"],
        )?;
        registry.register(Box::new(tickets_validated_total.clone()))?;

        let tickets_enriched_total = IntCounterVec::new(
            Opts::new(
                "match_function_tickets_enriched_total",
                "Total tickets enriched",
            ),
            &["matcher"],
        )?;
        registry.register(Box::new(tickets_enriched_total.clone()))?;

        let tickets_ingested_total = IntCounterVec::new(
            Opts::new(
                "match_function_tickets_ingested_total",
                "Total tickets drained from ticket providers",
            ),
            &["matcher"],
        )?;
        registry.register(Box::new(tickets_ingested_total.clone()))?;

        let tickets_dropped_total = IntCounterVec::new(
            Opts::new(
                "match_function_tickets_dropped_total",
                "Total tickets dropped without a match",
            ),
            &["matcher"],
        )?;
        registry.register(Box::new(tickets_dropped_total.clone()))?;

        Ok(Self {
            tickets_validated_total,
            tickets_enriched_total,
            tickets_ingested_total,
            tickets_dropped_total,
        })
    }
}

impl MatchMetrics {
    fn new(registry: &Registry) -> Result<Self> {
        let matches_made_total = IntCounterVec::new(
            Opts::new("match_function_matches_made_total", "Total matches emitted"),
            &["matcher"],
        )?;
        registry.register(Box::new(matches_made_total.clone()))?;

        let players_per_match = HistogramVec::new(
            HistogramOpts::new(
                "match_function_players_per_match",
                "Number of players in each emitted match",
            )
            .buckets(vec![1.0, 2.0, 4.0, 8.0, 16.0, 32.0, 64.0]),
            &["matcher"],
        )?;
        registry.register(Box::new(players_per_match.clone()))?;

        let matching_pass_duration = HistogramVec::new(
            HistogramOpts::new(
                "match_function_matching_pass_duration_seconds",
                "Time spent in one matching pass",
            )
            .buckets(vec![0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 5.0]),
            &["matcher"],
        )?;
        registry.register(Box::new(matching_pass_duration.clone()))?;

        Ok(Self {
            matches_made_total,
            players_per_match,
            matching_pass_duration,
        })
    }
}
