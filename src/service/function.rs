//! Match function service
//!
//! Wraps one [`Matchmaker`] with the metrics collector and the settings it
//! was configured with. Every operation takes the pool's rule payload as
//! JSON, exactly as it arrives from the orchestrator.

use crate::config::{AppConfig, MatchmakingSettings};
use crate::error::{MatchResult, Result};
use crate::matchmaker::{CancelSignal, MatchOptions, Matchmaker, TicketProvider};
use crate::metrics::MetricsCollector;
use crate::rules::RuleSet;
use crate::types::{Match, MatcherKind, Ticket};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Stateless match function bound to one matcher variant
#[derive(Clone)]
pub struct MatchFunctionService {
    matchmaker: Matchmaker,
    metrics: Arc<MetricsCollector>,
    settings: MatchmakingSettings,
}

impl MatchFunctionService {
    pub fn new(settings: MatchmakingSettings, metrics: Arc<MetricsCollector>) -> Self {
        info!(
            matcher = %settings.matcher_kind,
            output_buffer = settings.output_buffer,
            seeded = settings.rng_seed.is_some(),
            "Creating match function service"
        );
        Self {
            matchmaker: Matchmaker::new(settings.matcher_kind),
            metrics,
            settings,
        }
    }

    /// Build the service and a fresh metrics collector from application config
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let metrics = Arc::new(MetricsCollector::new()?);
        Ok(Self::new(config.matchmaking.clone(), metrics))
    }

    pub fn kind(&self) -> MatcherKind {
        self.matchmaker.kind()
    }

    pub fn matchmaker(&self) -> &Matchmaker {
        &self.matchmaker
    }

    pub fn metrics(&self) -> Arc<MetricsCollector> {
        self.metrics.clone()
    }

    pub fn settings(&self) -> &MatchmakingSettings {
        &self.settings
    }

    /// Random source for one enrichment call
    ///
    /// With a configured seed the stream is derived from the seed and the
    /// ticket ID, so each ticket gets its own reproducible sequence.
    fn request_rng(&self, ticket: &Ticket) -> ChaCha8Rng {
        match self.settings.rng_seed {
            Some(seed) => {
                let mut hasher = DefaultHasher::new();
                seed.hash(&mut hasher);
                ticket.ticket_id.hash(&mut hasher);
                ChaCha8Rng::seed_from_u64(hasher.finish())
            }
            None => ChaCha8Rng::from_entropy(),
        }
    }

    pub fn rules_from_json(&self, rules_json: &str) -> MatchResult<RuleSet> {
        let rules = self.matchmaker.rules_from_json(rules_json);
        if let Err(e) = &rules {
            warn!(matcher = %self.kind(), error = %e, "Rejected rule payload");
        }
        rules
    }

    pub fn validate_ticket(&self, ticket: &Ticket, rules_json: &str) -> MatchResult<bool> {
        let rules = self.rules_from_json(rules_json)?;
        let result = self.matchmaker.validate_ticket(ticket, &rules);
        self.metrics
            .record_validation(self.kind(), matches!(result, Ok(true)));
        result
    }

    pub fn enrich_ticket(&self, ticket: Ticket, rules_json: &str) -> MatchResult<Ticket> {
        let rules = self.rules_from_json(rules_json)?;
        let mut rng = self.request_rng(&ticket);
        let enriched = self.matchmaker.enrich_ticket(ticket, &rules, &mut rng)?;
        self.metrics.record_enrichment(self.kind());
        Ok(enriched)
    }

    pub fn get_stat_codes(&self, rules_json: &str) -> MatchResult<Vec<String>> {
        let rules = self.rules_from_json(rules_json)?;
        Ok(self.matchmaker.get_stat_codes(&rules))
    }

    /// Start a matching pass over the provider's tickets
    ///
    /// Malformed rules fail the call; rules parsed for another matcher kind
    /// cannot occur here because parsing is done by this service's matcher.
    pub fn make_matches<P>(
        &self,
        provider: P,
        rules_json: &str,
        cancel: CancelSignal,
    ) -> MatchResult<mpsc::Receiver<Match>>
    where
        P: TicketProvider + 'static,
    {
        let rules = self.rules_from_json(rules_json)?;
        debug!(matcher = %self.kind(), alliance = ?rules.alliance_rule(), "Starting matching pass");
        let options = MatchOptions::default()
            .with_output_buffer(self.settings.output_buffer)
            .with_metrics(self.metrics.clone());
        Ok(self
            .matchmaker
            .make_matches_with(provider, rules, cancel, options))
    }
}
