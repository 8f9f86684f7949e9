//! Test fixtures shared by the integration suites

#![allow(dead_code)]

use match_function::config::MatchmakingSettings;
use match_function::metrics::MetricsCollector;
use match_function::{Match, MatchFunctionService, MatcherKind, Player, Ticket};
use serde_json::json;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Ticket whose players are named `{id}-p0`, `{id}-p1`, ...
pub fn ticket(id: &str, players: usize) -> Ticket {
    let players = (0..players)
        .map(|i| Player::new(format!("{}-p{}", id, i)))
        .collect();
    Ticket::new(id, players)
}

/// Tickets `t0`, `t1`, ... with the given player counts, in order
pub fn tickets_of(sizes: &[usize]) -> Vec<Ticket> {
    sizes
        .iter()
        .enumerate()
        .map(|(i, n)| ticket(&format!("t{}", i), *n))
        .collect()
}

/// Rule payload with the given alliance bounds
pub fn alliance_json(min: usize, max: usize, player_min: usize, player_max: usize) -> String {
    json!({
        "alliance": {
            "min_number": min,
            "max_number": max,
            "player_min_number": player_min,
            "player_max_number": player_max,
        }
    })
    .to_string()
}

/// Service for the given matcher with its own metrics registry
pub fn service(kind: MatcherKind, seed: Option<u64>) -> MatchFunctionService {
    let settings = MatchmakingSettings {
        matcher_kind: kind,
        rng_seed: seed,
        ..MatchmakingSettings::default()
    };
    let metrics = Arc::new(MetricsCollector::new().expect("metrics registry"));
    MatchFunctionService::new(settings, metrics)
}

/// Receive every match until the stream closes
pub async fn collect_matches(mut rx: mpsc::Receiver<Match>) -> Vec<Match> {
    let mut matches = Vec::new();
    while let Some(m) = rx.recv().await {
        matches.push(m);
    }
    matches
}
