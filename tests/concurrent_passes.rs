//! Concurrency tests for independent matching passes
//!
//! Many pools matching at once share nothing but the metrics collector.

mod fixtures;

use fixtures::{alliance_json, collect_matches, service, tickets_of};
use match_function::{CancelSignal, MatcherKind, StaticTicketProvider};
use std::collections::HashSet;
use std::time::{Duration, Instant};

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_passes_are_independent() {
    let svc = service(MatcherKind::Game, None);
    let rules = alliance_json(0, 0, 4, 4);
    let start = Instant::now();

    let mut handles = Vec::new();
    for _ in 0..50 {
        let provider = StaticTicketProvider::new(tickets_of(&[2; 20]));
        let rx = svc
            .make_matches(provider, &rules, CancelSignal::never())
            .unwrap();
        handles.push(tokio::spawn(collect_matches(rx)));
    }

    let results = futures::future::join_all(handles).await;

    let mut total = 0;
    for result in results {
        let matches = result.unwrap();
        assert_eq!(matches.len(), 10);

        let mut seen = HashSet::new();
        for m in &matches {
            assert_eq!(m.total_players(), 4);
            for t in &m.tickets {
                assert!(seen.insert(t.ticket_id.clone()));
            }
        }
        total += matches.len();
    }

    assert_eq!(total, 500);
    let made = svc
        .metrics()
        .matches()
        .matches_made_total
        .with_label_values(&["game"])
        .get();
    assert_eq!(made, 500);
    assert!(start.elapsed() < Duration::from_secs(10));
}

#[tokio::test]
async fn test_large_pool_drains_completely() {
    let svc = service(MatcherKind::Crew, None);
    let sizes: Vec<usize> = (0..2_000).map(|i| 1 + i % 3).collect();
    let provider = StaticTicketProvider::new(tickets_of(&sizes));

    let rx = svc
        .make_matches(provider, &alliance_json(0, 0, 6, 6), CancelSignal::never())
        .unwrap();
    let matches = collect_matches(rx).await;

    let players: usize = matches.iter().map(|m| m.total_players()).sum();
    let total: usize = sizes.iter().sum();
    assert!(matches.iter().all(|m| m.total_players() == 6));
    assert!(total - players < 6);
}
