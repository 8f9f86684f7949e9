//! Performance benchmarks for match building

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use match_function::matchmaker::{build_all, spawn_matching, MatchOptions, TicketQueue};
use match_function::{
    AllianceRule, CancelSignal, GameRules, MatchShape, MatcherKind, Player, StaticTicketProvider,
    Ticket,
};

fn tickets(count: usize) -> Vec<Ticket> {
    (0..count)
        .map(|i| {
            let players = (0..1 + i % 4)
                .map(|p| Player::new(format!("t{}-p{}", i, p)))
                .collect();
            Ticket::new(format!("t{}", i), players)
        })
        .collect()
}

fn bench_bucketed_builder(c: &mut Criterion) {
    let mut group = c.benchmark_group("bucketed_builder");
    let rule = AllianceRule::new(0, 0, 6, 8);

    for count in [100, 1_000, 10_000] {
        let input = tickets(count);
        group.bench_with_input(BenchmarkId::from_parameter(count), &input, |b, input| {
            b.iter(|| {
                let mut queue: TicketQueue = input.iter().cloned().collect();
                black_box(build_all(&mut queue, rule))
            })
        });
    }
    group.finish();
}

fn bench_matching_pass(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let input = tickets(1_000);

    for shape in [MatchShape::Bucketed, MatchShape::Pairwise] {
        let rules = GameRules::new(AllianceRule::new(0, 2, 4, 8)).with_shape(shape);
        c.bench_function(&format!("matching_pass_{}", shape), |b| {
            b.iter(|| {
                runtime.block_on(async {
                    let mut rx = spawn_matching(
                        MatcherKind::Game,
                        StaticTicketProvider::new(input.clone()),
                        rules.clone(),
                        CancelSignal::never(),
                        MatchOptions::default().with_output_buffer(64),
                    );
                    let mut count = 0;
                    while let Some(m) = rx.recv().await {
                        count += black_box(m).tickets.len();
                    }
                    count
                })
            })
        });
    }
}

criterion_group!(benches, bench_bucketed_builder, bench_matching_pass);
criterion_main!(benches);
