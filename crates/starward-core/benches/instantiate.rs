//! Capture-odds table construction and mission instantiation benchmarks.
//!
//! Run with: `cargo bench -p starward-core`

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use starward_core::prelude::*;
use starward_logic::capture_odds::{crew_power, CaptureOdds};

const CONTENT: &str = include_str!("../../../data/content.json");

fn engine() -> Engine {
    let content = Content::from_json(CONTENT).expect("content should load");
    let mut engine = Engine::new(content, EngineConfig::default().with_seed(7));
    let sol = engine.content.galaxy.system_id("Sol").expect("Sol exists");
    engine
        .spawn_player_ship("Falcon", "Resolute", sol)
        .expect("Falcon exists");
    engine
}

fn bench_capture_odds(c: &mut Criterion) {
    let mut group = c.benchmark_group("capture_odds");
    for crew in [10u32, 100, 400] {
        group.bench_function(format!("table_{crew}_vs_{crew}"), |b| {
            b.iter(|| {
                let attacker = crew_power(&[(1.5, crew / 2)], crew, 1.0);
                let defender = crew_power(&[(3.0, 2)], crew, 2.0);
                black_box(CaptureOdds::new(attacker, defender))
            })
        });
    }
    group.finish();
}

fn bench_instantiate(c: &mut Criterion) {
    let mut group = c.benchmark_group("instantiate");
    for mission in ["Convoy Escort", "Pirate Hunt", "Frontier Patrol", "Carrier Escort"] {
        group.bench_function(mission, |b| {
            b.iter_batched(
                engine,
                |mut engine| {
                    let origin = engine.content.galaxy.system_id("Sol").expect("Sol exists");
                    let destination =
                        engine.content.galaxy.planet_id("Earth").expect("Earth exists");
                    black_box(engine.accept_mission(mission, origin, destination).is_ok());
                    engine
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

criterion_group!(benches, bench_capture_odds, bench_instantiate);
criterion_main!(benches);
