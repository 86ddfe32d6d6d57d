//! Criterion benchmark: one engine tick over a busy network.
//!
//! Builds a grid of lines with stops at every vertex and several trains per
//! line, lets passengers pile up, then measures a single tick (session only)
//! and a single app update (through `RailwaySimPlugin`).
//!
//! Run with: cargo bench -p railway_sim --bench tick_bench --features bench

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

use railway_sim::engine::{FrameQueue, ManualClock};
use railway_sim::test_harness::TestRailway;
use railway_sim::{Point, RailwayManager, SimParams, SimulationSession};

const FRAME_SECS: f64 = 1.0 / 60.0;

/// Lay out `lines` parallel east-west lines with 10 stops each and
/// `trains_per_line` trains spread along them.
fn populate(manager: &mut RailwayManager, lines: usize, trains_per_line: usize) {
    for row in 0..lines {
        let lat = 51.0 + row as f64 * 0.01;
        let coords: Vec<Point> = (0..10)
            .map(|col| Point::new(lat, -0.2 + col as f64 * 0.005))
            .collect();
        let Ok(line) = manager.add_line(coords.clone(), None) else {
            continue;
        };
        let stops: Vec<_> = coords.iter().map(|&p| manager.add_stop(p, None)).collect();
        for _ in 0..trains_per_line {
            let train = manager.add_train(None);
            if let Err(err) = manager.schedule_train(train, line, stops.clone()) {
                panic!("populate: {err}");
            }
        }
    }
}

fn bench_session_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("session_tick");
    for &lines in &[1usize, 10, 50] {
        let clock = ManualClock::new(0.0);
        let mut session =
            SimulationSession::new(clock.clone(), FrameQueue::default(), SimParams::default());
        populate(session.manager_mut(), lines, 4);
        session.start();
        // Warm up: let queues fill for a simulated minute.
        for _ in 0..3_600 {
            clock.advance_secs(FRAME_SECS);
            session.run_pending_frame();
        }

        group.bench_with_input(BenchmarkId::from_parameter(lines), &lines, |b, _| {
            b.iter(|| {
                clock.advance_secs(FRAME_SECS);
                session.run_pending_frame()
            });
        });
    }
    group.finish();
}

fn bench_app_update(c: &mut Criterion) {
    let mut railway = TestRailway::new();
    populate(railway.manager_mut(), 10, 4);
    railway.start();
    railway.tick(600);

    c.bench_function("app_update_10_lines", |b| {
        b.iter(|| railway.tick(1));
    });
}

criterion_group!(benches, bench_session_tick, bench_app_update);
criterion_main!(benches);
