//! Performance benchmarks for the session cost-allocation engine.
//!
//! This benchmark suite verifies that the engine meets performance targets:
//! - Single-membership session: < 100μs mean
//! - Full-house session (20 memberships): < 1ms mean
//! - High-churn session (staggered joins and leaves): < 1ms mean
//!
//! Run with: `cargo bench`
//! HTML reports are generated in `target/criterion/`

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use chrono::NaiveDateTime;

use session_billing_engine::calculation::compute_costs;
use session_billing_engine::config::RateTableLoader;
use session_billing_engine::models::{Location, Membership, Session};

fn make_datetime(s: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
}

/// Loads the downtown rate table used by all benchmarks.
fn load_location() -> Location {
    RateTableLoader::load("./config/locations")
        .expect("Failed to load rate tables")
        .get("downtown")
        .expect("downtown rate table missing")
        .clone()
}

/// A four-hour evening session crossing the 18:00 cutoff.
fn make_session() -> Session {
    Session {
        id: "session_bench".to_string(),
        location_id: "downtown".to_string(),
        start_time: make_datetime("2025-03-01 16:00:00"),
        end_time: Some(make_datetime("2025-03-01 20:00:00")),
        day_night_cutoff: None,
    }
}

/// Creates memberships all present for the whole session.
fn full_house_memberships(count: usize) -> Vec<Membership> {
    (0..count)
        .map(|i| Membership {
            id: format!("m_{:03}", i),
            session_id: "session_bench".to_string(),
            participant_id: format!("p_{:03}", i),
            join_time: make_datetime("2025-03-01 16:00:00"),
            leave_time: Some(make_datetime("2025-03-01 20:00:00")),
        })
        .collect()
}

/// Creates memberships with staggered joins and leaves, producing many
/// elementary intervals while keeping occupancy within the rate table.
fn churn_memberships(count: usize) -> Vec<Membership> {
    let start = make_datetime("2025-03-01 16:00:00");
    (0..count)
        .map(|i| {
            let join = start + chrono::Duration::minutes((i * 7 % 180) as i64);
            let leave = join + chrono::Duration::minutes(30 + (i * 11 % 60) as i64);
            Membership {
                id: format!("m_{:03}", i),
                session_id: "session_bench".to_string(),
                participant_id: format!("p_{:03}", i),
                join_time: join,
                leave_time: Some(leave),
            }
        })
        .collect()
}

/// Benchmark: full-house sessions at increasing group sizes.
fn bench_full_house(c: &mut Criterion) {
    let location = load_location();
    let session = make_session();

    let mut group = c.benchmark_group("full_house");
    for count in [1usize, 5, 10, 20] {
        let memberships = full_house_memberships(count);
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(count),
            &memberships,
            |b, memberships| {
                b.iter(|| {
                    compute_costs(
                        black_box(&location),
                        black_box(&session),
                        black_box(memberships),
                    )
                    .unwrap()
                })
            },
        );
    }
    group.finish();
}

/// Benchmark: high-churn sessions with many elementary intervals.
fn bench_churn(c: &mut Criterion) {
    let location = load_location();
    let session = make_session();

    let mut group = c.benchmark_group("churn");
    for count in [5usize, 10, 20] {
        let memberships = churn_memberships(count);
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(count),
            &memberships,
            |b, memberships| {
                b.iter(|| {
                    compute_costs(
                        black_box(&location),
                        black_box(&session),
                        black_box(memberships),
                    )
                    .unwrap()
                })
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_full_house, bench_churn);
criterion_main!(benches);
