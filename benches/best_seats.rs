//! Benchmarks for the best-block search.
//!
//! Run with: cargo bench --bench best_seats

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::hint::black_box;

use seating_system::models::{Grid, Pricing, SeatConfig, SeatKey, SeatStatus};
use seating_system::services::search::{find_best_seats, SeatTypeFilter};
use seating_system::services::selection::set_status;

/// Square hall with an aisle in the middle and every third seat booked
/// from the middle row outwards, so the search has to walk several rows.
fn busy_hall(size: usize) -> Grid {
    let layout = SeatConfig::plain(size, size).with_aisle_after(size / 2 - 1);
    let mut grid = Grid::build(layout, Pricing::default()).expect("valid layout");
    for row in size / 4..size * 3 / 4 {
        for col in (0..size).step_by(3) {
            set_status(&mut grid, SeatKey::new(row, col), SeatStatus::Booked);
        }
    }
    grid
}

fn bench_stock_theater(c: &mut Criterion) {
    let grid = Grid::build(SeatConfig::default(), Pricing::default()).expect("stock theater");
    let mut group = c.benchmark_group("best_seats/theater");

    for filter in [
        SeatTypeFilter::Any,
        SeatTypeFilter::Vip,
        SeatTypeFilter::Accessible,
    ] {
        group.bench_with_input(BenchmarkId::new("pair", filter), &filter, |b, &filter| {
            b.iter(|| black_box(find_best_seats(&grid, black_box(2), filter)))
        });
    }

    group.bench_function("fallback_to_any", |b| {
        b.iter(|| black_box(find_best_seats(&grid, black_box(4), SeatTypeFilter::Accessible)))
    });

    group.finish();
}

fn bench_large_halls(c: &mut Criterion) {
    let mut group = c.benchmark_group("best_seats/busy_hall");

    for size in [16, 64, 256] {
        let grid = busy_hall(size);
        group.throughput(Throughput::Elements(grid.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &grid, |b, grid| {
            b.iter(|| black_box(find_best_seats(grid, black_box(3), SeatTypeFilter::Any)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_stock_theater, bench_large_halls);
criterion_main!(benches);
