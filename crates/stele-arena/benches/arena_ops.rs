//! Criterion micro-benchmarks for boundary-tag alloc/free churn.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use stele_arena::{Arena, ArenaConfig};

fn make_arena_64k() -> Arena {
    Arena::new(ArenaConfig::new(64 * 1024, 8)).unwrap()
}

/// Benchmark: fill the arena to exhaustion, then drain front to back.
fn bench_fill_then_drain(c: &mut Criterion) {
    c.bench_function("fill_then_drain_64k", |b| {
        b.iter(|| {
            let mut arena = make_arena_64k();
            let mut live = Vec::new();
            while let Some(offset) = arena.allocate(4).unwrap() {
                live.push(offset);
            }
            for offset in live.drain(..) {
                arena.deallocate(offset).unwrap();
            }
            black_box(arena.free_bytes());
        });
    });
}

/// Benchmark: steady-state churn — free every other block, refill the
/// gaps, repeat. Exercises coalescing and first-fit over a fragmented
/// chain.
fn bench_fragmented_churn(c: &mut Criterion) {
    c.bench_function("fragmented_churn_64k", |b| {
        b.iter(|| {
            let mut arena = make_arena_64k();
            let mut live = Vec::new();
            while let Some(offset) = arena.allocate(4).unwrap() {
                live.push(offset);
            }
            for _ in 0..8 {
                let mut gaps = Vec::new();
                let mut idx = 0;
                live.retain(|&offset| {
                    idx += 1;
                    if idx % 2 == 0 {
                        gaps.push(offset);
                        false
                    } else {
                        true
                    }
                });
                for offset in gaps {
                    arena.deallocate(offset).unwrap();
                }
                while let Some(offset) = arena.allocate(4).unwrap() {
                    live.push(offset);
                }
            }
            black_box(arena.block_count());
        });
    });
}

/// Benchmark: first-fit scan cost when the fit sits at the far end of a
/// long chain of too-small gaps.
fn bench_worst_case_scan(c: &mut Criterion) {
    // Build a chain of small live blocks with one-element gaps, so a
    // large request walks the whole arena before fitting nowhere.
    let mut arena = make_arena_64k();
    let mut live = Vec::new();
    while let Some(offset) = arena.allocate(1).unwrap() {
        live.push(offset);
    }
    for pair in live.chunks(2) {
        arena.deallocate(pair[0]).unwrap();
    }

    c.bench_function("worst_case_scan_64k", |b| {
        b.iter(|| {
            black_box(arena.allocate(64).unwrap());
        });
    });
}

criterion_group!(
    benches,
    bench_fill_then_drain,
    bench_fragmented_churn,
    bench_worst_case_scan
);
criterion_main!(benches);
