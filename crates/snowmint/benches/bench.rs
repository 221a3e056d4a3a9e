use core::hint::black_box;
use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use snowmint::{
    LockSnowflakeGenerator, MonotonicClock, Poll, SnowflakeGenerator, SnowflakeId, TimeSource,
};
use std::{
    thread::scope,
    time::{Duration, Instant},
};

struct FixedMockTime {
    millis: u64,
}

impl TimeSource for FixedMockTime {
    fn current_millis(&self) -> u64 {
        self.millis
    }
}

// Number of IDs generated per benchmark iteration (per-thread for
// multi-threaded).
const TOTAL_IDS: usize = 4096;

/// Benchmarks the hot path where every attempt is `Ready`: one full
/// millisecond worth of sequence numbers against a frozen clock.
fn bench_hot_path(c: &mut Criterion) {
    let mut group = c.benchmark_group("basic/fixed");
    group.throughput(Throughput::Elements(TOTAL_IDS as u64));

    group.bench_function(format!("elems/{TOTAL_IDS}"), |b| {
        b.iter_custom(|iters| {
            let start = Instant::now();

            for _ in 0..iters {
                let mut generator =
                    SnowflakeGenerator::with_time(1, 1, FixedMockTime { millis: 1 }).unwrap();
                generator.set_epoch(0).unwrap();
                for _ in 0..TOTAL_IDS {
                    match generator.poll_id() {
                        Ok(Poll::Ready { id }) => {
                            black_box(id);
                        }
                        _ => unreachable!(),
                    }
                }
            }

            start.elapsed()
        });
    });

    group.finish();
}

/// Benchmarks minting against a real clock, including exhaustion waits.
fn bench_mint(c: &mut Criterion) {
    let mut group = c.benchmark_group("basic/monotonic");
    group.throughput(Throughput::Elements(TOTAL_IDS as u64));

    let mut generator = SnowflakeGenerator::with_time(1, 1, MonotonicClock::new()).unwrap();
    group.bench_function(format!("elems/{TOTAL_IDS}"), |b| {
        b.iter(|| {
            for _ in 0..TOTAL_IDS {
                black_box(generator.mint().unwrap());
            }
        });
    });

    group.finish();
}

/// Benchmarks contention on the lock generator.
fn bench_lock_threaded(c: &mut Criterion) {
    const THREADS: usize = 4;

    let mut group = c.benchmark_group("lock/threads/4");
    group.throughput(Throughput::Elements((TOTAL_IDS * THREADS) as u64));

    group.bench_function(format!("elems/{}", TOTAL_IDS * THREADS), |b| {
        b.iter_custom(|iters| {
            let generator = LockSnowflakeGenerator::with_time(1, 1, MonotonicClock::new()).unwrap();
            let mut elapsed = Duration::ZERO;

            for _ in 0..iters {
                let start = Instant::now();
                scope(|s| {
                    for _ in 0..THREADS {
                        let generator = generator.clone();
                        s.spawn(move || {
                            for _ in 0..TOTAL_IDS {
                                let id: SnowflakeId = generator.mint().unwrap();
                                black_box(id);
                            }
                        });
                    }
                });
                elapsed += start.elapsed();
            }

            elapsed
        });
    });

    group.finish();
}

criterion_group!(benches, bench_hot_path, bench_mint, bench_lock_threaded);
criterion_main!(benches);
