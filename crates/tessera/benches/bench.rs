use core::hint::black_box;
use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use std::{
    sync::{Arc, Barrier},
    thread::scope,
    time::{Duration, Instant},
};
use tessera::{
    EpochClock, FieldValues, FreeCounter, FreeRunningGenerator, IdGenerator, Layout,
    MonotonicGenerator, Overrides, StructuredId, TWITTER_EPOCH, TimeSource,
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
// multi-threaded). Fits one tick of the twitter sequence.
const TOTAL_IDS: usize = 4096;

fn mock_clock() -> EpochClock<FixedMockTime> {
    EpochClock::with_source(Duration::ZERO, FixedMockTime { millis: 1 })
}

/// Benchmarks a generator built fresh for every iteration.
fn bench_generator<G: IdGenerator>(c: &mut Criterion, group_name: &str, factory: impl Fn() -> G) {
    let mut group = c.benchmark_group(group_name);
    group.throughput(Throughput::Elements(TOTAL_IDS as u64));

    group.bench_function(format!("elems/{TOTAL_IDS}"), |b| {
        b.iter_custom(|iters| {
            let start = Instant::now();
            for _ in 0..iters {
                let generator = factory();
                for _ in 0..TOTAL_IDS {
                    black_box(generator.next_id().unwrap());
                }
            }
            start.elapsed()
        });
    });

    group.finish();
}

/// Benchmarks one generator shared across threads.
fn bench_generator_contended<G>(c: &mut Criterion, group_name: &str, factory: impl Fn() -> G)
where
    G: IdGenerator + Send + Sync,
{
    let mut group = c.benchmark_group(group_name);

    for thread_count in [1, 2, 4, 8] {
        let ids_per_thread = TOTAL_IDS / thread_count;

        group.throughput(Throughput::Elements(TOTAL_IDS as u64));
        group.bench_function(format!("elems/{TOTAL_IDS}/threads/{thread_count}"), |b| {
            b.iter_custom(|iters| {
                let start = Instant::now();
                for _ in 0..iters {
                    let generator = factory();
                    let barrier = Arc::new(Barrier::new(thread_count + 1));
                    scope(|s| {
                        for _ in 0..thread_count {
                            let generator = &generator;
                            let barrier = Arc::clone(&barrier);
                            s.spawn(move || {
                                barrier.wait();
                                for _ in 0..ids_per_thread {
                                    black_box(generator.next_id().unwrap());
                                }
                            });
                        }
                        barrier.wait();
                    });
                }
                start.elapsed()
            });
        });
    }

    group.finish();
}

fn benchmark_pack_unpack(c: &mut Criterion) {
    let layout = Layout::regional();
    let values = FieldValues::from([
        ("reserved", 0),
        ("timestamp", 8_743_199_851),
        ("region", 3),
        ("machine", 17),
        ("sequence", 6_605),
    ]);
    let id = layout.pack(&values).unwrap();

    let mut group = c.benchmark_group("codec");
    group.bench_function("pack/regional", |b| {
        b.iter(|| black_box(layout.pack(black_box(&values)).unwrap()));
    });
    group.bench_function("unpack/regional", |b| {
        b.iter(|| black_box(layout.unpack(black_box(id))));
    });
    group.bench_function("format_parse", |b| {
        b.iter(|| {
            let text = black_box(id).to_string();
            black_box(StructuredId::parse(&text).unwrap())
        });
    });
    group.finish();
}

fn benchmark_mock_sequential_monotonic(c: &mut Criterion) {
    bench_generator(c, "mock/sequential/monotonic", || {
        MonotonicGenerator::builder(Layout::twitter())
            .worker(1)
            .build(mock_clock())
            .unwrap()
    });
}

fn benchmark_mock_sequential_free_running(c: &mut Criterion) {
    let counter = Arc::new(FreeCounter::new(0));
    bench_generator(c, "mock/sequential/free_running", || {
        FreeRunningGenerator::with_counter(Layout::twitter(), mock_clock(), Arc::clone(&counter))
    });
}

fn benchmark_mock_free_running_overrides(c: &mut Criterion) {
    let generator = FreeRunningGenerator::with_counter(
        Layout::regional(),
        mock_clock(),
        Arc::new(FreeCounter::new(0)),
    );
    let overrides = Overrides::new().region(3).machine(17);
    c.bench_function("mock/free_running/overrides", |b| {
        b.iter(|| black_box(generator.generate_with(black_box(&overrides)).unwrap()));
    });
}

fn benchmark_mono_sequential_monotonic(c: &mut Criterion) {
    let clock = EpochClock::new(TWITTER_EPOCH);
    bench_generator(c, "mono/sequential/monotonic", || {
        MonotonicGenerator::builder(Layout::twitter())
            .build(clock.clone())
            .unwrap()
    });
}

fn benchmark_mono_threaded_monotonic(c: &mut Criterion) {
    let clock = EpochClock::new(TWITTER_EPOCH);
    bench_generator_contended(c, "mono/contended/monotonic", || {
        MonotonicGenerator::builder(Layout::twitter())
            .build(clock.clone())
            .unwrap()
    });
}

fn benchmark_mono_threaded_free_running(c: &mut Criterion) {
    bench_generator_contended(c, "mono/contended/free_running", || {
        FreeRunningGenerator::new(Layout::twitter(), EpochClock::new(TWITTER_EPOCH))
    });
}

criterion_group!(
    benches,
    benchmark_pack_unpack,
    // Mock clock
    benchmark_mock_sequential_monotonic,
    benchmark_mock_sequential_free_running,
    benchmark_mock_free_running_overrides,
    // Wall clock
    benchmark_mono_sequential_monotonic,
    benchmark_mono_threaded_monotonic,
    benchmark_mono_threaded_free_running,
);
criterion_main!(benches);
