use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::Rng;

use levelwise::{ItemId, LatticeDriver, MemoryStore, MinSupport, NullSink};

/// Generate synthetic grouped transactions
///
/// Parameters:
/// - num_transactions: Number of transactions
/// - num_items: Total number of possible items
/// - avg_transaction_size: Average items per transaction
/// - density: Chance that each drawn item is kept
fn generate_store(
    num_transactions: usize,
    num_items: usize,
    avg_transaction_size: usize,
    density: f64,
) -> MemoryStore {
    let mut rng = rand::thread_rng();
    let mut store = MemoryStore::new();

    for tx in 0..num_transactions {
        let random_factor: f64 = rng.r#gen();
        let size = (avg_transaction_size as f64 * (0.5 + random_factor)).round() as usize;

        for _ in 0..size.min(num_items) {
            let density_check: f64 = rng.r#gen();
            if density_check < density {
                let item = rng.gen_range(0..num_items) as ItemId;
                store.insert_membership(tx as i64, item);
            }
        }
    }

    store
}

fn min_count(store: &MemoryStore, fraction: f64) -> MinSupport {
    let count = (fraction * store.num_transactions() as f64).ceil() as i64;
    MinSupport::new(count.max(1)).unwrap()
}

/// Mining with different dataset sizes
fn bench_lattice_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("lattice_scaling");

    let configs = vec![
        ("small_100tx", 100, 20, 5),
        ("medium_500tx", 500, 50, 10),
        ("large_1000tx", 1000, 100, 15),
    ];

    for (name, num_tx, num_items, avg_size) in configs {
        let store = generate_store(num_tx, num_items, avg_size, 0.7);
        let min_support = min_count(&store, 0.1);

        group.bench_with_input(BenchmarkId::from_parameter(name), &store, |b, store| {
            b.iter(|| LatticeDriver::new(black_box(store), min_support).run(&NullSink));
        });
    }

    group.finish();
}

/// Mining with different minimum support thresholds
fn bench_lattice_min_support(c: &mut Criterion) {
    let mut group = c.benchmark_group("lattice_min_support");

    let store = generate_store(1000, 50, 10, 0.7);

    for &fraction in &[0.05, 0.1, 0.2, 0.3] {
        let min_support = min_count(&store, fraction);
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{:.2}", fraction)),
            &min_support,
            |b, &min_support| {
                b.iter(|| LatticeDriver::new(&store, black_box(min_support)).run(&NullSink));
            },
        );
    }

    group.finish();
}

/// Sequential against per-prefix parallel generation
fn bench_lattice_parallel(c: &mut Criterion) {
    let mut group = c.benchmark_group("lattice_parallel");

    let store = generate_store(2000, 60, 12, 0.8);
    let min_support = min_count(&store, 0.05);
    let driver = LatticeDriver::new(&store, min_support);

    group.bench_function("sequential", |b| b.iter(|| driver.run(&NullSink)));
    group.bench_function("parallel", |b| b.iter(|| driver.run_parallel(&NullSink)));

    group.finish();
}

criterion_group!(
    benches,
    bench_lattice_scaling,
    bench_lattice_min_support,
    bench_lattice_parallel
);
criterion_main!(benches);
