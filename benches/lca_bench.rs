//! Strategy comparison benchmarks

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use treelift::{LcaEngine, Strategy};

/// Caterpillar-ish tree: a long spine with leaves hanging off every spine
/// node, so naive climbing pays its O(depth) worst case.
fn deep_tree(spine: usize) -> LcaEngine {
    let n = spine * 2;
    let mut edges = Vec::with_capacity(n - 1);
    for node in 2..=spine {
        edges.push((node - 1, node));
    }
    for (offset, leaf) in (spine + 1..=n).enumerate() {
        edges.push((offset + 1, leaf));
    }
    LcaEngine::build(n, &edges).expect("bench tree builds")
}

fn benchmark_queries(c: &mut Criterion) {
    let engine = deep_tree(2048);
    let deep_pair = (4095, 4096); // leaves near the two spine ends

    c.bench_function("lca_binary_lifting", |b| {
        b.iter(|| {
            let (u, v) = black_box(deep_pair);
            engine.lca(Strategy::BinaryLifting, u, v).unwrap()
        });
    });

    c.bench_function("lca_naive", |b| {
        b.iter(|| {
            let (u, v) = black_box(deep_pair);
            engine.lca(Strategy::Naive, u, v).unwrap()
        });
    });

    let batch: Vec<(usize, usize)> = (1..1024).map(|u| (u, u + 1024)).collect();
    c.bench_function("lca_tarjan_batch_1023", |b| {
        b.iter(|| engine.lca_batch(black_box(&batch)).unwrap());
    });
}

fn benchmark_persistence(c: &mut Criterion) {
    let engine = deep_tree(512);
    let artifact = engine.save().expect("save succeeds");

    c.bench_function("save_1024_nodes", |b| {
        b.iter(|| engine.save().unwrap());
    });
    c.bench_function("load_1024_nodes", |b| {
        b.iter(|| LcaEngine::load(black_box(&artifact)).unwrap());
    });
}

criterion_group!(benches, benchmark_queries, benchmark_persistence);
criterion_main!(benches);
