//! Criterion benchmarks for oracle queries on random polygons given by tangent cuts.
//! Focus sizes: m in {8, 16, 32, 64} cuts in the plane.
//! Results: by default under target/criterion.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use polyoracle::prelude::*;
use rand::{rngs::StdRng, Rng, SeedableRng};

/// `m` half-planes `n_k · z ≤ c_k` around the origin, shifted into the positive quadrant.
fn random_polygon(m: usize, seed: u64) -> String {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut s = format!("p vlp min {m} 2 0 2 0\nj 1 f\nj 2 f\no 1 1 1\no 2 2 1\nx 1 3\nx 2 3\n");
    for k in 1..=m {
        let theta: f64 = rng.gen::<f64>() * std::f64::consts::TAU;
        let (nx, ny) = (theta.cos(), theta.sin());
        let c: f64 = rng.gen_range(0.5..1.5);
        // Centre moved to (3, 3): n · (z − 3) ≤ c.
        let rhs = c + 3.0 * (nx + ny);
        s += &format!("i {k} u {rhs}\na {k} 1 {nx}\na {k} 2 {ny}\n");
    }
    s
}

fn bench_queries(c: &mut Criterion) {
    let mut group = c.benchmark_group("oracle");
    for &m in &[8usize, 16, 32, 64] {
        let text = random_polygon(m, 42);
        group.bench_with_input(BenchmarkId::new("direction_query", m), &m, |b, _| {
            let mut oracle =
                Oracle::from_reader(text.as_bytes(), "bench.vlp", OracleConfig::deterministic())
                    .unwrap();
            oracle.initialize().unwrap();
            let mut data = oracle.data();
            let mut k = 0u32;
            b.iter(|| {
                k = k.wrapping_add(1);
                let t = f64::from(k % 360).to_radians();
                data.set_direction(&[t.cos(), t.sin()]);
                let _ = oracle.ask(&mut data);
            })
        });
        group.bench_with_input(BenchmarkId::new("load_and_initialize", m), &m, |b, _| {
            b.iter(|| {
                let mut oracle = Oracle::from_reader(
                    text.as_bytes(),
                    "bench.vlp",
                    OracleConfig::deterministic(),
                )
                .unwrap();
                oracle.initialize().unwrap()
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_queries);
criterion_main!(benches);
