//! Criterion benchmarks for rig build and per-frame solve.
//!
//! Covers: schema parse + TriSpace triangulation, and solve over the fixture rigs.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use simplex_core::Simplex;

fn fixture(name: &str) -> String {
    simplex_test_fixtures::rigs::json(name).expect("load rig fixture")
}

fn bench_build(c: &mut Criterion) {
    let json = fixture("floater-square");
    c.bench_function("build_floater_square", |b| {
        b.iter(|| Simplex::from_json(black_box(&json)).unwrap())
    });
}

fn bench_solve(c: &mut Criterion) {
    for name in ["combo", "floater-square", "traversal", "spline"] {
        let mut simplex = Simplex::from_json(&fixture(name)).unwrap();
        let n = simplex.slider_count();
        let inputs: Vec<Vec<f64>> = (0..64)
            .map(|k| {
                (0..n)
                    .map(|i| ((k * 7 + i * 13) % 41) as f64 / 20.0 - 1.0)
                    .collect()
            })
            .collect();
        c.bench_function(&format!("solve_{name}"), |b| {
            b.iter(|| {
                for input in &inputs {
                    black_box(simplex.solve(black_box(input)).unwrap());
                }
            })
        });
    }
}

criterion_group!(benches, bench_build, bench_solve);
criterion_main!(benches);
