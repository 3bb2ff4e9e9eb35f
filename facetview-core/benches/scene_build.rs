//! Benchmarks for building scenes from generated material groups

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use facetview_core::{GeometryBundle, MaterialDefaults, MaterialGroup, Scene};

/// Generate a bumpy `n` x `n` grid surface as a single material group
fn generate_grid(n: usize) -> MaterialGroup {
    let mut pts = Vec::with_capacity(n * n);
    for j in 0..n {
        for i in 0..n {
            let (x, y) = (i as f64, j as f64);
            pts.push([x, y, (x * 0.3).sin() * (y * 0.2).cos()]);
        }
    }

    let mut tris = Vec::with_capacity(2 * (n - 1) * (n - 1));
    for j in 0..n - 1 {
        for i in 0..n - 1 {
            let a = j * n + i;
            let b = a + 1;
            let c = a + n;
            let d = c + 1;
            tris.push([a, b, d]);
            tris.push([a, d, c]);
        }
    }

    MaterialGroup::new(pts, tris, [128, 128, 128])
}

fn benchmark_scene_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("scene_build");

    for n in [32, 128, 256] {
        let mut bundle = GeometryBundle::new();
        bundle.insert("grid", generate_grid(n));
        group.throughput(Throughput::Elements(bundle.triangle_count() as u64));

        group.bench_with_input(BenchmarkId::from_parameter(n), &bundle, |b, bundle| {
            b.iter(|| Scene::build(black_box(bundle), &MaterialDefaults::default()).unwrap())
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_scene_build);
criterion_main!(benches);
