//! Criterion benchmarks for full mesh construction.

use criterion::{criterion_group, criterion_main, Criterion};
use octmesh_bench::{shell_profile_2d, shell_profile_3d};
use octmesh_core::Dimension;
use octmesh_test_utils::{SeededRandom, UniformLevel};
use octmesh_tree::{Tree, TreeConfig};
use std::hint::black_box;

/// Benchmark: build a circle-shell quadtree end to end.
fn bench_build_shell_2d(c: &mut Criterion) {
    let (config, predicate) = shell_profile_2d();
    c.bench_function("build_shell_2d_l8", |b| {
        b.iter(|| {
            let tree = Tree::build(config, &predicate).unwrap();
            black_box(tree.leaves().len());
        });
    });
}

/// Benchmark: build a sphere-shell octree end to end.
fn bench_build_shell_3d(c: &mut Criterion) {
    let (config, predicate) = shell_profile_3d();
    c.bench_function("build_shell_3d_l5", |b| {
        b.iter(|| {
            let tree = Tree::build(config, &predicate).unwrap();
            black_box(tree.leaves().len());
        });
    });
}

/// Benchmark: uniform 64×64 quadtree (no balance cascades, no hanging).
fn bench_build_uniform_2d(c: &mut Criterion) {
    let config = TreeConfig::new(Dimension::Two, 6);
    c.bench_function("build_uniform_2d_l6", |b| {
        b.iter(|| {
            let tree = Tree::build(config, &UniformLevel(6)).unwrap();
            black_box(tree.stats());
        });
    });
}

/// Benchmark: random octree with frequent balance cascades.
fn bench_build_random_3d(c: &mut Criterion) {
    let config = TreeConfig::new(Dimension::Three, 4);
    let predicate = SeededRandom::new(42, 45, 4);
    c.bench_function("build_random_3d_l4", |b| {
        b.iter(|| {
            let tree = Tree::build(config, &predicate).unwrap();
            black_box(tree.hanging_nodes().len());
        });
    });
}

criterion_group!(
    benches,
    bench_build_shell_2d,
    bench_build_shell_3d,
    bench_build_uniform_2d,
    bench_build_random_3d
);
criterion_main!(benches);
