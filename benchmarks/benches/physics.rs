//! Physics benchmarks (criterion - wall-clock time).
//!
//! Run all:    cargo bench --manifest-path benchmarks/Cargo.toml --bench physics
//! Filter:     cargo bench --manifest-path benchmarks/Cargo.toml --bench physics -- broadphase

use std::collections::HashMap;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use glam::Vec3;
use rigidkit::physics::broadphase::BroadPhase;
use rigidkit::physics::narrowphase::{collide, view, NarrowPhase};
use rigidkit::physics::rigid_body::integrate_bodies;
use rigidkit::physics::solver::{correct_positions, resolve_collisions};
use rigidkit::{
    BodyHandle, Collider, ConstraintSet, RigidBody, RigidBodySet, Transform,
};
use rigidkit_bench::*;

const GRAVITY: Vec3 = Vec3::new(0.0, -9.81, 0.0);

// ---------------------------------------------------------------------------
// Broadphase
// ---------------------------------------------------------------------------

fn bench_broadphase(c: &mut Criterion) {
    let mut group = c.benchmark_group("broadphase/mixed_shapes");
    for &n in &[50, 100, 500] {
        let bodies = setup_mixed_scene(n);
        let mut broadphase = BroadPhase::new();
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, _| {
            b.iter(|| broadphase.update(&bodies).len());
        });
    }
    group.finish();
}

// ---------------------------------------------------------------------------
// Narrowphase
// ---------------------------------------------------------------------------

fn pair(a: Collider, b: Collider, offset: Vec3) -> (RigidBodySet, BodyHandle, BodyHandle) {
    let mut bodies = RigidBodySet::new();
    let first = bodies.insert(RigidBody::new_dynamic(1.0).with_collider(a));
    let second = bodies.insert(
        RigidBody::new_dynamic(1.0)
            .with_position(offset)
            .with_collider(b),
    );
    (bodies, first, second)
}

fn bench_narrowphase(c: &mut Criterion) {
    {
        let mut group = c.benchmark_group("narrowphase/dispatch");
        let cases = [
            (
                "sphere_sphere",
                Collider::sphere(1.0),
                Collider::sphere(1.0),
                Vec3::new(1.5, 0.0, 0.0),
            ),
            (
                "plane_box",
                Collider::plane(Vec3::Y, 0.0),
                Collider::cuboid(Vec3::splat(0.5)),
                Vec3::new(0.0, 0.45, 0.0),
            ),
            (
                "capsule_capsule",
                Collider::capsule(1.0, 0.3),
                Collider::capsule(1.0, 0.3),
                Vec3::new(0.5, 0.2, 0.0),
            ),
            (
                "sphere_plane",
                Collider::sphere(0.5),
                Collider::plane(Vec3::Y, 0.0),
                Vec3::new(0.0, -0.45, 0.0),
            ),
        ];

        for (name, a, b, offset) in cases {
            let (bodies, first, second) = pair(a, b, offset);
            let mut manifolds = Vec::with_capacity(1);
            group.bench_function(name, |bench| {
                bench.iter(|| {
                    manifolds.clear();
                    if let (Some(a), Some(b)) = (view(&bodies, first), view(&bodies, second)) {
                        let _ = collide(a, b, &mut manifolds);
                    }
                    manifolds.len()
                });
            });
        }
        group.finish();
    }

    {
        let mut group = c.benchmark_group("narrowphase/batch");
        for &n in &[50, 100, 500] {
            let bodies = setup_mixed_scene(n);
            let pairs = BroadPhase::new().update(&bodies).to_vec();
            let mut narrowphase = NarrowPhase::new();
            group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, _| {
                b.iter(|| narrowphase.update(&bodies, &pairs).len());
            });
        }
        group.finish();
    }
}

// ---------------------------------------------------------------------------
// Solver
// ---------------------------------------------------------------------------

fn bench_solver(c: &mut Criterion) {
    {
        let mut group = c.benchmark_group("solver/resolve");
        for &n in &[10, 100, 500] {
            let (bodies, manifolds) = setup_contacts(n);
            group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, _| {
                b.iter_batched(
                    || bodies.clone(),
                    |mut bodies| resolve_collisions(&manifolds, &mut bodies),
                    criterion::BatchSize::SmallInput,
                );
            });
        }
        group.finish();
    }

    {
        let mut group = c.benchmark_group("solver/correct_positions");
        for &n in &[10, 100, 500] {
            let (bodies, manifolds) = setup_contacts(n);
            group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, _| {
                b.iter_batched(
                    || bodies.clone(),
                    |mut bodies| correct_positions(&manifolds, &mut bodies, 0.01, 0.4),
                    criterion::BatchSize::SmallInput,
                );
            });
        }
        group.finish();
    }
}

// ---------------------------------------------------------------------------
// Full pipeline
// ---------------------------------------------------------------------------

fn bench_pipeline(c: &mut Criterion) {
    {
        let mut group = c.benchmark_group("pipeline/fixed_update");
        group.sample_size(30);
        for &n in &[50, 100, 500] {
            group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
                b.iter_batched(
                    || setup_scene(n),
                    |(mut bodies, mut physics)| {
                        let mut transforms: HashMap<BodyHandle, Transform> = HashMap::new();
                        physics.fixed_update(
                            &mut bodies,
                            &mut ConstraintSet::new(),
                            Some(GRAVITY),
                            &mut transforms,
                            0.0,
                            1.0 / 60.0,
                        );
                    },
                    criterion::BatchSize::LargeInput,
                );
            });
        }
        group.finish();
    }

    {
        let mut group = c.benchmark_group("pipeline/sustained_10steps");
        group.sample_size(20);
        for &n in &[100, 500] {
            group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
                b.iter_batched(
                    || setup_scene(n),
                    |(mut bodies, mut physics)| {
                        let mut constraints = ConstraintSet::new();
                        let mut transforms: HashMap<BodyHandle, Transform> = HashMap::new();
                        for _ in 0..10 {
                            physics.step(
                                &mut bodies,
                                &mut constraints,
                                Some(GRAVITY),
                                &mut transforms,
                                1.0 / 60.0,
                            );
                        }
                    },
                    criterion::BatchSize::LargeInput,
                );
            });
        }
        group.finish();
    }

    {
        let mut group = c.benchmark_group("pipeline/stages");
        group.bench_function("integrate_500", |b| {
            b.iter_batched(
                || setup_scene(500).0,
                |mut bodies| integrate_bodies(&mut bodies, Some(GRAVITY), 1.0 / 60.0),
                criterion::BatchSize::LargeInput,
            );
        });
        group.finish();
    }
}

criterion_group!(
    benches,
    bench_broadphase,
    bench_narrowphase,
    bench_solver,
    bench_pipeline
);
criterion_main!(benches);
