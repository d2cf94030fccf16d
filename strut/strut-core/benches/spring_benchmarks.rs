//! Benchmarks for the spring force law and the world step loop.
//!
//! Run with: cargo bench -p strut-core

#![allow(missing_docs)]

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use nalgebra::{Point3, Vector3};

use strut_core::{Anchor, CompressionSpring, SpringProperties, World};
use strut_types::{MassProperties, Pose, RigidBodyState, SimulationConfig};

/// Build a world with `count` springs, each between its own pair of free
/// bodies, all starting compressed.
fn world_with_springs(count: usize, directional: bool) -> World {
    let mut world = World::new(SimulationConfig::zero_gravity());

    for i in 0..count {
        let y = i as f64 * 2.0;
        let a = world.add_body(
            RigidBodyState::at_rest(Pose::from_position(Point3::new(0.0, y, 0.0))),
            MassProperties::sphere(1.0, 0.05),
        );
        let b = world.add_body(
            RigidBodyState::at_rest(Pose::from_position(Point3::new(0.7, y, 0.0))),
            MassProperties::sphere(1.0, 0.05),
        );

        let anchors = vec![Anchor::at_origin(a), Anchor::at_origin(b)];
        let props = SpringProperties::new(500.0, 1.0).with_damping(5.0);
        let spring = if directional {
            CompressionSpring::directional(anchors, props, Vector3::x())
        } else {
            CompressionSpring::new(anchors, props)
        }
        .unwrap();
        world.add_spring(spring);
    }

    world
}

/// Benchmark the pure scalar force law, no substrate involved.
fn bench_scalar_force_law(c: &mut Criterion) {
    let mut group = c.benchmark_group("scalar_force_law");

    let floating = SpringProperties::new(500.0, 1.0);
    let attached = floating.with_free_end_attached(true);
    let separations: Vec<f64> = (0..1000).map(|i| 0.2 + 0.0016 * i as f64).collect();

    group.throughput(Throughput::Elements(separations.len() as u64));

    group.bench_function("floating", |b| {
        b.iter(|| {
            let mut total = 0.0;
            for &s in &separations {
                total += floating.force(floating.effective_length(black_box(s)));
            }
            black_box(total)
        });
    });

    group.bench_function("attached", |b| {
        b.iter(|| {
            let mut total = 0.0;
            for &s in &separations {
                total += attached.force(attached.effective_length(black_box(s)));
            }
            black_box(total)
        });
    });

    group.finish();
}

/// Benchmark a single actuator step against real impulse plumbing.
fn bench_single_spring_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("single_spring_step");

    for (name, directional) in [("euclidean", false), ("directional", true)] {
        let world = world_with_springs(1, directional);

        group.bench_function(name, |b| {
            b.iter_batched(
                || world.clone(),
                |mut world| {
                    world.step().unwrap();
                    black_box(world.time())
                },
                criterion::BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

/// Benchmark full world ticks at increasing actuator counts.
fn bench_world_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("world_tick");

    for count in [1, 10, 100, 1000] {
        let world = world_with_springs(count, false);
        group.throughput(Throughput::Elements(count as u64));

        group.bench_with_input(
            BenchmarkId::new("springs", count),
            &world,
            |b, world| {
                b.iter_batched(
                    || world.clone(),
                    |mut world| {
                        world.step().unwrap();
                        black_box(world.time())
                    },
                    criterion::BatchSize::SmallInput,
                );
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_scalar_force_law,
    bench_single_spring_step,
    bench_world_tick,
);
criterion_main!(benches);
