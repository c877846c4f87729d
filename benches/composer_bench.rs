//! Composer benchmarks
//!
//! Measures the per-frame cost of pose assembly and the drag write path for
//! a binding with a realistic offset stack.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use glam::{Quat, Vec3};
use manipulator_tools::composer::{apply_delta, widget_pose, AxisList, InputDelta};
use manipulator_tools::manipulator::{combine_offsets, ManipulatorBinding};
use manipulator_tools::math::Transform;
use manipulator_tools::property::{PropertyBag, PropertyKind, PropertyValue};

fn offset_stack(len: usize) -> Vec<Transform> {
    (0..len)
        .map(|i| {
            let f = i as f32;
            Transform::new(
                Vec3::new(f, -f, 0.5 * f),
                Quat::from_rotation_z(0.1 * f),
                Vec3::splat(1.0 + 0.01 * f),
            )
        })
        .collect()
}

fn binding(offsets: usize) -> ManipulatorBinding {
    let mut binding = ManipulatorBinding::new("Manipulator", "rig.pivot", PropertyKind::Transform)
        .unwrap_or_default();
    binding.draw.offsets = offset_stack(offsets);
    binding.draw.extras.flip_y_rotation = true;
    binding.constraints.use_location_constraint = true;
    binding
}

fn bag() -> PropertyBag {
    let mut rig = rustc_hash::FxHashMap::default();
    rig.insert(
        "pivot".to_string(),
        PropertyValue::Transform(Transform::new(Vec3::ONE, Quat::from_rotation_y(0.3), Vec3::ONE)),
    );
    PropertyBag::new().with("rig", PropertyValue::Struct(rig))
}

fn bench_combine_offsets(c: &mut Criterion) {
    let mut group = c.benchmark_group("combine_offsets");
    for len in [1, 4, 16] {
        let stack = offset_stack(len);
        group.bench_with_input(BenchmarkId::from_parameter(len), &stack, |b, stack| {
            b.iter(|| combine_offsets(black_box(stack)));
        });
    }
    group.finish();
}

fn bench_widget_pose(c: &mut Criterion) {
    let binding = binding(4);
    let bag = bag();
    let owner = Transform::from_translation(Vec3::new(100.0, 0.0, 0.0));

    c.bench_function("widget_pose", |b| {
        b.iter(|| widget_pose(black_box(&binding), &bag, black_box(&owner), None));
    });
}

fn bench_apply_delta(c: &mut Criterion) {
    let binding = binding(4);
    let owner = Transform::from_translation(Vec3::new(100.0, 0.0, 0.0));
    let delta = InputDelta::translate(Vec3::new(0.1, 0.0, 0.0), AxisList::X);

    c.bench_function("apply_delta", |b| {
        let mut bag = bag();
        b.iter(|| {
            let pose = widget_pose(&binding, &bag, &owner, None);
            apply_delta(&binding, &mut bag, &pose, black_box(&delta))
        });
    });
}

criterion_group!(benches, bench_combine_offsets, bench_widget_pose, bench_apply_delta);
criterion_main!(benches);
