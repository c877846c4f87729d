use glam::{Quat, Vec3};

use crate::editor::camera::ViewportCamera;
use crate::math::Transform;

/// World transform of one shape.
///
/// `shape_offsets` is the shape's own combined offset stack, placed inside
/// the overall size scale, placed inside the widget pose. Planes pass
/// `counter_rotate_scale` so the widget scale is first rotated into the
/// offset's frame, which keeps rotated quads free of shear.
#[must_use]
pub fn shape_transform(
    shape_offsets: &Transform,
    overall_size: f32,
    widget: &Transform,
    counter_rotate_scale: bool,
) -> Transform {
    let mut widget = *widget;
    if counter_rotate_scale {
        widget.scale = shape_offsets.rotation.inverse() * widget.scale;
    }
    *shape_offsets * Transform::from_uniform_scale(overall_size) * widget
}

/// In-plane axes of a circle shape, scaled by the shape transform.
#[must_use]
pub fn circle_axes(shape: &Transform, circle_rotation: Quat) -> (Vec3, Vec3) {
    let axis = |local: Vec3| shape.rotation * ((circle_rotation * local) * shape.scale);
    (axis(Vec3::X), axis(Vec3::Y))
}

/// Size multiplier that keeps a shape at a constant on-screen size.
///
/// Derived from the clip-space W of the widget position, the reference
/// constant and the smaller of the projection's X/Y scale terms. Returns `1`
/// for a degenerate projection.
#[must_use]
pub fn zoom_size_multiplier(camera: &ViewportCamera, widget: &Transform, zoom_reference: f32) -> f32 {
    let projection = camera.projection_matrix();
    let zoom = projection.x_axis.x.min(projection.y_axis.y);
    if zoom.abs() <= f32::EPSILON {
        return 1.0;
    }
    camera.project(widget.translation).w * zoom_reference / zoom
}
