//! Transform Composer
//!
//! Stateless functions turning a binding plus the live property value into a
//! widget pose, and turning a viewport delta back into a property write.
//!
//! # Pose
//!
//! ```text
//! pose      = property * enum_offset * visual_offsets * socket * owner
//! reference =            enum_offset * visual_offsets * socket * owner
//! ```
//!
//! `property` is the constrained, flipped property value. It is dropped to the
//! identity when the binding does not use the property as its initial offset.
//! In socket mode `socket` is the owner-space socket transform with the
//! property removed again, so the widget sits on the socket.
//!
//! The `reference` frame is the widget pose without the property's own
//! contribution; drag deltas are interpreted relative to it.

pub mod delta;
pub mod shape;

pub use delta::{apply_delta, enum_step, AxisList, InputDelta};
pub use shape::{circle_axes, shape_transform, zoom_size_multiplier};

use glam::Vec3;

use crate::manipulator::{combine_offsets, flip_on_x, ManipulatorBinding};
use crate::math::Transform;
use crate::property::{self, PropertyAccess, PropertyKind};

/// A widget's world pose and its reference frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WidgetPose {
    pub pose: Transform,
    pub reference: Transform,
}

/// Reads the bound property as a transform.
///
/// Vectors become translations. Enum and bool properties have no positional
/// value of their own and read as the identity.
#[must_use]
pub fn property_transform(binding: &ManipulatorBinding, object: &dyn PropertyAccess) -> Transform {
    let path = &binding.property_path;
    let index = binding.property_index;
    match binding.property_kind {
        PropertyKind::Transform => property::read::<Transform>(object, path, index),
        PropertyKind::Vector => Transform::from_translation(property::read::<Vec3>(object, path, index)),
        PropertyKind::Enum | PropertyKind::Bool => Transform::IDENTITY,
    }
}

/// Current value of an enum binding; `0` for other kinds.
#[must_use]
pub fn enum_value(binding: &ManipulatorBinding, object: &dyn PropertyAccess) -> u8 {
    if binding.property_kind == PropertyKind::Enum {
        property::read::<u8>(object, &binding.property_path, binding.property_index)
    } else {
        0
    }
}

/// Current value of a bool binding; `false` for other kinds.
#[must_use]
pub fn bool_value(binding: &ManipulatorBinding, object: &dyn PropertyAccess) -> bool {
    binding.property_kind == PropertyKind::Bool
        && property::read::<bool>(object, &binding.property_path, binding.property_index)
}

/// Translation of an enum widget: one step along the enum axis per value.
#[must_use]
pub fn enum_offset(binding: &ManipulatorBinding, object: &dyn PropertyAccess) -> Transform {
    if binding.property_kind != PropertyKind::Enum {
        return Transform::IDENTITY;
    }
    let settings = &binding.enum_settings;
    let value = f32::from(enum_value(binding, object));
    Transform::from_translation(settings.axis.unit() * settings.step_size * value)
}

/// Composes the widget pose of `binding`.
///
/// `socket` is the owner-space transform of the binding's attachment socket,
/// if the owner has one; a missing socket behaves like the identity.
#[must_use]
pub fn widget_pose(
    binding: &ManipulatorBinding,
    object: &dyn PropertyAccess,
    owner_world: &Transform,
    socket: Option<&Transform>,
) -> WidgetPose {
    let extras = &binding.draw.extras;

    let raw = binding.constrain_transform(property_transform(binding, object));
    let mut property = flip_on_x(raw, extras.flip_flags());

    let mut socket_frame = Transform::IDENTITY;
    if extras.use_attached_socket_as_initial_offset {
        socket_frame = property.inverse() * socket.copied().unwrap_or_default();
    } else if !extras.use_property_value_as_initial_offset {
        property = Transform::IDENTITY;
    }
    property.normalize_rotation();
    socket_frame.normalize_rotation();

    let offsets = combine_offsets(&binding.draw.offsets);
    let enum_frame = enum_offset(binding, object);

    WidgetPose {
        pose: (property * enum_frame * offsets * socket_frame * *owner_world).normalized(),
        reference: (enum_frame * offsets * socket_frame * *owner_world).normalized(),
    }
}
