use bitflags::bitflags;
use glam::{Quat, Vec3};

use super::{property_transform, WidgetPose};
use crate::errors::Result;
use crate::manipulator::{flip_on_x, EnumSettings, ManipulatorBinding};
use crate::math::Transform;
use crate::property::{self, PropertyAccess, PropertyHandle, PropertyKind};

bitflags! {
    /// Axes of the host transform widget the user is currently dragging.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct AxisList: u8 {
        const X      = 1 << 0;
        const Y      = 1 << 1;
        const Z      = 1 << 2;
        /// Free screen-space drag.
        const SCREEN = 1 << 3;

        const XY  = Self::X.bits() | Self::Y.bits();
        const XZ  = Self::X.bits() | Self::Z.bits();
        const YZ  = Self::Y.bits() | Self::Z.bits();
        const XYZ = Self::X.bits() | Self::Y.bits() | Self::Z.bits();
    }
}

/// One drag event as reported by the host transform widget.
///
/// Translation and rotation are in world space; scale is an additive local
/// scale change.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InputDelta {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
    pub axis: AxisList,
}

impl Default for InputDelta {
    fn default() -> Self {
        Self {
            translation: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ZERO,
            axis: AxisList::empty(),
        }
    }
}

impl InputDelta {
    #[must_use]
    pub fn translate(translation: Vec3, axis: AxisList) -> Self {
        Self {
            translation,
            axis,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn rotate(rotation: Quat, axis: AxisList) -> Self {
        Self {
            rotation,
            axis,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn scale(scale: Vec3, axis: AxisList) -> Self {
        Self {
            scale,
            axis,
            ..Self::default()
        }
    }
}

/// Applies a drag delta to the bound property and writes the result.
///
/// `widget` must be the pose computed for this binding in the current frame.
/// Returns the written handle for keyframing, or `None` for bool bindings,
/// which toggle on click instead of dragging.
pub fn apply_delta(
    binding: &ManipulatorBinding,
    object: &mut dyn PropertyAccess,
    widget: &WidgetPose,
    delta: &InputDelta,
) -> Result<Option<PropertyHandle>> {
    if binding.property_kind == PropertyKind::Bool {
        return Ok(None);
    }

    let extras = &binding.draw.extras;
    let flags = extras.flip_flags();
    let current = flip_on_x(property_transform(binding, &*object), flags);

    let reference = if !extras.use_attached_socket_as_initial_offset && !extras.use_property_value_as_initial_offset {
        Transform::IDENTITY
    } else {
        widget.reference
    };

    let mut world = current * reference;
    world.translation += delta.translation;
    world.rotation = delta.rotation * world.rotation;

    let mut local = world.relative_to(&reference);
    local.scale = current.scale + delta.scale;

    let local = binding
        .constrain_transform(flip_on_x(local, flags))
        .normalized();

    let path = &binding.property_path;
    let index = binding.property_index;
    let handle = match binding.property_kind {
        PropertyKind::Transform => property::write(object, path, index, local)?,
        PropertyKind::Vector => property::write(object, path, index, local.translation)?,
        PropertyKind::Enum => {
            let value = property::read::<u8>(&*object, path, index);
            property::write(object, path, index, enum_step(&binding.enum_settings, local.translation, value))?
        }
        PropertyKind::Bool => return Ok(None),
    };

    log::trace!("Manipulator '{}' wrote {}", binding.name, handle.path);
    Ok(Some(handle))
}

/// Moves an enum value by the number of whole steps `displacement` covers
/// along the enum axis.
///
/// The displacement snaps to the nearest step with exact halves rounding
/// toward zero steps, so each further `step_size` adds exactly one. The result
/// clamps to `0..enum_size`. An invalid step size leaves the value unchanged.
#[must_use]
pub fn enum_step(settings: &EnumSettings, displacement: Vec3, current: u8) -> u8 {
    if !settings.step_size.is_finite() || settings.step_size <= 0.0 {
        return current;
    }

    let along = settings.axis.component(displacement);
    let steps = (along / settings.step_size - 0.5).ceil();

    let max = settings.enum_size.saturating_sub(1).min(u32::from(u8::MAX)) as f32;
    let value = (f32::from(current) + steps).max(0.0).min(max);
    value as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manipulator::EnumAxis;

    fn settings() -> EnumSettings {
        EnumSettings {
            step_size: 10.0,
            axis: EnumAxis::X,
            enum_size: 10,
        }
    }

    #[test]
    fn half_steps_round_down() {
        assert_eq!(enum_step(&settings(), Vec3::new(25.0, 0.0, 0.0), 3), 5);
        assert_eq!(enum_step(&settings(), Vec3::new(26.0, 0.0, 0.0), 3), 6);
        assert_eq!(enum_step(&settings(), Vec3::new(-25.0, 0.0, 0.0), 3), 0);
    }

    #[test]
    fn other_axes_are_ignored() {
        assert_eq!(enum_step(&settings(), Vec3::new(0.0, 40.0, 40.0), 3), 3);
    }

    #[test]
    fn zero_step_keeps_value() {
        let zero = EnumSettings {
            step_size: 0.0,
            ..settings()
        };
        assert_eq!(enum_step(&zero, Vec3::splat(100.0), 4), 4);
    }
}
