use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::errors::{ManipulatorError, Result};
use crate::math::Transform;

/// Per-axis clamping of a property's translation and scale.
///
/// Rotation is never constrained.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConstraintSettings {
    pub use_location_constraint: bool,
    pub location_min: Vec3,
    pub location_max: Vec3,
    pub use_scale_constraint: bool,
    /// Must stay strictly positive.
    pub scale_min: Vec3,
    pub scale_max: Vec3,
}

impl Default for ConstraintSettings {
    fn default() -> Self {
        Self {
            use_location_constraint: false,
            location_min: Vec3::splat(-5.0),
            location_max: Vec3::splat(5.0),
            use_scale_constraint: false,
            scale_min: Vec3::splat(0.01),
            scale_max: Vec3::splat(2.0),
        }
    }
}

const AXES: [char; 3] = ['X', 'Y', 'Z'];

impl ConstraintSettings {
    pub fn validate(&self) -> Result<()> {
        if self.use_location_constraint {
            check_range("location", self.location_min, self.location_max)?;
        }
        if self.use_scale_constraint {
            check_range("scale", self.scale_min, self.scale_max)?;
            for (axis, min) in AXES.into_iter().zip(self.scale_min.to_array()) {
                if min <= 0.0 {
                    return Err(ManipulatorError::NonPositiveScaleMinimum { axis, min });
                }
            }
        }
        Ok(())
    }
}

fn check_range(constraint: &'static str, min: Vec3, max: Vec3) -> Result<()> {
    for ((axis, min), max) in AXES.into_iter().zip(min.to_array()).zip(max.to_array()) {
        if min > max {
            return Err(ManipulatorError::InvertedConstraint {
                constraint,
                axis,
                min,
                max,
            });
        }
    }
    Ok(())
}

/// Clamps translation and scale per axis when the respective constraint is
/// enabled. Idempotent.
///
/// Inverted ranges never panic: the maximum wins.
#[must_use]
pub fn constrain_transform(settings: &ConstraintSettings, mut transform: Transform) -> Transform {
    if settings.use_location_constraint {
        transform.translation = clamp(transform.translation, settings.location_min, settings.location_max);
    }
    if settings.use_scale_constraint {
        transform.scale = clamp(transform.scale, settings.scale_min, settings.scale_max);
    }
    transform
}

#[inline]
fn clamp(v: Vec3, min: Vec3, max: Vec3) -> Vec3 {
    v.max(min).min(max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inverted_range_prefers_max() {
        let v = clamp(Vec3::splat(3.0), Vec3::splat(2.0), Vec3::splat(1.0));
        assert_eq!(v, Vec3::splat(1.0));
    }

    #[test]
    fn disabled_constraints_are_ignored_by_validation() {
        let settings = ConstraintSettings {
            location_min: Vec3::splat(1.0),
            location_max: Vec3::splat(-1.0),
            ..Default::default()
        };
        assert!(settings.validate().is_ok());
    }
}
