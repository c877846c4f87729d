use std::ops::Mul;

use glam::{Affine3A, EulerRot, Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Translation / rotation / scale value.
///
/// Unlike a scene node transform this carries no cached matrices; it is a
/// plain value that the manipulator pipeline composes, inverts and writes
/// back into properties.
///
/// # Composition
///
/// `a * b` places `a` inside the space of `b` ("child relative to parent"):
/// the result first applies `a`, then `b`. A chain `a * b * c` therefore
/// reads from the innermost (local) transform to the outermost (world) one.
///
/// Scale is carried per axis and never produces shear, so composing a
/// non-uniformly scaled parent with a rotated child is an approximation,
/// exactly mirrored by [`Transform::relative_to`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Transform {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Transform {
    pub const IDENTITY: Self = Self {
        translation: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    #[inline]
    #[must_use]
    pub const fn new(translation: Vec3, rotation: Quat, scale: Vec3) -> Self {
        Self {
            translation,
            rotation,
            scale,
        }
    }

    #[inline]
    #[must_use]
    pub const fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }

    #[inline]
    #[must_use]
    pub const fn from_rotation(rotation: Quat) -> Self {
        Self {
            translation: Vec3::ZERO,
            rotation,
            scale: Vec3::ONE,
        }
    }

    #[inline]
    #[must_use]
    pub const fn from_scale(scale: Vec3) -> Self {
        Self {
            translation: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale,
        }
    }

    /// Uniform scale helper, used for the manipulator's overall size.
    #[inline]
    #[must_use]
    pub const fn from_uniform_scale(scale: f32) -> Self {
        Self::from_scale(Vec3::splat(scale))
    }

    // ========================================================================
    // Algebra
    // ========================================================================

    /// Returns the transform that undoes `self`, so `t * t.inverse()` is the
    /// identity. Zero scale components invert to zero.
    #[must_use]
    pub fn inverse(&self) -> Self {
        let inv_scale = safe_recip(self.scale);
        let inv_rotation = self.rotation.inverse();
        Self {
            translation: inv_rotation * (inv_scale * -self.translation),
            rotation: inv_rotation,
            scale: inv_scale,
        }
    }

    /// Expresses `self` relative to `parent`.
    ///
    /// This is the exact inverse of composition: `(a * b).relative_to(&b) == a`
    /// for every `b` without zero scale components.
    #[must_use]
    pub fn relative_to(&self, parent: &Self) -> Self {
        let inv_scale = safe_recip(parent.scale);
        let inv_rotation = parent.rotation.inverse();
        Self {
            translation: (inv_rotation * (self.translation - parent.translation)) * inv_scale,
            rotation: inv_rotation * self.rotation,
            scale: self.scale * inv_scale,
        }
    }

    /// Renormalizes the rotation to counter floating point drift.
    #[inline]
    pub fn normalize_rotation(&mut self) {
        self.rotation = self.rotation.normalize();
    }

    /// Builder form of [`normalize_rotation`](Self::normalize_rotation).
    #[inline]
    #[must_use]
    pub fn normalized(mut self) -> Self {
        self.normalize_rotation();
        self
    }

    #[inline]
    #[must_use]
    pub fn transform_point(&self, point: Vec3) -> Vec3 {
        self.rotation * (self.scale * point) + self.translation
    }

    #[inline]
    #[must_use]
    pub fn transform_vector(&self, vector: Vec3) -> Vec3 {
        self.rotation * (self.scale * vector)
    }

    // ========================================================================
    // Conversions
    // ========================================================================

    /// Matrix including scale, as consumed by the primitive drawer.
    #[inline]
    #[must_use]
    pub fn to_mat4(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }

    #[inline]
    #[must_use]
    pub fn to_affine(&self) -> Affine3A {
        Affine3A::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }

    /// Decomposes an affine matrix. Shear is lost.
    #[must_use]
    pub fn from_affine(affine: &Affine3A) -> Self {
        let (scale, rotation, translation) = affine.to_scale_rotation_translation();
        Self {
            translation,
            rotation,
            scale,
        }
    }

    /// Helper: set rotation from Euler angles (XYZ order, radians).
    pub fn set_rotation_euler(&mut self, x: f32, y: f32, z: f32) {
        self.rotation = Quat::from_euler(EulerRot::XYZ, x, y, z);
    }

    /// Current rotation as Euler angles (XYZ order, radians).
    #[must_use]
    pub fn rotation_euler(&self) -> Vec3 {
        let (x, y, z) = self.rotation.to_euler(EulerRot::XYZ);
        Vec3::new(x, y, z)
    }

    /// Compares translation, scale and the rotation's effect (so `q` and `-q`
    /// are considered equal).
    ///
    /// Rotations match when their X and Y basis axes are within `epsilon`
    /// component-wise, which bounds the angular difference by roughly
    /// `epsilon` radians.
    #[must_use]
    pub fn approx_eq(&self, other: &Self, epsilon: f32) -> bool {
        self.translation.abs_diff_eq(other.translation, epsilon)
            && self.scale.abs_diff_eq(other.scale, epsilon)
            && rotation_approx_eq(self.rotation, other.rotation, epsilon)
    }
}

/// Compares two rotations by where they send the X and Y axes.
#[must_use]
pub fn rotation_approx_eq(a: Quat, b: Quat, epsilon: f32) -> bool {
    (a * Vec3::X).abs_diff_eq(b * Vec3::X, epsilon) && (a * Vec3::Y).abs_diff_eq(b * Vec3::Y, epsilon)
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul for Transform {
    type Output = Transform;

    /// `self` placed in the space of `parent`.
    fn mul(self, parent: Transform) -> Transform {
        Transform {
            translation: parent.rotation * (parent.scale * self.translation) + parent.translation,
            rotation: parent.rotation * self.rotation,
            scale: parent.scale * self.scale,
        }
    }
}

impl Mul<&Transform> for &Transform {
    type Output = Transform;

    #[inline]
    fn mul(self, parent: &Transform) -> Transform {
        *self * *parent
    }
}

fn safe_recip(v: Vec3) -> Vec3 {
    let recip = |c: f32| if c.abs() <= f32::EPSILON { 0.0 } else { 1.0 / c };
    Vec3::new(recip(v.x), recip(v.y), recip(v.z))
}
