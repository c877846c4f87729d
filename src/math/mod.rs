//! Transform Math
//!
//! - [`Transform`]: TRS value type with child-then-parent composition
//! - [`rotation_from_basis`]: rebuilds an orthonormal rotation from a
//!   possibly non-orthogonal forward/right/up basis
//! - [`mirror_rotation_z`]: reflects an orientation through the XY plane
//!
//! Axis convention: forward is local +X, right is +Y and up is +Z. The
//! manipulator settings (enum axes, flips) are expressed in this frame.

pub mod transform;

pub use transform::{rotation_approx_eq, Transform};

use glam::{DMat3, DQuat, DVec3, Quat, Vec3};

/// Forward axis of a rotation.
#[inline]
#[must_use]
pub fn forward_vector(rotation: Quat) -> Vec3 {
    rotation * Vec3::X
}

/// Right axis of a rotation.
#[inline]
#[must_use]
pub fn right_vector(rotation: Quat) -> Vec3 {
    rotation * Vec3::Y
}

/// Up axis of a rotation.
#[inline]
#[must_use]
pub fn up_vector(rotation: Quat) -> Vec3 {
    rotation * Vec3::Z
}

/// Builds a rotation from basis vectors that need not be orthogonal.
///
/// `forward` is kept as the primary axis and `right` is re-orthogonalized
/// against it; `up` is only consulted when `right` is parallel to `forward`.
/// The work is done in `f64` so that chains of rebuilds stay stable.
#[must_use]
pub fn rotation_from_basis(forward: Vec3, right: Vec3, up: Vec3) -> Quat {
    let forward = forward.as_dvec3().normalize_or(DVec3::X);

    let mut right = right.as_dvec3().reject_from_normalized(forward);
    if right.length_squared() <= f64::EPSILON {
        right = up.as_dvec3().cross(forward);
    }
    let right = right.normalize_or(forward.any_orthonormal_vector());
    let up = forward.cross(right);

    DQuat::from_mat3(&DMat3::from_cols(forward, right, up))
        .normalize()
        .as_quat()
}

/// Reflects a rotation through the XY plane.
///
/// Every basis axis is mirrored (forward Z negated) and the result is
/// turned back into a proper rotation, so yaw is kept while pitch and roll
/// change sign. The map is smooth at vertical headings and is its own
/// inverse.
#[must_use]
pub fn mirror_rotation_z(rotation: Quat) -> Quat {
    let mirror = |v: Vec3| Vec3::new(v.x, v.y, -v.z);
    rotation_from_basis(
        mirror(forward_vector(rotation)),
        mirror(right_vector(rotation)),
        -mirror(up_vector(rotation)),
    )
}
