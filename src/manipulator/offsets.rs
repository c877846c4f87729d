use bitflags::bitflags;

use crate::math::{self, Transform};

bitflags! {
    /// Mirror operations applied by [`flip_on_x`].
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct FlipFlags: u8 {
        /// Negate translation X.
        const LOCATION   = 1 << 0;
        /// Mirror the orientation's forward axis across the XY plane.
        const Y_ROTATION = 1 << 1;
        /// Negate scale X.
        const SCALE      = 1 << 2;
    }
}

/// Folds an offset stack into one transform.
///
/// `[a, b, c]` yields `((IDENTITY * a) * b) * c`: each offset is placed in the
/// space of everything accumulated so far. An empty stack is the identity.
#[must_use]
pub fn combine_offsets(offsets: &[Transform]) -> Transform {
    offsets
        .iter()
        .fold(Transform::IDENTITY, |acc, offset| acc * *offset)
}

/// Mirrors a property transform for widgets drawn on the other side of a
/// symmetric rig.
///
/// The rotation flip negates the Z component of the forward axis, mirrors the
/// rest of the basis with it and rebuilds an orthonormal rotation, which
/// matches how a mirrored mesh is drawn. Applying the function twice with
/// the same flags restores the input, including at vertical headings.
#[must_use]
pub fn flip_on_x(mut transform: Transform, flags: FlipFlags) -> Transform {
    if flags.contains(FlipFlags::Y_ROTATION) {
        transform.rotation = math::mirror_rotation_z(transform.rotation);
    }
    if flags.contains(FlipFlags::LOCATION) {
        transform.translation.x = -transform.translation.x;
    }
    if flags.contains(FlipFlags::SCALE) {
        transform.scale.x = -transform.scale.x;
    }
    transform
}
