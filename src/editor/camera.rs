use glam::{Affine3A, Mat4, Vec3, Vec4};

use crate::math::Transform;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectionType {
    Perspective,
    Orthographic,
}

/// The active viewport's camera, as reported by the host.
///
/// Only used to keep zoom-compensated shapes at a constant screen size.
#[derive(Debug, Clone)]
pub struct ViewportCamera {
    pub projection_type: ProjectionType,
    /// Vertical field of view in radians.
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub ortho_size: f32,

    world_matrix: Affine3A,
    view_matrix: Mat4,
    projection_matrix: Mat4,
    view_projection_matrix: Mat4,
}

impl ViewportCamera {
    /// `fov` in degrees.
    #[must_use]
    pub fn new_perspective(fov: f32, aspect: f32, near: f32, far: f32) -> Self {
        let mut cam = Self {
            projection_type: ProjectionType::Perspective,
            fov: fov.to_radians(),
            aspect,
            near,
            far,
            ortho_size: 10.0,

            world_matrix: Affine3A::IDENTITY,
            view_matrix: Mat4::IDENTITY,
            projection_matrix: Mat4::IDENTITY,
            view_projection_matrix: Mat4::IDENTITY,
        };
        cam.update_projection_matrix();
        cam
    }

    #[must_use]
    pub fn new_orthographic(ortho_size: f32, aspect: f32, near: f32, far: f32) -> Self {
        let mut cam = Self::new_perspective(60.0, aspect, near, far);
        cam.projection_type = ProjectionType::Orthographic;
        cam.ortho_size = ortho_size;
        cam.update_projection_matrix();
        cam
    }

    pub fn update_projection_matrix(&mut self) {
        self.projection_matrix = match self.projection_type {
            ProjectionType::Perspective => Mat4::perspective_rh(self.fov, self.aspect, self.near, self.far),
            ProjectionType::Orthographic => {
                let w = self.ortho_size * self.aspect;
                let h = self.ortho_size;
                Mat4::orthographic_rh(-w, w, -h, h, self.near, self.far)
            }
        };
        self.view_projection_matrix = self.projection_matrix * self.view_matrix;
    }

    /// Moves the camera. The view matrix is the inverse of its world matrix.
    pub fn set_world_transform(&mut self, world: &Transform) {
        self.world_matrix = world.to_affine();
        self.view_matrix = Mat4::from(self.world_matrix).inverse();
        self.view_projection_matrix = self.projection_matrix * self.view_matrix;
    }

    /// Places the camera at `eye` looking at `target`.
    pub fn look_at(&mut self, eye: Vec3, target: Vec3, up: Vec3) {
        self.view_matrix = Mat4::look_at_rh(eye, target, up);
        self.world_matrix = Affine3A::from_mat4(self.view_matrix.inverse());
        self.view_projection_matrix = self.projection_matrix * self.view_matrix;
    }

    #[inline]
    #[must_use]
    pub fn position(&self) -> Vec3 {
        self.world_matrix.translation.into()
    }

    #[inline]
    #[must_use]
    pub fn view_matrix(&self) -> Mat4 {
        self.view_matrix
    }

    #[inline]
    #[must_use]
    pub fn projection_matrix(&self) -> Mat4 {
        self.projection_matrix
    }

    #[inline]
    #[must_use]
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.view_projection_matrix
    }

    /// Projects a world point to clip space (before the perspective divide).
    #[inline]
    #[must_use]
    pub fn project(&self, point: Vec3) -> Vec4 {
        self.view_projection_matrix * point.extend(1.0)
    }
}
