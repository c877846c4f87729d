//! Shape descriptions drawn for a manipulator.
//!
//! Every shape carries a color multiplier (combined with the binding's base
//! or selected color) and its own offset stack, composed before the overall
//! size and the widget pose.

use std::borrow::Cow;

use glam::{Quat, Vec2, Vec3, Vec4};
use serde::{Deserialize, Serialize};

use super::{set_grow, ManipulatorBinding};
use crate::math::Transform;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WireBox {
    pub color: Vec4,
    pub thickness: f32,
    /// Scales the bounds. Boxes ignore the zoom multiplier.
    pub size_multiplier: f32,
    pub bounds_min: Vec3,
    pub bounds_max: Vec3,
    pub offsets: Vec<Transform>,
}

impl Default for WireBox {
    fn default() -> Self {
        Self {
            color: Vec4::ONE,
            thickness: 2.0,
            size_multiplier: 1.0,
            bounds_min: Vec3::splat(-5.0),
            bounds_max: Vec3::splat(5.0),
            offsets: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WireDiamond {
    pub color: Vec4,
    pub thickness: f32,
    pub size: f32,
    pub offsets: Vec<Transform>,
}

impl Default for WireDiamond {
    fn default() -> Self {
        Self {
            color: Vec4::ONE,
            thickness: 2.0,
            size: 10.0,
            offsets: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WireCircle {
    pub color: Vec4,
    /// Orientation of the circle's plane relative to the shape transform.
    pub rotation: Quat,
    pub radius: f32,
    pub thickness: f32,
    pub num_sides: u32,
    pub offsets: Vec<Transform>,
}

impl Default for WireCircle {
    fn default() -> Self {
        Self {
            color: Vec4::ONE,
            rotation: Quat::IDENTITY,
            radius: 2.0,
            thickness: 2.0,
            num_sides: 24,
            offsets: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Plane {
    pub color: Vec4,
    /// Host material name; `None` draws the host's default.
    pub material: Option<String>,
    pub size: f32,
    pub uv_min: Vec2,
    pub uv_max: Vec2,
    pub offsets: Vec<Transform>,
}

impl Default for Plane {
    fn default() -> Self {
        Self {
            color: Vec4::ONE,
            material: None,
            size: 10.0,
            uv_min: Vec2::ZERO,
            uv_max: Vec2::ONE,
            offsets: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShapeSettings {
    pub wire_boxes: Vec<WireBox>,
    pub wire_diamonds: Vec<WireDiamond>,
    pub wire_circles: Vec<WireCircle>,
    pub planes: Vec<Plane>,
}

impl ShapeSettings {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.wire_boxes.is_empty()
            && self.wire_diamonds.is_empty()
            && self.wire_circles.is_empty()
            && self.planes.is_empty()
    }
}

impl ManipulatorBinding {
    /// Boxes to draw. A binding without any shape draws one default box so
    /// it stays clickable.
    #[must_use]
    pub fn all_wire_boxes(&self) -> Cow<'_, [WireBox]> {
        if self.draw.shapes.is_empty() {
            Cow::Owned(vec![WireBox::default()])
        } else {
            Cow::Borrowed(&self.draw.shapes.wire_boxes)
        }
    }

    #[must_use]
    pub fn wire_box(&self, index: usize) -> Option<&WireBox> {
        self.draw.shapes.wire_boxes.get(index)
    }

    /// Replaces the box at `index`, padding with default boxes.
    pub fn set_wire_box(&mut self, index: usize, shape: WireBox) {
        set_grow(&mut self.draw.shapes.wire_boxes, index, shape);
    }

    #[must_use]
    pub fn wire_diamond(&self, index: usize) -> Option<&WireDiamond> {
        self.draw.shapes.wire_diamonds.get(index)
    }

    pub fn set_wire_diamond(&mut self, index: usize, shape: WireDiamond) {
        set_grow(&mut self.draw.shapes.wire_diamonds, index, shape);
    }

    #[must_use]
    pub fn wire_circle(&self, index: usize) -> Option<&WireCircle> {
        self.draw.shapes.wire_circles.get(index)
    }

    pub fn set_wire_circle(&mut self, index: usize, shape: WireCircle) {
        set_grow(&mut self.draw.shapes.wire_circles, index, shape);
    }

    #[must_use]
    pub fn plane(&self, index: usize) -> Option<&Plane> {
        self.draw.shapes.planes.get(index)
    }

    pub fn set_plane(&mut self, index: usize, shape: Plane) {
        set_grow(&mut self.draw.shapes.planes, index, shape);
    }
}
