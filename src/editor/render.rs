//! Primitive draw capability.
//!
//! The mode emits one [`DrawCommand`] per shape. Each command carries the
//! identity of its binding as the hit region, so a click on the drawn shape
//! round-trips to the binding.

use glam::{Mat4, Vec2, Vec3, Vec4};

use crate::composer::{circle_axes, shape_transform};
use crate::manipulator::{combine_offsets, DepthPriority, ManipulatorBinding, ManipulatorId};
use crate::math::Transform;

#[derive(Debug, Clone, PartialEq)]
pub enum DrawShape {
    WireBox {
        min: Vec3,
        max: Vec3,
    },
    WireDiamond {
        size: f32,
    },
    Plane {
        size: f32,
        uv_min: Vec2,
        uv_max: Vec2,
        material: Option<String>,
    },
    WireCircle {
        center: Vec3,
        x_axis: Vec3,
        y_axis: Vec3,
        radius: f32,
        num_sides: u32,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct DrawCommand {
    /// Hit region of the shape.
    pub hit: ManipulatorId,
    pub shape: DrawShape,
    /// World matrix including scale.
    pub matrix: Mat4,
    pub color: Vec4,
    pub thickness: f32,
    pub depth_priority: DepthPriority,
}

/// The host renderer's primitive interface.
pub trait PrimitiveDrawer {
    fn draw(&mut self, command: DrawCommand);
}

/// A [`PrimitiveDrawer`] that records commands, for hosts that batch draws
/// and for tests.
#[derive(Debug, Clone, Default)]
pub struct DrawList {
    commands: Vec<DrawCommand>,
}

impl DrawList {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Commands drawn for one binding.
    pub fn for_hit(&self, id: ManipulatorId) -> impl Iterator<Item = &DrawCommand> {
        self.commands.iter().filter(move |c| c.hit == id)
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

impl PrimitiveDrawer for DrawList {
    fn draw(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }
}

/// Emits every shape of `binding` at `widget`.
///
/// `zoom` scales diamond sizes and circle radii; boxes use their own size
/// multiplier instead.
pub fn draw_binding(
    drawer: &mut dyn PrimitiveDrawer,
    binding: &ManipulatorBinding,
    hit: ManipulatorId,
    widget: &Transform,
    color: Vec4,
    zoom: f32,
) {
    let overall = binding.draw.overall_size;
    let depth_priority = binding.draw.extras.depth_priority;
    let shapes = &binding.draw.shapes;

    for shape in binding.all_wire_boxes().iter() {
        let world = shape_transform(&combine_offsets(&shape.offsets), overall, widget, false);
        drawer.draw(DrawCommand {
            hit,
            shape: DrawShape::WireBox {
                min: shape.bounds_min * shape.size_multiplier,
                max: shape.bounds_max * shape.size_multiplier,
            },
            matrix: world.to_mat4(),
            color: color * shape.color,
            thickness: shape.thickness,
            depth_priority,
        });
    }

    for shape in &shapes.wire_diamonds {
        let world = shape_transform(&combine_offsets(&shape.offsets), overall, widget, false);
        drawer.draw(DrawCommand {
            hit,
            shape: DrawShape::WireDiamond {
                size: shape.size * zoom,
            },
            matrix: world.to_mat4(),
            color: color * shape.color,
            thickness: shape.thickness,
            depth_priority,
        });
    }

    for shape in &shapes.planes {
        let world = shape_transform(&combine_offsets(&shape.offsets), overall, widget, true);
        drawer.draw(DrawCommand {
            hit,
            shape: DrawShape::Plane {
                size: shape.size,
                uv_min: shape.uv_min,
                uv_max: shape.uv_max,
                material: shape.material.clone(),
            },
            matrix: world.to_mat4(),
            color: color * shape.color,
            thickness: 0.0,
            depth_priority,
        });
    }

    for shape in &shapes.wire_circles {
        let world = shape_transform(&combine_offsets(&shape.offsets), overall, widget, false);
        let (x_axis, y_axis) = circle_axes(&world, shape.rotation);
        drawer.draw(DrawCommand {
            hit,
            shape: DrawShape::WireCircle {
                center: world.translation,
                x_axis,
                y_axis,
                radius: shape.radius * zoom,
                num_sides: shape.num_sides,
            },
            matrix: world.to_mat4(),
            color: color * shape.color,
            thickness: shape.thickness,
            depth_priority,
        });
    }
}
