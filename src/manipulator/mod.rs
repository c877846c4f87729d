//! Manipulator Bindings
//!
//! A [`ManipulatorBinding`] is the per-instance configuration of one widget:
//! which property it edits, how it is drawn, how values are constrained and
//! how the widget is visually offset. Bindings are plain data owned by the
//! host; the only behavior they carry is pure transform math
//! ([`constraint`], [`offsets`]).
//!
//! Bindings are (de)serializable with `#[serde(default)]` on every settings
//! group, so hosts can store partial configurations.

pub mod constraint;
pub mod offsets;
pub mod shapes;

pub use constraint::{constrain_transform, ConstraintSettings};
pub use offsets::{combine_offsets, flip_on_x, FlipFlags};
pub use shapes::{Plane, ShapeSettings, WireBox, WireCircle, WireDiamond};

use std::fmt::{self, Write as _};

use glam::{Vec3, Vec4};
use serde::{Deserialize, Serialize};

use crate::errors::{ManipulatorError, Result};
use crate::math::Transform;
use crate::property::{PropertyKind, PropertyPath};
use crate::utils::interner::{self, Symbol};

// ============================================================================
// Identity
// ============================================================================

/// Stable identity of a binding across owner reconstruction.
///
/// Derived from the owner name, the binding name, the property path and the
/// property index. Pointer or arena handles are never kept across frames;
/// this key is re-resolved against the live world instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ManipulatorId(Symbol);

impl ManipulatorId {
    #[must_use]
    pub fn new(owner: &str, binding: &str, path: &PropertyPath, index: i32) -> Self {
        Self::new_in(&mut String::new(), owner, binding, path, index)
    }

    /// Same as [`ManipulatorId::new`], formatting the key into `buf`. Known
    /// keys neither allocate nor grow the interner.
    pub fn new_in(buf: &mut String, owner: &str, binding: &str, path: &PropertyPath, index: i32) -> Self {
        buf.clear();
        // Writing into a `String` cannot fail.
        let _ = write!(buf, "{owner}_{binding}_{path}_{index}");
        Self(interner::intern(buf))
    }

    /// Whether this is the key of `binding` on `owner`, checked without
    /// formatting a new string.
    #[must_use]
    pub fn matches(&self, owner: &str, binding: &str, path: &PropertyPath, index: i32) -> bool {
        let mut rest = KeyMatcher(self.as_str());
        write!(rest, "{owner}_{binding}_{path}_{index}").is_ok() && rest.0.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        interner::resolve(self.0)
    }
}

/// Consumes the expected key piece by piece as it is formatted.
struct KeyMatcher<'a>(&'a str);

impl fmt::Write for KeyMatcher<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.0 = self.0.strip_prefix(s).ok_or(fmt::Error)?;
        Ok(())
    }
}

impl fmt::Display for ManipulatorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Settings
// ============================================================================

/// Axis an enum manipulator steps along.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum EnumAxis {
    #[default]
    X,
    Y,
    Z,
}

impl EnumAxis {
    #[inline]
    #[must_use]
    pub fn unit(self) -> Vec3 {
        match self {
            Self::X => Vec3::X,
            Self::Y => Vec3::Y,
            Self::Z => Vec3::Z,
        }
    }

    /// Component of `v` along this axis.
    #[inline]
    #[must_use]
    pub fn component(self, v: Vec3) -> f32 {
        match self {
            Self::X => v.x,
            Self::Y => v.y,
            Self::Z => v.z,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnumSettings {
    /// World distance between two consecutive enum values.
    pub step_size: f32,
    pub axis: EnumAxis,
    /// Number of enum values; results are clamped to `0..enum_size`.
    pub enum_size: u32,
}

impl Default for EnumSettings {
    fn default() -> Self {
        Self {
            step_size: 10.0,
            axis: EnumAxis::X,
            enum_size: 10,
        }
    }
}

impl EnumSettings {
    pub fn validate(&self) -> Result<()> {
        if !self.step_size.is_finite() || self.step_size <= 0.0 {
            return Err(ManipulatorError::InvalidStepSize(self.step_size));
        }
        if self.enum_size == 0 {
            return Err(ManipulatorError::EmptyEnum);
        }
        Ok(())
    }
}

/// Draw ordering of the widget relative to scene geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DepthPriority {
    /// Depth tested against the world.
    World,
    /// Always drawn on top.
    #[default]
    Foreground,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DrawExtras {
    pub depth_priority: DepthPriority,
    /// Seed the widget position from the property value. When unset the
    /// property acts as a pure side-effect target.
    pub use_property_value_as_initial_offset: bool,
    /// Place the widget relative to an attachment socket on the owner.
    pub use_attached_socket_as_initial_offset: bool,
    pub attach_socket: Option<String>,
    /// Keep circle and diamond shapes at a constant on-screen size.
    pub use_zoom_offset: bool,
    pub flip_x_location: bool,
    pub flip_y_rotation: bool,
    pub flip_x_scale: bool,
}

impl Default for DrawExtras {
    fn default() -> Self {
        Self {
            depth_priority: DepthPriority::Foreground,
            use_property_value_as_initial_offset: true,
            use_attached_socket_as_initial_offset: false,
            attach_socket: None,
            use_zoom_offset: false,
            flip_x_location: false,
            flip_y_rotation: false,
            flip_x_scale: false,
        }
    }
}

impl DrawExtras {
    #[must_use]
    pub fn flip_flags(&self) -> FlipFlags {
        let mut flags = FlipFlags::empty();
        flags.set(FlipFlags::LOCATION, self.flip_x_location);
        flags.set(FlipFlags::Y_ROTATION, self.flip_y_rotation);
        flags.set(FlipFlags::SCALE, self.flip_x_scale);
        flags
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DrawSettings {
    /// Linear RGBA color when not selected.
    pub base_color: Vec4,
    /// Linear RGBA color when selected (or a bool that is `true`).
    pub selected_color: Vec4,
    /// Uniform scale applied to every shape.
    pub overall_size: f32,
    /// Visual offset stack, composed in order.
    pub offsets: Vec<Transform>,
    pub shapes: ShapeSettings,
    pub extras: DrawExtras,
}

impl Default for DrawSettings {
    fn default() -> Self {
        Self {
            base_color: Vec4::new(0.15, 0.5, 0.7, 1.0),
            selected_color: Vec4::new(0.5, 0.8, 1.0, 1.0),
            overall_size: 1.0,
            offsets: Vec::new(),
            shapes: ShapeSettings::default(),
            extras: DrawExtras::default(),
        }
    }
}

// ============================================================================
// Binding
// ============================================================================

/// One editable property on one owner, with its draw configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ManipulatorBinding {
    /// Name of the binding on its owner (the component name).
    pub name: String,
    pub property_path: PropertyPath,
    /// Array element; negative when the property is not an array.
    pub property_index: i32,
    pub property_kind: PropertyKind,
    pub enum_settings: EnumSettings,
    pub constraints: ConstraintSettings,
    pub draw: DrawSettings,
    pub visible: bool,

    /// Asks the mode to add this binding to the selection next frame.
    #[serde(skip)]
    pub request_select: bool,
    /// Asks the mode to remove this binding from the selection next frame.
    #[serde(skip)]
    pub request_deselect: bool,
}

impl Default for ManipulatorBinding {
    fn default() -> Self {
        Self {
            name: String::new(),
            property_path: PropertyPath::default(),
            property_index: -1,
            property_kind: PropertyKind::Transform,
            enum_settings: EnumSettings::default(),
            constraints: ConstraintSettings::default(),
            draw: DrawSettings::default(),
            visible: true,
            request_select: false,
            request_deselect: false,
        }
    }
}

impl ManipulatorBinding {
    /// Creates a binding for `path` with default draw settings.
    pub fn new(name: impl Into<String>, path: &str, kind: PropertyKind) -> Result<Self> {
        Ok(Self {
            name: name.into(),
            property_path: PropertyPath::parse(path)?,
            property_kind: kind,
            ..Self::default()
        })
    }

    #[must_use]
    pub fn with_index(mut self, index: i32) -> Self {
        self.property_index = index;
        self
    }

    /// Identity key of this binding when owned by `owner`.
    #[must_use]
    pub fn identity(&self, owner: &str) -> ManipulatorId {
        ManipulatorId::new(owner, &self.name, &self.property_path, self.property_index)
    }

    /// [`identity`](Self::identity) formatted through a reusable buffer.
    pub fn identity_in(&self, owner: &str, buf: &mut String) -> ManipulatorId {
        ManipulatorId::new_in(buf, owner, &self.name, &self.property_path, self.property_index)
    }

    #[must_use]
    pub fn has_identity(&self, owner: &str, id: ManipulatorId) -> bool {
        id.matches(owner, &self.name, &self.property_path, self.property_index)
    }

    /// Whether the location/scale constraint settings affect this binding.
    #[inline]
    #[must_use]
    pub fn constraints_apply(&self) -> bool {
        matches!(self.property_kind, PropertyKind::Transform | PropertyKind::Vector)
    }

    /// Whether the enum settings affect this binding.
    #[inline]
    #[must_use]
    pub fn enum_settings_apply(&self) -> bool {
        self.property_kind == PropertyKind::Enum
    }

    /// Clamps `transform` to the configured constraints.
    ///
    /// A no-op for enum and bool bindings.
    #[must_use]
    pub fn constrain_transform(&self, transform: Transform) -> Transform {
        if self.constraints_apply() {
            constrain_transform(&self.constraints, transform)
        } else {
            transform
        }
    }

    /// Reports configuration errors for the settings groups that apply.
    pub fn validate(&self) -> Result<()> {
        let result = self.check();
        if let Err(err) = &result {
            log::warn!("Manipulator '{}' ({}): {err}", self.name, self.property_path);
        }
        result
    }

    fn check(&self) -> Result<()> {
        if self.enum_settings_apply() {
            self.enum_settings.validate()?;
        }
        if self.constraints_apply() {
            self.constraints.validate()?;
        }
        Ok(())
    }

    // ========================================================================
    // Visual offsets
    // ========================================================================

    /// Sets the visual offset at `index`, growing the stack with identities.
    pub fn set_visual_offset(&mut self, index: usize, offset: Transform) {
        set_grow(&mut self.draw.offsets, index, offset);
    }

    #[must_use]
    pub fn visual_offset(&self, index: usize) -> Option<Transform> {
        self.draw.offsets.get(index).copied()
    }

    /// The whole offset stack composed into one transform.
    #[must_use]
    pub fn combined_visual_offset(&self) -> Transform {
        combine_offsets(&self.draw.offsets)
    }

    pub fn clear_visual_offsets(&mut self) {
        self.draw.offsets.clear();
    }

    pub fn set_colors(&mut self, base: Vec4, selected: Vec4) {
        self.draw.base_color = base;
        self.draw.selected_color = selected;
    }

    /// Draw color for the current selection state.
    #[inline]
    #[must_use]
    pub fn color(&self, highlighted: bool) -> Vec4 {
        if highlighted {
            self.draw.selected_color
        } else {
            self.draw.base_color
        }
    }
}

/// Writes `value` at `index`, filling any gap with defaults.
pub(crate) fn set_grow<T: Default>(list: &mut Vec<T>, index: usize, value: T) {
    if index >= list.len() {
        list.resize_with(index + 1, T::default);
    }
    list[index] = value;
}
