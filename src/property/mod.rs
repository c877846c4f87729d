//! Property Access
//!
//! Manipulators edit named fields on arbitrary host objects. This module is
//! the boundary to the host's object model:
//!
//! - [`PropertyPath`]: parsed dot/bracket path (`legs[2].foot.offset`)
//! - [`PropertyAccess`]: get/set by path, implemented by host objects
//! - [`PropertyBag`]: dynamic tree object (struct maps and arrays)
//! - [`ReflectionTable`] / [`Reflected`]: typed accessor tables for host
//!   structs, keyed by interned field path
//! - [`read`] / [`write`]: typed helpers over any [`PropertyAccess`]
//!
//! # Failure model
//!
//! [`read`] never fails: a missing path, a type mismatch or an invalid array
//! index all return the zero value of the requested type (identity transform,
//! zero vector, `0`, `false`). Callers must not assume a read reflects a real
//! backing field. [`write`] reports the failure and performs no write.

pub mod bag;
pub mod path;
pub mod reflect;

pub use bag::PropertyBag;
pub use path::{PathSegment, PropertyPath};
pub use reflect::{ReflectionTable, Reflected};

use glam::Vec3;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::errors::Result;
use crate::math::Transform;

/// How a manipulator interprets its bound property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PropertyKind {
    #[default]
    Transform,
    Vector,
    /// Enumerations stored as a byte.
    Enum,
    Bool,
}

impl PropertyKind {
    /// Whether the kind produces a draggable, selectable widget. Bools act as
    /// toggle buttons instead.
    #[inline]
    #[must_use]
    pub fn is_draggable(self) -> bool {
        !matches!(self, Self::Bool)
    }
}

/// A property value as seen through [`PropertyAccess`].
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    Transform(Transform),
    Vector(Vec3),
    Byte(u8),
    Bool(bool),
    Struct(FxHashMap<String, PropertyValue>),
    Array(Vec<PropertyValue>),
}

impl PropertyValue {
    /// The manipulator kind this value can back, if it is a leaf.
    #[must_use]
    pub fn kind(&self) -> Option<PropertyKind> {
        match self {
            Self::Transform(_) => Some(PropertyKind::Transform),
            Self::Vector(_) => Some(PropertyKind::Vector),
            Self::Byte(_) => Some(PropertyKind::Enum),
            Self::Bool(_) => Some(PropertyKind::Bool),
            Self::Struct(_) | Self::Array(_) => None,
        }
    }
}

/// Identifies a property that was just written, for keyframing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyHandle {
    pub path: PropertyPath,
    /// Array element that was written, when the leaf is an array.
    pub index: Option<usize>,
    pub kind: PropertyKind,
}

/// Get/set by path on a host object.
///
/// `index` selects an element when the last path segment names an array and
/// carries no bracket index of its own; it is ignored otherwise. Negative
/// indices never resolve to an element.
pub trait PropertyAccess {
    fn get(&self, path: &PropertyPath, index: i32) -> Result<PropertyValue>;

    /// Replaces a leaf value. The stored type must match `value`; arrays are
    /// never grown.
    fn set(&mut self, path: &PropertyPath, index: i32, value: PropertyValue) -> Result<PropertyHandle>;
}

/// Leaf types a manipulator can read and write.
pub trait PropertyType: Sized + Default {
    const KIND: PropertyKind;

    fn from_value(value: PropertyValue) -> Option<Self>;
    fn into_value(self) -> PropertyValue;
}

impl PropertyType for Transform {
    const KIND: PropertyKind = PropertyKind::Transform;

    fn from_value(value: PropertyValue) -> Option<Self> {
        match value {
            PropertyValue::Transform(t) => Some(t),
            _ => None,
        }
    }

    fn into_value(self) -> PropertyValue {
        PropertyValue::Transform(self)
    }
}

impl PropertyType for Vec3 {
    const KIND: PropertyKind = PropertyKind::Vector;

    fn from_value(value: PropertyValue) -> Option<Self> {
        match value {
            PropertyValue::Vector(v) => Some(v),
            _ => None,
        }
    }

    fn into_value(self) -> PropertyValue {
        PropertyValue::Vector(self)
    }
}

impl PropertyType for u8 {
    const KIND: PropertyKind = PropertyKind::Enum;

    fn from_value(value: PropertyValue) -> Option<Self> {
        match value {
            PropertyValue::Byte(b) => Some(b),
            _ => None,
        }
    }

    fn into_value(self) -> PropertyValue {
        PropertyValue::Byte(self)
    }
}

impl PropertyType for bool {
    const KIND: PropertyKind = PropertyKind::Bool;

    fn from_value(value: PropertyValue) -> Option<Self> {
        match value {
            PropertyValue::Bool(b) => Some(b),
            _ => None,
        }
    }

    fn into_value(self) -> PropertyValue {
        PropertyValue::Bool(self)
    }
}

/// Reads a typed property, falling back to `T::default()` on any failure.
#[must_use]
pub fn read<T: PropertyType>(object: &dyn PropertyAccess, path: &PropertyPath, index: i32) -> T {
    object
        .get(path, index)
        .ok()
        .and_then(T::from_value)
        .unwrap_or_default()
}

/// Writes a typed property.
pub fn write<T: PropertyType>(
    object: &mut dyn PropertyAccess,
    path: &PropertyPath,
    index: i32,
    value: T,
) -> Result<PropertyHandle> {
    object.set(path, index, value.into_value())
}

/// Converts the caller-supplied element index, rejecting negatives.
pub(crate) fn element_index(index: i32) -> Option<usize> {
    usize::try_from(index).ok()
}
