use rustc_hash::FxHashMap;

use crate::errors::{ManipulatorError, Result};
use crate::property::{element_index, PathSegment, PropertyAccess, PropertyHandle, PropertyPath, PropertyValue};

/// A dynamic property tree.
///
/// Hosts without static reflection can expose their editable state as a bag
/// of named values, nested structs and arrays.
///
/// ```rust,ignore
/// let bag = PropertyBag::new()
///     .with("pivot", PropertyValue::Transform(Transform::IDENTITY))
///     .with("open", PropertyValue::Bool(false));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertyBag {
    fields: FxHashMap<String, PropertyValue>,
}

impl PropertyBag {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: PropertyValue) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: PropertyValue) -> Option<PropertyValue> {
        self.fields.insert(name.into(), value)
    }

    pub fn remove(&mut self, name: &str) -> Option<PropertyValue> {
        self.fields.remove(name)
    }

    #[must_use]
    pub fn field(&self, name: &str) -> Option<&PropertyValue> {
        self.fields.get(name)
    }
}

/// Steps into an array element, either the bracket index or (for the last
/// segment only) the caller's element index.
fn element<'a>(
    value: &'a PropertyValue,
    segment: &PathSegment,
    is_leaf: bool,
    index: i32,
    path: &PropertyPath,
) -> Result<(&'a PropertyValue, Option<usize>)> {
    let wanted = match (segment.index, value) {
        (Some(i), _) => Some(i),
        (None, PropertyValue::Array(_)) if is_leaf => {
            Some(element_index(index).ok_or_else(|| not_found(path, index))?)
        }
        (None, _) => None,
    };

    match (wanted, value) {
        (None, _) => Ok((value, None)),
        (Some(i), PropertyValue::Array(items)) => items
            .get(i)
            .map(|item| (item, Some(i)))
            .ok_or_else(|| out_of_bounds(path, i, items.len())),
        (Some(_), _) => Err(ManipulatorError::PropertyNotFound(path.to_string())),
    }
}

fn element_mut<'a>(
    value: &'a mut PropertyValue,
    segment: &PathSegment,
    is_leaf: bool,
    index: i32,
    path: &PropertyPath,
) -> Result<(&'a mut PropertyValue, Option<usize>)> {
    let wanted = match (segment.index, &*value) {
        (Some(i), _) => Some(i),
        (None, PropertyValue::Array(_)) if is_leaf => {
            Some(element_index(index).ok_or_else(|| not_found(path, index))?)
        }
        (None, _) => None,
    };

    match (wanted, value) {
        (None, value) => Ok((value, None)),
        (Some(i), PropertyValue::Array(items)) => {
            let len = items.len();
            items
                .get_mut(i)
                .map(|item| (item, Some(i)))
                .ok_or_else(|| out_of_bounds(path, i, len))
        }
        (Some(_), _) => Err(ManipulatorError::PropertyNotFound(path.to_string())),
    }
}

fn not_found(path: &PropertyPath, index: i32) -> ManipulatorError {
    ManipulatorError::PropertyNotFound(format!("{path}[{index}]"))
}

fn out_of_bounds(path: &PropertyPath, index: usize, len: usize) -> ManipulatorError {
    ManipulatorError::IndexOutOfBounds {
        path: path.to_string(),
        index,
        len,
    }
}

impl PropertyBag {
    fn resolve(&self, path: &PropertyPath, index: i32) -> Result<(&PropertyValue, Option<usize>)> {
        let segments = path.segments();
        let mut fields = &self.fields;

        for (i, segment) in segments.iter().enumerate() {
            let is_leaf = i + 1 == segments.len();
            let value = fields
                .get(&segment.name)
                .ok_or_else(|| ManipulatorError::PropertyNotFound(path.to_string()))?;
            let (value, used) = element(value, segment, is_leaf, index, path)?;

            if is_leaf {
                return Ok((value, used));
            }
            match value {
                PropertyValue::Struct(inner) => fields = inner,
                _ => return Err(ManipulatorError::PropertyNotFound(path.to_string())),
            }
        }

        Err(ManipulatorError::PropertyNotFound(path.to_string()))
    }

    fn resolve_mut(&mut self, path: &PropertyPath, index: i32) -> Result<(&mut PropertyValue, Option<usize>)> {
        let segments = path.segments();
        let mut fields = &mut self.fields;

        for (i, segment) in segments.iter().enumerate() {
            let is_leaf = i + 1 == segments.len();
            let value = fields
                .get_mut(&segment.name)
                .ok_or_else(|| ManipulatorError::PropertyNotFound(path.to_string()))?;
            let (value, used) = element_mut(value, segment, is_leaf, index, path)?;

            if is_leaf {
                return Ok((value, used));
            }
            match value {
                PropertyValue::Struct(inner) => fields = inner,
                _ => return Err(ManipulatorError::PropertyNotFound(path.to_string())),
            }
        }

        Err(ManipulatorError::PropertyNotFound(path.to_string()))
    }
}

impl PropertyAccess for PropertyBag {
    fn get(&self, path: &PropertyPath, index: i32) -> Result<PropertyValue> {
        self.resolve(path, index).map(|(value, _)| value.clone())
    }

    fn set(&mut self, path: &PropertyPath, index: i32, value: PropertyValue) -> Result<PropertyHandle> {
        let Some(kind) = value.kind() else {
            return Err(ManipulatorError::PropertyNotFound(path.to_string()));
        };

        let (slot, used) = self.resolve_mut(path, index)?;
        if slot.kind() != Some(kind) {
            return Err(ManipulatorError::PropertyTypeMismatch {
                path: path.to_string(),
                expected: kind,
            });
        }
        *slot = value;

        Ok(PropertyHandle {
            path: path.clone(),
            index: used,
            kind,
        })
    }
}
