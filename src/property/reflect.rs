use std::rc::Rc;

use rustc_hash::FxHashMap;

use crate::errors::{ManipulatorError, Result};
use crate::property::{element_index, PropertyAccess, PropertyHandle, PropertyKind, PropertyPath, PropertyValue};
use crate::utils::interner::{self, Symbol};

/// Reads a field. The index is the resolved array element for array fields.
pub type Getter<T> = fn(&T, Option<usize>) -> Option<PropertyValue>;
/// Writes a field. Returns `false` when the value was rejected.
pub type Setter<T> = fn(&mut T, Option<usize>, PropertyValue) -> bool;

struct FieldAccessor<T> {
    kind: PropertyKind,
    is_array: bool,
    get: Getter<T>,
    set: Setter<T>,
}

/// Static accessor table for a host struct.
///
/// Fields are registered once at startup under their dotted path. Lookups
/// go through the interned key stored on [`PropertyPath`], so a frame's worth
/// of property reads performs no string work.
///
/// Bracket indices are only honoured on the last segment; nested array
/// traversal needs a dedicated accessor for the full path.
pub struct ReflectionTable<T> {
    fields: FxHashMap<Symbol, FieldAccessor<T>>,
}

impl<T> Default for ReflectionTable<T> {
    fn default() -> Self {
        Self {
            fields: FxHashMap::default(),
        }
    }
}

impl<T> ReflectionTable<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a scalar field.
    #[must_use]
    pub fn field(mut self, path: &str, kind: PropertyKind, get: Getter<T>, set: Setter<T>) -> Self {
        self.fields.insert(
            interner::intern(path),
            FieldAccessor {
                kind,
                is_array: false,
                get,
                set,
            },
        );
        self
    }

    /// Registers an array field; accessors receive the element index.
    #[must_use]
    pub fn array_field(mut self, path: &str, kind: PropertyKind, get: Getter<T>, set: Setter<T>) -> Self {
        self.fields.insert(
            interner::intern(path),
            FieldAccessor {
                kind,
                is_array: true,
                get,
                set,
            },
        );
        self
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    fn lookup(&self, path: &PropertyPath, index: i32) -> Result<(&FieldAccessor<T>, Option<usize>)> {
        let segments = path.segments();
        let inner_indexed = segments
            .iter()
            .take(segments.len().saturating_sub(1))
            .any(|s| s.index.is_some());
        if inner_indexed {
            return Err(ManipulatorError::PropertyNotFound(path.to_string()));
        }

        let accessor = self
            .fields
            .get(&path.key())
            .ok_or_else(|| ManipulatorError::PropertyNotFound(path.to_string()))?;

        let element = if accessor.is_array {
            let bracket = segments.last().and_then(|s| s.index);
            Some(
                bracket
                    .or_else(|| element_index(index))
                    .ok_or_else(|| ManipulatorError::PropertyNotFound(format!("{path}[{index}]")))?,
            )
        } else {
            None
        };
        Ok((accessor, element))
    }
}

/// A host value paired with its reflection table.
pub struct Reflected<T> {
    pub value: T,
    table: Rc<ReflectionTable<T>>,
}

impl<T> Reflected<T> {
    pub fn new(value: T, table: Rc<ReflectionTable<T>>) -> Self {
        Self { value, table }
    }
}

impl<T> PropertyAccess for Reflected<T> {
    fn get(&self, path: &PropertyPath, index: i32) -> Result<PropertyValue> {
        let (accessor, element) = self.table.lookup(path, index)?;
        (accessor.get)(&self.value, element).ok_or_else(|| match element {
            Some(i) => ManipulatorError::IndexOutOfBounds {
                path: path.to_string(),
                index: i,
                len: 0,
            },
            None => ManipulatorError::PropertyNotFound(path.to_string()),
        })
    }

    fn set(&mut self, path: &PropertyPath, index: i32, value: PropertyValue) -> Result<PropertyHandle> {
        let table = Rc::clone(&self.table);
        let (accessor, element) = table.lookup(path, index)?;

        if value.kind() != Some(accessor.kind) {
            return Err(ManipulatorError::PropertyTypeMismatch {
                path: path.to_string(),
                expected: accessor.kind,
            });
        }
        if !(accessor.set)(&mut self.value, element, value) {
            return Err(ManipulatorError::PropertyNotFound(path.to_string()));
        }

        Ok(PropertyHandle {
            path: path.clone(),
            index: element,
            kind: accessor.kind,
        })
    }
}
