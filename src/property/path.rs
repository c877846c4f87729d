use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use smallvec::SmallVec;

use crate::errors::{ManipulatorError, Result};
use crate::utils::interner::{self, Symbol};

/// One `name` or `name[index]` step of a property path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PathSegment {
    pub name: String,
    pub index: Option<usize>,
}

/// A parsed dot/bracket property path such as `legs[2].foot.offset`.
///
/// Paths are parsed once when a binding is configured and kept on the
/// binding, so per-frame property access never re-parses strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PropertyPath {
    segments: SmallVec<[PathSegment; 4]>,
    /// Interned field names joined by `.`, brackets stripped.
    key: Symbol,
}

impl Default for PropertyPath {
    fn default() -> Self {
        Self {
            segments: SmallVec::new(),
            key: interner::intern(""),
        }
    }
}

impl PropertyPath {
    /// Parses a path. An empty string yields the empty path, which resolves
    /// to nothing.
    pub fn parse(path: &str) -> Result<Self> {
        let trimmed = path.trim();
        if trimmed.is_empty() {
            return Ok(Self::default());
        }

        let mut segments: SmallVec<[PathSegment; 4]> = SmallVec::new();
        for raw in trimmed.split('.') {
            segments.push(parse_segment(path, raw)?);
        }

        let names: Vec<&str> = segments.iter().map(|s| s.name.as_str()).collect();
        let key = interner::intern(&names.join("."));
        Ok(Self { segments, key })
    }

    /// Interned field-name key (`legs.foot.offset` for `legs[2].foot.offset`).
    #[inline]
    #[must_use]
    pub fn key(&self) -> Symbol {
        self.key
    }

    #[inline]
    #[must_use]
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// The field name of the last segment.
    #[must_use]
    pub fn leaf_name(&self) -> Option<&str> {
        self.segments.last().map(|s| s.name.as_str())
    }

    /// True when no segment carries a bracket index.
    #[must_use]
    pub fn is_plain(&self) -> bool {
        self.segments.iter().all(|s| s.index.is_none())
    }
}

fn parse_segment(path: &str, raw: &str) -> Result<PathSegment> {
    let invalid = |reason| ManipulatorError::InvalidPropertyPath {
        path: path.to_string(),
        reason,
    };

    let raw = raw.trim();
    if raw.is_empty() {
        return Err(invalid("empty segment"));
    }

    let Some(open) = raw.find('[') else {
        if raw.contains(']') {
            return Err(invalid("unbalanced ']'"));
        }
        return Ok(PathSegment {
            name: raw.to_string(),
            index: None,
        });
    };

    let name = &raw[..open];
    if name.is_empty() {
        return Err(invalid("index without a field name"));
    }
    let rest = &raw[open + 1..];
    let Some(inner) = rest.strip_suffix(']') else {
        return Err(invalid("unbalanced '['"));
    };
    let index = inner
        .trim()
        .parse::<usize>()
        .map_err(|_| invalid("array index is not a number"))?;

    Ok(PathSegment {
        name: name.to_string(),
        index: Some(index),
    })
}

impl fmt::Display for PropertyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            f.write_str(&segment.name)?;
            if let Some(index) = segment.index {
                write!(f, "[{index}]")?;
            }
        }
        Ok(())
    }
}

impl std::str::FromStr for PropertyPath {
    type Err = ManipulatorError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl Serialize for PropertyPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PropertyPath {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_nested_with_index() {
        let path = PropertyPath::parse("legs[2].foot.offset").unwrap();
        assert_eq!(path.segments().len(), 3);
        assert_eq!(path.segments()[0].index, Some(2));
        assert_eq!(path.leaf_name(), Some("offset"));
        assert_eq!(path.to_string(), "legs[2].foot.offset");
    }

    #[test]
    fn parse_rejects_malformed() {
        assert!(PropertyPath::parse("a..b").is_err());
        assert!(PropertyPath::parse("a[1").is_err());
        assert!(PropertyPath::parse("a[x]").is_err());
        assert!(PropertyPath::parse("[3]").is_err());
        assert!(PropertyPath::parse("a]").is_err());
    }

    #[test]
    fn empty_path_is_empty() {
        assert!(PropertyPath::parse("  ").unwrap().is_empty());
    }
}
