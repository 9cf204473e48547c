//! # Field Paths
//!
//! A `FieldPath` names the offending location inside a validated input:
//! a configuration key such as `PROXY_HOST`, or a nested location inside a
//! submission payload such as `answers → 2 → answer`.
//!
//! ## Rendering
//!
//! Paths render in the bracketed form used at the process boundary:
//! `[answers][2][answer]`. The root path renders as `[]`. Serialized
//! paths are JSON arrays of keys and indices, e.g. `["answers", 2, "answer"]`.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A single step in a [`FieldPath`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PathSegment {
    /// An object member or configuration key.
    Key(String),
    /// A position in a sequence.
    Index(usize),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key(key) => f.write_str(key),
            Self::Index(index) => write!(f, "{index}"),
        }
    }
}

impl From<&str> for PathSegment {
    fn from(key: &str) -> Self {
        Self::Key(key.to_string())
    }
}

impl From<String> for PathSegment {
    fn from(key: String) -> Self {
        Self::Key(key)
    }
}

impl From<usize> for PathSegment {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

/// Ordered location of a field inside a validated input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldPath(Vec<PathSegment>);

impl FieldPath {
    /// The empty path, identifying the input as a whole.
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// A single-segment path naming a top-level key.
    pub fn key(key: impl Into<String>) -> Self {
        Self(vec![PathSegment::Key(key.into())])
    }

    /// Append a key segment in place.
    pub fn push_key(&mut self, key: impl Into<String>) {
        self.0.push(PathSegment::Key(key.into()));
    }

    /// Append an index segment in place.
    pub fn push_index(&mut self, index: usize) {
        self.0.push(PathSegment::Index(index));
    }

    /// Return a copy of this path extended by a key.
    pub fn child_key(&self, key: impl Into<String>) -> Self {
        let mut path = self.clone();
        path.push_key(key);
        path
    }

    /// Return a copy of this path extended by an index.
    pub fn child_index(&self, index: usize) -> Self {
        let mut path = self.clone();
        path.push_index(index);
        path
    }

    /// Parse an RFC 6901 JSON Pointer (`/answers/0/answer`).
    ///
    /// Segments made only of ASCII digits become [`PathSegment::Index`];
    /// everything else is a key with `~1` and `~0` unescaped. The empty
    /// pointer is the root path.
    pub fn from_json_pointer(pointer: &str) -> Self {
        let segments = pointer
            .split('/')
            .skip(1)
            .map(|raw| {
                let is_index = !raw.is_empty()
                    && raw.bytes().all(|b| b.is_ascii_digit())
                    && (raw == "0" || !raw.starts_with('0'));
                match raw.parse::<usize>() {
                    Ok(index) if is_index => PathSegment::Index(index),
                    _ => PathSegment::Key(raw.replace("~1", "/").replace("~0", "~")),
                }
            })
            .collect();
        Self(segments)
    }

    /// Returns the segments of this path.
    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }

    /// Returns true for the root path.
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of segments.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the path has no segments.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("[]");
        }
        for segment in &self.0 {
            write!(f, "[{segment}]")?;
        }
        Ok(())
    }
}

impl<S: Into<PathSegment>> FromIterator<S> for FieldPath {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}
