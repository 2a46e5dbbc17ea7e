//! Dotted hierarchical scope paths and upward name resolution.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A fully qualified hierarchical path such as `top.sub.block`.
///
/// Scope paths are dotted strings; the root scope is a single undotted
/// segment. Hierarchical name lookups walk a path upward one segment at a
/// time via [`parent`](ScopePath::parent).
#[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct ScopePath(String);

impl ScopePath {
    /// Creates a path from a dotted string.
    ///
    /// # Panics
    ///
    /// Panics if the string is empty.
    pub fn new(path: impl Into<String>) -> Self {
        let path = path.into();
        assert!(!path.is_empty(), "scope path must not be empty");
        Self(path)
    }

    /// Returns the path as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Appends a child segment, producing `self.name`.
    pub fn join(&self, name: &str) -> ScopePath {
        ScopePath(format!("{}.{name}", self.0))
    }

    /// Returns the enclosing path, or `None` for a root path.
    pub fn parent(&self) -> Option<ScopePath> {
        self.0
            .rfind('.')
            .map(|pos| ScopePath(self.0[..pos].to_string()))
    }

    /// Returns the fullname key `self.name` used by the design registries.
    pub fn key(&self, name: &str) -> String {
        format!("{}.{name}", self.0)
    }
}

impl fmt::Display for ScopePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ScopePath {
    fn from(path: &str) -> Self {
        ScopePath::new(path)
    }
}

/// Resolves `name` against `map` by upward scope search.
///
/// Tries `path.name`, then strips the last segment from `path` and
/// retries, until the root segment has been tried. The bare `name` with no
/// scope prefix is never tried; keys in the design registries are always
/// fully qualified.
pub(crate) fn resolve_upward<'a, T>(
    map: &'a std::collections::HashMap<String, T>,
    path: &ScopePath,
    name: &str,
) -> Option<&'a T> {
    let mut scope = Some(path.clone());
    while let Some(cur) = scope {
        if let Some(found) = map.get(&cur.key(name)) {
            return Some(found);
        }
        scope = cur.parent();
    }
    None
}
