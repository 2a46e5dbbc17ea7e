//! Named hierarchical scopes.

use crate::path::ScopePath;
use serde::{Deserialize, Serialize};

/// The kind of construct a scope was created for.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum ScopeKind {
    /// A module instance.
    Module,
    /// A task body.
    Task,
    /// A function body.
    Function,
    /// A named `begin`/`end` block.
    BeginEnd,
    /// A named `fork`/`join` block.
    ForkJoin,
}

/// A named hierarchical scope.
///
/// The name is the fully qualified dotted path; scopes are registered in
/// the design's scope map under that path.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Scope {
    kind: ScopeKind,
    path: ScopePath,
}

impl Scope {
    /// Creates a scope with the given kind and full path.
    pub fn new(kind: ScopeKind, path: ScopePath) -> Self {
        Self { kind, path }
    }

    /// Returns the scope kind.
    pub fn kind(&self) -> ScopeKind {
        self.kind
    }

    /// Returns the fully qualified path.
    pub fn path(&self) -> &ScopePath {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn construct() {
        let s = Scope::new(ScopeKind::Module, ScopePath::new("top"));
        assert_eq!(s.kind(), ScopeKind::Module);
        assert_eq!(s.path().as_str(), "top");
    }

    #[test]
    fn kinds_distinct() {
        let kinds = [
            ScopeKind::Module,
            ScopeKind::Task,
            ScopeKind::Function,
            ScopeKind::BeginEnd,
            ScopeKind::ForkJoin,
        ];
        for (i, a) in kinds.iter().enumerate() {
            for (j, b) in kinds.iter().enumerate() {
                assert_eq!(i == j, a == b);
            }
        }
    }

    #[test]
    fn serde_roundtrip() {
        let s = Scope::new(ScopeKind::BeginEnd, ScopePath::new("top.blk"));
        let json = serde_json::to_string(&s).unwrap();
        let back: Scope = serde_json::from_str(&json).unwrap();
        assert_eq!(back.kind(), ScopeKind::BeginEnd);
        assert_eq!(back.path().as_str(), "top.blk");
    }
}
