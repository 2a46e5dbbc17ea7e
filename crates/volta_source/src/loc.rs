//! File and line positions for tracking where IR entities came from.

use crate::source_db::FileId;
use serde::{Deserialize, Serialize};

/// A source position: a registered file plus a 1-based line number.
///
/// Entities the compiler invents on its own (padding constants, merged
/// nodes) have no file at all; such locations are built with
/// [`SourceLoc::NONE`] and render as unknown.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct SourceLoc {
    file: Option<FileId>,
    line: u32,
}

impl SourceLoc {
    /// The location of compiler-generated entities: no file, line 0.
    pub const NONE: SourceLoc = SourceLoc {
        file: None,
        line: 0,
    };

    /// Creates a location in the given file at the given line.
    pub fn new(file: FileId, line: u32) -> Self {
        Self {
            file: Some(file),
            line,
        }
    }

    /// Returns the file this location points into, if any.
    pub fn file(&self) -> Option<FileId> {
        self.file
    }

    /// Returns the 1-based line number (0 for synthetic locations).
    pub fn line(&self) -> u32 {
        self.line
    }

    /// Returns `true` for locations with no source file behind them.
    pub fn is_synthetic(&self) -> bool {
        self.file.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source_db::SourceDb;

    #[test]
    fn locations_carry_file_and_line() {
        let mut db = SourceDb::new();
        let file = db.add_file("counter.v");
        let loc = SourceLoc::new(file, 42);
        assert_eq!(loc.file(), Some(file));
        assert_eq!(loc.line(), 42);
        assert!(!loc.is_synthetic());
    }

    #[test]
    fn none_is_synthetic() {
        assert!(SourceLoc::NONE.is_synthetic());
        assert_eq!(SourceLoc::NONE.file(), None);
        assert_eq!(SourceLoc::NONE.line(), 0);
    }

    #[test]
    fn serde_roundtrip() {
        let mut db = SourceDb::new();
        let file = db.add_file("top.v");
        for loc in [SourceLoc::new(file, 17), SourceLoc::NONE] {
            let json = serde_json::to_string(&loc).unwrap();
            let back: SourceLoc = serde_json::from_str(&json).unwrap();
            assert_eq!(loc, back);
        }
    }
}
