//! Registry of source file paths for a compilation session.

use crate::loc::SourceLoc;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Handle to a file registered in a [`SourceDb`].
///
/// Handles are only issued by [`SourceDb::add_file`] and index the
/// database's path table; the IR stores them inside
/// [`SourceLoc`](crate::SourceLoc)s.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct FileId(u32);

/// The source database, mapping [`FileId`]s back to file paths so a
/// [`SourceLoc`] can be rendered as `path:line`.
///
/// The IR never needs the source text itself, only the path, so the
/// database stores paths alone.
pub struct SourceDb {
    paths: Vec<PathBuf>,
}

impl SourceDb {
    /// Creates an empty source database.
    pub fn new() -> Self {
        Self { paths: Vec::new() }
    }

    /// Registers a source file path and returns its handle.
    pub fn add_file(&mut self, path: impl Into<PathBuf>) -> FileId {
        let id = FileId(self.paths.len() as u32);
        self.paths.push(path.into());
        id
    }

    /// Returns the path registered for the given handle.
    ///
    /// # Panics
    ///
    /// Panics if the handle was issued by a different database.
    pub fn path(&self, id: FileId) -> &Path {
        &self.paths[id.0 as usize]
    }

    /// Renders a location as `path:line`. Synthetic locations render as
    /// `<unknown>:0`.
    pub fn render_loc(&self, loc: SourceLoc) -> String {
        match loc.file() {
            Some(file) => format!("{}:{}", self.path(file).display(), loc.line()),
            None => "<unknown>:0".to_string(),
        }
    }
}

impl Default for SourceDb {
    fn default() -> Self {
        Self::new()
    }
}
