//! Source file tracking for Volta diagnostics.
//!
//! The netlist IR records, for every expression and statement, the file
//! and line it was elaborated from; diagnostics render these as
//! `path:line:` prefixes. Nothing at IR level needs the source text or
//! byte offsets, so a location is just a [`SourceDb`]-issued file handle
//! plus a line number — or no handle at all for compiler-generated
//! entities.

#![warn(missing_docs)]

pub mod loc;
pub mod source_db;

pub use loc::SourceLoc;
pub use source_db::{FileId, SourceDb};
