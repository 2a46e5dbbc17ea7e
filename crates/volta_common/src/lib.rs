//! Shared foundational types for the Volta Verilog compiler.
//!
//! This crate provides the value primitives every other stage builds on:
//! four-valued logic, plane-packed wide logic vectors, and the common
//! internal error type.

#![warn(missing_docs)]

pub mod logic;
pub mod logic_vec;
pub mod result;

pub use logic::Logic;
pub use logic_vec::LogicVec;
pub use result::{InternalError, VoltaResult};
