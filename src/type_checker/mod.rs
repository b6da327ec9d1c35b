//! Type checking and semantic analysis.
//!
//! The checker walks the modules of a [`ModuleGraph`](crate::module::graph::ModuleGraph)
//! and records the type of every declaration and expression on the AST.
//!
//! - `ty`: the type arena, layouts and type equality
//! - `scope`: scopes and the per-module scope stack
//! - `waiting`: structs parked until a struct they embed resolves
//! - `type_checker`: the driver
//!
//! Struct declarations may appear in any order and across modules. A
//! struct embedding another struct by value waits until the embedded one
//! has a layout; structs that can never resolve (embedding cycles) are
//! reported once every module has been checked.

pub mod scope;
pub mod ty;
pub mod type_checker;
pub mod waiting;

#[cfg(test)]
mod tests;
