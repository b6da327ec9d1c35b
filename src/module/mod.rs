//! Compilation units.
//!
//! A [`module::Module`] is one parsed source file. Modules are owned by the
//! [`graph::ModuleGraph`], which also resolves `import` statements to other
//! modules of the same compilation. [`order::compilation_order`] picks the
//! order in which the type checker visits them.

pub mod graph;
pub mod module;
pub mod order;

#[cfg(test)]
mod tests;
