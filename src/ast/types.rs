//! Type annotations as written in source.
//!
//! The parser only records what the programmer wrote: a number of leading
//! `*`, an optional module alias and a type name. The type checker resolves
//! annotations into arena types.

use std::fmt::Display;

use crate::Span;

#[derive(Debug, Clone, PartialEq)]
pub struct TypeAnnotation {
    pub pointer_count: u32,
    /// Alias of the module the type lives in (`geo` in `geo.Point`).
    pub module: Option<String>,
    pub name: String,
    pub span: Span,
}

impl TypeAnnotation {
    pub fn is_pointer(&self) -> bool {
        self.pointer_count > 0
    }
}

impl Display for TypeAnnotation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", "*".repeat(self.pointer_count as usize))?;
        if let Some(module) = &self.module {
            write!(f, "{}.", module)?;
        }
        write!(f, "{}", self.name)
    }
}
