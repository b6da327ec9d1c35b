//! Semantic types.
//!
//! Types live in a [`TyArena`] and are referred to by [`TyId`]. Looking a
//! name up twice yields the same id, so identity comparisons are cheap and
//! a struct can be patched in place once its fields become known.

use std::ops::Index;

use la_arena::{Arena, Idx};

use crate::Span;

use super::scope::Scope;

pub type TyId = Idx<Ty>;

/// Size and alignment in bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    pub width: u32,
    pub align: u32,
}

impl Layout {
    pub const INT32: Layout = Layout { width: 4, align: 4 };
    pub const POINTER: Layout = Layout { width: 8, align: 8 };
}

/// A struct whose width does not fit in 32 bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutOverflow;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StructState {
    /// Declared, but the layout of some field is not known yet
    Placeholder,
    Resolved(Layout),
    /// A field could not be resolved; the error has been reported
    Errored,
}

#[derive(Debug, Clone)]
pub struct StructField {
    pub name: String,
    pub ty: TyId,
}

#[derive(Debug, Clone)]
pub struct StructTy {
    pub name: String,
    /// Index of the declaring module
    pub module: usize,
    pub span: Span,
    pub fields: Vec<StructField>,
    pub state: StructState,
}

impl StructTy {
    pub fn placeholder(name: String, module: usize, span: Span) -> Self {
        StructTy {
            name,
            module,
            span,
            fields: vec![],
            state: StructState::Placeholder,
        }
    }

    pub fn field(&self, name: &str) -> Option<(usize, &StructField)> {
        self.fields
            .iter()
            .enumerate()
            .find(|(_, field)| field.name == name)
    }

    pub fn is_placeholder(&self) -> bool {
        self.state == StructState::Placeholder
    }
}

#[derive(Debug, Clone)]
pub struct FunctionTy {
    pub name: String,
    pub params: Vec<TyId>,
    pub ret: TyId,
    pub is_var_args: bool,
}

#[derive(Debug, Clone)]
pub struct ModuleTy {
    pub module: usize,
    pub name: String,
    pub scope: Scope,
}

#[derive(Debug, Clone)]
pub enum Ty {
    /// The type of expressions without a value, such as calls to functions
    /// that return nothing
    Unknown,
    /// `count` levels of indirection to `inner`, which is never a pointer
    Pointer { count: u32, inner: TyId },
    Int32,
    String,
    Struct(StructTy),
    Function(FunctionTy),
    Module(ModuleTy),
}

impl Ty {
    /// Layout of a value of this type, if it is known.
    ///
    /// Modules and `Unknown` have no layout; neither do structs that are
    /// still waiting on a field.
    pub fn layout(&self) -> Option<Layout> {
        match self {
            Ty::Int32 => Some(Layout::INT32),
            Ty::String | Ty::Pointer { .. } | Ty::Function(_) => Some(Layout::POINTER),
            Ty::Struct(StructTy {
                state: StructState::Resolved(layout),
                ..
            }) => Some(*layout),
            Ty::Struct(_) | Ty::Unknown | Ty::Module(_) => None,
        }
    }

    /// Whether values of this type can never have a layout.
    pub fn is_unsized(&self) -> bool {
        matches!(self, Ty::Unknown | Ty::Module(_))
    }

    /// Sized types with a known layout and unsized types are complete;
    /// only unresolved structs are not.
    pub fn is_initialized(&self) -> bool {
        self.is_unsized() || self.layout().is_some()
    }

    /// Whether the type can be named in a type annotation.
    pub fn is_type(&self) -> bool {
        matches!(
            self,
            Ty::Int32 | Ty::String | Ty::Struct(_) | Ty::Pointer { .. }
        )
    }

    pub fn is_pointer(&self) -> bool {
        matches!(self, Ty::Pointer { .. })
    }

    pub fn is_int(&self) -> bool {
        matches!(self, Ty::Int32)
    }
}

#[derive(Debug, Default)]
pub struct TyArena {
    types: Arena<Ty>,
}

impl TyArena {
    pub fn new() -> Self {
        TyArena::default()
    }

    pub fn alloc(&mut self, ty: Ty) -> TyId {
        self.types.alloc(ty)
    }

    pub fn get(&self, id: TyId) -> &Ty {
        &self.types[id]
    }

    pub fn get_mut(&mut self, id: TyId) -> &mut Ty {
        &mut self.types[id]
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn as_struct(&self, id: TyId) -> Option<&StructTy> {
        match &self.types[id] {
            Ty::Struct(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_struct_mut(&mut self, id: TyId) -> Option<&mut StructTy> {
        match &mut self.types[id] {
            Ty::Struct(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_function(&self, id: TyId) -> Option<&FunctionTy> {
        match &self.types[id] {
            Ty::Function(f) => Some(f),
            _ => None,
        }
    }

    pub fn as_module(&self, id: TyId) -> Option<&ModuleTy> {
        match &self.types[id] {
            Ty::Module(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_module_mut(&mut self, id: TyId) -> Option<&mut ModuleTy> {
        match &mut self.types[id] {
            Ty::Module(m) => Some(m),
            _ => None,
        }
    }

    pub fn layout(&self, id: TyId) -> Option<Layout> {
        self.types[id].layout()
    }

    pub fn is_initialized(&self, id: TyId) -> bool {
        self.types[id].is_initialized()
    }

    /// `count` more levels of indirection on top of `id`.
    pub fn pointer(&mut self, id: TyId, count: u32) -> TyId {
        if count == 0 {
            return id;
        }

        let ty = match self.pointee(id) {
            Some((inner_count, inner)) => Ty::Pointer {
                count: inner_count.saturating_add(count),
                inner,
            },
            None => Ty::Pointer { count, inner: id },
        };
        self.alloc(ty)
    }

    /// The type `id` points to, or `None` if it is not a pointer.
    pub fn deref(&mut self, id: TyId) -> Option<TyId> {
        match self.pointee(id)? {
            (1, inner) => Some(inner),
            (count, inner) => Some(self.alloc(Ty::Pointer {
                count: count - 1,
                inner,
            })),
        }
    }

    fn pointee(&self, id: TyId) -> Option<(u32, TyId)> {
        match &self.types[id] {
            Ty::Pointer { count, inner } => Some((*count, *inner)),
            _ => None,
        }
    }

    /// Computes the layout of struct `id` from its fields.
    ///
    /// Width is the sum of the field widths and alignment the largest field
    /// alignment; an empty struct is 0 bytes aligned to 1. Returns `Ok(false)`
    /// and leaves the struct untouched when a field has no layout yet or the
    /// struct has errored. A struct wider than `u32::MAX` bytes is marked
    /// errored. Non-struct types report whether their layout is known.
    pub fn fill_width_align(&mut self, id: TyId) -> Result<bool, LayoutOverflow> {
        let state = match &self.types[id] {
            Ty::Struct(s) if s.state == StructState::Errored => return Ok(false),
            Ty::Struct(s) => {
                let mut layout = Layout { width: 0, align: 1 };
                let mut overflowed = false;
                for field in &s.fields {
                    let Some(field_layout) = self.types[field.ty].layout() else {
                        return Ok(false);
                    };
                    match layout.width.checked_add(field_layout.width) {
                        Some(width) => layout.width = width,
                        None => {
                            overflowed = true;
                            break;
                        }
                    }
                    layout.align = layout.align.max(field_layout.align);
                }

                if overflowed {
                    StructState::Errored
                } else {
                    StructState::Resolved(layout)
                }
            }
            other => return Ok(other.layout().is_some()),
        };

        let overflowed = state == StructState::Errored;
        if let Some(s) = self.as_struct_mut(id) {
            s.state = state;
        }

        if overflowed {
            Err(LayoutOverflow)
        } else {
            Ok(true)
        }
    }

    /// Structural type equality.
    ///
    /// Structs are nominal: two struct types are equal when they share a
    /// name and a declaring module.
    pub fn types_equal(&self, a: TyId, b: TyId) -> bool {
        if a == b {
            return true;
        }

        match (&self.types[a], &self.types[b]) {
            (Ty::Unknown, Ty::Unknown) | (Ty::Int32, Ty::Int32) | (Ty::String, Ty::String) => true,
            (
                Ty::Pointer {
                    count: count_a,
                    inner: inner_a,
                },
                Ty::Pointer {
                    count: count_b,
                    inner: inner_b,
                },
            ) => count_a == count_b && self.types_equal(*inner_a, *inner_b),
            (Ty::Struct(a), Ty::Struct(b)) => a.name == b.name && a.module == b.module,
            (Ty::Function(a), Ty::Function(b)) => {
                a.is_var_args == b.is_var_args
                    && a.params.len() == b.params.len()
                    && self.types_equal(a.ret, b.ret)
                    && a.params
                        .iter()
                        .zip(&b.params)
                        .all(|(a, b)| self.types_equal(*a, *b))
            }
            (Ty::Module(a), Ty::Module(b)) => a.module == b.module,
            _ => false,
        }
    }

    pub fn ty_to_string(&self, id: TyId) -> String {
        match &self.types[id] {
            Ty::Unknown => String::from("unknown"),
            Ty::Int32 => String::from("i32"),
            Ty::String => String::from("string"),
            Ty::Pointer { count, inner } => {
                format!("{}{}", "*".repeat(*count as usize), self.ty_to_string(*inner))
            }
            Ty::Struct(s) => s.name.clone(),
            Ty::Function(f) => {
                let mut params: Vec<String> =
                    f.params.iter().map(|p| self.ty_to_string(*p)).collect();
                if f.is_var_args {
                    params.push(String::from("..."));
                }

                match self.types[f.ret] {
                    Ty::Unknown => format!("fn({})", params.join(", ")),
                    _ => format!("fn({}): {}", params.join(", "), self.ty_to_string(f.ret)),
                }
            }
            Ty::Module(m) => format!("module {}", m.name),
        }
    }
}

impl Index<TyId> for TyArena {
    type Output = Ty;

    fn index(&self, id: TyId) -> &Ty {
        &self.types[id]
    }
}
