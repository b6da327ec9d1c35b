use std::slice::{Iter, IterMut};

use crate::{type_checker::ty::TyId, Span};

use super::{
    ast::{Expr, Stmt},
    types::TypeAnnotation,
};

#[derive(Debug, Clone)]
pub struct BlockStmt {
    pub body: Vec<Stmt>,
    pub span: Span,
}

impl BlockStmt {
    pub fn iter(&self) -> Iter<'_, Stmt> {
        self.body.iter()
    }
    pub fn iter_mut(&mut self) -> IterMut<'_, Stmt> {
        self.body.iter_mut()
    }
}

#[derive(Debug, Clone)]
pub struct ExpressionStmt {
    pub expression: Expr,
}

/// `let name[: T] [= value];`
#[derive(Debug, Clone)]
pub struct VarDeclStmt {
    pub name: String,
    pub annotation: Option<TypeAnnotation>,
    pub value: Option<Expr>,
    pub ty: Option<TyId>,
}

/// `import "path";`
///
/// `alias` is the file stem of `path` and names the module inside the
/// importing file.
#[derive(Debug, Clone)]
pub struct ImportStmt {
    pub path: String,
    pub alias: String,
}

#[derive(Debug, Clone)]
pub struct Parameter {
    pub name: String,
    pub annotation: TypeAnnotation,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct FnDeclStmt {
    pub name: String,
    pub parameters: Vec<Parameter>,
    pub return_type: Option<TypeAnnotation>,
    /// `None` for `extern` declarations.
    pub body: Option<BlockStmt>,
    pub is_extern: bool,
    pub is_var_args: bool,
    pub ty: Option<TyId>,
}

#[derive(Debug, Clone)]
pub struct FieldDecl {
    pub name: String,
    pub annotation: TypeAnnotation,
    pub span: Span,
}

/// `type Name struct { field: T, ... }`
#[derive(Debug, Clone)]
pub struct StructDeclStmt {
    pub name: String,
    pub name_span: Span,
    pub fields: Vec<FieldDecl>,
    pub ty: Option<TyId>,
}

#[derive(Debug, Clone)]
pub struct IfStmt {
    pub condition: Expr,
    pub consequent: BlockStmt,
    /// Either another `if` statement or a block.
    pub alternate: Option<Box<Stmt>>,
}

#[derive(Debug, Clone)]
pub struct WhileStmt {
    pub condition: Expr,
    pub body: BlockStmt,
}

#[derive(Debug, Clone)]
pub struct DeleteStmt {
    pub value: Expr,
}

#[derive(Debug, Clone)]
pub struct ReturnStmt {
    pub value: Option<Expr>,
}
