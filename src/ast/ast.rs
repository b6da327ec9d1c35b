use crate::{type_checker::ty::TyId, Span};

use super::{
    expressions::{
        AssignmentExpr, BinaryExpr, CallExpr, CastExpr, CharExpr, MemberExpr, NewExpr,
        NumberExpr, PrefixExpr, StringExpr, StructInitExpr, SymbolExpr,
    },
    statements::{
        BlockStmt, DeleteStmt, ExpressionStmt, FnDeclStmt, IfStmt, ImportStmt, ReturnStmt,
        StructDeclStmt, VarDeclStmt, WhileStmt,
    },
};

/// Statement Types
#[derive(PartialEq, Debug, Clone, Copy)]
pub enum StmtType {
    ExpressionStmt,
    BlockStmt,
    ImportStmt,
    VarDeclStmt,
    IfStmt,
    FnDeclStmt,
    ReturnStmt,
    StructDeclStmt,
    WhileStmt,
    DeleteStmt,
}

#[derive(Debug, Clone)]
pub enum StmtKind {
    Expression(ExpressionStmt),
    Block(BlockStmt),
    Import(ImportStmt),
    VarDecl(VarDeclStmt),
    If(IfStmt),
    FnDecl(FnDeclStmt),
    Return(ReturnStmt),
    StructDecl(StructDeclStmt),
    While(WhileStmt),
    Delete(DeleteStmt),
}

/// A statement together with the source it was parsed from.
#[derive(Debug, Clone)]
pub struct Stmt {
    pub kind: StmtKind,
    pub span: Span,
}

impl Stmt {
    pub fn new(kind: StmtKind, span: Span) -> Self {
        Stmt { kind, span }
    }

    pub fn get_stmt_type(&self) -> StmtType {
        match &self.kind {
            StmtKind::Expression(_) => StmtType::ExpressionStmt,
            StmtKind::Block(_) => StmtType::BlockStmt,
            StmtKind::Import(_) => StmtType::ImportStmt,
            StmtKind::VarDecl(_) => StmtType::VarDeclStmt,
            StmtKind::If(_) => StmtType::IfStmt,
            StmtKind::FnDecl(_) => StmtType::FnDeclStmt,
            StmtKind::Return(_) => StmtType::ReturnStmt,
            StmtKind::StructDecl(_) => StmtType::StructDeclStmt,
            StmtKind::While(_) => StmtType::WhileStmt,
            StmtKind::Delete(_) => StmtType::DeleteStmt,
        }
    }

    pub fn get_span(&self) -> &Span {
        &self.span
    }
}

/// Expression Types
#[derive(PartialEq, Clone, Copy, Debug)]
pub enum ExprType {
    Number,
    String,
    Char,
    Symbol,
    Binary,
    Prefix,
    Assignment,
    Call,
    StructInit,
    Member,
    Cast,
    New,
}

#[derive(Debug, Clone)]
pub enum ExprKind {
    Number(NumberExpr),
    String(StringExpr),
    Char(CharExpr),
    Symbol(SymbolExpr),
    Binary(BinaryExpr),
    Prefix(PrefixExpr),
    Assignment(AssignmentExpr),
    Call(CallExpr),
    StructInit(StructInitExpr),
    Member(MemberExpr),
    Cast(CastExpr),
    New(NewExpr),
}

/// An expression node.
///
/// `ty` starts out empty and is filled in by the type checker once the
/// expression has been checked successfully.
#[derive(Debug, Clone)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
    pub ty: Option<TyId>,
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Expr {
            kind,
            span,
            ty: None,
        }
    }

    pub fn get_expr_type(&self) -> ExprType {
        match &self.kind {
            ExprKind::Number(_) => ExprType::Number,
            ExprKind::String(_) => ExprType::String,
            ExprKind::Char(_) => ExprType::Char,
            ExprKind::Symbol(_) => ExprType::Symbol,
            ExprKind::Binary(_) => ExprType::Binary,
            ExprKind::Prefix(_) => ExprType::Prefix,
            ExprKind::Assignment(_) => ExprType::Assignment,
            ExprKind::Call(_) => ExprType::Call,
            ExprKind::StructInit(_) => ExprType::StructInit,
            ExprKind::Member(_) => ExprType::Member,
            ExprKind::Cast(_) => ExprType::Cast,
            ExprKind::New(_) => ExprType::New,
        }
    }

    pub fn get_span(&self) -> &Span {
        &self.span
    }

    /// Whether the expression denotes a storage location.
    pub fn is_assignable(&self) -> bool {
        match &self.kind {
            ExprKind::Symbol(_) | ExprKind::Member(_) => true,
            ExprKind::Prefix(prefix) => prefix.operator == super::expressions::PrefixOp::Deref,
            _ => false,
        }
    }
}
