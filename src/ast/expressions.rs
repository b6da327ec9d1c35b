use std::fmt::Display;

use crate::{lexer::tokens::TokenKind, Span};

use super::{ast::Expr, types::TypeAnnotation};

// LITERALS

#[derive(Debug, Clone)]
pub struct NumberExpr {
    pub value: i32,
}

#[derive(Debug, Clone)]
pub struct StringExpr {
    pub value: String,
}

#[derive(Debug, Clone)]
pub struct CharExpr {
    pub value: char,
}

#[derive(Debug, Clone)]
pub struct SymbolExpr {
    pub value: String,
}

// COMPLEX

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Eq,
    NotEq,
    Less,
    LessEq,
    Greater,
    GreaterEq,
    And,
    Or,
}

impl BinaryOp {
    pub fn from_token(kind: TokenKind) -> Option<Self> {
        Some(match kind {
            TokenKind::Plus => BinaryOp::Add,
            TokenKind::Dash => BinaryOp::Sub,
            TokenKind::Star => BinaryOp::Mul,
            TokenKind::Slash => BinaryOp::Div,
            TokenKind::Percent => BinaryOp::Mod,
            TokenKind::Equals => BinaryOp::Eq,
            TokenKind::NotEquals => BinaryOp::NotEq,
            TokenKind::Less => BinaryOp::Less,
            TokenKind::LessEquals => BinaryOp::LessEq,
            TokenKind::Greater => BinaryOp::Greater,
            TokenKind::GreaterEquals => BinaryOp::GreaterEq,
            TokenKind::And => BinaryOp::And,
            TokenKind::Or => BinaryOp::Or,
            _ => return None,
        })
    }

    /// `==` and `!=` accept any pair of equal operand types.
    pub fn is_equality(&self) -> bool {
        matches!(self, BinaryOp::Eq | BinaryOp::NotEq)
    }
}

impl Display for BinaryOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let op = match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Mod => "%",
            BinaryOp::Eq => "==",
            BinaryOp::NotEq => "!=",
            BinaryOp::Less => "<",
            BinaryOp::LessEq => "<=",
            BinaryOp::Greater => ">",
            BinaryOp::GreaterEq => ">=",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
        };
        write!(f, "{}", op)
    }
}

#[derive(Debug, Clone)]
pub struct BinaryExpr {
    pub left: Box<Expr>,
    pub operator: BinaryOp,
    pub right: Box<Expr>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrefixOp {
    AddressOf,
    Deref,
    Not,
    Negate,
}

impl PrefixOp {
    pub fn from_token(kind: TokenKind) -> Option<Self> {
        Some(match kind {
            TokenKind::Ampersand => PrefixOp::AddressOf,
            TokenKind::Star => PrefixOp::Deref,
            TokenKind::Not => PrefixOp::Not,
            TokenKind::Dash => PrefixOp::Negate,
            _ => return None,
        })
    }
}

impl Display for PrefixOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let op = match self {
            PrefixOp::AddressOf => "&",
            PrefixOp::Deref => "*",
            PrefixOp::Not => "!",
            PrefixOp::Negate => "-",
        };
        write!(f, "{}", op)
    }
}

#[derive(Debug, Clone)]
pub struct PrefixExpr {
    pub operator: PrefixOp,
    pub right: Box<Expr>,
}

#[derive(Debug, Clone)]
pub struct AssignmentExpr {
    pub assignee: Box<Expr>,
    pub value: Box<Expr>,
}

#[derive(Debug, Clone)]
pub struct CallExpr {
    pub callee: Box<Expr>,
    pub arguments: Vec<Expr>,
}

/// `Name { field: value, ... }`, where `Name` may be qualified (`geo.Point`).
#[derive(Debug, Clone)]
pub struct StructInitExpr {
    pub module: Option<String>,
    pub name: String,
    pub name_span: Span,
    pub fields: Vec<FieldInit>,
}

#[derive(Debug, Clone)]
pub struct FieldInit {
    pub name: String,
    pub value: Expr,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct MemberExpr {
    pub left: Box<Expr>,
    pub member: String,
    pub member_span: Span,
}

#[derive(Debug, Clone)]
pub struct CastExpr {
    pub value: Box<Expr>,
    pub target: TypeAnnotation,
}

#[derive(Debug, Clone)]
pub struct NewExpr {
    pub value: Box<Expr>,
}
