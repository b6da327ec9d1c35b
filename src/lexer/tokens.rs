use lazy_static::lazy_static;
use std::{collections::HashMap, fmt::Display};

use crate::Span;

lazy_static! {
    pub static ref RESERVED_LOOKUP: HashMap<&'static str, TokenKind> = {
        let mut map = HashMap::new();
        map.insert("let", TokenKind::Let);
        map.insert("if", TokenKind::If);
        map.insert("else", TokenKind::Else);
        map.insert("import", TokenKind::Import);
        map.insert("fn", TokenKind::Fn);
        map.insert("while", TokenKind::While);
        map.insert("new", TokenKind::New);
        map.insert("delete", TokenKind::Delete);
        map.insert("return", TokenKind::Return);
        map.insert("type", TokenKind::Type);
        map.insert("struct", TokenKind::Struct);
        map.insert("as", TokenKind::As);
        map.insert("extern", TokenKind::Extern);
        map
    };
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum TokenKind {
    EOF,
    Number,
    String,
    Char,
    Identifier,

    OpenCurly,
    CloseCurly,
    OpenParen,
    CloseParen,

    Assignment, // =
    Equals,     // ==
    Not,        // !
    NotEquals,  // !=

    Less,
    LessEquals,
    Greater,
    GreaterEquals,

    Or,
    And,
    Pipe,
    Ampersand,

    Dot,
    Ellipsis,
    Semicolon,
    Colon,
    Comma,

    Plus,
    Dash,
    Slash,
    Star,
    Percent,

    // Reserved
    Let,
    If,
    Else,
    Import,
    Fn,
    While,
    New,
    Delete,
    Return,
    Type,
    Struct,
    As,
    Extern,
}

impl TokenKind {
    /// The text used for this kind in diagnostics.
    pub fn lexeme(&self) -> &'static str {
        match self {
            TokenKind::EOF => "eof",
            TokenKind::Number => "int",
            TokenKind::String => "string",
            TokenKind::Char => "char",
            TokenKind::Identifier => "identifier",
            TokenKind::OpenCurly => "{",
            TokenKind::CloseCurly => "}",
            TokenKind::OpenParen => "(",
            TokenKind::CloseParen => ")",
            TokenKind::Assignment => "=",
            TokenKind::Equals => "==",
            TokenKind::Not => "!",
            TokenKind::NotEquals => "!=",
            TokenKind::Less => "<",
            TokenKind::LessEquals => "<=",
            TokenKind::Greater => ">",
            TokenKind::GreaterEquals => ">=",
            TokenKind::Or => "||",
            TokenKind::And => "&&",
            TokenKind::Pipe => "|",
            TokenKind::Ampersand => "&",
            TokenKind::Dot => ".",
            TokenKind::Ellipsis => "...",
            TokenKind::Semicolon => ";",
            TokenKind::Colon => ":",
            TokenKind::Comma => ",",
            TokenKind::Plus => "+",
            TokenKind::Dash => "-",
            TokenKind::Slash => "/",
            TokenKind::Star => "*",
            TokenKind::Percent => "%",
            TokenKind::Let => "let",
            TokenKind::If => "if",
            TokenKind::Else => "else",
            TokenKind::Import => "import",
            TokenKind::Fn => "fn",
            TokenKind::While => "while",
            TokenKind::New => "new",
            TokenKind::Delete => "delete",
            TokenKind::Return => "return",
            TokenKind::Type => "type",
            TokenKind::Struct => "struct",
            TokenKind::As => "as",
            TokenKind::Extern => "extern",
        }
    }
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.lexeme())
    }
}

#[derive(Debug, Clone)]
pub struct Token {
    pub kind: TokenKind,
    pub value: String,
    pub span: Span,
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            TokenKind::String => write!(f, "\"{}\"", self.value),
            TokenKind::Char => write!(f, "'{}'", self.value),
            TokenKind::Number | TokenKind::Identifier => write!(f, "{}", self.value),
            _ => write!(f, "{}", self.kind),
        }
    }
}
