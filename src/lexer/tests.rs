//! Unit tests for the lexer module.
//!
//! Covers keywords and identifiers, numeric literals, string and character
//! literals with escapes, operators and punctuation, comments, spans and the
//! error cases.

use std::rc::Rc;

use super::{lexer::tokenize, tokens::TokenKind};
use crate::errors::errors::ErrorImpl;

fn lex(source: &str) -> Vec<super::tokens::Token> {
    tokenize(source, Rc::new("test.syn".to_string())).unwrap()
}

fn kinds(source: &str) -> Vec<TokenKind> {
    lex(source).iter().map(|t| t.kind).collect()
}

#[test]
fn test_tokenize_keywords() {
    let tokens = kinds("let if else import fn while new delete return type struct as extern");

    assert_eq!(
        tokens,
        vec![
            TokenKind::Let,
            TokenKind::If,
            TokenKind::Else,
            TokenKind::Import,
            TokenKind::Fn,
            TokenKind::While,
            TokenKind::New,
            TokenKind::Delete,
            TokenKind::Return,
            TokenKind::Type,
            TokenKind::Struct,
            TokenKind::As,
            TokenKind::Extern,
            TokenKind::EOF,
        ]
    );
}

#[test]
fn test_tokenize_identifiers() {
    let tokens = lex("foo bar baz_123 _underscore CamelCase letter");

    assert_eq!(tokens[0].kind, TokenKind::Identifier);
    assert_eq!(tokens[0].value, "foo");
    assert_eq!(tokens[2].value, "baz_123");
    assert_eq!(tokens[3].value, "_underscore");
    assert_eq!(tokens[4].value, "CamelCase");
    // Keywords only match whole words
    assert_eq!(tokens[5].kind, TokenKind::Identifier);
    assert_eq!(tokens[5].value, "letter");
    assert_eq!(tokens[6].kind, TokenKind::EOF);
}

#[test]
fn test_tokenize_numbers() {
    let tokens = lex("42 0 2147483647");

    assert_eq!(tokens[0].kind, TokenKind::Number);
    assert_eq!(tokens[0].value, "42");
    assert_eq!(tokens[1].value, "0");
    assert_eq!(tokens[2].value, "2147483647");
}

#[test]
fn test_tokenize_strings() {
    let tokens = lex(r#""hello" "multiple words" """#);

    assert_eq!(tokens[0].kind, TokenKind::String);
    assert_eq!(tokens[0].value, "hello");
    assert_eq!(tokens[1].value, "multiple words");
    assert_eq!(tokens[2].kind, TokenKind::String);
    assert_eq!(tokens[2].value, "");
}

#[test]
fn test_tokenize_string_escapes() {
    let tokens = lex(r#""line\n" "tab\t" "quote\"inside""#);

    assert_eq!(tokens[0].value, "line\n");
    assert_eq!(tokens[1].value, "tab\t");
    assert_eq!(tokens[2].value, "quote\"inside");
    assert_eq!(tokens[3].kind, TokenKind::EOF);
}

#[test]
fn test_tokenize_char_literals() {
    let tokens = lex(r"'a' '\n' '\''");

    assert_eq!(tokens[0].kind, TokenKind::Char);
    assert_eq!(tokens[0].value, "a");
    assert_eq!(tokens[1].value, "\n");
    assert_eq!(tokens[2].value, "'");
}

#[test]
fn test_char_literal_invalid_length() {
    let result = tokenize("let c = 'ab';", Rc::new("test.syn".to_string()));
    let error = result.unwrap_err();

    assert!(matches!(
        error.get_impl(),
        ErrorImpl::InvalidCharLiteral { length: 2, .. }
    ));
    assert_eq!(error.get_position().0, 8);

    let empty = tokenize("''", Rc::new("test.syn".to_string())).unwrap_err();
    assert!(matches!(
        empty.get_impl(),
        ErrorImpl::InvalidCharLiteral { length: 0, .. }
    ));
}

#[test]
fn test_tokenize_operators() {
    let tokens = kinds("+ - * / % == != < <= > >= && || & | ! =");

    assert_eq!(
        tokens,
        vec![
            TokenKind::Plus,
            TokenKind::Dash,
            TokenKind::Star,
            TokenKind::Slash,
            TokenKind::Percent,
            TokenKind::Equals,
            TokenKind::NotEquals,
            TokenKind::Less,
            TokenKind::LessEquals,
            TokenKind::Greater,
            TokenKind::GreaterEquals,
            TokenKind::And,
            TokenKind::Or,
            TokenKind::Ampersand,
            TokenKind::Pipe,
            TokenKind::Not,
            TokenKind::Assignment,
            TokenKind::EOF,
        ]
    );
}

#[test]
fn test_tokenize_punctuation() {
    let tokens = kinds("( ) { } ; : , . ...");

    assert_eq!(
        tokens,
        vec![
            TokenKind::OpenParen,
            TokenKind::CloseParen,
            TokenKind::OpenCurly,
            TokenKind::CloseCurly,
            TokenKind::Semicolon,
            TokenKind::Colon,
            TokenKind::Comma,
            TokenKind::Dot,
            TokenKind::Ellipsis,
            TokenKind::EOF,
        ]
    );
}

#[test]
fn test_tokenize_comments() {
    let tokens = lex("let x = 5; // this is a comment\nlet y = 10;");

    assert_eq!(tokens.len(), 11);
    assert_eq!(tokens[5].kind, TokenKind::Let);
    assert_eq!(tokens[6].value, "y");
}

#[test]
fn test_tokenize_complex_expression() {
    let tokens = kinds("let x = (a + b) * c;");

    assert_eq!(
        tokens,
        vec![
            TokenKind::Let,
            TokenKind::Identifier,
            TokenKind::Assignment,
            TokenKind::OpenParen,
            TokenKind::Identifier,
            TokenKind::Plus,
            TokenKind::Identifier,
            TokenKind::CloseParen,
            TokenKind::Star,
            TokenKind::Identifier,
            TokenKind::Semicolon,
            TokenKind::EOF,
        ]
    );
}

#[test]
fn test_tokenize_struct_declaration() {
    let tokens = kinds("type Point struct { x: i32, next: *Point }");

    assert_eq!(tokens[0], TokenKind::Type);
    assert_eq!(tokens[1], TokenKind::Identifier);
    assert_eq!(tokens[2], TokenKind::Struct);
    assert_eq!(tokens[3], TokenKind::OpenCurly);
    assert_eq!(tokens[9], TokenKind::Colon);
    assert_eq!(tokens[10], TokenKind::Star);
    assert_eq!(tokens[12], TokenKind::CloseCurly);
}

#[test]
fn test_token_spans() {
    let tokens = lex("let  value");

    assert_eq!(tokens[0].span.start.0, 0);
    assert_eq!(tokens[0].span.end.0, 3);
    assert_eq!(tokens[1].span.start.0, 5);
    assert_eq!(tokens[1].span.end.0, 10);
    assert_eq!(tokens[2].span.start.0, 10);
    assert_eq!(tokens[1].span.start.1.as_str(), "test.syn");
}

#[test]
fn test_tokenize_empty_source() {
    let tokens = kinds("");
    assert_eq!(tokens, vec![TokenKind::EOF]);

    let tokens = kinds("   \n\t  // only a comment");
    assert_eq!(tokens, vec![TokenKind::EOF]);
}

#[test]
fn test_tokenize_unknown_symbol() {
    let result = tokenize("let x = @;", Rc::new("test.syn".to_string()));
    let error = result.unwrap_err();

    assert_eq!(error.get_error_name(), "UnrecognisedToken");
    assert_eq!(error.get_position().0, 8);
    assert_eq!(error.to_string(), "unknown symbol '@'");
}

#[test]
fn test_unterminated_string() {
    let result = tokenize("\"abc", Rc::new("test.syn".to_string()));
    assert!(result.is_err());
}
