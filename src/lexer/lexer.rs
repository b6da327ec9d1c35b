use std::rc::Rc;

use lazy_static::lazy_static;
use regex::Regex;

use crate::{
    errors::errors::{Error, ErrorImpl},
    Position, Span, MK_DEFAULT_HANDLER, MK_TOKEN,
};

use super::tokens::{Token, TokenKind, RESERVED_LOOKUP};

pub type RegexHandler = fn(&mut Lexer, &Regex) -> Result<(), Error>;

pub struct RegexPattern {
    regex: Regex,
    handler: RegexHandler,
}

fn pattern(source: &str, handler: RegexHandler) -> RegexPattern {
    // Every pattern is anchored so a match is only ever taken at the cursor.
    let anchored = format!("^(?:{})", source);
    RegexPattern {
        regex: Regex::new(&anchored).expect("invalid lexer pattern"),
        handler,
    }
}

lazy_static! {
    static ref PATTERNS: Vec<RegexPattern> = vec![
        pattern("[a-zA-Z_][a-zA-Z0-9_]*", symbol_handler),
        pattern("[0-9]+", number_handler),
        pattern("\\s+", skip_handler),
        pattern("//[^\\n]*", skip_handler),
        pattern("\"(?:[^\"\\\\]|\\\\.)*\"", string_handler),
        pattern("'(?:[^'\\\\]|\\\\.)*'", char_handler),
        pattern("\\{", MK_DEFAULT_HANDLER!(TokenKind::OpenCurly, "{")),
        pattern("\\}", MK_DEFAULT_HANDLER!(TokenKind::CloseCurly, "}")),
        pattern("\\(", MK_DEFAULT_HANDLER!(TokenKind::OpenParen, "(")),
        pattern("\\)", MK_DEFAULT_HANDLER!(TokenKind::CloseParen, ")")),
        pattern("==", MK_DEFAULT_HANDLER!(TokenKind::Equals, "==")),
        pattern("!=", MK_DEFAULT_HANDLER!(TokenKind::NotEquals, "!=")),
        pattern("!", MK_DEFAULT_HANDLER!(TokenKind::Not, "!")),
        pattern("=", MK_DEFAULT_HANDLER!(TokenKind::Assignment, "=")),
        pattern("<=", MK_DEFAULT_HANDLER!(TokenKind::LessEquals, "<=")),
        pattern("<", MK_DEFAULT_HANDLER!(TokenKind::Less, "<")),
        pattern(">=", MK_DEFAULT_HANDLER!(TokenKind::GreaterEquals, ">=")),
        pattern(">", MK_DEFAULT_HANDLER!(TokenKind::Greater, ">")),
        pattern("\\|\\|", MK_DEFAULT_HANDLER!(TokenKind::Or, "||")),
        pattern("\\|", MK_DEFAULT_HANDLER!(TokenKind::Pipe, "|")),
        pattern("&&", MK_DEFAULT_HANDLER!(TokenKind::And, "&&")),
        pattern("&", MK_DEFAULT_HANDLER!(TokenKind::Ampersand, "&")),
        pattern("\\.\\.\\.", MK_DEFAULT_HANDLER!(TokenKind::Ellipsis, "...")),
        pattern("\\.", MK_DEFAULT_HANDLER!(TokenKind::Dot, ".")),
        pattern(";", MK_DEFAULT_HANDLER!(TokenKind::Semicolon, ";")),
        pattern(":", MK_DEFAULT_HANDLER!(TokenKind::Colon, ":")),
        pattern(",", MK_DEFAULT_HANDLER!(TokenKind::Comma, ",")),
        pattern("\\+", MK_DEFAULT_HANDLER!(TokenKind::Plus, "+")),
        pattern("-", MK_DEFAULT_HANDLER!(TokenKind::Dash, "-")),
        pattern("/", MK_DEFAULT_HANDLER!(TokenKind::Slash, "/")),
        pattern("\\*", MK_DEFAULT_HANDLER!(TokenKind::Star, "*")),
        pattern("%", MK_DEFAULT_HANDLER!(TokenKind::Percent, "%")),
    ];
}

pub struct Lexer<'a> {
    tokens: Vec<Token>,
    source: &'a str,
    pos: usize,
    file: Rc<String>,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str, file: Rc<String>) -> Lexer<'a> {
        Lexer {
            tokens: vec![],
            source,
            pos: 0,
            file,
        }
    }

    pub fn advance_n(&mut self, n: usize) {
        self.pos += n;
    }

    pub fn push(&mut self, token: Token) {
        self.tokens.push(token);
    }

    pub fn at(&self) -> char {
        self.remainder().chars().next().unwrap_or('\0')
    }

    pub fn remainder(&self) -> &'a str {
        &self.source[self.pos..]
    }

    pub fn at_eof(&self) -> bool {
        self.pos >= self.source.len()
    }

    pub fn position(&self, offset: usize) -> Position {
        Position((self.pos + offset) as u32, Rc::clone(&self.file))
    }

    /// Span from the cursor to `len` bytes ahead.
    pub fn span(&self, len: usize) -> Span {
        Span {
            start: self.position(0),
            end: self.position(len),
        }
    }

    fn matched(&self, regex: &Regex) -> &'a str {
        regex
            .find(self.remainder())
            .map(|m| m.as_str())
            .unwrap_or_default()
    }
}

fn number_handler(lexer: &mut Lexer, regex: &Regex) -> Result<(), Error> {
    let matched = lexer.matched(regex);

    lexer.push(MK_TOKEN!(
        TokenKind::Number,
        matched.to_string(),
        lexer.span(matched.len())
    ));
    lexer.advance_n(matched.len());
    Ok(())
}

fn skip_handler(lexer: &mut Lexer, regex: &Regex) -> Result<(), Error> {
    let matched = lexer.matched(regex);
    lexer.advance_n(matched.len());
    Ok(())
}

/// Replaces escape sequences in a literal body with the characters they name.
fn unescape(literal: &str) -> String {
    let mut result = String::new();
    let mut chars = literal.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch != '\\' {
            result.push(ch);
            continue;
        }

        match chars.peek() {
            Some('n') => result.push('\n'),
            Some('t') => result.push('\t'),
            Some('r') => result.push('\r'),
            Some('0') => result.push('\0'),
            Some('\\') => result.push('\\'),
            Some('"') => result.push('"'),
            Some('\'') => result.push('\''),
            _ => {
                // Unknown escape, keep the backslash
                result.push(ch);
                continue;
            }
        }
        chars.next();
    }

    result
}

fn string_handler(lexer: &mut Lexer, regex: &Regex) -> Result<(), Error> {
    let matched = lexer.matched(regex);
    let body = &matched[1..matched.len() - 1];

    lexer.push(MK_TOKEN!(
        TokenKind::String,
        unescape(body),
        lexer.span(matched.len())
    ));
    lexer.advance_n(matched.len());
    Ok(())
}

fn char_handler(lexer: &mut Lexer, regex: &Regex) -> Result<(), Error> {
    let matched = lexer.matched(regex);
    let value = unescape(&matched[1..matched.len() - 1]);
    let length = value.chars().count();

    if length != 1 {
        return Err(Error::new(
            ErrorImpl::InvalidCharLiteral {
                literal: matched.to_string(),
                length,
            },
            lexer.span(matched.len()),
        ));
    }

    lexer.push(MK_TOKEN!(TokenKind::Char, value, lexer.span(matched.len())));
    lexer.advance_n(matched.len());
    Ok(())
}

fn symbol_handler(lexer: &mut Lexer, regex: &Regex) -> Result<(), Error> {
    let value = lexer.matched(regex);
    let kind = RESERVED_LOOKUP
        .get(value)
        .copied()
        .unwrap_or(TokenKind::Identifier);

    lexer.push(MK_TOKEN!(kind, value.to_string(), lexer.span(value.len())));
    lexer.advance_n(value.len());
    Ok(())
}

pub fn tokenize(source: &str, file: Rc<String>) -> Result<Vec<Token>, Error> {
    let mut lex = Lexer::new(source, file);

    while !lex.at_eof() {
        let remainder = lex.remainder();
        let pattern = PATTERNS
            .iter()
            .find(|pattern| pattern.regex.is_match(remainder));

        match pattern {
            Some(pattern) => (pattern.handler)(&mut lex, &pattern.regex)?,
            None => {
                return Err(Error::at(
                    ErrorImpl::UnrecognisedToken {
                        token: lex.at().to_string(),
                    },
                    lex.position(0),
                ))
            }
        }
    }

    lex.push(MK_TOKEN!(TokenKind::EOF, String::from("EOF"), lex.span(0)));
    Ok(lex.tokens)
}
