//! Parser implementation for building the Abstract Syntax Tree.
//!
//! This module contains the main Parser struct and the `parse` entry point.
//! The parser uses a Pratt parser approach with NUD/LED handlers for
//! expression parsing and specialized functions for statement parsing.
//!
//! It maintains lookup tables for:
//! - Statement handlers
//! - NUD (null denotation) handlers for prefix expressions
//! - LED (left denotation) handlers for infix expressions
//! - Binding powers for operator precedence
//! - Type parsing handlers
//!
//! Errors do not stop parsing: a failing statement is recorded, the parser
//! skips to the next statement boundary and carries on.

use std::{collections::HashMap, rc::Rc};

use crate::{
    ast::ast::Stmt,
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::{Token, TokenKind},
    Position, Span,
};

use super::{
    lookups::{
        create_token_lookups, BPLookup, BindingPower, LEDHandler, LEDLookup, NUDHandler, NUDLookup,
        StmtHandler, StmtLookup,
    },
    stmt::parse_stmt,
    types::{
        create_token_type_lookups, TypeBPLookup, TypeLEDHandler, TypeLEDLookup, TypeNUDHandler,
        TypeNUDLookup,
    },
};

/// The main parser structure that maintains parsing state.
///
/// This struct holds the token stream and maintains lookup tables for
/// parsing statements, expressions, and types. It tracks the current
/// position in the token stream and provides methods for token consumption.
pub struct Parser {
    /// The list of tokens to parse, always terminated by an EOF token
    tokens: Vec<Token>,
    /// Current position in the token stream
    pos: usize,
    /// The name of the source file being parsed
    file: Rc<String>,
    /// Lookup table for statement parsing handlers
    stmt_lookup: StmtLookup,
    /// Lookup table for null denotation (prefix) expression handlers
    nud_lookup: NUDLookup,
    /// Lookup table for left denotation (infix) expression handlers
    led_lookup: LEDLookup,
    /// Lookup table for expression binding powers (precedence)
    binding_power_lookup: BPLookup,
    /// Lookup table for type null denotation handlers
    type_nud_lookup: TypeNUDLookup,
    /// Lookup table for type left denotation handlers
    type_led_lookup: TypeLEDLookup,
    /// Lookup table for type binding powers
    type_binding_power_lookup: TypeBPLookup,
    /// Set while parsing `if`/`while` conditions, where `{` opens the body
    /// instead of a struct initializer
    no_struct_init: bool,
    /// Errors recovered from so far
    errors: Vec<Error>,
}

impl Parser {
    /// Creates a new Parser instance with empty lookup tables.
    ///
    /// # Arguments
    ///
    /// * `tokens` - Vector of tokens to parse
    /// * `file` - Reference-counted string containing the source file name
    pub fn new(mut tokens: Vec<Token>, file: Rc<String>) -> Self {
        if tokens.last().map(|t| t.kind) != Some(TokenKind::EOF) {
            let end = tokens
                .last()
                .map(|t| t.span.end.clone())
                .unwrap_or_else(|| Position(0, Rc::clone(&file)));
            tokens.push(Token {
                kind: TokenKind::EOF,
                value: String::from("EOF"),
                span: Span::point(end),
            });
        }

        Parser {
            tokens,
            pos: 0,
            file,
            stmt_lookup: HashMap::new(),
            nud_lookup: HashMap::new(),
            led_lookup: HashMap::new(),
            binding_power_lookup: HashMap::new(),
            type_nud_lookup: HashMap::new(),
            type_led_lookup: HashMap::new(),
            type_binding_power_lookup: HashMap::new(),
            no_struct_init: false,
            errors: vec![],
        }
    }

    /// Returns the current token without advancing.
    pub fn current_token(&self) -> &Token {
        let last = self.tokens.len() - 1;
        &self.tokens[self.pos.min(last)]
    }

    /// Returns the kind of the current token.
    pub fn current_token_kind(&self) -> TokenKind {
        self.current_token().kind
    }

    /// Advances to the next token and returns the previous token.
    ///
    /// The EOF token is never consumed.
    pub fn advance(&mut self) -> &Token {
        let current = self.pos.min(self.tokens.len() - 1);
        if self.tokens[current].kind != TokenKind::EOF {
            self.pos += 1;
        }
        &self.tokens[current]
    }

    /// Builds the error for finding the current token where something else
    /// was required.
    pub fn unexpected(&self) -> Error {
        let token = self.current_token();
        match token.kind {
            TokenKind::EOF => Error::new(ErrorImpl::UnexpectedEof, token.span.clone()),
            _ => Error::new(
                ErrorImpl::UnexpectedToken {
                    token: token.to_string(),
                },
                token.span.clone(),
            ),
        }
    }

    /// Expects a token of the specified kind, with optional custom error.
    ///
    /// # Arguments
    ///
    /// * `expected_kind` - The expected TokenKind
    /// * `error` - Optional custom error to return if expectation fails
    ///
    /// # Returns
    ///
    /// Returns Ok(Token) if the current token matches, otherwise returns an Error.
    pub fn expect_error(
        &mut self,
        expected_kind: TokenKind,
        error: Option<Error>,
    ) -> Result<Token, Error> {
        if self.current_token_kind() == expected_kind {
            return Ok(self.advance().clone());
        }

        if let Some(error) = error {
            return Err(error);
        }

        let token = self.current_token();
        match token.kind {
            TokenKind::EOF => Err(Error::new(ErrorImpl::UnexpectedEof, token.span.clone())),
            _ => Err(Error::new(
                ErrorImpl::ExpectedToken {
                    expected: expected_kind.to_string(),
                    found: token.to_string(),
                },
                token.span.clone(),
            )),
        }
    }

    /// Expects a token of the specified kind with default error message.
    pub fn expect(&mut self, expected_kind: TokenKind) -> Result<Token, Error> {
        self.expect_error(expected_kind, None)
    }

    /// Checks if there are more tokens to parse.
    pub fn has_tokens(&self) -> bool {
        self.current_token_kind() != TokenKind::EOF
    }

    /// Returns a reference to the statement lookup table.
    pub fn get_stmt_lookup(&self) -> &StmtLookup {
        &self.stmt_lookup
    }

    /// Returns a reference to the NUD (null denotation) lookup table.
    pub fn get_nud_lookup(&self) -> &NUDLookup {
        &self.nud_lookup
    }

    /// Returns a reference to the LED (left denotation) lookup table.
    pub fn get_led_lookup(&self) -> &LEDLookup {
        &self.led_lookup
    }

    /// Returns a reference to the type binding power lookup table.
    pub fn get_type_bp_lookup(&self) -> &TypeBPLookup {
        &self.type_binding_power_lookup
    }

    /// Returns a reference to the type NUD lookup table.
    pub fn get_type_nud_lookup(&self) -> &TypeNUDLookup {
        &self.type_nud_lookup
    }

    /// Returns a reference to the type LED lookup table.
    pub fn get_type_led_lookup(&self) -> &TypeLEDLookup {
        &self.type_led_lookup
    }

    /// Binding power of the current token when it continues an expression.
    ///
    /// `{` does not continue an expression while struct initializers are
    /// disabled, so `if cond { ... }` reads the block as the body.
    pub fn current_bp(&self) -> BindingPower {
        let kind = self.current_token_kind();
        if kind == TokenKind::OpenCurly && self.no_struct_init {
            return BindingPower::Default;
        }

        *self
            .binding_power_lookup
            .get(&kind)
            .unwrap_or(&BindingPower::Default)
    }

    /// Sets whether `{` may start a struct initializer and returns the
    /// previous setting.
    pub fn set_no_struct_init(&mut self, value: bool) -> bool {
        std::mem::replace(&mut self.no_struct_init, value)
    }

    /// Registers a left denotation (infix) handler for a token.
    ///
    /// # Arguments
    ///
    /// * `kind` - The token kind to register
    /// * `binding_power` - The precedence/binding power for this operator
    /// * `led_fn` - The handler function for this infix operator
    pub fn led(&mut self, kind: TokenKind, binding_power: BindingPower, led_fn: LEDHandler) {
        self.binding_power_lookup.insert(kind, binding_power);
        self.led_lookup.insert(kind, led_fn);
    }

    /// Registers a null denotation (prefix) handler for a token.
    ///
    /// Tokens that are both prefix and infix operators (`-`, `*`) keep the
    /// binding power registered by `led`.
    pub fn nud(&mut self, kind: TokenKind, nud_fn: NUDHandler) {
        self.nud_lookup.insert(kind, nud_fn);
    }

    /// Registers a statement handler for a token.
    pub fn stmt(&mut self, kind: TokenKind, stmt_fn: StmtHandler) {
        self.stmt_lookup.insert(kind, stmt_fn);
    }

    /// Registers a type left denotation handler.
    pub fn type_led(
        &mut self,
        kind: TokenKind,
        binding_power: BindingPower,
        led_fn: TypeLEDHandler,
    ) {
        self.type_binding_power_lookup.insert(kind, binding_power);
        self.type_led_lookup.insert(kind, led_fn);
    }

    /// Registers a type null denotation handler.
    pub fn type_nud(&mut self, kind: TokenKind, nud_fn: TypeNUDHandler) {
        self.type_nud_lookup.insert(kind, nud_fn);
    }

    /// Returns the position right after the last consumed token.
    pub fn get_position(&self) -> Position {
        match self.pos.checked_sub(1).and_then(|i| self.tokens.get(i)) {
            Some(token) => token.span.end.clone(),
            None => Position(0, Rc::clone(&self.file)),
        }
    }

    /// Span from `start` to the end of the last consumed token.
    pub fn span_from(&self, start: Position) -> Span {
        Span {
            start,
            end: self.get_position(),
        }
    }

    /// Position in the token stream, used to detect lack of progress.
    pub fn mark(&self) -> usize {
        self.pos
    }

    /// Records `error` and skips tokens until the start of the next
    /// statement.
    ///
    /// Stops after a `;`, or before a `}` or a token that starts a
    /// statement. Outside of any block a `}` has nothing to close and is
    /// skipped as well. If the failing statement consumed nothing, one token
    /// is dropped so the parser cannot stall.
    pub fn recover(&mut self, error: Error, start: usize, top_level: bool) {
        self.errors.push(error);

        while self.has_tokens() {
            match self.current_token_kind() {
                TokenKind::Semicolon => {
                    self.advance();
                    break;
                }
                TokenKind::CloseCurly => {
                    if top_level {
                        self.advance();
                    }
                    break;
                }
                TokenKind::Let
                | TokenKind::Import
                | TokenKind::Fn
                | TokenKind::Extern
                | TokenKind::Type
                | TokenKind::If
                | TokenKind::While
                | TokenKind::Delete
                | TokenKind::Return => break,
                _ => {
                    self.advance();
                }
            }
        }

        if self.pos == start {
            self.advance();
        }
    }
}

/// Parses a stream of tokens into the statements of one file.
///
/// This is the main entry point for parsing. It creates a parser instance,
/// initializes all lookup tables, and parses statements until EOF,
/// recovering from errors at statement boundaries.
///
/// # Returns
///
/// The parsed top level statements together with every error encountered.
pub fn parse(tokens: Vec<Token>, file: Rc<String>) -> (Vec<Stmt>, Vec<Error>) {
    let mut parser = Parser::new(tokens, file);
    create_token_lookups(&mut parser);
    create_token_type_lookups(&mut parser);

    let mut body = vec![];

    while parser.has_tokens() {
        let start = parser.mark();

        match parse_stmt(&mut parser) {
            Ok(stmt) => body.push(stmt),
            Err(error) => parser.recover(error, start, true),
        }
    }

    (body, parser.errors)
}
