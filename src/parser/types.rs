//! Type parsing implementation.
//!
//! A type annotation is any number of leading `*` followed by a type name,
//! which may be qualified by one module alias (`geo.Point`, `**geo.Point`).
//!
//! Similar to expression parsing, it uses NUD/LED handlers with
//! binding powers.

use std::collections::HashMap;

use crate::{
    ast::types::TypeAnnotation,
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::TokenKind,
};

use super::{lookups::BindingPower, parser::Parser};

/// Type alias for type null denotation handler functions.
pub type TypeNUDHandler = fn(&mut Parser) -> Result<TypeAnnotation, Error>;

/// Type alias for type left denotation handler functions.
pub type TypeLEDHandler =
    fn(&mut Parser, TypeAnnotation, BindingPower) -> Result<TypeAnnotation, Error>;

/// Type alias for type NUD lookup table.
pub type TypeNUDLookup = HashMap<TokenKind, TypeNUDHandler>;

/// Type alias for type LED lookup table.
pub type TypeLEDLookup = HashMap<TokenKind, TypeLEDHandler>;

/// Type alias for type binding power lookup table.
pub type TypeBPLookup = HashMap<TokenKind, BindingPower>;

/// Initializes the type parsing lookup tables.
pub fn create_token_type_lookups(parser: &mut Parser) {
    parser.type_nud(TokenKind::Identifier, parse_symbol_type);
    parser.type_nud(TokenKind::Star, parse_pointer_type);
    parser.type_led(TokenKind::Dot, BindingPower::Member, parse_qualified_type);
}

pub fn parse_symbol_type(parser: &mut Parser) -> Result<TypeAnnotation, Error> {
    let token = parser.expect(TokenKind::Identifier)?;
    Ok(TypeAnnotation {
        pointer_count: 0,
        module: None,
        name: token.value,
        span: token.span,
    })
}

pub fn parse_pointer_type(parser: &mut Parser) -> Result<TypeAnnotation, Error> {
    let star = parser.advance().span.clone();
    let mut inner = parse_type(parser, BindingPower::Unary)?;

    inner.pointer_count += 1;
    inner.span = star.merge(&inner.span);

    Ok(inner)
}

pub fn parse_qualified_type(
    parser: &mut Parser,
    left: TypeAnnotation,
    _bp: BindingPower,
) -> Result<TypeAnnotation, Error> {
    parser.advance();
    let name = parser.expect(TokenKind::Identifier)?;
    let span = left.span.merge(&name.span);

    if left.module.is_some() {
        return Err(Error::new(
            ErrorImpl::IllegalTypeIdentifier {
                ident: format!("{}.{}", left, name.value),
                reason: String::from("type identifiers cannot contain more than one '.'"),
            },
            span,
        ));
    }

    Ok(TypeAnnotation {
        pointer_count: left.pointer_count,
        module: Some(left.name),
        name: name.value,
        span,
    })
}

pub fn parse_type(parser: &mut Parser, bp: BindingPower) -> Result<TypeAnnotation, Error> {
    // First parse NUD
    let token_kind = parser.current_token_kind();
    let nud = match parser.get_type_nud_lookup().get(&token_kind) {
        Some(nud) => *nud,
        None => return Err(parser.unexpected()),
    };

    let mut left = nud(parser)?;

    while let Some(token_bp) = parser
        .get_type_bp_lookup()
        .get(&parser.current_token_kind())
        .copied()
    {
        if token_bp <= bp {
            break;
        }

        let token_kind = parser.current_token_kind();
        let led = match parser.get_type_led_lookup().get(&token_kind) {
            Some(led) => *led,
            None => return Err(parser.unexpected()),
        };

        left = led(parser, left, token_bp)?;
    }

    Ok(left)
}
