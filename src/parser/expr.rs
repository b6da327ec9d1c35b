use crate::{
    ast::{
        ast::{Expr, ExprKind},
        expressions::{
            AssignmentExpr, BinaryExpr, BinaryOp, CallExpr, CastExpr, CharExpr, FieldInit,
            MemberExpr, NewExpr, NumberExpr, PrefixExpr, PrefixOp, StringExpr, StructInitExpr,
            SymbolExpr,
        },
    },
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::TokenKind,
};

use super::{lookups::BindingPower, parser::Parser, types::parse_type};

pub fn parse_expr(parser: &mut Parser, bp: BindingPower) -> Result<Expr, Error> {
    // First parse NUD
    let token_kind = parser.current_token_kind();
    let nud = match parser.get_nud_lookup().get(&token_kind) {
        Some(nud) => *nud,
        None => return Err(parser.unexpected()),
    };

    let mut left = nud(parser)?;

    // While the current token binds tighter than `bp`, keep extending lhs
    while parser.current_bp() > bp {
        let token_kind = parser.current_token_kind();
        let led = match parser.get_led_lookup().get(&token_kind) {
            Some(led) => *led,
            None => return Err(parser.unexpected()),
        };

        let token_bp = parser.current_bp();
        left = led(parser, left, token_bp)?;
    }

    Ok(left)
}

pub fn parse_primary_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let token = parser.current_token().clone();

    let kind = match token.kind {
        TokenKind::Number => match token.value.parse::<i32>() {
            Ok(value) => ExprKind::Number(NumberExpr { value }),
            Err(_) => {
                return Err(Error::new(
                    ErrorImpl::NumberParseError { token: token.value },
                    token.span,
                ))
            }
        },
        TokenKind::Identifier => ExprKind::Symbol(SymbolExpr { value: token.value }),
        TokenKind::String => ExprKind::String(StringExpr { value: token.value }),
        TokenKind::Char => ExprKind::Char(CharExpr {
            value: token.value.chars().next().unwrap_or('\0'),
        }),
        _ => return Err(parser.unexpected()),
    };

    parser.advance();
    Ok(Expr::new(kind, token.span))
}

pub fn parse_binary_expr(parser: &mut Parser, left: Expr, bp: BindingPower) -> Result<Expr, Error> {
    let operator_token = parser.advance().clone();
    let operator = match BinaryOp::from_token(operator_token.kind) {
        Some(operator) => operator,
        None => {
            return Err(Error::new(
                ErrorImpl::UnexpectedToken {
                    token: operator_token.to_string(),
                },
                operator_token.span,
            ))
        }
    };

    let right = parse_expr(parser, bp)?;
    let span = left.span.merge(&right.span);

    Ok(Expr::new(
        ExprKind::Binary(BinaryExpr {
            left: Box::new(left),
            operator,
            right: Box::new(right),
        }),
        span,
    ))
}

pub fn parse_prefix_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let operator_token = parser.advance().clone();
    let operator = match PrefixOp::from_token(operator_token.kind) {
        Some(operator) => operator,
        None => {
            return Err(Error::new(
                ErrorImpl::UnexpectedToken {
                    token: operator_token.to_string(),
                },
                operator_token.span,
            ))
        }
    };

    let rhs = parse_expr(parser, BindingPower::Unary)?;
    let span = operator_token.span.merge(&rhs.span);

    Ok(Expr::new(
        ExprKind::Prefix(PrefixExpr {
            operator,
            right: Box::new(rhs),
        }),
        span,
    ))
}

pub fn parse_new_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let start = parser.advance().span.clone();
    let value = parse_expr(parser, BindingPower::Unary)?;
    let span = start.merge(&value.span);

    Ok(Expr::new(
        ExprKind::New(NewExpr {
            value: Box::new(value),
        }),
        span,
    ))
}

pub fn parse_assignment_expr(
    parser: &mut Parser,
    left: Expr,
    _bp: BindingPower,
) -> Result<Expr, Error> {
    parser.advance();
    // Right associative: `a = b = c` assigns `b = c` first
    let rhs = parse_expr(parser, BindingPower::Default)?;
    let span = left.span.merge(&rhs.span);

    Ok(Expr::new(
        ExprKind::Assignment(AssignmentExpr {
            assignee: Box::new(left),
            value: Box::new(rhs),
        }),
        span,
    ))
}

pub fn parse_grouping_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let start = parser.advance().span.start.clone();

    let previous = parser.set_no_struct_init(false);
    let expr = parse_expr(parser, BindingPower::Default);
    parser.set_no_struct_init(previous);

    let mut expr = expr?;
    parser.expect(TokenKind::CloseParen)?;
    expr.span = parser.span_from(start);

    Ok(expr)
}

pub fn parse_call_expr(parser: &mut Parser, left: Expr, _bp: BindingPower) -> Result<Expr, Error> {
    parser.advance();

    let previous = parser.set_no_struct_init(false);
    let arguments = parse_call_arguments(parser);
    parser.set_no_struct_init(previous);
    let arguments = arguments?;

    parser.expect(TokenKind::CloseParen)?;
    let span = parser.span_from(left.span.start.clone());

    Ok(Expr::new(
        ExprKind::Call(CallExpr {
            callee: Box::new(left),
            arguments,
        }),
        span,
    ))
}

fn parse_call_arguments(parser: &mut Parser) -> Result<Vec<Expr>, Error> {
    let mut args = vec![];

    while parser.current_token_kind() != TokenKind::CloseParen {
        args.push(parse_expr(parser, BindingPower::Default)?);

        if parser.current_token_kind() != TokenKind::CloseParen {
            parser.expect(TokenKind::Comma)?;
        }
    }

    Ok(args)
}

pub fn parse_member_expr(parser: &mut Parser, left: Expr, _bp: BindingPower) -> Result<Expr, Error> {
    parser.advance();
    let member = parser.expect_error(
        TokenKind::Identifier,
        Some(Error::new(
            ErrorImpl::UnexpectedTokenDetailed {
                token: parser.current_token().to_string(),
                message: String::from("expected a member name after '.'"),
            },
            parser.current_token().span.clone(),
        )),
    )?;

    let span = left.span.merge(&member.span);

    Ok(Expr::new(
        ExprKind::Member(MemberExpr {
            left: Box::new(left),
            member: member.value,
            member_span: member.span,
        }),
        span,
    ))
}

pub fn parse_cast_expr(parser: &mut Parser, left: Expr, _bp: BindingPower) -> Result<Expr, Error> {
    parser.advance();
    let target = parse_type(parser, BindingPower::Default)?;
    let span = left.span.merge(&target.span);

    Ok(Expr::new(
        ExprKind::Cast(CastExpr {
            value: Box::new(left),
            target,
        }),
        span,
    ))
}

pub fn parse_struct_init_expr(
    parser: &mut Parser,
    left: Expr,
    _bp: BindingPower,
) -> Result<Expr, Error> {
    // Point { x: 1, y: 2 } or geo.Point { ... }
    let (module, name) = match &left.kind {
        ExprKind::Symbol(symbol) => (None, symbol.value.clone()),
        ExprKind::Member(member) => match &member.left.kind {
            ExprKind::Symbol(alias) => (Some(alias.value.clone()), member.member.clone()),
            _ => return Err(not_a_type_name(parser)),
        },
        _ => return Err(not_a_type_name(parser)),
    };

    parser.expect(TokenKind::OpenCurly)?;

    let mut fields = vec![];

    while parser.current_token_kind() != TokenKind::CloseCurly {
        let field = parser.expect(TokenKind::Identifier)?;
        parser.expect(TokenKind::Colon)?;
        let value = parse_expr(parser, BindingPower::Default)?;

        fields.push(FieldInit {
            name: field.value,
            span: field.span.merge(&value.span),
            value,
        });

        if parser.current_token_kind() != TokenKind::CloseCurly {
            parser.expect(TokenKind::Comma)?;
        }
    }

    parser.expect(TokenKind::CloseCurly)?;
    let span = parser.span_from(left.span.start.clone());

    Ok(Expr::new(
        ExprKind::StructInit(StructInitExpr {
            module,
            name,
            name_span: left.span,
            fields,
        }),
        span,
    ))
}

fn not_a_type_name(parser: &Parser) -> Error {
    Error::new(
        ErrorImpl::UnexpectedTokenDetailed {
            token: parser.current_token().to_string(),
            message: String::from("only struct names can be initialized"),
        },
        parser.current_token().span.clone(),
    )
}
