use std::path::Path;

use crate::{
    ast::{
        ast::{Stmt, StmtKind},
        statements::{
            BlockStmt, DeleteStmt, ExpressionStmt, FieldDecl, FnDeclStmt, IfStmt, ImportStmt,
            Parameter, ReturnStmt, StructDeclStmt, VarDeclStmt, WhileStmt,
        },
    },
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::TokenKind,
    parser::{expr::parse_expr, lookups::BindingPower},
    Position,
};

use super::{parser::Parser, types::parse_type};

/// File extension of Synthium modules.
pub const MODULE_EXTENSION: &str = "syn";

pub fn parse_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    if let Some(handler) = parser
        .get_stmt_lookup()
        .get(&parser.current_token_kind())
        .copied()
    {
        return handler(parser);
    }

    let expression = parse_expr(parser, BindingPower::Default)?;
    let start = expression.span.start.clone();

    parser.expect(TokenKind::Semicolon)?;

    Ok(Stmt::new(
        StmtKind::Expression(ExpressionStmt { expression }),
        parser.span_from(start),
    ))
}

pub fn parse_var_decl_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.advance().span.start.clone();

    let error = Error::new(
        ErrorImpl::UnexpectedTokenDetailed {
            token: parser.current_token().to_string(),
            message: String::from("expected identifier during variable declaration"),
        },
        parser.current_token().span.clone(),
    );
    let name = parser.expect_error(TokenKind::Identifier, Some(error))?.value;

    let annotation = if parser.current_token_kind() == TokenKind::Colon {
        parser.advance();
        Some(parse_type(parser, BindingPower::Default)?)
    } else {
        None
    };

    let value = if parser.current_token_kind() != TokenKind::Semicolon {
        parser.expect(TokenKind::Assignment)?;
        Some(parse_expr(parser, BindingPower::Default)?)
    } else if annotation.is_none() {
        return Err(Error::new(
            ErrorImpl::UnexpectedTokenDetailed {
                token: parser.current_token().to_string(),
                message: String::from("expected rhs or explicit type"),
            },
            parser.current_token().span.clone(),
        ));
    } else {
        None
    };

    parser.expect(TokenKind::Semicolon)?;

    Ok(Stmt::new(
        StmtKind::VarDecl(VarDeclStmt {
            name,
            annotation,
            value,
            ty: None,
        }),
        parser.span_from(start),
    ))
}

/// Normalizes an import path: `geo` and `geo.syn` both name `geo.syn`.
fn import_file_path(path: &str) -> String {
    match Path::new(path).extension() {
        Some(extension) if extension == MODULE_EXTENSION => path.to_string(),
        _ => format!("{}.{}", path, MODULE_EXTENSION),
    }
}

pub fn parse_import_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.advance().span.start.clone();

    let path = match parser.current_token_kind() {
        TokenKind::String | TokenKind::Identifier => parser.advance().value.clone(),
        _ => {
            return Err(Error::new(
                ErrorImpl::UnexpectedTokenDetailed {
                    token: parser.current_token().to_string(),
                    message: String::from("expected a module path after 'import'"),
                },
                parser.current_token().span.clone(),
            ))
        }
    };

    parser.expect(TokenKind::Semicolon)?;

    let path = import_file_path(&path);
    let alias = Path::new(&path)
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();

    Ok(Stmt::new(
        StmtKind::Import(ImportStmt { path, alias }),
        parser.span_from(start),
    ))
}

/// Parses an `if`/`while` condition, where `{` starts the body.
fn parse_condition(parser: &mut Parser) -> Result<crate::ast::ast::Expr, Error> {
    let previous = parser.set_no_struct_init(true);
    let condition = parse_expr(parser, BindingPower::Default);
    parser.set_no_struct_init(previous);

    condition
}

pub fn parse_if_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.advance().span.start.clone();

    let condition = parse_condition(parser)?;
    let consequent = parse_block(parser)?;

    let alternate = if parser.current_token_kind() == TokenKind::Else {
        parser.advance();
        if parser.current_token_kind() == TokenKind::If {
            Some(Box::new(parse_if_stmt(parser)?))
        } else {
            Some(Box::new(parse_block_stmt(parser)?))
        }
    } else {
        None
    };

    Ok(Stmt::new(
        StmtKind::If(IfStmt {
            condition,
            consequent,
            alternate,
        }),
        parser.span_from(start),
    ))
}

pub fn parse_while_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.advance().span.start.clone();

    let condition = parse_condition(parser)?;
    let body = parse_block(parser)?;

    Ok(Stmt::new(
        StmtKind::While(WhileStmt { condition, body }),
        parser.span_from(start),
    ))
}

/// Parses `{ ... }`, recovering from errors in the statements inside.
pub fn parse_block(parser: &mut Parser) -> Result<BlockStmt, Error> {
    let start = parser.expect(TokenKind::OpenCurly)?.span.start;

    let mut body = Vec::new();
    while parser.has_tokens() && parser.current_token_kind() != TokenKind::CloseCurly {
        let mark = parser.mark();

        match parse_stmt(parser) {
            Ok(stmt) => body.push(stmt),
            Err(error) => parser.recover(error, mark, false),
        }
    }

    parser.expect(TokenKind::CloseCurly)?;

    Ok(BlockStmt {
        body,
        span: parser.span_from(start),
    })
}

pub fn parse_block_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let block = parse_block(parser)?;
    let span = block.span.clone();

    Ok(Stmt::new(StmtKind::Block(block), span))
}

pub fn parse_fn_decl_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.current_token().span.start.clone();

    let is_extern = parser.current_token_kind() == TokenKind::Extern;
    if is_extern {
        parser.advance();
    }
    parser.expect(TokenKind::Fn)?;

    let name = parser.expect(TokenKind::Identifier)?.value;

    parser.expect(TokenKind::OpenParen)?;

    let mut parameters = Vec::new();
    let mut is_var_args = false;
    while parser.current_token_kind() != TokenKind::CloseParen {
        if parser.current_token_kind() == TokenKind::Ellipsis {
            parser.advance();
            is_var_args = true;
            // `...` must be the last parameter
            break;
        }

        let token = parser.expect(TokenKind::Identifier)?;
        parser.expect(TokenKind::Colon)?;
        let annotation = parse_type(parser, BindingPower::Default)?;
        parameters.push(Parameter {
            name: token.value,
            span: token.span.merge(&annotation.span),
            annotation,
        });

        if parser.current_token_kind() != TokenKind::CloseParen {
            parser.expect(TokenKind::Comma)?;
        }
    }

    parser.expect(TokenKind::CloseParen)?;

    let return_type = if parser.current_token_kind() == TokenKind::Colon {
        parser.advance();
        Some(parse_type(parser, BindingPower::Default)?)
    } else {
        None
    };

    let body = if is_extern {
        parser.expect(TokenKind::Semicolon)?;
        None
    } else {
        Some(parse_block(parser)?)
    };

    Ok(Stmt::new(
        StmtKind::FnDecl(FnDeclStmt {
            name,
            parameters,
            return_type,
            body,
            is_extern,
            is_var_args,
            ty: None,
        }),
        parser.span_from(start),
    ))
}

pub fn parse_return_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.advance().span.start.clone();

    let value = if parser.current_token_kind() != TokenKind::Semicolon {
        Some(parse_expr(parser, BindingPower::Default)?)
    } else {
        None
    };

    parser.expect(TokenKind::Semicolon)?;

    Ok(Stmt::new(
        StmtKind::Return(ReturnStmt { value }),
        parser.span_from(start),
    ))
}

pub fn parse_delete_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.advance().span.start.clone();

    let value = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::Semicolon)?;

    Ok(Stmt::new(
        StmtKind::Delete(DeleteStmt { value }),
        parser.span_from(start),
    ))
}

pub fn parse_struct_decl_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start: Position = parser.advance().span.start.clone();

    let name = parser.expect(TokenKind::Identifier)?;
    parser.expect(TokenKind::Struct)?;
    parser.expect(TokenKind::OpenCurly)?;

    let mut fields = Vec::new();
    while parser.current_token_kind() != TokenKind::CloseCurly {
        let field = parser.expect(TokenKind::Identifier)?;
        parser.expect(TokenKind::Colon)?;
        let annotation = parse_type(parser, BindingPower::Default)?;
        fields.push(FieldDecl {
            name: field.value,
            span: field.span.merge(&annotation.span),
            annotation,
        });

        if parser.current_token_kind() != TokenKind::CloseCurly {
            parser.expect(TokenKind::Comma)?;
        }
    }

    parser.expect(TokenKind::CloseCurly)?;

    Ok(Stmt::new(
        StmtKind::StructDecl(StructDeclStmt {
            name: name.value,
            name_span: name.span,
            fields,
            ty: None,
        }),
        parser.span_from(start),
    ))
}
