use std::fmt::Display;

use thiserror::Error;

use crate::{Position, Span};

#[derive(Debug, Clone)]
pub struct Error {
    internal_error: ErrorImpl,
    span: Span,
}

impl Error {
    pub fn new(error_impl: ErrorImpl, span: Span) -> Self {
        Error {
            internal_error: error_impl,
            span,
        }
    }

    /// Builds an error that points at a single position.
    pub fn at(error_impl: ErrorImpl, position: Position) -> Self {
        Error::new(error_impl, Span::point(position))
    }

    pub fn get_position(&self) -> &Position {
        &self.span.start
    }

    pub fn get_span(&self) -> &Span {
        &self.span
    }

    pub fn get_impl(&self) -> &ErrorImpl {
        &self.internal_error
    }

    pub fn get_error_name(&self) -> &str {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. } => "UnrecognisedToken",
            ErrorImpl::InvalidCharLiteral { .. } => "InvalidCharLiteral",
            ErrorImpl::UnexpectedToken { .. } => "UnexpectedToken",
            ErrorImpl::UnexpectedTokenDetailed { .. } => "UnexpectedTokenDetailed",
            ErrorImpl::ExpectedToken { .. } => "ExpectedToken",
            ErrorImpl::UnexpectedEof => "UnexpectedEof",
            ErrorImpl::NumberParseError { .. } => "NumberParseError",
            ErrorImpl::IllegalTypeIdentifier { .. } => "IllegalTypeIdentifier",
            ErrorImpl::IdentifierNotFound { .. } => "IdentifierNotFound",
            ErrorImpl::UnknownModule { .. } => "UnknownModule",
            ErrorImpl::NotFoundInModule { .. } => "NotFoundInModule",
            ErrorImpl::NotScoped { .. } => "NotScoped",
            ErrorImpl::NoSuchField { .. } => "NoSuchField",
            ErrorImpl::NotAType { .. } => "NotAType",
            ErrorImpl::NotAStruct { .. } => "NotAStruct",
            ErrorImpl::NotCallable { .. } => "NotCallable",
            ErrorImpl::NotAssignable => "NotAssignable",
            ErrorImpl::TypeMatchError { .. } => "TypeMatchError",
            ErrorImpl::OperandTypeError { .. } => "OperandTypeError",
            ErrorImpl::UnexpectedArguments { .. } => "UnexpectedArguments",
            ErrorImpl::MissingArguments { .. } => "MissingArguments",
            ErrorImpl::StructAlreadyDeclared { .. } => "StructAlreadyDeclared",
            ErrorImpl::ReturnOutsideFunction => "ReturnOutsideFunction",
            ErrorImpl::ImportError { .. } => "ImportError",
            ErrorImpl::ModuleNotCompiled { .. } => "ModuleNotCompiled",
            ErrorImpl::UnresolvedStruct { .. } => "UnresolvedStruct",
            ErrorImpl::StructTooLarge { .. } => "StructTooLarge",
        }
    }

    pub fn get_tip(&self) -> ErrorTip {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. } => ErrorTip::None,
            ErrorImpl::InvalidCharLiteral { literal, .. } =>ErrorTip::Suggestion(format!(
                "Character literal `{}` must hold exactly one character, use a string instead?",
                literal
            )),
            ErrorImpl::UnexpectedToken { token } => ErrorTip::Suggestion(format!(
                "Unexpected token: `{}`, did you miss a semicolon?",
                token
            )),
            ErrorImpl::UnexpectedTokenDetailed { token, message } => {
                ErrorTip::Suggestion(format!("Unexpected token: `{}`, {}", token, message))
            }
            ErrorImpl::ExpectedToken { expected, found } => {
                ErrorTip::Suggestion(format!("Expected `{}` here, found `{}`", expected, found))
            }
            ErrorImpl::UnexpectedEof => ErrorTip::Suggestion(String::from(
                "The file ended in the middle of a statement, is a `}` or `;` missing?",
            )),
            ErrorImpl::NumberParseError { token } => ErrorTip::Suggestion(format!(
                "Invalid number: `{}`, is it above the integer limit?",
                token
            )),
            ErrorImpl::IllegalTypeIdentifier { .. } => ErrorTip::Suggestion(String::from(
                "Types are written as `Name` or `module.Name`",
            )),
            ErrorImpl::IdentifierNotFound { ident } => {
                ErrorTip::Suggestion(format!("`{}` is not declared in this scope", ident))
            }
            ErrorImpl::UnknownModule { alias } => ErrorTip::Suggestion(format!(
                "Add `import \"{}\";` before using it",
                alias
            )),
            ErrorImpl::NotFoundInModule { ident, module } => ErrorTip::Suggestion(format!(
                "Module `{}` does not declare `{}`",
                module, ident
            )),
            ErrorImpl::NotScoped { found } => ErrorTip::Suggestion(format!(
                "Only structs and modules have members, found `{}`",
                found
            )),
            ErrorImpl::NoSuchField { field, ty } => {
                ErrorTip::Suggestion(format!("Struct `{}` has no field `{}`", ty, field))
            }
            ErrorImpl::NotAType { ident, .. } => {
                ErrorTip::Suggestion(format!("`{}` names a value, not a type", ident))
            }
            ErrorImpl::NotAStruct { ident, .. } => ErrorTip::Suggestion(format!(
                "Initializer lists need a struct type, `{}` is not one",
                ident
            )),
            ErrorImpl::NotCallable { found } => {
                ErrorTip::Suggestion(format!("Values of type `{}` cannot be called", found))
            }
            ErrorImpl::NotAssignable => ErrorTip::Suggestion(String::from(
                "Only variables, fields and dereferenced pointers can be assigned to",
            )),
            ErrorImpl::TypeMatchError { expected, received } => ErrorTip::Suggestion(format!(
                "Expected type `{}`, received `{}`",
                expected, received
            )),
            ErrorImpl::OperandTypeError {
                operator,
                expected,
                received,
            } => ErrorTip::Suggestion(format!(
                "Operator `{}` expects `{}`, received `{}`",
                operator, expected, received
            )),
            ErrorImpl::UnexpectedArguments { expected, received } => ErrorTip::Suggestion(format!(
                "Expected {} arguments, received {}",
                expected, received
            )),
            ErrorImpl::MissingArguments { expected, received } => ErrorTip::Suggestion(format!(
                "Expected {} arguments, received {}",
                expected, received
            )),
            ErrorImpl::StructAlreadyDeclared { name } => {
                ErrorTip::Suggestion(format!("Struct `{}` is already declared in this module", name))
            }
            ErrorImpl::ReturnOutsideFunction => ErrorTip::Suggestion(String::from(
                "`return` can only be used inside a function body",
            )),
            ErrorImpl::ImportError { .. } => ErrorTip::Suggestion(String::from(
                "Import paths are relative to the importing file",
            )),
            ErrorImpl::ModuleNotCompiled { .. } => ErrorTip::Suggestion(String::from(
                "Imported modules must be passed to the compiler as well",
            )),
            ErrorImpl::UnresolvedStruct { waiting_for, .. } => ErrorTip::Suggestion(format!(
                "`{}` never finished resolving, is it embedded in itself by value? Use a pointer",
                waiting_for
            )),
            ErrorImpl::StructTooLarge { .. } => ErrorTip::Suggestion(String::from(
                "Embed the largest fields through pointers",
            )),
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.internal_error)
    }
}

pub enum ErrorTip {
    None,
    Suggestion(String),
}

impl Display for ErrorTip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorTip::None => write!(f, ""),
            ErrorTip::Suggestion(suggestion) => write!(f, "{}", suggestion),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ErrorImpl {
    #[error("unknown symbol '{token}'")]
    UnrecognisedToken { token: String },
    #[error("character literal with invalid length of {length}: {literal}")]
    InvalidCharLiteral { literal: String, length: usize },
    #[error("unexpected token: {token:?}")]
    UnexpectedToken { token: String },
    #[error("unexpected token ({message}): {token:?}")]
    UnexpectedTokenDetailed { token: String, message: String },
    #[error("expected '{expected}'; got '{found}' instead")]
    ExpectedToken { expected: String, found: String },
    #[error("unexpected eof")]
    UnexpectedEof,
    #[error("error parsing number: {token:?}")]
    NumberParseError { token: String },
    #[error("illegal type identifier '{ident}': {reason}")]
    IllegalTypeIdentifier { ident: String, reason: String },
    #[error("identifier '{ident}' not found")]
    IdentifierNotFound { ident: String },
    #[error("module alias '{alias}' was never imported")]
    UnknownModule { alias: String },
    #[error("'{ident}' not found in module '{module}'")]
    NotFoundInModule { ident: String, module: String },
    #[error("cannot access a member of non-scoped type '{found}'")]
    NotScoped { found: String },
    #[error("type '{ty}' has no field '{field}'")]
    NoSuchField { field: String, ty: String },
    #[error("'{ident}' is not a type, found '{found}'")]
    NotAType { ident: String, found: String },
    #[error("'{ident}' is not a struct, found '{found}'")]
    NotAStruct { ident: String, found: String },
    #[error("cannot call a value of type '{found}'")]
    NotCallable { found: String },
    #[error("left side of assignment is not assignable")]
    NotAssignable,
    #[error("types do not match: expected '{expected}', found '{received}'")]
    TypeMatchError { expected: String, received: String },
    #[error("operator '{operator}' expected '{expected}', found '{received}'")]
    OperandTypeError {
        operator: String,
        expected: String,
        received: String,
    },
    #[error("too many arguments: expected {expected}, received {received}")]
    UnexpectedArguments { expected: usize, received: usize },
    #[error("missing arguments: expected {expected}, received {received}")]
    MissingArguments { expected: usize, received: usize },
    #[error("struct '{name}' already declared")]
    StructAlreadyDeclared { name: String },
    #[error("return statement outside of a function")]
    ReturnOutsideFunction,
    #[error("{reason}: {path}")]
    ImportError { path: String, reason: String },
    #[error("{path} is not being compiled")]
    ModuleNotCompiled { path: String },
    #[error("struct '{name}' never resolved: field '{field}' waits on '{waiting_for}'")]
    UnresolvedStruct {
        name: String,
        field: String,
        waiting_for: String,
    },
    #[error("struct '{name}' is larger than {max} bytes", max = u32::MAX)]
    StructTooLarge { name: String },
}
