/// AST (Abstract Syntax Tree) module
/// Contains all definitions related to the AST structure
///
/// Submodules:
/// - ast: `Stmt` and `Expr` nodes and their kinds
/// - expressions: Payloads of the expression kinds
/// - statements: Payloads of the statement kinds
/// - types: Type annotations as written in source
pub mod ast;
pub mod expressions;
pub mod statements;
pub mod types;
