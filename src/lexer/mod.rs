//! Lexical analysis.
//!
//! Converts Synthium source text into a stream of tokens. Tokens are matched
//! against a table of anchored regex patterns, tried in order; keywords are
//! split off identifiers through `RESERVED_LOOKUP`. Whitespace and `//`
//! comments are skipped and every token carries its source span.

pub mod lexer;
pub mod tokens;

#[cfg(test)]
mod tests;
