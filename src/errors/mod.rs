//! Error types and error handling for the compiler.
//!
//! This module defines the diagnostics produced by every phase of the
//! front end. It includes:
//!
//! - Error structures carrying the source span they point at
//! - Specific error variants for lexing, parsing, type checking and imports
//! - Error formatting and display functionality
//! - Helpful error messages and suggestions

pub mod errors;
