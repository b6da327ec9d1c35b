#![allow(clippy::module_inception)]

use std::{path::PathBuf, rc::Rc};

use crate::{
    errors::errors::{Error, ErrorTip},
    lexer::lexer::tokenize,
    module::module::Module,
    parser::parser::parse,
};

pub mod ast;
pub mod errors;
pub mod lexer;
pub mod macros;
pub mod module;
pub mod parser;
pub mod type_checker;

extern crate regex;

#[derive(Debug, Clone, PartialEq)]
pub struct Position(pub u32, pub Rc<String>);

#[derive(Debug, Clone, PartialEq)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

impl Span {
    pub fn point(position: Position) -> Self {
        Span {
            start: position.clone(),
            end: position,
        }
    }

    /// Returns a span covering both `self` and `other`.
    pub fn merge(&self, other: &Span) -> Span {
        Span {
            start: self.start.clone(),
            end: other.end.clone(),
        }
    }
}

/// Tokenizes and parses one source file into a module.
///
/// A lexing error stops at the offending character and produces an empty
/// module; parse errors are recovered from and all of them are returned.
pub fn parse_module(path: PathBuf, source: &str) -> (Module, Vec<Error>) {
    let file = Rc::new(path.to_string_lossy().into_owned());
    let mut module = Module::new(path);

    let tokens = match tokenize(source, Rc::clone(&file)) {
        Ok(tokens) => tokens,
        Err(error) => return (module, vec![error]),
    };

    let (statements, errors) = parse(tokens, file);
    for stmt in statements {
        module.push_stmt(stmt);
    }

    (module, errors)
}

/// Finds the line containing the byte offset `position`.
///
/// Returns the 1-based line number, the line text and the offset of
/// `position` inside that line.
pub fn get_line_at_position(source: &str, position: u32) -> Option<(usize, String, usize)> {
    let pos = position as usize;

    if pos > source.len() {
        return None;
    }

    let mut start = 0;
    let mut line_number = 1;

    for line in source.split_inclusive('\n') {
        let end = start + line.len();

        if (start..end).contains(&pos) {
            let line_pos = pos - start;
            return Some((line_number, line.to_string(), line_pos));
        }

        start = end;
        line_number += 1;
    }

    // Offset sits at the very end of the file (eof token)
    let last = source.rsplit('\n').next().unwrap_or("");
    Some((line_number - 1).max(1)).map(|line| (line, last.to_string(), last.len()))
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_get_line_at_position() {
        let source = "Hello, world!\nlet x = 1;\n\nTesting { }\n";

        let (line_number, line, line_pos) = super::get_line_at_position(source, 10).unwrap();
        assert_eq!(line_number, 1);
        assert_eq!(line, "Hello, world!\n");
        assert_eq!(line_pos, 10);

        let (line_number, line, line_pos) = super::get_line_at_position(source, 34).unwrap();
        assert_eq!(line_number, 4);
        assert_eq!(line, "Testing { }\n");
        assert_eq!(line_pos, 8);
    }

    #[test]
    fn test_get_line_past_end() {
        assert!(super::get_line_at_position("abc", 10).is_none());
    }
}

pub fn display_error(error: &Error, source: &str) {
    /*
        [error] message
        -> final.syn:20:9
           |
        20 | let a = #;
           | --------^
    */

    let position = error.get_position();
    let file = position.1.as_str();

    let Some((line, line_text, line_pos)) = get_line_at_position(source, position.0) else {
        println!("[error] {}\n-> {}", error, file);
        return;
    };

    let line_string = line.to_string();
    let padding = line_string.len() + 2;

    if let ErrorTip::None = error.get_tip() {
        println!("[error] {}: {}", error.get_error_name(), error);
    } else {
        println!(
            "[error] {}: {} ({})",
            error.get_error_name(),
            error,
            error.get_tip()
        );
    }
    println!("-> {}:{}:{}", file, line, line_pos + 1);
    println!("{:>padding$}", "|");

    let (line_text_removed, removed_whitespace) = remove_starting_whitespace(&line_text);
    println!("{} | {}", line_string, line_text_removed.trim_end());

    let arrows = line_pos.saturating_sub(removed_whitespace) + 1;

    println!("{:>padding$} {:->arrows$}", "|", "^");
}

fn remove_starting_whitespace(string: &str) -> (String, usize) {
    let mut start = 0;
    for c in string.chars() {
        if c == ' ' || c == '\t' {
            start += c.len_utf8();
        } else {
            break;
        }
    }

    (String::from(&string[start..]), start)
}
