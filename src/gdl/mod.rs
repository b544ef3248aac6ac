//! # GDL Language
//!
//! Lexer and parser for the Graph Definition Language. Pure functions —
//! no I/O, no loader state: text in, event stream out.

pub mod ast;
pub mod lexer;
pub mod parser;

use crate::{Error, Result};
use ast::GdlEvent;

/// How the parser should proceed after a syntax error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recovery {
    /// Propagate the error to the caller (fail fast).
    Abort,
    /// Drop the malformed element and resynchronize at the next one.
    SkipElement,
}

/// Pluggable syntax-error handling strategy.
pub trait ErrorStrategy {
    fn on_syntax_error(&self, error: &Error) -> Recovery;
}

/// Default strategy: abort on the first malformed input.
#[derive(Debug, Clone, Copy, Default)]
pub struct FailFast;

impl ErrorStrategy for FailFast {
    fn on_syntax_error(&self, _error: &Error) -> Recovery {
        Recovery::Abort
    }
}

/// Lenient strategy: skip malformed top-level elements, keep the rest.
#[derive(Debug, Clone, Copy, Default)]
pub struct SkipMalformedElements;

impl ErrorStrategy for SkipMalformedElements {
    fn on_syntax_error(&self, _error: &Error) -> Recovery {
        Recovery::SkipElement
    }
}

/// Parse a GDL script into an ordered event stream, failing fast.
pub fn parse(input: &str) -> Result<Vec<GdlEvent>> {
    parse_with_strategy(input, &FailFast)
}

/// Parse a GDL script with a custom error strategy. Lexer errors always
/// abort; the strategy only governs grammar-level recovery.
pub fn parse_with_strategy(
    input: &str,
    strategy: &dyn ErrorStrategy,
) -> Result<Vec<GdlEvent>> {
    let tokens = lexer::tokenize(input)?;
    parser::parse_events(&tokens, strategy)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skip_malformed_element_keeps_rest() {
        let events = parse_with_strategy("(a)-[oops, (b)", &SkipMalformedElements).unwrap();
        // The broken path is dropped entirely; (b) survives.
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], GdlEvent::Vertex(_)));
    }

    #[test]
    fn test_fail_fast_aborts() {
        assert!(parse("(a)-[oops, (b)").is_err());
    }
}
