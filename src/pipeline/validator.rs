//! Input literal validation.
//!
//! A numeric list literal is a comma-separated list of decimal numbers, e.g.
//! `"1, 2.5, -3"`. Tokens are trimmed; every token must parse to a finite
//! number. The empty string is a single empty token and therefore invalid.
//!
//! The same token parser backs the evaluator's `to_number`, so a literal that
//! validates here parses identically inside an emitted program.

use crate::types::NumericSequence;

/// Separator between tokens of a numeric list literal.
pub const LIST_SEPARATOR: char = ',';

/// Parse one token: trimmed, finite.
pub fn parse_number(token: &str) -> Option<f64> {
    token
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

/// Parse a whole literal, or `None` if any token is invalid.
pub fn parse_numeric_list(literal: &str) -> Option<NumericSequence> {
    literal.split(LIST_SEPARATOR).map(parse_number).collect()
}

/// Whether `literal` is a well-formed numeric list.
pub fn is_valid_numeric_list(literal: &str) -> bool {
    parse_numeric_list(literal).is_some()
}
