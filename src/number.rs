//! Greedy numeric-run scanning with post-hoc classification.
//!
//! The run is consumed first and classified after, because JSON-ish
//! numeric garbage (a trailing `-`, a comma used as a decimal separator, a
//! bare `e`) has to be recovered rather than rejected.

use std::sync::OnceLock;

use num_bigint::BigInt;
use regex::Regex;
use tracing::debug;

use crate::context::{ContextStack, Frame};
use crate::error::ConversionError;
use crate::scanner::Scanner;
use crate::string;
use crate::value::Value;

fn run_pattern(allow_comma: bool) -> &'static Regex {
    static WITH_COMMA: OnceLock<Regex> = OnceLock::new();
    static WITHOUT_COMMA: OnceLock<Regex> = OnceLock::new();
    if allow_comma {
        WITH_COMMA.get_or_init(|| Regex::new(r"^[0-9eE.,/\-]+").unwrap())
    } else {
        WITHOUT_COMMA.get_or_init(|| Regex::new(r"^[0-9eE./\-]+").unwrap())
    }
}

/// Consumes the maximal numeric-character run at the cursor and converts
/// it to `Int`, `Float`, or (on ambiguity or conversion failure) `Str`.
pub fn parse_number(scanner: &mut Scanner, ctx: &ContextStack) -> Value {
    let allow_comma = ctx.top() != Some(Frame::Array);
    let matched = match scanner.scan(run_pattern(allow_comma)) {
        Some(m) => m,
        None => return Value::Str(String::new()),
    };
    let run_byte_len = matched.len();

    let mut text = matched.to_string();
    if matches!(text.chars().last(), Some('-' | 'e' | 'E' | ',')) {
        text.pop();
    }

    if let Some(ch) = scanner.peek(0) {
        if ch.is_alphabetic() {
            scanner.rewind_bytes(run_byte_len);
            return string::parse_string(scanner, ctx);
        }
    }
    if scanner.peek(0) == Some('"') {
        scanner.getch();
    }

    classify(&text)
}

fn classify(text: &str) -> Value {
    if text.is_empty() {
        return Value::Str(text.to_string());
    }
    if let Some(stripped) = text.strip_suffix('.') {
        return parse_float(stripped).unwrap_or_else(|_| Value::Str(text.to_string()));
    }
    if text.contains(',') {
        let dotted = text.replace(',', ".");
        return parse_float(&dotted).unwrap_or_else(|_| Value::Str(text.to_string()));
    }
    if text.contains('.') || text.contains('e') || text.contains('E') {
        return parse_float(text).unwrap_or_else(|_| Value::Str(text.to_string()));
    }
    parse_int(text).unwrap_or_else(|_| Value::Str(text.to_string()))
}

fn parse_int(text: &str) -> Result<Value, ConversionError> {
    text.parse::<BigInt>()
        .map(Value::Int)
        .map_err(|_| {
            debug!(text, "number run did not parse as an integer, degrading to string");
            ConversionError::NotAnInteger {
                text: text.to_string(),
            }
        })
}

fn parse_float(text: &str) -> Result<Value, ConversionError> {
    text.parse::<f64>().map(Value::Float).map_err(|_| {
        debug!(text, "number run did not parse as a float, degrading to string");
        ConversionError::NotAFloat {
            text: text.to_string(),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int(n: i64) -> Value {
        Value::Int(BigInt::from(n))
    }

    #[test]
    fn plain_integer() {
        let mut s = Scanner::new("42,");
        let ctx = ContextStack::new();
        assert_eq!(parse_number(&mut s, &ctx), int(42));
        assert_eq!(s.rest(), ",");
    }

    #[test]
    fn arbitrary_precision_integer_is_not_truncated() {
        let mut s = Scanner::new("12345678901234567890");
        let ctx = ContextStack::new();
        match parse_number(&mut s, &ctx) {
            Value::Int(n) => assert_eq!(n.to_string(), "12345678901234567890"),
            other => panic!("expected Int, got {other:?}"),
        }
    }

    #[test]
    fn trailing_dot_becomes_float() {
        let mut s = Scanner::new("12.");
        let ctx = ContextStack::new();
        assert_eq!(parse_number(&mut s, &ctx), Value::Float(12.0));
    }

    #[test]
    fn comma_as_decimal_separator_in_object_value() {
        let mut s = Scanner::new("1,234");
        let mut ctx = ContextStack::new();
        ctx.push(Frame::ObjectValue);
        assert_eq!(parse_number(&mut s, &ctx), Value::Float(1.234));
    }

    #[test]
    fn comma_as_list_delimiter_in_array_stays_split() {
        let mut s = Scanner::new("1,234");
        let mut ctx = ContextStack::new();
        ctx.push(Frame::Array);
        assert_eq!(parse_number(&mut s, &ctx), int(1));
        assert_eq!(s.rest(), ",234");
    }

    #[test]
    fn multiple_commas_fall_back_to_string() {
        let mut s = Scanner::new("1,234,567");
        let ctx = ContextStack::new();
        assert_eq!(
            parse_number(&mut s, &ctx),
            Value::Str("1,234,567".to_string())
        );
    }

    #[test]
    fn trailing_garbage_character_is_dropped() {
        let mut s = Scanner::new("42-");
        let ctx = ContextStack::new();
        assert_eq!(parse_number(&mut s, &ctx), int(42));
        assert!(s.eos());
    }

    #[test]
    fn trailing_comma_before_closer_is_dropped() {
        let mut s = Scanner::new("42,}");
        let ctx = ContextStack::new();
        assert_eq!(parse_number(&mut s, &ctx), int(42));
        assert_eq!(s.rest(), "}");
    }

    #[test]
    fn digit_run_followed_by_a_letter_rewinds_to_a_string() {
        let mut s = Scanner::new("1notanumber]");
        let mut ctx = ContextStack::new();
        ctx.push(Frame::Array);
        assert_eq!(
            parse_number(&mut s, &ctx),
            Value::Str("1notanumber".to_string())
        );
        assert_eq!(s.rest(), "]");
    }
}
