//! Case-insensitive recognition of `true`, `false`, and `null`.
//!
//! A precompiled regex per keyword, anchored at the cursor so a miss
//! never advances the scanner.

use std::sync::OnceLock;

use regex::Regex;

use crate::scanner::Scanner;
use crate::value::Value;

fn true_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)^true").unwrap())
}

fn false_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)^false").unwrap())
}

fn null_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)^null").unwrap())
}

/// Tries `true`, then `false`, then `null`, case-insensitively. Consumes
/// the match and returns the corresponding value on success; leaves the
/// scanner untouched and returns `None` otherwise.
pub fn parse_literal(scanner: &mut Scanner) -> Option<Value> {
    if scanner.scan(true_pattern()).is_some() {
        return Some(Value::Bool(true));
    }
    if scanner.scan(false_pattern()).is_some() {
        return Some(Value::Bool(false));
    }
    if scanner.scan(null_pattern()).is_some() {
        return Some(Value::Null);
    }
    None
}
