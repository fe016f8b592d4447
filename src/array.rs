//! Array recovery.
//!
//! Collects values until a closer (or EOF), but every element passes
//! through a post-processing step first: empty containers are treated as
//! stray delimiter noise, not content, and a trailing `...` truncation
//! marker is dropped rather than kept as a bogus string.

use tracing::warn;

use crate::comment::{parse_comment, starts_comment};
use crate::context::{ContextStack, Frame, FrameGuard};
use crate::dispatcher::parse_json;
use crate::lookahead::skip_whitespaces_at;
use crate::object;
use crate::options::RepairOptions;
use crate::outcome::Outcome;
use crate::scanner::Scanner;
use crate::string::{self, is_quote_char, quote_pair};
use crate::value::Value;

/// Parses array contents up to (and including) the closing `]`. The
/// opening `[` has already been consumed by the caller.
pub fn parse_array(scanner: &mut Scanner, ctx: &mut ContextStack, opts: &RepairOptions) -> Value {
    if ctx.depth() >= opts.max_depth {
        warn!(depth = ctx.depth(), "max_depth reached, returning empty array");
        return Value::Arr(Vec::new());
    }

    let _guard = FrameGuard::push(ctx, Frame::Array);
    let mut items = Vec::new();

    loop {
        scanner.skip_ws();
        match scanner.peek(0) {
            None => break,
            Some(']') | Some('}') => break,
            _ => {}
        }

        if starts_comment(scanner) {
            parse_comment(scanner, ctx);
            continue;
        }

        if is_truncation_marker(scanner) {
            scanner.advance_chars(3);
            continue;
        }

        let value = if let Some(c) = scanner.peek(0) {
            if is_quote_char(c) && looks_like_implicit_object_key(scanner, c) {
                Some(object::parse_object(scanner, ctx, opts))
            } else if is_quote_char(c) {
                Some(string::parse_string(scanner, ctx))
            } else {
                match parse_json(scanner, ctx, opts) {
                    Outcome::Value(v) => Some(v),
                    Outcome::Stop => None,
                }
            }
        } else {
            None
        };

        match value {
            None => {}
            Some(v) if v.is_empty_container() => {
                if !matches!(scanner.peek(0), Some('}') | Some(']')) {
                    scanner.getch();
                }
            }
            Some(v) => items.push(v),
        }

        skip_separators(scanner);
    }

    if scanner.peek(0) == Some(']') {
        scanner.getch();
    } else if scanner.peek(0) == Some('}') {
        scanner.getch();
    }

    Value::Arr(items)
}

/// `... ` right after a `,`/`.`-style truncation marker: three literal
/// dots meaning "the rest was cut off", never real content.
fn is_truncation_marker(scanner: &Scanner) -> bool {
    scanner.peek(0) == Some('.') && scanner.peek(1) == Some('.') && scanner.peek(2) == Some('.')
}

/// True if the quoted token at the cursor is followed (past its matching
/// closer and any whitespace) by `:` — meaning this isn't a plain string
/// element, it's a key that was never wrapped in `{}`. Shared with the
/// top-level driver, which uses the same test to recognize the braceless
/// continuation left behind by an object's duplicate-key split.
pub(crate) fn looks_like_implicit_object_key(scanner: &Scanner, opener: char) -> bool {
    let Some(close_ch) = quote_pair(opener) else {
        return false;
    };
    let chars: Vec<char> = scanner.rest().chars().collect();
    let mut i = 1;
    while i < chars.len() {
        if chars[i] == close_ch && !is_escaped_at(&chars, i) {
            break;
        }
        i += 1;
    }
    if i >= chars.len() {
        return false;
    }
    let after = skip_whitespaces_at(scanner, i + 1);
    scanner.peek(after) == Some(':')
}

fn is_escaped_at(chars: &[char], index: usize) -> bool {
    let mut backslashes = 0;
    let mut j = index;
    while j > 0 && chars[j - 1] == '\\' {
        backslashes += 1;
        j -= 1;
    }
    backslashes % 2 == 1
}

fn skip_separators(scanner: &mut Scanner) {
    loop {
        match scanner.peek(0) {
            Some(c) if c.is_whitespace() || c == ',' => {
                scanner.getch();
            }
            _ => break,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arr(text: &str) -> Value {
        let mut s = Scanner::new(text);
        let mut ctx = ContextStack::new();
        let opts = RepairOptions::default();
        parse_array(&mut s, &mut ctx, &opts)
    }

    #[test]
    fn plain_array_of_numbers() {
        assert_eq!(
            arr("1, 2, 3]"),
            Value::Arr(vec![
                Value::Int(num_bigint::BigInt::from(1)),
                Value::Int(num_bigint::BigInt::from(2)),
                Value::Int(num_bigint::BigInt::from(3)),
            ])
        );
    }

    #[test]
    fn truncation_marker_is_dropped() {
        assert_eq!(
            arr("1, 2, 3, ...]"),
            Value::Arr(vec![
                Value::Int(num_bigint::BigInt::from(1)),
                Value::Int(num_bigint::BigInt::from(2)),
                Value::Int(num_bigint::BigInt::from(3)),
            ])
        );
    }

    #[test]
    fn empty_container_elements_are_skipped() {
        assert_eq!(
            arr("\"\", 1]"),
            Value::Arr(vec![Value::Int(num_bigint::BigInt::from(1))])
        );
    }

    #[test]
    fn tolerant_closer_accepts_mismatched_brace() {
        let mut s = Scanner::new("1, 2}");
        let mut ctx = ContextStack::new();
        let opts = RepairOptions::default();
        assert_eq!(
            parse_array(&mut s, &mut ctx, &opts),
            Value::Arr(vec![
                Value::Int(num_bigint::BigInt::from(1)),
                Value::Int(num_bigint::BigInt::from(2)),
            ])
        );
        assert!(s.eos());
    }

    #[test]
    fn unclosed_array_recovers_at_eof() {
        assert_eq!(
            arr("1, 2, 3"),
            Value::Arr(vec![
                Value::Int(num_bigint::BigInt::from(1)),
                Value::Int(num_bigint::BigInt::from(2)),
                Value::Int(num_bigint::BigInt::from(3)),
            ])
        );
    }
}
