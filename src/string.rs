//! String recovery: the largest and hardest parser in the crate.
//!
//! Quoted, unquoted, doubled-quote, and mid-string-broken inputs all come
//! through here. The branch taken depends on three things observed at the
//! cursor: which delimiter style (if any) opened the token, whether quotes
//! are missing entirely, and what frame sits on top of the context stack.

use tracing::{debug, trace};

use crate::context::{ContextStack, Frame};
use crate::error::ConversionError;
use crate::literal;
use crate::lookahead::{skip_to_character, skip_whitespaces_at};
use crate::scanner::Scanner;
use crate::value::Value;

const STRUCTURAL: [char; 6] = ['{', '}', '[', ']', ':', ','];

pub(crate) fn quote_pair(open: char) -> Option<char> {
    match open {
        '"' => Some('"'),
        '\'' => Some('\''),
        '\u{201c}' => Some('\u{201d}'), // “ -> ”
        '\u{201d}' => Some('\u{201d}'), // ” opened alone closes on itself
        _ => None,
    }
}

pub(crate) fn is_quote_char(c: char) -> bool {
    matches!(c, '"' | '\'' | '\u{201c}' | '\u{201d}')
}

/// Recovers a string value at the cursor, in whatever shape it takes.
pub fn parse_string(scanner: &mut Scanner, ctx: &ContextStack) -> Value {
    if !skip_leading_garbage(scanner) {
        return Value::Str(String::new());
    }

    let Some(opener) = scanner.peek(0) else {
        return Value::Str(String::new());
    };

    if let Some(close_ch) = quote_pair(opener) {
        // A lone quote mark with nothing after it: there is no closing
        // delimiter to find, but the quote character itself is the only
        // content available, so it becomes a single-character string
        // rather than an empty one.
        if scanner.peek(1).is_none() {
            scanner.getch();
            return Value::Str(opener.to_string());
        }
        scanner.getch();
        parse_quoted_body(scanner, ctx, close_ch)
    } else {
        if matches!(opener, 't' | 'T' | 'f' | 'F' | 'n' | 'N') && ctx.top() != Some(Frame::ObjectKey)
        {
            let mark = scanner.save();
            if let Some(v) = literal::parse_literal(scanner) {
                return v;
            }
            scanner.restore(mark);
        }
        parse_unquoted_body(scanner, ctx)
    }
}

/// Consumes non-word, non-delimiter garbage before a quote or an unquoted
/// token. Returns `false` if a structural character is hit first (the
/// caller should then report an empty string) or if EOF is reached.
fn skip_leading_garbage(scanner: &mut Scanner) -> bool {
    loop {
        match scanner.peek(0) {
            None => return false,
            Some(c) if quote_pair(c).is_some() || c.is_alphanumeric() || c == '_' => return true,
            Some(c) if STRUCTURAL.contains(&c) => return false,
            Some(_) => {
                scanner.getch();
            }
        }
    }
}

fn parse_quoted_body(scanner: &mut Scanner, ctx: &ContextStack, close_ch: char) -> Value {
    let doubled_quotes = handle_doubled_quote_opener(scanner, ctx, close_ch);
    if let DoubledQuoteOutcome::Empty(v) = doubled_quotes {
        return v;
    }
    let doubled_quotes = matches!(doubled_quotes, DoubledQuoteOutcome::Doubled);

    let mut buf = String::new();
    let mut unmatched_delimiter = false;

    loop {
        match scanner.peek(0) {
            None => break,
            Some('\\') => {
                scanner.getch();
                push_escape(scanner, &mut buf);
            }
            Some(c) if c == close_ch => {
                if doubled_quotes {
                    if scanner.peek(1) == Some(close_ch) {
                        scanner.advance_chars(2);
                        break;
                    }
                    buf.push(c);
                    scanner.getch();
                    continue;
                }
                if is_real_closer(scanner, ctx, close_ch, &mut unmatched_delimiter) {
                    scanner.getch();
                    break;
                }
                buf.push(c);
                scanner.getch();
            }
            Some(c) => {
                buf.push(c);
                scanner.getch();
            }
        }
    }

    if buf.ends_with('\n') {
        buf = buf.trim_end().to_string();
    }
    Value::Str(buf)
}

enum DoubledQuoteOutcome {
    None,
    Doubled,
    Empty(Value),
}

/// Handles `""` right after the opening quote: either it closes an empty
/// string, or it opens a `""real""`-style doubled wrapper.
fn handle_doubled_quote_opener(
    scanner: &mut Scanner,
    ctx: &ContextStack,
    close_ch: char,
) -> DoubledQuoteOutcome {
    if scanner.peek(0) != Some(close_ch) {
        return DoubledQuoteOutcome::None;
    }

    let expected_stop: &[char] = match ctx.top() {
        Some(Frame::ObjectKey) => &[':'],
        Some(Frame::Array) => &[',', ']'],
        _ => &[',', '}'],
    };

    match scanner.peek(1) {
        None => {
            scanner.getch();
            DoubledQuoteOutcome::Empty(Value::Str(String::new()))
        }
        Some(c) if expected_stop.contains(&c) => {
            scanner.getch();
            DoubledQuoteOutcome::Empty(Value::Str(String::new()))
        }
        Some(_) => {
            let rest_len = scanner.rest().chars().count();
            let dist = skip_to_character(scanner, &[close_ch], 2);
            if dist < rest_len {
                trace!("doubled opening quote treated as a wrapped string");
                scanner.getch(); // consume the second opening quote
                DoubledQuoteOutcome::Doubled
            } else {
                DoubledQuoteOutcome::None
            }
        }
    }
}

/// Decides whether the `close_ch` at the cursor really ends the string, or
/// is an internal quote (e.g. `"Lorem "ipsum" sic"`).
fn is_real_closer(
    scanner: &Scanner,
    ctx: &ContextStack,
    close_ch: char,
    unmatched_delimiter: &mut bool,
) -> bool {
    match ctx.top() {
        Some(Frame::Array) => {
            let gap = skip_whitespaces_at(scanner, 1);
            if scanner.peek(gap) == Some(close_ch) {
                return true;
            }
            matches!(scanner.peek(gap), Some(',') | Some(']') | Some('}'))
        }
        Some(Frame::ObjectValue) => {
            let gap = skip_whitespaces_at(scanner, 1);
            if matches!(scanner.peek(gap), Some(',') | Some('}')) {
                return true;
            }
            // Already inside a region opened by an earlier internal quote:
            // this one matches it rather than opening a new guess, so the
            // "treat next quote as closer" logic re-enables from here.
            if *unmatched_delimiter {
                *unmatched_delimiter = false;
                trace!("matched quote closes the misplaced-quote region");
                return false;
            }
            // No later quote looks like a plausible terminator: this one
            // is the best candidate we have, so treat it as real.
            let Some(_later) = find_plausible_closer(scanner, close_ch, 1) else {
                return true;
            };
            *unmatched_delimiter = true;
            trace!("internal quote treated as literal content, not a closer");
            false
        }
        _ => true,
    }
}

/// Scans forward for a `close_ch` occurrence that looks like it really
/// terminates a value — i.e. skipping whitespace past it lands on a
/// structural character (or EOF). Quotes that don't qualify are skipped
/// over so the search can keep looking past them; this is what lets
/// `"Lorem "ipsum" sic"` find the *last* quote as the real closer instead
/// of stopping at the first one it sees.
fn find_plausible_closer(scanner: &Scanner, close_ch: char, from: usize) -> Option<usize> {
    let mut from = from;
    loop {
        let dist = skip_to_character(scanner, &[close_ch], from);
        let rest_len = scanner.rest().chars().count();
        if dist >= rest_len {
            return None;
        }
        let after = skip_whitespaces_at(scanner, dist + 1);
        let looks_terminal = match scanner.peek(after) {
            None => true,
            Some(c) => matches!(c, ',' | '}' | ']' | ':'),
        };
        if looks_terminal {
            return Some(dist);
        }
        from = dist + 1;
    }
}

fn parse_unquoted_body(scanner: &mut Scanner, ctx: &ContextStack) -> Value {
    let mut buf = String::new();
    loop {
        match scanner.peek(0) {
            None => break,
            Some('\\') => {
                scanner.getch();
                push_escape(scanner, &mut buf);
            }
            Some(c) if ctx.top() == Some(Frame::ObjectKey) && c.is_whitespace() => {
                let ahead = skip_whitespaces_at(scanner, 0);
                if matches!(scanner.peek(ahead), Some(':') | Some(',')) {
                    scanner.advance_chars(ahead);
                    break;
                }
                for _ in 0..ahead {
                    if let Some(ch) = scanner.getch() {
                        buf.push(ch);
                    } else {
                        break;
                    }
                }
            }
            // A bare colon always ends an unquoted token: in object_key
            // context it's the expected key/value separator; in
            // object_value context it means what was collected so far was
            // actually the start of the *next* key (the object parser's
            // no-colon reinterpretation relies on seeing it unconsumed).
            Some(':')
                if matches!(
                    ctx.top(),
                    Some(Frame::ObjectKey) | Some(Frame::ObjectValue)
                ) =>
            {
                break
            }
            Some(']') if ctx.top() == Some(Frame::ObjectKey) || ctx.top() == Some(Frame::Array) => {
                break
            }
            Some('}') if ctx.top() == Some(Frame::ObjectKey) || ctx.top() == Some(Frame::ObjectValue) => {
                break
            }
            Some(',')
                if matches!(
                    ctx.top(),
                    Some(Frame::Array) | Some(Frame::ObjectValue) | Some(Frame::ObjectKey)
                ) =>
            {
                break
            }
            Some(c) if ctx.top().is_none() && (c.is_whitespace() || STRUCTURAL.contains(&c)) => {
                break
            }
            Some(c) => {
                buf.push(c);
                scanner.getch();
            }
        }
    }
    Value::Str(buf.trim_end().to_string())
}

fn push_escape(scanner: &mut Scanner, buf: &mut String) {
    match scanner.peek(0) {
        Some('"') => {
            buf.push('"');
            scanner.getch();
        }
        Some('t') => {
            buf.push('\t');
            scanner.getch();
        }
        Some('n') => {
            buf.push('\n');
            scanner.getch();
        }
        Some('r') => {
            buf.push('\r');
            scanner.getch();
        }
        Some('b') => {
            buf.push('\u{0008}');
            scanner.getch();
        }
        Some('\\') => {
            buf.push('\\');
            scanner.getch();
        }
        Some('u') => {
            scanner.getch();
            match decode_unicode_escape(scanner) {
                Ok(ch) => buf.push(ch),
                Err(err) => {
                    debug!(%err, "invalid \\u escape, keeping it literally");
                    buf.push('\\');
                    buf.push('u');
                }
            }
        }
        Some('x') => {
            scanner.getch();
            match decode_byte_escape(scanner) {
                Ok(ch) => buf.push(ch),
                Err(err) => {
                    debug!(%err, "invalid \\x escape, keeping it literally");
                    buf.push('\\');
                    buf.push('x');
                }
            }
        }
        Some(c) if is_quote_char(c) => {
            buf.push(c);
            scanner.getch();
        }
        Some(c) => {
            buf.push('\\');
            buf.push(c);
            scanner.getch();
        }
        None => buf.push('\\'),
    }
}

fn decode_unicode_escape(scanner: &mut Scanner) -> Result<char, ConversionError> {
    let digits: String = (0..4).filter_map(|k| scanner.peek(k)).collect();
    let invalid = || ConversionError::InvalidUnicodeEscape {
        digits: digits.clone(),
    };
    if digits.chars().count() != 4 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(invalid());
    }
    let code = u32::from_str_radix(&digits, 16).map_err(|_| invalid())?;
    let ch = char::from_u32(code).ok_or_else(invalid)?;
    scanner.advance_chars(4);
    Ok(ch)
}

fn decode_byte_escape(scanner: &mut Scanner) -> Result<char, ConversionError> {
    let digits: String = (0..2).filter_map(|k| scanner.peek(k)).collect();
    let invalid = || ConversionError::InvalidByteEscape {
        digits: digits.clone(),
    };
    if digits.chars().count() != 2 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(invalid());
    }
    let byte = u8::from_str_radix(&digits, 16).map_err(|_| invalid())?;
    scanner.advance_chars(2);
    Ok(byte as char)
}
