//! Comment recognition.
//!
//! JSON has no comments, but LLM output and hand-edited config often does.
//! All three shapes are no-ops for the caller: the dispatcher loop simply
//! continues after one — there is no separate recursive "comment mode".

use crate::context::{ContextStack, Frame};
use crate::lookahead::skip_to_character;
use crate::scanner::Scanner;

/// True if a comment starts at the cursor (`#`, `//`, or `/*`).
pub fn starts_comment(scanner: &Scanner) -> bool {
    match scanner.peek(0) {
        Some('#') => true,
        Some('/') => true,
        _ => false,
    }
}

/// Consumes one comment (of any recognized shape) at the cursor. The
/// caller is expected to have already checked [`starts_comment`].
pub fn parse_comment(scanner: &mut Scanner, ctx: &ContextStack) {
    match scanner.peek(0) {
        Some('#') => parse_line_comment(scanner, ctx),
        Some('/') => match scanner.peek(1) {
            Some('/') => parse_line_comment(scanner, ctx),
            Some('*') => parse_block_comment(scanner),
            _ => {
                // A lone `/` that isn't a comment opener: consume it so the
                // dispatcher loop always makes progress.
                scanner.getch();
            }
        },
        _ => {
            scanner.getch();
        }
    }
    scanner.skip_ws();
}

fn parse_block_comment(scanner: &mut Scanner) {
    scanner.advance_chars(2); // "/*"
    match scanner.rest().find("*/") {
        Some(byte_offset) => scanner.advance_bytes(byte_offset + 2),
        None => scanner.advance_bytes(scanner.rest().len()),
    }
}

fn parse_line_comment(scanner: &mut Scanner, ctx: &ContextStack) {
    scanner.advance_chars(if scanner.peek(0) == Some('#') { 1 } else { 2 });

    let mut terminators = vec!['\n', '\r'];
    if ctx.contains(Frame::Array) {
        terminators.push(']');
    }
    if ctx.contains(Frame::ObjectValue) {
        terminators.push('}');
    }
    if ctx.contains(Frame::ObjectKey) {
        terminators.push(':');
    }

    let dist = skip_to_character(scanner, &terminators, 0);
    scanner.advance_chars(dist);
}
