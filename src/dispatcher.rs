//! `parse_json`: the top of the recursive descent.
//!
//! Every composite and top-level caller funnels through here to get "the
//! next value, whatever shape it takes," recovering from garbage rather
//! than rejecting it.

use crate::array;
use crate::comment::{parse_comment, starts_comment};
use crate::context::{ContextStack, Frame};
use crate::literal;
use crate::number;
use crate::object;
use crate::options::RepairOptions;
use crate::outcome::Outcome;
use crate::scanner::Scanner;
use crate::string::{self, is_quote_char};

/// Consumes and returns the next value at the cursor, recursing into
/// objects/arrays as needed. Returns [`Outcome::Stop`] at EOF or at a
/// terminator that belongs to an enclosing context.
pub fn parse_json(scanner: &mut Scanner, ctx: &mut ContextStack, opts: &RepairOptions) -> Outcome {
    loop {
        scanner.skip_ws();
        let Some(c) = scanner.peek(0) else {
            return Outcome::Stop;
        };

        if starts_comment(scanner) {
            parse_comment(scanner, ctx);
            continue;
        }

        match c {
            '{' => {
                scanner.getch();
                return Outcome::Value(object::parse_object(scanner, ctx, opts));
            }
            '[' => {
                scanner.getch();
                return Outcome::Value(array::parse_array(scanner, ctx, opts));
            }
            ']' if ctx.top() == Some(Frame::Array) => return Outcome::Stop,
            '}' if matches!(ctx.top(), Some(Frame::ObjectKey) | Some(Frame::ObjectValue)) => {
                return Outcome::Stop
            }
            c if c.is_ascii_digit() || c == '-' || c == '.' => {
                let before = scanner.pos();
                let v = number::parse_number(scanner, ctx);
                if scanner.pos() == before {
                    scanner.getch();
                    continue;
                }
                return Outcome::Value(v);
            }
            c if is_quote_char(c) || c.is_alphabetic() => {
                if ctx.top().is_none() && c.is_alphabetic() && !is_quote_char(c) {
                    if let Some(v) = literal::parse_literal(scanner) {
                        return Outcome::Value(v);
                    }
                    scanner.getch();
                    continue;
                }
                return Outcome::Value(string::parse_string(scanner, ctx));
            }
            _ => {
                scanner.getch();
                continue;
            }
        }
    }
}
