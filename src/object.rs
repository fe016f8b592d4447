//! Object recovery, including the dangling-array merge and the duplicate-key
//! split.
//!
//! The key/value loop is ordinary in shape — parse a key, parse a value,
//! assign, repeat — but every step has a recovery branch: stray
//! separators, a key with no colon, a bracketed key, a repeated key.

use tracing::{trace, warn};

use crate::array;
use crate::comment::{parse_comment, starts_comment};
use crate::context::{ContextStack, Frame, FrameGuard};
use crate::dispatcher::parse_json;
use crate::options::RepairOptions;
use crate::outcome::Outcome;
use crate::scanner::Scanner;
use crate::string;
use crate::value::{Object, Value};

/// Parses object contents up to (and including) the closing `}`. The
/// opening `{` has already been consumed by the caller.
pub fn parse_object(scanner: &mut Scanner, ctx: &mut ContextStack, opts: &RepairOptions) -> Value {
    if ctx.depth() >= opts.max_depth {
        warn!(depth = ctx.depth(), "max_depth reached, returning empty object");
        return Value::Obj(Object::new());
    }

    let mut object = Object::new();

    loop {
        scanner.skip_ws();
        if scanner.peek(0) == Some('}') {
            scanner.getch();
            break;
        }
        if scanner.eos() || scanner.peek(0) == Some(']') {
            break;
        }

        // Stray commas, colons, whitespace, and comments between entries
        // are all transparent noise.
        loop {
            match scanner.peek(0) {
                Some(c) if c.is_whitespace() || c == ',' || c == ':' => {
                    scanner.getch();
                }
                _ if starts_comment(scanner) => parse_comment(scanner, ctx),
                _ => break,
            }
        }
        if scanner.peek(0) == Some('}') {
            scanner.getch();
            break;
        }
        if scanner.eos() || scanner.peek(0) == Some(']') {
            break;
        }

        if scanner.peek(0) == Some('[') && matches!(object.last_value_mut(), Some(Value::Arr(_))) {
            merge_dangling_array(scanner, ctx, opts, &mut object);
            continue;
        }

        let pre_key_pos = scanner.pos();
        let key_str = if scanner.peek(0) == Some('[') {
            scanner.getch();
            let key_array = array::parse_array(scanner, ctx, opts);
            match key_array {
                Value::Arr(items) => items
                    .into_iter()
                    .next()
                    .map(|v| stringify_key(&v))
                    .unwrap_or_default(),
                other => stringify_key(&other),
            }
        } else {
            let key_value = {
                let _guard = FrameGuard::push(ctx, Frame::ObjectKey);
                string::parse_string(scanner, ctx)
            };
            let candidate = stringify_key(&key_value);
            if candidate.is_empty() && scanner.pos() == pre_key_pos && scanner.peek(0) == Some(':')
            {
                scanner.getch();
                let _guard = FrameGuard::push(ctx, Frame::ObjectValue);
                parse_json(scanner, ctx, opts);
                continue;
            }
            if candidate.is_empty() && matches!(scanner.peek(0), Some('}') | None) {
                break;
            }
            candidate
        };

        if object.contains_key(&key_str) {
            trace!(key = key_str, "duplicate key, splitting into a sibling object");
            scanner.restore(pre_key_pos);
            break;
        }

        scanner.skip_ws();
        let found_colon = if scanner.peek(0) == Some(':') {
            scanner.getch();
            true
        } else {
            false
        };

        let value = {
            let _guard = FrameGuard::push(ctx, Frame::ObjectValue);
            parse_json(scanner, ctx, opts).into_value_or_empty()
        };

        if found_colon {
            object.insert(key_str, value);
            continue;
        }

        if is_literal_keyword(&key_str) {
            trace!(key = key_str, "bare literal where a key was expected, closing object");
            break;
        }

        scanner.skip_ws();
        if scanner.peek(0) == Some(':') {
            // What we just parsed as this key's "value" was actually the
            // start of the next key.
            object.insert(key_str, Value::Bool(true));
            let next_key_str = stringify_key(&value);
            scanner.getch();
            let real_value = {
                let _guard = FrameGuard::push(ctx, Frame::ObjectValue);
                parse_json(scanner, ctx, opts).into_value_or_empty()
            };
            object.insert(next_key_str, real_value);
        } else {
            object.insert(key_str, Value::Bool(true));
        }
    }

    Value::Obj(object)
}

/// If the next token is `[` and the object's most-recently inserted value
/// is already an array, the new bracketed content extends it rather than
/// becoming a sibling value or a bracketed key.
fn merge_dangling_array(
    scanner: &mut Scanner,
    ctx: &mut ContextStack,
    opts: &RepairOptions,
    object: &mut Object,
) {
    scanner.getch(); // consume '['
    let merged = array::parse_array(scanner, ctx, opts);
    if let (Value::Arr(extra), Some(Value::Arr(existing))) =
        (merged, object.last_value_mut())
    {
        if extra.len() == 1 {
            match extra.into_iter().next().unwrap() {
                Value::Arr(inner) => existing.extend(inner),
                other => existing.push(other),
            }
        } else {
            existing.extend(extra);
        }
    }
    scanner.skip_ws();
    if scanner.peek(0) == Some(',') {
        scanner.getch();
    }
    scanner.skip_ws();
}

fn is_literal_keyword(s: &str) -> bool {
    matches!(s.to_ascii_lowercase().as_str(), "true" | "false" | "null")
}

fn stringify_key(v: &Value) -> String {
    match v {
        Value::Str(s) => s.clone(),
        Value::Int(n) => n.to_string(),
        Value::Float(f) => f.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        Value::Arr(_) | Value::Obj(_) => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_bigint::BigInt;

    fn obj(text: &str) -> Value {
        let mut s = Scanner::new(text);
        let mut ctx = ContextStack::new();
        let opts = RepairOptions::default();
        parse_object(&mut s, &mut ctx, &opts)
    }

    fn get<'a>(v: &'a Value, key: &str) -> &'a Value {
        match v {
            Value::Obj(o) => o.get(key).unwrap_or_else(|| panic!("missing key {key}")),
            other => panic!("expected Obj, got {other:?}"),
        }
    }

    #[test]
    fn plain_object() {
        let v = obj(r#""name":"John","age":30}"#);
        assert_eq!(get(&v, "name"), &Value::Str("John".to_string()));
        assert_eq!(get(&v, "age"), &Value::Int(BigInt::from(30)));
    }

    #[test]
    fn unquoted_keys_and_trailing_comma() {
        let v = obj("name: \"Alice\", age: 30,}");
        assert_eq!(get(&v, "name"), &Value::Str("Alice".to_string()));
        assert_eq!(get(&v, "age"), &Value::Int(BigInt::from(30)));
    }

    #[test]
    fn leading_stray_colon_is_skipped_as_noise() {
        // the leading `:` is swallowed as a stray separator before key
        // parsing ever sees it, so "1" becomes an ordinary (bareword) key
        let v = obj(":1, \"a\":2}");
        assert_eq!(get(&v, "a"), &Value::Int(BigInt::from(2)));
    }

    #[test]
    fn duplicate_key_splits_and_rewinds() {
        let mut s = Scanner::new("\"a\":1, \"a\":2}");
        let mut ctx = ContextStack::new();
        let opts = RepairOptions::default();
        let first = parse_object(&mut s, &mut ctx, &opts);
        assert_eq!(get(&first, "a"), &Value::Int(BigInt::from(1)));
        // the scanner rewound to right before the repeated "a" key, with
        // the rest of the text (sans opening brace, already consumed by
        // the caller in real use) still there for a second parse pass
        assert!(s.rest().starts_with("\"a\":2"));
    }

    #[test]
    fn dangling_array_merge_extends_previous_value() {
        let v = obj(r#""a":[1] [2]}"#);
        assert_eq!(
            get(&v, "a"),
            &Value::Arr(vec![Value::Int(BigInt::from(1)), Value::Int(BigInt::from(2))])
        );
    }

    #[test]
    fn inferred_true_for_bare_key() {
        let v = obj("foo, bar: 1}");
        assert_eq!(get(&v, "foo"), &Value::Bool(true));
        assert_eq!(get(&v, "bar"), &Value::Int(BigInt::from(1)));
    }

    #[test]
    fn truncated_nested_object_closes_at_eof() {
        let v = obj(r#""a": {"b": {"c": [1, 2"#);
        match get(&v, "a") {
            Value::Obj(b_obj) => match b_obj.get("b").unwrap() {
                Value::Obj(c_obj) => assert_eq!(
                    c_obj.get("c").unwrap(),
                    &Value::Arr(vec![Value::Int(BigInt::from(1)), Value::Int(BigInt::from(2))])
                ),
                other => panic!("expected nested Obj, got {other:?}"),
            },
            other => panic!("expected Obj, got {other:?}"),
        }
    }
}
