//! The top-level driver: turns a stream of dispatcher calls into the final
//! repaired value, handling concatenated documents the dispatcher alone
//! doesn't know how to collapse.
//!
//! LLM output regularly glues multiple JSON-ish documents back to back
//! (`{"a":1}{"b":2}`) or interleaves them with stray closer characters left
//! over from a truncated wrapper. This is the only place that sees the
//! whole token stream at once, so it's the only place that can decide
//! whether two consecutive values are "the same document, repeated" (and
//! should collapse) or "genuinely separate documents" (and should become
//! array elements).

use tracing::{debug, trace};

use crate::array::looks_like_implicit_object_key;
use crate::context::ContextStack;
use crate::dispatcher::parse_json;
use crate::object;
use crate::options::RepairOptions;
use crate::outcome::Outcome;
use crate::scanner::Scanner;
use crate::string::is_quote_char;
use crate::value::Value;

/// Repairs the full input into a single [`Value`], applying the
/// concatenated-document and same-type-collapse rules.
pub fn parse_document(scanner: &mut Scanner, opts: &RepairOptions) -> Value {
    let mut ctx = ContextStack::new();

    let (first, _) = match parse_next(scanner, &mut ctx, opts) {
        (Outcome::Stop, _) => return Value::Str(String::new()),
        (Outcome::Value(v), from_split) => (v, from_split),
    };

    if scanner.eos() {
        return first;
    }

    let mut docs = vec![first];

    loop {
        match parse_next(scanner, &mut ctx, opts) {
            (Outcome::Stop, _) => break,
            (Outcome::Value(v), from_split) => {
                if is_closer_garbage(&v) {
                    continue;
                }
                if let Value::Str(s) = &v {
                    if s.is_empty() {
                        if scanner.eos() {
                            break;
                        }
                        scanner.getch();
                        continue;
                    }
                }

                // A value recovered from a duplicate-key split's braceless
                // continuation is a sibling of the object it split from,
                // not a repeat of "the same document" — same-type collapse
                // doesn't apply to it even though both are objects.
                let collapse = !from_split
                    && match (docs.last(), &v) {
                        (Some(Value::Arr(_)), Value::Arr(_)) => true,
                        (Some(Value::Obj(_)), Value::Obj(_)) => true,
                        _ => false,
                    };
                if collapse {
                    trace!("same-type collapse: dropping the previous document");
                    docs.pop();
                }
                docs.push(v);
            }
        }
    }

    if docs.len() == 1 {
        docs.into_iter().next().unwrap()
    } else {
        debug!(count = docs.len(), "concatenated-document recovery produced a list");
        Value::Arr(docs)
    }
}

/// Like the dispatcher, but first checks whether the cursor sits on a bare
/// `"key": value` pair with no enclosing `{}` — the same check the array
/// parser uses to recognize an implicit object among its elements. This is
/// what lets a duplicate-key split (which rewinds to just before the
/// repeated key and stops, without ever writing a `{`) produce a proper
/// sibling object here instead of falling through to the dispatcher's
/// generic bare-token handling.
///
/// The returned `bool` is `true` when the value came from that braceless
/// continuation rather than the ordinary dispatcher, so the caller can
/// tell a split's sibling apart from an independently bracketed document.
fn parse_next(scanner: &mut Scanner, ctx: &mut ContextStack, opts: &RepairOptions) -> (Outcome, bool) {
    scanner.skip_ws();
    match scanner.peek(0) {
        Some(c) if is_quote_char(c) && looks_like_implicit_object_key(scanner, c) => {
            (Outcome::Value(object::parse_object(scanner, ctx, opts)), true)
        }
        _ => (parse_json(scanner, ctx, opts), false),
    }
}

/// A string made up entirely of stray `}`/`]` characters: leftover closer
/// noise from a wrapper the dispatcher already unwound, not content.
fn is_closer_garbage(v: &Value) -> bool {
    match v {
        Value::Str(s) => !s.is_empty() && s.chars().all(|c| c == '}' || c == ']'),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(text: &str) -> Value {
        let mut s = Scanner::new(text);
        let opts = RepairOptions::default();
        parse_document(&mut s, &opts)
    }

    #[test]
    fn single_object_passes_through() {
        let v = run(r#"{"name":"John","age":30}"#);
        match v {
            Value::Obj(o) => {
                assert_eq!(o.get("name"), Some(&Value::Str("John".to_string())));
            }
            other => panic!("expected Obj, got {other:?}"),
        }
    }

    #[test]
    fn same_type_collapse_keeps_only_the_last_object() {
        let v = run(r#"{"a":1}{"b":2}"#);
        match v {
            Value::Obj(o) => {
                assert!(!o.contains_key("a"));
                assert!(o.contains_key("b"));
            }
            other => panic!("expected Obj, got {other:?}"),
        }
    }

    #[test]
    fn duplicate_key_at_top_level_splits_into_sibling_objects() {
        let v = run(r#"{"a":1,"a":2}"#);
        match v {
            Value::Arr(items) => {
                assert_eq!(items.len(), 2);
                match (&items[0], &items[1]) {
                    (Value::Obj(first), Value::Obj(second)) => {
                        assert_eq!(first.get("a"), Some(&Value::Int(1.into())));
                        assert_eq!(second.get("a"), Some(&Value::Int(2.into())));
                    }
                    other => panic!("expected two Objs, got {other:?}"),
                }
            }
            other => panic!("expected Arr of sibling objects, got {other:?}"),
        }
    }

    #[test]
    fn mixed_type_concatenation_becomes_a_list() {
        let v = run(r#"{"a":1}[1,2]{"b":2}"#);
        match v {
            Value::Arr(items) => assert_eq!(items.len(), 3),
            other => panic!("expected Arr, got {other:?}"),
        }
    }

    #[test]
    fn empty_input_yields_empty_string() {
        assert_eq!(run(""), Value::Str(String::new()));
        assert_eq!(run("   "), Value::Str(String::new()));
    }
}
