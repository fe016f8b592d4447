//! A lenient parser that repairs malformed JSON-like text into a
//! well-formed value tree.
//!
//! The pipeline is a single-pass recursive descent over a shared scanner
//! position:
//!
//! ```text
//! Scanner (cursor) -> Dispatcher (parse_json) -> Array / Object / String / Number / Literal
//! ```
//!
//! The dispatcher never throws: every input, however broken, converges on
//! some [`Value`] tree. [`repair`] is the entry point most callers want;
//! [`repair_with_options`] exposes the nesting-depth guard and log
//! verbosity knob.

pub mod array;
pub mod comment;
pub mod context;
pub mod dispatcher;
pub mod driver;
pub mod error;
pub mod literal;
pub mod lookahead;
pub mod number;
pub mod object;
pub mod options;
pub mod outcome;
pub mod scanner;
pub mod serializer;
pub mod string;
pub mod value;

pub use error::ConversionError;
pub use options::RepairOptions;
pub use value::{Object, Value};

use scanner::Scanner;

/// Repairs `input` into a [`Value`] tree (`return_objects = true`) or into
/// canonical JSON text (`return_objects = false`), using
/// [`RepairOptions::default`].
///
/// Never fails: the worst outcome is an empty value or an empty string.
pub fn repair(input: &str, return_objects: bool) -> RepairResult {
    repair_with_options(input, return_objects, &RepairOptions::default())
}

/// As [`repair`], but with explicit [`RepairOptions`].
pub fn repair_with_options(
    input: &str,
    return_objects: bool,
    opts: &RepairOptions,
) -> RepairResult {
    if !opts.quiet {
        tracing::debug!(input_len = input.len(), return_objects, "repairing input");
    }

    let mut scanner = Scanner::new(input);
    let value = driver::parse_document(&mut scanner, opts);

    if return_objects {
        RepairResult::Value(value)
    } else {
        RepairResult::Text(serializer::to_json(&value))
    }
}

/// The result of a repair call: either the value tree itself, or its
/// canonical JSON serialization, depending on the `return_objects` flag
/// passed to [`repair`]/[`repair_with_options`].
#[derive(Debug, Clone, PartialEq)]
pub enum RepairResult {
    Value(Value),
    Text(String),
}

impl RepairResult {
    pub fn into_value(self) -> Option<Value> {
        match self {
            RepairResult::Value(v) => Some(v),
            RepairResult::Text(_) => None,
        }
    }

    pub fn into_text(self) -> Option<String> {
        match self {
            RepairResult::Text(s) => Some(s),
            RepairResult::Value(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_bigint::BigInt;

    #[test]
    fn well_formed_json_is_idempotent() {
        let input = r#"{"name":"John","age":30}"#;
        match repair(input, true) {
            RepairResult::Value(Value::Obj(o)) => {
                assert_eq!(o.get("name"), Some(&Value::Str("John".to_string())));
                assert_eq!(o.get("age"), Some(&Value::Int(BigInt::from(30))));
            }
            other => panic!("expected Obj, got {other:?}"),
        }
    }

    #[test]
    fn missing_quotes_and_trailing_comma_are_repaired() {
        let out = repair(r#"{name: "Alice", age: 30,}"#, false)
            .into_text()
            .unwrap();
        assert_eq!(out, r#"{"name":"Alice","age":30}"#);
    }

    #[test]
    fn comment_and_case_insensitive_literal() {
        let out = repair(r#"/* garbage */ {"k": TRUE}"#, false)
            .into_text()
            .unwrap();
        assert_eq!(out, r#"{"k":true}"#);
    }

    #[test]
    fn truncated_input_closes_brackets() {
        let out = repair(r#"{"a": {"b": {"c": [1, 2"#, false)
            .into_text()
            .unwrap();
        assert_eq!(out, r#"{"a":{"b":{"c":[1,2]}}}"#);
    }

    #[test]
    fn return_objects_false_yields_strict_json() {
        let out = repair(r#"{name: "Alice", age: 30,}"#, false)
            .into_text()
            .unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed["name"], "Alice");
        assert_eq!(parsed["age"], 30);
    }
}
