//! Canonical JSON text output, used for the `return_objects = false` path
//! of [`crate::repair`].
//!
//! A straight recursive walk of the value tree: JSON has no block-vs-flow
//! style decision to make, so every composite is written the same way.

use crate::value::{Object, Value};

/// Serializes `value` as compact, strict JSON text.
pub fn to_json(value: &Value) -> String {
    let mut out = String::new();
    write_value(value, &mut out);
    out
}

fn write_value(value: &Value, out: &mut String) {
    match value {
        Value::Null => out.push_str("null"),
        Value::Bool(true) => out.push_str("true"),
        Value::Bool(false) => out.push_str("false"),
        Value::Int(n) => out.push_str(&n.to_string()),
        Value::Float(f) => write_float(*f, out),
        Value::Str(s) => write_string(s, out),
        Value::Arr(items) => write_array(items, out),
        Value::Obj(obj) => write_object(obj, out),
    }
}

fn write_float(f: f64, out: &mut String) {
    if f.is_nan() || f.is_infinite() {
        // not representable in strict JSON; null is the least surprising
        // stand-in, and keeps the serialization-soundness invariant intact
        out.push_str("null");
    } else if f == f.trunc() && f.abs() < 1e17 {
        out.push_str(&format!("{f:.1}"));
    } else {
        out.push_str(&f.to_string());
    }
}

fn write_string(s: &str, out: &mut String) {
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
}

fn write_array(items: &[Value], out: &mut String) {
    out.push('[');
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        write_value(item, out);
    }
    out.push(']');
}

fn write_object(obj: &Object, out: &mut String) {
    out.push('{');
    for (i, (key, value)) in obj.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        write_string(key, out);
        out.push(':');
        write_value(value, out);
    }
    out.push('}');
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_bigint::BigInt;

    #[test]
    fn scalars_round_trip_textually() {
        assert_eq!(to_json(&Value::Null), "null");
        assert_eq!(to_json(&Value::Bool(true)), "true");
        assert_eq!(to_json(&Value::Int(BigInt::from(42))), "42");
        assert_eq!(to_json(&Value::Float(1.5)), "1.5");
        assert_eq!(to_json(&Value::Float(2.0)), "2.0");
    }

    #[test]
    fn arbitrary_precision_integer_is_not_truncated_on_output() {
        let n: BigInt = "12345678901234567890".parse().unwrap();
        assert_eq!(to_json(&Value::Int(n)), "12345678901234567890");
    }

    #[test]
    fn string_escaping_covers_control_and_quote_characters() {
        assert_eq!(
            to_json(&Value::Str("val\\xZZ".to_string())),
            r#""val\\xZZ""#
        );
        assert_eq!(to_json(&Value::Str("a\"b".to_string())), r#""a\"b""#);
    }

    #[test]
    fn object_preserves_insertion_order() {
        let mut obj = Object::new();
        obj.insert("name".to_string(), Value::Str("John".to_string()));
        obj.insert("age".to_string(), Value::Int(BigInt::from(30)));
        assert_eq!(to_json(&Value::Obj(obj)), r#"{"name":"John","age":30}"#);
    }

    #[test]
    fn nested_array_and_object() {
        let v = Value::Arr(vec![
            Value::Int(BigInt::from(1)),
            Value::Arr(vec![Value::Int(BigInt::from(2)), Value::Int(BigInt::from(3))]),
        ]);
        assert_eq!(to_json(&v), "[1,[2,3]]");
    }
}
