//! The dispatcher's private return channel.
//!
//! A composite parser needs to tell the difference between "I parsed a
//! legitimate empty string" and "there was nothing here for me to parse" —
//! conflating the two would make an empty string at the start of an array
//! indistinguishable from a context terminator. [`Outcome::Stop`] is that
//! distinction: a sentinel that crosses component boundaries but can never
//! be stored inside a [`Value`] tree.

use crate::value::Value;

/// What [`crate::dispatcher::parse_json`] handed back.
pub enum Outcome {
    /// A value was parsed.
    Value(Value),
    /// End of input, or a terminator belonging to an outer context, was
    /// reached without consuming it.
    Stop,
}

impl Outcome {
    pub fn is_stop(&self) -> bool {
        matches!(self, Outcome::Stop)
    }

    /// Unwraps to the parsed value, or an empty string if the dispatcher
    /// stopped without producing one.
    pub fn into_value_or_empty(self) -> Value {
        match self {
            Outcome::Value(v) => v,
            Outcome::Stop => Value::Str(String::new()),
        }
    }
}
