//! Internal error taxonomy for conversions that are locally fallible.
//!
//! Nothing in this module crosses the public `repair` boundary: every call
//! site that can produce a [`ConversionError`] immediately degrades to the
//! documented fallback (an escape is kept literally, a number becomes a
//! string) and never propagates the error further. It exists so those
//! fallbacks are modeled as real, typed outcomes instead of silent
//! special-casing.

use thiserror::Error;

/// A conversion that failed while repairing a single token.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConversionError {
    #[error("invalid \\u escape: {digits:?}")]
    InvalidUnicodeEscape { digits: String },

    #[error("invalid \\x escape: {digits:?}")]
    InvalidByteEscape { digits: String },

    #[error("{text:?} is not a valid integer")]
    NotAnInteger { text: String },

    #[error("{text:?} is not a valid float")]
    NotAFloat { text: String },
}
