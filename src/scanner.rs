//! Position-tracked cursor over the input buffer.
//!
//! The whole repair pipeline shares exactly one mutable piece of state: the
//! scanner's byte offset into the original text. Every parser in this
//! crate borrows a `&mut Scanner`, advances it by at least one code point
//! per loop iteration, and otherwise treats `pos` as the single source of
//! truth.

use regex::Regex;

/// A cursor over `input` that only ever advances, one code point at a time
/// or by an explicit [`Scanner::restore`].
pub struct Scanner<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Scanner<'a> {
    pub fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    /// The full input buffer, independent of cursor position.
    pub fn input(&self) -> &'a str {
        self.input
    }

    /// Current byte offset. Always lies on a `char` boundary.
    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn eos(&self) -> bool {
        self.pos >= self.input.len()
    }

    /// The remainder of the input from the current position.
    pub fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    /// The character `k` code points ahead of the cursor (`k == 0` is the
    /// current character), or `None` past EOF. Non-destructive.
    pub fn peek(&self, k: usize) -> Option<char> {
        self.rest().chars().nth(k)
    }

    /// Consumes and returns the current code point, advancing `pos` by its
    /// UTF-8 length.
    pub fn getch(&mut self) -> Option<char> {
        let ch = self.peek(0)?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    /// Advances past `n` code points (not bytes), clamping at EOF. Used by
    /// callers that have already inspected the characters via `peek`.
    pub fn advance_chars(&mut self, n: usize) {
        for _ in 0..n {
            if self.getch().is_none() {
                break;
            }
        }
    }

    /// Advances the cursor by `byte_len` raw bytes. Callers must only pass
    /// a length that lands on a `char` boundary (e.g. the length of a
    /// string already consumed via `peek`/slicing).
    pub fn advance_bytes(&mut self, byte_len: usize) {
        self.pos = (self.pos + byte_len).min(self.input.len());
    }

    /// Rewinds the cursor by `byte_len` raw bytes.
    pub fn rewind_bytes(&mut self, byte_len: usize) {
        self.pos = self.pos.saturating_sub(byte_len);
    }

    /// If `re` matches anchored at the current position, consumes and
    /// returns the match; otherwise leaves the cursor untouched.
    ///
    /// `re` is expected to be anchored with `^` by the caller (the literal
    /// and number parsers build their patterns that way) so a match can
    /// only ever start at `pos`.
    pub fn scan(&mut self, re: &Regex) -> Option<&'a str> {
        let m = re.find(self.rest())?;
        if m.start() != 0 {
            return None;
        }
        let matched = m.as_str();
        self.advance_bytes(matched.len());
        Some(matched)
    }

    /// If `literal` occurs at the current position (case-sensitive),
    /// consumes and returns it.
    pub fn scan_literal(&mut self, literal: &str) -> Option<&'a str> {
        if self.rest().starts_with(literal) {
            let matched = &self.rest()[..literal.len()];
            self.advance_bytes(literal.len());
            Some(matched)
        } else {
            None
        }
    }

    /// Consumes the maximal run of Unicode whitespace.
    pub fn skip_ws(&mut self) {
        while let Some(ch) = self.peek(0) {
            if ch.is_whitespace() {
                self.pos += ch.len_utf8();
            } else {
                break;
            }
        }
    }

    /// Captures the current position for later [`Scanner::restore`].
    pub fn save(&self) -> usize {
        self.pos
    }

    /// Resets the cursor to a position previously returned by
    /// [`Scanner::save`].
    pub fn restore(&mut self, pos: usize) {
        self.pos = pos;
    }
}
