//! The growable byte buffer every block and inline callback writes into.
//!
//! Mirrors `struct buf` from the C renderer this crate replaces: append-only
//! plus a full, non-deallocating [`Buffer::reset`]. Growth is delegated to
//! `Vec<u8>`'s own amortized-doubling discipline, so there is no separate
//! `growth-unit`/`reserved-capacity` bookkeeping to get wrong; the only thing
//! this type adds over a bare `Vec<u8>` is the reset-without-dealloc op and a
//! [`std::fmt::Write`] impl so callbacks can `write!` into it directly.

use std::fmt;

/// Append-only byte buffer with pooled reuse (see [`crate::parser::pool`]).
#[derive(Debug, Default)]
pub struct Buffer(Vec<u8>);

impl Buffer {
    pub fn new() -> Self {
        Buffer(Vec::new())
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Buffer(Vec::with_capacity(capacity))
    }

    pub fn push_bytes(&mut self, bytes: &[u8]) {
        self.0.extend_from_slice(bytes);
    }

    pub fn push_str(&mut self, s: &str) {
        self.0.extend_from_slice(s.as_bytes());
    }

    pub fn push_byte(&mut self, byte: u8) {
        self.0.push(byte);
    }

    /// Reset size to zero without releasing the underlying allocation, so a
    /// pooled buffer can be reacquired without a fresh allocation.
    pub fn reset(&mut self) {
        self.0.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn capacity(&self) -> usize {
        self.0.capacity()
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.0
    }

    /// Consume the buffer as a `String`. Input is UTF-8-expected-but-not-
    /// validated; invalid sequences are replaced rather than surfaced as an
    /// error, since a rendered fragment must still be usable text.
    pub fn into_string_lossy(self) -> String {
        String::from_utf8_lossy(&self.0).into_owned()
    }
}

/// Enables `write!(buffer, "...")`. Unlike a two-pass `sprintf`-style
/// formatter, no sizing prepass is needed: `Vec<u8>` already grows on
/// demand.
impl fmt::Write for Buffer {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.0.extend_from_slice(s.as_bytes());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fmt::Write as _;

    #[test]
    fn append_and_reset_preserves_capacity() {
        let mut buf = Buffer::with_capacity(64);
        buf.push_str("hello");
        assert_eq!(buf.as_bytes(), b"hello");
        let cap = buf.capacity();
        buf.reset();
        assert!(buf.is_empty());
        assert_eq!(buf.capacity(), cap);
    }

    #[test]
    fn put_formatted() {
        let mut buf = Buffer::new();
        write!(buf, "<h{}>", 3).unwrap();
        assert_eq!(buf.as_bytes(), b"<h3>");
    }
}
