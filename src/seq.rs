//! Byte sequences used for program text, the input queue, and the output buffer.
//!
//! `ByteSeq` keeps a value-style API: every method that takes `&self` hands back
//! a fresh sequence and leaves the receiver untouched. The engine is the only
//! caller that appends in place (via [`ByteSeq::push`]) and it owns its buffer
//! exclusively until the run ends.

use std::borrow::Cow;
use std::fmt;

/// An ordered, contiguous sequence of bytes.
#[derive(Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ByteSeq {
    bytes: Vec<u8>,
}

impl ByteSeq {
    pub fn new() -> Self {
        Self { bytes: Vec::new() }
    }

    /// Number of bytes in the sequence.
    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Bounds-checked access; `None` past the end.
    pub fn at(&self, i: usize) -> Option<u8> {
        self.bytes.get(i).copied()
    }

    /// A new sequence holding `self` followed by `other`.
    pub fn append(&self, other: &ByteSeq) -> ByteSeq {
        let mut bytes = Vec::with_capacity(self.size() + other.size());
        bytes.extend_from_slice(&self.bytes);
        bytes.extend_from_slice(&other.bytes);
        Self { bytes }
    }

    /// A new sequence holding `other` followed by `self`.
    pub fn prepend(&self, other: &ByteSeq) -> ByteSeq {
        other.append(self)
    }

    /// Up to `len` bytes starting at `start`. Ranges running past the end are clamped.
    pub fn slice(&self, start: usize, len: usize) -> ByteSeq {
        let start = start.min(self.size());
        let end = start.saturating_add(len).min(self.size());
        Self { bytes: self.bytes[start..end].to_vec() }
    }

    /// A new sequence with `seq` inserted before index `i` (clamped to the end).
    pub fn insert(&self, i: usize, seq: &ByteSeq) -> ByteSeq {
        let i = i.min(self.size());
        let mut bytes = Vec::with_capacity(self.size() + seq.size());
        bytes.extend_from_slice(&self.bytes[..i]);
        bytes.extend_from_slice(&seq.bytes);
        bytes.extend_from_slice(&self.bytes[i..]);
        Self { bytes }
    }

    /// A new sequence with up to `len` bytes removed starting at `i`.
    pub fn erase(&self, i: usize, len: usize) -> ByteSeq {
        let start = i.min(self.size());
        let end = start.saturating_add(len).min(self.size());
        let mut bytes = Vec::with_capacity(self.size() - (end - start));
        bytes.extend_from_slice(&self.bytes[..start]);
        bytes.extend_from_slice(&self.bytes[end..]);
        Self { bytes }
    }

    /// Append a single byte in place.
    pub fn push(&mut self, b: u8) {
        self.bytes.push(b);
    }

    /// Contiguous view for printing or hashing.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Decode as UTF-8, replacing invalid sequences.
    pub fn to_string_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.bytes)
    }
}

impl fmt::Debug for ByteSeq {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ByteSeq({:?})", self.to_string_lossy())
    }
}

impl From<&str> for ByteSeq {
    fn from(s: &str) -> Self {
        Self { bytes: s.as_bytes().to_vec() }
    }
}

impl From<String> for ByteSeq {
    fn from(s: String) -> Self {
        Self { bytes: s.into_bytes() }
    }
}

impl From<&[u8]> for ByteSeq {
    fn from(b: &[u8]) -> Self {
        Self { bytes: b.to_vec() }
    }
}

impl<const N: usize> From<&[u8; N]> for ByteSeq {
    fn from(b: &[u8; N]) -> Self {
        Self { bytes: b.to_vec() }
    }
}

impl<const N: usize> From<[u8; N]> for ByteSeq {
    fn from(b: [u8; N]) -> Self {
        Self { bytes: b.to_vec() }
    }
}

impl From<Vec<u8>> for ByteSeq {
    fn from(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }
}

impl PartialEq<[u8]> for ByteSeq {
    fn eq(&self, other: &[u8]) -> bool {
        self.bytes == other
    }
}

impl PartialEq<&[u8]> for ByteSeq {
    fn eq(&self, other: &&[u8]) -> bool {
        self.bytes == *other
    }
}

impl<const N: usize> PartialEq<&[u8; N]> for ByteSeq {
    fn eq(&self, other: &&[u8; N]) -> bool {
        self.bytes == other[..]
    }
}

impl PartialEq<&str> for ByteSeq {
    fn eq(&self, other: &&str) -> bool {
        self.bytes == other.as_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_and_prepend_leave_receiver_untouched() {
        let a = ByteSeq::from("bc");
        let joined = a.append(&ByteSeq::from("d")).prepend(&ByteSeq::from("a"));
        assert_eq!(joined, "abcd");
        assert_eq!(a, "bc");
    }

    #[test]
    fn at_is_bounds_checked() {
        let s = ByteSeq::from("xy");
        assert_eq!(s.at(1), Some(b'y'));
        assert_eq!(s.at(2), None);
    }

    #[test]
    fn slice_clamps_past_end() {
        let s = ByteSeq::from("hello");
        assert_eq!(s.slice(1, 3), "ell");
        assert_eq!(s.slice(3, 100), "lo");
        assert!(s.slice(9, 1).is_empty());
    }

    #[test]
    fn insert_then_erase_restores_original() {
        let s = ByteSeq::from("held");
        let inserted = s.insert(3, &ByteSeq::from("lo worl"));
        assert_eq!(inserted, "hello world");
        assert_eq!(inserted.erase(3, 7), "held");
    }

    #[test]
    fn erase_clamps_length() {
        let s = ByteSeq::from("abc");
        assert_eq!(s.erase(1, 50), "a");
        assert_eq!(s.erase(7, 1), "abc");
    }

    #[test]
    fn lossy_decoding_replaces_invalid_utf8() {
        let s = ByteSeq::from(vec![b'o', b'k', 0xFF]);
        assert_eq!(s.to_string_lossy(), "ok\u{FFFD}");
    }
}
