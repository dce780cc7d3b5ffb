//! Character-index helpers for text widgets.
//!
//! Editor positions are counted in `char`s while egui and `str` slicing work
//! in bytes. These helpers convert between the two without ever slicing on a
//! non-UTF-8 boundary.

use std::ops::Range;

/// Number of characters in `s`.
pub fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Byte offset of character `char_idx`, clamped to the end of the string.
pub fn char_to_byte(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(byte, _)| byte)
        .unwrap_or(s.len())
}

/// Byte range for a character range, clamped to the string.
pub fn char_range_to_bytes(s: &str, range: Range<usize>) -> Range<usize> {
    let start = char_to_byte(s, range.start);
    let end = char_to_byte(s, range.end.max(range.start));
    start..end
}

/// Slice by character range. Out-of-range indices are clamped.
pub fn slice_chars(s: &str, range: Range<usize>) -> &str {
    let bytes = char_range_to_bytes(s, range);
    &s[bytes]
}

/// A single contiguous change between two versions of a text, in characters:
/// `removed` characters at `start` were replaced by `inserted` characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextChange {
    pub start: usize,
    pub removed: usize,
    pub inserted: usize,
}

impl TextChange {
    pub fn insertion(start: usize, inserted: usize) -> Self {
        Self { start, removed: 0, inserted }
    }

    pub fn deletion(range: Range<usize>) -> Self {
        Self {
            start: range.start,
            removed: range.end.saturating_sub(range.start),
            inserted: 0,
        }
    }

    /// Smallest single change turning `old` into `new`: the common prefix
    /// and suffix are kept, everything between is a replacement.
    /// Returns `None` when the texts are equal.
    pub fn between(old: &str, new: &str) -> Option<Self> {
        Self::between_at(old, new, usize::MAX)
    }

    /// Like [`TextChange::between`], but the change never starts after
    /// `anchor`. With runs of equal characters several changes explain the
    /// same pair of texts; the anchor picks the one at the caret.
    pub fn between_at(old: &str, new: &str, anchor: usize) -> Option<Self> {
        if old == new {
            return None;
        }
        let old_chars: Vec<char> = old.chars().collect();
        let new_chars: Vec<char> = new.chars().collect();

        let prefix = old_chars
            .iter()
            .zip(new_chars.iter())
            .take(anchor)
            .take_while(|(a, b)| a == b)
            .count();

        let max_suffix = old_chars.len().min(new_chars.len()) - prefix;
        let suffix = old_chars
            .iter()
            .rev()
            .zip(new_chars.iter().rev())
            .take(max_suffix)
            .take_while(|(a, b)| a == b)
            .count();

        Some(Self {
            start: prefix,
            removed: old_chars.len() - prefix - suffix,
            inserted: new_chars.len() - prefix - suffix,
        })
    }
}
