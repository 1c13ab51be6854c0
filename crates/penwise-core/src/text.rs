//! Character-offset arithmetic over UTF-8 text.
//!
//! Suggestions address text by character offsets (Unicode scalar values),
//! while string slicing and regex matches work in byte offsets. Everything
//! that crosses that boundary goes through this module.
//!
//! # Conventions
//!
//! - Char ranges are half-open: `start..end`.
//! - A char offset equal to the character count addresses the end of text.
//! - Functions return `None` rather than panicking on out-of-range offsets.

use std::ops::Range;

/// Number of characters in `text`.
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Byte offset of the character at `char_idx`.
///
/// `char_idx == char_len(text)` maps to `text.len()`.
pub fn byte_offset(text: &str, char_idx: usize) -> Option<usize> {
    text.char_indices()
        .map(|(b, _)| b)
        .chain(std::iter::once(text.len()))
        .nth(char_idx)
}

/// Slice `text` by a half-open char range.
pub fn char_slice(text: &str, start: usize, end: usize) -> Option<&str> {
    if start > end {
        return None;
    }
    let b_start = byte_offset(text, start)?;
    let b_end = b_start + byte_offset(&text[b_start..], end - start)?;
    Some(&text[b_start..b_end])
}

/// Convert a half-open char range into a byte range.
pub fn byte_range(text: &str, start: usize, end: usize) -> Option<Range<usize>> {
    if start > end {
        return None;
    }
    let b_start = byte_offset(text, start)?;
    let b_end = b_start + byte_offset(&text[b_start..], end - start)?;
    Some(b_start..b_end)
}

/// Replace the bytes in `range` with `replacement`.
///
/// The caller guarantees `range` lies on char boundaries.
pub fn splice(text: &str, range: Range<usize>, replacement: &str) -> String {
    let mut out = String::with_capacity(text.len() - range.len() + replacement.len());
    out.push_str(&text[..range.start]);
    out.push_str(replacement);
    out.push_str(&text[range.end..]);
    out
}

/// True when `text` has no non-whitespace characters.
pub fn is_blank(text: &str) -> bool {
    text.trim().is_empty()
}

/// Precomputed byte → char mapping for converting many matches over one text.
///
/// Built once per check so each match conversion is a binary search instead
/// of a linear scan.
#[derive(Debug, Clone)]
pub struct OffsetMap {
    /// Byte offset of every char, followed by `text.len()`.
    boundaries: Vec<usize>,
}

impl OffsetMap {
    pub fn new(text: &str) -> Self {
        let mut boundaries: Vec<usize> = text.char_indices().map(|(b, _)| b).collect();
        boundaries.push(text.len());
        Self { boundaries }
    }

    /// Number of characters in the mapped text.
    pub fn char_count(&self) -> usize {
        self.boundaries.len() - 1
    }

    /// Char index for a byte offset on a char boundary.
    ///
    /// Offsets inside a multi-byte char round up to the next char.
    pub fn to_char(&self, byte: usize) -> usize {
        match self.boundaries.binary_search(&byte) {
            Ok(i) | Err(i) => i,
        }
    }

    /// Byte offset for a char index.
    pub fn to_byte(&self, char_idx: usize) -> Option<usize> {
        self.boundaries.get(char_idx).copied()
    }

    /// Convert a byte range into a char range.
    pub fn char_range(&self, bytes: Range<usize>) -> Range<usize> {
        self.to_char(bytes.start)..self.to_char(bytes.end)
    }
}
