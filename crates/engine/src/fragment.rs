//! The fragment store: raw template bytes plus cursor access.
//!
//! A fragment is scanned byte by byte exactly once per parse. All reads go
//! through [`Fragment::get`], which turns past-the-end positions into a
//! `None` sentinel so the scanner never needs a bounds check of its own.

use std::borrow::Cow;
use tailor_traits::SharedResourceData;

pub(crate) struct Fragment {
    bytes: SharedResourceData,
}

impl Fragment {
    pub(crate) fn new(bytes: SharedResourceData) -> Self {
        Self { bytes }
    }

    pub(crate) fn from_text(text: &str) -> Self {
        Self {
            bytes: SharedResourceData::new(text.as_bytes().to_vec()),
        }
    }

    /// Sentinel read: `None` once the cursor has passed the last byte.
    pub(crate) fn get(&self, pos: usize) -> Option<u8> {
        self.bytes.get(pos).copied()
    }

    pub(crate) fn len(&self) -> usize {
        self.bytes.len()
    }

    /// The raw fragment text (lossy outside UTF-8).
    pub(crate) fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.bytes)
    }

    /// Extracts a tag name starting just after `%{`.
    ///
    /// Collects bytes up to the closing `}`, replacing control bytes
    /// (value <= 31) with `_`. Returns the name and the cursor position
    /// just past the `}`, or `None` if the fragment ends before a `}` is
    /// seen (the unterminated-tag hard stop).
    pub(crate) fn scan_name(&self, mut pos: usize) -> Option<(String, usize)> {
        let mut raw = Vec::new();
        while let Some(c) = self.get(pos) {
            pos += 1;
            if c == b'}' {
                return Some((String::from_utf8_lossy(&raw).into_owned(), pos));
            }
            raw.push(if c <= 31 { b'_' } else { c });
        }
        None
    }
}
