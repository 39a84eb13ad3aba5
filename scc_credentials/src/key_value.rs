//! Line-oriented `key<sep>value` parsing.
//!
//! Each line is split once, on the first occurrence of the separator, and both
//! halves are trimmed of surrounding whitespace. Lines that are blank, carry
//! no separator or have an empty key are skipped without error. Keys that a
//! target does not recognise are reported through [`warn_unknown_key`] and
//! discarded; they never fail a read.

use std::io::{self, BufRead};

use crate::ParseableTarget;

/// A transient `(key, value)` pair borrowed from a raw line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedLine<'a> {
    /// Trimmed text before the first separator.
    pub key: &'a str,
    /// Trimmed text after the first separator.
    pub value: &'a str,
}

/// Splits raw lines on a single ASCII separator and feeds them to a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyValueStore {
    separator: u8,
}

impl KeyValueStore {
    /// Creates a store splitting on `separator`, which must be ASCII.
    ///
    /// Lines are split on `char::from(separator)`, which maps bytes above
    /// `0x7f` to unrelated Latin-1 characters.
    ///
    /// # Panics
    ///
    /// Debug builds panic when `separator` is not ASCII.
    #[must_use]
    pub const fn new(separator: u8) -> Self {
        debug_assert!(separator.is_ascii(), "key/value separator must be ASCII");
        Self { separator }
    }

    /// Creates a store using the separator declared by `target`.
    #[must_use]
    pub fn for_target<T: ParseableTarget + ?Sized>(target: &T) -> Self {
        Self::new(target.separator())
    }

    /// Separator byte used to split lines.
    #[must_use]
    pub const fn separator(&self) -> u8 {
        self.separator
    }

    /// Splits `line` into a [`ParsedLine`].
    ///
    /// Returns `None` for blank lines, lines without the separator and lines
    /// whose key is empty after trimming.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use scc_credentials::{KeyValueStore, ParsedLine};
    ///
    /// let store = KeyValueStore::new(b':');
    /// assert_eq!(
    ///     store.parse_line("url: https://scc.suse.com"),
    ///     Some(ParsedLine { key: "url", value: "https://scc.suse.com" })
    /// );
    /// assert_eq!(store.parse_line("---"), None);
    /// ```
    #[must_use]
    pub fn parse_line<'a>(&self, line: &'a str) -> Option<ParsedLine<'a>> {
        let (raw_key, raw_value) = line.split_once(char::from(self.separator))?;
        let key = raw_key.trim();
        if key.is_empty() {
            return None;
        }
        Some(ParsedLine {
            key,
            value: raw_value.trim(),
        })
    }

    /// Parses `line` and hands the resulting pair to `target`.
    ///
    /// Returns whether a pair was produced.
    pub fn apply_line<T: ParseableTarget + ?Sized>(&self, line: &str, target: &mut T) -> bool {
        match self.parse_line(line) {
            Some(ParsedLine { key, value }) => {
                target.set_value(key, value);
                true
            }
            None => {
                if !line.trim().is_empty() {
                    tracing::debug!(line, "skipping line without a key/value pair");
                }
                false
            }
        }
    }

    /// Streams every line of `reader` into `target`.
    ///
    /// Returns the number of pairs applied.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error when a line cannot be read, including
    /// when the content is not valid UTF-8.
    pub fn load<R, T>(&self, reader: R, target: &mut T) -> io::Result<usize>
    where
        R: BufRead,
        T: ParseableTarget + ?Sized,
    {
        let mut applied = 0;
        for line in reader.lines() {
            if self.apply_line(&line?, target) {
                applied += 1;
            }
        }
        Ok(applied)
    }
}

/// Reports a key the target does not recognise.
///
/// Unknown keys are a non-fatal anomaly: the warning is emitted and the pair
/// is dropped.
pub fn warn_unknown_key(key: &str) {
    tracing::warn!("Warning: Unknown key '{key}'");
}
