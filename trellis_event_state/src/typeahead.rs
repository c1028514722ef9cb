// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Typeahead buffer for list-like widgets.
//!
//! Printable keys accumulate into a lowercase buffer until the user pauses for
//! longer than [`TypeAhead::timeout`] milliseconds. Typing the same character
//! repeatedly (`"bbb"`) is reported as a single-character search so callers can
//! cycle through items sharing that initial.

use alloc::string::String;

/// What to search for after a keystroke.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TypeAheadQuery<'a> {
    /// Lowercase prefix to match against item labels.
    pub prefix: &'a str,
    /// When true the search should start *after* the current item (a new
    /// single-character search, or the same character repeated). When false the
    /// current item is still a candidate (the user is refining a longer prefix).
    pub advance: bool,
}

impl TypeAheadQuery<'_> {
    /// Returns true if `label`, ignoring leading whitespace and case, starts
    /// with the prefix.
    pub fn matches(&self, label: &str) -> bool {
        let mut folded = label.trim_start().chars().flat_map(char::to_lowercase);
        self.prefix.chars().all(|p| folded.next() == Some(p))
    }

    /// Search `len` candidates circularly, starting at `current` (or just after
    /// it when [`advance`](Self::advance) is set), and return the first index
    /// whose label matches.
    ///
    /// `label` returns `None` for candidates that cannot be chosen (disabled or
    /// unlabeled).
    pub fn find<'l>(
        &self,
        len: usize,
        current: Option<usize>,
        mut label: impl FnMut(usize) -> Option<&'l str>,
    ) -> Option<usize> {
        let start = match current {
            Some(c) if self.advance => c + 1,
            Some(c) => c,
            None => 0,
        };
        (0..len)
            .map(|offset| (start + offset) % len)
            .find(|&i| label(i).is_some_and(|l| self.matches(l)))
    }
}

/// Accumulated typeahead input.
#[derive(Clone, Debug)]
pub struct TypeAhead {
    /// Pause, in milliseconds, after which the buffer starts over.
    pub timeout: u64,
    buffer: String,
    last_input: Option<u64>,
}

impl Default for TypeAhead {
    fn default() -> Self {
        Self::new(500)
    }
}

impl TypeAhead {
    /// Create an empty buffer with the given timeout.
    pub fn new(timeout: u64) -> Self {
        Self {
            timeout,
            buffer: String::new(),
            last_input: None,
        }
    }

    /// Record a keystroke at `now` and return the search to run.
    pub fn push(&mut self, ch: char, now: u64) -> TypeAheadQuery<'_> {
        if !self.is_active(now) {
            self.buffer.clear();
        }
        self.buffer.extend(ch.to_lowercase());
        self.last_input = Some(now);

        let mut chars = self.buffer.chars();
        let first = chars.next();
        let repeated = first.is_some_and(|f| chars.all(|c| c == f));
        if repeated {
            let end = first.map_or(0, char::len_utf8);
            TypeAheadQuery {
                prefix: &self.buffer[..end],
                advance: true,
            }
        } else {
            TypeAheadQuery {
                prefix: &self.buffer,
                advance: false,
            }
        }
    }

    /// Returns true if input at `now` would extend the current buffer.
    pub fn is_active(&self, now: u64) -> bool {
        self.last_input
            .is_some_and(|t| now.saturating_sub(t) <= self.timeout)
    }

    /// Current buffer contents.
    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    /// Forget the buffer.
    pub fn clear(&mut self) {
        self.buffer.clear();
        self.last_input = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accumulates_within_timeout() {
        let mut t = TypeAhead::new(500);
        assert_eq!(t.push('B', 0).prefix, "b");
        let q = t.push('a', 100);
        assert_eq!(q.prefix, "ba");
        assert!(!q.advance);
    }

    #[test]
    fn resets_after_pause() {
        let mut t = TypeAhead::new(500);
        t.push('b', 0);
        let q = t.push('c', 501);
        assert_eq!(q.prefix, "c");
        assert!(q.advance);
        assert_eq!(t.buffer(), "c");
    }

    #[test]
    fn repeated_character_cycles() {
        let mut t = TypeAhead::new(500);
        t.push('b', 0);
        let q = t.push('b', 10);
        assert_eq!(q.prefix, "b");
        assert!(q.advance);
    }

    #[test]
    fn find_wraps_and_skips_unavailable() {
        let labels = ["Banana", "  blueberry", "Cherry", "Blackberry"];
        let mut t = TypeAhead::new(500);
        let q = t.push('b', 0);
        assert_eq!(q.find(4, Some(1), |i| Some(labels[i])), Some(3), "advances past current");
        assert_eq!(q.find(4, Some(3), |i| Some(labels[i])), Some(0), "wraps to the start");
        let skip_first = |i: usize| (i != 0).then_some(labels[i]);
        assert_eq!(q.find(4, None, skip_first), Some(1), "leading whitespace ignored");

        let q = t.push('l', 10);
        assert_eq!(q.find(4, Some(1), |i| Some(labels[i])), Some(1), "refining keeps current");
        assert_eq!(q.find(0, None, |i| Some(labels[i])), None);
        let mut t = TypeAhead::new(500);
        assert_eq!(t.push('z', 0).find(4, None, |i| Some(labels[i])), None);
    }
}
