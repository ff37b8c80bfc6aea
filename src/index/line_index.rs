//! Line start table
//!
//! Maps 0-based line numbers to the byte offset of their first byte. Only
//! `\n` splits lines; a `\r` before it stays part of the line's content, so
//! CRLF and LF text agree on where each line begins. A newline that is the
//! last byte of the text does not open a new, empty line.
//!
//! The scan is over bytes. A `\n` byte never appears inside a multi-byte
//! UTF-8 sequence, so the offsets are the same ones a scalar-by-scalar walk
//! would record, and they are valid slice positions into the text.

use memchr::memchr_iter;

/// Ordered byte offsets of every line start in a text
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineIndex {
    /// Strictly increasing; first entry is 0 for non-empty text
    starts: Vec<usize>,
}

impl LineIndex {
    /// Build the table with a single pass over `text`
    ///
    /// Empty text has no lines and yields an empty table.
    pub fn build(text: &[u8]) -> Self {
        if text.is_empty() {
            return Self::default();
        }

        // Rough guess at line length to avoid repeated growth on large corpora
        let mut starts = Vec::with_capacity((text.len() / 32).max(1000));
        starts.push(0);

        let last = text.len() - 1;
        starts.extend(memchr_iter(b'\n', text).filter(|&nl| nl != last).map(|nl| nl + 1));

        Self { starts }
    }

    /// Number of lines in the text
    #[inline]
    pub fn line_count(&self) -> usize {
        self.starts.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.starts.is_empty()
    }

    /// Byte offset where `line` (0-based) begins
    #[inline]
    pub fn line_start(&self, line: usize) -> Option<usize> {
        self.starts.get(line).copied()
    }

    #[inline]
    pub fn as_slice(&self) -> &[usize] {
        &self.starts
    }

    /// Line (0-based) containing byte `offset`
    ///
    /// Returns `None` only for an empty table.
    pub fn line_of(&self, offset: usize) -> Option<usize> {
        match self.starts.binary_search(&offset) {
            Ok(line) => Some(line),
            Err(0) => None,
            Err(insert_pos) => Some(insert_pos - 1),
        }
    }
}

impl From<Vec<usize>> for LineIndex {
    fn from(starts: Vec<usize>) -> Self {
        debug_assert!(starts.windows(2).all(|w| w[0] < w[1]));
        Self { starts }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DARKNESS: &str = "Hello darkness, my old friend
I've come to talk with you again
Because a vision softly creeping
Left its seeds while I was sleeping
And the vision that was planted in my brain
Still remains
Within the sound of silence";

    fn starts(text: &str) -> Vec<usize> {
        LineIndex::build(text.as_bytes()).as_slice().to_vec()
    }

    #[test]
    fn test_one_line() {
        assert_eq!(starts("Hello World :D"), vec![0]);
    }

    #[test]
    fn test_empty_text() {
        let index = LineIndex::build(b"");
        assert!(index.is_empty());
        assert_eq!(index.line_count(), 0);
        assert_eq!(index.line_of(0), None);
    }

    #[test]
    fn test_two_lines() {
        assert_eq!(starts("Hello\nWorld :D"), vec![0, 6]);
    }

    #[test]
    fn test_trailing_newline_adds_no_line() {
        assert_eq!(starts("Hello\nWorld :D\n"), vec![0, 6]);
    }

    #[test]
    fn test_crlf() {
        assert_eq!(starts("Hello World\r\n:D"), vec![0, 13]);
        assert_eq!(starts("Hello World\r\nFOO\r\n"), vec![0, 13]);
    }

    #[test]
    fn test_darkness() {
        assert_eq!(starts(DARKNESS), vec![0, 30, 63, 96, 132, 176, 190]);
    }

    #[test]
    fn test_count_matches_newlines_plus_one() {
        let text = "a\nbb\n\nccc\nd";
        let newlines = text.matches('\n').count();
        assert_eq!(LineIndex::build(text.as_bytes()).line_count(), newlines + 1);
    }

    #[test]
    fn test_only_newline() {
        // A lone newline is a single empty line, not two
        assert_eq!(starts("\n"), vec![0]);
        assert_eq!(starts("\n\n"), vec![0, 1]);
    }

    #[test]
    fn test_multibyte_offsets_are_bytes() {
        // "é" is two bytes
        let text = "café\nnaïve\nok";
        let index = starts(text);
        assert_eq!(index, vec![0, 6, 13]);
        assert_eq!(&text[index[1]..index[2]], "naïve\n");
    }

    #[test]
    fn test_line_of() {
        let index = LineIndex::build(DARKNESS.as_bytes());
        assert_eq!(index.line_of(0), Some(0));
        assert_eq!(index.line_of(29), Some(0));
        assert_eq!(index.line_of(30), Some(1));
        assert_eq!(index.line_of(95), Some(2));
        assert_eq!(index.line_of(10_000), Some(6));
    }
}
