//! Context windows around matches

use serde::{Deserialize, Serialize};

/// Default number of bytes shown on each side of a match
pub const DEFAULT_CONTEXT: usize = 250;

/// Text surrounding one match
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snippet {
    /// Byte offset of the match in the corpus
    pub offset: usize,
    /// Byte offset in the corpus where `text` begins
    pub start: usize,
    pub text: String,
}

impl Snippet {
    /// Cut the window `[offset - context, offset + context)` out of `text`
    ///
    /// The window is clamped to the text and widened outward to the nearest
    /// UTF-8 character boundaries, so matches near either end of the corpus
    /// get a shorter window instead of a fault. Invalid UTF-8 is replaced.
    pub fn extract(text: &[u8], offset: usize, context: usize) -> Self {
        let mut begin = offset.saturating_sub(context).min(text.len());
        let mut end = offset.saturating_add(context).min(text.len());

        while begin > 0 && begin < text.len() && is_continuation(text[begin]) {
            begin -= 1;
        }
        while end < text.len() && is_continuation(text[end]) {
            end += 1;
        }

        Self {
            offset,
            start: begin,
            text: String::from_utf8_lossy(&text[begin..end]).into_owned(),
        }
    }

    /// Byte range of the match within `text`, given the query length
    pub fn match_range(&self, query_len: usize) -> std::ops::Range<usize> {
        let from = (self.offset - self.start).min(self.text.len());
        let to = (from + query_len).min(self.text.len());
        from..to
    }
}

#[inline]
fn is_continuation(byte: u8) -> bool {
    byte & 0xC0 == 0x80
}
