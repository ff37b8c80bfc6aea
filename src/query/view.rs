//! Bounded views over a shared corpus
//!
//! A [`View`] pairs the shared corpus with one byte-offset [`Bound`]. Views
//! are cheap to clone and never mutate anything, so any number of threads
//! can search the same view at once.

use crate::error::RangeError;
use crate::index::{Bound, Corpus};
use crate::query::snippet::{DEFAULT_CONTEXT, Snippet};
use std::sync::Arc;

/// Search handle restricted to one part of the corpus
#[derive(Clone)]
pub struct View {
    corpus: Arc<Corpus>,
    bound: Bound,
    context: usize,
}

impl View {
    /// View over the entire corpus
    pub fn unrestricted(corpus: Arc<Corpus>) -> Self {
        let bound = Bound::full(corpus.len());
        Self {
            corpus,
            bound,
            context: DEFAULT_CONTEXT,
        }
    }

    /// View over lines `[line_start, line_end)` of the corpus (0-based)
    pub fn with_bound(
        corpus: Arc<Corpus>,
        line_start: usize,
        line_end: usize,
    ) -> Result<Self, RangeError> {
        let bound = Bound::from_lines(line_start, line_end, corpus.lines())?;
        Ok(Self {
            corpus,
            bound,
            context: DEFAULT_CONTEXT,
        })
    }

    /// Change how many bytes of context surround each match
    pub fn with_context(mut self, context: usize) -> Self {
        self.context = context;
        self
    }

    #[inline]
    pub fn bound(&self) -> Bound {
        self.bound
    }

    #[inline]
    pub fn context(&self) -> usize {
        self.context
    }

    #[inline]
    pub fn corpus(&self) -> &Arc<Corpus> {
        &self.corpus
    }

    /// Snippet text around every in-bound match of `query`, ignoring case
    ///
    /// Only ASCII letters are case-folded: `"romeo"` finds `"ROMEO"`, but
    /// `"É"` does not find `"é"`. Non-ASCII text matches byte for byte. This
    /// keeps every match offset in the folded index valid in the original
    /// text.
    ///
    /// Returns an empty list for an empty query or when nothing matches.
    pub fn search(&self, query: &str) -> Vec<String> {
        self.search_snippets(query)
            .into_iter()
            .map(|snippet| snippet.text)
            .collect()
    }

    /// Like [`View::search`], keeping match positions, ordered by offset
    pub fn search_snippets(&self, query: &str) -> Vec<Snippet> {
        let text = self.corpus.text();
        self.match_offsets(query)
            .into_iter()
            .map(|offset| Snippet::extract(text, offset, self.context))
            .collect()
    }

    /// Number of in-bound matches of `query`
    pub fn count(&self, query: &str) -> usize {
        if query.is_empty() {
            return 0;
        }
        self.corpus
            .find_all(query)
            .into_iter()
            .filter(|&offset| self.bound.contains(offset))
            .count()
    }

    /// Sorted offsets of in-bound matches
    pub fn match_offsets(&self, query: &str) -> Vec<usize> {
        if query.is_empty() {
            return Vec::new();
        }

        let mut offsets: Vec<usize> = self
            .corpus
            .find_all(query)
            .into_iter()
            .filter(|&offset| self.bound.contains(offset))
            .collect();
        offsets.sort_unstable();
        offsets
    }
}

impl std::fmt::Debug for View {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("View")
            .field("bound", &self.bound)
            .field("context", &self.context)
            .field("corpus_len", &self.corpus.len())
            .finish()
    }
}
