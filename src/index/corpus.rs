//! The loaded corpus and its indexes
//!
//! A [`Corpus`] is built once and never mutated. It owns the raw text, the
//! suffix array over its case-folded copy and the line start table, and is
//! shared between views through an `Arc`.

use crate::error::LoadError;
use crate::index::line_index::LineIndex;
use crate::index::suffix_array::{MAX_TEXT_SIZE, SuffixArray, SuffixArrayStats};
use log::{debug, info};
use memmap2::Mmap;
use std::fs::File;
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

/// Raw corpus bytes, either mapped from disk or owned
enum CorpusBytes {
    Mapped(Mmap),
    Owned(Vec<u8>),
}

impl Deref for CorpusBytes {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        match self {
            CorpusBytes::Mapped(mmap) => mmap,
            CorpusBytes::Owned(bytes) => bytes,
        }
    }
}

/// Immutable text plus the indexes built over it
pub struct Corpus {
    bytes: CorpusBytes,
    suffixes: SuffixArray,
    lines: LineIndex,
    source: Option<PathBuf>,
}

impl Corpus {
    /// Map the file at `path` and index it
    pub fn load(path: &Path) -> Result<Arc<Self>, LoadError> {
        let io_err = |source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        };

        let file = File::open(path).map_err(io_err)?;
        let len = file.metadata().map_err(io_err)?.len();

        // Zero-length files cannot be mapped on every platform
        let bytes = if len == 0 {
            CorpusBytes::Owned(Vec::new())
        } else {
            // The corpus is treated as read-only for the life of the process
            let mmap = unsafe { Mmap::map(&file) }.map_err(io_err)?;
            CorpusBytes::Mapped(mmap)
        };

        info!("loading corpus {} ({} bytes)", path.display(), bytes.len());
        Self::index(bytes, Some(path.to_path_buf())).map(Arc::new)
    }

    /// Index an in-memory text
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Result<Arc<Self>, LoadError> {
        Self::index(CorpusBytes::Owned(bytes.into()), None).map(Arc::new)
    }

    fn index(bytes: CorpusBytes, source: Option<PathBuf>) -> Result<Self, LoadError> {
        if bytes.len() > MAX_TEXT_SIZE {
            return Err(LoadError::TooLarge { len: bytes.len() });
        }

        let start = Instant::now();

        // ASCII folding keeps every byte in place, so offsets in the folded
        // copy are offsets in the original
        let folded = bytes.to_ascii_lowercase();
        let suffixes = SuffixArray::build(folded);
        debug!(
            "suffix array: {} suffixes, {} doubling rounds",
            suffixes.len(),
            suffixes.stats().doubling_rounds
        );

        let lines = LineIndex::build(&bytes);

        info!(
            "indexed {} bytes, {} lines in {:.1?}",
            bytes.len(),
            lines.line_count(),
            start.elapsed()
        );

        Ok(Self {
            bytes,
            suffixes,
            lines,
            source,
        })
    }

    /// Original text, case preserved
    #[inline]
    pub fn text(&self) -> &[u8] {
        &self.bytes
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    #[inline]
    pub fn suffixes(&self) -> &SuffixArray {
        &self.suffixes
    }

    #[inline]
    pub fn lines(&self) -> &LineIndex {
        &self.lines
    }

    /// File the corpus was loaded from, if any
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// Every offset where `query` occurs, ignoring ASCII case
    ///
    /// Non-ASCII bytes are compared exactly.
    pub fn find_all(&self, query: &str) -> Vec<usize> {
        let folded = query.to_ascii_lowercase();
        self.suffixes.lookup(folded.as_bytes())
    }

    pub fn stats(&self) -> CorpusStats {
        CorpusStats {
            bytes: self.len(),
            lines: self.lines.line_count(),
            suffix_array: self.suffixes.stats(),
            memory_mapped: matches!(self.bytes, CorpusBytes::Mapped(_)),
        }
    }
}

/// Size information about a loaded corpus
#[derive(Debug, Clone, Copy)]
pub struct CorpusStats {
    pub bytes: usize,
    pub lines: usize,
    pub suffix_array: SuffixArrayStats,
    pub memory_mapped: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_from_bytes() {
        let corpus = Corpus::from_bytes("Hello\nWorld :D").unwrap();
        assert_eq!(corpus.len(), 14);
        assert_eq!(corpus.lines().as_slice(), &[0, 6]);
        assert_eq!(corpus.suffixes().len(), 14);
        assert!(corpus.source().is_none());
    }

    #[test]
    fn test_folded_copy_keeps_offsets() {
        let corpus = Corpus::from_bytes("ROMEO. Wherefore art thou Romeo?").unwrap();
        assert_eq!(corpus.suffixes().text(), b"romeo. wherefore art thou romeo?");
        assert_eq!(corpus.text(), b"ROMEO. Wherefore art thou Romeo?");

        let mut hits = corpus.find_all("rOmEo");
        hits.sort_unstable();
        assert_eq!(hits, vec![0, 26]);
    }

    #[test]
    fn test_load_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"First line\nSecond line\n").unwrap();
        file.flush().unwrap();

        let corpus = Corpus::load(file.path()).unwrap();
        assert_eq!(corpus.len(), 23);
        assert_eq!(corpus.lines().as_slice(), &[0, 11]);
        assert_eq!(corpus.source(), Some(file.path()));
        assert!(corpus.stats().memory_mapped);
    }

    #[test]
    fn test_load_empty_file() {
        let file = NamedTempFile::new().unwrap();
        let corpus = Corpus::load(file.path()).unwrap();
        assert!(corpus.is_empty());
        assert!(corpus.lines().is_empty());
        assert!(corpus.find_all("anything").is_empty());
    }

    #[test]
    fn test_load_missing_file() {
        let err = Corpus::load(Path::new("awawawawa.txt")).err().unwrap();
        assert!(matches!(err, LoadError::Io { .. }));
        assert!(err.to_string().contains("awawawawa.txt"));
    }
}
