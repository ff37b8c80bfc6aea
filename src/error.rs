//! Error types for corpus loading and view construction.

use std::path::PathBuf;
use thiserror::Error;

/// Failure to bring a corpus into memory.
///
/// Fatal at startup: nothing can be searched without a corpus.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read corpus {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Suffix positions are stored as `u32`.
    #[error("corpus is {len} bytes, larger than the 4 GiB the suffix index can address")]
    TooLarge { len: usize },
}

/// A line-number range that cannot be turned into a byte-offset bound.
///
/// Only the view being built is affected; the corpus and other views stay valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RangeError {
    #[error("line {line} is out of range (corpus has {line_count} lines)")]
    OutOfRange { line: usize, line_count: usize },

    #[error("line range is inverted: start {start} > end {end}")]
    Inverted { start: usize, end: usize },
}
