//! Suffix array indexing module
//!
//! An in-memory suffix array over the case-folded corpus answers "every
//! offset where this substring occurs" in O(m log n + occ), independent of
//! how large the corpus grows.
//!
//! ## Architecture
//!
//! - `builder`: Constructs the sorted suffix array by prefix doubling
//! - `reader`: Binary-search lookups over the built array
//! - `types`: Core type definitions

pub mod builder;
pub mod reader;
pub mod types;

// Re-exports for convenience
pub use builder::SuffixArray;
pub use types::{MAX_TEXT_SIZE, SuffixArrayStats, SuffixEntry};
