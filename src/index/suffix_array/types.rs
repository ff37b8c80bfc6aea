//! Types for suffix array indexing

/// Position of a suffix in the folded corpus text
///
/// `u32` halves the index footprint compared to `usize`; corpora larger than
/// `u32::MAX` bytes are rejected at load time.
pub type SuffixEntry = u32;

/// Largest text the suffix array can address
pub const MAX_TEXT_SIZE: usize = u32::MAX as usize;

/// Below this many suffixes a sequential re-ranking pass beats rayon's overhead
pub const PARALLEL_RANK_THRESHOLD: usize = 100_000;

/// Statistics about a built suffix array
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SuffixArrayStats {
    pub text_size: usize,
    pub suffix_count: usize,
    /// Rounds of prefix doubling needed to rank every suffix uniquely
    pub doubling_rounds: u32,
}
