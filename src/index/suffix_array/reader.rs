//! Suffix array lookups
//!
//! All suffixes starting with a pattern sit in one contiguous run of the
//! array. Two binary searches find the run, so a lookup costs
//! O(m log n + occ) for a pattern of length m with occ occurrences.

use super::builder::SuffixArray;
use super::types::SuffixEntry;

impl SuffixArray {
    /// Find the run `[lo, hi)` of array slots whose suffixes start with `pattern`
    ///
    /// The pattern must already be case-folded the same way as the text.
    /// An empty pattern is a prefix of every suffix and spans the whole array.
    pub fn search(&self, pattern: &[u8]) -> (usize, usize) {
        let lo = self.lower_bound(pattern);
        let hi = lo + self.upper_bound(pattern, lo);
        (lo, hi)
    }

    /// Every text offset where `pattern` occurs, in no particular order
    pub fn lookup(&self, pattern: &[u8]) -> Vec<usize> {
        let (lo, hi) = self.search(pattern);
        self.suffixes[lo..hi]
            .iter()
            .map(|&pos| pos as usize)
            .collect()
    }

    /// Number of occurrences of `pattern`
    pub fn count(&self, pattern: &[u8]) -> usize {
        let (lo, hi) = self.search(pattern);
        hi - lo
    }

    /// Check if `pattern` occurs anywhere in the text
    pub fn contains(&self, pattern: &[u8]) -> bool {
        let (lo, hi) = self.search(pattern);
        lo < hi
    }

    /// First slot whose suffix is not less than `pattern` on its first
    /// `pattern.len()` bytes
    fn lower_bound(&self, pattern: &[u8]) -> usize {
        self.suffixes
            .partition_point(|&pos| self.prefix_at(pos, pattern.len()) < pattern)
    }

    /// Length of the run of suffixes starting with `pattern` from slot `start`
    fn upper_bound(&self, pattern: &[u8], start: usize) -> usize {
        self.suffixes[start..].partition_point(|&pos| self.suffix_at(pos).starts_with(pattern))
    }

    #[inline]
    fn suffix_at(&self, pos: SuffixEntry) -> &[u8] {
        &self.text[pos as usize..]
    }

    /// Up to `len` leading bytes of the suffix at `pos`
    #[inline]
    fn prefix_at(&self, pos: SuffixEntry, len: usize) -> &[u8] {
        let suffix = self.suffix_at(pos);
        &suffix[..len.min(suffix.len())]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted_lookup(sa: &SuffixArray, pattern: &[u8]) -> Vec<usize> {
        let mut hits = sa.lookup(pattern);
        hits.sort_unstable();
        hits
    }

    #[test]
    fn test_lookup_basic() {
        let sa = SuffixArray::build(b"hello world, world hello".to_vec());
        assert_eq!(sorted_lookup(&sa, b"hello"), vec![0, 19]);
        assert_eq!(sorted_lookup(&sa, b"world"), vec![6, 13]);
        assert_eq!(sorted_lookup(&sa, b"o"), vec![4, 7, 14, 23]);
    }

    #[test]
    fn test_lookup_no_match() {
        let sa = SuffixArray::build(b"hello world".to_vec());
        assert!(sa.lookup(b"notfound").is_empty());
        assert!(!sa.contains(b"worlds"));
        assert_eq!(sa.count(b"xyz123"), 0);
    }

    #[test]
    fn test_overlapping_occurrences() {
        let sa = SuffixArray::build(b"aaaa".to_vec());
        assert_eq!(sorted_lookup(&sa, b"aa"), vec![0, 1, 2]);
    }

    #[test]
    fn test_pattern_longer_than_text() {
        let sa = SuffixArray::build(b"abc".to_vec());
        assert!(sa.lookup(b"abcd").is_empty());
    }

    #[test]
    fn test_pattern_at_end_of_text() {
        let sa = SuffixArray::build(b"romeo and juliet".to_vec());
        assert_eq!(sa.lookup(b"juliet"), vec![10]);
        assert_eq!(sa.lookup(b"t"), vec![15]);
    }

    #[test]
    fn test_empty_pattern_matches_every_suffix() {
        let sa = SuffixArray::build(b"abc".to_vec());
        assert_eq!(sa.count(b""), 3);
    }

    #[test]
    fn test_lookup_against_naive_scan() {
        let text = b"to be, or not to be, that is the question: whether 'tis nobler".to_vec();
        let sa = SuffixArray::build(text.clone());

        for pattern in [&b"to"[..], b"be", b" ", b"t", b"question", b"is", b"xyz"] {
            let expected: Vec<usize> = text
                .windows(pattern.len())
                .enumerate()
                .filter(|(_, w)| *w == pattern)
                .map(|(i, _)| i)
                .collect();
            assert_eq!(sorted_lookup(&sa, pattern), expected, "pattern {:?}", pattern);
        }
    }
}
