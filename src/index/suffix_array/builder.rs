//! Suffix array builder
//!
//! Sorts every suffix of the (already case-folded) corpus text by prefix
//! doubling: each round orders positions by the pair of ranks of their first
//! `k` and next `k` bytes, then re-ranks, doubling `k` until all ranks are
//! distinct. Ranks are bounded by the text length, so each round is two
//! linear counting-sort passes rather than a comparison sort.
//!
//! Time: O(n) per round, at most ⌈log₂ n⌉ rounds: O(n log n)
//! Space: O(n) for the array, two rank buffers and one scratch buffer

use super::types::*;
use rayon::prelude::*;

/// Suffix array over a case-folded text
///
/// Owns the text it indexes so lookups can compare suffixes directly.
pub struct SuffixArray {
    /// Text the suffixes point into
    pub(super) text: Vec<u8>,
    /// Suffix start positions in lexicographic order of their suffixes
    pub(super) suffixes: Vec<SuffixEntry>,
    pub(super) doubling_rounds: u32,
}

impl SuffixArray {
    /// Build the suffix array for `text`
    ///
    /// `text.len()` must not exceed [`MAX_TEXT_SIZE`]; callers check this
    /// before building.
    pub fn build(text: Vec<u8>) -> Self {
        debug_assert!(text.len() <= MAX_TEXT_SIZE);
        let (suffixes, doubling_rounds) = build_suffix_array(&text);

        Self {
            text,
            suffixes,
            doubling_rounds,
        }
    }

    /// The indexed text
    #[inline]
    pub fn text(&self) -> &[u8] {
        &self.text
    }

    /// Number of suffixes (equals text length)
    #[inline]
    pub fn len(&self) -> usize {
        self.suffixes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.suffixes.is_empty()
    }

    pub fn stats(&self) -> SuffixArrayStats {
        SuffixArrayStats {
            text_size: self.text.len(),
            suffix_count: self.suffixes.len(),
            doubling_rounds: self.doubling_rounds,
        }
    }
}

/// Sort all suffixes of `text`, returning the array and the number of rounds
fn build_suffix_array(text: &[u8]) -> (Vec<SuffixEntry>, u32) {
    let n = text.len();
    if n == 0 {
        return (Vec::new(), 0);
    }

    // Round zero: bucket positions by their first byte
    let bytes: Vec<u32> = text.iter().map(|&b| b as u32).collect();
    let positions: Vec<SuffixEntry> = (0..n as SuffixEntry).collect();
    let mut sa = vec![0 as SuffixEntry; n];
    counting_sort(&positions, &bytes, 256, &mut sa);

    let mut rank = vec![0u32; n];
    let mut next_rank = vec![0u32; n];
    let mut classes = assign_ranks(&sa, |i| (bytes[i], 0), &mut rank);
    drop(bytes);

    let mut by_second = positions;
    let mut k = 1usize;
    let mut rounds = 0u32;

    while (classes as usize) < n {
        rounds += 1;

        // Order by the rank of the second half. Suffixes with no second half
        // come first; the rest follow the current order shifted back by k.
        by_second.clear();
        by_second.extend(n.saturating_sub(k) as SuffixEntry..n as SuffixEntry);
        by_second.extend(sa.iter().filter(|&&pos| pos as usize >= k).map(|&pos| pos - k as SuffixEntry));

        // Stable by first half: the pair order falls out
        counting_sort(&by_second, &rank, classes as usize, &mut sa);

        classes = assign_ranks(
            &sa,
            |i| {
                let second = if i + k < n { rank[i + k] + 1 } else { 0 };
                (rank[i], second)
            },
            &mut next_rank,
        );
        std::mem::swap(&mut rank, &mut next_rank);

        k *= 2;
    }

    (sa, rounds)
}

/// Stable counting sort of `input` positions by `keys[pos]` into `out`
///
/// Every key must be below `buckets`.
fn counting_sort(input: &[SuffixEntry], keys: &[u32], buckets: usize, out: &mut [SuffixEntry]) {
    let mut next = vec![0usize; buckets + 1];
    for &pos in input {
        next[keys[pos as usize] as usize + 1] += 1;
    }
    for b in 1..=buckets {
        next[b] += next[b - 1];
    }
    for &pos in input {
        let slot = &mut next[keys[pos as usize] as usize];
        out[*slot] = pos;
        *slot += 1;
    }
}

/// Give each position in sorted `sa` the index of its key class, returning
/// the number of classes. Neighbouring keys are compared on rayon for large
/// arrays; the running count itself is a single pass.
fn assign_ranks<K>(sa: &[SuffixEntry], key: K, ranks: &mut [u32]) -> u32
where
    K: Fn(usize) -> (u32, u32) + Sync,
{
    let starts_class = |w: usize| w > 0 && key(sa[w] as usize) != key(sa[w - 1] as usize);
    let boundaries: Vec<bool> = if sa.len() > PARALLEL_RANK_THRESHOLD {
        (0..sa.len()).into_par_iter().map(starts_class).collect()
    } else {
        (0..sa.len()).map(starts_class).collect()
    };

    let mut class = 0u32;
    for (&pos, &boundary) in sa.iter().zip(&boundaries) {
        class += boundary as u32;
        ranks[pos as usize] = class;
    }
    class + 1
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Reference construction by direct suffix comparison
    fn naive_suffix_array(text: &[u8]) -> Vec<SuffixEntry> {
        let mut sa: Vec<SuffixEntry> = (0..text.len() as SuffixEntry).collect();
        sa.sort_by(|&a, &b| text[a as usize..].cmp(&text[b as usize..]));
        sa
    }

    #[test]
    fn test_suffix_array_correctness() {
        let (sa, _) = build_suffix_array(b"banana\x00");

        // 6: \0
        // 5: a\0
        // 3: ana\0
        // 1: anana\0
        // 0: banana\0
        // 4: na\0
        // 2: nana\0
        assert_eq!(sa, vec![6, 5, 3, 1, 0, 4, 2]);
    }

    #[test]
    fn test_prefix_suffix_ordering() {
        // "a" < "aa" < "aaa": shorter suffixes first
        let (sa, _) = build_suffix_array(b"aaa");
        assert_eq!(sa, vec![2, 1, 0]);
    }

    #[test]
    fn test_matches_naive_construction() {
        let texts: [&[u8]; 5] = [
            b"mississippi",
            b"abracadabra abracadabra",
            b"to be, or not to be: that is the question",
            b"zzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzz",
            "caf\u{e9} na\u{ef}ve r\u{e9}sum\u{e9}".as_bytes(),
        ];

        for text in texts {
            let (sa, _) = build_suffix_array(text);
            assert_eq!(sa, naive_suffix_array(text), "text: {:?}", text);
        }
    }

    #[test]
    fn test_empty_text() {
        let sa = SuffixArray::build(Vec::new());
        assert!(sa.is_empty());
        assert_eq!(sa.stats().doubling_rounds, 0);
    }

    #[test]
    fn test_single_byte() {
        let sa = SuffixArray::build(b"x".to_vec());
        assert_eq!(sa.suffixes, vec![0]);
    }

    #[test]
    fn test_stats() {
        let sa = SuffixArray::build(b"hello world".to_vec());
        let stats = sa.stats();
        assert_eq!(stats.text_size, 11);
        assert_eq!(stats.suffix_count, 11);
        assert!(stats.doubling_rounds >= 1);
    }

    #[test]
    fn test_uniform_text_rounds_are_logarithmic() {
        // Each round doubles the compared prefix and distinguishes twice as
        // many suffixes, so n equal bytes need exactly log2(n) rounds
        for (n, expected_rounds) in [(2usize, 1u32), (4096, 12), (65_536, 16)] {
            let (sa, rounds) = build_suffix_array(&vec![b'a'; n]);
            assert_eq!(rounds, expected_rounds, "n = {}", n);
            assert_eq!(sa.len(), n);
            assert!(sa.iter().rev().map(|&p| p as usize).eq(0..n));
        }
    }

    #[test]
    fn test_uniform_text_matches_naive() {
        let text = vec![b'e'; 1000];
        let (sa, _) = build_suffix_array(&text);
        assert_eq!(sa, naive_suffix_array(&text));
    }

    #[test]
    fn test_large_text_uses_parallel_path() {
        // Periodic text forces several doubling rounds
        let text: Vec<u8> = b"the quick brown fox "
            .iter()
            .copied()
            .cycle()
            .take(PARALLEL_RANK_THRESHOLD + 1000)
            .collect();
        let sa = SuffixArray::build(text.clone());
        assert_eq!(sa.len(), text.len());

        for w in sa.suffixes.windows(2).step_by(997) {
            assert!(text[w[0] as usize..] < text[w[1] as usize..]);
        }
    }
}
