//! Byte-offset bounds restricting a search to one part of the corpus

use crate::error::RangeError;
use crate::index::line_index::LineIndex;
use serde::{Deserialize, Serialize};

/// Half-open byte range `[start, end)` into the corpus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bound {
    pub start: usize,
    pub end: usize,
}

impl Bound {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Bound covering every byte of a text of length `len`
    pub fn full(len: usize) -> Self {
        Self { start: 0, end: len }
    }

    /// Convert a line-number range into a byte-offset bound
    ///
    /// `line_start` and `line_end` are 0-based line numbers; both must name
    /// an existing line. The resulting bound starts at the first byte of
    /// `line_start` and stops before the first byte of `line_end`.
    pub fn from_lines(
        line_start: usize,
        line_end: usize,
        lines: &LineIndex,
    ) -> Result<Self, RangeError> {
        if line_start > line_end {
            return Err(RangeError::Inverted {
                start: line_start,
                end: line_end,
            });
        }

        let offset_of = |line: usize| {
            lines.line_start(line).ok_or(RangeError::OutOfRange {
                line,
                line_count: lines.line_count(),
            })
        };

        Ok(Self {
            start: offset_of(line_start)?,
            end: offset_of(line_end)?,
        })
    }

    #[inline]
    pub fn contains(&self, offset: usize) -> bool {
        self.start <= offset && offset < self.end
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn darkness_lines() -> LineIndex {
        LineIndex::from(vec![0, 30, 63, 96, 132, 176, 190])
    }

    #[test]
    fn test_contains() {
        let b = Bound::new(1000, 1500);
        assert!(!b.contains(999), "outside on the left");
        assert!(!b.contains(1999), "outside on the right");
        assert!(b.contains(1000), "exactly the start");
        assert!(b.contains(1250), "just inside");
        assert!(!b.contains(1500), "end is exclusive");
        assert!(b.contains(1499));
    }

    #[test]
    fn test_from_lines() {
        let lines = darkness_lines();
        assert_eq!(Bound::from_lines(0, 1, &lines).unwrap(), Bound::new(0, 30));
        assert_eq!(Bound::from_lines(1, 3, &lines).unwrap(), Bound::new(30, 96));
        assert_eq!(Bound::from_lines(6, 6, &lines).unwrap(), Bound::new(190, 190));
    }

    #[test]
    fn test_from_lines_out_of_range() {
        let lines = darkness_lines();
        assert_eq!(
            Bound::from_lines(2, 7, &lines),
            Err(RangeError::OutOfRange {
                line: 7,
                line_count: 7
            })
        );
        assert_eq!(
            Bound::from_lines(100, 200, &lines),
            Err(RangeError::OutOfRange {
                line: 100,
                line_count: 7
            })
        );
    }

    #[test]
    fn test_from_lines_inverted() {
        let lines = darkness_lines();
        assert_eq!(
            Bound::from_lines(3, 1, &lines),
            Err(RangeError::Inverted { start: 3, end: 1 })
        );
    }

    #[test]
    fn test_empty_index_rejects_everything() {
        let lines = LineIndex::build(b"");
        assert!(matches!(
            Bound::from_lines(0, 0, &lines),
            Err(RangeError::OutOfRange { line: 0, line_count: 0 })
        ));
    }

    #[test]
    fn test_full() {
        let b = Bound::full(10);
        assert!(b.contains(0));
        assert!(b.contains(9));
        assert!(!b.contains(10));
        assert_eq!(b.len(), 10);
        assert!(Bound::full(0).is_empty());
    }
}
