use std::{iter::Peekable, ops::Range};

/// Yields the complement (gaps) within the half-open universe `[0, size)` of a
/// stream of ordered, non-overlapping (adjacent allowed) ranges.
///
/// The output is a stream of non-overlapping, ascending ranges covering all
/// positions in `[0, size)` that are NOT covered by the input ranges: the gap
/// before the first range, the gaps between consecutive ranges and the tail gap
/// after the last one.
///
/// Assumptions on the input:
/// - Ranges are yielded in ascending order by `start`.
/// - Ranges do not overlap (adjacent is fine). Overlaps are tolerated and
///   coalesced on the fly.
/// - Empty ranges are ignored; ranges reaching past `size` are cut at `size`.
///
/// Complexity: O(n) over the input, constant extra memory.
pub fn complement_ranges<I>(size: u64, ranges: I) -> ComplementRanges<I::IntoIter>
where
    I: IntoIterator<Item = Range<u64>>,
{
    ComplementRanges::new(size, ranges.into_iter())
}

/// Iterator adapter implementing [`complement_ranges`].
pub struct ComplementRanges<I>
where
    I: Iterator<Item = Range<u64>>,
{
    it: Peekable<I>,
    size: u64,
    cursor: u64,
}

impl<I> ComplementRanges<I>
where
    I: Iterator<Item = Range<u64>>,
{
    pub fn new(size: u64, it: I) -> Self {
        Self {
            it: it.peekable(),
            size,
            cursor: 0,
        }
    }
}

impl<I> Iterator for ComplementRanges<I>
where
    I: Iterator<Item = Range<u64>>,
{
    type Item = Range<u64>;

    fn next(&mut self) -> Option<Self::Item> {
        while self.cursor < self.size {
            let Some(r) = self.it.peek() else {
                // Tail gap [cursor, size)
                let start = self.cursor;
                self.cursor = self.size;
                return Some(start..self.size);
            };

            if r.start >= r.end || r.end <= self.cursor {
                self.it.next();
                continue;
            }

            if r.start > self.cursor {
                let start = self.cursor;
                self.cursor = r.start.min(self.size);
                return Some(start..self.cursor);
            }

            // r.start <= cursor < r.end
            self.cursor = r.end.min(self.size);
            self.it.next();
        }
        None
    }
}

#[cfg(test)]
#[allow(clippy::single_range_in_vec_init)]
mod tests {
    use std::ops::Range;

    use super::*;

    fn gaps(size: u64, ranges: Vec<Range<u64>>) -> Vec<Range<u64>> {
        complement_ranges(size, ranges).collect()
    }

    #[test]
    fn test_no_spans_is_one_gap() {
        assert_eq!(gaps(100, vec![]), vec![0..100]);
    }

    #[test]
    fn test_gap_before_between_and_after() {
        assert_eq!(gaps(50, vec![10..20, 30..40]), vec![0..10, 20..30, 40..50]);
    }

    #[test]
    fn test_adjacent_ranges_leave_no_gap() {
        assert_eq!(gaps(40, vec![10..30, 30..40]), vec![0..10]);
    }

    #[test]
    fn test_overlapping_ranges_coalesced() {
        assert_eq!(gaps(10, vec![1..6, 4..8]), vec![0..1, 8..10]);
    }

    #[test]
    fn test_empty_ranges_ignored() {
        assert_eq!(gaps(10, vec![3..3, 5..7, 7..7]), vec![0..5, 7..10]);
    }

    #[test]
    fn test_full_coverage() {
        assert!(gaps(30, vec![0..30]).is_empty());
    }

    #[test]
    fn test_range_past_size_is_cut() {
        assert_eq!(gaps(5, vec![1..100]), vec![0..1]);
        assert_eq!(gaps(5, vec![8..10]), vec![0..5]);
    }

    #[test]
    fn test_zero_size_universe() {
        assert!(gaps(0, vec![0..3]).is_empty());
    }
}
