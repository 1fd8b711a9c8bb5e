use std::ops::Range;

/// Returns `true` when `ranges`, taken in order, cover `[0, size)` exactly
/// once: each range starts where the previous one ended, the first starts at 0
/// and the last ends at `size`. Empty ranges are skipped.
pub fn is_exact_tiling<I>(size: u64, ranges: I) -> bool
where
    I: IntoIterator<Item = Range<u64>>,
{
    let mut cursor = 0u64;
    for r in ranges {
        if r.start == r.end {
            continue;
        }
        if r.start != cursor || r.end < r.start {
            return false;
        }
        cursor = r.end;
    }
    cursor == size
}
