//! An iterator adapter that shifts all ranges up by a fixed amount.

use std::ops::Range;

/// An iterator adapter that shifts all ranges up by a fixed amount.
///
/// Each range's `start` and `end` are increased by `amount`. Panics if overflow occurs.
#[derive(Debug, Clone)]
pub struct ShiftUpRanges<I>
where
    I: Iterator<Item = Range<u64>>,
{
    inner: I,
    amount: u64,
}

impl<I> ShiftUpRanges<I>
where
    I: Iterator<Item = Range<u64>>,
{
    /// Creates a new `ShiftUpRanges` iterator adding `amount` to both bounds
    /// of every range produced by `inner`.
    pub fn new(inner: I, amount: u64) -> Self {
        ShiftUpRanges { inner, amount }
    }

    fn shift(&self, pos: u64, bound: &str) -> u64 {
        pos.checked_add(self.amount).unwrap_or_else(|| {
            panic!(
                "Arithmetic overflow: cannot shift range {bound} {pos} up by {}",
                self.amount
            )
        })
    }
}

impl<I> Iterator for ShiftUpRanges<I>
where
    I: Iterator<Item = Range<u64>>,
{
    type Item = Range<u64>;

    fn next(&mut self) -> Option<Self::Item> {
        let range = self.inner.next()?;
        Some(self.shift(range.start, "start")..self.shift(range.end, "end"))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<I> ExactSizeIterator for ShiftUpRanges<I> where I: ExactSizeIterator<Item = Range<u64>> {}
