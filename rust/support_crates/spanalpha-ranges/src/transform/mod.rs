//! Iterator adapters for `Range<u64>` sequences.
//!
//! The [`RangeIteratorsExt`] trait is implemented for all iterators over
//! `Range<u64>`.

use std::ops::Range;

pub mod shift;

/// Extension trait for more idiomatic usage of the range iterator adapters.
pub trait RangeIteratorsExt: Iterator<Item = Range<u64>> + Sized {
    /// Adapts an iterator of `Range<u64>` to yield ranges shifted up by `amount`.
    ///
    /// Used to move document-local span positions into virtual corpus
    /// coordinates, where `amount` is the document offset.
    ///
    /// # Panics
    ///
    /// Panics if adding `amount` would overflow either bound.
    fn shift_up(self, amount: u64) -> shift::ShiftUpRanges<Self> {
        shift::ShiftUpRanges::new(self, amount)
    }
}

impl<I: Iterator<Item = Range<u64>>> RangeIteratorsExt for I {}
