//! Manipulation of half-open character ranges (`Range<u64>`).
//!
//! Span positions throughout spanalpha are half-open `[start, end)` offsets
//! into a document or into the virtual corpus. This crate provides:
//!
//! - **Range transformations**: iterator adapters that move ranges between
//!   coordinate spaces (see [`RangeIteratorsExt::shift_up`])
//! - **Set operations**: the gaps left by a sequence of covered ranges within
//!   a fixed universe, and a check that a sequence tiles a universe exactly

pub mod set_ops;
pub mod transform;

pub use set_ops::complement::complement_ranges;
pub use set_ops::tiling::is_exact_tiling;
pub use transform::RangeIteratorsExt;
