//! Set operations over ordered sequences of ranges within a fixed universe
//! `[0, size)`.

pub mod complement;
pub mod tiling;
