//! Core definitions (errors, result alias and verification macros), relied upon
//! by all spanalpha-* crates.

pub mod error;
pub mod macros;
pub mod result;

pub use result::Result;
