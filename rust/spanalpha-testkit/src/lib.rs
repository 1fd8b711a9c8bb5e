//! Test utilities for the spanalpha workspace.
//!
//! This crate provides:
//! - Highlighter export fixtures written to temporary files, plain or gzipped
//! - Seeded procedural exports for property-style checks
//!
//! It is intended for the workspace's own test suites.

pub mod data_gen;
pub mod fixtures;
