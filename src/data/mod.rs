//! Data sources.
//!
//! The dashboard has exactly two: the deterministic built-in sample
//! (`sample`) and user-supplied CSV files (`crate::io::ingest`).

pub mod sample;

pub use sample::*;
