//! ASCII chart rendering for terminal output.

pub mod ascii;

pub use ascii::*;
