//! Descriptive and inferential statistics over `units_sold`.

pub mod describe;
pub mod infer;

pub use describe::*;
pub use infer::*;
