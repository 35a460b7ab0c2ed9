//! Input/output helpers.
//!
//! - CSV ingest + validation (`ingest`)
//! - CSV export of the current table (`export`)
//! - statistics snapshot JSON (`summary`)

pub mod export;
pub mod ingest;
pub mod summary;

pub use export::*;
pub use ingest::*;
pub use summary::*;
