//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - sales rows and the ordered table (`SalesRecord`, `SalesTable`)
//! - evaluation inputs (`DataSource`, `EvalConfig`)
//! - derived statistics (`DescriptiveSummary`, `ConfidenceInterval`,
//!   `HypothesisTest`, `Verdict`)

pub mod types;

pub use types::*;
