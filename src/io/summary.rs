//! Write statistics snapshot JSON files.
//!
//! The snapshot is the "portable" representation of one evaluation pass:
//! source label, row count, descriptive summary, confidence interval, t-test
//! and verdict. It is meant for spreadsheets' bigger siblings — notebooks and
//! downstream scripts — not for re-import.
//!
//! The schema is defined by `domain::SummaryFile`. Non-finite statistics
//! (empty/degenerate tables) serialize as JSON `null`.

use std::fs::File;
use std::path::Path;

use crate::app::pipeline::RunOutput;
use crate::domain::{EvalConfig, SummaryFile};
use crate::error::AppError;

/// Write a summary JSON file for a completed evaluation pass.
pub fn write_summary_json(
    path: &Path,
    run: &RunOutput,
    config: &EvalConfig,
) -> Result<(), AppError> {
    let file = File::create(path).map_err(|e| {
        AppError::input(format!(
            "Failed to create summary JSON '{}': {e}",
            path.display()
        ))
    })?;

    let snapshot = SummaryFile {
        tool: "sales".to_string(),
        source: config.source.label(),
        rows: run.table.len(),
        confidence_level: config.confidence_level,
        summary: run.summary,
        interval: run.inference.interval,
        test: run.inference.test,
        verdict: run.inference.verdict,
    };

    serde_json::to_writer_pretty(file, &snapshot)
        .map_err(|e| AppError::internal(format!("Failed to write summary JSON: {e}")))?;

    Ok(())
}
