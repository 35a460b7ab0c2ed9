//! Shared domain types.
//!
//! These types are intentionally kept lightweight so they can be:
//!
//! - used in-memory during an evaluation pass
//! - exported to CSV/JSON
//! - rendered by either the CLI report or the TUI

use std::collections::BTreeSet;
use std::path::PathBuf;

use chrono::NaiveDate;
use serde::Serialize;

use crate::error::AppError;

/// Category labels the synthetic generator and the filter UI know about.
///
/// Uploaded files may carry other labels; the table treats `category` as an
/// open-ended string and only the controls enumerate this fixed set.
pub const KNOWN_CATEGORIES: [&str; 4] = ["Electronics", "Clothing", "Home", "Sports"];

/// Two-tailed significance threshold for the t-test verdict.
///
/// Fixed by design; deliberately not exposed as a user control.
pub const SIGNIFICANCE_ALPHA: f64 = 0.05;

/// Confidence-level slider range and step.
pub const CONFIDENCE_MIN: f64 = 0.80;
pub const CONFIDENCE_MAX: f64 = 0.99;
pub const CONFIDENCE_STEP: f64 = 0.01;
pub const DEFAULT_CONFIDENCE: f64 = 0.95;

/// Default hypothesized population mean for the one-sample t-test.
pub const DEFAULT_HYPOTHESIZED_MEAN: f64 = 20.0;

/// One sales row.
///
/// `category` and `units_sold` are required: every downstream computation
/// consumes them. The remaining columns are carried for display and export
/// and may be absent in uploaded files. `product_id` uniqueness is not
/// enforced anywhere.
#[derive(Debug, Clone, PartialEq)]
pub struct SalesRecord {
    pub product_id: Option<u32>,
    pub product_name: Option<String>,
    pub category: String,
    pub units_sold: u64,
    pub sale_date: Option<NaiveDate>,
}

/// Ordered sequence of sales rows.
///
/// Insertion order is preserved from the source (generation order or file row
/// order). Tables are never mutated in place: filtering produces a new table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SalesTable {
    pub records: Vec<SalesRecord>,
}

impl SalesTable {
    pub fn new(records: Vec<SalesRecord>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// `units_sold` as `f64`, in row order. This is the numeric column every
    /// statistic is computed over.
    pub fn units_sold(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.units_sold as f64).collect()
    }

    /// Distinct category labels present in the table, sorted.
    pub fn categories(&self) -> Vec<String> {
        let set: BTreeSet<&str> = self.records.iter().map(|r| r.category.as_str()).collect();
        set.into_iter().map(str::to_string).collect()
    }

    /// Retain rows whose category is a member of `filter`.
    ///
    /// An empty filter means "no filtering", not "exclude all". Relative row
    /// order is preserved, and re-filtering by the same set is a no-op.
    pub fn filter_categories(&self, filter: &BTreeSet<String>) -> SalesTable {
        if filter.is_empty() {
            return self.clone();
        }
        SalesTable::new(
            self.records
                .iter()
                .filter(|r| filter.contains(&r.category))
                .cloned()
                .collect(),
        )
    }
}

/// Where the table comes from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DataSource {
    /// Deterministic built-in sample (20 rows, fixed seed).
    Sample,
    /// User-supplied CSV file.
    File(PathBuf),
}

impl DataSource {
    /// Human-readable label for headers and status lines.
    pub fn label(&self) -> String {
        match self {
            DataSource::Sample => "synthetic sample".to_string(),
            DataSource::File(path) => path.display().to_string(),
        }
    }
}

/// A full evaluation pass's inputs, as understood by the pipeline.
///
/// This is derived from CLI flags or TUI controls (plus defaults). Every
/// derived output is a pure function of this struct.
#[derive(Debug, Clone, PartialEq)]
pub struct EvalConfig {
    pub source: DataSource,
    pub category_filter: BTreeSet<String>,
    pub confidence_level: f64,
    pub hypothesized_mean: f64,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            source: DataSource::Sample,
            category_filter: BTreeSet::new(),
            confidence_level: DEFAULT_CONFIDENCE,
            hypothesized_mean: DEFAULT_HYPOTHESIZED_MEAN,
        }
    }
}

impl EvalConfig {
    /// Validate user-supplied parameters before running the pipeline.
    pub fn validate(&self) -> Result<(), AppError> {
        if !(self.confidence_level > 0.0 && self.confidence_level < 1.0) {
            return Err(AppError::input(format!(
                "Confidence level must be in (0, 1), got {}.",
                self.confidence_level
            )));
        }
        if !self.hypothesized_mean.is_finite() {
            return Err(AppError::input(
                "Hypothesized mean must be a finite number.",
            ));
        }
        Ok(())
    }
}

/// Descriptive summary of `units_sold` over one table.
///
/// Every field except `count` is NaN when the table is empty; `std` is also
/// NaN for a single row (sample variance uses divisor n−1). NaN here is a
/// rendering concern, never an error.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DescriptiveSummary {
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
    /// Smallest value among the most frequent values; NaN on an empty table.
    pub mode: f64,
}

/// Confidence interval for the population mean.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ConfidenceInterval {
    /// Confidence level in (0, 1), e.g. 0.95.
    pub level: f64,
    pub lower: f64,
    pub upper: f64,
}

impl ConfidenceInterval {
    /// NaN bounds: the sample was too small for a defined interval.
    pub fn undefined(level: f64) -> Self {
        Self {
            level,
            lower: f64::NAN,
            upper: f64::NAN,
        }
    }

    pub fn is_defined(&self) -> bool {
        self.lower.is_finite() && self.upper.is_finite()
    }

    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }

    pub fn contains(&self, value: f64) -> bool {
        self.lower <= value && value <= self.upper
    }
}

/// One-sample t-test of `units_sold` against a hypothesized mean.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HypothesisTest {
    pub hypothesized_mean: f64,
    pub t_stat: f64,
    /// Two-tailed p-value; NaN when the test is undefined (n ≤ 1).
    pub p_value: f64,
}

/// Decision surfaced to the user for the t-test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    SignificantlyDifferent,
    NotSignificantlyDifferent,
    InsufficientData,
}

impl Verdict {
    /// Classify a two-tailed p-value at the fixed `SIGNIFICANCE_ALPHA`.
    pub fn from_p_value(p_value: f64) -> Self {
        if p_value.is_nan() {
            Verdict::InsufficientData
        } else if p_value < SIGNIFICANCE_ALPHA {
            Verdict::SignificantlyDifferent
        } else {
            Verdict::NotSignificantlyDifferent
        }
    }

    /// Full sentence for reports and the TUI.
    pub fn sentence(self) -> &'static str {
        match self {
            Verdict::SignificantlyDifferent => {
                "Reject the null hypothesis: mean is significantly different."
            }
            Verdict::NotSignificantlyDifferent => {
                "Fail to reject the null hypothesis: mean is not significantly different."
            }
            Verdict::InsufficientData => {
                "Insufficient data for a t-test (need at least 2 rows)."
            }
        }
    }
}

/// A saved statistics snapshot (JSON export).
#[derive(Debug, Clone, Serialize)]
pub struct SummaryFile {
    pub tool: String,
    pub source: String,
    pub rows: usize,
    pub confidence_level: f64,
    pub summary: DescriptiveSummary,
    pub interval: ConfidenceInterval,
    pub test: HypothesisTest,
    pub verdict: Verdict,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(category: &str, units: u64) -> SalesRecord {
        SalesRecord {
            product_id: None,
            product_name: None,
            category: category.to_string(),
            units_sold: units,
            sale_date: None,
        }
    }

    #[test]
    fn filter_empty_set_keeps_everything() {
        let table = SalesTable::new(vec![record("Home", 1), record("Sports", 2)]);
        let filtered = table.filter_categories(&BTreeSet::new());
        assert_eq!(filtered, table);
    }

    #[test]
    fn filter_preserves_order_and_is_idempotent() {
        let table = SalesTable::new(vec![
            record("Home", 1),
            record("Sports", 2),
            record("Home", 3),
            record("Clothing", 4),
        ]);
        let filter: BTreeSet<String> = ["Home", "Clothing"]
            .iter()
            .map(|s| s.to_string())
            .collect();

        let once = table.filter_categories(&filter);
        let units: Vec<u64> = once.records.iter().map(|r| r.units_sold).collect();
        assert_eq!(units, vec![1, 3, 4], "filter must preserve relative order");
        assert!(once.records.iter().all(|r| filter.contains(&r.category)));

        let twice = once.filter_categories(&filter);
        assert_eq!(twice, once, "re-filtering by the same set must be a no-op");
    }

    #[test]
    fn categories_are_distinct_and_sorted() {
        let table = SalesTable::new(vec![
            record("Sports", 1),
            record("Home", 2),
            record("Sports", 3),
        ]);
        assert_eq!(table.categories(), vec!["Home", "Sports"]);
    }

    #[test]
    fn verdict_threshold() {
        assert_eq!(
            Verdict::from_p_value(0.049),
            Verdict::SignificantlyDifferent
        );
        assert_eq!(
            Verdict::from_p_value(0.05),
            Verdict::NotSignificantlyDifferent
        );
        assert_eq!(Verdict::from_p_value(f64::NAN), Verdict::InsufficientData);
    }

    #[test]
    fn config_validation_rejects_bad_confidence() {
        let mut config = EvalConfig::default();
        config.confidence_level = 1.0;
        assert!(config.validate().is_err());
        config.confidence_level = 0.95;
        assert!(config.validate().is_ok());
    }
}
