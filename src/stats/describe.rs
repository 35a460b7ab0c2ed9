//! Descriptive summary of one table.
//!
//! Degenerate inputs never error here: an empty table produces a NaN summary
//! (count 0), a single row produces a NaN `std`. The UI renders NaN as "NaN"
//! and keeps the rest of the pass alive.

use crate::domain::{DescriptiveSummary, SalesTable};

/// Compute the descriptive summary over `units_sold`.
pub fn describe(table: &SalesTable) -> DescriptiveSummary {
    let values = table.units_sold();
    let n = values.len();

    if n == 0 {
        return DescriptiveSummary {
            count: 0,
            mean: f64::NAN,
            std: f64::NAN,
            min: f64::NAN,
            q1: f64::NAN,
            median: f64::NAN,
            q3: f64::NAN,
            max: f64::NAN,
            mode: f64::NAN,
        };
    }

    let mut sorted = values.clone();
    sorted.sort_by(f64::total_cmp);

    DescriptiveSummary {
        count: n,
        mean: mean(&values),
        std: sample_std(&values),
        min: sorted[0],
        q1: percentile(&sorted, 25.0),
        median: percentile(&sorted, 50.0),
        q3: percentile(&sorted, 75.0),
        max: sorted[n - 1],
        mode: mode(&sorted),
    }
}

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation (divisor n−1). NaN for fewer than 2 values.
pub fn sample_std(values: &[f64]) -> f64 {
    let n = values.len();
    if n < 2 {
        return f64::NAN;
    }
    let m = mean(values);
    let ss = values.iter().map(|&x| (x - m) * (x - m)).sum::<f64>();
    (ss / (n - 1) as f64).sqrt()
}

/// Percentile of pre-sorted values with linear interpolation between ranks.
///
/// `p` is in [0, 100]. The rank is `p/100 · (n−1)`, interpolated between its
/// floor and ceiling neighbors.
pub fn percentile(sorted: &[f64], p: f64) -> f64 {
    let n = sorted.len();
    if n == 0 {
        return f64::NAN;
    }
    if n == 1 {
        return sorted[0];
    }

    let rank = (p / 100.0) * (n - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    if lo == hi {
        return sorted[lo];
    }
    let frac = rank - lo as f64;
    sorted[lo] + frac * (sorted[hi] - sorted[lo])
}

/// Smallest value among the most frequent values; NaN on empty input.
///
/// The tie-break (smallest wins) and the NaN-on-empty behavior are part of
/// the dashboard's contract, so they are explicit here rather than left to a
/// library's choice.
fn mode(sorted: &[f64]) -> f64 {
    if sorted.is_empty() {
        return f64::NAN;
    }

    let mut best_value = sorted[0];
    let mut best_count = 0usize;

    let mut run_value = sorted[0];
    let mut run_count = 0usize;
    for &v in sorted {
        if v == run_value {
            run_count += 1;
        } else {
            run_value = v;
            run_count = 1;
        }
        // Strict `>` keeps the first (smallest) value on frequency ties.
        if run_count > best_count {
            best_count = run_count;
            best_value = run_value;
        }
    }

    best_value
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{SalesRecord, SalesTable};

    fn table_of(units: &[u64]) -> SalesTable {
        SalesTable::new(
            units
                .iter()
                .map(|&u| SalesRecord {
                    product_id: None,
                    product_name: None,
                    category: "Home".to_string(),
                    units_sold: u,
                    sale_date: None,
                })
                .collect(),
        )
    }

    #[test]
    fn empty_table_is_nan_not_error() {
        let summary = describe(&table_of(&[]));
        assert_eq!(summary.count, 0);
        assert!(summary.mean.is_nan());
        assert!(summary.std.is_nan());
        assert!(summary.median.is_nan());
        assert!(summary.mode.is_nan());
    }

    #[test]
    fn single_row_has_nan_std() {
        let summary = describe(&table_of(&[7]));
        assert_eq!(summary.count, 1);
        assert!((summary.mean - 7.0).abs() < 1e-12);
        assert!(summary.std.is_nan(), "sample std needs n >= 2");
        assert!((summary.median - 7.0).abs() < 1e-12);
        assert!((summary.mode - 7.0).abs() < 1e-12);
    }

    #[test]
    fn known_scenario_18_to_22() {
        let summary = describe(&table_of(&[18, 19, 20, 21, 22]));
        assert_eq!(summary.count, 5);
        assert!((summary.mean - 20.0).abs() < 1e-12);
        assert!((summary.median - 20.0).abs() < 1e-12);
        assert!((summary.min - 18.0).abs() < 1e-12);
        assert!((summary.max - 22.0).abs() < 1e-12);
        // Sample std of [18..22] is sqrt(10/4).
        assert!((summary.std - (2.5_f64).sqrt()).abs() < 1e-12);
    }

    #[test]
    fn quartiles_interpolate_linearly() {
        let sorted = [1.0, 2.0, 3.0, 4.0];
        assert!((percentile(&sorted, 25.0) - 1.75).abs() < 1e-12);
        assert!((percentile(&sorted, 50.0) - 2.5).abs() < 1e-12);
        assert!((percentile(&sorted, 75.0) - 3.25).abs() < 1e-12);
        assert!((percentile(&sorted, 0.0) - 1.0).abs() < 1e-12);
        assert!((percentile(&sorted, 100.0) - 4.0).abs() < 1e-12);
    }

    #[test]
    fn mode_prefers_smallest_on_frequency_tie() {
        let summary = describe(&table_of(&[20, 20, 20, 25, 25, 30]));
        assert!(
            (summary.mode - 20.0).abs() < 1e-12,
            "expected 20 (freq 3), got {}",
            summary.mode
        );

        // Genuine tie: 20 and 25 both appear twice; the smaller wins.
        let tied = describe(&table_of(&[25, 20, 25, 20, 30]));
        assert!((tied.mode - 20.0).abs() < 1e-12);
    }

    #[test]
    fn constant_column_has_zero_std() {
        let summary = describe(&table_of(&[9, 9, 9, 9]));
        assert!((summary.std - 0.0).abs() < 1e-12);
        assert!((summary.mode - 9.0).abs() < 1e-12);
    }
}
