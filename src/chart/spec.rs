//! Typed chart inputs.
//!
//! Each spec is a pure function of the table (plus, for the histogram, the
//! descriptive summary for its markers). All three tolerate an empty table by
//! producing an empty spec; backends then render a placeholder instead of
//! failing the pass.

use std::collections::BTreeMap;

use crate::domain::{DescriptiveSummary, SalesTable};
use crate::stats::describe::{percentile, sample_std};

/// Number of equal-width histogram bins.
pub const HISTOGRAM_BINS: usize = 10;

/// Grid resolution of the density overlay.
const DENSITY_POINTS: usize = 200;

/// Whisker reach in IQR multiples.
const WHISKER_IQR: f64 = 1.5;

/// One half-open histogram bin `[left, right)`; the last bin is closed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HistBin {
    pub left: f64,
    pub right: f64,
    pub count: usize,
}

/// A labeled vertical reference line (mean/median/mode).
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub value: f64,
    pub label: String,
}

/// Distribution of `units_sold`: bins, a smoothed density overlay in count
/// units, and central-tendency markers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HistogramSpec {
    pub bins: Vec<HistBin>,
    pub density: Vec<(f64, f64)>,
    pub markers: Vec<Marker>,
}

impl HistogramSpec {
    pub fn from_table(table: &SalesTable, summary: &DescriptiveSummary) -> Self {
        let values = table.units_sold();
        if values.is_empty() {
            return Self::default();
        }

        let bins = build_bins(&values);
        let bin_width = bins.first().map(|b| b.right - b.left).unwrap_or(1.0);
        let density = density_overlay(&values, bin_width);
        let markers = markers(summary);

        Self {
            bins,
            density,
            markers,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }

    /// Tallest bin count (used by backends for the y-range).
    pub fn max_count(&self) -> usize {
        self.bins.iter().map(|b| b.count).max().unwrap_or(0)
    }
}

/// Five-number box for one category.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryBox {
    pub category: String,
    /// Lowest observation within whisker reach.
    pub whisker_low: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    /// Highest observation within whisker reach.
    pub whisker_high: f64,
    /// Observations beyond the whiskers.
    pub outliers: Vec<f64>,
}

/// One box per distinct category, categories sorted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoxplotSpec {
    pub boxes: Vec<CategoryBox>,
}

impl BoxplotSpec {
    pub fn from_table(table: &SalesTable) -> Self {
        let mut grouped: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
        for r in &table.records {
            grouped
                .entry(r.category.as_str())
                .or_default()
                .push(r.units_sold as f64);
        }

        let boxes = grouped
            .into_iter()
            .map(|(category, mut values)| {
                values.sort_by(f64::total_cmp);
                five_number_box(category, &values)
            })
            .collect();

        Self { boxes }
    }

    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }

    /// Overall value range across boxes and outliers, for backend y-bounds.
    pub fn value_range(&self) -> Option<(f64, f64)> {
        let mut lo = f64::INFINITY;
        let mut hi = f64::NEG_INFINITY;
        for b in &self.boxes {
            lo = lo.min(b.whisker_low);
            hi = hi.max(b.whisker_high);
            for &o in &b.outliers {
                lo = lo.min(o);
                hi = hi.max(o);
            }
        }
        (lo.is_finite() && hi.is_finite()).then_some((lo, hi))
    }
}

/// Total `units_sold` for one category.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryTotal {
    pub category: String,
    pub total: u64,
}

/// One bar per distinct category, categories sorted, aggregated before
/// rendering.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BarSpec {
    pub totals: Vec<CategoryTotal>,
}

impl BarSpec {
    pub fn from_table(table: &SalesTable) -> Self {
        let mut grouped: BTreeMap<&str, u64> = BTreeMap::new();
        for r in &table.records {
            *grouped.entry(r.category.as_str()).or_default() += r.units_sold;
        }

        let totals = grouped
            .into_iter()
            .map(|(category, total)| CategoryTotal {
                category: category.to_string(),
                total,
            })
            .collect();

        Self { totals }
    }

    pub fn is_empty(&self) -> bool {
        self.totals.is_empty()
    }

    pub fn max_total(&self) -> u64 {
        self.totals.iter().map(|t| t.total).max().unwrap_or(0)
    }
}

fn build_bins(values: &[f64]) -> Vec<HistBin> {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for &v in values {
        min = min.min(v);
        max = max.max(v);
    }

    // Degenerate range (constant column): center one unit of width on it.
    if max - min == 0.0 {
        min -= 0.5;
        max += 0.5;
    }

    let width = (max - min) / HISTOGRAM_BINS as f64;
    let mut bins: Vec<HistBin> = (0..HISTOGRAM_BINS)
        .map(|i| HistBin {
            left: min + i as f64 * width,
            right: min + (i + 1) as f64 * width,
            count: 0,
        })
        .collect();

    for &v in values {
        let mut idx = ((v - min) / width) as usize;
        // The maximum lands exactly on the last edge; fold it into the
        // final (closed) bin.
        if idx >= HISTOGRAM_BINS {
            idx = HISTOGRAM_BINS - 1;
        }
        bins[idx].count += 1;
    }

    bins
}

/// Gaussian KDE sampled on a uniform grid, scaled to count units
/// (`density × n × bin_width`) so it overlays the bins directly.
///
/// Bandwidth is Scott's rule, `s · n^(−1/5)`. A constant column (s = 0) has
/// no meaningful density; the overlay is omitted.
fn density_overlay(values: &[f64], bin_width: f64) -> Vec<(f64, f64)> {
    let n = values.len();
    let s = sample_std(values);
    if n < 2 || !s.is_finite() || s == 0.0 {
        return Vec::new();
    }

    let h = s * (n as f64).powf(-0.2);
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for &v in values {
        min = min.min(v);
        max = max.max(v);
    }
    let lo = min - 3.0 * h;
    let hi = max + 3.0 * h;

    let scale = n as f64 * bin_width;
    let norm = 1.0 / ((n as f64) * h * (2.0 * std::f64::consts::PI).sqrt());

    let mut out = Vec::with_capacity(DENSITY_POINTS);
    for i in 0..DENSITY_POINTS {
        let u = i as f64 / (DENSITY_POINTS - 1) as f64;
        let x = lo + u * (hi - lo);
        let density: f64 = values
            .iter()
            .map(|&v| {
                let z = (x - v) / h;
                (-0.5 * z * z).exp()
            })
            .sum::<f64>()
            * norm;
        out.push((x, density * scale));
    }

    out
}

fn markers(summary: &DescriptiveSummary) -> Vec<Marker> {
    let candidates = [
        ("Mean", summary.mean),
        ("Median", summary.median),
        ("Mode", summary.mode),
    ];
    candidates
        .iter()
        .filter(|(_, v)| v.is_finite())
        .map(|(name, v)| Marker {
            value: *v,
            label: format!("{name}: {v:.2}"),
        })
        .collect()
}

fn five_number_box(category: &str, sorted: &[f64]) -> CategoryBox {
    let q1 = percentile(sorted, 25.0);
    let median = percentile(sorted, 50.0);
    let q3 = percentile(sorted, 75.0);
    let iqr = q3 - q1;
    let fence_low = q1 - WHISKER_IQR * iqr;
    let fence_high = q3 + WHISKER_IQR * iqr;

    // Whiskers clip to the most extreme observations inside the fences.
    let whisker_low = sorted
        .iter()
        .copied()
        .find(|&v| v >= fence_low)
        .unwrap_or(q1);
    let whisker_high = sorted
        .iter()
        .rev()
        .copied()
        .find(|&v| v <= fence_high)
        .unwrap_or(q3);

    let outliers = sorted
        .iter()
        .copied()
        .filter(|&v| v < fence_low || v > fence_high)
        .collect();

    CategoryBox {
        category: category.to_string(),
        whisker_low,
        q1,
        median,
        q3,
        whisker_high,
        outliers,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{SalesRecord, SalesTable};
    use crate::stats::describe::describe;

    fn table_of(rows: &[(&str, u64)]) -> SalesTable {
        SalesTable::new(
            rows.iter()
                .map(|&(category, units)| SalesRecord {
                    product_id: None,
                    product_name: None,
                    category: category.to_string(),
                    units_sold: units,
                    sale_date: None,
                })
                .collect(),
        )
    }

    #[test]
    fn histogram_bins_cover_all_values() {
        let table = table_of(&[
            ("Home", 10),
            ("Home", 12),
            ("Home", 15),
            ("Home", 20),
            ("Home", 30),
        ]);
        let spec = HistogramSpec::from_table(&table, &describe(&table));

        assert_eq!(spec.bins.len(), HISTOGRAM_BINS);
        let total: usize = spec.bins.iter().map(|b| b.count).sum();
        assert_eq!(total, 5, "every value must land in exactly one bin");

        // The maximum (30) belongs to the final, closed bin.
        assert_eq!(spec.bins[HISTOGRAM_BINS - 1].count, 1);
        assert_eq!(spec.markers.len(), 3);
        assert!(spec.markers[0].label.starts_with("Mean: "));
        assert!(!spec.density.is_empty());
    }

    #[test]
    fn histogram_of_empty_table_is_empty_not_panic() {
        let table = table_of(&[]);
        let spec = HistogramSpec::from_table(&table, &describe(&table));
        assert!(spec.is_empty());
        assert!(spec.markers.is_empty());
        assert!(spec.density.is_empty());
    }

    #[test]
    fn histogram_of_constant_column_has_no_density() {
        let table = table_of(&[("Home", 5), ("Home", 5), ("Home", 5)]);
        let spec = HistogramSpec::from_table(&table, &describe(&table));
        assert_eq!(spec.bins.iter().map(|b| b.count).sum::<usize>(), 3);
        assert!(
            spec.density.is_empty(),
            "zero spread must omit the density overlay"
        );
    }

    #[test]
    fn marker_labels_use_two_decimals() {
        let table = table_of(&[("Home", 1), ("Home", 2)]);
        let spec = HistogramSpec::from_table(&table, &describe(&table));
        assert!(spec.markers.iter().any(|m| m.label == "Mean: 1.50"));
    }

    #[test]
    fn boxplot_one_box_per_category_sorted() {
        let table = table_of(&[
            ("Sports", 10),
            ("Home", 1),
            ("Home", 2),
            ("Home", 3),
            ("Sports", 12),
        ]);
        let spec = BoxplotSpec::from_table(&table);
        let names: Vec<&str> = spec.boxes.iter().map(|b| b.category.as_str()).collect();
        assert_eq!(names, vec!["Home", "Sports"]);

        let home = &spec.boxes[0];
        assert!((home.median - 2.0).abs() < 1e-12);
        assert!(home.outliers.is_empty());
    }

    #[test]
    fn boxplot_flags_outliers_beyond_whiskers() {
        let table = table_of(&[
            ("Home", 10),
            ("Home", 11),
            ("Home", 12),
            ("Home", 13),
            ("Home", 100),
        ]);
        let spec = BoxplotSpec::from_table(&table);
        let home = &spec.boxes[0];
        assert_eq!(home.outliers, vec![100.0]);
        assert!((home.whisker_high - 13.0).abs() < 1e-12);
    }

    #[test]
    fn bars_aggregate_before_rendering() {
        let table = table_of(&[
            ("Sports", 10),
            ("Home", 1),
            ("Sports", 5),
            ("Clothing", 7),
        ]);
        let spec = BarSpec::from_table(&table);
        let pairs: Vec<(&str, u64)> = spec
            .totals
            .iter()
            .map(|t| (t.category.as_str(), t.total))
            .collect();
        assert_eq!(pairs, vec![("Clothing", 7), ("Home", 1), ("Sports", 15)]);
    }

    #[test]
    fn empty_table_makes_empty_specs() {
        let table = table_of(&[]);
        assert!(BoxplotSpec::from_table(&table).is_empty());
        assert!(BarSpec::from_table(&table).is_empty());
    }
}
