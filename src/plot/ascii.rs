//! ASCII/Unicode chart rendering for terminal output.
//!
//! This is intentionally "dumb" (fixed-width rows), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Chart elements:
//! - histogram/bar rows: `#` runs scaled to the widest row
//! - boxplot rows: `-` whiskers, `=` box, `|` median, `o` outliers

use crate::chart::{BarSpec, BoxplotSpec, HistogramSpec};

const EMPTY_PLACEHOLDER: &str = "  (no data)";

/// Render the binned distribution with its central-tendency markers.
pub fn render_histogram(spec: &HistogramSpec, width: usize) -> String {
    let width = width.max(10);
    let mut out = String::new();
    out.push_str("Distribution of Units Sold\n");

    if spec.is_empty() {
        out.push_str(EMPTY_PLACEHOLDER);
        out.push('\n');
        return out;
    }

    let max_count = spec.max_count().max(1);
    for bin in &spec.bins {
        let bar_len = (bin.count * width).div_ceil(max_count);
        out.push_str(&format!(
            "[{:>7.2}, {:>7.2})  {}{} {}\n",
            bin.left,
            bin.right,
            "#".repeat(bar_len),
            " ".repeat(width.saturating_sub(bar_len)),
            bin.count,
        ));
    }

    if !spec.markers.is_empty() {
        let labels: Vec<&str> = spec.markers.iter().map(|m| m.label.as_str()).collect();
        out.push_str(&format!("markers: {}\n", labels.join(" | ")));
    }

    out
}

/// Render one five-number box per category on a shared horizontal axis.
pub fn render_boxplot(spec: &BoxplotSpec, width: usize) -> String {
    let width = width.max(20);
    let mut out = String::new();
    out.push_str("Units Sold by Category\n");

    let Some((lo, hi)) = spec.value_range() else {
        out.push_str(EMPTY_PLACEHOLDER);
        out.push('\n');
        return out;
    };
    let (lo, hi) = pad_range(lo, hi);

    let label_width = spec
        .boxes
        .iter()
        .map(|b| b.category.chars().count())
        .max()
        .unwrap_or(0);

    for b in &spec.boxes {
        let mut row = vec![' '; width];

        let x_lo = map_x(b.whisker_low, lo, hi, width);
        let x_q1 = map_x(b.q1, lo, hi, width);
        let x_q3 = map_x(b.q3, lo, hi, width);
        let x_hi = map_x(b.whisker_high, lo, hi, width);

        for cell in row.iter_mut().take(x_hi + 1).skip(x_lo) {
            *cell = '-';
        }
        for cell in row.iter_mut().take(x_q3 + 1).skip(x_q1) {
            *cell = '=';
        }
        row[map_x(b.median, lo, hi, width)] = '|';
        for &o in &b.outliers {
            row[map_x(o, lo, hi, width)] = 'o';
        }

        out.push_str(&format!(
            "{:<label_width$}  {}  {:.1}/{:.1}/{:.1}\n",
            b.category,
            row.iter().collect::<String>(),
            b.q1,
            b.median,
            b.q3,
        ));
    }

    out.push_str(&format!(
        "{:<label_width$}  {:<left$.1}{:>right$.1}\n",
        "",
        lo,
        hi,
        left = width / 2,
        right = width - width / 2,
    ));

    out
}

/// Render per-category totals as horizontal bars.
pub fn render_bars(spec: &BarSpec, width: usize) -> String {
    let width = width.max(10);
    let mut out = String::new();
    out.push_str("Total Units Sold by Category\n");

    if spec.is_empty() {
        out.push_str(EMPTY_PLACEHOLDER);
        out.push('\n');
        return out;
    }

    let max_total = spec.max_total().max(1);
    let label_width = spec
        .totals
        .iter()
        .map(|t| t.category.chars().count())
        .max()
        .unwrap_or(0);

    for t in &spec.totals {
        let bar_len = ((t.total as usize) * width).div_ceil(max_total as usize);
        out.push_str(&format!(
            "{:<label_width$}  {}{} {}\n",
            t.category,
            "#".repeat(bar_len),
            " ".repeat(width.saturating_sub(bar_len)),
            t.total,
        ));
    }

    out
}

fn pad_range(lo: f64, hi: f64) -> (f64, f64) {
    if hi - lo > 0.0 {
        (lo, hi)
    } else {
        (lo - 0.5, hi + 0.5)
    }
}

fn map_x(value: f64, lo: f64, hi: f64, width: usize) -> usize {
    let u = ((value - lo) / (hi - lo)).clamp(0.0, 1.0);
    ((u * (width - 1) as f64).round() as usize).min(width - 1)
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
    fn histogram_lists_every_bin_and_markers() {
        let table = table_of(&[("Home", 10), ("Home", 12), ("Home", 30)]);
        let spec = HistogramSpec::from_table(&table, &describe(&table));
        let text = render_histogram(&spec, 40);

        assert_eq!(text.lines().count(), 1 + 10 + 1, "title + bins + markers");
        assert!(text.contains("markers: Mean: 17.33"), "{text}");
    }

    #[test]
    fn empty_specs_render_placeholders() {
        let empty = table_of(&[]);
        let hist = HistogramSpec::from_table(&empty, &describe(&empty));
        assert!(render_histogram(&hist, 40).contains("(no data)"));
        assert!(render_boxplot(&BoxplotSpec::from_table(&empty), 40).contains("(no data)"));
        assert!(render_bars(&BarSpec::from_table(&empty), 40).contains("(no data)"));
    }

    #[test]
    fn bars_scale_to_the_largest_total() {
        let table = table_of(&[("Home", 10), ("Sports", 5)]);
        let text = render_bars(&BarSpec::from_table(&table), 20);

        let home_line = text.lines().find(|l| l.starts_with("Home")).unwrap();
        let sports_line = text.lines().find(|l| l.starts_with("Sports")).unwrap();
        assert_eq!(home_line.matches('#').count(), 20);
        assert_eq!(sports_line.matches('#').count(), 10);
        assert!(home_line.trim_end().ends_with("10"));
    }

    #[test]
    fn boxplot_marks_median_inside_the_box() {
        let table = table_of(&[("Home", 1), ("Home", 2), ("Home", 3), ("Home", 9)]);
        let text = render_boxplot(&BoxplotSpec::from_table(&table), 40);
        let row = text.lines().nth(1).unwrap();
        assert!(row.contains('='), "{row}");
        assert!(row.contains('|'), "{row}");
    }

    #[test]
    fn rendering_is_deterministic() {
        let table = table_of(&[("Home", 3), ("Sports", 8), ("Home", 5)]);
        let spec = BarSpec::from_table(&table);
        assert_eq!(render_bars(&spec, 30), render_bars(&spec, 30));
    }
}
