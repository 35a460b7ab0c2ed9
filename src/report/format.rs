//! Terminal report formatting.

use crate::domain::{DescriptiveSummary, EvalConfig, SalesTable};
use crate::stats::infer::Inference;

/// Format the run header: source, filter, and dataset shape.
pub fn format_run_summary(table: &SalesTable, config: &EvalConfig) -> String {
    let mut out = String::new();

    out.push_str("=== sales - Sales Data Analysis ===\n");
    out.push_str(&format!("Source: {}\n", config.source.label()));

    if config.category_filter.is_empty() {
        out.push_str("Filter: (none)\n");
    } else {
        let labels: Vec<&str> = config.category_filter.iter().map(String::as_str).collect();
        out.push_str(&format!("Filter: {}\n", labels.join(", ")));
    }

    out.push_str(&format!(
        "Rows: {} | categories: {}\n",
        table.len(),
        table.categories().len()
    ));

    out
}

/// Format the raw table, one row per line.
pub fn format_table(table: &SalesTable) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "{:>10} {:<20} {:<12} {:>10} {:<10}\n",
        "product_id", "product_name", "category", "units_sold", "sale_date"
    ));
    out.push_str(&format!(
        "{:->10} {:-<20} {:-<12} {:->10} {:-<10}\n",
        "", "", "", "", ""
    ));

    for r in &table.records {
        let id = r
            .product_id
            .map(|v| v.to_string())
            .unwrap_or_else(|| "-".to_string());
        let date = r
            .sale_date
            .map(|d| d.to_string())
            .unwrap_or_else(|| "-".to_string());
        out.push_str(&format!(
            "{:>10} {:<20} {:<12} {:>10} {:<10}\n",
            id,
            truncate(r.product_name.as_deref().unwrap_or("-"), 20),
            truncate(&r.category, 12),
            r.units_sold,
            date,
        ));
    }

    if table.is_empty() {
        out.push_str("(no rows)\n");
    }

    out
}

/// Format the descriptive statistics block.
pub fn format_descriptive(summary: &DescriptiveSummary) -> String {
    let mut out = String::new();

    out.push_str("Descriptive statistics (units_sold):\n");
    out.push_str(&format!("  count : {}\n", summary.count));
    out.push_str(&format!("  mean  : {}\n", fmt_stat(summary.mean)));
    out.push_str(&format!("  std   : {}\n", fmt_stat(summary.std)));
    out.push_str(&format!("  min   : {}\n", fmt_stat(summary.min)));
    out.push_str(&format!("  25%   : {}\n", fmt_stat(summary.q1)));
    out.push_str(&format!("  50%   : {}\n", fmt_stat(summary.median)));
    out.push_str(&format!("  75%   : {}\n", fmt_stat(summary.q3)));
    out.push_str(&format!("  max   : {}\n", fmt_stat(summary.max)));
    out.push_str(&format!("  mode  : {}\n", fmt_stat(summary.mode)));

    out
}

/// Format the inferential statistics block: CI sentence, t-test sentence,
/// and the verdict.
pub fn format_inference(inference: &Inference) -> String {
    let mut out = String::new();

    let ci = &inference.interval;
    if ci.is_defined() {
        out.push_str(&format!(
            "{:.0}% Confidence Interval: ({:.2}, {:.2})\n",
            ci.level * 100.0,
            ci.lower,
            ci.upper
        ));
    } else {
        out.push_str(&format!(
            "{:.0}% Confidence Interval: insufficient data (need at least 2 rows)\n",
            ci.level * 100.0
        ));
    }

    let test = &inference.test;
    out.push_str(&format!(
        "t-test vs mean {}: t = {}, p = {}\n",
        fmt_stat(test.hypothesized_mean),
        fmt_t(test.t_stat),
        fmt_t(test.p_value),
    ));

    out.push_str(inference.verdict.sentence());
    out.push('\n');

    out
}

/// Two decimals, or "NaN" for undefined statistics.
fn fmt_stat(v: f64) -> String {
    if v.is_nan() {
        "NaN".to_string()
    } else {
        format!("{v:.2}")
    }
}

/// Four decimals for test statistics, or "NaN".
fn fmt_t(v: f64) -> String {
    if v.is_nan() {
        "NaN".to_string()
    } else {
        format!("{v:.4}")
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    for (i, ch) in s.chars().enumerate() {
        if i + 1 >= max {
            break;
        }
        out.push(ch);
    }
    out.push('.');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::EvalConfig;
    use crate::stats::infer::infer;
    use crate::domain::{SalesRecord, SalesTable};

    fn table_of(units: &[u64]) -> SalesTable {
        SalesTable::new(
            units
                .iter()
                .map(|&u| SalesRecord {
                    product_id: Some(1),
                    product_name: Some("Widget".to_string()),
                    category: "Home".to_string(),
                    units_sold: u,
                    sale_date: None,
                })
                .collect(),
        )
    }

    #[test]
    fn inference_sentences_for_known_scenario() {
        let table = table_of(&[18, 19, 20, 21, 22]);
        let inference = infer(&table, 0.95, 20.0).unwrap();
        let text = format_inference(&inference);

        assert!(text.contains("95% Confidence Interval: (18.04, 21.96)"), "{text}");
        assert!(text.contains("t = 0.0000, p = 1.0000"), "{text}");
        assert!(text.contains("Fail to reject the null hypothesis"), "{text}");
    }

    #[test]
    fn degenerate_statistics_render_as_nan_text() {
        let table = table_of(&[20]);
        let summary = crate::stats::describe::describe(&table);
        let text = format_descriptive(&summary);
        assert!(text.contains("count : 1"));
        assert!(text.contains("std   : NaN"), "{text}");

        let inference = infer(&table, 0.95, 20.0).unwrap();
        let inferred = format_inference(&inference);
        assert!(inferred.contains("insufficient data"), "{inferred}");
        assert!(inferred.contains("Insufficient data for a t-test"), "{inferred}");
    }

    #[test]
    fn table_rows_keep_source_order() {
        let text = format_table(&table_of(&[5, 9, 1]));
        let rows: Vec<&str> = text.lines().skip(2).collect();
        assert_eq!(rows.len(), 3);
        assert!(rows[0].contains(" 5 "));
        assert!(rows[2].contains(" 1 "));
    }

    #[test]
    fn run_summary_names_the_source() {
        let text = format_run_summary(&table_of(&[1]), &EvalConfig::default());
        assert!(text.contains("Source: synthetic sample"));
        assert!(text.contains("Filter: (none)"));
    }
}
