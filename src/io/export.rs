//! Export the current table to CSV.
//!
//! The export is the download counterpart of the ingest path: same header,
//! same row order, and `encode_csv` → `parse_sales_csv` round-trips to an
//! equivalent table.

use std::path::Path;

use crate::domain::SalesTable;
use crate::error::AppError;

/// Column order of the exported file (and of the recommended upload schema).
pub const CSV_HEADER: [&str; 5] = [
    "product_id",
    "product_name",
    "category",
    "units_sold",
    "sale_date",
];

/// Serialize the table to CSV bytes (header + rows, RFC 4180 quoting).
pub fn encode_csv(table: &SalesTable) -> Result<Vec<u8>, AppError> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer
        .write_record(CSV_HEADER)
        .map_err(|e| AppError::internal(format!("Failed to write CSV header: {e}")))?;

    for r in &table.records {
        let product_id = r.product_id.map(|v| v.to_string()).unwrap_or_default();
        let sale_date = r.sale_date.map(|d| d.to_string()).unwrap_or_default();
        writer
            .write_record([
                product_id.as_str(),
                r.product_name.as_deref().unwrap_or(""),
                r.category.as_str(),
                &r.units_sold.to_string(),
                sale_date.as_str(),
            ])
            .map_err(|e| AppError::internal(format!("Failed to write CSV row: {e}")))?;
    }

    writer
        .into_inner()
        .map_err(|e| AppError::internal(format!("Failed to flush CSV buffer: {e}")))
}

/// Write the table to a CSV file on disk.
pub fn write_table_csv(path: &Path, table: &SalesTable) -> Result<(), AppError> {
    let bytes = encode_csv(table)?;
    std::fs::write(path, bytes)
        .map_err(|e| AppError::input(format!("Failed to write CSV '{}': {e}", path.display())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SalesRecord;
    use crate::io::ingest::parse_sales_csv;
    use chrono::NaiveDate;

    fn full_record(id: u32, name: &str, category: &str, units: u64, day: u32) -> SalesRecord {
        SalesRecord {
            product_id: Some(id),
            product_name: Some(name.to_string()),
            category: category.to_string(),
            units_sold: units,
            sale_date: NaiveDate::from_ymd_opt(2023, 1, day),
        }
    }

    #[test]
    fn header_and_row_order_match_the_table() {
        let table = SalesTable::new(vec![
            full_record(2, "B", "Home", 5, 2),
            full_record(1, "A", "Sports", 9, 1),
        ]);
        let bytes = encode_csv(&table).unwrap();
        let text = String::from_utf8(bytes).unwrap();

        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("product_id,product_name,category,units_sold,sale_date")
        );
        assert_eq!(lines.next(), Some("2,B,Home,5,2023-01-02"));
        assert_eq!(lines.next(), Some("1,A,Sports,9,2023-01-01"));
    }

    #[test]
    fn round_trips_through_the_ingest_path() {
        let table = SalesTable::new(vec![
            full_record(1, "Widget", "Home", 20, 1),
            full_record(2, "Gadget, deluxe", "Sports", 0, 2),
            full_record(3, "Doohickey", "Clothing", 7, 3),
        ]);

        let bytes = encode_csv(&table).unwrap();
        let reparsed = parse_sales_csv(&bytes).unwrap();
        let refiltered = reparsed.filter_categories(&Default::default());

        assert_eq!(refiltered, table, "encode → parse must reproduce the table");
    }

    #[test]
    fn missing_optional_fields_round_trip_as_missing() {
        let table = SalesTable::new(vec![SalesRecord {
            product_id: None,
            product_name: None,
            category: "Home".to_string(),
            units_sold: 3,
            sale_date: None,
        }]);

        let bytes = encode_csv(&table).unwrap();
        let reparsed = parse_sales_csv(&bytes).unwrap();
        assert_eq!(reparsed, table);
    }

    #[test]
    fn empty_table_exports_header_only() {
        let bytes = encode_csv(&SalesTable::default()).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert_eq!(
            text.trim_end(),
            "product_id,product_name,category,units_sold,sale_date"
        );
    }
}
