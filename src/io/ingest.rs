//! CSV ingest and validation.
//!
//! This module turns an uploaded sales CSV into a `SalesTable` that is safe
//! for every downstream computation.
//!
//! Design goals:
//! - **Strict schema** for required fields (clear errors + exit code 2)
//! - **No partial ingestion**: the first malformed row fails the whole file,
//!   with its 1-based line number in the message
//! - **Deterministic behavior** (no inference, no silent coercion)
//! - **Separation of concerns**: no statistics here

use std::collections::HashMap;

use chrono::NaiveDate;
use csv::StringRecord;

use crate::domain::{SalesRecord, SalesTable};
use crate::error::AppError;

/// Parse sales CSV bytes into a table.
///
/// Required columns: `units_sold` (non-negative integer) and `category`
/// (non-empty). `product_id`, `product_name`, and `sale_date` are optional,
/// but when present on a row they must parse.
pub fn parse_sales_csv(bytes: &[u8]) -> Result<SalesTable, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(bytes);

    let headers = reader
        .headers()
        .map_err(|e| AppError::input(format!("Failed to read CSV headers: {e}")))?
        .clone();
    let header_map = build_header_map(&headers);

    ensure_required_columns_exist(&header_map)?;

    let mut records = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        // +2 because records() starts after the header row and CSV line
        // numbers are 1-based.
        let line = idx + 2;

        let record = result
            .map_err(|e| AppError::input(format!("CSV parse error at line {line}: {e}")))?;

        let row = parse_row(&record, &header_map)
            .map_err(|message| AppError::input(format!("Line {line}: {message}")))?;
        records.push(row);
    }

    Ok(SalesTable::new(records))
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

fn normalize_header_name(name: &str) -> String {
    // Excel and other tools sometimes emit UTF-8 CSVs with a BOM prefix on
    // the first header (e.g. "﻿product_id"). If we don't strip it, schema
    // validation will incorrectly report missing columns.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.to_ascii_lowercase()
}

fn ensure_required_columns_exist(header_map: &HashMap<String, usize>) -> Result<(), AppError> {
    if !header_map.contains_key("units_sold") {
        return Err(AppError::input("Missing required column: `units_sold`"));
    }
    if !header_map.contains_key("category") {
        return Err(AppError::input("Missing required column: `category`"));
    }
    Ok(())
}

fn parse_row(
    record: &StringRecord,
    header_map: &HashMap<String, usize>,
) -> Result<SalesRecord, String> {
    let category = get_required(record, header_map, "category")?.to_string();
    let units_sold = parse_units(get_required(record, header_map, "units_sold")?)?;

    let product_id = match get_optional(record, header_map, "product_id") {
        Some(s) => Some(
            s.parse::<u32>()
                .map_err(|_| format!("Invalid `product_id` value '{s}' (expected a positive integer)."))?,
        ),
        None => None,
    };

    let product_name = get_optional(record, header_map, "product_name").map(str::to_string);

    let sale_date = match get_optional(record, header_map, "sale_date") {
        Some(s) => Some(parse_date(s)?),
        None => None,
    };

    Ok(SalesRecord {
        product_id,
        product_name,
        category,
        units_sold,
        sale_date,
    })
}

fn parse_units(s: &str) -> Result<u64, String> {
    if let Ok(v) = s.parse::<u64>() {
        return Ok(v);
    }
    // Spreadsheet exports often write integer columns as `20.0`. Accept the
    // integral float spelling, nothing else.
    if let Ok(v) = s.parse::<f64>() {
        if v.is_finite() && v >= 0.0 && v.fract() == 0.0 && v <= u64::MAX as f64 {
            return Ok(v as u64);
        }
    }
    Err(format!(
        "Invalid `units_sold` value '{s}' (expected a non-negative integer)."
    ))
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    // ISO dates (`YYYY-MM-DD`) are the documented format, but in practice
    // sales exports often use `DD/MM/YYYY` or `DD-MM-YYYY`. We accept a small
    // set of common formats to reduce friction while keeping parsing
    // deterministic.
    const FMTS: [&str; 4] = ["%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y", "%Y/%m/%d"];
    for fmt in FMTS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Ok(d);
        }
    }
    Err(format!(
        "Invalid `sale_date` '{s}'. Expected one of: YYYY-MM-DD, DD/MM/YYYY, DD-MM-YYYY, YYYY/MM/DD."
    ))
}

fn get_required<'a>(
    record: &'a StringRecord,
    header_map: &HashMap<String, usize>,
    name: &str,
) -> Result<&'a str, String> {
    let idx = header_map
        .get(name)
        .ok_or_else(|| format!("Missing required column: `{name}`"))?;
    record
        .get(*idx)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| format!("Missing required value: `{name}`"))
}

fn get_optional<'a>(
    record: &'a StringRecord,
    header_map: &HashMap<String, usize>,
    name: &str,
) -> Option<&'a str> {
    let idx = header_map.get(name)?;
    record.get(*idx).map(str::trim).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_well_formed_csv_in_order() {
        let csv = "product_id,product_name,category,units_sold,sale_date\n\
                   1,Widget,Home,20,2023-01-01\n\
                   2,Gadget,Sports,25,2023-01-02\n";
        let table = parse_sales_csv(csv.as_bytes()).unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(table.records[0].product_id, Some(1));
        assert_eq!(table.records[0].product_name.as_deref(), Some("Widget"));
        assert_eq!(table.records[0].category, "Home");
        assert_eq!(table.records[0].units_sold, 20);
        assert_eq!(
            table.records[0].sale_date,
            NaiveDate::from_ymd_opt(2023, 1, 1)
        );
        assert_eq!(table.records[1].category, "Sports");
    }

    #[test]
    fn missing_required_column_is_an_error() {
        let csv = "product_id,product_name,sale_date\n1,Widget,2023-01-01\n";
        let err = parse_sales_csv(csv.as_bytes()).unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().contains("units_sold"), "{err}");
    }

    #[test]
    fn non_numeric_units_fails_with_line_number() {
        let csv = "category,units_sold\nHome,20\nSports,lots\n";
        let err = parse_sales_csv(csv.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("Line 3"), "{err}");
        assert!(err.to_string().contains("units_sold"), "{err}");
    }

    #[test]
    fn negative_or_fractional_units_are_rejected() {
        for bad in ["-3", "2.5"] {
            let csv = format!("category,units_sold\nHome,{bad}\n");
            assert!(
                parse_sales_csv(csv.as_bytes()).is_err(),
                "'{bad}' must not parse as units_sold"
            );
        }
        // The integral float spelling is fine.
        let csv = "category,units_sold\nHome,20.0\n";
        let table = parse_sales_csv(csv.as_bytes()).unwrap();
        assert_eq!(table.records[0].units_sold, 20);
    }

    #[test]
    fn optional_fields_may_be_empty() {
        let csv = "product_id,product_name,category,units_sold,sale_date\n\
                   ,,Home,7,\n";
        let table = parse_sales_csv(csv.as_bytes()).unwrap();
        let r = &table.records[0];
        assert_eq!(r.product_id, None);
        assert_eq!(r.product_name, None);
        assert_eq!(r.sale_date, None);
        assert_eq!(r.units_sold, 7);
    }

    #[test]
    fn bom_header_is_tolerated() {
        let csv = "\u{feff}category,units_sold\nHome,1\n";
        let table = parse_sales_csv(csv.as_bytes()).unwrap();
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn alternate_date_formats_parse() {
        let csv = "category,units_sold,sale_date\nHome,1,31/12/2023\n";
        let table = parse_sales_csv(csv.as_bytes()).unwrap();
        assert_eq!(
            table.records[0].sale_date,
            NaiveDate::from_ymd_opt(2023, 12, 31)
        );
    }

    #[test]
    fn bad_date_fails_the_file() {
        let csv = "category,units_sold,sale_date\nHome,1,soon\n";
        assert!(parse_sales_csv(csv.as_bytes()).is_err());
    }
}
