//! Deterministic synthetic sales sample.
//!
//! When no CSV is supplied the dashboard analyzes a small generated table.
//! Reproducibility is part of the contract: two independent generations must
//! be byte-identical, so the PRNG is a named algorithm (ChaCha8) with a fixed
//! seed and a documented draw order — all categories first, then all counts.

use chrono::{Days, NaiveDate};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use rand_distr::Poisson;

use crate::domain::{KNOWN_CATEGORIES, SalesRecord, SalesTable};
use crate::error::AppError;

/// Number of generated rows.
pub const SAMPLE_ROWS: usize = 20;

/// Fixed PRNG seed for the sample stream.
pub const SAMPLE_SEED: u64 = 42;

/// Mean of the Poisson distribution `units_sold` is drawn from.
pub const SAMPLE_POISSON_MEAN: f64 = 20.0;

/// Generate the built-in sample table.
///
/// Rows are `product_id` 1..=20 with names `Product {i}`, a category drawn
/// uniformly from `KNOWN_CATEGORIES`, `units_sold` ~ Poisson(20), and
/// consecutive daily `sale_date`s starting 2023-01-01.
pub fn generate_sample() -> Result<SalesTable, AppError> {
    let mut rng = ChaCha8Rng::seed_from_u64(SAMPLE_SEED);

    // Draw order is fixed: categories first, then counts. Reordering these
    // loops changes every generated table.
    let mut categories = Vec::with_capacity(SAMPLE_ROWS);
    for _ in 0..SAMPLE_ROWS {
        let idx = rng.gen_range(0..KNOWN_CATEGORIES.len());
        categories.push(KNOWN_CATEGORIES[idx]);
    }

    let poisson = Poisson::new(SAMPLE_POISSON_MEAN)
        .map_err(|e| AppError::internal(format!("Sample count distribution error: {e}")))?;
    let mut counts = Vec::with_capacity(SAMPLE_ROWS);
    for _ in 0..SAMPLE_ROWS {
        let draw: f64 = poisson.sample(&mut rng);
        counts.push(draw as u64);
    }

    let start = start_date();
    let mut records = Vec::with_capacity(SAMPLE_ROWS);
    for i in 0..SAMPLE_ROWS {
        let sale_date = start
            .checked_add_days(Days::new(i as u64))
            .ok_or_else(|| AppError::internal("Sample date overflow."))?;
        records.push(SalesRecord {
            product_id: Some((i + 1) as u32),
            product_name: Some(format!("Product {}", i + 1)),
            category: categories[i].to_string(),
            units_sold: counts[i],
            sale_date: Some(sale_date),
        });
    }

    Ok(SalesTable::new(records))
}

/// First `sale_date` of the generated sequence (2023-01-01).
fn start_date() -> NaiveDate {
    // Constant literal, always valid.
    NaiveDate::from_ymd_opt(2023, 1, 1).unwrap_or(NaiveDate::MIN)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generation_is_deterministic() {
        let a = generate_sample().unwrap();
        let b = generate_sample().unwrap();
        assert_eq!(a, b, "two generations must be byte-identical");
    }

    #[test]
    fn sample_shape() {
        let table = generate_sample().unwrap();
        assert_eq!(table.len(), SAMPLE_ROWS);

        for (i, r) in table.records.iter().enumerate() {
            assert_eq!(r.product_id, Some((i + 1) as u32));
            assert_eq!(r.product_name.as_deref(), Some(format!("Product {}", i + 1).as_str()));
            assert!(
                KNOWN_CATEGORIES.contains(&r.category.as_str()),
                "unexpected category {}",
                r.category
            );
        }

        let first = table.records[0].sale_date.unwrap();
        assert_eq!(first, NaiveDate::from_ymd_opt(2023, 1, 1).unwrap());
        let last = table.records[SAMPLE_ROWS - 1].sale_date.unwrap();
        assert_eq!(
            last,
            NaiveDate::from_ymd_opt(2023, 1, 20).unwrap(),
            "dates must be consecutive days"
        );
    }

    #[test]
    fn sample_counts_look_poisson_like() {
        // Not a distribution test; a guard against e.g. casting bugs that
        // would zero the column or blow it up.
        let table = generate_sample().unwrap();
        let mean =
            table.records.iter().map(|r| r.units_sold as f64).sum::<f64>() / SAMPLE_ROWS as f64;
        assert!(
            (10.0..=30.0).contains(&mean),
            "sample mean {mean} is implausible for Poisson(20)"
        );
    }
}
