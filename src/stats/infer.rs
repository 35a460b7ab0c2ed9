//! Inferential statistics: confidence interval and one-sample t-test.
//!
//! Critical values and p-values come from the Student's t distribution with
//! n−1 degrees of freedom. With n ≤ 1 the standard error is undefined, so
//! every result degrades to NaN and the verdict to `InsufficientData` —
//! degenerate data must never abort an evaluation pass.

use statrs::distribution::{ContinuousCDF, StudentsT};

use crate::domain::{ConfidenceInterval, HypothesisTest, SalesTable, Verdict};
use crate::error::AppError;
use crate::stats::describe::{mean, sample_std};

/// Inferential outputs of one evaluation pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Inference {
    pub interval: ConfidenceInterval,
    pub test: HypothesisTest,
    pub verdict: Verdict,
}

/// Compute the confidence interval and one-sample t-test over `units_sold`.
///
/// `confidence_level` must be in (0, 1); `hypothesized_mean` must be finite.
/// Those are usage errors. Degenerate *data* (n ≤ 1) is not an error: the
/// results come back NaN.
pub fn infer(
    table: &SalesTable,
    confidence_level: f64,
    hypothesized_mean: f64,
) -> Result<Inference, AppError> {
    if !(confidence_level > 0.0 && confidence_level < 1.0) {
        return Err(AppError::input(format!(
            "Confidence level must be in (0, 1), got {confidence_level}."
        )));
    }
    if !hypothesized_mean.is_finite() {
        return Err(AppError::input("Hypothesized mean must be a finite number."));
    }

    let values = table.units_sold();
    let n = values.len();

    if n <= 1 {
        return Ok(Inference {
            interval: ConfidenceInterval::undefined(confidence_level),
            test: HypothesisTest {
                hypothesized_mean,
                t_stat: f64::NAN,
                p_value: f64::NAN,
            },
            verdict: Verdict::InsufficientData,
        });
    }

    let x_bar = mean(&values);
    let s = sample_std(&values);
    let se = s / (n as f64).sqrt();
    let df = (n - 1) as f64;

    let dist = StudentsT::new(0.0, 1.0, df)
        .map_err(|e| AppError::internal(format!("t-distribution error (df={df}): {e}")))?;

    // Two-tailed critical value at cumulative probability (1 + c) / 2.
    let t_crit = dist.inverse_cdf((1.0 + confidence_level) / 2.0);
    let margin = t_crit * se;
    let interval = ConfidenceInterval {
        level: confidence_level,
        lower: x_bar - margin,
        upper: x_bar + margin,
    };

    let (t_stat, p_value) = t_test(x_bar, hypothesized_mean, se, &dist);

    Ok(Inference {
        interval,
        test: HypothesisTest {
            hypothesized_mean,
            t_stat,
            p_value,
        },
        verdict: Verdict::from_p_value(p_value),
    })
}

/// One-sample t statistic and two-tailed p-value.
///
/// A zero standard error (constant column) would make the statistic 0/0; the
/// contract fixes that case by definition: equal means test as t = 0, p = 1,
/// unequal means as t = ±∞, p = 0.
fn t_test(x_bar: f64, hypothesized_mean: f64, se: f64, dist: &StudentsT) -> (f64, f64) {
    let diff = x_bar - hypothesized_mean;

    if se == 0.0 {
        if diff == 0.0 {
            return (0.0, 1.0);
        }
        return (diff.signum() * f64::INFINITY, 0.0);
    }

    let t = diff / se;
    let p = 2.0 * (1.0 - dist.cdf(t.abs()));
    (t, p)
}
