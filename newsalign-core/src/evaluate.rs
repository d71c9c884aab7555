//! Regression evaluation — seeded train/test split, OLS fit, test-set MSE.
//!
//! The single feature is daily sentiment and the target is the close price.
//! Every input row must already have a sentiment; resolving gaps is the
//! caller's job (see `resolve`).
//!
//! Partitioning:
//! - Row indices are shuffled with `StdRng::seed_from_u64(seed)`.
//! - The test set takes the first `floor(n · test_fraction)` shuffled indices.
//! - An empty test set or fewer than two training rows is `InsufficientData`.
//!
//! The same input, fraction, and seed always produce the same partition and
//! therefore bit-identical parameters and error.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::domain::{AlignedSeries, LinearModel, RegressionResult};
use crate::error::CoreError;

/// Absorbs representation error in `n · fraction` (e.g. 0.29 · 100).
const SPLIT_EPSILON: f64 = 1e-9;

/// Minimum rows needed to fit a line.
pub const MIN_TRAIN_ROWS: usize = 2;

/// Row indices of a train/test partition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Split {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

/// Deterministically partition `n` row indices.
pub fn train_test_split(n: usize, test_fraction: f64, seed: u64) -> Result<Split, CoreError> {
    if !test_fraction.is_finite() || test_fraction <= 0.0 || test_fraction >= 1.0 {
        return Err(CoreError::InvalidParameter(format!(
            "test_fraction must be in (0, 1), got {test_fraction}"
        )));
    }

    let n_test = (n as f64 * test_fraction + SPLIT_EPSILON).floor() as usize;
    if n_test == 0 {
        return Err(CoreError::InsufficientData {
            reason: format!(
                "test partition would be empty ({n} rows at test_fraction {test_fraction})"
            ),
        });
    }
    let n_train = n - n_test;
    if n_train < MIN_TRAIN_ROWS {
        return Err(CoreError::InsufficientData {
            reason: format!(
                "train partition has {n_train} rows, at least {MIN_TRAIN_ROWS} are needed to fit"
            ),
        });
    }

    let mut indices: Vec<usize> = (0..n).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let train = indices.split_off(n_test);
    Ok(Split {
        train,
        test: indices,
    })
}

/// Ordinary least squares for a single feature.
///
/// When every `x` is identical the slope is undefined; the fit degrades to
/// a flat line at the mean of `y`.
pub fn fit_ols(xs: &[f64], ys: &[f64]) -> Result<LinearModel, CoreError> {
    if xs.len() != ys.len() {
        return Err(CoreError::DimensionMismatch {
            expected: xs.len(),
            actual: ys.len(),
        });
    }
    if xs.is_empty() {
        return Err(CoreError::InsufficientData {
            reason: "cannot fit a line to zero rows".into(),
        });
    }

    let n = xs.len() as f64;
    let mean_x = xs.iter().sum::<f64>() / n;
    let mean_y = ys.iter().sum::<f64>() / n;

    let mut sxx = 0.0;
    let mut sxy = 0.0;
    for (x, y) in xs.iter().zip(ys) {
        let dx = x - mean_x;
        sxx += dx * dx;
        sxy += dx * (y - mean_y);
    }

    let constant_x = xs.iter().all(|&x| x == xs[0]);
    let slope = if constant_x || sxx == 0.0 { 0.0 } else { sxy / sxx };
    Ok(LinearModel {
        slope,
        intercept: mean_y - slope * mean_x,
    })
}

/// Mean of squared differences. Returns `None` for empty input.
pub fn mean_squared_error(actual: &[f64], predicted: &[f64]) -> Option<f64> {
    if actual.is_empty() || actual.len() != predicted.len() {
        return None;
    }
    let sum: f64 = actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| (a - p).powi(2))
        .sum();
    Some(sum / actual.len() as f64)
}

/// Split, fit on the train rows, and report MSE on the test rows.
pub fn fit_and_evaluate(
    aligned: &AlignedSeries,
    test_fraction: f64,
    seed: u64,
) -> Result<RegressionResult, CoreError> {
    if let Some(row) = aligned.first_missing() {
        return Err(CoreError::IncompleteRow { date: row.date });
    }
    for row in aligned.rows() {
        if !row.close.is_finite() {
            return Err(CoreError::NonFiniteValue {
                date: row.date,
                field: "close",
            });
        }
        if row.sentiment.is_some_and(|s| !s.is_finite()) {
            return Err(CoreError::NonFiniteValue {
                date: row.date,
                field: "sentiment",
            });
        }
    }

    let (xs, ys) = aligned.complete_pairs();
    if xs.len() != aligned.len() {
        return Err(CoreError::DimensionMismatch {
            expected: aligned.len(),
            actual: xs.len(),
        });
    }

    let split = train_test_split(xs.len(), test_fraction, seed)?;

    let train_x: Vec<f64> = split.train.iter().map(|&i| xs[i]).collect();
    let train_y: Vec<f64> = split.train.iter().map(|&i| ys[i]).collect();
    let model = fit_ols(&train_x, &train_y)?;

    let actual: Vec<f64> = split.test.iter().map(|&i| ys[i]).collect();
    let predicted: Vec<f64> = split.test.iter().map(|&i| model.predict(xs[i])).collect();
    let mse = mean_squared_error(&actual, &predicted).ok_or_else(|| {
        CoreError::InsufficientData {
            reason: "test partition is empty".into(),
        }
    })?;

    Ok(RegressionResult::new(
        model,
        mse,
        split.train.len(),
        split.test.len(),
    ))
}
