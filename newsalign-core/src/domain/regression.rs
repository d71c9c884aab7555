//! Fitted model and evaluation outcome.

use serde::{Deserialize, Serialize};

/// Single-feature line `price ≈ slope · sentiment + intercept`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearModel {
    pub slope: f64,
    pub intercept: f64,
}

impl LinearModel {
    pub fn predict(&self, sentiment: f64) -> f64 {
        self.slope * sentiment + self.intercept
    }
}

/// Outcome of one fit-and-evaluate run. Fields are read-only once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionResult {
    model: LinearModel,
    mean_squared_error: f64,
    train_size: usize,
    test_size: usize,
}

impl RegressionResult {
    pub(crate) fn new(
        model: LinearModel,
        mean_squared_error: f64,
        train_size: usize,
        test_size: usize,
    ) -> Self {
        Self {
            model,
            mean_squared_error,
            train_size,
            test_size,
        }
    }

    pub fn model(&self) -> LinearModel {
        self.model
    }

    pub fn slope(&self) -> f64 {
        self.model.slope
    }

    pub fn intercept(&self) -> f64 {
        self.model.intercept
    }

    pub fn mean_squared_error(&self) -> f64 {
        self.mean_squared_error
    }

    pub fn train_size(&self) -> usize {
        self.train_size
    }

    pub fn test_size(&self) -> usize {
        self.test_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn predict_applies_line() {
        let model = LinearModel { slope: 2.0, intercept: 100.0 };
        assert_eq!(model.predict(0.5), 101.0);
        assert_eq!(model.predict(-1.0), 98.0);
    }

    #[test]
    fn result_serialization_roundtrip() {
        let result = RegressionResult::new(LinearModel { slope: 1.5, intercept: 99.0 }, 0.25, 8, 2);
        let json = serde_json::to_string(&result).unwrap();
        let back: RegressionResult = serde_json::from_str(&json).unwrap();
        assert_eq!(result, back);
    }
}
