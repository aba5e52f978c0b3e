//! Rolling least-squares linear regression.
//!
//! Over each window x = 0..period-1, y = the window values:
//!   slope     = (n·Σxy − Σx·Σy) / (n·Σx² − (Σx)²)
//!   intercept = (Σy − slope·Σx) / n
//!   value     = slope·(period − 1) + intercept
//!
//! With period 1 the slope denominator is zero and both outputs are NaN.
//! Lookback: period - 1.

use crate::domain::SeriesBuffer;
use crate::error::EngineError;
use crate::primitives::{validate_period, windowed_map};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegressionOutput {
    /// Line value at the newest bar of the window.
    Value,
    /// Line value at the oldest bar (x = 0).
    Intercept,
}

#[derive(Debug, Clone, Copy)]
pub struct LinearRegression {
    period: usize,
    output: RegressionOutput,
}

impl LinearRegression {
    pub fn new(period: usize, output: RegressionOutput) -> Result<Self, EngineError> {
        validate_period("period", period)?;
        Ok(Self { period, output })
    }

    pub fn lookback(&self) -> usize {
        self.period - 1
    }

    pub fn compute(&self, input: &[f64]) -> Result<SeriesBuffer, EngineError> {
        let n = self.period as f64;
        // Σx and Σx² over 0..period in closed form.
        let sum_x = n * (n - 1.0) / 2.0;
        let sum_x2 = (n - 1.0) * n * (2.0 * n - 1.0) / 6.0;
        let denom = n * sum_x2 - sum_x * sum_x;
        let last_x = (self.period - 1) as f64;
        let output = self.output;

        windowed_map(input, self.period, |_, window| {
            let (sum_y, sum_xy) = window
                .iter()
                .enumerate()
                .fold((0.0, 0.0), |(sy, sxy), (j, &y)| (sy + y, sxy + j as f64 * y));
            let slope = (n * sum_xy - sum_x * sum_y) / denom;
            let intercept = (sum_y - slope * sum_x) / n;
            match output {
                RegressionOutput::Value => slope * last_x + intercept,
                RegressionOutput::Intercept => intercept,
            }
        })
    }
}
