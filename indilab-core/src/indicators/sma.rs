//! Simple Moving Average (SMA).
//!
//! Mean of the trailing `period` values, each window summed from scratch.
//! Lookback: period - 1 (first valid value at index period-1).

use crate::domain::SeriesBuffer;
use crate::error::EngineError;
use crate::primitives::{validate_period, windowed_reduce, Reducer};

#[derive(Debug, Clone, Copy)]
pub struct Sma {
    period: usize,
}

impl Sma {
    pub fn new(period: usize) -> Result<Self, EngineError> {
        validate_period("period", period)?;
        Ok(Self { period })
    }

    pub fn period(&self) -> usize {
        self.period
    }

    pub fn lookback(&self) -> usize {
        self.period - 1
    }

    pub fn compute(&self, input: &[f64]) -> Result<SeriesBuffer, EngineError> {
        windowed_reduce(input, self.period, Reducer::Mean)
    }
}
