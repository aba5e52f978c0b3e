//! Weighted Moving Average (WMA).
//!
//! Linear weights counted back from the current bar: the newest bar in the
//! window gets weight 1, the oldest gets `period`. Divisor is
//! `period * (period + 1) / 2`. Accumulated newest first.
//! Lookback: period - 1.

use crate::domain::SeriesBuffer;
use crate::error::EngineError;
use crate::primitives::{validate_period, windowed_map};

#[derive(Debug, Clone, Copy)]
pub struct Wma {
    period: usize,
}

impl Wma {
    pub fn new(period: usize) -> Result<Self, EngineError> {
        validate_period("period", period)?;
        Ok(Self { period })
    }

    pub fn lookback(&self) -> usize {
        self.period - 1
    }

    pub fn compute(&self, input: &[f64]) -> Result<SeriesBuffer, EngineError> {
        windowed_map(input, self.period, |_, window| {
            let mut weighted = 0.0;
            let mut weights = 0.0;
            for (j, &v) in window.iter().rev().enumerate() {
                let weight = (j + 1) as f64;
                weighted += v * weight;
                weights += weight;
            }
            weighted / weights
        })
    }
}
