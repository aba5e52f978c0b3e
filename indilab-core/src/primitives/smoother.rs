//! Exponential recursion shared by EMA, MACD, DEMA and TEMA.
//!
//! `out[0] = in[0]`, `out[i] = in[i] * k + out[i-1] * (1 - k)` with
//! `k = 2 / (period + 1)`. The seed is the first raw observation, so the
//! output is defined from index 0 (unless the input itself is NaN there).

use crate::domain::SeriesBuffer;
use crate::error::EngineError;
use crate::primitives::window::validate_period;

#[derive(Debug, Clone, Copy)]
pub struct RecursiveSmoother {
    period: usize,
    multiplier: f64,
}

impl RecursiveSmoother {
    pub fn new(period: usize) -> Result<Self, EngineError> {
        validate_period("period", period)?;
        Ok(Self {
            period,
            multiplier: 2.0 / (period as f64 + 1.0),
        })
    }

    pub fn period(&self) -> usize {
        self.period
    }

    pub fn multiplier(&self) -> f64 {
        self.multiplier
    }

    /// Smooth an input slice. Empty input gives an empty buffer.
    pub fn smooth(&self, input: &[f64]) -> SeriesBuffer {
        let k = self.multiplier;
        let mut out = Vec::with_capacity(input.len());
        let mut prev = f64::NAN;
        for (i, &x) in input.iter().enumerate() {
            let v = if i == 0 { x } else { x * k + prev * (1.0 - k) };
            out.push(v);
            prev = v;
        }
        out.into()
    }
}
