//! Triangular Moving Average (TRIMA): an SMA of an SMA.
//!
//! Both passes use `m = ceil(period / 2)`, which weights the middle of the
//! window most. Lookback: 2 * (m - 1).

use crate::domain::SeriesBuffer;
use crate::error::EngineError;
use crate::indicators::Sma;
use crate::primitives::validate_period;

#[derive(Debug, Clone, Copy)]
pub struct Trima {
    inner: Sma,
}

impl Trima {
    pub fn new(period: usize) -> Result<Self, EngineError> {
        validate_period("period", period)?;
        Ok(Self {
            inner: Sma::new(period.div_ceil(2))?,
        })
    }

    pub fn lookback(&self) -> usize {
        2 * self.inner.lookback()
    }

    pub fn compute(&self, input: &[f64]) -> Result<SeriesBuffer, EngineError> {
        let first = self.inner.compute(input)?;
        self.inner.compute(&first)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::assert_series;

    #[test]
    fn trima_on_ramp() {
        // period 5 → m = 3
        // SMA3: [_, _, 2, 3, 4, 5]; SMA3 again: [_, _, _, _, 3, 4]
        let out = Trima::new(5)
            .unwrap()
            .compute(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0])
            .unwrap();
        assert_series(&out, &[f64::NAN, f64::NAN, f64::NAN, f64::NAN, 3.0, 4.0]);
    }

    #[test]
    fn trima_lookback() {
        assert_eq!(Trima::new(5).unwrap().lookback(), 4);
        assert_eq!(Trima::new(4).unwrap().lookback(), 2);
        assert_eq!(Trima::new(1).unwrap().lookback(), 0);
    }
}
