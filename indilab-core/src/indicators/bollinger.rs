//! Bollinger Bands.
//!
//! middle = SMA(x, period)
//! sd     = sqrt(Σ (x[i-j] - middle[i])² / period), population form
//! upper  = middle + sd * up
//! lower  = middle - sd * down
//!
//! `up` and `down` are both the `stdDev` multiplier unless overridden per side.
//! Lookback: period - 1 (all three bands NaN during warm-up).

use crate::domain::{IndicatorResult, SeriesBuffer};
use crate::error::EngineError;
use crate::primitives::{validate_period, windowed_reduce, Reducer};

#[derive(Debug, Clone, Copy)]
pub struct Bollinger {
    period: usize,
    dev_up: f64,
    dev_down: f64,
}

#[derive(Debug, Clone)]
pub struct BollingerOutput {
    pub middle: SeriesBuffer,
    pub upper: SeriesBuffer,
    pub lower: SeriesBuffer,
}

impl Bollinger {
    /// Symmetric bands at `std_dev` deviations.
    pub fn new(period: usize, std_dev: f64) -> Result<Self, EngineError> {
        Self::with_deviations(period, std_dev, std_dev)
    }

    /// Separate multipliers for the upper and lower band.
    pub fn with_deviations(period: usize, dev_up: f64, dev_down: f64) -> Result<Self, EngineError> {
        validate_period("period", period)?;
        if !dev_up.is_finite() {
            return Err(EngineError::invalid_parameter(
                "nbdevup",
                format!("must be finite, got {dev_up}"),
            ));
        }
        if !dev_down.is_finite() {
            return Err(EngineError::invalid_parameter(
                "nbdevdn",
                format!("must be finite, got {dev_down}"),
            ));
        }
        Ok(Self {
            period,
            dev_up,
            dev_down,
        })
    }

    pub fn lookback(&self) -> usize {
        self.period - 1
    }

    pub fn compute(&self, input: &[f64]) -> Result<BollingerOutput, EngineError> {
        let middle = windowed_reduce(input, self.period, Reducer::Mean)?;
        let variance = windowed_reduce(input, self.period, Reducer::Variance { center: &middle })?;
        let sd = variance.map(f64::sqrt);

        let upper = middle.zip_with(&sd, |m, s| m + s * self.dev_up);
        let lower = middle.zip_with(&sd, |m, s| m - s * self.dev_down);

        Ok(BollingerOutput {
            middle,
            upper,
            lower,
        })
    }
}

impl From<BollingerOutput> for IndicatorResult {
    fn from(out: BollingerOutput) -> Self {
        IndicatorResult::single(out.middle)
            .with_series("upper", out.upper)
            .with_series("lower", out.lower)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, DEFAULT_EPSILON};

    #[test]
    fn bollinger_warmup() {
        let out = Bollinger::new(3, 2.0)
            .unwrap()
            .compute(&[1.0, 2.0, 3.0, 4.0])
            .unwrap();
        for series in [&out.middle, &out.upper, &out.lower] {
            assert!(series[0].is_nan());
            assert!(series[1].is_nan());
            assert!(!series[2].is_nan());
        }
    }

    #[test]
    fn bollinger_known_values() {
        // Window [2,4,4,4,5,5,7,9]: mean 5, population sd 2
        let input = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let out = Bollinger::new(8, 2.0).unwrap().compute(&input).unwrap();
        assert_approx(out.middle[7], 5.0, DEFAULT_EPSILON);
        assert_approx(out.upper[7], 9.0, DEFAULT_EPSILON);
        assert_approx(out.lower[7], 1.0, DEFAULT_EPSILON);
    }

    #[test]
    fn bollinger_constant_series_collapses() {
        let out = Bollinger::new(3, 2.0).unwrap().compute(&[7.0; 5]).unwrap();
        for i in 2..5 {
            assert_eq!(out.upper[i], 7.0);
            assert_eq!(out.lower[i], 7.0);
        }
    }

    #[test]
    fn bollinger_symmetric_by_default() {
        let input = [10.0, 12.0, 11.0, 15.0, 13.0, 9.0, 14.0];
        let out = Bollinger::new(4, 1.5).unwrap().compute(&input).unwrap();
        for i in 3..input.len() {
            let up = out.upper[i] - out.middle[i];
            let down = out.middle[i] - out.lower[i];
            assert_approx(up, down, 1e-9);
        }
    }

    #[test]
    fn bollinger_per_side_overrides() {
        let input = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let out = Bollinger::with_deviations(8, 1.0, 3.0)
            .unwrap()
            .compute(&input)
            .unwrap();
        assert_approx(out.upper[7], 7.0, DEFAULT_EPSILON);
        assert_approx(out.lower[7], -1.0, DEFAULT_EPSILON);
    }

    #[test]
    fn bollinger_result_shape() {
        let out = Bollinger::new(2, 2.0).unwrap().compute(&[1.0, 3.0]).unwrap();
        let result = IndicatorResult::from(out);
        assert_approx(result.values[1], 2.0, DEFAULT_EPSILON);
        assert_approx(result.series("upper").unwrap()[1], 4.0, DEFAULT_EPSILON);
        assert_approx(result.series("lower").unwrap()[1], 0.0, DEFAULT_EPSILON);
    }

    #[test]
    fn bollinger_rejects_zero_period() {
        assert!(Bollinger::new(0, 2.0).is_err());
    }
}
