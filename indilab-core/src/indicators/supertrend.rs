//! SuperTrend: ATR bands around the bar midpoint that flip with the trend.
//!
//! basic_upper = (high + low) / 2 + multiplier · ATR
//! basic_lower = (high + low) / 2 − multiplier · ATR
//!
//! The final upper band only moves down while the previous close stays at or
//! below it; the final lower band only moves up while the previous close
//! stays at or above it. The output is the lower band while trending up and
//! the upper band while trending down. A close through the active band flips
//! the trend.
//!
//! ATR here is the SMA of true range over `atr_period`. Output starts at bar
//! `period` (or the first defined ATR, if later), trending up.

use crate::domain::SeriesBuffer;
use crate::error::EngineError;
use crate::indicators::Atr;
use crate::primitives::validate_period;

#[derive(Debug, Clone, Copy)]
pub struct Supertrend {
    period: usize,
    atr: Atr,
    multiplier: f64,
}

impl Supertrend {
    pub fn new(period: usize, atr_period: usize, multiplier: f64) -> Result<Self, EngineError> {
        validate_period("period", period)?;
        let atr = Atr::new(atr_period).map_err(|_| {
            EngineError::invalid_parameter("atr_period", format!("must be >= 1, got {atr_period}"))
        })?;
        if !multiplier.is_finite() {
            return Err(EngineError::invalid_parameter(
                "multiplier",
                format!("must be finite, got {multiplier}"),
            ));
        }
        Ok(Self {
            period,
            atr,
            multiplier,
        })
    }

    pub fn lookback(&self) -> usize {
        self.period.max(self.atr.lookback())
    }

    pub fn compute(&self, high: &[f64], low: &[f64], close: &[f64]) -> Result<SeriesBuffer, EngineError> {
        let n = close.len();
        let mut result = vec![f64::NAN; n];
        let atr = self.atr.compute(high, low, close)?;

        let start = match (self.period..n).find(|&i| !atr[i].is_nan()) {
            Some(i) => i,
            None => return Ok(result.into()),
        };

        let mid = (high[start] + low[start]) / 2.0;
        let mut upper_band = mid + self.multiplier * atr[start];
        let mut lower_band = mid - self.multiplier * atr[start];
        let mut trending_up = true;
        result[start] = lower_band;

        for i in (start + 1)..n {
            if atr[i].is_nan() || close[i].is_nan() || high[i].is_nan() || low[i].is_nan() {
                continue;
            }

            let mid = (high[i] + low[i]) / 2.0;
            let basic_upper = mid + self.multiplier * atr[i];
            let basic_lower = mid - self.multiplier * atr[i];

            let prev_close = close[i - 1];
            upper_band = if !prev_close.is_nan() && prev_close <= upper_band {
                basic_upper.min(upper_band)
            } else {
                basic_upper
            };
            lower_band = if !prev_close.is_nan() && prev_close >= lower_band {
                basic_lower.max(lower_band)
            } else {
                basic_lower
            };

            if trending_up && close[i] < lower_band {
                trending_up = false;
            } else if !trending_up && close[i] > upper_band {
                trending_up = true;
            }

            result[i] = if trending_up { lower_band } else { upper_band };
        }

        Ok(result.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trend(n: usize, step: f64) -> (Vec<f64>, Vec<f64>, Vec<f64>) {
        let close: Vec<f64> = (0..n).map(|i| 100.0 + i as f64 * step).collect();
        let high = close.iter().map(|c| c + 1.0).collect();
        let low = close.iter().map(|c| c - 1.0).collect();
        (high, low, close)
    }

    #[test]
    fn uptrend_stays_below_price() {
        let (high, low, close) = trend(30, 2.0);
        let out = Supertrend::new(5, 5, 3.0).unwrap().compute(&high, &low, &close).unwrap();
        assert_eq!(out.leading_undefined(), 5);
        for i in 5..30 {
            assert!(out[i] < close[i], "bar {i}: {} >= {}", out[i], close[i]);
        }
    }

    #[test]
    fn downtrend_flips_above_price() {
        let (high, low, close) = trend(40, -2.0);
        let out = Supertrend::new(5, 5, 1.0).unwrap().compute(&high, &low, &close).unwrap();
        let last = out[39];
        assert!(last > close[39], "expected resistance above close, got {last}");
    }

    #[test]
    fn warmup_follows_the_longer_of_period_and_atr() {
        let (high, low, close) = trend(20, 1.0);
        let out = Supertrend::new(3, 8, 3.0).unwrap().compute(&high, &low, &close).unwrap();
        assert_eq!(out.leading_undefined(), 7);
        assert_eq!(Supertrend::new(3, 8, 3.0).unwrap().lookback(), 7);
    }

    #[test]
    fn short_series_is_undefined() {
        let (high, low, close) = trend(4, 1.0);
        let out = Supertrend::new(10, 10, 3.0).unwrap().compute(&high, &low, &close).unwrap();
        assert!(out.iter().all(|v| v.is_nan()));
    }

    #[test]
    fn invalid_parameters_name_the_culprit() {
        assert!(matches!(
            Supertrend::new(10, 0, 3.0),
            Err(EngineError::InvalidParameter { ref name, .. }) if name == "atr_period"
        ));
        assert!(matches!(
            Supertrend::new(10, 10, f64::INFINITY),
            Err(EngineError::InvalidParameter { ref name, .. }) if name == "multiplier"
        ));
    }
}
