//! Stochastic oscillator.
//!
//! %K = 100 * (close - LL) / (HH - LL) over the trailing `period` bars,
//! where HH/LL are the highest high and lowest low. A flat window
//! (HH == LL) gives 50.
//!
//! Fast: values = %K, %D = SMA(%K, 3).
//! Slow: %K is smoothed with SMA(3) first; values = %D = SMA(smoothed, 3).

use std::fmt;
use std::str::FromStr;

use crate::domain::{IndicatorResult, SeriesBuffer};
use crate::error::EngineError;
use crate::indicators::Sma;
use crate::primitives::validate_period;

const SMOOTHING: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StochasticType {
    #[default]
    Fast,
    Slow,
}

impl StochasticType {
    pub fn as_str(self) -> &'static str {
        match self {
            StochasticType::Fast => "fast",
            StochasticType::Slow => "slow",
        }
    }
}

impl fmt::Display for StochasticType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StochasticType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fast" => Ok(StochasticType::Fast),
            "slow" => Ok(StochasticType::Slow),
            other => Err(format!("unknown stochastic type '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Stochastic {
    period: usize,
    kind: StochasticType,
}

#[derive(Debug, Clone)]
pub struct StochasticOutput {
    pub kind: StochasticType,
    /// Raw %K (never smoothed, even for the slow type).
    pub k: SeriesBuffer,
    pub d: SeriesBuffer,
}

impl Stochastic {
    pub fn new(period: usize, kind: StochasticType) -> Result<Self, EngineError> {
        validate_period("period", period)?;
        Ok(Self { period, kind })
    }

    pub fn lookback(&self) -> usize {
        let k = self.period - 1;
        match self.kind {
            StochasticType::Fast => k + (SMOOTHING - 1),
            StochasticType::Slow => k + 2 * (SMOOTHING - 1),
        }
    }

    pub fn compute(
        &self,
        high: &[f64],
        low: &[f64],
        close: &[f64],
    ) -> Result<StochasticOutput, EngineError> {
        let n = close.len().min(high.len()).min(low.len());
        let mut k = vec![f64::NAN; n];

        if n >= self.period {
            for i in (self.period - 1)..n {
                let start = i + 1 - self.period;
                let hh = highest(&high[start..=i]);
                let ll = lowest(&low[start..=i]);
                k[i] = if hh == ll {
                    50.0
                } else {
                    (close[i] - ll) / (hh - ll) * 100.0
                };
            }
        }

        let k = SeriesBuffer::from(k);
        let sma = Sma::new(SMOOTHING)?;
        let d = match self.kind {
            StochasticType::Fast => sma.compute(&k)?,
            StochasticType::Slow => sma.compute(&sma.compute(&k)?)?,
        };

        Ok(StochasticOutput {
            kind: self.kind,
            k,
            d,
        })
    }
}

/// Maximum of the window; NaN if any element is NaN.
fn highest(window: &[f64]) -> f64 {
    window.iter().try_fold(f64::NEG_INFINITY, |acc, &v| {
        if v.is_nan() {
            None
        } else {
            Some(acc.max(v))
        }
    })
    .unwrap_or(f64::NAN)
}

/// Minimum of the window; NaN if any element is NaN.
fn lowest(window: &[f64]) -> f64 {
    window.iter().try_fold(f64::INFINITY, |acc, &v| {
        if v.is_nan() {
            None
        } else {
            Some(acc.min(v))
        }
    })
    .unwrap_or(f64::NAN)
}

impl From<StochasticOutput> for IndicatorResult {
    fn from(out: StochasticOutput) -> Self {
        let values = match out.kind {
            StochasticType::Fast => out.k.clone(),
            StochasticType::Slow => out.d.clone(),
        };
        IndicatorResult::single(values)
            .with_series("kValues", out.k)
            .with_series("dValues", out.d)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, assert_series, DEFAULT_EPSILON};

    fn bars() -> (Vec<f64>, Vec<f64>, Vec<f64>) {
        let high = vec![10.0, 12.0, 14.0, 13.0, 15.0, 16.0];
        let low = vec![8.0, 9.0, 11.0, 10.0, 12.0, 13.0];
        let close = vec![9.0, 11.0, 13.0, 11.0, 14.0, 15.0];
        (high, low, close)
    }

    #[test]
    fn fast_k_known_value() {
        let (h, l, c) = bars();
        let out = Stochastic::new(3, StochasticType::Fast)
            .unwrap()
            .compute(&h, &l, &c)
            .unwrap();
        assert!(out.k[1].is_nan());
        // Window 0..=2: HH 14, LL 8, close 13 → 100 * 5/6
        assert_approx(out.k[2], 500.0 / 6.0, DEFAULT_EPSILON);
        // Window 1..=3: HH 14, LL 9, close 11 → 40
        assert_approx(out.k[3], 40.0, DEFAULT_EPSILON);
    }

    #[test]
    fn flat_window_is_fifty() {
        let flat = [5.0; 4];
        let out = Stochastic::new(2, StochasticType::Fast)
            .unwrap()
            .compute(&flat, &flat, &flat)
            .unwrap();
        assert_series(&out.k, &[f64::NAN, 50.0, 50.0, 50.0]);
    }

    #[test]
    fn fast_d_is_sma3_of_k() {
        let (h, l, c) = bars();
        let out = Stochastic::new(3, StochasticType::Fast)
            .unwrap()
            .compute(&h, &l, &c)
            .unwrap();
        assert!(out.d[3].is_nan());
        let expected = (out.k[2] + out.k[3] + out.k[4]) / 3.0;
        assert_approx(out.d[4], expected, DEFAULT_EPSILON);
    }

    #[test]
    fn slow_smooths_before_d() {
        let (h, l, c) = bars();
        let out = Stochastic::new(2, StochasticType::Slow)
            .unwrap()
            .compute(&h, &l, &c)
            .unwrap();
        // K defined from 1, smoothed K from 3, D from 5
        assert!(out.d[4].is_nan());
        assert!(!out.d[5].is_nan());
        let result = IndicatorResult::from(out.clone());
        assert!(result.values.same_values(&out.d));
    }

    #[test]
    fn result_values_follow_type() {
        let (h, l, c) = bars();
        let out = Stochastic::new(3, StochasticType::Fast)
            .unwrap()
            .compute(&h, &l, &c)
            .unwrap();
        let result = IndicatorResult::from(out.clone());
        assert!(result.values.same_values(&out.k));
        assert!(result.series("kValues").is_some());
        assert!(result.series("dValues").is_some());
    }

    #[test]
    fn nan_high_poisons_window() {
        let high = [10.0, f64::NAN, 12.0, 13.0];
        let low = [8.0, 8.0, 9.0, 10.0];
        let close = [9.0, 9.0, 11.0, 12.0];
        let out = Stochastic::new(2, StochasticType::Fast)
            .unwrap()
            .compute(&high, &low, &close)
            .unwrap();
        assert!(out.k[1].is_nan());
        assert!(out.k[2].is_nan());
        assert!(!out.k[3].is_nan());
    }

    #[test]
    fn type_parses() {
        assert_eq!("SLOW".parse::<StochasticType>(), Ok(StochasticType::Slow));
        assert!("medium".parse::<StochasticType>().is_err());
    }

    #[test]
    fn lookback_matches_warmup() {
        let (h, l, c) = bars();
        let s = Stochastic::new(2, StochasticType::Slow).unwrap();
        let out = s.compute(&h, &l, &c).unwrap();
        assert_eq!(out.d.leading_undefined(), s.lookback());
    }
}
