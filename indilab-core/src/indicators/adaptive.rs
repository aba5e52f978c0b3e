//! Adaptive moving averages: Kaufman (KAMA) and MESA (MAMA).
//!
//! Both pass the source through unchanged for the first
//! [`ADAPTIVE_WARMUP`] bars and then smooth recursively from the previous
//! output with a per-bar factor. Lookback: 0.

use crate::domain::SeriesBuffer;
use crate::error::EngineError;

/// Bars passed through before adaptation starts; also KAMA's
/// efficiency-ratio window.
pub const ADAPTIVE_WARMUP: usize = 10;

fn positive(name: &str, value: f64) -> Result<f64, EngineError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(EngineError::invalid_parameter(
            name,
            format!("must be a positive number, got {value}"),
        ))
    }
}

/// Kaufman Adaptive Moving Average.
///
/// ```text
/// ER  = |x[i] − x[i−10]| / Σ_{j=0..9} |x[i−j] − x[i−j−1]|
/// SC  = (ER · (2/(fast+1) − 2/(slow+1)) + 2/(slow+1))²
/// out = out[i−1] + SC · (x[i] − out[i−1])
/// ```
///
/// A window with no movement at all has ER 0, so the average creeps at the
/// slow constant instead of going undefined.
#[derive(Debug, Clone, Copy)]
pub struct Kama {
    fast: f64,
    slow: f64,
}

impl Kama {
    pub fn new(fast: f64, slow: f64) -> Result<Self, EngineError> {
        Ok(Self {
            fast: positive("fast", fast)?,
            slow: positive("slow", slow)?,
        })
    }

    pub fn compute(&self, input: &[f64]) -> SeriesBuffer {
        let fast_sc = 2.0 / (self.fast + 1.0);
        let slow_sc = 2.0 / (self.slow + 1.0);
        let mut out: Vec<f64> = Vec::with_capacity(input.len());

        for (i, &x) in input.iter().enumerate() {
            if i < ADAPTIVE_WARMUP {
                out.push(x);
                continue;
            }
            let change = (x - input[i - ADAPTIVE_WARMUP]).abs();
            let mut volatility = 0.0;
            for j in 0..ADAPTIVE_WARMUP {
                volatility += (input[i - j] - input[i - j - 1]).abs();
            }
            let er = if volatility == 0.0 { 0.0 } else { change / volatility };
            let sc = (er * (fast_sc - slow_sc) + slow_sc).powi(2);
            let prev = out[i - 1];
            out.push(prev + sc * (x - prev));
        }

        out.into()
    }
}

/// MESA Adaptive Moving Average, in its simplified single-stage form.
///
/// ```text
/// smooth    = (4x[i] + 3x[i−1] + 2x[i−2] + x[i−3]) / 10
/// detrender = 0.0962·smooth + 0.5769·(smooth − 2x[i−2] + x[i−4])
/// Q1        = 0.0962·detrender,  I1 = detrender − Q1
/// alpha     = exp(−4.6 · atan2(Q1, I1) / π), limited to [slow, fast]
/// out       = alpha·x[i] + (1 − alpha)·out[i−1]
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Mama {
    fast_limit: f64,
    slow_limit: f64,
}

impl Mama {
    pub fn new(fast_limit: f64, slow_limit: f64) -> Result<Self, EngineError> {
        for (name, value) in [("fastlimit", fast_limit), ("slowlimit", slow_limit)] {
            if !(value.is_finite() && value > 0.0 && value <= 1.0) {
                return Err(EngineError::invalid_parameter(
                    name,
                    format!("must be in (0, 1], got {value}"),
                ));
            }
        }
        Ok(Self {
            fast_limit,
            slow_limit,
        })
    }

    pub fn compute(&self, input: &[f64]) -> SeriesBuffer {
        let mut out: Vec<f64> = Vec::with_capacity(input.len());

        for (i, &x) in input.iter().enumerate() {
            if i < ADAPTIVE_WARMUP {
                out.push(x);
                continue;
            }
            let smooth = (4.0 * x + 3.0 * input[i - 1] + 2.0 * input[i - 2] + input[i - 3]) / 10.0;
            let detrender = 0.0962 * smooth + 0.5769 * (smooth - 2.0 * input[i - 2] + input[i - 4]);
            let q1 = 0.0962 * detrender;
            let i1 = detrender - q1;
            let phase = q1.atan2(i1);
            let alpha = (-4.6 * (phase / std::f64::consts::PI)).exp();

            // The limits may cross, which rules out f64::clamp. NaN passes through.
            let limited = if alpha.is_nan() {
                alpha
            } else {
                alpha.min(self.fast_limit).max(self.slow_limit)
            };
            out.push(limited * x + (1.0 - limited) * out[i - 1]);
        }

        out.into()
    }
}
