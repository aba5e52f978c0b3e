//! True Range and Average True Range (ATR).
//!
//! TR[0] = high - low
//! TR[t] = max(high - low, |high - close[t-1]|, |low - close[t-1]|)
//! ATR   = SMA(TR, period). Lookback: period - 1.
//!
//! The TRANGE indicator is the raw series, or its SMA when `smoothing` > 1.

use crate::domain::SeriesBuffer;
use crate::error::EngineError;
use crate::indicators::Sma;
use crate::primitives::validate_period;

/// Bar-by-bar true range. Any NaN input at `t` (or a NaN previous close)
/// makes `TR[t]` NaN; `f64::max` alone would silently drop it.
pub fn true_range(high: &[f64], low: &[f64], close: &[f64]) -> SeriesBuffer {
    let n = high.len().min(low.len()).min(close.len());
    let mut out = Vec::with_capacity(n);
    for t in 0..n {
        let range = high[t] - low[t];
        if t == 0 {
            out.push(range);
            continue;
        }
        let prev = close[t - 1];
        let up = (high[t] - prev).abs();
        let down = (low[t] - prev).abs();
        if range.is_nan() || up.is_nan() || down.is_nan() {
            out.push(f64::NAN);
        } else {
            out.push(range.max(up).max(down));
        }
    }
    out.into()
}

#[derive(Debug, Clone, Copy)]
pub struct Atr {
    sma: Sma,
}

impl Atr {
    pub fn new(period: usize) -> Result<Self, EngineError> {
        Ok(Self {
            sma: Sma::new(period)?,
        })
    }

    pub fn lookback(&self) -> usize {
        self.sma.lookback()
    }

    pub fn compute(&self, high: &[f64], low: &[f64], close: &[f64]) -> Result<SeriesBuffer, EngineError> {
        let tr = true_range(high, low, close);
        self.sma.compute(&tr)
    }
}

/// True range as an indicator: raw, or smoothed by an SMA of `smoothing` bars.
#[derive(Debug, Clone, Copy)]
pub struct TrueRange {
    smoothing: Option<Sma>,
}

impl TrueRange {
    pub fn new(smoothing: usize) -> Result<Self, EngineError> {
        validate_period("smoothing", smoothing)?;
        let smoothing = if smoothing > 1 { Some(Sma::new(smoothing)?) } else { None };
        Ok(Self { smoothing })
    }

    pub fn lookback(&self) -> usize {
        self.smoothing.map_or(0, |sma| sma.lookback())
    }

    pub fn compute(&self, high: &[f64], low: &[f64], close: &[f64]) -> Result<SeriesBuffer, EngineError> {
        let tr = true_range(high, low, close);
        match self.smoothing {
            Some(sma) => sma.compute(&tr),
            None => Ok(tr),
        }
    }
}
