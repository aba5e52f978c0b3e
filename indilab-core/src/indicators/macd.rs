//! Moving Average Convergence Divergence (MACD).
//!
//! macd_line   = EMA(x, fast) - EMA(x, slow)
//! signal_line = EMA(macd_line, signal)
//! histogram   = macd_line - signal_line
//!
//! All three EMAs are seeded with their first input, so every series is
//! defined from index 0 for finite input.

use std::collections::BTreeMap;

use crate::domain::{IndicatorResult, SeriesBuffer};
use crate::error::EngineError;
use crate::primitives::RecursiveSmoother;

#[derive(Debug, Clone, Copy)]
pub struct Macd {
    fast: RecursiveSmoother,
    slow: RecursiveSmoother,
    signal: RecursiveSmoother,
}

/// Which MACD series is reported as the primary `values`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MacdLine {
    Macd,
    Signal,
}

#[derive(Debug, Clone)]
pub struct MacdOutput {
    pub macd_line: SeriesBuffer,
    pub signal_line: SeriesBuffer,
    pub histogram: SeriesBuffer,
}

impl Macd {
    pub fn new(fast: usize, slow: usize, signal: usize) -> Result<Self, EngineError> {
        Ok(Self {
            fast: RecursiveSmoother::new(fast)
                .map_err(|_| EngineError::invalid_parameter("fastPeriod", bad_period(fast)))?,
            slow: RecursiveSmoother::new(slow)
                .map_err(|_| EngineError::invalid_parameter("slowPeriod", bad_period(slow)))?,
            signal: RecursiveSmoother::new(signal)
                .map_err(|_| EngineError::invalid_parameter("signalPeriod", bad_period(signal)))?,
        })
    }

    pub fn periods(&self) -> (usize, usize, usize) {
        (self.fast.period(), self.slow.period(), self.signal.period())
    }

    pub fn compute(&self, input: &[f64]) -> MacdOutput {
        let fast = self.fast.smooth(input);
        let slow = self.slow.smooth(input);
        let macd_line = fast.zip_with(&slow, |f, s| f - s);
        let signal_line = self.signal.smooth(&macd_line);
        let histogram = macd_line.zip_with(&signal_line, |m, s| m - s);
        MacdOutput {
            macd_line,
            signal_line,
            histogram,
        }
    }
}

fn bad_period(period: usize) -> String {
    format!("must be >= 1, got {period}")
}

impl MacdOutput {
    /// Package as an `IndicatorResult` with `primary` as `values` and the
    /// other two series in metadata.
    pub fn into_result(self, primary: MacdLine) -> IndicatorResult {
        let mut metadata = BTreeMap::new();
        let values = match primary {
            MacdLine::Macd => {
                metadata.insert("signalLine".to_string(), self.signal_line);
                self.macd_line
            }
            MacdLine::Signal => {
                metadata.insert("macdLine".to_string(), self.macd_line);
                self.signal_line
            }
        };
        metadata.insert("histogram".to_string(), self.histogram);
        IndicatorResult { values, metadata }
    }
}
