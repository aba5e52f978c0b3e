//! Directional movement: ADX, +DI and -DI.
//!
//! For every window of `period` bars ending at `i`, each bar paired with its
//! predecessor:
//!   +DM = up move if it exceeds the down move and is positive, else 0
//!   -DM = down move if it exceeds the up move and is positive, else 0
//!   +DI = 100 · avg(+DM) / avg(TR), -DI likewise
//!   DX  = 100 · |+DI − −DI| / (+DI + −DI)
//!
//! Sums are recomputed for each window, newest bar first. The reported ADX
//! is the window's DX with no second smoothing pass.
//!
//! Lookback: period. A window whose true ranges sum to zero is NaN in all
//! three series; two zero DIs give a DX of 0.

use crate::domain::{IndicatorResult, SeriesBuffer};
use crate::error::EngineError;
use crate::indicators::true_range;
use crate::primitives::validate_period;

#[derive(Debug, Clone, Copy)]
pub struct Directional {
    period: usize,
}

/// Which directional series is reported as the primary `values`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectionalLine {
    Adx,
    PlusDi,
    MinusDi,
}

#[derive(Debug, Clone)]
pub struct DirectionalOutput {
    pub adx: SeriesBuffer,
    pub plus_di: SeriesBuffer,
    pub minus_di: SeriesBuffer,
}

impl Directional {
    pub fn new(period: usize) -> Result<Self, EngineError> {
        validate_period("period", period)?;
        Ok(Self { period })
    }

    pub fn lookback(&self) -> usize {
        self.period
    }

    pub fn compute(&self, high: &[f64], low: &[f64], close: &[f64]) -> DirectionalOutput {
        let n = close.len();
        let period = self.period;
        let p = period as f64;

        let tr = true_range(high, low, close);
        let mut plus_dm = vec![0.0; n];
        let mut minus_dm = vec![0.0; n];
        for t in 1..n {
            let up = high[t] - high[t - 1];
            let down = low[t - 1] - low[t];
            if up > down && up > 0.0 {
                plus_dm[t] = up;
            }
            if down > up && down > 0.0 {
                minus_dm[t] = down;
            }
        }

        let mut adx = vec![f64::NAN; n];
        let mut plus_di = vec![f64::NAN; n];
        let mut minus_di = vec![f64::NAN; n];

        for i in period..n {
            let mut tr_sum = 0.0;
            let mut plus = 0.0;
            let mut minus = 0.0;
            for t in (i + 1 - period..=i).rev() {
                tr_sum += tr[t];
                plus += plus_dm[t];
                minus += minus_dm[t];
            }

            let avg_tr = tr_sum / p;
            if avg_tr == 0.0 {
                continue;
            }
            let pdi = (plus / p) / avg_tr * 100.0;
            let mdi = (minus / p) / avg_tr * 100.0;
            plus_di[i] = pdi;
            minus_di[i] = mdi;

            let di_sum = pdi + mdi;
            adx[i] = if di_sum == 0.0 {
                0.0
            } else {
                (pdi - mdi).abs() / di_sum * 100.0
            };
        }

        DirectionalOutput {
            adx: adx.into(),
            plus_di: plus_di.into(),
            minus_di: minus_di.into(),
        }
    }
}

impl DirectionalOutput {
    /// Report `primary` as `values` and the other two as metadata.
    pub fn into_result(self, primary: DirectionalLine) -> IndicatorResult {
        match primary {
            DirectionalLine::Adx => IndicatorResult::single(self.adx)
                .with_series("plusDI", self.plus_di)
                .with_series("minusDI", self.minus_di),
            DirectionalLine::PlusDi => IndicatorResult::single(self.plus_di)
                .with_series("adx", self.adx)
                .with_series("minusDI", self.minus_di),
            DirectionalLine::MinusDi => IndicatorResult::single(self.minus_di)
                .with_series("adx", self.adx)
                .with_series("plusDI", self.plus_di),
        }
    }
}
