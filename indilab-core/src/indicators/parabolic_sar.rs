//! Parabolic SAR: Wilder's stop-and-reverse.
//!
//! Inherently sequential: carries direction, extreme point (EP) and
//! acceleration factor (AF) from bar to bar.
//!
//! The system starts long with the first bar's high as SAR and its low as
//! EP, so the second bar normally flips it short. Each new extreme raises AF
//! by `acceleration` up to `maximum`. While long the SAR may not rise above
//! the previous two lows; while short it may not fall below the previous two
//! highs.
//! Lookback: 0.

use crate::domain::SeriesBuffer;
use crate::error::EngineError;

#[derive(Debug, Clone, Copy)]
pub struct ParabolicSar {
    acceleration: f64,
    maximum: f64,
}

impl ParabolicSar {
    pub fn new(acceleration: f64, maximum: f64) -> Result<Self, EngineError> {
        for (name, value) in [("acceleration", acceleration), ("maximum", maximum)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(EngineError::invalid_parameter(
                    name,
                    format!("must be a positive number, got {value}"),
                ));
            }
        }
        Ok(Self {
            acceleration,
            maximum,
        })
    }

    pub fn lookback(&self) -> usize {
        0
    }

    pub fn compute(&self, high: &[f64], low: &[f64]) -> SeriesBuffer {
        let n = high.len().min(low.len());
        let mut out: Vec<f64> = Vec::with_capacity(n);
        if n == 0 {
            return out.into();
        }

        let mut is_long = true;
        let mut af = self.acceleration;
        let mut ep = low[0];
        let mut sar = high[0];
        out.push(sar);

        for i in 1..n {
            let prev_sar = out[i - 1];

            if is_long {
                if low[i] < prev_sar {
                    is_long = false;
                    sar = ep;
                    ep = low[i];
                    af = self.acceleration;
                } else {
                    if high[i] > ep {
                        ep = high[i];
                        af = (af + self.acceleration).min(self.maximum);
                    }
                    sar = prev_sar + af * (ep - prev_sar);
                    if sar > low[i - 1] {
                        sar = low[i - 1];
                    }
                    if i >= 2 && sar > low[i - 2] {
                        sar = low[i - 2];
                    }
                }
            } else if high[i] > prev_sar {
                is_long = true;
                sar = ep;
                ep = high[i];
                af = self.acceleration;
            } else {
                if low[i] < ep {
                    ep = low[i];
                    af = (af + self.acceleration).min(self.maximum);
                }
                sar = prev_sar - af * (prev_sar - ep);
                if sar < high[i - 1] {
                    sar = high[i - 1];
                }
                if i >= 2 && sar < high[i - 2] {
                    sar = high[i - 2];
                }
            }

            out.push(sar);
        }

        out.into()
    }
}
