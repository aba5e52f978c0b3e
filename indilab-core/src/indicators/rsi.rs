//! Relative Strength Index (RSI), two variants.
//!
//! `Rsi` recomputes gains and losses from scratch for every window of
//! `period` one-bar changes (the non-smoothed "cutler" form, O(n·period)).
//! `WilderRsi` carries running averages forward (O(n)); its output differs
//! numerically and it is exposed as a separate indicator.
//!
//! RSI = 100 - 100 / (1 + avg_gain / avg_loss)
//! Lookback: period (a change needs two bars).
//! Edge case: avg_loss == 0 → RSI = 100, including a perfectly flat window.

use crate::domain::SeriesBuffer;
use crate::error::EngineError;
use crate::primitives::{validate_period, windowed_map};

#[derive(Debug, Clone, Copy)]
pub struct Rsi {
    period: usize,
}

impl Rsi {
    pub fn new(period: usize) -> Result<Self, EngineError> {
        validate_period("period", period)?;
        Ok(Self { period })
    }

    pub fn period(&self) -> usize {
        self.period
    }

    pub fn lookback(&self) -> usize {
        self.period
    }

    pub fn compute(&self, input: &[f64]) -> Result<SeriesBuffer, EngineError> {
        let period = self.period;
        let divisor = period as f64;
        let deltas = changes(input);

        windowed_map(&deltas, period, |i, window| {
            if i < period {
                return f64::NAN;
            }
            // Newest change first.
            let mut gains = 0.0;
            let mut losses = 0.0;
            for &change in window.iter().rev() {
                if change > 0.0 {
                    gains += change;
                } else {
                    losses += change.abs();
                }
            }
            rsi_from_averages(gains / divisor, losses / divisor)
        })
    }
}

/// Wilder-smoothed RSI.
///
/// Seed: plain averages of the first `period` changes, first value at index
/// `period`. Then `avg = (avg * (period - 1) + x) / period`.
#[derive(Debug, Clone, Copy)]
pub struct WilderRsi {
    period: usize,
}

impl WilderRsi {
    pub fn new(period: usize) -> Result<Self, EngineError> {
        validate_period("period", period)?;
        Ok(Self { period })
    }

    pub fn lookback(&self) -> usize {
        self.period
    }

    pub fn compute(&self, input: &[f64]) -> SeriesBuffer {
        let n = input.len();
        let period = self.period;
        let mut result = vec![f64::NAN; n];

        if n <= period {
            return result.into();
        }

        let deltas = changes(input);
        let p = period as f64;

        let mut avg_gain = 0.0;
        let mut avg_loss = 0.0;
        for &ch in &deltas[1..=period] {
            let (gain, loss) = split_change(ch);
            avg_gain += gain;
            avg_loss += loss;
        }
        avg_gain /= p;
        avg_loss /= p;
        result[period] = rsi_from_averages(avg_gain, avg_loss);

        for i in (period + 1)..n {
            let (gain, loss) = split_change(deltas[i]);
            avg_gain = (avg_gain * (p - 1.0) + gain) / p;
            avg_loss = (avg_loss * (p - 1.0) + loss) / p;
            result[i] = rsi_from_averages(avg_gain, avg_loss);
        }

        result.into()
    }
}

/// One-bar changes; index 0 has no predecessor and is NaN.
fn changes(input: &[f64]) -> Vec<f64> {
    let mut out = vec![f64::NAN; input.len()];
    for i in 1..input.len() {
        out[i] = input[i] - input[i - 1];
    }
    out
}

/// Gain and loss parts of a change. NaN taints both so that the running
/// averages stay NaN from that bar on.
fn split_change(ch: f64) -> (f64, f64) {
    if ch.is_nan() {
        (f64::NAN, f64::NAN)
    } else if ch > 0.0 {
        (ch, 0.0)
    } else {
        (0.0, -ch)
    }
}

fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        100.0
    } else {
        let rs = avg_gain / avg_loss;
        100.0 - 100.0 / (1.0 + rs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::assert_approx;

    #[test]
    fn rsi_warmup_is_period() {
        let out = Rsi::new(3).unwrap().compute(&[1.0, 2.0, 1.0, 2.0, 3.0]).unwrap();
        assert!(out[0].is_nan());
        assert!(out[1].is_nan());
        assert!(out[2].is_nan());
        assert!(!out[3].is_nan());
    }

    #[test]
    fn rsi_all_gains() {
        let out = Rsi::new(3)
            .unwrap()
            .compute(&[100.0, 101.0, 102.0, 103.0, 104.0, 105.0])
            .unwrap();
        for &v in &out[3..] {
            assert_eq!(v, 100.0);
        }
    }

    #[test]
    fn rsi_all_losses() {
        let out = Rsi::new(3)
            .unwrap()
            .compute(&[105.0, 104.0, 103.0, 102.0, 101.0, 100.0])
            .unwrap();
        assert_approx(out[3], 0.0, 1e-12);
    }

    #[test]
    fn rsi_flat_is_saturated_not_nan() {
        let out = Rsi::new(4).unwrap().compute(&[7.0; 6]).unwrap();
        assert_eq!(out[4], 100.0);
        assert_eq!(out[5], 100.0);
    }

    #[test]
    fn rsi_mixed_window() {
        // Closes: 44, 44.34, 44.09, 43.61, 44.33
        // Window at index 3: changes +0.34, -0.25, -0.48 → gains 0.34, losses 0.73
        // RSI = 100 - 100/(1 + 0.34/0.73)
        let out = Rsi::new(3)
            .unwrap()
            .compute(&[44.0, 44.34, 44.09, 43.61, 44.33])
            .unwrap();
        let g: f64 = 44.34 - 44.0;
        let l: f64 = (44.09 - 44.34_f64).abs() + (43.61 - 44.09_f64).abs();
        let expected = 100.0 - 100.0 / (1.0 + (g / 3.0) / (l / 3.0));
        assert_approx(out[3], expected, 1e-9);
        assert!(out[3] > 0.0 && out[3] < 100.0);
    }

    #[test]
    fn rsi_each_window_is_independent() {
        // A large drop that has left the window no longer affects the value.
        let out = Rsi::new(2)
            .unwrap()
            .compute(&[10.0, 1.0, 2.0, 3.0, 4.0])
            .unwrap();
        assert!(out[2] < 100.0);
        assert_eq!(out[3], 100.0);
        assert_eq!(out[4], 100.0);
    }

    #[test]
    fn rsi_bounds() {
        let out = Rsi::new(3)
            .unwrap()
            .compute(&[100.0, 105.0, 98.0, 110.0, 95.0, 115.0, 90.0, 120.0])
            .unwrap();
        for (i, &v) in out.iter().enumerate() {
            if !v.is_nan() {
                assert!((0.0..=100.0).contains(&v), "RSI out of bounds at bar {i}: {v}");
            }
        }
    }

    #[test]
    fn rsi_nan_only_affects_windows_that_see_it() {
        let out = Rsi::new(2)
            .unwrap()
            .compute(&[1.0, 2.0, f64::NAN, 4.0, 5.0, 6.0])
            .unwrap();
        assert!(out[2].is_nan());
        assert!(out[3].is_nan());
        assert!(out[4].is_nan());
        assert_eq!(out[5], 100.0);
    }

    #[test]
    fn rsi_too_few_bars() {
        let out = Rsi::new(5).unwrap().compute(&[1.0, 2.0, 3.0]).unwrap();
        assert!(out.iter().all(|v| v.is_nan()));
    }

    #[test]
    fn wilder_seed_matches_cutler_first_value() {
        let input = [44.0, 44.34, 44.09, 43.61, 44.33, 44.83, 45.10];
        let cutler = Rsi::new(3).unwrap().compute(&input).unwrap();
        let wilder = WilderRsi::new(3).unwrap().compute(&input);
        assert_approx(wilder[3], cutler[3], 1e-12);
        assert!(wilder[..3].iter().all(|v| v.is_nan()));
    }

    #[test]
    fn wilder_smoothing_step() {
        // Changes: +1, -1, +2 (period 2)
        // seed avg_gain = 0.5, avg_loss = 0.5 → RSI[2] = 50
        // step: avg_gain = (0.5*1 + 2)/2 = 1.25, avg_loss = (0.5*1 + 0)/2 = 0.25
        // RSI[3] = 100 - 100/(1 + 5) = 83.333...
        let out = WilderRsi::new(2).unwrap().compute(&[10.0, 11.0, 10.0, 12.0]);
        assert_approx(out[2], 50.0, 1e-12);
        assert_approx(out[3], 100.0 - 100.0 / 6.0, 1e-12);
    }

    #[test]
    fn wilder_nan_taints_remaining_bars() {
        let out = WilderRsi::new(2)
            .unwrap()
            .compute(&[1.0, 2.0, 3.0, f64::NAN, 5.0, 6.0]);
        assert_eq!(out[2], 100.0);
        assert!(out[3..].iter().all(|v| v.is_nan()));
    }

    #[test]
    fn rsi_lookback() {
        assert_eq!(Rsi::new(14).unwrap().lookback(), 14);
        assert_eq!(WilderRsi::new(14).unwrap().lookback(), 14);
    }
}
