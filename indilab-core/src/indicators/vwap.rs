//! Volume Weighted Average Price (VWAP) with standard-deviation bands.
//!
//! Within a session:
//!   tp     = (high + low + close) / 3
//!   vwap   = Σ(tp·v) / Σv, or tp while the session has no volume
//!   sd     = sqrt(Σ((tp_j - vwap_j)²·v_j) / Σv_j), 0 for a one-bar session
//!   band_k = vwap ± sd·k for each multiplier k
//!
//! Each bar's deviation is taken against the VWAP as of that bar, so the
//! session sums only ever grow and are carried forward in one pass.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};

use crate::domain::{IndicatorResult, SeriesBuffer};
use crate::error::EngineError;

/// Session gap for [`ResetInterval::Session`], in milliseconds.
const SESSION_GAP_MS: i64 = 4 * 60 * 60 * 1000;

/// When the running sums start over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResetInterval {
    /// On a change of UTC calendar date between consecutive bars.
    #[default]
    Daily,
    /// On a gap of more than four hours between consecutive bars.
    Session,
    /// Never; one cumulative VWAP over the whole series.
    None,
}

impl ResetInterval {
    pub fn as_str(self) -> &'static str {
        match self {
            ResetInterval::Daily => "daily",
            ResetInterval::Session => "session",
            ResetInterval::None => "none",
        }
    }

    fn starts_session(self, prev_ms: i64, cur_ms: i64) -> bool {
        match self {
            ResetInterval::None => false,
            // Caller timestamps are arbitrary i64; a gap that would overflow
            // saturates instead.
            ResetInterval::Session => cur_ms.saturating_sub(prev_ms) > SESSION_GAP_MS,
            ResetInterval::Daily => {
                match (
                    DateTime::<Utc>::from_timestamp_millis(prev_ms),
                    DateTime::<Utc>::from_timestamp_millis(cur_ms),
                ) {
                    (Some(prev), Some(cur)) => prev.date_naive() != cur.date_naive(),
                    _ => false,
                }
            }
        }
    }
}

impl fmt::Display for ResetInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResetInterval {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "daily" => Ok(ResetInterval::Daily),
            "session" => Ok(ResetInterval::Session),
            "none" => Ok(ResetInterval::None),
            other => Err(format!("unknown reset interval '{other}'")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Vwap {
    reset: ResetInterval,
    multipliers: Vec<f64>,
}

/// One pair of bands at `multiplier` standard deviations.
#[derive(Debug, Clone)]
pub struct VwapBand {
    pub multiplier: f64,
    pub upper: SeriesBuffer,
    pub lower: SeriesBuffer,
}

#[derive(Debug, Clone)]
pub struct VwapOutput {
    pub vwap: SeriesBuffer,
    pub std_dev: SeriesBuffer,
    pub bands: Vec<VwapBand>,
}

impl Vwap {
    pub fn new(reset: ResetInterval, multipliers: Vec<f64>) -> Self {
        Self { reset, multipliers }
    }

    /// Parse a comma-separated multiplier list such as `"1,2,3"`.
    ///
    /// Blank entries are skipped; anything else must be a finite number.
    pub fn parse_multipliers(raw: &str) -> Result<Vec<f64>, EngineError> {
        raw.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| match s.parse::<f64>() {
                Ok(v) if v.is_finite() => Ok(v),
                _ => Err(EngineError::invalid_parameter(
                    "sdMultipliers",
                    format!("'{s}' is not a number"),
                )),
            })
            .collect()
    }

    pub fn reset(&self) -> ResetInterval {
        self.reset
    }

    pub fn multipliers(&self) -> &[f64] {
        &self.multipliers
    }

    pub fn compute(
        &self,
        high: &[f64],
        low: &[f64],
        close: &[f64],
        volume: &[f64],
        timestamp: &[i64],
    ) -> VwapOutput {
        let n = close.len();
        let mut vwap = Vec::with_capacity(n);
        let mut std_dev = Vec::with_capacity(n);

        let mut cum_tpv = 0.0;
        let mut cum_vol = 0.0;
        let mut sq_dev = 0.0;
        let mut session_len = 0usize;

        for i in 0..n {
            if i > 0 && self.reset.starts_session(timestamp[i - 1], timestamp[i]) {
                cum_tpv = 0.0;
                cum_vol = 0.0;
                sq_dev = 0.0;
                session_len = 0;
            }

            let tp = (high[i] + low[i] + close[i]) / 3.0;
            let v = volume[i];
            cum_tpv += tp * v;
            cum_vol += v;
            session_len += 1;

            let current = if cum_vol == 0.0 { tp } else { cum_tpv / cum_vol };
            vwap.push(current);

            let dev = tp - current;
            sq_dev += dev * dev * v;

            let sd = if session_len > 1 && cum_vol > 0.0 {
                (sq_dev / cum_vol).sqrt()
            } else {
                0.0
            };
            std_dev.push(sd);
        }

        let vwap = SeriesBuffer::from(vwap);
        let std_dev = SeriesBuffer::from(std_dev);
        let bands = self
            .multipliers
            .iter()
            .map(|&k| VwapBand {
                multiplier: k,
                upper: vwap.zip_with(&std_dev, |m, s| m + s * k),
                lower: vwap.zip_with(&std_dev, |m, s| m - s * k),
            })
            .collect();

        VwapOutput {
            vwap,
            std_dev,
            bands,
        }
    }
}

impl From<VwapOutput> for IndicatorResult {
    fn from(out: VwapOutput) -> Self {
        let mut result = IndicatorResult::single(out.vwap).with_series("stdDev", out.std_dev);
        for band in out.bands {
            result = result
                .with_series(format!("upper_{}", band.multiplier), band.upper)
                .with_series(format!("lower_{}", band.multiplier), band.lower);
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, DEFAULT_EPSILON};

    const HOUR: i64 = 60 * 60 * 1000;
    // 2024-01-02T00:00:00Z
    const DAY_START: i64 = 1_704_153_600_000;

    #[test]
    fn cumulative_vwap_without_reset() {
        let high = [11.0, 12.0];
        let low = [9.0, 10.0];
        let close = [10.0, 11.0];
        let volume = [100.0, 300.0];
        let out = Vwap::new(ResetInterval::None, vec![]).compute(&high, &low, &close, &volume, &[0, 1]);
        // tp = 10, 11 → (1000 + 3300) / 400 = 10.75
        assert_approx(out.vwap[0], 10.0, DEFAULT_EPSILON);
        assert_approx(out.vwap[1], 10.75, DEFAULT_EPSILON);
    }

    #[test]
    fn zero_volume_falls_back_to_typical_price() {
        let out = Vwap::new(ResetInterval::None, vec![]).compute(
            &[12.0, 15.0],
            &[9.0, 12.0],
            &[9.0, 12.0],
            &[0.0, 0.0],
            &[0, 1],
        );
        assert_approx(out.vwap[0], 10.0, DEFAULT_EPSILON);
        assert_approx(out.vwap[1], 13.0, DEFAULT_EPSILON);
        assert_eq!(out.std_dev[1], 0.0);
    }

    #[test]
    fn daily_reset_on_utc_date_change() {
        let ts = [DAY_START + 22 * HOUR, DAY_START + 23 * HOUR, DAY_START + 25 * HOUR];
        let tp = [10.0, 20.0, 30.0];
        let vol = [1.0, 1.0, 1.0];
        let out = Vwap::new(ResetInterval::Daily, vec![]).compute(&tp, &tp, &tp, &vol, &ts);
        assert_approx(out.vwap[1], 15.0, DEFAULT_EPSILON);
        // New UTC day starts at the third bar
        assert_approx(out.vwap[2], 30.0, DEFAULT_EPSILON);
        assert_eq!(out.std_dev[2], 0.0);
    }

    #[test]
    fn session_reset_after_four_hour_gap() {
        let ts = [0, HOUR, HOUR + 4 * HOUR, HOUR + 4 * HOUR + 1 + HOUR];
        let tp = [10.0, 20.0, 30.0, 40.0];
        let vol = [1.0; 4];
        let out = Vwap::new(ResetInterval::Session, vec![]).compute(&tp, &tp, &tp, &vol, &ts);
        // Exactly four hours is not a new session
        assert_approx(out.vwap[2], 20.0, DEFAULT_EPSILON);
        // Gap of 4h + 1ms is
        let fresh = Vwap::new(ResetInterval::Session, vec![]).compute(
            &tp,
            &tp,
            &tp,
            &vol,
            &[0, HOUR, HOUR + 4 * HOUR + 1, HOUR + 5 * HOUR + 1],
        );
        assert_approx(fresh.vwap[2], 30.0, DEFAULT_EPSILON);
        assert_approx(fresh.vwap[3], 35.0, DEFAULT_EPSILON);
    }

    #[test]
    fn session_reset_survives_extreme_timestamps() {
        let tp = [10.0, 20.0, 30.0];
        let vol = [1.0; 3];
        // Backwards by the full i64 range: no new session.
        let out = Vwap::new(ResetInterval::Session, vec![]).compute(&tp, &tp, &tp, &vol, &[1, i64::MIN, i64::MIN]);
        assert_approx(out.vwap[1], 15.0, DEFAULT_EPSILON);
        // Forwards by the full range: a new session.
        let out = Vwap::new(ResetInterval::Session, vec![]).compute(&tp, &tp, &tp, &vol, &[i64::MIN, i64::MAX, i64::MAX]);
        assert_approx(out.vwap[1], 20.0, DEFAULT_EPSILON);
        assert_approx(out.vwap[2], 25.0, DEFAULT_EPSILON);
    }

    #[test]
    fn daily_reset_ignores_unrepresentable_timestamps() {
        let tp = [10.0, 20.0];
        let out = Vwap::new(ResetInterval::Daily, vec![]).compute(&tp, &tp, &tp, &[1.0, 1.0], &[i64::MAX, i64::MIN]);
        assert_approx(out.vwap[1], 15.0, DEFAULT_EPSILON);
    }

    #[test]
    fn std_dev_weights_by_volume() {
        // tp 10 then 20, equal volume
        // vwap: 10, 15; deviations: 0, 5 → sd = sqrt(25 / 2)
        let tp = [10.0, 20.0];
        let out = Vwap::new(ResetInterval::None, vec![1.0, 2.0]).compute(&tp, &tp, &tp, &[1.0, 1.0], &[0, 1]);
        let sd = (25.0_f64 / 2.0).sqrt();
        assert_approx(out.std_dev[1], sd, DEFAULT_EPSILON);
        assert_approx(out.bands[1].upper[1], 15.0 + 2.0 * sd, DEFAULT_EPSILON);
        assert_approx(out.bands[0].lower[1], 15.0 - sd, DEFAULT_EPSILON);
    }

    #[test]
    fn metadata_keys() {
        let tp = [10.0, 20.0];
        let out = Vwap::new(ResetInterval::None, vec![1.0, 1.5]).compute(&tp, &tp, &tp, &[1.0, 1.0], &[0, 1]);
        let result = IndicatorResult::from(out);
        let keys: Vec<&str> = result.metadata.keys().map(String::as_str).collect();
        assert_eq!(keys, ["lower_1", "lower_1.5", "stdDev", "upper_1", "upper_1.5"]);
    }

    #[test]
    fn parse_multipliers_list() {
        assert_eq!(Vwap::parse_multipliers("1, 2,3").unwrap(), vec![1.0, 2.0, 3.0]);
        assert_eq!(Vwap::parse_multipliers("").unwrap(), Vec::<f64>::new());
        assert!(Vwap::parse_multipliers("1,x").is_err());
    }

    #[test]
    fn reset_interval_parses() {
        assert_eq!("Session".parse::<ResetInterval>(), Ok(ResetInterval::Session));
        assert!("weekly".parse::<ResetInterval>().is_err());
    }
}
