//! OhlcSeries: parallel OHLCV columns plus timestamps.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::series::{nan_as_null, SeriesBuffer};
use crate::error::EngineError;

/// Column-oriented bar data. Index `i` in every column is the same bar.
///
/// Deserialization does not check column lengths; [`OhlcSeries::validate`]
/// does, and the engine runs it before any compute function.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OhlcSeries {
    #[serde(with = "nan_as_null")]
    pub open: Vec<f64>,
    #[serde(with = "nan_as_null")]
    pub high: Vec<f64>,
    #[serde(with = "nan_as_null")]
    pub low: Vec<f64>,
    #[serde(with = "nan_as_null")]
    pub close: Vec<f64>,
    #[serde(with = "nan_as_null")]
    pub volume: Vec<f64>,
    /// Epoch milliseconds, UTC.
    pub timestamp: Vec<i64>,
}

impl OhlcSeries {
    /// Build a series from close prices alone.
    ///
    /// open/high/low mirror close, volume is zero and timestamps are the bar
    /// index in milliseconds. Useful for close-only callers and tests.
    pub fn from_closes(closes: &[f64]) -> Self {
        Self {
            open: closes.to_vec(),
            high: closes.to_vec(),
            low: closes.to_vec(),
            close: closes.to_vec(),
            volume: vec![0.0; closes.len()],
            timestamp: (0..closes.len() as i64).collect(),
        }
    }

    /// Number of bars, as given by the close column.
    pub fn len(&self) -> usize {
        self.close.len()
    }

    pub fn is_empty(&self) -> bool {
        self.close.is_empty()
    }

    /// Check the equal-length invariant and reject empty input.
    ///
    /// Returns the bar count on success.
    pub fn validate(&self) -> Result<usize, EngineError> {
        let n = self.close.len();
        let columns = [
            ("open", self.open.len()),
            ("high", self.high.len()),
            ("low", self.low.len()),
            ("volume", self.volume.len()),
            ("timestamp", self.timestamp.len()),
        ];
        for (name, len) in columns {
            if len != n {
                return Err(EngineError::malformed(format!(
                    "column '{name}' has {len} values but 'close' has {n}"
                )));
            }
        }
        if n == 0 {
            return Err(EngineError::malformed("series is empty"));
        }
        Ok(n)
    }

    /// Borrow a price column.
    pub fn column(&self, field: PriceField) -> &[f64] {
        match field {
            PriceField::Open => &self.open,
            PriceField::High => &self.high,
            PriceField::Low => &self.low,
            PriceField::Close => &self.close,
            PriceField::Volume => &self.volume,
        }
    }

    /// Copy a price column out into its own buffer.
    pub fn extract(&self, field: PriceField) -> SeriesBuffer {
        SeriesBuffer::from(self.column(field))
    }

    /// Timestamp of bar `i` as a UTC datetime, if in range.
    pub fn bar_time(&self, i: usize) -> Option<DateTime<Utc>> {
        self.timestamp
            .get(i)
            .and_then(|&ms| DateTime::from_timestamp_millis(ms))
    }
}

/// A selectable OHLCV column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceField {
    Open,
    High,
    Low,
    Close,
    Volume,
}

impl PriceField {
    pub fn as_str(self) -> &'static str {
        match self {
            PriceField::Open => "open",
            PriceField::High => "high",
            PriceField::Low => "low",
            PriceField::Close => "close",
            PriceField::Volume => "volume",
        }
    }
}

impl fmt::Display for PriceField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PriceField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "open" => Ok(PriceField::Open),
            "high" => Ok(PriceField::High),
            "low" => Ok(PriceField::Low),
            "close" => Ok(PriceField::Close),
            "volume" => Ok(PriceField::Volume),
            other => Err(format!("unknown price field '{other}'")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_accepts_equal_columns() {
        let data = OhlcSeries::from_closes(&[1.0, 2.0, 3.0]);
        assert_eq!(data.validate(), Ok(3));
    }

    #[test]
    fn validate_rejects_length_mismatch() {
        let mut data = OhlcSeries::from_closes(&[1.0, 2.0, 3.0]);
        data.volume.pop();
        let err = data.validate().unwrap_err();
        assert!(matches!(err, EngineError::MalformedInput(ref m) if m.contains("volume")));
    }

    #[test]
    fn validate_rejects_empty() {
        let data = OhlcSeries::default();
        assert!(matches!(
            data.validate(),
            Err(EngineError::MalformedInput(_))
        ));
    }

    #[test]
    fn extract_copies_the_column() {
        let mut data = OhlcSeries::from_closes(&[1.0, 2.0]);
        data.high = vec![5.0, 6.0];
        let high = data.extract(PriceField::High);
        data.high[0] = 0.0;
        assert_eq!(high.as_slice(), &[5.0, 6.0]);
    }

    #[test]
    fn price_field_parses_case_insensitively() {
        assert_eq!("Close".parse::<PriceField>(), Ok(PriceField::Close));
        assert_eq!(" HIGH ".parse::<PriceField>(), Ok(PriceField::High));
        assert!("median".parse::<PriceField>().is_err());
    }

    #[test]
    fn bar_time_converts_millis() {
        let mut data = OhlcSeries::from_closes(&[1.0]);
        data.timestamp = vec![1_700_000_000_000];
        let t = data.bar_time(0).unwrap();
        assert_eq!(t.timestamp_millis(), 1_700_000_000_000);
        assert!(data.bar_time(1).is_none());
    }

    #[test]
    fn deserializes_null_prices_as_nan() {
        let json = r#"{"open":[1],"high":[1],"low":[1],"close":[null],"volume":[0],"timestamp":[0]}"#;
        let data: OhlcSeries = serde_json::from_str(json).unwrap();
        assert!(data.close[0].is_nan());
    }
}
