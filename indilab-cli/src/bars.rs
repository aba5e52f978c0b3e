//! CSV bar loading for the `csv` command.
//!
//! Columns are found by header name, case-insensitively. `close` is
//! required; `open`, `high` and `low` fall back to close, `volume` to zero
//! and the timestamp to the row index. Empty price cells become NaN.

use std::io::Read;

use anyhow::{anyhow, bail, Context, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime};

use indilab_core::{OhlcSeries, ParamValue};

const TIME_HEADERS: &[&str] = &["timestamp", "time", "date", "datetime"];

#[derive(Debug, Default)]
struct Columns {
    time: Option<usize>,
    open: Option<usize>,
    high: Option<usize>,
    low: Option<usize>,
    close: usize,
    volume: Option<usize>,
}

impl Columns {
    fn from_headers(headers: &csv::StringRecord) -> Result<Self> {
        let find = |name: &str| headers.iter().position(|h| h.trim().eq_ignore_ascii_case(name));
        let close = find("close").ok_or_else(|| anyhow!("CSV has no 'close' column"))?;
        Ok(Self {
            time: TIME_HEADERS.iter().find_map(|h| find(h)),
            open: find("open"),
            high: find("high"),
            low: find("low"),
            close,
            volume: find("volume"),
        })
    }
}

/// Read every row of `reader` into an [`OhlcSeries`].
pub fn read_bars(reader: impl Read) -> Result<OhlcSeries> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let cols = Columns::from_headers(rdr.headers()?)?;
    let mut bars = OhlcSeries::default();

    for (row, record) in rdr.records().enumerate() {
        let record = record.with_context(|| format!("reading CSV row {}", row + 1))?;
        let cell = |idx: usize| record.get(idx).unwrap_or("");
        let price = |idx: Option<usize>, fallback: f64| -> Result<f64> {
            match idx {
                Some(i) => parse_price(cell(i)).with_context(|| format!("row {}", row + 1)),
                None => Ok(fallback),
            }
        };

        let close = price(Some(cols.close), f64::NAN)?;
        bars.open.push(price(cols.open, close)?);
        bars.high.push(price(cols.high, close)?);
        bars.low.push(price(cols.low, close)?);
        bars.close.push(close);
        bars.volume.push(price(cols.volume, 0.0)?);
        bars.timestamp.push(match cols.time {
            Some(i) => parse_timestamp(cell(i)).with_context(|| format!("row {}", row + 1))?,
            None => row as i64,
        });
    }
    Ok(bars)
}

fn parse_price(s: &str) -> Result<f64> {
    if s.is_empty() {
        return Ok(f64::NAN);
    }
    s.parse()
        .with_context(|| format!("invalid number '{s}'"))
}

/// Epoch milliseconds, RFC 3339, `YYYY-MM-DD HH:MM:SS` or `YYYY-MM-DD` (UTC).
pub fn parse_timestamp(s: &str) -> Result<i64> {
    if let Ok(ms) = s.parse::<i64>() {
        return Ok(ms);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.timestamp_millis());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return Ok(dt.and_utc().timestamp_millis());
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        if let Some(dt) = date.and_hms_opt(0, 0, 0) {
            return Ok(dt.and_utc().timestamp_millis());
        }
    }
    bail!("unrecognised timestamp '{s}'")
}

/// Parse a `--param name=value` argument. Numeric values become numbers.
pub fn parse_param(arg: &str) -> Result<(String, ParamValue), String> {
    let (name, value) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got '{arg}'"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("missing parameter name in '{arg}'"));
    }
    let value = value.trim();
    let value = match value.parse::<f64>() {
        Ok(v) => ParamValue::Number(v),
        Err(_) => ParamValue::Text(value.to_string()),
    };
    Ok((name.to_string(), value))
}
