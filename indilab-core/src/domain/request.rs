//! IndicatorRequest: one self-contained computation order.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::ohlc::OhlcSeries;

/// A caller-supplied parameter value: JSON number or string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Number(f64),
    Text(String),
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Number(v) => write!(f, "{v}"),
            ParamValue::Text(s) => write!(f, "\"{s}\""),
        }
    }
}

impl From<f64> for ParamValue {
    fn from(v: f64) -> Self {
        ParamValue::Number(v)
    }
}

impl From<&str> for ParamValue {
    fn from(s: &str) -> Self {
        ParamValue::Text(s.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(s: String) -> Self {
        ParamValue::Text(s)
    }
}

/// Caller parameters by name. `BTreeMap` keeps iteration order deterministic.
pub type ParamMap = BTreeMap<String, ParamValue>;

/// `{ indicator, data, params }`: constructed per call and consumed once.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndicatorRequest {
    /// Identifier, matched case-insensitively against the catalog.
    pub indicator: String,
    pub data: OhlcSeries,
    #[serde(default)]
    pub params: ParamMap,
}

impl IndicatorRequest {
    pub fn new(indicator: impl Into<String>, data: OhlcSeries) -> Self {
        Self {
            indicator: indicator.into(),
            data,
            params: ParamMap::new(),
        }
    }

    /// Builder-style parameter insertion.
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    pub fn bar_count(&self) -> usize {
        self.data.len()
    }
}
