//! IndicatorResult: primary output series plus named auxiliary series.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::series::SeriesBuffer;

/// `{ values, metadata? }`. Metadata keys serialize in sorted order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IndicatorResult {
    pub values: SeriesBuffer,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, SeriesBuffer>,
}

impl IndicatorResult {
    /// A result with no auxiliary series.
    pub fn single(values: SeriesBuffer) -> Self {
        Self {
            values,
            metadata: BTreeMap::new(),
        }
    }

    /// Attach an auxiliary series.
    pub fn with_series(mut self, name: impl Into<String>, series: SeriesBuffer) -> Self {
        self.metadata.insert(name.into(), series);
        self
    }

    pub fn series(&self, name: &str) -> Option<&SeriesBuffer> {
        self.metadata.get(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
