//! Pass-through series: a constant and a raw OHLCV column.

use crate::catalog::BarInputs;
use crate::domain::{PriceField, SeriesBuffer};
use crate::error::EngineError;

/// A constant line, one value per bar.
#[derive(Debug, Clone, Copy)]
pub struct Constant {
    value: f64,
}

impl Constant {
    pub fn new(value: f64) -> Self {
        Self { value }
    }

    pub fn compute(&self, len: usize) -> SeriesBuffer {
        SeriesBuffer::constant(self.value, len)
    }
}

/// One component of each candle, copied out unchanged.
#[derive(Debug, Clone, Copy)]
pub struct Candle {
    component: PriceField,
}

impl Candle {
    pub fn new(component: PriceField) -> Self {
        Self { component }
    }

    /// Fails if the component was not extracted for this dispatch.
    pub fn compute(&self, inputs: &BarInputs<'_>) -> Result<SeriesBuffer, EngineError> {
        inputs.column(self.component).cloned()
    }
}
