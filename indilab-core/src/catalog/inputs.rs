//! Declared input columns and their extraction for one dispatch.

use crate::domain::{OhlcSeries, PriceField, SeriesBuffer};
use crate::error::EngineError;

use super::params::ResolvedParams;

/// The columns an indicator reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputSpec {
    /// Nothing but the bar count.
    BarCount,
    /// The single column named by a select parameter (`source`, `component`).
    Selected(&'static str),
    /// A fixed set of columns, in the order the compute function uses them.
    Fixed(&'static [PriceField]),
}

impl InputSpec {
    /// Resolve the concrete column list against the request's parameters.
    pub fn fields(self, params: &ResolvedParams) -> Result<Vec<PriceField>, EngineError> {
        match self {
            InputSpec::BarCount => Ok(Vec::new()),
            InputSpec::Selected(param) => Ok(vec![params.choice(param)?]),
            InputSpec::Fixed(fields) => Ok(fields.to_vec()),
        }
    }
}

/// Columns copied out of an [`OhlcSeries`] for a compute function.
///
/// Only declared columns are present; asking for any other one is an error,
/// so a descriptor cannot under-declare what its indicator reads.
#[derive(Debug, Clone)]
pub struct BarInputs<'a> {
    len: usize,
    columns: Vec<(PriceField, SeriesBuffer)>,
    timestamp: &'a [i64],
}

impl<'a> BarInputs<'a> {
    pub fn extract(data: &'a OhlcSeries, fields: &[PriceField]) -> Self {
        Self {
            len: data.len(),
            columns: fields.iter().map(|&field| (field, data.extract(field))).collect(),
            timestamp: &data.timestamp,
        }
    }

    /// Number of bars.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn fields(&self) -> impl Iterator<Item = PriceField> + '_ {
        self.columns.iter().map(|(field, _)| *field)
    }

    pub fn column(&self, field: PriceField) -> Result<&SeriesBuffer, EngineError> {
        self.columns
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, series)| series)
            .ok_or_else(|| EngineError::malformed(format!("column '{field}' is not a declared input")))
    }

    /// The first declared column: the selected one for [`InputSpec::Selected`].
    pub fn primary(&self) -> Result<&SeriesBuffer, EngineError> {
        self.columns
            .first()
            .map(|(_, series)| series)
            .ok_or_else(|| EngineError::malformed("indicator declares no input column"))
    }

    /// High, low and close, for range-based indicators.
    pub fn hlc(&self) -> Result<(&[f64], &[f64], &[f64]), EngineError> {
        Ok((
            self.column(PriceField::High)?.as_slice(),
            self.column(PriceField::Low)?.as_slice(),
            self.column(PriceField::Close)?.as_slice(),
        ))
    }

    pub fn timestamps(&self) -> &'a [i64] {
        self.timestamp
    }
}
