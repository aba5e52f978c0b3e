//! Core value types: bar columns, numeric series, requests and results.
//!
//! Nothing here is mutated after construction. Results never reference the
//! `OhlcSeries` they were derived from.

pub mod ohlc;
pub mod request;
pub mod result;
pub mod series;

pub use ohlc::{OhlcSeries, PriceField};
pub use request::{IndicatorRequest, ParamMap, ParamValue};
pub use result::IndicatorResult;
pub use series::SeriesBuffer;
