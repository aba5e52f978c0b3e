//! IndiLab Core: series primitives, indicators, catalog and dispatch.
//!
//! This crate contains everything that turns OHLCV columns into indicator
//! series:
//! - Data model (OHLCV series, series buffers, requests, results)
//! - Sliding-window and exponential-recursion primitives
//! - Indicator implementations with NaN warm-up semantics
//! - The indicator catalog (identifiers, parameter schemas, defaults)
//! - The engine that validates a request and dispatches it
//!
//! Nothing here spawns threads or performs I/O. The runner crate wraps the
//! engine in a worker.

pub mod catalog;
pub mod domain;
pub mod engine;
pub mod error;
pub mod indicators;
pub mod primitives;

pub use catalog::{IndicatorCatalog, IndicatorKind};
pub use domain::{IndicatorRequest, IndicatorResult, OhlcSeries, ParamMap, ParamValue, PriceField, SeriesBuffer};
pub use engine::IndicatorEngine;
pub use error::{EngineError, ErrorKind};
