//! IndicatorEngine: validates a request and dispatches it to its compute function.

use std::time::Instant;

use tracing::{debug, debug_span, warn};

use crate::catalog::{self, BarInputs, IndicatorCatalog, ResolvedParams};
use crate::domain::{IndicatorRequest, IndicatorResult, OhlcSeries, ParamMap};
use crate::error::EngineError;

/// Stateless dispatcher over an [`IndicatorCatalog`].
///
/// Every call is independent; the engine can be shared across threads and
/// the same request always yields the same result or the same error.
#[derive(Debug, Clone, Default)]
pub struct IndicatorEngine {
    catalog: IndicatorCatalog,
}

impl IndicatorEngine {
    pub fn new(catalog: IndicatorCatalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &IndicatorCatalog {
        &self.catalog
    }

    pub fn dispatch(&self, request: &IndicatorRequest) -> Result<IndicatorResult, EngineError> {
        self.compute(&request.indicator, &request.data, &request.params)
    }

    /// Look up `indicator`, check the series, merge parameters over the
    /// catalog defaults, extract the declared input columns and run the
    /// compute function.
    ///
    /// Errors are detected before any output is produced; there are no
    /// partial results.
    pub fn compute(
        &self,
        indicator: &str,
        data: &OhlcSeries,
        params: &ParamMap,
    ) -> Result<IndicatorResult, EngineError> {
        let span = debug_span!("dispatch", indicator = %indicator.trim(), bars = data.len());
        let _enter = span.enter();

        let started = Instant::now();
        let outcome = self.run(indicator, data, params);
        match &outcome {
            Ok(result) => debug!(
                elapsed_us = started.elapsed().as_micros() as u64,
                outputs = result.metadata.len() + 1,
                "indicator computed"
            ),
            Err(err) => warn!(kind = err.kind().as_str(), error = %err, "indicator request failed"),
        }
        outcome
    }

    fn run(
        &self,
        indicator: &str,
        data: &OhlcSeries,
        params: &ParamMap,
    ) -> Result<IndicatorResult, EngineError> {
        let descriptor = self.catalog.lookup(indicator)?;
        data.validate()?;

        let resolved = ResolvedParams::resolve(descriptor.parameters, params);
        let fields = descriptor
            .inputs
            .fields(&resolved)
            .map_err(|e| e.with_indicator(descriptor.id))?;
        debug!(id = descriptor.id, inputs = ?fields, "resolved indicator");

        let inputs = BarInputs::extract(data, &fields);
        catalog::compute(descriptor.kind, &inputs, &resolved).map_err(|e| e.with_indicator(descriptor.id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::IndicatorKind;
    use crate::error::ErrorKind;

    fn engine() -> IndicatorEngine {
        IndicatorEngine::default()
    }

    #[test]
    fn sma_through_dispatch() {
        let req = IndicatorRequest::new("sma", OhlcSeries::from_closes(&[1.0, 2.0, 3.0, 4.0, 5.0]))
            .with_param("period", 3.0);
        let out = engine().dispatch(&req).unwrap();
        assert!(out.values[1].is_nan());
        assert_eq!(&out.values[2..], &[2.0, 3.0, 4.0]);
        assert!(out.metadata.is_empty());
    }

    #[test]
    fn unknown_indicator() {
        let req = IndicatorRequest::new("FOOBAR", OhlcSeries::from_closes(&[1.0]));
        assert_eq!(
            engine().dispatch(&req).unwrap_err(),
            EngineError::UnknownIndicator("FOOBAR".into())
        );
    }

    #[test]
    fn unknown_indicator_reported_before_malformed_input() {
        let req = IndicatorRequest::new("FOOBAR", OhlcSeries::default());
        assert_eq!(engine().dispatch(&req).unwrap_err().kind(), ErrorKind::UnknownIndicator);
    }

    #[test]
    fn invalid_parameter_names_indicator() {
        let req = IndicatorRequest::new("ema", OhlcSeries::from_closes(&[1.0, 2.0])).with_param("period", 0.0);
        let err = engine().dispatch(&req).unwrap_err();
        assert_eq!(
            err,
            EngineError::InvalidParameter {
                indicator: Some("EMA".into()),
                name: "period".into(),
                reason: "must be >= 1, got 0".into(),
            }
        );
    }

    #[test]
    fn restricted_catalog_is_honoured() {
        let engine = IndicatorEngine::new(IndicatorCatalog::with_kinds([IndicatorKind::Sma]));
        let req = IndicatorRequest::new("EMA", OhlcSeries::from_closes(&[1.0]));
        assert_eq!(engine.dispatch(&req).unwrap_err().kind(), ErrorKind::UnknownIndicator);
        assert_eq!(engine.catalog().len(), 1);
    }

    #[test]
    fn source_parameter_selects_the_extracted_column() {
        let mut data = OhlcSeries::from_closes(&[1.0, 2.0, 3.0]);
        data.high = vec![10.0, 20.0, 30.0];
        let req = IndicatorRequest::new("SMA", data)
            .with_param("period", 2.0)
            .with_param("source", "high");
        let out = engine().dispatch(&req).unwrap();
        assert_eq!(&out.values[1..], &[15.0, 25.0]);
    }

    #[test]
    fn unknown_source_names_the_parameter() {
        let req = IndicatorRequest::new("RSI", OhlcSeries::from_closes(&[1.0, 2.0])).with_param("source", "vwap");
        let err = engine().dispatch(&req).unwrap_err();
        assert!(matches!(
            err,
            EngineError::InvalidParameter { ref indicator, ref name, .. }
                if indicator.as_deref() == Some("RSI") && name == "source"
        ));
    }
}
