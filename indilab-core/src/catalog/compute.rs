//! Compute functions, one arm per `IndicatorKind`.

use crate::domain::{IndicatorResult, PriceField};
use crate::error::EngineError;
use crate::indicators::{
    Atr, Bollinger, CamarillaLevel, CamarillaPivot, Candle, Constant, Dema, Directional, DirectionalLine,
    Ema, Kama, LinearRegression, Macd, MacdLine, Mama, ParabolicSar, PivotLevel, PivotMethod, PivotPoints,
    RegressionOutput, ResetInterval, Rsi, Sma, Stochastic, StochasticType, Supertrend, Tema, TrueRange,
    Trima, Vwap, WilderRsi, Wma, T3,
};

use super::inputs::BarInputs;
use super::params::ResolvedParams;
use super::IndicatorKind;

/// Run the compute function for `kind` over the columns extracted for it.
pub fn compute(
    kind: IndicatorKind,
    inputs: &BarInputs<'_>,
    params: &ResolvedParams,
) -> Result<IndicatorResult, EngineError> {
    let result = match kind {
        IndicatorKind::Sma => {
            let sma = Sma::new(params.period("period")?)?;
            IndicatorResult::single(sma.compute(inputs.primary()?)?)
        }
        IndicatorKind::Ema => {
            let ema = Ema::new(params.period("period")?)?;
            IndicatorResult::single(ema.compute(inputs.primary()?))
        }
        IndicatorKind::Wma => {
            let wma = Wma::new(params.period("period")?)?;
            IndicatorResult::single(wma.compute(inputs.primary()?)?)
        }
        IndicatorKind::Dema => {
            let dema = Dema::new(params.period("period")?)?;
            IndicatorResult::single(dema.compute(inputs.primary()?))
        }
        IndicatorKind::Tema => {
            let tema = Tema::new(params.period("period")?)?;
            IndicatorResult::single(tema.compute(inputs.primary()?))
        }
        IndicatorKind::Trima => {
            let trima = Trima::new(params.period("period")?)?;
            IndicatorResult::single(trima.compute(inputs.primary()?)?)
        }
        IndicatorKind::Kama => {
            let kama = Kama::new(params.number("fast")?, params.number("slow")?)?;
            IndicatorResult::single(kama.compute(inputs.primary()?))
        }
        IndicatorKind::Mama => {
            let mama = Mama::new(params.number("fastlimit")?, params.number("slowlimit")?)?;
            IndicatorResult::single(mama.compute(inputs.primary()?))
        }
        IndicatorKind::T3 => {
            let t3 = T3::new(params.period("period")?, params.number("vfactor")?)?;
            IndicatorResult::single(t3.compute(inputs.primary()?))
        }
        IndicatorKind::Vwap => {
            let reset: ResetInterval = params.choice("resetInterval")?;
            let multipliers = Vwap::parse_multipliers(&params.text("sdMultipliers")?)?;
            let (high, low, close) = inputs.hlc()?;
            let volume = inputs.column(PriceField::Volume)?;
            Vwap::new(reset, multipliers)
                .compute(high, low, close, volume, inputs.timestamps())
                .into()
        }
        IndicatorKind::Candle => {
            let component: PriceField = params.choice("component")?;
            IndicatorResult::single(Candle::new(component).compute(inputs)?)
        }
        IndicatorKind::Number => {
            let value = params.number("value")?;
            IndicatorResult::single(Constant::new(value).compute(inputs.len()))
        }
        IndicatorKind::Rsi => {
            let rsi = Rsi::new(params.period("period")?)?;
            IndicatorResult::single(rsi.compute(inputs.primary()?)?)
        }
        IndicatorKind::RsiWilder => {
            let rsi = WilderRsi::new(params.period("period")?)?;
            IndicatorResult::single(rsi.compute(inputs.primary()?))
        }
        IndicatorKind::Stochastic => {
            let stoch_type: StochasticType = params.choice("type")?;
            let stoch = Stochastic::new(params.period("period")?, stoch_type)?;
            let (high, low, close) = inputs.hlc()?;
            stoch.compute(high, low, close)?.into()
        }
        IndicatorKind::Macd | IndicatorKind::MacdSignal => {
            let macd = Macd::new(
                params.period("fastPeriod")?,
                params.period("slowPeriod")?,
                params.period("signalPeriod")?,
            )?;
            let primary = if kind == IndicatorKind::Macd {
                MacdLine::Macd
            } else {
                MacdLine::Signal
            };
            macd.compute(inputs.primary()?).into_result(primary)
        }
        IndicatorKind::Supertrend => {
            let supertrend = Supertrend::new(
                params.period("period")?,
                params.period("atr_period")?,
                params.number("multiplier")?,
            )?;
            let (high, low, close) = inputs.hlc()?;
            IndicatorResult::single(supertrend.compute(high, low, close)?)
        }
        IndicatorKind::Adx | IndicatorKind::PlusDi | IndicatorKind::MinusDi => {
            let directional = Directional::new(params.period("period")?)?;
            let primary = match kind {
                IndicatorKind::PlusDi => DirectionalLine::PlusDi,
                IndicatorKind::MinusDi => DirectionalLine::MinusDi,
                _ => DirectionalLine::Adx,
            };
            let (high, low, close) = inputs.hlc()?;
            directional.compute(high, low, close).into_result(primary)
        }
        IndicatorKind::ParabolicSar => {
            let sar = ParabolicSar::new(params.number("acceleration")?, params.number("maximum")?)?;
            let high = inputs.column(PriceField::High)?;
            let low = inputs.column(PriceField::Low)?;
            IndicatorResult::single(sar.compute(high, low))
        }
        IndicatorKind::Bbands => {
            let period = params.period("period")?;
            let up = band_deviation(params, "nbdevup")?;
            let down = band_deviation(params, "nbdevdn")?;
            Bollinger::with_deviations(period, up, down)?
                .compute(inputs.primary()?)?
                .into()
        }
        IndicatorKind::Atr => {
            let atr = Atr::new(params.period("period")?)?;
            let (high, low, close) = inputs.hlc()?;
            IndicatorResult::single(atr.compute(high, low, close)?)
        }
        IndicatorKind::TrueRange => {
            let tr = TrueRange::new(params.period("smoothing")?)?;
            let (high, low, close) = inputs.hlc()?;
            IndicatorResult::single(tr.compute(high, low, close)?)
        }
        IndicatorKind::PivotPoint => {
            let method: PivotMethod = params.choice("type")?;
            let level: PivotLevel = params.choice("level")?;
            let (high, low, close) = inputs.hlc()?;
            PivotPoints::new(method, level).compute(high, low, close)
        }
        IndicatorKind::CamarillaPivot => {
            let level: CamarillaLevel = params.choice("level")?;
            let (high, low, close) = inputs.hlc()?;
            CamarillaPivot::new(level).compute(high, low, close)
        }
        IndicatorKind::LinearRegression | IndicatorKind::LinearRegressionIntercept => {
            let output = if kind == IndicatorKind::LinearRegression {
                RegressionOutput::Value
            } else {
                RegressionOutput::Intercept
            };
            let lr = LinearRegression::new(params.period("period")?, output)?;
            IndicatorResult::single(lr.compute(inputs.primary()?)?)
        }
    };
    Ok(result)
}

/// One side's band multiplier: the per-side override if given, else
/// `stdDev`. A bad value is reported under whichever name supplied it.
fn band_deviation(params: &ResolvedParams, side: &'static str) -> Result<f64, EngineError> {
    let (name, value) = match params.optional_number(side)? {
        Some(value) => (side, value),
        None => ("stdDev", params.number("stdDev")?),
    };
    if !value.is_finite() {
        return Err(EngineError::invalid_parameter(name, format!("must be finite, got {value}")));
    }
    Ok(value)
}
