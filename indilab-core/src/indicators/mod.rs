//! Concrete indicator implementations.
//!
//! Each indicator is a small struct holding validated parameters. Building
//! one can fail with `InvalidParameter`; computing never fails afterwards
//! except where a primitive re-checks its own contract.
//!
//! Multi-series indicators (MACD, Bollinger, Stochastic, VWAP, directional
//! movement, pivots) return a typed output struct that converts into an
//! `IndicatorResult` with named metadata.

pub mod adaptive;
pub mod atr;
pub mod bollinger;
pub mod directional;
pub mod ema;
pub mod macd;
pub mod parabolic_sar;
pub mod pivot;
pub mod price;
pub mod regression;
pub mod rsi;
pub mod sma;
pub mod stochastic;
pub mod supertrend;
pub mod trima;
pub mod vwap;
pub mod wma;

pub use adaptive::{Kama, Mama};
pub use atr::{true_range, Atr, TrueRange};
pub use bollinger::{Bollinger, BollingerOutput};
pub use directional::{Directional, DirectionalLine, DirectionalOutput};
pub use ema::{Dema, Ema, Tema, T3};
pub use macd::{Macd, MacdLine, MacdOutput};
pub use parabolic_sar::ParabolicSar;
pub use pivot::{CamarillaLevel, CamarillaPivot, PivotLevel, PivotMethod, PivotOutput, PivotPoints};
pub use price::{Candle, Constant};
pub use regression::{LinearRegression, RegressionOutput};
pub use rsi::{Rsi, WilderRsi};
pub use sma::Sma;
pub use stochastic::{Stochastic, StochasticOutput, StochasticType};
pub use supertrend::Supertrend;
pub use trima::Trima;
pub use vwap::{ResetInterval, Vwap, VwapBand, VwapOutput};
pub use wma::Wma;

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Assert a series matches `expected` element-wise; NaN must match NaN.
#[cfg(test)]
pub fn assert_series(actual: &[f64], expected: &[f64]) {
    assert_eq!(actual.len(), expected.len(), "series length mismatch");
    for (i, (&a, &e)) in actual.iter().zip(expected).enumerate() {
        if e.is_nan() {
            assert!(a.is_nan(), "expected NaN at index {i}, got {a}");
        } else {
            assert!(
                (a - e).abs() < DEFAULT_EPSILON,
                "index {i}: actual={a}, expected={e}"
            );
        }
    }
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
