//! Exponential moving averages: EMA, DEMA, TEMA and Tillson's T3.
//!
//! All four are built on `RecursiveSmoother`, which seeds with the first
//! raw value. There is no warm-up gap: index 0 is defined.
//! Lookback: 0.

use crate::domain::SeriesBuffer;
use crate::error::EngineError;
use crate::primitives::RecursiveSmoother;

#[derive(Debug, Clone, Copy)]
pub struct Ema {
    smoother: RecursiveSmoother,
}

impl Ema {
    pub fn new(period: usize) -> Result<Self, EngineError> {
        Ok(Self {
            smoother: RecursiveSmoother::new(period)?,
        })
    }

    pub fn period(&self) -> usize {
        self.smoother.period()
    }

    pub fn lookback(&self) -> usize {
        0
    }

    pub fn compute(&self, input: &[f64]) -> SeriesBuffer {
        self.smoother.smooth(input)
    }
}

/// Double EMA: `2·E1 − E2` where `E2 = EMA(E1)`.
#[derive(Debug, Clone, Copy)]
pub struct Dema {
    smoother: RecursiveSmoother,
}

impl Dema {
    pub fn new(period: usize) -> Result<Self, EngineError> {
        Ok(Self {
            smoother: RecursiveSmoother::new(period)?,
        })
    }

    pub fn compute(&self, input: &[f64]) -> SeriesBuffer {
        let e1 = self.smoother.smooth(input);
        let e2 = self.smoother.smooth(&e1);
        e1.zip_with(&e2, |a, b| 2.0 * a - b)
    }
}

/// Triple EMA: `3·E1 − 3·E2 + E3`.
#[derive(Debug, Clone, Copy)]
pub struct Tema {
    smoother: RecursiveSmoother,
}

impl Tema {
    pub fn new(period: usize) -> Result<Self, EngineError> {
        Ok(Self {
            smoother: RecursiveSmoother::new(period)?,
        })
    }

    pub fn compute(&self, input: &[f64]) -> SeriesBuffer {
        let e1 = self.smoother.smooth(input);
        let e2 = self.smoother.smooth(&e1);
        let e3 = self.smoother.smooth(&e2);
        (0..e1.len())
            .map(|i| 3.0 * e1[i] - 3.0 * e2[i] + e3[i])
            .collect()
    }
}

/// Tillson T3: six chained EMAs blended with coefficients from the volume
/// factor `a`:
///
/// `c1 = −a³`, `c2 = 3a² + 3a³`, `c3 = −6a² − 3a − 3a³`,
/// `c4 = 1 + 3a + a³ + 3a²`, `T3 = c1·e6 + c2·e5 + c3·e4 + c4·e3`.
///
/// The coefficients sum to 1, so a constant input comes back unchanged.
#[derive(Debug, Clone, Copy)]
pub struct T3 {
    smoother: RecursiveSmoother,
    vfactor: f64,
}

impl T3 {
    pub fn new(period: usize, vfactor: f64) -> Result<Self, EngineError> {
        if !vfactor.is_finite() {
            return Err(EngineError::invalid_parameter(
                "vfactor",
                format!("must be finite, got {vfactor}"),
            ));
        }
        Ok(Self {
            smoother: RecursiveSmoother::new(period)?,
            vfactor,
        })
    }

    pub fn compute(&self, input: &[f64]) -> SeriesBuffer {
        let a = self.vfactor;
        let a2 = a * a;
        let a3 = a2 * a;
        let c1 = -a3;
        let c2 = 3.0 * a2 + 3.0 * a3;
        let c3 = -6.0 * a2 - 3.0 * a - 3.0 * a3;
        let c4 = 1.0 + 3.0 * a + a3 + 3.0 * a2;

        let e1 = self.smoother.smooth(input);
        let e2 = self.smoother.smooth(&e1);
        let e3 = self.smoother.smooth(&e2);
        let e4 = self.smoother.smooth(&e3);
        let e5 = self.smoother.smooth(&e4);
        let e6 = self.smoother.smooth(&e5);
        (0..e1.len())
            .map(|i| c1 * e6[i] + c2 * e5[i] + c3 * e4[i] + c4 * e3[i])
            .collect()
    }
}
