//! Floor-trader pivot points and Camarilla levels.
//!
//! Every level at bar `i` is derived from the previous bar's high, low and
//! close, so bar 0 is undefined. Lookback: 1.
//!
//! Standard:  P = (H+L+C)/3, R1 = 2P−L, R2 = P+(H−L), R3 = H+2(P−L),
//!            S1 = 2P−H, S2 = P−(H−L), S3 = L−2(H−P)
//! Fibonacci: R/S n = P ± {0.382, 0.618, 1.0}·(H−L)
//! Camarilla: R/S n = C ± (H−L)·1.1/{12, 6, 4}
//!
//! The dedicated Camarilla indicator publishes five levels either side:
//! H/L n = C ± (H−L)·1.1/{24, 12, 6, 4} for n = 1..4 and C ± (H−L)·1.618
//! for n = 5.

use std::fmt;
use std::str::FromStr;

use crate::domain::{IndicatorResult, SeriesBuffer};

/// Formula family for [`PivotPoints`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PivotMethod {
    #[default]
    Standard,
    Fibonacci,
    Camarilla,
}

impl PivotMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            PivotMethod::Standard => "standard",
            PivotMethod::Fibonacci => "fibonacci",
            PivotMethod::Camarilla => "camarilla",
        }
    }
}

impl fmt::Display for PivotMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PivotMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "standard" | "classic" => Ok(PivotMethod::Standard),
            "fibonacci" => Ok(PivotMethod::Fibonacci),
            "camarilla" => Ok(PivotMethod::Camarilla),
            other => Err(format!("unknown pivot type '{other}'")),
        }
    }
}

/// A named level, parsed from the `level` select.
macro_rules! level_enum {
    ($name:ident, $what:literal, { $($variant:ident => $text:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_ascii_lowercase().as_str() {
                    $($text => Ok($name::$variant),)+
                    other => Err(format!(concat!("unknown ", $what, " '{}'"), other)),
                }
            }
        }
    };
}

level_enum!(PivotLevel, "pivot level", {
    Pp => "pp", R1 => "r1", R2 => "r2", R3 => "r3", S1 => "s1", S2 => "s2", S3 => "s3",
});

level_enum!(CamarillaLevel, "camarilla level", {
    H5 => "h5", H4 => "h4", H3 => "h3", H2 => "h2", H1 => "h1", Pp => "pp",
    L1 => "l1", L2 => "l2", L3 => "l3", L4 => "l4", L5 => "l5",
});

/// All levels of one pivot computation, by metadata name.
#[derive(Debug, Clone)]
pub struct PivotOutput {
    pub levels: Vec<(&'static str, SeriesBuffer)>,
}

impl PivotOutput {
    pub fn level(&self, name: &str) -> Option<&SeriesBuffer> {
        self.levels.iter().find(|(n, _)| *n == name).map(|(_, s)| s)
    }

    /// `selected` becomes `values`; every level, the selected one
    /// included, is also published as metadata.
    fn into_result(self, selected: &str) -> IndicatorResult {
        let len = self.levels.first().map_or(0, |(_, series)| series.len());
        let values = self
            .level(selected)
            .cloned()
            .unwrap_or_else(|| SeriesBuffer::undefined(len));
        self.levels
            .into_iter()
            .fold(IndicatorResult::single(values), |result, (name, series)| {
                result.with_series(name, series)
            })
    }
}

/// Evaluate `levels` on each previous bar; bar 0 is NaN everywhere.
fn from_previous_bar<const N: usize>(
    high: &[f64],
    low: &[f64],
    close: &[f64],
    names: [&'static str; N],
    levels: impl Fn(f64, f64, f64) -> [f64; N],
) -> PivotOutput {
    let n = high.len().min(low.len()).min(close.len());
    let mut columns: Vec<Vec<f64>> = (0..N).map(|_| Vec::with_capacity(n)).collect();
    for i in 0..n {
        let row = if i == 0 {
            [f64::NAN; N]
        } else {
            levels(high[i - 1], low[i - 1], close[i - 1])
        };
        for (column, v) in columns.iter_mut().zip(row) {
            column.push(v);
        }
    }
    PivotOutput {
        levels: names.into_iter().zip(columns.into_iter().map(SeriesBuffer::from)).collect(),
    }
}

#[derive(Debug, Clone, Copy)]
pub struct PivotPoints {
    method: PivotMethod,
    level: PivotLevel,
}

impl PivotPoints {
    pub fn new(method: PivotMethod, level: PivotLevel) -> Self {
        Self { method, level }
    }

    pub fn lookback(&self) -> usize {
        1
    }

    pub fn levels(&self, high: &[f64], low: &[f64], close: &[f64]) -> PivotOutput {
        let names = ["pivot", "r1", "r2", "r3", "s1", "s2", "s3"];
        match self.method {
            PivotMethod::Standard => from_previous_bar(high, low, close, names, |h, l, c| {
                let p = (h + l + c) / 3.0;
                [
                    p,
                    2.0 * p - l,
                    p + (h - l),
                    h + 2.0 * (p - l),
                    2.0 * p - h,
                    p - (h - l),
                    l - 2.0 * (h - p),
                ]
            }),
            PivotMethod::Fibonacci => from_previous_bar(high, low, close, names, |h, l, c| {
                let p = (h + l + c) / 3.0;
                [
                    p,
                    p + 0.382 * (h - l),
                    p + 0.618 * (h - l),
                    p + 1.000 * (h - l),
                    p - 0.382 * (h - l),
                    p - 0.618 * (h - l),
                    p - 1.000 * (h - l),
                ]
            }),
            PivotMethod::Camarilla => from_previous_bar(high, low, close, names, |h, l, c| {
                [
                    (h + l + c) / 3.0,
                    c + (h - l) * 1.1 / 12.0,
                    c + (h - l) * 1.1 / 6.0,
                    c + (h - l) * 1.1 / 4.0,
                    c - (h - l) * 1.1 / 12.0,
                    c - (h - l) * 1.1 / 6.0,
                    c - (h - l) * 1.1 / 4.0,
                ]
            }),
        }
    }

    pub fn compute(&self, high: &[f64], low: &[f64], close: &[f64]) -> IndicatorResult {
        let selected = match self.level {
            PivotLevel::Pp => "pivot",
            other => other.as_str(),
        };
        self.levels(high, low, close).into_result(selected)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct CamarillaPivot {
    level: CamarillaLevel,
}

impl CamarillaPivot {
    pub fn new(level: CamarillaLevel) -> Self {
        Self { level }
    }

    pub fn lookback(&self) -> usize {
        1
    }

    pub fn levels(&self, high: &[f64], low: &[f64], close: &[f64]) -> PivotOutput {
        let names = ["h5", "h4", "h3", "h2", "h1", "pp", "l1", "l2", "l3", "l4", "l5"];
        from_previous_bar(high, low, close, names, |h, l, c| {
            let range = h - l;
            [
                c + (range * 1.618),
                c + (range * 1.1 / 4.0),
                c + (range * 1.1 / 6.0),
                c + (range * 1.1 / 12.0),
                c + (range * 1.1 / 24.0),
                (h + l + c) / 3.0,
                c - (range * 1.1 / 24.0),
                c - (range * 1.1 / 12.0),
                c - (range * 1.1 / 6.0),
                c - (range * 1.1 / 4.0),
                c - (range * 1.618),
            ]
        })
    }

    pub fn compute(&self, high: &[f64], low: &[f64], close: &[f64]) -> IndicatorResult {
        self.levels(high, low, close).into_result(self.level.as_str())
    }
}
