//! Sliding-window aggregation.
//!
//! `output[i]` is NaN while `i < period - 1`, otherwise a reduction of
//! `input[i + 1 - period ..= i]`. Every window is reduced from scratch, so a
//! NaN inside a window yields NaN for exactly the windows that contain it.

use crate::domain::SeriesBuffer;
use crate::error::EngineError;

/// Reject a zero period before any window is formed.
pub fn validate_period(name: &str, period: usize) -> Result<(), EngineError> {
    if period == 0 {
        return Err(EngineError::invalid_parameter(name, "must be >= 1, got 0"));
    }
    Ok(())
}

/// Built-in window reducers.
#[derive(Debug, Clone, Copy)]
pub enum Reducer<'a> {
    /// Sum of the window, accumulated oldest to newest.
    Sum,
    /// Arithmetic mean: `Sum / period`.
    Mean,
    /// Population variance around `center[i]`, accumulated newest to oldest.
    ///
    /// The center is supplied rather than recomputed so that bands built on
    /// an already-computed mean stay numerically consistent with it.
    Variance { center: &'a [f64] },
}

/// Apply a [`Reducer`] over every trailing window of `period` values.
///
/// `period > input.len()` yields an all-NaN buffer.
pub fn windowed_reduce(
    input: &[f64],
    period: usize,
    reducer: Reducer<'_>,
) -> Result<SeriesBuffer, EngineError> {
    let divisor = period as f64;
    match reducer {
        Reducer::Sum => windowed_map(input, period, |_, window| window_sum(window)),
        Reducer::Mean => windowed_map(input, period, |_, window| window_sum(window) / divisor),
        Reducer::Variance { center } => windowed_map(input, period, |i, window| {
            let mean = center.get(i).copied().unwrap_or(f64::NAN);
            let mut acc = 0.0;
            for &v in window.iter().rev() {
                let diff = v - mean;
                acc += diff * diff;
            }
            acc / divisor
        }),
    }
}

/// Generic form of [`windowed_reduce`]: `f(i, window)` for each defined index.
///
/// The closure sees the output index and the window slice ending at it.
pub fn windowed_map<F>(input: &[f64], period: usize, mut f: F) -> Result<SeriesBuffer, EngineError>
where
    F: FnMut(usize, &[f64]) -> f64,
{
    validate_period("period", period)?;

    let n = input.len();
    let mut out = vec![f64::NAN; n];
    if n < period {
        return Ok(out.into());
    }

    for i in (period - 1)..n {
        out[i] = f(i, &input[i + 1 - period..=i]);
    }
    Ok(out.into())
}

fn window_sum(window: &[f64]) -> f64 {
    window.iter().fold(0.0, |acc, &v| acc + v)
}
