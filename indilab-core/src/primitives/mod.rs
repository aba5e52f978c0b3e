//! The two numeric patterns every indicator is built from.
//!
//! - [`windowed_reduce`]: fixed trailing window, NaN during warm-up.
//! - [`RecursiveSmoother`]: exponential recursion seeded at index 0.

pub mod smoother;
pub mod window;

pub use smoother::RecursiveSmoother;
pub use window::{validate_period, windowed_map, windowed_reduce, Reducer};
