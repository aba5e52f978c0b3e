//! SeriesBuffer: the immutable numeric series every indicator reads and writes.
//!
//! Index `i` corresponds to bar `i` of the originating `OhlcSeries`. Warm-up
//! positions hold `f64::NAN`; on the wire NaN travels as JSON `null`.

use std::ops::Deref;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Ordered sequence of `f64` values, one per bar.
///
/// There is no mutable access: every transformation produces a new buffer.
#[derive(Debug, Clone, Default)]
pub struct SeriesBuffer {
    values: Vec<f64>,
}

impl SeriesBuffer {
    /// A buffer of `len` NaN values (fully undefined).
    pub fn undefined(len: usize) -> Self {
        Self {
            values: vec![f64::NAN; len],
        }
    }

    /// A buffer repeating `value` `len` times.
    pub fn constant(value: f64, len: usize) -> Self {
        Self {
            values: vec![value; len],
        }
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    pub fn into_vec(self) -> Vec<f64> {
        self.values
    }

    /// Apply `f` to every element, yielding a new buffer.
    pub fn map(&self, f: impl Fn(f64) -> f64) -> Self {
        self.values.iter().map(|&v| f(v)).collect()
    }

    /// Combine two equal-length buffers element-wise.
    ///
    /// Indices past the shorter buffer are NaN; indicator code only ever
    /// zips buffers derived from the same input, so lengths always agree.
    pub fn zip_with(&self, other: &SeriesBuffer, f: impl Fn(f64, f64) -> f64) -> Self {
        debug_assert_eq!(self.len(), other.len(), "zip_with length mismatch");
        (0..self.len())
            .map(|i| match other.values.get(i) {
                Some(&b) => f(self.values[i], b),
                None => f64::NAN,
            })
            .collect()
    }

    /// Number of leading NaN values (the warm-up length actually observed).
    pub fn leading_undefined(&self) -> usize {
        self.values.iter().take_while(|v| v.is_nan()).count()
    }

    /// Bitwise equality, treating NaN as equal to NaN.
    pub fn same_values(&self, other: &SeriesBuffer) -> bool {
        self.len() == other.len()
            && self
                .values
                .iter()
                .zip(&other.values)
                .all(|(a, b)| a.to_bits() == b.to_bits() || (a.is_nan() && b.is_nan()))
    }
}

impl Deref for SeriesBuffer {
    type Target = [f64];

    fn deref(&self) -> &[f64] {
        &self.values
    }
}

impl AsRef<[f64]> for SeriesBuffer {
    fn as_ref(&self) -> &[f64] {
        &self.values
    }
}

impl From<Vec<f64>> for SeriesBuffer {
    fn from(values: Vec<f64>) -> Self {
        Self { values }
    }
}

impl From<&[f64]> for SeriesBuffer {
    fn from(values: &[f64]) -> Self {
        Self {
            values: values.to_vec(),
        }
    }
}

impl FromIterator<f64> for SeriesBuffer {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

impl Serialize for SeriesBuffer {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        nan_as_null::serialize(&self.values, serializer)
    }
}

impl<'de> Deserialize<'de> for SeriesBuffer {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        nan_as_null::deserialize(deserializer).map(SeriesBuffer::from)
    }
}

/// Serde adapter for `Vec<f64>` that writes NaN as `null` and reads `null` as NaN.
///
/// JSON has no NaN literal; callers on the other side of the worker boundary
/// produce and expect `null` for undefined bars.
pub mod nan_as_null {
    use serde::ser::SerializeSeq;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(values: &[f64], serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(values.len()))?;
        for v in values {
            if v.is_nan() {
                seq.serialize_element(&Option::<f64>::None)?;
            } else {
                seq.serialize_element(v)?;
            }
        }
        seq.end()
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<f64>, D::Error> {
        let raw = Vec::<Option<f64>>::deserialize(deserializer)?;
        Ok(raw.into_iter().map(|v| v.unwrap_or(f64::NAN)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn map_and_zip_produce_new_buffers() {
        let a = SeriesBuffer::from(vec![1.0, 2.0, 3.0]);
        let b = a.map(|v| v * 2.0);
        let c = a.zip_with(&b, |x, y| y - x);
        assert_eq!(a.as_slice(), &[1.0, 2.0, 3.0]);
        assert_eq!(b.as_slice(), &[2.0, 4.0, 6.0]);
        assert_eq!(c.as_slice(), &[1.0, 2.0, 3.0]);
    }

    #[test]
    fn leading_undefined_counts_warmup() {
        let s = SeriesBuffer::from(vec![f64::NAN, f64::NAN, 2.0, f64::NAN]);
        assert_eq!(s.leading_undefined(), 2);
        assert_eq!(SeriesBuffer::undefined(3).leading_undefined(), 3);
    }

    #[test]
    fn same_values_treats_nan_as_equal() {
        let a = SeriesBuffer::from(vec![f64::NAN, 1.0]);
        let b = SeriesBuffer::from(vec![f64::NAN, 1.0]);
        let c = SeriesBuffer::from(vec![0.0, 1.0]);
        assert!(a.same_values(&b));
        assert!(!a.same_values(&c));
    }

    #[test]
    fn nan_serializes_as_null() {
        let s = SeriesBuffer::from(vec![f64::NAN, 1.5]);
        assert_eq!(serde_json::to_string(&s).unwrap(), "[null,1.5]");
    }

    #[test]
    fn null_deserializes_as_nan() {
        let s: SeriesBuffer = serde_json::from_str("[null, 2, 3.5]").unwrap();
        assert!(s[0].is_nan());
        assert_eq!(&s[1..], &[2.0, 3.5]);
    }
}
