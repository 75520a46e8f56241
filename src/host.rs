use ndarray::Array2;

/// A value in the host numerical-computing runtime.
///
/// The host runtime itself is opaque to this crate; this enum is the
/// narrow slice of it the call surface needs: character strings and
/// numeric scalars for the configuration pairs, and dense 2-D matrices
/// in the three element types that cross the boundary (uint8 images and
/// descriptors, single-precision descriptors, double-precision results).
#[derive(Debug, Clone, PartialEq)]
pub enum HostValue {
    /// A character string.
    Text(String),
    /// A numeric scalar in the host's default double precision.
    Scalar(f64),
    /// A 2-D matrix of unsigned 8-bit integers.
    Uint8(Array2<u8>),
    /// A 2-D matrix of single-precision floats.
    Single(Array2<f32>),
    /// A 2-D matrix of double-precision floats.
    Double(Array2<f64>),
}

impl HostValue {
    pub fn text(s: impl Into<String>) -> Self {
        HostValue::Text(s.into())
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            HostValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Scalar extraction in the host's manner: any numeric value yields
    /// its first element, regardless of shape. Strings yield nothing.
    pub fn numeric_scalar(&self) -> Option<f64> {
        match self {
            HostValue::Scalar(v) => Some(*v),
            HostValue::Uint8(m) => m.first().map(|&v| f64::from(v)),
            HostValue::Single(m) => m.first().map(|&v| f64::from(v)),
            HostValue::Double(m) => m.first().copied(),
            HostValue::Text(_) => None,
        }
    }
}
