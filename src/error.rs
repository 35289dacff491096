use std::error::Error;
use std::fmt::{Display, Formatter};

/// Failures reported by the fallible math operations.
///
/// Degenerate numeric input never produces NaN or infinity silently,
/// it ends up here instead.
#[derive(Debug, Clone, PartialEq)]
pub enum MathError {
    /// Component, row or column index outside the valid range `0..len`.
    IndexOutOfRange { index: usize, len: usize },
    /// Normalizing a vector whose magnitude is (almost) zero.
    ZeroLength,
    /// Inverting or normalizing a quaternion with (almost) zero norm.
    ZeroNorm,
    /// Inverting a matrix whose determinant is (almost) zero.
    Singular { determinant: f32 },
    /// Homogeneous divide by a w component that is (almost) zero.
    DegenerateW { w: f32 },
    /// Projection parameters that do not describe a valid frustum.
    InvalidProjection(&'static str),
    /// A color string that is not `#RRGGBB` or `#RRGGBBAA`, with the reason.
    InvalidHex(String),
}

impl Error for MathError {}

impl Display for MathError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            MathError::IndexOutOfRange { index, len } => {
                write!(f, "index {index} out of range, expected 0..{len}")
            }
            MathError::ZeroLength => write!(f, "cannot normalize a zero length vector"),
            MathError::ZeroNorm => write!(f, "quaternion has zero norm"),
            MathError::Singular { determinant } => {
                write!(f, "matrix is singular (determinant {determinant})")
            }
            MathError::DegenerateW { w } => {
                write!(f, "homogeneous w component is degenerate ({w})")
            }
            MathError::InvalidProjection(reason) => write!(f, "invalid projection: {reason}"),
            MathError::InvalidHex(reason) => {
                write!(f, "invalid color ({reason}), expected #RRGGBB or #RRGGBBAA")
            }
        }
    }
}

impl From<hex::FromHexError> for MathError {
    fn from(error: hex::FromHexError) -> Self {
        MathError::InvalidHex(error.to_string())
    }
}

pub(crate) fn check_index(index: usize, len: usize) -> Result<usize, MathError> {
    if index < len {
        Ok(index)
    } else {
        Err(MathError::IndexOutOfRange { index, len })
    }
}
