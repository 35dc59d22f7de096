use ndarray::{NdFloat, ScalarOperand};

use num_traits::{AsPrimitive, FromPrimitive, Signed};
use rand::distr::uniform::SampleUniform;

use std::iter::Sum;
use std::ops::{AddAssign, DivAssign, MulAssign, SubAssign};

// Include submodules
mod common;
mod distance;

// Re-export types from submodules
pub use common::{draw_sample, uniform_vector};
pub use distance::{Distance, L1Dist, L2Dist, LInfDist, LpDist};

/// Scalar type shared by every algorithm in the workspace.
///
/// Implemented for `f32` and `f64`.
pub trait Float:
    NdFloat
    + FromPrimitive
    + Default
    + Signed
    + Sum
    + AsPrimitive<usize>
    + for<'a> AddAssign<&'a Self>
    + for<'a> MulAssign<&'a Self>
    + for<'a> SubAssign<&'a Self>
    + for<'a> DivAssign<&'a Self>
    + num_traits::MulAdd<Output = Self>
    + SampleUniform
    + ScalarOperand
    + std::marker::Unpin
{
    /// Converts an `f64` constant, rounding to the nearest value for `f32`.
    fn lit(x: f64) -> Self;

    /// Converts a count (iterations, sample totals) into the scalar type.
    fn from_count(n: usize) -> Self;
}

impl Float for f32 {
    fn lit(x: f64) -> Self {
        x as f32
    }

    fn from_count(n: usize) -> Self {
        n as f32
    }
}

impl Float for f64 {
    fn lit(x: f64) -> Self {
        x
    }

    fn from_count(n: usize) -> Self {
        n as f64
    }
}
