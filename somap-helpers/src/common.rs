use ndarray::{Array1, ArrayView1, ArrayView2, Axis};
use rand::Rng;

use crate::Float;

/// Builds a vector of `dim` values drawn uniformly from `[0, 1)`.
pub fn uniform_vector<F, R>(dim: usize, rng: &mut R) -> Array1<F>
where
    F: Float,
    R: Rng + ?Sized,
{
    Array1::from_shape_fn(dim, |_| rng.random_range(F::zero()..F::one()))
}

/// Draws one row of `data` uniformly at random, with replacement.
///
/// Returns the row index together with a view of the row, or `None` if `data`
/// has no rows.
pub fn draw_sample<'a, F, R>(data: ArrayView2<'a, F>, rng: &mut R) -> Option<(usize, ArrayView1<'a, F>)>
where
    F: Float,
    R: Rng + ?Sized,
{
    if data.nrows() == 0 {
        return None;
    }
    let idx = rng.random_range(0..data.nrows());
    Some((idx, data.index_axis_move(Axis(0), idx)))
}
