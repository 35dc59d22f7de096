use ndarray::{ArrayView1, Zip};

use crate::Float;

#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

/// A distance metric between two feature vectors of equal length.
///
/// `distance` is the true metric. `rdistance` is a cheaper "reduced" distance that
/// orders pairs the same way (e.g. squared Euclidean for L2) and is what hot loops
/// should compare against each other.
///
/// Both vectors must have the same length; the metrics panic otherwise, so callers
/// that cannot guarantee it should check first.
pub trait Distance<F: Float> {
    fn distance(&self, a: ArrayView1<F>, b: ArrayView1<F>) -> F;

    fn rdistance(&self, a: ArrayView1<F>, b: ArrayView1<F>) -> F {
        self.distance(a, b)
    }

    /// Converts a reduced distance back into a true distance.
    fn rdist_to_dist(&self, rdist: F) -> F {
        rdist
    }
}

/// Manhattan distance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
pub struct L1Dist;

impl<F: Float> Distance<F> for L1Dist {
    fn distance(&self, a: ArrayView1<F>, b: ArrayView1<F>) -> F {
        Zip::from(&a)
            .and(&b)
            .fold(F::zero(), |acc, &x, &y| acc + (x - y).abs())
    }
}

/// Euclidean distance. `rdistance` is the squared distance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
pub struct L2Dist;

impl<F: Float> Distance<F> for L2Dist {
    fn distance(&self, a: ArrayView1<F>, b: ArrayView1<F>) -> F {
        self.rdistance(a, b).sqrt()
    }

    fn rdistance(&self, a: ArrayView1<F>, b: ArrayView1<F>) -> F {
        Zip::from(&a).and(&b).fold(F::zero(), |acc, &x, &y| {
            let d = x - y;
            acc + d * d
        })
    }

    fn rdist_to_dist(&self, rdist: F) -> F {
        rdist.sqrt()
    }
}

/// Chebyshev distance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
pub struct LInfDist;

impl<F: Float> Distance<F> for LInfDist {
    fn distance(&self, a: ArrayView1<F>, b: ArrayView1<F>) -> F {
        Zip::from(&a)
            .and(&b)
            .fold(F::zero(), |acc, &x, &y| acc.max((x - y).abs()))
    }
}

/// Minkowski distance of order `p`. `rdistance` skips the final root.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
pub struct LpDist<F: Float>(pub F);

impl<F: Float> LpDist<F> {
    pub fn new(p: F) -> Self {
        LpDist(p)
    }
}

impl<F: Float> Distance<F> for LpDist<F> {
    fn distance(&self, a: ArrayView1<F>, b: ArrayView1<F>) -> F {
        self.rdist_to_dist(self.rdistance(a, b))
    }

    fn rdistance(&self, a: ArrayView1<F>, b: ArrayView1<F>) -> F {
        Zip::from(&a)
            .and(&b)
            .fold(F::zero(), |acc, &x, &y| acc + (x - y).abs().powf(self.0))
    }

    fn rdist_to_dist(&self, rdist: F) -> F {
        rdist.powf(F::one() / self.0)
    }
}
