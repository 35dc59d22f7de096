use ndarray::{Array1, ArrayView1, Zip};
use rand::Rng;
use somap_helpers::{uniform_vector, Distance, Float};

#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

use crate::error::{Result, SomError};

/// A single map unit: a prototype vector plus a stable identifier.
///
/// The id survives reordering of the node collection, so callers can tell a
/// respawned node apart from the one it replaced.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
pub struct Node<F: Float> {
    id: usize,
    weights: Array1<F>,
}

impl<F: Float> Node<F> {
    /// Creates a node with weights drawn uniformly from `[0, 1)`.
    pub fn random<R: Rng + ?Sized>(id: usize, dimensions: usize, rng: &mut R) -> Result<Self> {
        if dimensions == 0 {
            return Err(SomError::Configuration(
                "nodes need at least one dimension".into(),
            ));
        }
        Ok(Self {
            id,
            weights: uniform_vector(dimensions, rng),
        })
    }

    /// Creates a node whose weights are a copy of `weights`.
    pub fn from_weights(id: usize, weights: ArrayView1<F>, dimensions: usize) -> Result<Self> {
        check_len(dimensions, weights.len())?;
        Ok(Self {
            id,
            weights: weights.to_owned(),
        })
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn weights(&self) -> ArrayView1<F> {
        self.weights.view()
    }

    pub fn dimensions(&self) -> usize {
        self.weights.len()
    }

    /// Distance between this node's weights and `input` under `metric`.
    ///
    /// With `L2Dist` this is the Euclidean distance.
    pub fn distance<D: Distance<F>>(&self, input: ArrayView1<F>, metric: &D) -> Result<F> {
        check_len(self.weights.len(), input.len())?;
        Ok(metric.distance(self.weights.view(), input))
    }

    /// Reduced distance to `input`, e.g. squared Euclidean for `L2Dist`.
    pub fn rdistance<D: Distance<F>>(&self, input: ArrayView1<F>, metric: &D) -> Result<F> {
        check_len(self.weights.len(), input.len())?;
        Ok(metric.rdistance(self.weights.view(), input))
    }

    /// Moves the weights toward `input`:
    /// `w[i] += influence * learning_rate * (input[i] - w[i])`.
    ///
    /// Weights are not clamped and may leave the unit range.
    pub fn adjust_weight(&mut self, input: ArrayView1<F>, learning_rate: F, influence: F) -> Result<()> {
        check_len(self.weights.len(), input.len())?;
        Zip::from(&mut self.weights)
            .and(&input)
            .for_each(|w, &x| *w += influence * learning_rate * (x - *w));
        Ok(())
    }
}

fn check_len(expected: usize, found: usize) -> Result<()> {
    if expected != found {
        return Err(SomError::DimensionMismatch { expected, found });
    }
    Ok(())
}
