use ndarray::{Array2, ArrayView1, ArrayView2};
use somap_helpers::{Distance, Float};

#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

use crate::engine::{best_matching_unit, quantization_error, weights_matrix};
use crate::error::Result;
use crate::metrics::ErrorLog;
use crate::node::Node;

/// A trained map: the final nodes and the error history of the run that produced them.
#[derive(Debug, Clone)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
pub struct SomModel<F, D>
where
    F: Float,
    D: Distance<F>,
{
    /// The learned prototypes.
    pub nodes: Vec<Node<F>>,
    pub error_log: ErrorLog<F>,
    distance: D,
}

impl<F, D> SomModel<F, D>
where
    F: Float,
    D: Distance<F>,
{
    pub fn new(nodes: Vec<Node<F>>, error_log: ErrorLog<F>, distance: D) -> Self {
        Self {
            nodes,
            error_log,
            distance,
        }
    }

    /// Index of the node nearest to `features`.
    pub fn predict(&self, features: ArrayView1<F>) -> Result<usize> {
        best_matching_unit(&self.nodes, features, &self.distance).map(|(i, _)| i)
    }

    /// RMS distance between each row of `data` and its nearest node.
    pub fn quantization_error(&self, data: ArrayView2<F>) -> Result<F> {
        quantization_error(&self.nodes, data, &self.distance)
    }

    /// Node weights, one row per node.
    pub fn weights(&self) -> Array2<F> {
        let dimensions = self.nodes.first().map_or(0, |n| n.dimensions());
        weights_matrix(&self.nodes, dimensions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;
    use somap_helpers::L2Dist;

    fn model() -> SomModel<f64, L2Dist> {
        let nodes = vec![
            Node::from_weights(0, array![0.0, 0.0].view(), 2).unwrap(),
            Node::from_weights(1, array![1.0, 1.0].view(), 2).unwrap(),
        ];
        SomModel::new(nodes, ErrorLog::new(), L2Dist)
    }

    #[test]
    fn test_predict() {
        let m = model();
        assert_eq!(m.predict(array![0.1, 0.2].view()).unwrap(), 0);
        assert_eq!(m.predict(array![0.8, 0.9].view()).unwrap(), 1);
        assert!(m.predict(array![0.8].view()).is_err());
    }

    #[test]
    fn test_quantization_error_and_weights() {
        let m = model();
        let data = array![[0.0, 0.0], [1.0, 1.0]];
        assert_abs_diff_eq!(m.quantization_error(data.view()).unwrap(), 0.0);
        assert_eq!(m.weights(), array![[0.0, 0.0], [1.0, 1.0]]);
    }
}
