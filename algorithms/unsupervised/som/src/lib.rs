//! Self-organizing map training.
//!
//! A map is a flat collection of prototype nodes. Each iteration presents one random
//! sample, moves the winning node and its neighbors toward it, optionally respawns
//! nodes that stopped winning, and records the quantization error over the dataset.
//!
//! ```
//! use ndarray::array;
//! use som::{fit, SomConfig};
//! use somap_helpers::L2Dist;
//!
//! let data = array![[0.0, 0.1], [0.1, 0.0], [0.9, 1.0], [1.0, 0.9]];
//! let config = SomConfig::new(4, 0.5, 100).with_random_seed(7);
//! let model = fit(data.view(), config, L2Dist).unwrap();
//! assert_eq!(model.error_log.len(), 100);
//! ```

use ndarray::ArrayView2;
use rand::Rng;
use somap_helpers::{Distance, Float};

mod config;
mod engine;
mod error;
mod metrics;
mod model;
mod neighborhood;
mod node;
mod schedule;

pub use config::SomConfig;
pub use engine::{IterationReport, Som, TrainingPhase};
pub use error::{Result, SomError};
pub use metrics::{ErrorEntry, ErrorLog};
pub use model::SomModel;
pub use neighborhood::Neighborhood;
pub use node::Node;
pub use schedule::Schedule;

/// Trains a map on `data` and returns the final model.
///
/// The generator is seeded from `config.random_seed`, or randomly if unset.
pub fn fit<F, D>(data: ArrayView2<F>, config: SomConfig<F>, distance: D) -> Result<SomModel<F, D>>
where
    F: Float,
    D: Distance<F>,
{
    let mut som = Som::new(data, config, distance)?;
    som.run()?;
    Ok(som.into_model())
}

/// Trains a map on `data` drawing all randomness from `rng`.
pub fn fit_with_rng<F, D, R>(
    data: ArrayView2<F>,
    config: SomConfig<F>,
    distance: D,
    rng: R,
) -> Result<SomModel<F, D>>
where
    F: Float,
    D: Distance<F>,
    R: Rng,
{
    let mut som = Som::with_rng(data, config, distance, rng)?;
    som.run()?;
    Ok(som.into_model())
}
