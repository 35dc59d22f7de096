//! Self-organizing map training on in-memory, pre-normalized tables.
//!
//! Re-exports the shared numeric helpers and the `som` training engine.

pub use somap_helpers::{draw_sample, uniform_vector, Distance, Float, L1Dist, L2Dist, LInfDist, LpDist};

pub use som::{
    fit, fit_with_rng, ErrorEntry, ErrorLog, IterationReport, Neighborhood, Node, Schedule, Som,
    SomConfig, SomError, SomModel, TrainingPhase,
};
