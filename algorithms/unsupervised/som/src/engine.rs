use log::{debug, info, trace};
use ndarray::{Array2, ArrayView1, ArrayView2};
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;
use somap_helpers::{draw_sample, Distance, Float};

use crate::config::SomConfig;
use crate::error::{Result, SomError};
use crate::metrics::ErrorLog;
use crate::model::SomModel;
use crate::neighborhood::Neighborhood;
use crate::node::Node;
use crate::schedule::Schedule;

/// Where a training run currently stands.
///
/// `Initializing` and `DeadNeuronCheck` only last for the duration of a call; from
/// the outside an engine is seen `Iterating`, `Finalizing` (budget spent, not yet
/// closed) or `Done`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrainingPhase {
    Initializing,
    Iterating,
    DeadNeuronCheck,
    Finalizing,
    Done,
}

/// What happened during one iteration, for a renderer or progress reporter.
#[derive(Debug, Clone, PartialEq)]
pub struct IterationReport<F: Float> {
    pub iteration: usize,
    /// Index of the winning node in the collection after any retirement.
    pub winner: usize,
    pub winner_id: usize,
    pub radius: F,
    pub learning_rate: F,
    pub quantization_error: F,
    /// Nodes retired and respawned during this iteration.
    pub retired: usize,
    /// True when this frame should be drawn (every `frame_skip`-th and the last iteration).
    pub render: bool,
    pub show_neighborhood: bool,
}

/// Self-organizing map training engine.
///
/// Owns the node collection, its winner flags and all training state. The dataset
/// is borrowed read-only; every sample must have the same number of features.
///
/// # Type Parameters
///
/// * `F`: The float type for features and weights (`f32` or `f64`).
/// * `D`: The distance metric. `L2Dist` gives the usual Euclidean SOM.
/// * `R`: The random generator used for sampling, initialization and respawning.
#[derive(Debug, Clone)]
pub struct Som<'a, F, D, R = Xoshiro256PlusPlus>
where
    F: Float,
    D: Distance<F>,
    R: Rng,
{
    data: ArrayView2<'a, F>,
    config: SomConfig<F>,
    distance: D,
    rng: R,
    schedule: Schedule<F>,
    dead_neuron_interval: Option<usize>,
    nodes: Vec<Node<F>>,
    winner_flags: Vec<bool>,
    next_id: usize,
    iteration: usize,
    learning_rate: F,
    radius: F,
    error_log: ErrorLog<F>,
    phase: TrainingPhase,
}

impl<'a, F, D> Som<'a, F, D, Xoshiro256PlusPlus>
where
    F: Float,
    D: Distance<F>,
{
    /// Creates an engine seeded from `config.random_seed`, or from a random seed if unset.
    pub fn new(data: ArrayView2<'a, F>, config: SomConfig<F>, distance: D) -> Result<Self> {
        let seed = config.random_seed.unwrap_or_else(rand::random::<u64>);
        Self::with_rng(data, config, distance, Xoshiro256PlusPlus::seed_from_u64(seed))
    }
}

impl<'a, F, D, R> Som<'a, F, D, R>
where
    F: Float,
    D: Distance<F>,
    R: Rng,
{
    /// Creates an engine drawing all randomness from `rng`.
    ///
    /// # Errors
    ///
    /// Returns `SomError::Configuration` for out-of-range parameters or a dataset
    /// without feature columns, and `SomError::EmptyDataSet` if `data` has no rows.
    pub fn with_rng(data: ArrayView2<'a, F>, config: SomConfig<F>, distance: D, mut rng: R) -> Result<Self> {
        config.validate()?;
        if data.nrows() == 0 {
            return Err(SomError::EmptyDataSet);
        }
        let dimensions = data.ncols();
        if dimensions == 0 {
            return Err(SomError::Configuration(
                "dataset has no feature columns".into(),
            ));
        }

        let schedule = Schedule::new(config.learning_rate, config.initial_neighborhood, config.iterations)?;
        let nodes = (0..config.neuron_count)
            .map(|id| Node::random(id, dimensions, &mut rng))
            .collect::<Result<Vec<_>>>()?;

        info!(
            "SOM initialized: {} nodes, {} features, {} samples, {} iterations",
            nodes.len(),
            dimensions,
            data.nrows(),
            config.iterations
        );

        let mut som = Self {
            data,
            dead_neuron_interval: config.dead_neuron_interval(),
            winner_flags: vec![false; nodes.len()],
            next_id: nodes.len(),
            nodes,
            iteration: 1,
            learning_rate: config.learning_rate,
            radius: schedule.radius(1),
            error_log: ErrorLog::with_capacity(config.iterations),
            phase: TrainingPhase::Initializing,
            schedule,
            config,
            distance,
            rng,
        };
        som.phase = TrainingPhase::Iterating;
        Ok(som)
    }

    /// Runs one iteration.
    ///
    /// Returns `None` once the iteration budget is spent; the engine is then `Done`.
    pub fn step(&mut self) -> Result<Option<IterationReport<F>>> {
        let total = self.schedule.iterations();
        if self.iteration > total {
            if self.phase != TrainingPhase::Done {
                info!(
                    "SOM training finished after {} iterations, final error {:?}",
                    total,
                    self.error_log.last().map(|e| e.error)
                );
            }
            self.phase = TrainingPhase::Done;
            return Ok(None);
        }
        let iteration = self.iteration;

        // a. Draw a sample and find its Best Matching Unit
        let (_, sample) = draw_sample(self.data, &mut self.rng).ok_or(SomError::EmptyDataSet)?;
        self.radius = self.schedule.radius(iteration);
        let (mut winner, _) = self.best_matching_unit(sample)?;
        self.winner_flags[winner] = true;
        let winner_id = self.nodes[winner].id();

        // b. Retire nodes that did not win during the last window
        let mut retired = 0;
        if let Some(interval) = self.dead_neuron_interval {
            if iteration % interval == 0 {
                // Survivors keep their order, so the winner moves down by the number
                // of retired nodes in front of it.
                winner = self.winner_flags[..winner].iter().filter(|&&won| won).count();
                retired = self.replace_dead_neurons()?;
            }
        }

        // c. Pull every node inside the neighborhood toward the sample
        let neighborhood = Neighborhood::from_radius(self.radius);
        let learning_rate = self.schedule.learning_rate(iteration);
        // Distances are taken to the winner as it stands, so nodes after it in the
        // collection see it already moved toward the sample.
        for i in 0..self.nodes.len() {
            let d = self.nodes[i].distance(self.nodes[winner].weights(), &self.distance)?;
            if let Some(influence) = neighborhood.influence(d) {
                self.nodes[i].adjust_weight(sample, learning_rate, influence)?;
            }
        }
        self.learning_rate = learning_rate;

        // d. Track the fit over the whole dataset
        let quantization_error = self.quantization_error()?;
        self.error_log.record(iteration, quantization_error)?;
        debug!(
            "iteration {}: radius = {:?}, learning_rate = {:?}, error = {:?}",
            iteration, self.radius, learning_rate, quantization_error
        );

        self.iteration += 1;
        self.phase = if self.iteration > total {
            TrainingPhase::Finalizing
        } else {
            TrainingPhase::Iterating
        };

        Ok(Some(IterationReport {
            iteration,
            winner,
            winner_id,
            radius: self.radius,
            learning_rate,
            quantization_error,
            retired,
            render: iteration % self.config.frame_skip == 0 || iteration == total,
            show_neighborhood: self.config.display_neighborhood,
        }))
    }

    /// Steps until the iteration budget is spent and returns the full error log.
    pub fn run(&mut self) -> Result<&ErrorLog<F>> {
        while self.step()?.is_some() {}
        Ok(&self.error_log)
    }

    /// Finds the node nearest to `sample`. Ties go to the earliest node.
    ///
    /// Returns the node's index and its distance to `sample`.
    pub fn best_matching_unit(&self, sample: ArrayView1<F>) -> Result<(usize, F)> {
        best_matching_unit(&self.nodes, sample, &self.distance)
    }

    /// Root mean square of each sample's distance to its Best Matching Unit.
    pub fn quantization_error(&self) -> Result<F> {
        quantization_error(&self.nodes, self.data, &self.distance)
    }

    /// Replaces every node whose winner flag is unset with a copy of a random sample.
    ///
    /// The new collection is built aside and swapped in, survivors first in their
    /// original order, then the respawned nodes. All flags are cleared afterwards.
    fn replace_dead_neurons(&mut self) -> Result<usize> {
        self.phase = TrainingPhase::DeadNeuronCheck;
        let dimensions = self.dimensions();
        let dead = self.winner_flags.iter().filter(|&&won| !won).count();

        let mut respawned = Vec::with_capacity(dead);
        for _ in 0..dead {
            let (_, sample) = draw_sample(self.data, &mut self.rng).ok_or(SomError::EmptyDataSet)?;
            respawned.push(Node::from_weights(self.next_id, sample, dimensions)?);
            self.next_id += 1;
        }

        let old = std::mem::take(&mut self.nodes);
        let mut nodes = Vec::with_capacity(old.len());
        for (node, &won) in old.into_iter().zip(&self.winner_flags) {
            if won {
                nodes.push(node);
            } else {
                trace!("retiring dead node {}", node.id());
            }
        }
        nodes.extend(respawned);
        self.nodes = nodes;
        self.winner_flags.iter_mut().for_each(|won| *won = false);

        debug!(
            "dead neuron check at iteration {}: {} of {} nodes respawned",
            self.iteration,
            dead,
            self.nodes.len()
        );
        self.phase = TrainingPhase::Iterating;
        Ok(dead)
    }

    pub fn phase(&self) -> TrainingPhase {
        self.phase
    }

    pub fn is_done(&self) -> bool {
        self.phase == TrainingPhase::Done
    }

    /// The next iteration to run (1-based).
    pub fn iteration(&self) -> usize {
        self.iteration
    }

    pub fn radius(&self) -> F {
        self.radius
    }

    pub fn learning_rate(&self) -> F {
        self.learning_rate
    }

    pub fn nodes(&self) -> &[Node<F>] {
        &self.nodes
    }

    /// Current node weights, one row per node.
    pub fn weights(&self) -> Array2<F> {
        weights_matrix(&self.nodes, self.dimensions())
    }

    pub fn winner_flags(&self) -> &[bool] {
        &self.winner_flags
    }

    pub fn error_log(&self) -> &ErrorLog<F> {
        &self.error_log
    }

    pub fn dimensions(&self) -> usize {
        self.data.ncols()
    }

    pub fn config(&self) -> &SomConfig<F> {
        &self.config
    }

    pub fn schedule(&self) -> &Schedule<F> {
        &self.schedule
    }

    /// Consumes the engine, keeping the final nodes, the error log and the metric.
    pub fn into_model(self) -> SomModel<F, D> {
        SomModel::new(self.nodes, self.error_log, self.distance)
    }
}

/// Searches on the reduced distance and converts only the winning value.
pub(crate) fn best_matching_unit<F, D>(nodes: &[Node<F>], sample: ArrayView1<F>, distance: &D) -> Result<(usize, F)>
where
    F: Float,
    D: Distance<F>,
{
    let mut best = None;
    for (i, node) in nodes.iter().enumerate() {
        let rdist = node.rdistance(sample, distance)?;
        if rdist.is_nan() {
            return Err(SomError::InvalidDistance);
        }
        match best {
            Some((_, best_rdist)) if rdist >= best_rdist => {}
            _ => best = Some((i, rdist)),
        }
    }
    best.map(|(i, rdist)| (i, distance.rdist_to_dist(rdist)))
        .ok_or_else(|| SomError::Configuration("map has no nodes".into()))
}

pub(crate) fn quantization_error<F, D>(nodes: &[Node<F>], data: ArrayView2<F>, distance: &D) -> Result<F>
where
    F: Float,
    D: Distance<F>,
{
    if data.nrows() == 0 {
        return Err(SomError::EmptyDataSet);
    }
    let mut sum = F::zero();
    for sample in data.rows() {
        let (_, d) = best_matching_unit(nodes, sample, distance)?;
        sum += d * d;
    }
    Ok((sum / F::from_count(data.nrows())).sqrt())
}

pub(crate) fn weights_matrix<F: Float>(nodes: &[Node<F>], dimensions: usize) -> Array2<F> {
    Array2::from_shape_fn((nodes.len(), dimensions), |(i, j)| nodes[i].weights()[j])
}
