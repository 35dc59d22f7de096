use somap_helpers::Float;

#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

use crate::error::{Result, SomError};

/// Hyperparameters for a training run.
///
/// Defaults: 25 neurons, learning rate 0.5, 1000 iterations, initial neighborhood 0.5,
/// dead-neuron window of 14% of the run, dead-neuron replacement off.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
pub struct SomConfig<F: Float> {
    /// Number of nodes in the map.
    pub neuron_count: usize,
    /// Initial learning rate (alpha).
    pub learning_rate: F,
    /// Total number of iterations; one random sample is presented per iteration.
    pub iterations: usize,
    /// Initial neighborhood radius, strictly between 0 and 1.
    pub initial_neighborhood: F,
    /// Fraction of `iterations` between two dead-neuron checks.
    pub dead_neuron_percent: F,
    /// Retire and respawn nodes that did not win during a check window.
    pub delete_dead_neurons: bool,
    /// Seed for the default generator. `None` draws a random seed.
    pub random_seed: Option<u64>,
    /// Renderer hint: draw the neighborhood circle around each node.
    pub display_neighborhood: bool,
    /// Renderer hint: only every `frame_skip`-th iteration is flagged for drawing.
    pub frame_skip: usize,
}

impl<F: Float> Default for SomConfig<F> {
    fn default() -> Self {
        Self {
            neuron_count: 25,
            learning_rate: F::lit(0.5),
            iterations: 1000,
            initial_neighborhood: F::lit(0.5),
            dead_neuron_percent: F::lit(0.14),
            delete_dead_neurons: false,
            random_seed: None,
            display_neighborhood: false,
            frame_skip: 1,
        }
    }
}

impl<F: Float> SomConfig<F> {
    pub fn new(neuron_count: usize, learning_rate: F, iterations: usize) -> Self {
        Self {
            neuron_count,
            learning_rate,
            iterations,
            ..Self::default()
        }
    }

    pub fn with_neuron_count(mut self, neuron_count: usize) -> Self {
        self.neuron_count = neuron_count;
        self
    }

    pub fn with_learning_rate(mut self, learning_rate: F) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    pub fn with_initial_neighborhood(mut self, radius: F) -> Self {
        self.initial_neighborhood = radius;
        self
    }

    /// Enables dead-neuron replacement, checking every `percent * iterations` steps.
    pub fn with_dead_neurons(mut self, percent: F) -> Self {
        self.delete_dead_neurons = true;
        self.dead_neuron_percent = percent;
        self
    }

    pub fn with_delete_dead_neurons(mut self, enabled: bool) -> Self {
        self.delete_dead_neurons = enabled;
        self
    }

    pub fn with_random_seed(mut self, seed: u64) -> Self {
        self.random_seed = Some(seed);
        self
    }

    pub fn with_display_neighborhood(mut self, enabled: bool) -> Self {
        self.display_neighborhood = enabled;
        self
    }

    pub fn with_frame_skip(mut self, frame_skip: usize) -> Self {
        self.frame_skip = frame_skip;
        self
    }

    /// Checks every parameter, failing on the first one out of range.
    pub fn validate(&self) -> Result<()> {
        if self.neuron_count == 0 {
            return Err(invalid("neuron_count must be greater than 0"));
        }
        if self.iterations == 0 {
            return Err(invalid("iterations must be greater than 0"));
        }
        if !self.learning_rate.is_finite() || self.learning_rate <= F::zero() {
            return Err(invalid("learning_rate must be a positive finite number"));
        }
        // The radius time constant is iterations / ln(initial_neighborhood).
        if !(self.initial_neighborhood > F::zero() && self.initial_neighborhood < F::one()) {
            return Err(invalid("initial_neighborhood must lie strictly between 0 and 1"));
        }
        if !(self.dead_neuron_percent > F::zero() && self.dead_neuron_percent <= F::one()) {
            return Err(invalid("dead_neuron_percent must lie in (0, 1]"));
        }
        if self.frame_skip == 0 {
            return Err(invalid("frame_skip must be greater than 0"));
        }
        Ok(())
    }

    /// Number of iterations between dead-neuron checks, or `None` when replacement is off.
    ///
    /// Checks fall on the iterations that are whole multiples of
    /// `dead_neuron_percent * iterations`, so a fractional period of 3.5 checks every
    /// 7 iterations. `None` also when no such multiple fits inside the run.
    pub fn dead_neuron_interval(&self) -> Option<usize> {
        if !self.delete_dead_neurons {
            return None;
        }
        let period = self.dead_neuron_percent * F::from_count(self.iterations);
        let tolerance = F::epsilon() * F::lit(64.0);
        (1..=self.iterations).find_map(|n| {
            let span = period * F::from_count(n);
            let whole = span.round();
            let count: usize = whole.as_();
            (whole >= F::one() && (span - whole).abs() <= tolerance * whole).then_some(count)
        })
    }
}

fn invalid(msg: &str) -> SomError {
    SomError::Configuration(msg.to_string())
}
