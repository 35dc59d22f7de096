use somap_helpers::Float;

use crate::error::{Result, SomError};

/// Learning-rate and neighborhood-radius decay over a fixed iteration budget.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Schedule<F: Float> {
    initial_rate: F,
    initial_radius: F,
    iterations: usize,
    time_constant: F,
}

impl<F: Float> Schedule<F> {
    pub fn new(initial_rate: F, initial_radius: F, iterations: usize) -> Result<Self> {
        if iterations == 0 {
            return Err(SomError::Configuration(
                "iterations must be greater than 0".into(),
            ));
        }
        if !(initial_radius > F::zero() && initial_radius < F::one()) {
            return Err(SomError::Configuration(
                "initial_neighborhood must lie strictly between 0 and 1".into(),
            ));
        }
        Ok(Self {
            initial_rate,
            initial_radius,
            iterations,
            time_constant: F::from_count(iterations) / initial_radius.ln(),
        })
    }

    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// `iterations / ln(initial_radius)`; negative for every valid radius.
    pub fn time_constant(&self) -> F {
        self.time_constant
    }

    /// `initial_rate * exp(-iteration / iterations)`.
    pub fn learning_rate(&self, iteration: usize) -> F {
        self.initial_rate * (-(F::from_count(iteration) / F::from_count(self.iterations))).exp()
    }

    /// `initial_radius * exp(iteration / time_constant)`.
    ///
    /// The exponent looks like growth, but `time_constant` is negative, so the radius
    /// shrinks toward zero. The sign is probably a historical slip; training behavior
    /// depends on the decay, so it is kept as is.
    pub fn radius(&self, iteration: usize) -> F {
        self.initial_radius * (F::from_count(iteration) / self.time_constant).exp()
    }
}
