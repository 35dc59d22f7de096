use somap_helpers::Float;

#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

use crate::error::{Result, SomError};

/// Quantization error recorded at the end of one iteration.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
pub struct ErrorEntry<F: Float> {
    pub iteration: usize,
    pub error: F,
}

/// Append-only history of quantization errors, one entry per iteration.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
pub struct ErrorLog<F: Float> {
    entries: Vec<ErrorEntry<F>>,
}

impl<F: Float> Default for ErrorLog<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: Float> ErrorLog<F> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    /// Appends an entry. Iteration numbers must be strictly increasing.
    pub fn record(&mut self, iteration: usize, error: F) -> Result<()> {
        if let Some(last) = self.entries.last() {
            if iteration <= last.iteration {
                return Err(SomError::UnorderedIteration {
                    iteration,
                    previous: last.iteration,
                });
            }
        }
        self.entries.push(ErrorEntry { iteration, error });
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[ErrorEntry<F>] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &ErrorEntry<F>> {
        self.entries.iter()
    }

    pub fn last(&self) -> Option<&ErrorEntry<F>> {
        self.entries.last()
    }

    /// Entry with the lowest error; the earliest one wins ties.
    pub fn best(&self) -> Option<&ErrorEntry<F>> {
        self.entries
            .iter()
            .fold(None, |best: Option<&ErrorEntry<F>>, e| match best {
                Some(b) if b.error <= e.error => Some(b),
                _ => Some(e),
            })
    }

    /// Iterations and errors as two parallel vectors, ready for plotting.
    pub fn series(&self) -> (Vec<usize>, Vec<F>) {
        self.entries.iter().map(|e| (e.iteration, e.error)).unzip()
    }
}
