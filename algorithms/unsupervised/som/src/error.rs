use thiserror::Error;

/// Errors that can occur while building or training a self-organizing map.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SomError {
    /// A construction parameter is out of range.
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    /// The training data has no samples.
    #[error("Training data is empty")]
    EmptyDataSet,

    /// A vector's length disagrees with the map's fixed dimensionality.
    #[error("Dimension mismatch: expected {expected} features, found {found}")]
    DimensionMismatch { expected: usize, found: usize },

    /// The metric returned NaN (likely NaN values in the data).
    #[error("Invalid distance comparison (likely due to NaN values in data)")]
    InvalidDistance,

    /// An error-log entry was recorded out of iteration order.
    #[error("Error log iteration {iteration} does not follow {previous}")]
    UnorderedIteration { iteration: usize, previous: usize },
}

pub type Result<T> = std::result::Result<T, SomError>;
