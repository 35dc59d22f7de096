use somap_helpers::Float;

/// Gaussian neighborhood around the winning node for one iteration.
///
/// A node takes part in the update when its distance to the winner is below
/// `width = radius²`. Note the comparison is against the squared radius, not the
/// radius itself; convergence speed depends on it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighborhood<F: Float> {
    width: F,
}

impl<F: Float> Neighborhood<F> {
    pub fn from_radius(radius: F) -> Self {
        Self {
            width: radius * radius,
        }
    }

    pub fn width(&self) -> F {
        self.width
    }

    /// Influence on a node at `distance` from the winner, or `None` outside the neighborhood.
    ///
    /// `exp(-distance² / (2 * width))`: 1 at the winner, falling off with distance.
    pub fn influence(&self, distance: F) -> Option<F> {
        if distance < self.width {
            Some((-(distance * distance) / (F::lit(2.0) * self.width)).exp())
        } else {
            None
        }
    }
}
