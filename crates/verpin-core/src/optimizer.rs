//! Best-so-far tracking under strict improvement.

use verpin_util::errors::VerpinError;

use crate::dependency::VersionMapping;

/// Whether the search maximizes or minimizes the cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Maximize,
    Minimize,
}

impl Direction {
    /// Strict-improvement predicate for this direction.
    pub fn improves(self, candidate: f64, incumbent: f64) -> bool {
        match self {
            Direction::Maximize => candidate > incumbent,
            Direction::Minimize => candidate < incumbent,
        }
    }

    /// Sign that reframes this direction as minimization: `+1` when
    /// minimizing, `-1` when maximizing.
    pub fn sign(self) -> f64 {
        match self {
            Direction::Maximize => -1.0,
            Direction::Minimize => 1.0,
        }
    }
}

/// Holds the best `(cost, mapping)` pair offered so far.
///
/// One type covers both directions; ties keep the earliest offer.
#[derive(Debug, Clone)]
pub struct Optimizer {
    direction: Direction,
    best: Option<(f64, VersionMapping)>,
}

impl Optimizer {
    pub fn new(direction: Direction) -> Self {
        Self {
            direction,
            best: None,
        }
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Offer a candidate pair; it is stored (as a copy) iff strictly better
    /// than the incumbent. Returns whether it was stored.
    pub fn relax(&mut self, cost: f64, mapping: &VersionMapping) -> bool {
        let improved = match self.best {
            None => true,
            Some((incumbent, _)) => self.direction.improves(cost, incumbent),
        };
        if improved {
            self.best = Some((cost, mapping.clone()));
        }
        improved
    }

    /// The stored cost, if any relax has succeeded yet.
    pub fn best_cost(&self) -> Option<f64> {
        self.best.as_ref().map(|(cost, _)| *cost)
    }

    /// The best pair seen so far.
    ///
    /// Asking before any successful relax is the distinct no-solution
    /// condition, not a generic failure.
    pub fn optimum(&self) -> Result<(f64, &VersionMapping), VerpinError> {
        match &self.best {
            Some((cost, mapping)) => Ok((*cost, mapping)),
            None => Err(VerpinError::NoSolution),
        }
    }
}
