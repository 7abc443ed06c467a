//! Memoryless uniform random sampling.

use rand::rngs::StdRng;
use tracing::debug;
use verpin_core::cost::CostFunction;
use verpin_core::optimizer::Optimizer;
use verpin_core::runner::TestRunner;
use verpin_util::errors::VerpinError;

use crate::algorithm::{Algorithm, AlgorithmOutput};
use crate::space::SearchSpace;

/// Draws a fixed number of independent complete mappings, one uniform draw
/// per dependency, with no memory of past draws (repeats are possible).
///
/// The random source is caller-controlled, so runs are reproducible under a
/// given seed.
pub struct Random {
    space: SearchSpace,
    runner: Box<dyn TestRunner>,
    cost: Box<dyn CostFunction>,
    optimizer: Optimizer,
    iterations: usize,
    rng: StdRng,
}

impl Random {
    pub fn new(
        space: SearchSpace,
        runner: Box<dyn TestRunner>,
        cost: Box<dyn CostFunction>,
        optimizer: Optimizer,
        iterations: usize,
        rng: StdRng,
    ) -> Self {
        Self {
            space,
            runner,
            cost,
            optimizer,
            iterations,
            rng,
        }
    }
}

impl Algorithm for Random {
    fn run(&mut self) -> Result<AlgorithmOutput, VerpinError> {
        debug!(iterations = self.iterations, "starting random sampling");
        for _ in 0..self.iterations {
            let indices = self.space.random_indices(&mut self.rng);
            let mapping = self.space.mapping_at(&indices);
            if self.runner.feasible(&mapping)? {
                let cost = self.cost.cost(&mapping);
                if self.optimizer.relax(cost, &mapping) {
                    debug!(cost, mapping = %mapping, "improved");
                }
            }
        }

        let (cost, mapping) = self.optimizer.optimum()?;
        Ok(AlgorithmOutput {
            cost,
            mapping: mapping.clone(),
        })
    }
}
