//! Deterministic exhaustive depth-first search.

use tracing::debug;
use verpin_core::cost::CostFunction;
use verpin_core::dependency::VersionMapping;
use verpin_core::optimizer::Optimizer;
use verpin_core::runner::TestRunner;
use verpin_util::errors::VerpinError;

use crate::algorithm::{Algorithm, AlgorithmOutput};
use crate::space::SearchSpace;

/// Assigns dependencies one at a time in the caller-given order, trying each
/// admissible version in sorted order, and evaluates every complete mapping
/// it reaches.
///
/// The iteration budget counts complete mappings evaluated, feasible or not;
/// once exhausted, the whole search aborts, even mid-traversal. Given
/// identical input ordering and the same budget, two runs are bit-identical.
/// With a budget at least the size of the full Cartesian product, every
/// combination is evaluated and the true optimum is found.
pub struct Backtrack {
    space: SearchSpace,
    runner: Box<dyn TestRunner>,
    cost: Box<dyn CostFunction>,
    optimizer: Optimizer,
    iterations: usize,
}

impl Backtrack {
    pub fn new(
        space: SearchSpace,
        runner: Box<dyn TestRunner>,
        cost: Box<dyn CostFunction>,
        optimizer: Optimizer,
        iterations: usize,
    ) -> Self {
        Self {
            space,
            runner,
            cost,
            optimizer,
            iterations,
        }
    }

    /// Returns `false` once the evaluation budget is exhausted, which stops
    /// the traversal at every level above.
    fn descend(
        &mut self,
        depth: usize,
        working: &mut VersionMapping,
        remaining: &mut usize,
    ) -> Result<bool, VerpinError> {
        if depth == self.space.len() {
            if self.runner.feasible(working)? {
                let cost = self.cost.cost(working);
                if self.optimizer.relax(cost, working) {
                    debug!(cost, mapping = %working, "improved");
                }
            }
            *remaining -= 1;
            return Ok(*remaining > 0);
        }

        let name = self.space.deps()[depth].name().to_string();
        for index in 0..self.space.axis_len(depth) {
            working.set(name.clone(), self.space.version(depth, index).clone());
            if !self.descend(depth + 1, working, remaining)? {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

impl Algorithm for Backtrack {
    fn run(&mut self) -> Result<AlgorithmOutput, VerpinError> {
        debug!(budget = self.iterations, "starting backtracking search");
        let mut working = VersionMapping::new();
        let mut remaining = self.iterations;
        if remaining > 0 {
            self.descend(0, &mut working, &mut remaining)?;
        }

        let (cost, mapping) = self.optimizer.optimum()?;
        Ok(AlgorithmOutput {
            cost,
            mapping: mapping.clone(),
        })
    }
}
