//! Simulated annealing over ordinal version indices.

use rand::rngs::StdRng;
use rand::Rng;
use tracing::debug;
use verpin_core::cost::CostFunction;
use verpin_core::dependency::VersionMapping;
use verpin_core::optimizer::{Direction, Optimizer};
use verpin_core::runner::TestRunner;
use verpin_util::errors::VerpinError;

use crate::algorithm::{Algorithm, AlgorithmOutput};
use crate::space::SearchSpace;

/// Metropolis-style local search from a caller-supplied starting mapping.
///
/// Costs are sign-adjusted by δ (+1 when minimizing, −1 when maximizing), so
/// the acceptance rule always reads as minimization; the final stored cost
/// is multiplied back by δ before being reported. A neighbor is one ±1
/// ordinal step on a single dependency; when no step is possible, or with
/// probability `prob_restart`, the current state is re-randomized wholesale
/// instead.
pub struct SimulatedAnnealing {
    space: SearchSpace,
    runner: Box<dyn TestRunner>,
    cost: Box<dyn CostFunction>,
    optimizer: Optimizer,
    initial: VersionMapping,
    iterations: usize,
    prob_restart: f64,
    rng: StdRng,
}

impl SimulatedAnnealing {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        space: SearchSpace,
        runner: Box<dyn TestRunner>,
        cost: Box<dyn CostFunction>,
        optimizer: Optimizer,
        initial: VersionMapping,
        iterations: usize,
        prob_restart: f64,
        rng: StdRng,
    ) -> Self {
        Self {
            space,
            runner,
            cost,
            optimizer,
            initial,
            iterations,
            prob_restart,
            rng,
        }
    }

    /// All in-bounds `(axis, ±1)` moves from `state`.
    fn moves(&self, state: &[usize]) -> Vec<(usize, isize)> {
        let mut moves = Vec::new();
        for (axis, &index) in state.iter().enumerate() {
            if index + 1 < self.space.axis_len(axis) {
                moves.push((axis, 1));
            }
            if index >= 1 {
                moves.push((axis, -1));
            }
        }
        moves
    }
}

impl Algorithm for SimulatedAnnealing {
    fn run(&mut self) -> Result<AlgorithmOutput, VerpinError> {
        let delta = self.optimizer.direction().sign();
        // Adjusted costs are tracked as a minimization problem throughout;
        // the caller's optimizer receives the de-adjusted result at the end.
        let mut tracker = Optimizer::new(Direction::Minimize);

        let mut state = self.space.ordinals_of(&self.initial)?;
        let mut current = delta * self.cost.cost(&self.initial);
        if self.runner.feasible(&self.initial)? {
            tracker.relax(current, &self.initial);
        }

        let total = self.iterations;
        debug!(iterations = total, "starting simulated annealing");
        for x in 0..total {
            let temperature = 2.0 - (x as f64 + 1.0) / total as f64;

            let moves = self.moves(&state);
            if moves.is_empty() || self.rng.gen_bool(self.prob_restart) {
                state = self.space.random_indices(&mut self.rng);
                current = delta * self.cost.cost(&self.space.mapping_at(&state));
                debug!(iteration = x, "restarted from a re-randomized state");
                continue;
            }

            let (axis, step) = moves[self.rng.gen_range(0..moves.len())];
            let mut neighbor = state.clone();
            neighbor[axis] = (neighbor[axis] as isize + step) as usize;

            let mapping = self.space.mapping_at(&neighbor);
            if !self.runner.feasible(&mapping)? {
                continue;
            }

            let candidate = delta * self.cost.cost(&mapping);
            tracker.relax(candidate, &mapping);

            let accept = if candidate < current {
                true
            } else {
                self.rng.gen_bool((-(candidate - current) / temperature).exp())
            };
            if accept {
                state = neighbor;
                current = candidate;
            }
        }

        let (adjusted, mapping) = tracker.optimum()?;
        let mapping = mapping.clone();
        self.optimizer.relax(delta * adjusted, &mapping);

        let (cost, best) = self.optimizer.optimum()?;
        Ok(AlgorithmOutput {
            cost,
            mapping: best.clone(),
        })
    }
}
