//! Particle-swarm optimization over a continuous ordinal relaxation.
//!
//! Each dependency's admissible list defines an axis `[0, count − 1]`; a
//! particle is a real vector with one coordinate per axis, decoded to a
//! mapping by rounding each coordinate to the nearest ordinal.

use rand::rngs::StdRng;
use rand::Rng;
use tracing::debug;
use verpin_core::cost::CostFunction;
use verpin_core::dependency::VersionMapping;
use verpin_core::optimizer::Optimizer;
use verpin_core::runner::TestRunner;
use verpin_util::errors::VerpinError;

use crate::algorithm::{Algorithm, AlgorithmOutput};
use crate::space::SearchSpace;

/// Slack below an axis' lower bound before a coordinate is redrawn.
const LOWER_TOLERANCE: f64 = 0.5;
/// Slack above an axis' upper bound; narrower than the lower slack.
const UPPER_TOLERANCE: f64 = 0.4;

/// Velocity and pull weights.
#[derive(Debug, Clone, Copy)]
pub struct SwarmWeights {
    /// Velocity inertia (`w`).
    pub inertia: f64,
    /// Personal-best pull (`phi_p`).
    pub personal: f64,
    /// Global-best pull (`phi_g`).
    pub social: f64,
}

struct Particle {
    position: Vec<f64>,
    velocity: Vec<f64>,
    /// Personal best-so-far, same tracker type as the shared global one.
    best: Optimizer,
    best_coords: Option<Vec<f64>>,
}

/// Swarm search from a caller-supplied starting mapping.
///
/// Particle 0 starts at the exact ordinal positions of the starting mapping;
/// the rest are drawn uniformly per axis. Runs for a fixed number of
/// full-swarm steps; the result is the shared global optimizer's best pair.
pub struct ParticleSwarm {
    space: SearchSpace,
    runner: Box<dyn TestRunner>,
    cost: Box<dyn CostFunction>,
    optimizer: Optimizer,
    initial: VersionMapping,
    iterations: usize,
    particles: usize,
    weights: SwarmWeights,
    rng: StdRng,
}

impl ParticleSwarm {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        space: SearchSpace,
        runner: Box<dyn TestRunner>,
        cost: Box<dyn CostFunction>,
        optimizer: Optimizer,
        initial: VersionMapping,
        iterations: usize,
        particles: usize,
        weights: SwarmWeights,
        rng: StdRng,
    ) -> Self {
        Self {
            space,
            runner,
            cost,
            optimizer,
            initial,
            iterations,
            particles,
            weights,
            rng,
        }
    }
}

/// Round each coordinate to its nearest ordinal, clamped into the axis.
fn decode(position: &[f64], upper: &[f64]) -> Vec<usize> {
    position
        .iter()
        .zip(upper)
        .map(|(&coord, &up)| {
            debug_assert!(
                coord >= -LOWER_TOLERANCE && coord <= up + UPPER_TOLERANCE,
                "coordinate {coord} escaped its axis [0, {up}]"
            );
            coord.round().clamp(0.0, up) as usize
        })
        .collect()
}

fn ordinals_to_coords(indices: &[usize]) -> Vec<f64> {
    indices.iter().map(|&index| index as f64).collect()
}

impl Algorithm for ParticleSwarm {
    fn run(&mut self) -> Result<AlgorithmOutput, VerpinError> {
        let axes = self.space.len();
        let upper: Vec<f64> = (0..axes)
            .map(|axis| (self.space.axis_len(axis) - 1) as f64)
            .collect();
        let direction = self.optimizer.direction();

        let mut swarm = Vec::with_capacity(self.particles);
        for index in 0..self.particles {
            let position = if index == 0 {
                ordinals_to_coords(&self.space.ordinals_of(&self.initial)?)
            } else {
                upper
                    .iter()
                    .map(|&up| self.rng.gen_range(0.0..=up))
                    .collect()
            };
            let velocity = upper
                .iter()
                .map(|&up| self.rng.gen_range(-up..=up))
                .collect();
            swarm.push(Particle {
                position,
                velocity,
                best: Optimizer::new(direction),
                best_coords: None,
            });
        }

        let mut global_coords: Option<Vec<f64>> = None;
        debug!(
            steps = self.iterations,
            particles = self.particles,
            "starting particle swarm"
        );

        for _ in 0..self.iterations {
            for particle in &mut swarm {
                for axis in 0..axes {
                    let r_p: f64 = self.rng.gen();
                    let r_g: f64 = self.rng.gen();
                    // Until a best exists on an axis, the pull is a fresh
                    // uniform draw, which keeps exploration alive before any
                    // feasible point is known.
                    let pull_personal = match &particle.best_coords {
                        Some(best) => best[axis] - particle.position[axis],
                        None => self.rng.gen_range(0.0..=upper[axis]),
                    };
                    let pull_global = match &global_coords {
                        Some(best) => best[axis] - particle.position[axis],
                        None => self.rng.gen_range(0.0..=upper[axis]),
                    };

                    particle.velocity[axis] = self.weights.inertia * particle.velocity[axis]
                        + self.weights.personal * r_p * pull_personal
                        + self.weights.social * r_g * pull_global;
                    particle.position[axis] += particle.velocity[axis];

                    // An escaped coordinate is redrawn inside the axis
                    // rather than clamped to its edge.
                    if particle.position[axis] < -LOWER_TOLERANCE
                        || particle.position[axis] > upper[axis] + UPPER_TOLERANCE
                    {
                        particle.position[axis] = self.rng.gen_range(0.0..=upper[axis]);
                    }
                }

                let indices = decode(&particle.position, &upper);
                let mapping = self.space.mapping_at(&indices);
                if self.runner.feasible(&mapping)? {
                    let cost = self.cost.cost(&mapping);
                    if particle.best.relax(cost, &mapping) {
                        particle.best_coords = Some(ordinals_to_coords(&indices));
                    }
                    if self.optimizer.relax(cost, &mapping) {
                        debug!(cost, mapping = %mapping, "improved");
                        global_coords = Some(ordinals_to_coords(&indices));
                    }
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
