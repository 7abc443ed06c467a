//! The strategy contract and the closed algorithm registry.

use std::fmt;
use std::str::FromStr;

use rand::rngs::StdRng;
use rand::SeedableRng;
use verpin_core::cost::CostFunction;
use verpin_core::dependency::{Dependency, VersionMapping};
use verpin_core::optimizer::{Direction, Optimizer};
use verpin_core::runner::TestRunner;
use verpin_util::errors::VerpinError;

use crate::annealing::SimulatedAnnealing;
use crate::backtrack::Backtrack;
use crate::random::Random;
use crate::space::SearchSpace;
use crate::swarm::{ParticleSwarm, SwarmWeights};

/// The result of a successful search.
#[derive(Debug, Clone, PartialEq)]
pub struct AlgorithmOutput {
    pub cost: f64,
    pub mapping: VersionMapping,
}

impl fmt::Display for AlgorithmOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.cost, self.mapping)
    }
}

/// A search strategy, fully assembled and ready to run.
///
/// `run` executes the whole configured budget synchronously, one test-runner
/// call at a time, and reports the optimizer's final content. An instance is
/// exclusively owned by one in-flight run.
pub trait Algorithm {
    fn run(&mut self) -> Result<AlgorithmOutput, VerpinError>;
}

/// The closed set of available strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlgorithmKind {
    Backtrack,
    Random,
    Annealing,
    Swarm,
}

impl AlgorithmKind {
    pub const ALL: [AlgorithmKind; 4] = [
        AlgorithmKind::Backtrack,
        AlgorithmKind::Random,
        AlgorithmKind::Annealing,
        AlgorithmKind::Swarm,
    ];

    pub fn name(self) -> &'static str {
        match self {
            AlgorithmKind::Backtrack => "backtrack",
            AlgorithmKind::Random => "random",
            AlgorithmKind::Annealing => "annealing",
            AlgorithmKind::Swarm => "swarm",
        }
    }
}

impl fmt::Display for AlgorithmKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AlgorithmKind {
    type Err = VerpinError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AlgorithmKind::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| VerpinError::UnknownAlgorithm {
                name: s.to_string(),
            })
    }
}

/// Strategy configuration.
///
/// `iterations` is the evaluation budget for every strategy; the remaining
/// knobs apply only where noted.
#[derive(Debug, Clone)]
pub struct SolverConfig {
    /// Evaluation budget (complete mappings for backtrack/random, loop
    /// iterations for annealing, full-swarm steps for swarm).
    pub iterations: usize,
    /// Starting mapping, required by annealing and swarm.
    pub inimapping: Option<VersionMapping>,
    /// Annealing restart probability, in `[0, 1]`.
    pub prob_restart: f64,
    /// Swarm size.
    pub particles: usize,
    /// Swarm inertia weight.
    pub w: f64,
    /// Swarm personal-best pull weight.
    pub phi_p: f64,
    /// Swarm global-best pull weight.
    pub phi_g: f64,
    /// RNG seed for the stochastic strategies; entropy when absent.
    pub seed: Option<u64>,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            iterations: 100,
            inimapping: None,
            prob_restart: 0.1,
            particles: 10,
            w: 1.0,
            phi_p: 1.0,
            phi_g: 1.0,
            seed: None,
        }
    }
}

impl SolverConfig {
    fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }

    fn initial_mapping(&self, kind: AlgorithmKind) -> Result<VersionMapping, VerpinError> {
        self.inimapping
            .clone()
            .ok_or_else(|| VerpinError::MissingInitialMapping {
                algorithm: kind.name().to_string(),
            })
    }

    fn validate(&self) -> Result<(), VerpinError> {
        if self.iterations == 0 {
            return Err(VerpinError::Config {
                message: "iterations must be at least 1".to_string(),
            });
        }
        if self.particles == 0 {
            return Err(VerpinError::Config {
                message: "particles must be at least 1".to_string(),
            });
        }
        if !(0.0..=1.0).contains(&self.prob_restart) {
            return Err(VerpinError::Config {
                message: format!("prob_restart must be in [0, 1], got {}", self.prob_restart),
            });
        }
        Ok(())
    }
}

/// Assemble a strategy from the registry.
///
/// Validates the configuration and the search space (a dependency with no
/// admissible versions is rejected here, before any search starts).
pub fn build(
    kind: AlgorithmKind,
    deps: Vec<Dependency>,
    runner: Box<dyn TestRunner>,
    cost: Box<dyn CostFunction>,
    direction: Direction,
    config: SolverConfig,
) -> Result<Box<dyn Algorithm>, VerpinError> {
    config.validate()?;
    let space = SearchSpace::new(deps)?;
    let optimizer = Optimizer::new(direction);

    Ok(match kind {
        AlgorithmKind::Backtrack => Box::new(Backtrack::new(
            space,
            runner,
            cost,
            optimizer,
            config.iterations,
        )),
        AlgorithmKind::Random => Box::new(Random::new(
            space,
            runner,
            cost,
            optimizer,
            config.iterations,
            config.rng(),
        )),
        AlgorithmKind::Annealing => {
            let initial = config.initial_mapping(kind)?;
            Box::new(SimulatedAnnealing::new(
                space,
                runner,
                cost,
                optimizer,
                initial,
                config.iterations,
                config.prob_restart,
                config.rng(),
            ))
        }
        AlgorithmKind::Swarm => {
            let initial = config.initial_mapping(kind)?;
            Box::new(ParticleSwarm::new(
                space,
                runner,
                cost,
                optimizer,
                initial,
                config.iterations,
                config.particles,
                SwarmWeights {
                    inertia: config.w,
                    personal: config.phi_p,
                    social: config.phi_g,
                },
                config.rng(),
            ))
        }
    })
}
