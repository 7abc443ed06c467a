//! CLI argument definitions for verpin.
//!
//! Uses `clap` derive macros to define the full command surface. Each
//! command corresponds to a handler in the [`super::commands`] module.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use verpin_solver::algorithm::AlgorithmKind;

#[derive(Parser, Debug)]
#[command(
    name = "verpin",
    version,
    about = "Search for a dependency version combination that passes your tests",
    long_about = "verpin searches the space of admissible dependency versions for a \
                  combination that satisfies a set of compatibility tests while \
                  optimizing an aggregate cost over the chosen versions."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Solve a TOML testcase against its virtual tests
    Virtual {
        /// Path to the testcase file
        testcase: PathBuf,

        #[command(flatten)]
        search: SearchArgs,
    },

    /// Solve a real project by installing candidates and running its tests
    Project {
        /// Path to the project directory (must contain verpin.toml)
        path: PathBuf,

        /// Test command to run per candidate; repeatable, defaults to `pytest`
        #[arg(long = "test-cmd")]
        test_cmds: Vec<String>,

        /// Extras to install with pip (comma-separated)
        #[arg(long)]
        extras: Option<String>,

        /// Refresh known versions from the registry before searching
        #[arg(long)]
        refresh_versions: bool,

        /// Drop versions that fail a trial install (binary search per dependency)
        #[arg(long)]
        prune: bool,

        /// Skip the up-front check with the initial versions
        #[arg(long)]
        bypass_initial: bool,

        /// Interpreter version keying the registry cache
        #[arg(long, default_value = "3.9.7")]
        pyver: String,

        /// Minimum release year admitted from the registry
        #[arg(long, default_value_t = verpin_registry::fetch::DEFAULT_MIN_YEAR)]
        min_year: i32,

        #[command(flatten)]
        search: SearchArgs,
    },

    /// Refresh the on-disk registry version cache
    UpdateVersions {
        /// Dependencies to refresh; defaults to everything already cached
        deps: Vec<String>,

        /// Interpreter version keying the registry cache
        #[arg(long, default_value = "3.9.7")]
        pyver: String,

        /// Minimum release year admitted from the registry
        #[arg(long, default_value_t = verpin_registry::fetch::DEFAULT_MIN_YEAR)]
        min_year: i32,
    },
}

/// Strategy selection and tuning, shared by the solving commands.
#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Algorithm to use: backtrack, random, annealing, swarm
    #[arg(long, default_value = "backtrack")]
    pub algorithm: AlgorithmKind,

    /// Iteration budget for the selected algorithm
    #[arg(long, default_value_t = 100)]
    pub iterations: usize,

    /// Optimize for the lowest cost instead of the highest
    #[arg(long)]
    pub minimize: bool,

    /// RNG seed for the stochastic algorithms
    #[arg(long)]
    pub seed: Option<u64>,

    /// Annealing restart probability
    #[arg(long, default_value_t = 0.1)]
    pub prob_restart: f64,

    /// Swarm size
    #[arg(long, default_value_t = 10)]
    pub particles: usize,

    /// Swarm inertia weight (w)
    #[arg(long, default_value_t = 1.0)]
    pub inertia: f64,

    /// Swarm personal-best pull weight
    #[arg(long, default_value_t = 1.0)]
    pub phi_p: f64,

    /// Swarm global-best pull weight
    #[arg(long, default_value_t = 1.0)]
    pub phi_g: f64,
}

pub fn parse() -> Cli {
    Cli::parse()
}
