use miette::Diagnostic;
use thiserror::Error;

/// Unified error type for all verpin operations.
#[derive(Debug, Error, Diagnostic)]
pub enum VerpinError {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid or malformed testcase/manifest TOML.
    #[error("Config error: {message}")]
    #[diagnostic(help("Check your testcase TOML for syntax or validation errors"))]
    Config { message: String },

    /// A version range was declared with min > max.
    #[error("Invalid version range: {min} > {max}")]
    InvalidRange { min: String, max: String },

    /// A dependency has no version satisfying its specifier, so no
    /// assignment can ever be made.
    #[error("Dependency '{name}' has no admissible versions")]
    #[diagnostic(help("Relax the specifier or extend the known version list"))]
    EmptyAdmissible { name: String },

    /// The selected algorithm needs a starting mapping and none was given.
    #[error("Algorithm '{algorithm}' requires an initial version mapping")]
    MissingInitialMapping { algorithm: String },

    /// Algorithm name not present in the registry.
    #[error("Unknown algorithm '{name}'")]
    #[diagnostic(help("Available algorithms: backtrack, random, annealing, swarm"))]
    UnknownAlgorithm { name: String },

    /// The search exhausted its budget without finding any feasible mapping.
    #[error("No feasible version mapping found")]
    NoSolution,

    /// The test runner hit an unrecoverable environment failure (as opposed
    /// to an ordinary failing test, which marks a mapping infeasible).
    #[error("Test runner failure: {message}")]
    Runner { message: String },

    /// Network request failed.
    #[error("Network error: {message}")]
    Network { message: String },
}

/// Convenience alias for `miette::Result<T>`.
pub type VerpinResult<T> = miette::Result<T>;
