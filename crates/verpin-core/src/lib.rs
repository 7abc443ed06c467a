//! Core data types for verpin: the version model, dependencies, version
//! mappings, cost functions, the best-so-far optimizer, the test-runner
//! contract with its in-memory virtual-test oracle, and testcase parsing.

pub mod cost;
pub mod dependency;
pub mod optimizer;
pub mod runner;
pub mod testcase;
pub mod version;
