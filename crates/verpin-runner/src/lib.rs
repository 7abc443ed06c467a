//! Process-backed test execution.
//!
//! Turns a candidate version mapping into dependency-manager install
//! commands, runs the configured test commands in a working directory, and
//! reports one boolean per test back to the search engine.

pub mod command;
pub mod pip;
