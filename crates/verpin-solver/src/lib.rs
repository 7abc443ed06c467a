//! Version-selection search engine.
//!
//! Four strategies — exhaustive backtracking, random sampling, simulated
//! annealing, and particle-swarm optimization — search the discrete space of
//! admissible versions, one axis per dependency. All of them share one
//! contract: propose complete mappings, ask the test runner for feasibility,
//! and relax feasible candidates into a strict-improvement optimizer.

pub mod algorithm;
pub mod annealing;
pub mod backtrack;
pub mod random;
pub mod space;
pub mod swarm;
