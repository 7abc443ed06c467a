//! The feasibility-oracle contract and the in-memory virtual-test oracle.

use std::collections::BTreeMap;

use verpin_util::errors::VerpinError;

use crate::dependency::VersionMapping;
use crate::version::VersionRange;

/// External judge of a candidate mapping.
///
/// `run_all` returns one boolean per configured test, in the same length and
/// order on every call; overall feasibility is the logical AND of all
/// entries. An `Err` is reserved for unrecoverable environment failures and
/// must be propagated by the search, never treated as "infeasible".
///
/// Implementations may be a pure in-memory check or may drive arbitrarily
/// slow out-of-process work; callers must not cache results and must
/// tolerate repeated evaluation of identical mappings.
pub trait TestRunner {
    fn run_all(&mut self, mapping: &VersionMapping) -> Result<Vec<bool>, VerpinError>;

    fn feasible(&mut self, mapping: &VersionMapping) -> Result<bool, VerpinError> {
        Ok(self.run_all(mapping)?.iter().all(|&passed| passed))
    }
}

/// A conjunction of per-dependency range checks, keyed by dependency name.
pub type Clause = BTreeMap<String, VersionRange>;

/// An in-memory test: a disjunction of clauses.
///
/// A clause is satisfied when every dependency it mentions is mapped within
/// its range (a dependency the clause does not mention is vacuously
/// satisfied); the test passes when any clause is satisfied.
#[derive(Debug, Clone)]
pub struct VirtualTest {
    true_when: Vec<Clause>,
}

impl VirtualTest {
    pub fn new(true_when: Vec<Clause>) -> Self {
        Self { true_when }
    }

    pub fn passes(&self, mapping: &VersionMapping) -> bool {
        self.true_when.iter().any(|clause| {
            clause.iter().all(|(name, range)| {
                mapping
                    .get(name)
                    .is_some_and(|version| range.contains(version))
            })
        })
    }
}

/// Runs a fixed list of virtual tests in order.
#[derive(Debug, Clone)]
pub struct LinearRunner {
    tests: Vec<VirtualTest>,
}

impl LinearRunner {
    pub fn new(tests: Vec<VirtualTest>) -> Self {
        Self { tests }
    }
}

impl TestRunner for LinearRunner {
    fn run_all(&mut self, mapping: &VersionMapping) -> Result<Vec<bool>, VerpinError> {
        Ok(self.tests.iter().map(|test| test.passes(mapping)).collect())
    }
}
