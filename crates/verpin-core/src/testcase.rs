//! TOML testcase parsing.
//!
//! A testcase declares the dependencies under consideration (known versions,
//! specifier, initial version) and optionally a list of virtual tests:
//!
//! ```toml
//! [dependencies.requests]
//! versions = ["2.25.0", "2.26.0"]
//! specifier = ">=2.25"
//! iniver = "2.25.0"
//!
//! [[tests]]
//! true_when = [{ requests = ["2.26.0", "2.26.0"] }]
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;
use verpin_util::errors::VerpinError;

use crate::dependency::{Dependency, VersionMapping};
use crate::runner::{Clause, VirtualTest};
use crate::version::{Version, VersionRange, VersionSpec};

#[derive(Debug, Deserialize)]
struct TestcaseToml {
    dependencies: BTreeMap<String, DepEntry>,
    #[serde(default)]
    tests: Vec<TestEntry>,
}

#[derive(Debug, Deserialize)]
struct DepEntry {
    versions: Vec<String>,
    #[serde(default)]
    specifier: String,
    iniver: String,
}

#[derive(Debug, Deserialize)]
struct TestEntry {
    true_when: Vec<BTreeMap<String, (String, String)>>,
}

/// A parsed and validated testcase.
///
/// Dependencies are listed in name order, which is also the search order
/// handed to the algorithms.
#[derive(Debug, Clone)]
pub struct Testcase {
    pub dependencies: Vec<Dependency>,
    pub tests: Vec<VirtualTest>,
    pub initial: VersionMapping,
}

impl Testcase {
    pub fn parse(text: &str) -> Result<Self, VerpinError> {
        let raw: TestcaseToml = toml::from_str(text).map_err(|e| VerpinError::Config {
            message: format!("Invalid testcase: {e}"),
        })?;

        let mut dependencies = Vec::new();
        let mut initial = VersionMapping::new();
        for (name, entry) in &raw.dependencies {
            let versions = entry
                .versions
                .iter()
                .map(|s| Version::parse(s))
                .collect::<Result<Vec<_>, _>>()?;
            let spec = VersionSpec::parse(&entry.specifier)?;
            let iniver = Version::parse(&entry.iniver)?;
            if !versions.contains(&iniver) {
                return Err(VerpinError::Config {
                    message: format!(
                        "Initial version {iniver} of '{name}' is not among its known versions"
                    ),
                });
            }
            initial.set(name.clone(), iniver);
            dependencies.push(Dependency::new(name.clone(), versions, spec));
        }

        let mut tests = Vec::new();
        for entry in &raw.tests {
            let mut true_when = Vec::new();
            for raw_clause in &entry.true_when {
                let mut clause = Clause::new();
                for (name, (lo, hi)) in raw_clause {
                    if !raw.dependencies.contains_key(name) {
                        return Err(VerpinError::Config {
                            message: format!("Test clause mentions undeclared dependency '{name}'"),
                        });
                    }
                    let range = VersionRange::new(Version::parse(lo)?, Version::parse(hi)?)?;
                    clause.insert(name.clone(), range);
                }
                true_when.push(clause);
            }
            tests.push(VirtualTest::new(true_when));
        }

        debug!(
            dependencies = dependencies.len(),
            tests = tests.len(),
            "parsed testcase"
        );

        Ok(Self {
            dependencies,
            tests,
            initial,
        })
    }

    pub fn from_path(path: &Path) -> Result<Self, VerpinError> {
        let text = std::fs::read_to_string(path).map_err(|e| VerpinError::Config {
            message: format!("Failed to read {}: {e}", path.display()),
        })?;
        Self::parse(&text)
    }
}
