//! Dependencies and version mappings.

use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::version::{Version, VersionSpec};

/// A named package with its known versions and a specifier narrowing which
/// of them are admissible for the search.
///
/// Identity is the (case-sensitive) name alone; two dependencies with the
/// same name compare equal regardless of their version lists. Immutable
/// after construction.
#[derive(Debug, Clone)]
pub struct Dependency {
    name: String,
    versions: Vec<Version>,
    spec: VersionSpec,
    admissible: Vec<Version>,
}

impl Dependency {
    pub fn new(name: impl Into<String>, mut versions: Vec<Version>, spec: VersionSpec) -> Self {
        versions.sort();
        let admissible = versions
            .iter()
            .filter(|v| spec.matches(v))
            .cloned()
            .collect();
        Self {
            name: name.into(),
            versions,
            spec,
            admissible,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// All known versions, sorted ascending.
    pub fn versions(&self) -> &[Version] {
        &self.versions
    }

    pub fn spec(&self) -> &VersionSpec {
        &self.spec
    }

    /// The subsequence of known versions satisfying the specifier,
    /// still sorted ascending.
    pub fn admissible(&self) -> &[Version] {
        &self.admissible
    }
}

impl PartialEq for Dependency {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Dependency {}

impl Hash for Dependency {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// An assignment of one version per dependency, keyed by name.
///
/// "Complete" means every dependency in the active search scope has an
/// entry. Algorithms mutate a working mapping in place during traversal and
/// hand out clones, never aliases.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VersionMapping {
    entries: BTreeMap<String, Version>,
}

impl VersionMapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, name: impl Into<String>, version: Version) {
        self.entries.insert(name.into(), version);
    }

    pub fn get(&self, name: &str) -> Option<&Version> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Version)> {
        self.entries.iter().map(|(name, ver)| (name.as_str(), ver))
    }
}

impl FromIterator<(String, Version)> for VersionMapping {
    fn from_iter<I: IntoIterator<Item = (String, Version)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for VersionMapping {
    /// Renders pip-style pin lines: `requests==2.26.0, six==1.16.0`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (name, version) in self.iter() {
            if !first {
                f.write_str(", ")?;
            }
            write!(f, "{name}=={version}")?;
            first = false;
        }
        Ok(())
    }
}
