//! Release version parsing, comparison, specifier matching, and ranges.
//!
//! Versions are plain dotted release tuples (`1.26.9`). Comparison is
//! component-wise left to right, with missing trailing components treated
//! as zero, so `1.0` and `1.0.0` are the same version.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use verpin_util::errors::VerpinError;

/// A release version: an ordered tuple of non-negative numeric components.
#[derive(Debug, Clone, Eq)]
pub struct Version {
    components: Vec<u64>,
}

impl Version {
    pub fn new(components: Vec<u64>) -> Self {
        Self { components }
    }

    /// Parse a dotted release string such as `1.26.9`.
    pub fn parse(version: &str) -> Result<Self, VerpinError> {
        let trimmed = version.trim();
        if trimmed.is_empty() {
            return Err(VerpinError::Config {
                message: "Empty version string".to_string(),
            });
        }
        let components = trimmed
            .split('.')
            .map(|part| {
                part.parse::<u64>().map_err(|_| VerpinError::Config {
                    message: format!("Invalid version '{trimmed}'"),
                })
            })
            .collect::<Result<Vec<u64>, _>>()?;
        Ok(Self { components })
    }

    pub fn components(&self) -> &[u64] {
        &self.components
    }
}

impl FromStr for Version {
    type Err = VerpinError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered = self
            .components
            .iter()
            .map(|c| c.to_string())
            .collect::<Vec<_>>()
            .join(".");
        f.write_str(&rendered)
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        let max_len = self.components.len().max(other.components.len());
        for i in 0..max_len {
            let a = self.components.get(i).copied().unwrap_or(0);
            let b = other.components.get(i).copied().unwrap_or(0);
            let ord = a.cmp(&b);
            if ord != Ordering::Equal {
                return ord;
            }
        }
        Ordering::Equal
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Hash for Version {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // Must agree with the padded comparison: `1.0` and `1` are equal.
        let trimmed_len = self
            .components
            .iter()
            .rposition(|&c| c != 0)
            .map_or(0, |i| i + 1);
        self.components[..trimmed_len].hash(state);
    }
}

/// A single specifier comparator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Eq,
    NotEq,
    GreaterEq,
    LessEq,
    Greater,
    Less,
}

impl Op {
    fn matches(self, candidate: &Version, pivot: &Version) -> bool {
        match self {
            Op::Eq => candidate == pivot,
            Op::NotEq => candidate != pivot,
            Op::GreaterEq => candidate >= pivot,
            Op::LessEq => candidate <= pivot,
            Op::Greater => candidate > pivot,
            Op::Less => candidate < pivot,
        }
    }
}

/// A pip-style version specifier: a comma-separated list of comparators,
/// all of which must hold (`>=1.2, <2.0, !=1.5`).
///
/// The empty specifier admits every version.
#[derive(Debug, Clone, Default)]
pub struct VersionSpec {
    clauses: Vec<(Op, Version)>,
}

impl VersionSpec {
    /// The specifier that admits everything.
    pub fn any() -> Self {
        Self::default()
    }

    pub fn parse(spec: &str) -> Result<Self, VerpinError> {
        let mut clauses = Vec::new();
        for raw in spec.split(',') {
            let clause = raw.trim();
            if clause.is_empty() {
                continue;
            }
            let (op, rest) = if let Some(rest) = clause.strip_prefix("==") {
                (Op::Eq, rest)
            } else if let Some(rest) = clause.strip_prefix("!=") {
                (Op::NotEq, rest)
            } else if let Some(rest) = clause.strip_prefix(">=") {
                (Op::GreaterEq, rest)
            } else if let Some(rest) = clause.strip_prefix("<=") {
                (Op::LessEq, rest)
            } else if let Some(rest) = clause.strip_prefix('>') {
                (Op::Greater, rest)
            } else if let Some(rest) = clause.strip_prefix('<') {
                (Op::Less, rest)
            } else {
                return Err(VerpinError::Config {
                    message: format!("Invalid specifier clause '{clause}'"),
                });
            };
            clauses.push((op, Version::parse(rest)?));
        }
        Ok(Self { clauses })
    }

    /// Whether `version` satisfies every comparator.
    pub fn matches(&self, version: &Version) -> bool {
        self.clauses
            .iter()
            .all(|(op, pivot)| op.matches(version, pivot))
    }
}

impl FromStr for VersionSpec {
    type Err = VerpinError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// An inclusive version interval `[min, max]`.
///
/// Validity (`min <= max`) is checked once, at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct VersionRange {
    min: Version,
    max: Version,
}

impl VersionRange {
    pub fn new(min: Version, max: Version) -> Result<Self, VerpinError> {
        if min > max {
            return Err(VerpinError::InvalidRange {
                min: min.to_string(),
                max: max.to_string(),
            });
        }
        Ok(Self { min, max })
    }

    pub fn min(&self) -> &Version {
        &self.min
    }

    pub fn max(&self) -> &Version {
        &self.max
    }

    /// Inclusive on both ends.
    pub fn contains(&self, version: &Version) -> bool {
        *version >= self.min && *version <= self.max
    }
}
