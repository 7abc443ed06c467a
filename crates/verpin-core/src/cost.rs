//! Cost models scoring a complete version mapping.

use crate::dependency::VersionMapping;
use crate::version::Version;

/// Base of the positional fold in [`version_to_float`].
const BASE: f64 = 30.0;

/// Collapse a release tuple into a single float, folding components left to
/// right as `acc = acc * BASE + ln(component)`.
///
/// This approximates an order-preserving encoding but is not exact across
/// tuples of differing length or magnitude. A zero component contributes
/// `ln 1 = 0`.
pub fn version_to_float(version: &Version) -> f64 {
    let mut res = 0.0;
    for &component in version.components() {
        res = res * BASE + (component.max(1) as f64).ln();
    }
    res
}

/// Deterministic scalar score of a complete mapping.
pub trait CostFunction {
    fn cost(&self, mapping: &VersionMapping) -> f64;
}

/// Sums a per-version transform across all mapped dependencies.
///
/// The transform is pluggable so alternative encodings can be substituted
/// for the default [`version_to_float`].
pub struct Sum {
    transform: Box<dyn Fn(&Version) -> f64>,
}

impl Sum {
    pub fn new(transform: impl Fn(&Version) -> f64 + 'static) -> Self {
        Self {
            transform: Box::new(transform),
        }
    }
}

impl Default for Sum {
    fn default() -> Self {
        Self::new(version_to_float)
    }
}

impl CostFunction for Sum {
    fn cost(&self, mapping: &VersionMapping) -> f64 {
        mapping.iter().map(|(_, ver)| (self.transform)(ver)).sum()
    }
}
