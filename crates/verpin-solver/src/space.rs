//! Validated view over the ordered dependency list.
//!
//! Each dependency contributes one axis whose points are its admissible
//! versions in sorted order; a complete assignment is a vector of ordinal
//! indices, one per axis.

use rand::Rng;
use verpin_core::dependency::{Dependency, VersionMapping};
use verpin_core::version::Version;
use verpin_util::errors::VerpinError;

/// The discrete search space the strategies operate on.
#[derive(Debug, Clone)]
pub struct SearchSpace {
    deps: Vec<Dependency>,
}

impl SearchSpace {
    /// Validate and wrap the caller-ordered dependency list.
    ///
    /// A dependency with no admissible versions is rejected here, before
    /// any search starts: no assignment could ever be made.
    pub fn new(deps: Vec<Dependency>) -> Result<Self, VerpinError> {
        for dep in &deps {
            if dep.admissible().is_empty() {
                return Err(VerpinError::EmptyAdmissible {
                    name: dep.name().to_string(),
                });
            }
        }
        Ok(Self { deps })
    }

    /// Dependencies in search order.
    pub fn deps(&self) -> &[Dependency] {
        &self.deps
    }

    /// Number of axes.
    pub fn len(&self) -> usize {
        self.deps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.deps.is_empty()
    }

    /// Number of admissible versions on axis `axis`.
    pub fn axis_len(&self, axis: usize) -> usize {
        self.deps[axis].admissible().len()
    }

    /// The version at ordinal `index` on axis `axis`.
    pub fn version(&self, axis: usize, index: usize) -> &Version {
        &self.deps[axis].admissible()[index]
    }

    /// Decode one ordinal index per axis into a complete mapping.
    pub fn mapping_at(&self, indices: &[usize]) -> VersionMapping {
        debug_assert_eq!(indices.len(), self.deps.len());
        self.deps
            .iter()
            .zip(indices)
            .map(|(dep, &index)| (dep.name().to_string(), dep.admissible()[index].clone()))
            .collect()
    }

    /// Ordinal position of each dependency's mapped version within its
    /// admissible list.
    ///
    /// Fails when the mapping misses a dependency or maps it to a version
    /// outside the admissible list.
    pub fn ordinals_of(&self, mapping: &VersionMapping) -> Result<Vec<usize>, VerpinError> {
        self.deps
            .iter()
            .map(|dep| {
                let version = mapping.get(dep.name()).ok_or_else(|| VerpinError::Config {
                    message: format!("Mapping has no entry for dependency '{}'", dep.name()),
                })?;
                dep.admissible()
                    .iter()
                    .position(|v| v == version)
                    .ok_or_else(|| VerpinError::Config {
                        message: format!(
                            "Version {version} of '{}' is not admissible",
                            dep.name()
                        ),
                    })
            })
            .collect()
    }

    /// One independent uniform draw per axis.
    pub fn random_indices<R: Rng>(&self, rng: &mut R) -> Vec<usize> {
        self.deps
            .iter()
            .map(|dep| rng.gen_range(0..dep.admissible().len()))
            .collect()
    }
}
