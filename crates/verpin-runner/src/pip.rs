//! Dependency-manager command building.

use verpin_core::dependency::VersionMapping;

/// Builds the install command lines a runner needs from a mapping.
pub trait DepsManager {
    /// Command installing the project itself with its declared dependencies.
    fn install_pinned_cmd(&self) -> String;

    /// Command installing exactly the mapped versions.
    fn install_cmd(&self, mapping: &VersionMapping) -> String;
}

/// pip, optionally with extras (`pip install .[tests,docs]`).
#[derive(Debug, Clone, Default)]
pub struct Pip {
    extras: Vec<String>,
}

impl Pip {
    pub fn new(extras: Vec<String>) -> Self {
        Self { extras }
    }
}

impl DepsManager for Pip {
    fn install_pinned_cmd(&self) -> String {
        if self.extras.is_empty() {
            "pip install .".to_string()
        } else {
            format!("pip install .[{}]", self.extras.join(","))
        }
    }

    fn install_cmd(&self, mapping: &VersionMapping) -> String {
        let pins = mapping
            .iter()
            .map(|(name, version)| format!("{name}=={version}"))
            .collect::<Vec<_>>()
            .join(" ");
        format!("pip install {pins}")
    }
}
