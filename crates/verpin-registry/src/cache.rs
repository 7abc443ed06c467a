//! On-disk cache of discovered versions.
//!
//! One JSON file per dependency, partitioned by interpreter version, so
//! `~/.verpin/cache/3.9.7/requests.json` holds the admitted version strings
//! of `requests` discovered for Python 3.9.7.

use std::path::{Path, PathBuf};

use verpin_util::errors::VerpinError;

/// Per-interpreter version cache rooted at `~/.verpin/cache/<pyver>/`.
#[derive(Debug, Clone)]
pub struct VersionsCache {
    dir: PathBuf,
}

impl VersionsCache {
    pub fn new(pyver: &str) -> Result<Self, VerpinError> {
        Self::at_root(&default_root(), pyver)
    }

    /// Root override, used by tests and configuration.
    pub fn at_root(root: &Path, pyver: &str) -> Result<Self, VerpinError> {
        let dir = root.join(pyver);
        if !dir.exists() {
            std::fs::create_dir_all(&dir)?;
        }
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Names of all dependencies present in the cache, sorted.
    pub fn cached_deps(&self) -> Result<Vec<String>, VerpinError> {
        let mut deps = Vec::new();
        for entry in std::fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                deps.push(stem.to_string());
            }
        }
        deps.sort();
        Ok(deps)
    }

    pub fn has(&self, dep: &str) -> bool {
        self.entry_path(dep).is_file()
    }

    pub fn store(&self, dep: &str, versions: &[String]) -> Result<(), VerpinError> {
        let rendered = serde_json::to_string(versions).map_err(|e| VerpinError::Config {
            message: format!("Failed to encode version list for '{dep}': {e}"),
        })?;
        std::fs::write(self.entry_path(dep), rendered)?;
        Ok(())
    }

    /// The cached version strings for `dep`, or `None` when absent.
    pub fn load(&self, dep: &str) -> Result<Option<Vec<String>>, VerpinError> {
        let path = self.entry_path(dep);
        if !path.is_file() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&path)?;
        let versions = serde_json::from_str(&content).map_err(|e| VerpinError::Config {
            message: format!("Corrupt cache entry for '{dep}': {e}"),
        })?;
        Ok(Some(versions))
    }

    fn entry_path(&self, dep: &str) -> PathBuf {
        self.dir.join(format!("{dep}.json"))
    }
}

/// `~/.verpin/cache`, following `HOME` (or `USERPROFILE` on Windows).
fn default_root() -> PathBuf {
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .unwrap_or_else(|_| ".".to_string());
    Path::new(&home).join(".verpin").join("cache")
}
