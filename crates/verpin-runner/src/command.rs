//! A `TestRunner` that drives external commands.

use std::path::PathBuf;

use tracing::debug;
use verpin_core::dependency::VersionMapping;
use verpin_core::runner::TestRunner;
use verpin_util::errors::VerpinError;
use verpin_util::process::CommandBuilder;

use crate::pip::DepsManager;

/// Installs each candidate mapping and runs the configured test commands
/// in a project directory.
///
/// A failing install means the combination cannot be built, so every test
/// reports `false`. A command that cannot be spawned at all is an
/// unrecoverable environment failure and surfaces as an error instead.
pub struct CommandRunner {
    deps_manager: Box<dyn DepsManager>,
    workdir: PathBuf,
    test_cmds: Vec<String>,
}

impl CommandRunner {
    pub fn new(
        deps_manager: Box<dyn DepsManager>,
        workdir: PathBuf,
        test_cmds: Vec<String>,
    ) -> Self {
        Self {
            deps_manager,
            workdir,
            test_cmds,
        }
    }

    fn spawn(&self, line: &str) -> Result<std::process::Output, VerpinError> {
        let builder = CommandBuilder::from_line(line).ok_or_else(|| VerpinError::Runner {
            message: "Empty command line".to_string(),
        })?;
        builder
            .cwd(self.workdir.display().to_string())
            .exec()
            .map_err(|e| VerpinError::Runner {
                message: format!("Failed to spawn '{line}': {e}"),
            })
    }
}

impl TestRunner for CommandRunner {
    fn run_all(&mut self, mapping: &VersionMapping) -> Result<Vec<bool>, VerpinError> {
        let install = self.deps_manager.install_cmd(mapping);
        let output = self.spawn(&install)?;
        if !output.status.success() {
            debug!(mapping = %mapping, "install failed, mapping infeasible");
            return Ok(vec![false; self.test_cmds.len()]);
        }

        let mut results = Vec::with_capacity(self.test_cmds.len());
        for cmd in &self.test_cmds {
            let builder = CommandBuilder::from_line(cmd).ok_or_else(|| VerpinError::Runner {
                message: "Empty test command".to_string(),
            })?;
            let output = builder
                .cwd(self.workdir.display().to_string())
                .exec()
                .map_err(|e| VerpinError::Runner {
                    message: format!("Failed to spawn '{cmd}': {e}"),
                })?;
            results.push(output.status.success());
        }
        debug!(mapping = %mapping, results = ?results, "ran test commands");
        Ok(results)
    }
}
