//! Handler for `verpin project`.
//!
//! Solves a real project: dependencies come from a testcase-style
//! `verpin.toml` manifest in the project directory, feasibility comes from
//! installing each candidate mapping and running the project's test
//! commands.

use std::path::Path;

use miette::Result;
use tracing::debug;
use verpin_core::dependency::{Dependency, VersionMapping};
use verpin_core::runner::TestRunner;
use verpin_core::testcase::Testcase;
use verpin_registry::cache::VersionsCache;
use verpin_registry::client::build_client;
use verpin_registry::fetch::fetch_versions;
use verpin_registry::prune::prune_unusable;
use verpin_runner::command::CommandRunner;
use verpin_runner::pip::{DepsManager, Pip};
use verpin_util::errors::VerpinError;
use verpin_util::process::CommandBuilder;
use verpin_util::progress::{spinner, status};

use crate::cli::SearchArgs;

/// Version-list preparation options.
pub struct Refresh {
    pub versions: bool,
    pub prune: bool,
    pub bypass_initial: bool,
    pub pyver: String,
    pub min_year: i32,
}

pub async fn exec(
    path: &Path,
    test_cmds: Vec<String>,
    extras: Option<&str>,
    refresh: Refresh,
    search: &SearchArgs,
) -> Result<()> {
    let manifest_path = path.join("verpin.toml");
    if !manifest_path.is_file() {
        return Err(VerpinError::Config {
            message: format!("No verpin.toml found in {}", path.display()),
        }
        .into());
    }

    let case = Testcase::from_path(&manifest_path)?;
    let mut deps = case.dependencies;

    if refresh.versions {
        let client = build_client()?;
        let cache = VersionsCache::new(&refresh.pyver)?;
        let names: Vec<String> = deps.iter().map(|d| d.name().to_string()).collect();
        let sp = spinner("Fetching dependency versions...");
        let fetched = fetch_versions(&client, &cache, &names, refresh.min_year, true).await?;
        sp.finish_and_clear();
        deps = deps
            .into_iter()
            .zip(fetched)
            .map(|(dep, (_, versions))| {
                Dependency::new(dep.name().to_string(), versions, dep.spec().clone())
            })
            .collect();
    }

    let extras: Vec<String> = extras
        .map(|s| s.split(',').map(str::to_string).collect())
        .unwrap_or_default();
    let pip = Pip::new(extras);

    if refresh.prune {
        deps = prune_deps(deps, &pip, path)?;
    }

    let test_cmds = if test_cmds.is_empty() {
        vec!["pytest".to_string()]
    } else {
        test_cmds
    };
    let mut runner = CommandRunner::new(Box::new(pip), path.to_path_buf(), test_cmds);

    if !refresh.bypass_initial {
        let sp = spinner("Checking the initial versions...");
        let passed = runner.feasible(&case.initial)?;
        sp.finish_and_clear();
        if passed {
            status("Passed", "all tests pass with the initial versions");
            return Ok(());
        }
    }

    super::solve_and_report(deps, Box::new(runner), search, case.initial)
}

/// Binary-search each dependency's version list down to the installable
/// suffix, using a single-version trial install as the probe.
fn prune_deps(deps: Vec<Dependency>, pip: &Pip, path: &Path) -> Result<Vec<Dependency>> {
    let mut pruned = Vec::with_capacity(deps.len());
    for dep in deps {
        let name = dep.name().to_string();
        let kept = prune_unusable(dep.versions(), |version| {
            let mut single = VersionMapping::new();
            single.set(name.clone(), version.clone());
            let line = pip.install_cmd(&single);
            debug!(cmd = line.as_str(), "probing installability");
            let output = CommandBuilder::from_line(&line)
                .ok_or_else(|| VerpinError::Runner {
                    message: "Empty install command".to_string(),
                })?
                .cwd(path.display().to_string())
                .exec()
                .map_err(|e| VerpinError::Runner {
                    message: format!("Failed to spawn '{line}': {e}"),
                })?;
            Ok(output.status.success())
        })?;
        let dropped = dep.versions().len() - kept.len();
        if dropped > 0 {
            status(
                "Pruned",
                &format!("{dropped} unusable versions of {name}"),
            );
        }
        pruned.push(Dependency::new(name, kept, dep.spec().clone()));
    }
    Ok(pruned)
}
