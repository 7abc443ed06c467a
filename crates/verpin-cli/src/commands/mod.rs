//! Command dispatch and handler modules.

mod project;
mod update;
mod virtual_;

use miette::Result;
use verpin_core::cost::Sum;
use verpin_core::dependency::{Dependency, VersionMapping};
use verpin_core::optimizer::Direction;
use verpin_core::runner::TestRunner;
use verpin_solver::algorithm::{build, SolverConfig};
use verpin_util::errors::VerpinError;
use verpin_util::progress::{spinner, status, status_warn};

use crate::cli::{Cli, Command, SearchArgs};

/// Route a parsed CLI invocation to the appropriate command handler.
pub async fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Virtual { testcase, search } => virtual_::exec(&testcase, &search),
        Command::Project {
            path,
            test_cmds,
            extras,
            refresh_versions,
            prune,
            bypass_initial,
            pyver,
            min_year,
            search,
        } => {
            project::exec(
                &path,
                test_cmds,
                extras.as_deref(),
                project::Refresh {
                    versions: refresh_versions,
                    prune,
                    bypass_initial,
                    pyver,
                    min_year,
                },
                &search,
            )
            .await
        }
        Command::UpdateVersions {
            deps,
            pyver,
            min_year,
        } => update::exec(deps, &pyver, min_year, cli.verbose).await,
    }
}

/// Translate CLI search flags into a solver configuration.
pub(crate) fn solver_config(search: &SearchArgs, inimapping: VersionMapping) -> SolverConfig {
    SolverConfig {
        iterations: search.iterations,
        inimapping: Some(inimapping),
        prob_restart: search.prob_restart,
        particles: search.particles,
        w: search.inertia,
        phi_p: search.phi_p,
        phi_g: search.phi_g,
        seed: search.seed,
    }
}

/// Assemble the selected strategy, run it, and report the outcome.
pub(crate) fn solve_and_report(
    deps: Vec<Dependency>,
    runner: Box<dyn TestRunner>,
    search: &SearchArgs,
    inimapping: VersionMapping,
) -> Result<()> {
    let direction = if search.minimize {
        Direction::Minimize
    } else {
        Direction::Maximize
    };
    let mut algo = build(
        search.algorithm,
        deps,
        runner,
        Box::new(Sum::default()),
        direction,
        solver_config(search, inimapping),
    )?;

    let sp = spinner(&format!("Searching with {}...", search.algorithm));
    let outcome = algo.run();
    sp.finish_and_clear();

    match outcome {
        Ok(out) => {
            status("Solved", &format!("cost {}", out.cost));
            println!("{out}");
            Ok(())
        }
        Err(VerpinError::NoSolution) => {
            status_warn("Exhausted", "the search budget found no feasible mapping");
            Err(VerpinError::NoSolution.into())
        }
        Err(e) => Err(e.into()),
    }
}
