//! Handler for `verpin virtual`.

use std::path::Path;

use miette::Result;
use verpin_core::runner::LinearRunner;
use verpin_core::testcase::Testcase;

use crate::cli::SearchArgs;

pub fn exec(testcase: &Path, search: &SearchArgs) -> Result<()> {
    let case = Testcase::from_path(testcase)?;
    let runner = Box::new(LinearRunner::new(case.tests));
    super::solve_and_report(case.dependencies, runner, search, case.initial)
}
