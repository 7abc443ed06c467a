//! Handler for `verpin update-versions`.

use miette::Result;
use verpin_registry::cache::VersionsCache;
use verpin_registry::client::build_client;
use verpin_registry::fetch::fetch_versions;
use verpin_util::progress::{spinner, status, status_warn};

pub async fn exec(deps: Vec<String>, pyver: &str, min_year: i32, verbose: bool) -> Result<()> {
    let cache = VersionsCache::new(pyver)?;
    let deps = if deps.is_empty() {
        cache.cached_deps()?
    } else {
        deps
    };
    if deps.is_empty() {
        status_warn("Skipped", "no dependencies named and none cached yet");
        return Ok(());
    }

    let client = build_client()?;
    let sp = spinner(&format!("Fetching versions for {} dependencies...", deps.len()));
    let fetched = fetch_versions(&client, &cache, &deps, min_year, false).await?;
    sp.finish_and_clear();

    if verbose {
        for (dep, versions) in &fetched {
            status("Fetched", &format!("{dep}: {} versions", versions.len()));
        }
    }
    status(
        "Updated",
        &format!("{} dependencies for Python {pyver}", fetched.len()),
    );
    Ok(())
}
