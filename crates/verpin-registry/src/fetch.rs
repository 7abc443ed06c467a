//! Version discovery against the PyPI JSON API.
//!
//! Releases are admitted by upload year: a version counts as available when
//! the newest file of its release was uploaded in the configured minimum
//! year or later. Fetches for many dependencies fan out concurrently but
//! are bounded by a semaphore.

use std::collections::HashMap;
use std::sync::Arc;

use reqwest::Client;
use serde::Deserialize;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};
use verpin_core::version::Version;
use verpin_util::errors::VerpinError;

use crate::cache::VersionsCache;

const MAX_CONCURRENT_FETCHES: usize = 8;
const PYPI_BASE: &str = "https://pypi.org";

/// Minimum release year admitted by default.
pub const DEFAULT_MIN_YEAR: i32 = 2018;

#[derive(Debug, Deserialize)]
struct ProjectPayload {
    releases: HashMap<String, Vec<ReleaseFile>>,
}

#[derive(Debug, Deserialize)]
struct ReleaseFile {
    upload_time: String,
}

/// Version strings admitted from a project payload, sorted ascending.
///
/// Releases with no uploaded files are skipped; so are version strings that
/// do not parse as plain release tuples (pre-releases, local versions).
fn admitted_versions(payload: &ProjectPayload, min_year: i32) -> Vec<String> {
    let mut versions: Vec<Version> = Vec::new();
    for (raw, files) in &payload.releases {
        let newest_year = files
            .iter()
            .filter_map(|file| file.upload_time.get(..4)?.parse::<i32>().ok())
            .max();
        let Some(year) = newest_year else {
            continue;
        };
        if year < min_year {
            continue;
        }
        match Version::parse(raw) {
            Ok(version) => versions.push(version),
            Err(_) => warn!(version = raw.as_str(), "skipping unparsable version"),
        }
    }
    versions.sort();
    versions.into_iter().map(|v| v.to_string()).collect()
}

async fn fetch_project(client: &Client, dep: &str) -> Result<ProjectPayload, VerpinError> {
    let url = format!("{PYPI_BASE}/pypi/{dep}/json");
    let resp = client
        .get(&url)
        .send()
        .await
        .map_err(|e| VerpinError::Network {
            message: format!("Request to {url} failed: {e}"),
        })?;
    if !resp.status().is_success() {
        return Err(VerpinError::Network {
            message: format!("HTTP {} fetching {url}", resp.status()),
        });
    }
    resp.json().await.map_err(|e| VerpinError::Network {
        message: format!("Invalid payload from {url}: {e}"),
    })
}

/// Discover the admitted versions of every named dependency, in caller
/// order.
///
/// With `use_cache` set, a cached entry short-circuits the network; fetched
/// lists are always written back to the cache.
pub async fn fetch_versions(
    client: &Client,
    cache: &VersionsCache,
    deps: &[String],
    min_year: i32,
    use_cache: bool,
) -> Result<Vec<(String, Vec<Version>)>, VerpinError> {
    info!(count = deps.len(), "fetching dependency versions");
    let mut raw_lists: Vec<Option<Vec<String>>> = vec![None; deps.len()];

    let mut join_set = JoinSet::new();
    let semaphore = Arc::new(Semaphore::new(MAX_CONCURRENT_FETCHES));
    for (index, dep) in deps.iter().enumerate() {
        if use_cache {
            if let Some(cached) = cache.load(dep)? {
                debug!(dep = dep.as_str(), "using cached version list");
                raw_lists[index] = Some(cached);
                continue;
            }
        }

        let client = client.clone();
        let dep = dep.clone();
        let sem = semaphore.clone();
        join_set.spawn(async move {
            let _permit = sem.acquire().await;
            let result = fetch_project(&client, &dep)
                .await
                .map(|payload| admitted_versions(&payload, min_year));
            (index, result)
        });
    }

    while let Some(joined) = join_set.join_next().await {
        let (index, result) = joined.map_err(|e| VerpinError::Network {
            message: format!("Fetch task failed: {e}"),
        })?;
        let versions = result?;
        debug!(dep = deps[index].as_str(), count = versions.len(), "fetched");
        cache.store(&deps[index], &versions)?;
        raw_lists[index] = Some(versions);
    }

    deps.iter()
        .zip(raw_lists)
        .map(|(dep, raw)| {
            let raw = raw.expect("every dependency resolved from cache or network");
            let versions = raw
                .iter()
                .map(|s| Version::parse(s))
                .collect::<Result<Vec<_>, _>>()?;
            Ok((dep.clone(), versions))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(json: &str) -> ProjectPayload {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn filters_releases_older_than_min_year() {
        let payload = payload(
            r#"{
                "releases": {
                    "1.0": [{"upload_time": "2015-06-01T00:00:00"}],
                    "2.0": [{"upload_time": "2015-06-01T00:00:00"},
                            {"upload_time": "2019-02-03T10:30:00"}],
                    "3.0": [{"upload_time": "2021-11-20T08:00:00"}]
                }
            }"#,
        );
        assert_eq!(admitted_versions(&payload, 2018), vec!["2.0", "3.0"]);
    }

    #[test]
    fn skips_releases_without_files_and_unparsable_versions() {
        let payload = payload(
            r#"{
                "releases": {
                    "1.0": [],
                    "2.0rc1": [{"upload_time": "2021-01-01T00:00:00"}],
                    "2.0": [{"upload_time": "2021-01-01T00:00:00"}]
                }
            }"#,
        );
        assert_eq!(admitted_versions(&payload, 2018), vec!["2.0"]);
    }

    #[test]
    fn admitted_versions_are_sorted_ascending() {
        let payload = payload(
            r#"{
                "releases": {
                    "1.10": [{"upload_time": "2020-01-01T00:00:00"}],
                    "1.2": [{"upload_time": "2020-01-01T00:00:00"}],
                    "1.9": [{"upload_time": "2020-01-01T00:00:00"}]
                }
            }"#,
        );
        assert_eq!(admitted_versions(&payload, 2018), vec!["1.2", "1.9", "1.10"]);
    }

    #[tokio::test]
    async fn cached_entries_short_circuit_the_network() {
        let tmp = tempfile::tempdir().unwrap();
        let cache = VersionsCache::at_root(tmp.path(), "3.9.7").unwrap();
        cache
            .store("six", &["1.15.0".to_string(), "1.16.0".to_string()])
            .unwrap();

        let client = crate::client::build_client().unwrap();
        let deps = vec!["six".to_string()];
        let fetched = fetch_versions(&client, &cache, &deps, DEFAULT_MIN_YEAR, true)
            .await
            .unwrap();

        assert_eq!(fetched.len(), 1);
        assert_eq!(fetched[0].0, "six");
        assert_eq!(
            fetched[0].1,
            vec![
                Version::parse("1.15.0").unwrap(),
                Version::parse("1.16.0").unwrap()
            ]
        );
    }
}
