//! Binary-search pruning of unusable versions.

use verpin_core::version::Version;
use verpin_util::errors::VerpinError;

/// Drop every version below the first usable one.
///
/// `versions` must be sorted ascending and `probe` must be monotone: once a
/// version is usable, every later version is usable too (the usual shape
/// when old releases stopped installing under the current interpreter).
/// The probe runs O(log n) times. Probe failures propagate. Returns an
/// empty list when nothing is usable.
pub fn prune_unusable<F>(versions: &[Version], mut probe: F) -> Result<Vec<Version>, VerpinError>
where
    F: FnMut(&Version) -> Result<bool, VerpinError>,
{
    let mut lo = 0;
    let mut hi = versions.len();
    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        if probe(&versions[mid])? {
            hi = mid;
        } else {
            lo = mid + 1;
        }
    }
    Ok(versions[lo..].to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn versions(raw: &[&str]) -> Vec<Version> {
        raw.iter().map(|s| Version::parse(s).unwrap()).collect()
    }

    #[test]
    fn keeps_the_usable_suffix() {
        let all = versions(&["1.0", "2.0", "3.0", "4.0"]);
        let cutoff = Version::parse("3.0").unwrap();
        let kept = prune_unusable(&all, |v| Ok(*v >= cutoff)).unwrap();
        assert_eq!(kept, versions(&["3.0", "4.0"]));
    }

    #[test]
    fn all_usable_keeps_everything() {
        let all = versions(&["1.0", "2.0"]);
        let kept = prune_unusable(&all, |_| Ok(true)).unwrap();
        assert_eq!(kept, all);
    }

    #[test]
    fn none_usable_yields_empty() {
        let all = versions(&["1.0", "2.0"]);
        let kept = prune_unusable(&all, |_| Ok(false)).unwrap();
        assert!(kept.is_empty());
    }

    #[test]
    fn probe_runs_logarithmically() {
        let all: Vec<Version> = (0u64..1024).map(|i| Version::new(vec![i])).collect();
        let cutoff = Version::parse("600").unwrap();
        let mut calls = 0;
        prune_unusable(&all, |v| {
            calls += 1;
            Ok(*v >= cutoff)
        })
        .unwrap();
        assert!(calls <= 11, "probe ran {calls} times");
    }

    #[test]
    fn probe_errors_propagate() {
        let all = versions(&["1.0", "2.0"]);
        let err = prune_unusable(&all, |_| {
            Err(VerpinError::Runner {
                message: "probe exploded".to_string(),
            })
        })
        .unwrap_err();
        assert!(matches!(err, VerpinError::Runner { .. }));
    }
}
