//! Registry version discovery for verpin.
//!
//! Fetches the published versions of a dependency from the PyPI JSON API
//! with a bounded number of concurrent requests, caches the admitted lists
//! on disk per interpreter version, and prunes unusable versions via binary
//! search over a monotone probe.

pub mod cache;
pub mod client;
pub mod fetch;
pub mod prune;
