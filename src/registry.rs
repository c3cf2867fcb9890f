//! Package-registry lookups and the published-version guard.
//!
//! The primary abstraction is the [Registry] trait so the workflow can be
//! tested without network access. [CratesIoRegistry] is the real
//! implementation; [MockRegistry] serves the tests.
//!
//! The guard is read-only and safe to run in dry-run mode; it always runs
//! before any mutation so an already-published version is caught as early
//! as possible.

use std::time::Duration;

use semver::Version;
use serde::Deserialize;

use crate::error::{ReleaseError, Result};

/// Registry calls are plain blocking GETs; anything slower than this is
/// treated as unavailable.
const REGISTRY_TIMEOUT: Duration = Duration::from_secs(30);

/// crates.io returns a 403 for the default reqwest user-agent, so the
/// client identifies as a browser.
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/111.0.0.0 Safari/537.36";

/// Read-only view of a package registry.
///
/// Implementors must be `Send + Sync`. All methods return
/// [crate::error::Result] and map transport or decoding failures to
/// [ReleaseError::RegistryUnavailable].
pub trait Registry: Send + Sync {
    /// List every published version string for a crate.
    ///
    /// The result is fetched at call time and never cached.
    fn published_versions(&self, crate_name: &str) -> Result<Vec<String>>;
}

#[derive(Debug, Deserialize)]
struct CrateResponse {
    versions: Vec<PublishedVersion>,
}

#[derive(Debug, Deserialize)]
struct PublishedVersion {
    num: String,
}

/// Registry implementation backed by the crates.io HTTP API.
pub struct CratesIoRegistry {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl CratesIoRegistry {
    /// Create a client for the given registry base URL
    /// (e.g., "https://crates.io").
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REGISTRY_TIMEOUT)
            .build()
            .map_err(|e| ReleaseError::registry(format!("failed to build HTTP client: {}", e)))?;

        Ok(CratesIoRegistry {
            client,
            base_url: base_url.into(),
        })
    }
}

impl Registry for CratesIoRegistry {
    fn published_versions(&self, crate_name: &str) -> Result<Vec<String>> {
        let url = format!(
            "{}/api/v1/crates/{}",
            self.base_url.trim_end_matches('/'),
            crate_name
        );

        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|e| ReleaseError::registry(format!("request to {} failed: {}", url, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ReleaseError::registry(format!(
                "{} returned HTTP {}",
                url, status
            )));
        }

        let body: CrateResponse = response
            .json()
            .map_err(|e| ReleaseError::registry(format!("malformed response from {}: {}", url, e)))?;

        Ok(body.versions.into_iter().map(|v| v.num).collect())
    }
}

/// Mock registry for testing without network access.
pub struct MockRegistry {
    versions: Vec<String>,
    unavailable: bool,
}

impl MockRegistry {
    /// Create a mock that reports the given published versions.
    pub fn with_versions(versions: &[&str]) -> Self {
        MockRegistry {
            versions: versions.iter().map(|v| v.to_string()).collect(),
            unavailable: false,
        }
    }

    /// Create a mock whose lookups always fail.
    pub fn unavailable() -> Self {
        MockRegistry {
            versions: Vec::new(),
            unavailable: true,
        }
    }
}

impl Registry for MockRegistry {
    fn published_versions(&self, _crate_name: &str) -> Result<Vec<String>> {
        if self.unavailable {
            return Err(ReleaseError::registry("mock registry is unavailable"));
        }
        Ok(self.versions.clone())
    }
}

/// Fail if the exact version string is already published for the crate.
///
/// # Arguments
/// * `registry` - Registry to query
/// * `crate_name` - The crate whose versions to check
/// * `version` - The candidate release version
///
/// # Returns
/// * `Ok(())` - The version is not yet published
/// * `Err(AlreadyPublished)` - The version appears in the registry's list
/// * `Err(RegistryUnavailable)` - The lookup could not complete
pub fn assert_not_published(
    registry: &dyn Registry,
    crate_name: &str,
    version: &Version,
) -> Result<()> {
    let published = registry.published_versions(crate_name)?;
    let candidate = version.to_string();

    if published.iter().any(|v| v == &candidate) {
        return Err(ReleaseError::already_published(crate_name, candidate));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guard_passes_for_unpublished_version() {
        let registry = MockRegistry::with_versions(&["1.2.2", "1.2.3"]);
        let version = Version::new(1, 3, 0);
        assert!(assert_not_published(&registry, "demo", &version).is_ok());
    }

    #[test]
    fn test_guard_fails_for_published_version() {
        let registry = MockRegistry::with_versions(&["1.2.2", "1.2.3"]);
        let version = Version::new(1, 2, 3);
        let err = assert_not_published(&registry, "demo", &version).unwrap_err();
        assert!(matches!(err, ReleaseError::AlreadyPublished { .. }));
        assert!(err.to_string().contains("1.2.3"));
    }

    #[test]
    fn test_guard_matches_exact_string_only() {
        // "1.2.3-beta.1" being published must not block "1.2.3".
        let registry = MockRegistry::with_versions(&["1.2.3-beta.1"]);
        let version = Version::new(1, 2, 3);
        assert!(assert_not_published(&registry, "demo", &version).is_ok());
    }

    #[test]
    fn test_guard_propagates_registry_unavailable() {
        let registry = MockRegistry::unavailable();
        let version = Version::new(1, 0, 0);
        let err = assert_not_published(&registry, "demo", &version).unwrap_err();
        assert!(matches!(err, ReleaseError::RegistryUnavailable(_)));
    }

    #[test]
    fn test_guard_empty_registry() {
        let registry = MockRegistry::with_versions(&[]);
        let version = Version::new(0, 1, 0);
        assert!(assert_not_published(&registry, "demo", &version).is_ok());
    }
}
