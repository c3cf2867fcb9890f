//! Version directive resolution.
//!
//! The release CLI takes a single positional argument that is either a
//! literal semantic version ("1.3.0") or one of the bump keywords
//! ("major", "minor", "patch"). The argument is decided into a
//! [VersionDirective] exactly once at the boundary; everything downstream
//! works with the resolved [semver::Version].

use semver::Version;

use crate::error::{ReleaseError, Result};

/// Which version component a bump keyword increments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BumpKind {
    Major,
    Minor,
    Patch,
}

/// Parsed form of the version argument: an exact version or a bump keyword.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionDirective {
    Exact(Version),
    Bump(BumpKind),
}

impl VersionDirective {
    /// Parse a directive string.
    ///
    /// The bump keywords are matched case-insensitively; anything else is
    /// treated as a literal semver string.
    ///
    /// # Arguments
    /// * `input` - The raw CLI argument (e.g., "minor" or "1.2.3")
    ///
    /// # Returns
    /// * `Ok(VersionDirective)` - Parsed directive
    /// * `Err(InvalidVersionFormat)` - If the literal does not parse as semver
    pub fn parse(input: &str) -> Result<Self> {
        match input.to_ascii_lowercase().as_str() {
            "major" => Ok(VersionDirective::Bump(BumpKind::Major)),
            "minor" => Ok(VersionDirective::Bump(BumpKind::Minor)),
            "patch" => Ok(VersionDirective::Bump(BumpKind::Patch)),
            _ => Version::parse(input)
                .map(VersionDirective::Exact)
                .map_err(|e| {
                    ReleaseError::invalid_version(format!(
                        "{}. Please provide a valid SemVer string or one of major/minor/patch.",
                        e
                    ))
                }),
        }
    }

    /// Resolve this directive to a concrete version.
    ///
    /// Exact directives resolve to themselves; bump directives fetch the
    /// current version through `current_version` and increment per semver
    /// rules (higher components reset the lower ones to 0, pre-release and
    /// build metadata are cleared). The provider is only invoked for bumps.
    ///
    /// # Arguments
    /// * `current_version` - Provider for the current version (reads external state)
    ///
    /// # Returns
    /// * `Ok(Version)` - The version to release
    /// * `Err` - If the provider fails
    pub fn resolve<F>(&self, current_version: F) -> Result<Version>
    where
        F: FnOnce() -> Result<Version>,
    {
        match self {
            VersionDirective::Exact(version) => Ok(version.clone()),
            VersionDirective::Bump(kind) => Ok(bump(&current_version()?, *kind)),
        }
    }
}

/// Bump a version according to the bump kind.
///
/// - **Major**: major += 1, minor = 0, patch = 0
/// - **Minor**: minor += 1, patch = 0
/// - **Patch**: patch += 1
///
/// Pre-release and build metadata never carry over into a bumped version.
pub fn bump(version: &Version, kind: BumpKind) -> Version {
    match kind {
        BumpKind::Major => Version::new(version.major + 1, 0, 0),
        BumpKind::Minor => Version::new(version.major, version.minor + 1, 0),
        BumpKind::Patch => Version::new(version.major, version.minor, version.patch + 1),
    }
}
