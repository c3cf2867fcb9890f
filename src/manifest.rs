//! Manifest version reads and format-preserving rewrites.
//!
//! The manifest's `package.version` field is the single source of truth
//! for the released version. Reads go through the `toml` parser; the
//! rewrite is a targeted line substitution that only touches the value
//! token of the `version = "..."` line inside `[package]`, leaving every
//! other byte of the file (comments, key order, whitespace) unchanged.
//! The line-based strategy is isolated here so it could be swapped for a
//! structural edit without affecting callers.

use std::fs;
use std::path::Path;

use regex::Regex;
use semver::Version;
use serde::Deserialize;

use crate::error::{ReleaseError, Result};

const VERSION_FIELD: &str = "`version` in the [package] section";

#[derive(Debug, Deserialize)]
struct ManifestDoc {
    package: Option<PackageSection>,
}

#[derive(Debug, Deserialize)]
struct PackageSection {
    name: Option<String>,
    version: Option<String>,
}

/// Read `package.name` from a manifest file.
///
/// Used as the registry crate name when the configuration does not set one.
pub fn read_package_name(manifest_path: &Path) -> Result<String> {
    let content = fs::read_to_string(manifest_path)?;
    let doc: ManifestDoc = toml::from_str(&content).map_err(|e| {
        ReleaseError::config(format!(
            "Failed to parse {}: {}",
            manifest_path.display(),
            e
        ))
    })?;

    doc.package
        .and_then(|p| p.name)
        .ok_or_else(|| ReleaseError::field_not_found("`name` in the [package] section"))
}

/// Read the current `package.version` from a manifest file.
///
/// # Arguments
/// * `manifest_path` - Path to the manifest (usually `Cargo.toml`)
///
/// # Returns
/// * `Ok(Version)` - The parsed current version
/// * `Err(FieldNotFound)` - If the `[package]` section or `version` key is missing
/// * `Err(InvalidVersionFormat)` - If the field value is not valid semver
pub fn read_version(manifest_path: &Path) -> Result<Version> {
    let content = fs::read_to_string(manifest_path)?;
    let doc: ManifestDoc = toml::from_str(&content).map_err(|e| {
        ReleaseError::config(format!(
            "Failed to parse {}: {}",
            manifest_path.display(),
            e
        ))
    })?;

    let version = doc
        .package
        .and_then(|p| p.version)
        .ok_or_else(|| ReleaseError::field_not_found(VERSION_FIELD))?;

    Version::parse(&version).map_err(|e| {
        ReleaseError::invalid_version(format!(
            "manifest version `{}` is not valid semver: {}",
            version, e
        ))
    })
}

/// Rewrite `package.version` in place, returning the previous version string.
///
/// Validation (field present, not already at the target version) always
/// runs; the file is only written when `dry_run` is false. The caller is
/// responsible for staging/committing the mutated file.
///
/// # Arguments
/// * `manifest_path` - Path to the manifest file
/// * `new_version` - The version to write
/// * `dry_run` - When true, validate but do not write
///
/// # Returns
/// * `Ok(String)` - The previous version string, for use in a commit message
/// * `Err(NoOpVersion)` - If the manifest is already at `new_version`
/// * `Err(FieldNotFound)` - If no version field exists in `[package]`
pub fn rewrite_version(
    manifest_path: &Path,
    new_version: &Version,
    dry_run: bool,
) -> Result<String> {
    let content = fs::read_to_string(manifest_path)?;
    let (previous, updated) = substitute_package_version(&content, &new_version.to_string())?;

    if !dry_run {
        fs::write(manifest_path, updated)?;
    }

    Ok(previous)
}

/// Replace the value of the first `version` key inside `[package]`.
///
/// The scan tracks section headers so a `version` key in another table
/// (say, a dependency literally named `version`) is never touched. Line
/// terminators are carried through untouched, CRLF included.
fn substitute_package_version(content: &str, new_version: &str) -> Result<(String, String)> {
    let section_re = Regex::new(r"^\s*\[([^\]]+)\]").expect("section regex is valid");
    let version_re =
        Regex::new(r#"^(\s*version\s*=\s*")([^"]*)(".*)$"#).expect("version regex is valid");

    let mut in_package = false;
    let mut previous: Option<String> = None;
    let mut updated = String::with_capacity(content.len());

    for segment in content.split_inclusive('\n') {
        let line = segment.trim_end_matches(['\n', '\r']);

        if let Some(section) = section_re.captures(line) {
            in_package = &section[1] == "package";
            updated.push_str(segment);
            continue;
        }

        if previous.is_none() && in_package {
            if let Some(caps) = version_re.captures(line) {
                let current = caps[2].to_string();
                if current == new_version {
                    return Err(ReleaseError::noop_version(current));
                }

                updated.push_str(&caps[1]);
                updated.push_str(new_version);
                updated.push_str(&caps[3]);
                updated.push_str(&segment[line.len()..]);
                previous = Some(current);
                continue;
            }
        }

        updated.push_str(segment);
    }

    match previous {
        Some(previous) => Ok((previous, updated)),
        None => Err(ReleaseError::field_not_found(VERSION_FIELD)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MANIFEST: &str = r#"# release test fixture
[package]
name = "demo"
version = "1.2.3"
edition = "2021"

[dependencies]
semver = "1.0"
"#;

    #[test]
    fn test_substitute_changes_only_the_value_token() {
        let (previous, updated) = substitute_package_version(MANIFEST, "1.3.0").unwrap();
        assert_eq!(previous, "1.2.3");
        assert_eq!(updated, MANIFEST.replace("version = \"1.2.3\"", "version = \"1.3.0\""));
    }

    #[test]
    fn test_substitute_noop_version_fails() {
        let err = substitute_package_version(MANIFEST, "1.2.3").unwrap_err();
        assert!(matches!(err, ReleaseError::NoOpVersion { .. }));
    }

    #[test]
    fn test_substitute_missing_field_fails() {
        let manifest = "[package]\nname = \"demo\"\n";
        let err = substitute_package_version(manifest, "1.0.0").unwrap_err();
        assert!(matches!(err, ReleaseError::FieldNotFound(_)));
    }

    #[test]
    fn test_substitute_ignores_version_outside_package() {
        let manifest = "[dependencies.version]\nversion = \"0.5.0\"\n\n[package]\nname = \"demo\"\nversion = \"1.0.0\"\n";
        let (previous, updated) = substitute_package_version(manifest, "1.1.0").unwrap();
        assert_eq!(previous, "1.0.0");
        assert!(updated.contains("version = \"0.5.0\""));
        assert!(updated.contains("version = \"1.1.0\""));
    }

    #[test]
    fn test_substitute_preserves_trailing_comment_and_crlf() {
        let manifest = "[package]\r\nversion = \"0.1.0\" # bumped by CI\r\n";
        let (previous, updated) = substitute_package_version(manifest, "0.2.0").unwrap();
        assert_eq!(previous, "0.1.0");
        assert_eq!(updated, "[package]\r\nversion = \"0.2.0\" # bumped by CI\r\n");
    }

    #[test]
    fn test_substitute_only_first_package_version_line() {
        // A second version key in [package] would be invalid TOML anyway;
        // make sure we do not touch later sections after the first hit.
        let manifest = "[package]\nversion = \"1.0.0\"\n\n[workspace.package]\nversion = \"1.0.0\"\n";
        let (_, updated) = substitute_package_version(manifest, "2.0.0").unwrap();
        assert!(updated.contains("[workspace.package]\nversion = \"1.0.0\""));
    }

    #[test]
    fn test_read_version() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Cargo.toml");
        fs::write(&path, MANIFEST).unwrap();

        let version = read_version(&path).unwrap();
        assert_eq!(version, Version::new(1, 2, 3));
    }

    #[test]
    fn test_read_package_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Cargo.toml");
        fs::write(&path, MANIFEST).unwrap();

        assert_eq!(read_package_name(&path).unwrap(), "demo");
    }

    #[test]
    fn test_read_version_missing_field() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Cargo.toml");
        fs::write(&path, "[package]\nname = \"demo\"\n").unwrap();

        let err = read_version(&path).unwrap_err();
        assert!(matches!(err, ReleaseError::FieldNotFound(_)));
    }

    #[test]
    fn test_read_version_invalid_semver() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Cargo.toml");
        fs::write(&path, "[package]\nversion = \"one.two\"\n").unwrap();

        let err = read_version(&path).unwrap_err();
        assert!(matches!(err, ReleaseError::InvalidVersionFormat(_)));
    }

    #[test]
    fn test_rewrite_version_dry_run_leaves_file_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Cargo.toml");
        fs::write(&path, MANIFEST).unwrap();

        let previous = rewrite_version(&path, &Version::new(1, 3, 0), true).unwrap();
        assert_eq!(previous, "1.2.3");
        assert_eq!(fs::read_to_string(&path).unwrap(), MANIFEST);
    }

    #[test]
    fn test_rewrite_version_writes_new_value() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Cargo.toml");
        fs::write(&path, MANIFEST).unwrap();

        let previous = rewrite_version(&path, &Version::new(1, 3, 0), false).unwrap();
        assert_eq!(previous, "1.2.3");
        assert_eq!(read_version(&path).unwrap(), Version::new(1, 3, 0));
    }

    #[test]
    fn test_rewrite_version_noop_leaves_file_byte_identical() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Cargo.toml");
        fs::write(&path, MANIFEST).unwrap();

        let err = rewrite_version(&path, &Version::new(1, 2, 3), false).unwrap_err();
        assert!(matches!(err, ReleaseError::NoOpVersion { .. }));
        assert_eq!(fs::read_to_string(&path).unwrap(), MANIFEST);
    }
}
