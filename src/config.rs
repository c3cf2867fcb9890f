use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{ReleaseError, Result};

/// Represents the complete configuration for release-prep.
///
/// Built once at process start and passed explicitly to every component;
/// no code below the CLI layer looks up the repository root or any other
/// ambient state on its own.
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Crate name used for registry lookups. Falls back to the manifest's
    /// `package.name` when not set.
    #[serde(default)]
    pub crate_name: Option<String>,

    #[serde(default = "default_manifest_path")]
    pub manifest_path: PathBuf,

    #[serde(default = "default_registry_url")]
    pub registry_url: String,

    #[serde(default = "default_remote")]
    pub remote: String,

    #[serde(default = "default_base_branch")]
    pub base_branch: String,

    /// Release branch name template; `{version}` is replaced with the
    /// resolved version.
    #[serde(default = "default_branch_template")]
    pub branch_template: String,

    #[serde(default)]
    pub changelog: ChangelogConfig,

    #[serde(default)]
    pub pull_request: PullRequestConfig,

    #[serde(default)]
    pub annotate: AnnotateConfig,
}

fn default_manifest_path() -> PathBuf {
    PathBuf::from("Cargo.toml")
}

fn default_registry_url() -> String {
    "https://crates.io".to_string()
}

fn default_remote() -> String {
    "origin".to_string()
}

fn default_base_branch() -> String {
    "main".to_string()
}

fn default_branch_template() -> String {
    "prepare-{version}-release".to_string()
}

/// Configuration for the changelog generation step.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ChangelogConfig {
    /// Command (program + args) that regenerates the release changelog.
    #[serde(default = "default_changelog_command")]
    pub command: Vec<String>,

    /// Directory holding un-released changelog fragments.
    #[serde(default = "default_changelog_dir")]
    pub dir: PathBuf,
}

fn default_changelog_command() -> Vec<String> {
    vec![
        "./scripts/generate_release_changelog.sh".to_string(),
        "--no-prompt".to_string(),
    ]
}

fn default_changelog_dir() -> PathBuf {
    PathBuf::from("changelog.d")
}

impl Default for ChangelogConfig {
    fn default() -> Self {
        ChangelogConfig {
            command: default_changelog_command(),
            dir: default_changelog_dir(),
        }
    }
}

/// Configuration for pull-request creation.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct PullRequestConfig {
    #[serde(default = "default_pr_labels")]
    pub labels: Vec<String>,
}

fn default_pr_labels() -> Vec<String> {
    vec!["no-changelog".to_string()]
}

impl Default for PullRequestConfig {
    fn default() -> Self {
        PullRequestConfig {
            labels: default_pr_labels(),
        }
    }
}

/// Configuration for the doc-driven source annotator.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct AnnotateConfig {
    /// Path to the JSON documentation export.
    #[serde(default = "default_docs_path")]
    pub docs_path: PathBuf,

    /// Source directory whose files carry the parameter records.
    #[serde(default = "default_source_dir")]
    pub source_dir: PathBuf,
}

fn default_docs_path() -> PathBuf {
    PathBuf::from("docs.json")
}

fn default_source_dir() -> PathBuf {
    PathBuf::from("src/stdlib")
}

impl Default for AnnotateConfig {
    fn default() -> Self {
        AnnotateConfig {
            docs_path: default_docs_path(),
            source_dir: default_source_dir(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            crate_name: None,
            manifest_path: default_manifest_path(),
            registry_url: default_registry_url(),
            remote: default_remote(),
            base_branch: default_base_branch(),
            branch_template: default_branch_template(),
            changelog: ChangelogConfig::default(),
            pull_request: PullRequestConfig::default(),
            annotate: AnnotateConfig::default(),
        }
    }
}

impl Config {
    /// Release branch name for a resolved version.
    pub fn branch_name(&self, version: &semver::Version) -> String {
        self.branch_template
            .replace("{version}", &version.to_string())
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `releaseprep.toml` in current directory
/// 3. `.releaseprep.toml` in the user config directory
/// 4. Default configuration if no file found
///
/// # Arguments
/// * `config_path` - Optional path to custom configuration file
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If a file exists but cannot be read or parsed
pub fn load_config(config_path: Option<&str>) -> Result<Config> {
    let config_str = if let Some(path) = config_path {
        fs::read_to_string(path)?
    } else if Path::new("./releaseprep.toml").exists() {
        fs::read_to_string("./releaseprep.toml")?
    } else if let Some(config_dir) = dirs::config_dir() {
        let config_path = config_dir.join(".releaseprep.toml");
        if config_path.exists() {
            fs::read_to_string(config_path)?
        } else {
            return Ok(Config::default());
        }
    } else {
        return Ok(Config::default());
    };

    toml::from_str(&config_str).map_err(|e| ReleaseError::config(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.manifest_path, PathBuf::from("Cargo.toml"));
        assert_eq!(config.registry_url, "https://crates.io");
        assert_eq!(config.remote, "origin");
        assert_eq!(config.base_branch, "main");
        assert!(config.crate_name.is_none());
    }

    #[test]
    fn test_branch_name_from_template() {
        let config = Config::default();
        let version = semver::Version::new(1, 3, 0);
        assert_eq!(config.branch_name(&version), "prepare-1.3.0-release");
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
            crate_name = "vrl"
            base_branch = "master"
            "#,
        )
        .unwrap();

        assert_eq!(config.crate_name.as_deref(), Some("vrl"));
        assert_eq!(config.base_branch, "master");
        assert_eq!(config.remote, "origin");
        assert_eq!(config.changelog, ChangelogConfig::default());
        assert_eq!(config.pull_request.labels, vec!["no-changelog"]);
    }

    #[test]
    fn test_nested_tables() {
        let config: Config = toml::from_str(
            r#"
            [changelog]
            command = ["make", "changelog"]

            [pull_request]
            labels = []

            [annotate]
            docs_path = "data/docs.json"
            "#,
        )
        .unwrap();

        assert_eq!(config.changelog.command, vec!["make", "changelog"]);
        assert_eq!(config.changelog.dir, PathBuf::from("changelog.d"));
        assert!(config.pull_request.labels.is_empty());
        assert_eq!(config.annotate.docs_path, PathBuf::from("data/docs.json"));
        assert_eq!(config.annotate.source_dir, PathBuf::from("src/stdlib"));
    }

    #[test]
    fn test_invalid_config_is_an_error() {
        assert!(toml::from_str::<Config>("crate_name = 42").is_err());
    }
}
