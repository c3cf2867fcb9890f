//! Release workflow drivers.
//!
//! Two linear sequences, mirroring the two halves of a release:
//!
//! - `prepare`: branch, bump the manifest version, regenerate the
//!   changelog, push, open a pull request.
//! - `publish`: verify preconditions, `cargo publish`, tag, push the tag.
//!
//! Each step's failure aborts the remaining sequence; nothing already
//! completed is rolled back (a pushed branch stays pushed). To keep that
//! exposure small, every read-only check (version validity, no-op guard,
//! published-version guard) runs before the first mutation - in dry-run
//! mode too, since they have no side effects.

use std::path::{Path, PathBuf};

use semver::Version;

use crate::changelog;
use crate::command;
use crate::config::Config;
use crate::error::Result;
use crate::git::Repository;
use crate::manifest;
use crate::pull_request::{self, PullRequest};
use crate::registry::{assert_not_published, Registry};
use crate::ui;
use crate::version::VersionDirective;

/// Arguments for the prepare workflow.
///
/// Mirrors the CLI args but in a format suitable for orchestration logic,
/// so the workflow can be called programmatically without depending on clap.
#[derive(Debug, Clone, PartialEq)]
pub struct PrepareArgs {
    /// Raw version directive: exact semver or major/minor/patch
    pub directive: String,

    /// Preview mode - no file, git, or remote mutation at all
    pub dry_run: bool,

    /// Optional issue link appended to the PR body
    pub issue_url: Option<String>,
}

/// Result of a successful prepare workflow.
#[derive(Debug, Clone, PartialEq)]
pub struct PrepareOutcome {
    pub previous_version: String,
    pub new_version: Version,
    pub branch: String,
}

fn version_commit_message(previous: &str, new: &Version) -> String {
    format!("chore(deps): change version from {} with {}", previous, new)
}

fn repo_root(config: &Config) -> PathBuf {
    config
        .manifest_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."))
}

fn crate_name(config: &Config) -> Result<String> {
    match &config.crate_name {
        Some(name) => Ok(name.clone()),
        None => manifest::read_package_name(&config.manifest_path),
    }
}

/// Run the release-preparation workflow.
///
/// Sequence: resolve directive → published-version guard → no-op guard →
/// branch creation → manifest rewrite + commit → changelog + commit →
/// push → pull request (best-effort).
///
/// # Arguments
/// * `config` - Explicit configuration, constructed at process start
/// * `repo` - Git repository abstraction
/// * `registry` - Package registry for the published-version guard
/// * `args` - Directive, dry-run flag, issue link
pub fn run_prepare(
    config: &Config,
    repo: &dyn Repository,
    registry: &dyn Registry,
    args: &PrepareArgs,
) -> Result<PrepareOutcome> {
    let root = repo_root(config);
    let crate_name = crate_name(config)?;

    let directive = VersionDirective::parse(&args.directive)?;
    let new_version = directive.resolve(|| manifest::read_version(&config.manifest_path))?;

    // Read-only guards, before any mutation. The rewrite in validation
    // mode surfaces NoOpVersion and FieldNotFound without writing.
    assert_not_published(registry, &crate_name, &new_version)?;
    let previous_version = manifest::rewrite_version(&config.manifest_path, &new_version, true)?;

    ui::display_version_change(&previous_version, &new_version.to_string());

    let branch = config.branch_name(&new_version);
    let commit_message = version_commit_message(&previous_version, &new_version);

    if args.dry_run {
        ui::display_planned(&format!("create branch {}", branch));
        ui::display_planned(&format!(
            "rewrite {} to version {}",
            config.manifest_path.display(),
            new_version
        ));
        ui::display_planned(&format!("commit \"{}\"", commit_message));
    } else {
        ui::display_status(&format!("Creating branch: {}", branch));
        repo.create_branch(&branch)?;

        manifest::rewrite_version(&config.manifest_path, &new_version, false)?;
        sync_lockfile(&crate_name, &root)?;
        repo.commit_all(&commit_message)?;
        ui::display_success(&commit_message);
    }

    changelog::generate(&config.changelog, repo, &root, args.dry_run)?;

    if args.dry_run {
        ui::display_planned(&format!("push {} to {}", branch, config.remote));
    } else {
        ui::display_status(&format!("Pushing branch: {} to {}", branch, config.remote));
        repo.push_branch(&config.remote, &branch)?;
    }

    let pr = PullRequest::for_release(
        &new_version,
        &branch,
        &config.base_branch,
        args.issue_url.as_deref(),
        &config.pull_request,
    );
    pull_request::create(&pr, &root, args.dry_run);

    if args.dry_run {
        ui::display_success("Dry-run completed. No actual changes were made.");
    }

    Ok(PrepareOutcome {
        previous_version,
        new_version,
        branch,
    })
}

/// Keep Cargo.lock in step with the rewritten manifest version.
///
/// Skipped when the repository has no lockfile (library-only setups).
fn sync_lockfile(crate_name: &str, root: &Path) -> Result<()> {
    if !root.join("Cargo.lock").exists() {
        return Ok(());
    }
    command::run("cargo", &["update", "-p", crate_name], root)?;
    Ok(())
}

/// Run the publish workflow.
///
/// Sequence: changelog-fragment precondition → read manifest version →
/// published-version guard → `cargo publish` → annotated tag → push tag.
pub fn run_publish(
    config: &Config,
    repo: &dyn Repository,
    registry: &dyn Registry,
    dry_run: bool,
) -> Result<Version> {
    let root = repo_root(config);
    let crate_name = crate_name(config)?;

    changelog::assert_no_fragments(&root.join(&config.changelog.dir))?;

    let version = manifest::read_version(&config.manifest_path)?;
    ui::display_status(&format!("Current version in manifest: {}", version));

    assert_not_published(registry, &crate_name, &version)?;

    let tag_name = format!("v{}", version);
    let tag_message = format!("Release {}", version);

    if dry_run {
        ui::display_planned("run `cargo publish`");
        ui::display_planned(&format!("create tag {}", tag_name));
        ui::display_planned(&format!("push {} to {}", tag_name, config.remote));
        ui::display_success("Dry-run completed. No actual changes were made.");
        return Ok(version);
    }

    command::run("cargo", &["publish"], &root)?;
    ui::display_success(&format!("Published {} v{}", crate_name, version));

    repo.create_tag(&tag_name, &tag_message)?;
    repo.push_tag(&config.remote, &tag_name)?;
    ui::display_success(&format!("Tagged and pushed {}", tag_name));

    Ok(version)
}
