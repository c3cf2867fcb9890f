//! Pull-request creation through the `gh` CLI.
//!
//! Creation is best-effort: the branch and commits are already pushed by
//! the time this runs, so a `gh` failure is reported as a warning and the
//! workflow still succeeds. The user can open the PR by hand.

use std::path::Path;

use semver::Version;

use crate::command;
use crate::config::PullRequestConfig;
use crate::ui;

/// Inputs for a release pull request.
#[derive(Debug, Clone, PartialEq)]
pub struct PullRequest {
    pub title: String,
    pub body: String,
    pub head: String,
    pub base: String,
    pub labels: Vec<String>,
}

impl PullRequest {
    /// Build the release PR for a prepared version.
    ///
    /// # Arguments
    /// * `version` - The resolved release version
    /// * `head` - Source branch (the release branch)
    /// * `base` - Target branch
    /// * `issue_url` - Optional issue link appended to the body
    /// * `config` - PR configuration (labels)
    pub fn for_release(
        version: &Version,
        head: &str,
        base: &str,
        issue_url: Option<&str>,
        config: &PullRequestConfig,
    ) -> Self {
        let mut body = format!("Prepares the {} release.", version);
        if let Some(url) = issue_url {
            body.push_str(&format!("\n\nRef: {}", url));
        }

        PullRequest {
            title: format!("chore(releasing): Prepare {} release", version),
            body,
            head: head.to_string(),
            base: base.to_string(),
            labels: config.labels.clone(),
        }
    }

    fn gh_args(&self) -> Vec<&str> {
        let mut args = vec![
            "pr",
            "create",
            "--title",
            &self.title,
            "--body",
            &self.body,
            "--head",
            &self.head,
            "--base",
            &self.base,
        ];
        for label in &self.labels {
            args.push("--label");
            args.push(label);
        }
        args
    }
}

/// Create the pull request, best-effort.
///
/// In dry-run mode the creation is skipped and the planned call printed.
///
/// # Returns
/// * `true` - PR created (or dry-run)
/// * `false` - `gh` failed; a warning was printed and the caller proceeds
pub fn create(pr: &PullRequest, repo_root: &Path, dry_run: bool) -> bool {
    ui::display_status(&format!("Creating pull request with title: {}", pr.title));

    if dry_run {
        ui::display_planned(&format!(
            "gh pr create --head {} --base {}",
            pr.head, pr.base
        ));
        return true;
    }

    command::run_permissive("gh", &pr.gh_args(), repo_root)
}
