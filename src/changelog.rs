//! Changelog generation step and publish-time preconditions.
//!
//! Generation is delegated to an external script configured in
//! `[changelog]`; this module runs it, commits the result, and checks the
//! fragment directory before publishing.

use std::fs;
use std::path::Path;

use crate::command;
use crate::config::ChangelogConfig;
use crate::error::{ReleaseError, Result};
use crate::git::Repository;
use crate::ui;

const CHANGELOG_COMMIT_MESSAGE: &str = "chore(releasing): generate changelog";

/// Run the changelog generator and commit its output.
///
/// In dry-run mode nothing is executed; the planned actions are printed.
///
/// # Arguments
/// * `changelog` - Changelog configuration (command + fragment dir)
/// * `repo` - Repository used for the follow-up commit
/// * `repo_root` - Working directory for the generator
/// * `dry_run` - When true, print instead of executing
pub fn generate(
    changelog: &ChangelogConfig,
    repo: &dyn Repository,
    repo_root: &Path,
    dry_run: bool,
) -> Result<()> {
    let (program, args) = split_command(&changelog.command)?;

    if dry_run {
        ui::display_planned(&format!("run `{}`", changelog.command.join(" ")));
        ui::display_planned(&format!("commit \"{}\"", CHANGELOG_COMMIT_MESSAGE));
        return Ok(());
    }

    ui::display_status("Generating changelog...");
    command::run(program, &args, repo_root)?;
    repo.commit_all(CHANGELOG_COMMIT_MESSAGE)?;
    ui::display_success("Changelog generated and committed");
    Ok(())
}

/// Publish-time precondition: the fragment directory must hold only its
/// README, i.e. every fragment was folded into the changelog already.
pub fn assert_no_fragments(changelog_dir: &Path) -> Result<()> {
    let mut entries = Vec::new();
    for entry in fs::read_dir(changelog_dir)? {
        entries.push(entry?.file_name().to_string_lossy().into_owned());
    }

    let only_readme = entries.len() == 1 && entries[0] == "README.md";
    if !only_readme {
        return Err(ReleaseError::config(format!(
            "{} should only contain a README.md file. Did you run the changelog generator?",
            changelog_dir.display()
        )));
    }

    Ok(())
}

fn split_command(command: &[String]) -> Result<(&str, Vec<&str>)> {
    let (program, args) = command
        .split_first()
        .ok_or_else(|| ReleaseError::config("changelog command is empty"))?;
    Ok((program.as_str(), args.iter().map(String::as_str).collect()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::MockRepository;
    use std::path::PathBuf;

    fn config(command: &[&str]) -> ChangelogConfig {
        ChangelogConfig {
            command: command.iter().map(|s| s.to_string()).collect(),
            dir: PathBuf::from("changelog.d"),
        }
    }

    #[test]
    fn test_generate_commits_after_command() {
        let repo = MockRepository::new();
        generate(&config(&["true"]), &repo, Path::new("."), false).unwrap();

        let ops = repo.operations();
        assert_eq!(ops.len(), 1);
        assert_eq!(
            ops[0],
            crate::git::mock::GitOp::CommitAll(CHANGELOG_COMMIT_MESSAGE.to_string())
        );
    }

    #[test]
    fn test_generate_failing_command_aborts_before_commit() {
        let repo = MockRepository::new();
        let err = generate(&config(&["false"]), &repo, Path::new("."), false).unwrap_err();
        assert!(matches!(err, ReleaseError::ExternalCommand { .. }));
        assert!(repo.operations().is_empty());
    }

    #[test]
    fn test_generate_dry_run_executes_nothing() {
        let repo = MockRepository::new();
        // The command would fail if actually executed
        generate(&config(&["false"]), &repo, Path::new("."), true).unwrap();
        assert!(repo.operations().is_empty());
    }

    #[test]
    fn test_generate_empty_command_is_config_error() {
        let repo = MockRepository::new();
        let err = generate(&config(&[]), &repo, Path::new("."), false).unwrap_err();
        assert!(matches!(err, ReleaseError::Config(_)));
    }

    #[test]
    fn test_assert_no_fragments_accepts_readme_only() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("README.md"), "fragments go here\n").unwrap();
        assert!(assert_no_fragments(dir.path()).is_ok());
    }

    #[test]
    fn test_assert_no_fragments_rejects_leftovers() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("README.md"), "fragments go here\n").unwrap();
        fs::write(dir.path().join("123.fix.md"), "a fix\n").unwrap();

        let err = assert_no_fragments(dir.path()).unwrap_err();
        assert!(err.to_string().contains("README.md"));
    }

    #[test]
    fn test_assert_no_fragments_rejects_empty_dir() {
        let dir = tempfile::tempdir().unwrap();
        assert!(assert_no_fragments(dir.path()).is_err());
    }
}
