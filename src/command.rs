//! Runner for opaque external commands.
//!
//! The release workflows shell out to a handful of tools they treat as
//! black boxes: the changelog generator, `cargo`, and the `gh` CLI. A
//! non-zero exit is fatal except through [run_permissive], which logs and
//! continues (used for pull-request creation, which is best-effort).

use std::path::Path;
use std::process::Command;

use crate::error::{ReleaseError, Result};
use crate::ui;

/// Execute an external command, failing on non-zero exit.
///
/// Captures stdout/stderr; on failure both are folded into the error so
/// the user sees what the tool printed.
///
/// # Arguments
/// * `program` - The executable to run
/// * `args` - Arguments passed verbatim
/// * `cwd` - Working directory for the child process
pub fn run(program: &str, args: &[&str], cwd: &Path) -> Result<()> {
    let rendered = render(program, args);

    let output = Command::new(program)
        .args(args)
        .current_dir(cwd)
        .output()
        .map_err(|e| ReleaseError::command(rendered.clone(), e.to_string()))?;

    if !output.status.success() {
        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(ReleaseError::command(
            rendered,
            format!(
                "exit code {}\nStdout: {}\nStderr: {}",
                output.status.code().unwrap_or(-1),
                stdout.trim(),
                stderr.trim()
            ),
        ));
    }

    Ok(())
}

/// Try to execute a command, logging errors but not failing.
///
/// # Returns
/// * `true` - The command succeeded
/// * `false` - It failed (a warning has been printed)
pub fn run_permissive(program: &str, args: &[&str], cwd: &Path) -> bool {
    match run(program, args, cwd) {
        Ok(()) => true,
        Err(e) => {
            ui::display_warning(&e.to_string());
            false
        }
    }
}

fn render(program: &str, args: &[&str]) -> String {
    if args.is_empty() {
        program.to_string()
    } else {
        format!("{} {}", program, args.join(" "))
    }
}
