//! Pure formatting functions for CLI output.
//!
//! All user-facing narration goes through these helpers so the workflow
//! code stays free of escape codes.

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("\x1b[31mERROR:\x1b[0m {}", message);
}

/// Format and print a warning in yellow.
pub fn display_warning(message: &str) {
    eprintln!("\x1b[33m⚠ WARNING:\x1b[0m {}", message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    println!("\x1b[32m✓\x1b[0m {}", message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    println!("\x1b[33m→\x1b[0m {}", message);
}

/// Print a dry-run action that would have been taken.
pub fn display_planned(action: &str) {
    println!("\x1b[36m[dry-run]\x1b[0m would {}", action);
}

/// Display the version change a release prepares.
pub fn display_version_change(previous: &str, new: &str) {
    println!("\n\x1b[1mVersion Change:\x1b[0m");
    println!("  From: \x1b[31m{}\x1b[0m", previous);
    println!("  To:   \x1b[32m{}\x1b[0m", new);
}
