//! Git operations abstraction layer
//!
//! This module provides a trait-based abstraction over the git operations
//! the release workflows need, allowing for a real implementation backed
//! by the `git2` crate and a mock implementation for testing.
//!
//! The surface is deliberately small: the workflows only ever create a
//! branch, commit everything, and push. All history inspection stays with
//! the external tooling (changelog script, GitHub).

pub mod mock;
pub mod repository;

pub use mock::MockRepository;
pub use repository::Git2Repository;

use crate::error::Result;

/// Common git operation trait for abstraction
///
/// All implementors must be `Send`. Methods return
/// [crate::error::Result]; implementations map underlying failures (like
/// `git2::Error`) to [crate::error::ReleaseError] variants. Every failure
/// is fatal for the calling workflow.
pub trait Repository: Send {
    /// Create a branch at the current HEAD and check it out.
    ///
    /// # Arguments
    /// * `name` - Name for the new branch (e.g., "prepare-1.3.0-release")
    fn create_branch(&self, name: &str) -> Result<()>;

    /// Stage every working-tree change and commit with the given message.
    ///
    /// Equivalent to `git commit -a -m <message>` plus staging untracked
    /// files, using the repository's configured signature.
    fn commit_all(&self, message: &str) -> Result<()>;

    /// Push a branch to a remote, setting upstream.
    fn push_branch(&self, remote: &str, branch: &str) -> Result<()>;

    /// Create an annotated tag at HEAD.
    fn create_tag(&self, name: &str, message: &str) -> Result<()>;

    /// Push a tag to a remote.
    fn push_tag(&self, remote: &str, tag: &str) -> Result<()>;
}
