use std::sync::Mutex;

use crate::error::{ReleaseError, Result};
use crate::git::Repository;

/// A git operation recorded by [MockRepository].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GitOp {
    CreateBranch(String),
    CommitAll(String),
    PushBranch { remote: String, branch: String },
    CreateTag { name: String, message: String },
    PushTag { remote: String, tag: String },
}

/// Mock repository for testing without actual git operations.
///
/// Records every mutating call so tests can assert on sequencing, and in
/// particular that dry-run workflows record nothing at all.
pub struct MockRepository {
    ops: Mutex<Vec<GitOp>>,
    fail_on_push: bool,
}

impl MockRepository {
    pub fn new() -> Self {
        MockRepository {
            ops: Mutex::new(Vec::new()),
            fail_on_push: false,
        }
    }

    /// Create a mock whose push operations fail.
    pub fn failing_push() -> Self {
        MockRepository {
            ops: Mutex::new(Vec::new()),
            fail_on_push: true,
        }
    }

    /// Snapshot of the recorded operations, in call order.
    pub fn operations(&self) -> Vec<GitOp> {
        self.ops.lock().expect("mock lock poisoned").clone()
    }

    fn record(&self, op: GitOp) {
        self.ops.lock().expect("mock lock poisoned").push(op);
    }
}

impl Default for MockRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl Repository for MockRepository {
    fn create_branch(&self, name: &str) -> Result<()> {
        self.record(GitOp::CreateBranch(name.to_string()));
        Ok(())
    }

    fn commit_all(&self, message: &str) -> Result<()> {
        self.record(GitOp::CommitAll(message.to_string()));
        Ok(())
    }

    fn push_branch(&self, remote: &str, branch: &str) -> Result<()> {
        if self.fail_on_push {
            return Err(ReleaseError::Git(git2::Error::from_str(
                "mock push failure",
            )));
        }
        self.record(GitOp::PushBranch {
            remote: remote.to_string(),
            branch: branch.to_string(),
        });
        Ok(())
    }

    fn create_tag(&self, name: &str, message: &str) -> Result<()> {
        self.record(GitOp::CreateTag {
            name: name.to_string(),
            message: message.to_string(),
        });
        Ok(())
    }

    fn push_tag(&self, remote: &str, tag: &str) -> Result<()> {
        if self.fail_on_push {
            return Err(ReleaseError::Git(git2::Error::from_str(
                "mock push failure",
            )));
        }
        self.record(GitOp::PushTag {
            remote: remote.to_string(),
            tag: tag.to_string(),
        });
        Ok(())
    }
}
