use std::path::Path;

use git2::{PushOptions, RemoteCallbacks, Signature};

use crate::error::{ReleaseError, Result};
use crate::git::Repository as RepositoryTrait;

/// Real implementation of [crate::git::Repository] using the `git2` crate.
pub struct Git2Repository {
    repo: git2::Repository,
}

impl Git2Repository {
    /// Discover the git repository containing `path`.
    ///
    /// # Returns
    /// * `Ok(Git2Repository)` - Successfully initialized repository wrapper
    /// * `Err` - If the path is not inside a git repository
    pub fn discover(path: &Path) -> Result<Self> {
        let repo = git2::Repository::discover(path)?;
        Ok(Git2Repository { repo })
    }

    fn head_commit(&self) -> Result<git2::Commit<'_>> {
        Ok(self.repo.head()?.peel_to_commit()?)
    }

    fn signature(&self) -> Result<Signature<'static>> {
        Ok(self.repo.signature()?)
    }

    /// Push refspecs to a remote with SSH credential handling.
    fn push_refspecs(&self, remote_name: &str, refspecs: &[&str]) -> Result<()> {
        let mut remote = self.repo.find_remote(remote_name).map_err(|_| {
            ReleaseError::Git(git2::Error::from_str(&format!(
                "No remote named '{}' found",
                remote_name
            )))
        })?;

        let mut push_options = PushOptions::new();
        let mut callbacks = RemoteCallbacks::new();
        callbacks.credentials(|_url, username_from_url, allowed_types| {
            // SSH key authentication, trying common key files first
            if allowed_types.contains(git2::CredentialType::SSH_KEY) {
                let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
                let key_paths = vec![
                    format!("{}/.ssh/id_ed25519", home),
                    format!("{}/.ssh/id_rsa", home),
                    format!("{}/.ssh/id_ecdsa", home),
                ];

                for key_path in key_paths {
                    let path = std::path::Path::new(&key_path);
                    if path.exists() {
                        if let Ok(cred) = git2::Cred::ssh_key(
                            username_from_url.unwrap_or("git"),
                            None,
                            path,
                            None,
                        ) {
                            return Ok(cred);
                        }
                    }
                }

                // Try SSH agent as fallback
                if let Ok(cred) = git2::Cred::ssh_key_from_agent(username_from_url.unwrap_or("git"))
                {
                    return Ok(cred);
                }
            }

            git2::Cred::default()
        });

        // Catch per-reference rejections during push
        callbacks.push_update_reference(|refname, status| {
            if let Some(status) = status {
                Err(git2::Error::from_str(&format!(
                    "Push failed for {}: {}",
                    refname, status
                )))
            } else {
                Ok(())
            }
        });

        push_options.remote_callbacks(callbacks);
        remote.push(refspecs, Some(&mut push_options))?;
        Ok(())
    }
}

impl RepositoryTrait for Git2Repository {
    fn create_branch(&self, name: &str) -> Result<()> {
        let head = self.head_commit()?;
        self.repo.branch(name, &head, false)?;
        self.repo.set_head(&format!("refs/heads/{}", name))?;
        self.repo
            .checkout_head(Some(git2::build::CheckoutBuilder::new().safe()))?;
        Ok(())
    }

    fn commit_all(&self, message: &str) -> Result<()> {
        let mut index = self.repo.index()?;
        index.add_all(["*"].iter(), git2::IndexAddOption::DEFAULT, None)?;
        index.write()?;

        let tree_id = index.write_tree()?;
        let tree = self.repo.find_tree(tree_id)?;
        let signature = self.signature()?;
        let parent = self.head_commit()?;

        self.repo.commit(
            Some("HEAD"),
            &signature,
            &signature,
            message,
            &tree,
            &[&parent],
        )?;
        Ok(())
    }

    fn push_branch(&self, remote: &str, branch: &str) -> Result<()> {
        let refspec = format!("refs/heads/{0}:refs/heads/{0}", branch);
        self.push_refspecs(remote, &[&refspec])?;

        // Track the remote branch so later plain pushes work
        let mut local = self.repo.find_branch(branch, git2::BranchType::Local)?;
        local.set_upstream(Some(&format!("{}/{}", remote, branch)))?;
        Ok(())
    }

    fn create_tag(&self, name: &str, message: &str) -> Result<()> {
        let head = self.head_commit()?;
        let signature = self.signature()?;
        self.repo
            .tag(name, head.as_object(), &signature, message, false)?;
        Ok(())
    }

    fn push_tag(&self, remote: &str, tag: &str) -> Result<()> {
        let refspec = format!("refs/tags/{0}:refs/tags/{0}", tag);
        self.push_refspecs(remote, &[&refspec])
    }
}
