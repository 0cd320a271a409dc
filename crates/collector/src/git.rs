use std::path::{Path, PathBuf};
use tokio::time::{timeout, Duration};

use crate::RepoProbe;

// Commit lookup must be cheap and bounded: a save should never stall
// because git is slow or absent.
const GIT_HEAD_TIMEOUT: Duration = Duration::from_millis(1_000);

/// Asks `git` for the short HEAD hash of the repository enclosing a
/// directory. Every failure mode (no git binary, not a repository,
/// timeout, empty output) degrades to `None`.
pub struct GitRepoProbe {
    workdir: PathBuf,
}

impl GitRepoProbe {
    pub fn new(workdir: impl AsRef<Path>) -> Self {
        Self {
            workdir: workdir.as_ref().to_path_buf(),
        }
    }
}

impl Default for GitRepoProbe {
    fn default() -> Self {
        Self::new(".")
    }
}

#[async_trait::async_trait]
impl RepoProbe for GitRepoProbe {
    async fn commit_hash(&self) -> Option<String> {
        let output = timeout(
            GIT_HEAD_TIMEOUT,
            tokio::process::Command::new("git")
                .arg("-C")
                .arg(&self.workdir)
                .arg("rev-parse")
                .arg("--short")
                .arg("HEAD")
                .output(),
        )
        .await
        .ok()?
        .ok()?;
        if !output.status.success() {
            log::debug!("git rev-parse failed in {}", self.workdir.display());
            return None;
        }
        let hash = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if hash.is_empty() {
            return None;
        }
        Some(hash)
    }
}
