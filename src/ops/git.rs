#![allow(async_fn_in_trait)]

use std::path;

use anyhow::Context;
use anyhow::Result;
use anyhow::anyhow;
#[cfg(test)]
use mockall::automock;
use tokio::process::Command;
use tracing::instrument;

// -----------------------------------------------------------------------------
// GitOps trait

/// Operations the sync pipeline needs from git.
///
/// Every method returns the trimmed stdout of the underlying command on
/// success. On failure the error message is the command line followed by the
/// text git printed.
#[cfg_attr(test, automock)]
pub trait GitOps {
    /// Abbreviated name of the checked-out ref, e.g. `main` or `HEAD`.
    async fn current_branch(&self) -> Result<String>;
    /// Working tree status in porcelain v1 format. Empty when clean.
    async fn status_porcelain(&self) -> Result<String>;
    async fn stage_all(&self) -> Result<String>;
    async fn commit(&self, message: &str) -> Result<String>;
    async fn pull_rebase(&self, remote: &str, branch: &str) -> Result<String>;
    async fn push(&self, remote: &str, branch: &str) -> Result<String>;
}

// -----------------------------------------------------------------------------
// RealGit

/// Real implementation that calls the git CLI
pub struct RealGit {
    path: path::PathBuf,
}

impl RealGit {
    pub fn new(path: path::PathBuf) -> Self {
        Self { path }
    }

    /// Run git and return its trimmed stdout.
    async fn run(&self, args: &[&str]) -> Result<String> {
        Ok(self.run_untrimmed(args).await?.trim().to_string())
    }

    /// Run git and return its stdout as is. A non-zero exit becomes an error
    /// holding the command line and git's diagnostics.
    async fn run_untrimmed(&self, args: &[&str]) -> Result<String> {
        let output = Command::new("git")
            .current_dir(&self.path)
            .args(args)
            .output()
            .await
            .context("Failed to execute git command")?;

        if !output.status.success() {
            // `git commit` reports "nothing to commit" on stdout
            let stderr = String::from_utf8_lossy(&output.stderr);
            let details = if stderr.trim().is_empty() {
                String::from_utf8_lossy(&output.stdout)
            } else {
                stderr
            };
            return Err(anyhow!("git {}\n{}", args.join(" "), details.trim_end()));
        }

        Ok(String::from_utf8(output.stdout)?)
    }
}

impl GitOps for RealGit {
    #[instrument(skip_all)]
    async fn current_branch(&self) -> Result<String> {
        self.run(&["rev-parse", "--abbrev-ref", "HEAD"]).await
    }

    #[instrument(skip_all)]
    async fn status_porcelain(&self) -> Result<String> {
        // Only the end: trimming the start would eat the space of " M file"
        let porcelain = self.run_untrimmed(&["status", "--porcelain"]).await?;
        Ok(porcelain.trim_end().to_string())
    }

    #[instrument(skip_all)]
    async fn stage_all(&self) -> Result<String> {
        self.run(&["add", "."]).await
    }

    #[instrument(skip(self))]
    async fn commit(&self, message: &str) -> Result<String> {
        self.run(&["commit", "-m", message]).await
    }

    #[instrument(skip(self))]
    async fn pull_rebase(&self, remote: &str, branch: &str) -> Result<String> {
        self.run(&["pull", remote, branch, "--rebase"]).await
    }

    #[instrument(skip(self))]
    async fn push(&self, remote: &str, branch: &str) -> Result<String> {
        self.run(&["push", remote, branch]).await
    }
}
