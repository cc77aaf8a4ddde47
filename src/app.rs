use colored::Colorize;
use log::warn;

use crate::config::Config;
use crate::ops::git::GitOps;

pub struct App<G: GitOps> {
    pub config: Config,
    pub git: G,
}

impl<G: GitOps> App<G> {
    pub fn new(config: Config, git: G) -> Self {
        Self { config, git }
    }
}

/// Shared helper methods for App
impl<G: GitOps> App<G> {
    /// Resolve the checked-out branch, falling back to the configured default.
    ///
    /// Never returns an empty string.
    pub(crate) async fn resolve_branch(&self, stdout: &mut impl std::io::Write) -> String {
        match self.git.current_branch().await {
            Ok(branch) if !branch.is_empty() => {
                if branch == "HEAD" {
                    warn!("HEAD is detached; pull and push will target \"HEAD\"");
                }
                branch
            }
            Ok(_) => {
                warn!(
                    "Current branch name is empty, using {}",
                    self.config.default_branch
                );
                self.config.default_branch.clone()
            }
            Err(e) => {
                report_failure(stdout, &e);
                warn!(
                    "Could not resolve current branch, using {}",
                    self.config.default_branch
                );
                self.config.default_branch.clone()
            }
        }
    }
}

/// Print a failed git command and its output for the operator.
pub(crate) fn report_failure(stdout: &mut impl std::io::Write, error: &anyhow::Error) {
    let line = format!("❌ Error running command: {error:#}");
    // Best effort
    let _ = writeln!(stdout, "{}", line.red());
}
