use anyhow::Context;
use anyhow::Result;
use colored::Colorize;
use tracing::instrument;

use crate::App;
use crate::app::report_failure;
use crate::ops::git::GitOps;
use crate::pipeline::FailurePolicy;
use crate::pipeline::Step;
use crate::pipeline::StepOutcome;
use crate::pipeline::SyncReport;
use crate::prompt::Prompt;
use crate::status::WorkingTreeStatus;

/// Per-run options for [`App::cmd_sync`].
#[derive(Debug, Clone, Default)]
pub struct SyncOptions {
    /// Commit message given up front. Skips the prompt.
    pub message: Option<String>,
    /// Whether an operator is available to answer the prompt.
    pub interactive: bool,
}

impl<G: GitOps> App<G> {
    /// Commit every local change and sync it with the remote branch.
    ///
    /// 1. Resolve the current branch (or the configured default).
    /// 2. Stop early if the working tree is clean.
    /// 3. Stage, commit, pull with rebase, push.
    ///
    /// Step failures are reported on `stdout` and recorded in the returned
    /// report. Whether later steps still run depends on the configured
    /// [`FailurePolicy`].
    #[instrument(skip_all)]
    pub async fn cmd_sync(
        &self,
        options: &SyncOptions,
        prompt: &impl Prompt,
        stdout: &mut impl std::io::Write,
    ) -> Result<SyncReport> {
        writeln!(stdout, "🚀 Git auto sync 🚀")?;

        let branch = self.resolve_branch(stdout).await;
        writeln!(stdout, "📌 Current branch: {}", branch)?;

        writeln!(stdout, "🔍 Checking git status...")?;
        let status = self.check_status().await?;
        if status.is_clean() {
            writeln!(stdout, "{}", "✅ No changes to commit. Exiting.".green())?;
            return Ok(SyncReport::Clean { branch });
        }
        writeln!(stdout, "📋 {} file(s) changed", status.len())?;

        let remote = &self.config.remote;
        let mut steps = Vec::with_capacity(Step::ALL.len());
        let mut halted = false;
        let mut message = None;

        for step in Step::ALL {
            if halted {
                writeln!(stdout, "⏭️ Skipping {} (an earlier step failed)", step)?;
                steps.push((step, StepOutcome::Skipped));
                continue;
            }

            let result = match step {
                Step::Stage => {
                    writeln!(stdout, "📂 Staging all changes...")?;
                    self.git.stage_all().await
                }
                Step::Commit => {
                    let message = message.insert(self.resolve_message(options, prompt)?);
                    writeln!(stdout, "💾 Committing changes with message: {}", message)?;
                    self.git.commit(message).await
                }
                Step::Pull => {
                    writeln!(
                        stdout,
                        "🔄 Pulling latest changes from {}/{}...",
                        remote, branch
                    )?;
                    self.git.pull_rebase(remote, &branch).await
                }
                Step::Push => {
                    writeln!(stdout, "🚀 Pushing changes to {} ({})...", remote, branch)?;
                    self.git.push(remote, &branch).await
                }
            };

            let outcome = match result {
                Ok(_) => StepOutcome::Succeeded,
                Err(e) => {
                    report_failure(stdout, &e);
                    StepOutcome::Failed(format!("{e:#}"))
                }
            };
            if outcome.is_failed() && self.config.on_failure == FailurePolicy::Halt {
                halted = true;
            }
            steps.push((step, outcome));
        }

        let report = SyncReport::Synced {
            branch,
            message,
            steps,
        };

        writeln!(stdout)?;
        let failed = report.failed_steps();
        if !failed.is_empty() {
            let failed: Vec<String> = failed.iter().map(|step| step.to_string()).collect();
            let summary = format!("⚠️ Failed steps: {}", failed.join(", "));
            writeln!(stdout, "{}", summary.yellow())?;
        }
        // Always printed, even after failed steps
        let banner = format!(
            "✅ All changes have been pushed to {}/{}! 🎉",
            remote,
            report.branch()
        );
        writeln!(stdout, "{}", banner.green().bold())?;

        Ok(report)
    }

    pub(crate) async fn check_status(&self) -> Result<WorkingTreeStatus> {
        let porcelain = self
            .git
            .status_porcelain()
            .await
            .context("Failed to query working tree status")?;
        WorkingTreeStatus::parse(&porcelain)
    }

    /// Flag first, then the prompt when attended. Empty input means the
    /// default message; anything else is used verbatim.
    fn resolve_message(&self, options: &SyncOptions, prompt: &impl Prompt) -> Result<String> {
        let entered = match &options.message {
            Some(message) => message.clone(),
            None if options.interactive => prompt.commit_message()?,
            None => String::new(),
        };

        if entered.is_empty() {
            Ok(self.config.default_message.clone())
        } else {
            Ok(entered)
        }
    }
}
