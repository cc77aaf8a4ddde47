use std::fmt::Display;
use std::str::FromStr;

use anyhow::bail;

/// A mutating step of the sync pipeline, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Stage,
    Commit,
    Pull,
    Push,
}

impl Step {
    pub const ALL: [Step; 4] = [Step::Stage, Step::Commit, Step::Pull, Step::Push];
}

impl Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Stage => f.write_str("stage"),
            Self::Commit => f.write_str("commit"),
            Self::Pull => f.write_str("pull"),
            Self::Push => f.write_str("push"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    Succeeded,
    /// The command ran and exited non-zero, or could not be spawned.
    Failed(String),
    /// Not attempted because an earlier step failed under [`FailurePolicy::Halt`].
    Skipped,
}

impl StepOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

/// What to do with the remaining steps after one fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Run every step regardless of earlier failures.
    #[default]
    Continue,
    /// Skip every step after the first failure.
    Halt,
}

impl FromStr for FailurePolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "continue" => Ok(Self::Continue),
            "halt" => Ok(Self::Halt),
            other => bail!("Unknown failure policy {other:?}, expected \"continue\" or \"halt\""),
        }
    }
}

impl Display for FailurePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Continue => f.write_str("continue"),
            Self::Halt => f.write_str("halt"),
        }
    }
}

/// Result of one `gsync` run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncReport {
    /// The working tree had no changes, so nothing was run.
    Clean { branch: String },
    Synced {
        branch: String,
        /// `None` when the commit step never ran.
        message: Option<String>,
        steps: Vec<(Step, StepOutcome)>,
    },
}

impl SyncReport {
    pub fn branch(&self) -> &str {
        match self {
            Self::Clean { branch } | Self::Synced { branch, .. } => branch,
        }
    }

    pub fn outcome(&self, step: Step) -> Option<&StepOutcome> {
        match self {
            Self::Clean { .. } => None,
            Self::Synced { steps, .. } => steps
                .iter()
                .find(|(s, _)| *s == step)
                .map(|(_, outcome)| outcome),
        }
    }

    pub fn failed_steps(&self) -> Vec<Step> {
        match self {
            Self::Clean { .. } => vec![],
            Self::Synced { steps, .. } => steps
                .iter()
                .filter(|(_, outcome)| outcome.is_failed())
                .map(|(step, _)| *step)
                .collect(),
        }
    }

    /// Whether the process should exit non-zero. Step failures only count
    /// when `strict` is set.
    pub fn exit_failure(&self, strict: bool) -> bool {
        strict && !self.all_succeeded()
    }

    pub fn all_succeeded(&self) -> bool {
        match self {
            Self::Clean { .. } => true,
            Self::Synced { steps, .. } => steps
                .iter()
                .all(|(_, outcome)| *outcome == StepOutcome::Succeeded),
        }
    }
}
