use std::path;

use anyhow::Context;
use anyhow::Result;

use crate::pipeline::FailurePolicy;

pub const DEFAULT_REMOTE: &str = "origin";
pub const DEFAULT_BRANCH: &str = "main";
pub const DEFAULT_COMMIT_MESSAGE: &str = "Auto-commit from script";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Remote to pull from and push to.
    pub remote: String,
    /// Branch used when the current branch cannot be resolved.
    pub default_branch: String,
    /// Commit message used when none is given.
    pub default_message: String,
    pub on_failure: FailurePolicy,
    /// Exit non-zero when any step failed.
    pub strict: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            remote: DEFAULT_REMOTE.to_string(),
            default_branch: DEFAULT_BRANCH.to_string(),
            default_message: DEFAULT_COMMIT_MESSAGE.to_string(),
            on_failure: FailurePolicy::default(),
            strict: false,
        }
    }
}

impl Config {
    /// Load config from git config (`gsync.*` keys). Missing keys keep their
    /// defaults.
    pub fn load(path: &path::Path) -> Result<Self> {
        let mut config = Self::default();

        if let Some(remote) = read_git_config(path, "gsync.remote")? {
            config.remote = remote;
        }
        if let Some(branch) = read_git_config(path, "gsync.defaultBranch")? {
            config.default_branch = branch;
        }
        if let Some(message) = read_git_config(path, "gsync.defaultMessage")? {
            config.default_message = message;
        }
        if let Some(policy) = read_git_config(path, "gsync.onFailure")? {
            config.on_failure = policy
                .parse()
                .context("Invalid value for gsync.onFailure")?;
        }
        if let Some(strict) = read_git_config(path, "gsync.strict")? {
            config.strict = parse_bool(&strict)
                .with_context(|| format!("Invalid value for gsync.strict: {strict:?}"))?;
        }

        Ok(config)
    }

    /// Default config for tests
    pub fn default_for_tests() -> Self {
        Self::default()
    }
}

/// Git's boolean spellings.
fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Some(true),
        "false" | "no" | "off" | "0" => Some(false),
        _ => None,
    }
}

/// Read a single key. Returns `None` when the key is unset or empty.
fn read_git_config(path: &path::Path, key: &str) -> Result<Option<String>> {
    let output = std::process::Command::new("git")
        .current_dir(path)
        .args(["config", "--get", key])
        .output()
        .context("Failed to execute git command")?;

    // Exit code 1 means the key is not set
    if !output.status.success() {
        return Ok(None);
    }

    let value = String::from_utf8(output.stdout)?.trim().to_string();
    Ok((!value.is_empty()).then_some(value))
}
