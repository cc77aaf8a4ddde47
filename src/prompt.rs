use anyhow::Result;
use dialoguer::Input;
#[cfg(test)]
use mockall::automock;

/// Source of operator input during a sync.
#[cfg_attr(test, automock)]
pub trait Prompt {
    /// Ask for a commit message. An empty answer means "use the default".
    fn commit_message(&self) -> Result<String>;
}

/// Interactive prompt on the controlling terminal.
pub struct TerminalPrompt;

impl Prompt for TerminalPrompt {
    fn commit_message(&self) -> Result<String> {
        let message: String = Input::new()
            .with_prompt("📝 Enter commit message (or press Enter for default)")
            .allow_empty(true)
            .interact_text()?;
        Ok(message)
    }
}
