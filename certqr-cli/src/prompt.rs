//! OK/Cancel confirmations and user notices

use anyhow::{Context, Result};
use colored::*;
use dialoguer::Confirm;
use is_terminal::IsTerminal;

/// User-facing dialog surface
pub trait Prompt: Send + Sync {
    /// Ask an OK/Cancel question; `Ok(true)` means OK
    fn confirm(&self, title: &str, message: &str) -> Result<bool>;

    /// Show an informational notice
    fn notify(&self, title: &str, message: &str);
}

/// Interactive terminal prompt. Cancel is the default answer.
pub struct TerminalPrompt;

impl Prompt for TerminalPrompt {
    fn confirm(&self, title: &str, message: &str) -> Result<bool> {
        if !std::io::stdin().is_terminal() {
            anyhow::bail!(
                "'{}' needs confirmation but stdin is not a terminal. Pass --yes to proceed without asking.",
                title
            );
        }

        println!("{}", title.bold());
        Confirm::new()
            .with_prompt(message)
            .default(false)
            .interact()
            .with_context(|| format!("Failed to read confirmation for '{}'", title))
    }

    fn notify(&self, title: &str, message: &str) {
        if message.is_empty() {
            println!("{}", title.bright_green().bold());
        } else {
            println!("{} {}", title.bright_green().bold(), message);
        }
    }
}

/// Answers OK to every confirmation (`--yes`)
pub struct AutoConfirm;

impl Prompt for AutoConfirm {
    fn confirm(&self, title: &str, _message: &str) -> Result<bool> {
        log::debug!("Auto-confirming '{}'", title);
        Ok(true)
    }

    fn notify(&self, title: &str, message: &str) {
        TerminalPrompt.notify(title, message);
    }
}

/// Pick the prompt for the `--yes` flag
pub fn prompt_for(assume_yes: bool) -> Box<dyn Prompt> {
    if assume_yes {
        Box::new(AutoConfirm)
    } else {
        Box::new(TerminalPrompt)
    }
}
