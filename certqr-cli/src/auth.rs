//! Session credential resolution

use anyhow::{Context, Result};
use is_terminal::IsTerminal;

use crate::config::GoogleConfig;

/// Find the OAuth access token for the current session.
///
/// Looks at the environment variable named by `google.token_env` first and falls back to
/// a hidden prompt when stdin is a terminal.
pub fn resolve_access_token(config: &GoogleConfig) -> Result<String> {
    resolve_with(config, |key| std::env::var(key).ok(), || {
        if !std::io::stdin().is_terminal() {
            return Ok(None);
        }
        let token = rpassword::prompt_password("Google OAuth access token: ")
            .context("Failed to read access token")?;
        Ok(Some(token))
    })
}

fn resolve_with(
    config: &GoogleConfig,
    lookup: impl Fn(&str) -> Option<String>,
    ask: impl FnOnce() -> Result<Option<String>>,
) -> Result<String> {
    if let Some(token) = lookup(&config.token_env).map(|t| t.trim().to_string()) {
        if !token.is_empty() {
            log::debug!("Using access token from ${}", config.token_env);
            return Ok(token);
        }
    }

    match ask()?.map(|t| t.trim().to_string()) {
        Some(token) if !token.is_empty() => Ok(token),
        _ => anyhow::bail!(
            "No access token available. Set {} (for example from `gcloud auth print-access-token`).",
            config.token_env
        ),
    }
}
