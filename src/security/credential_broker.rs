//! Registry credential acquisition
//!
//! Credentials are either pre-supplied on the publish request or read from
//! the terminal on demand. The password is wrapped with the `secrecy` crate
//! to prevent accidental exposure in logs, and is never persisted.

use async_trait::async_trait;
use secrecy::SecretString;
use std::io;
use std::sync::Arc;

/// Registry credentials owned by a single publish attempt
#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: SecretString,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: SecretString::new(password.into().into()),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Terminal input boundary
///
/// Hidden prompts must not echo what is typed.
pub trait PromptSource: Send + Sync {
    fn prompt_visible(&self, label: &str) -> io::Result<String>;
    fn prompt_hidden(&self, label: &str) -> io::Result<String>;
}

/// Interactive terminal prompt backed by dialoguer
#[derive(Debug, Default)]
pub struct TerminalPrompt;

impl PromptSource for TerminalPrompt {
    fn prompt_visible(&self, label: &str) -> io::Result<String> {
        dialoguer::Input::<String>::new()
            .with_prompt(label)
            .interact_text()
            .map_err(io::Error::other)
    }

    fn prompt_hidden(&self, label: &str) -> io::Result<String> {
        dialoguer::Password::new()
            .with_prompt(label)
            .interact()
            .map_err(io::Error::other)
    }
}

/// Supplies registry credentials for one publish attempt
#[async_trait]
pub trait CredentialBroker: Send + Sync {
    /// Return pre-supplied credentials as-is, or acquire a pair interactively
    ///
    /// The interactive path blocks on terminal input and has no timeout;
    /// cancellation is only via process-level interruption.
    async fn resolve(&self, pre_supplied: Option<Credentials>) -> anyhow::Result<Credentials>;
}

/// Broker prompting for username (visible) then password (hidden)
pub struct InteractiveBroker {
    prompt: Arc<dyn PromptSource>,
}

impl InteractiveBroker {
    pub fn new(prompt: Arc<dyn PromptSource>) -> Self {
        Self { prompt }
    }
}

impl Default for InteractiveBroker {
    fn default() -> Self {
        Self::new(Arc::new(TerminalPrompt))
    }
}

#[async_trait]
impl CredentialBroker for InteractiveBroker {
    async fn resolve(&self, pre_supplied: Option<Credentials>) -> anyhow::Result<Credentials> {
        if let Some(credentials) = pre_supplied {
            return Ok(credentials);
        }

        let prompt = Arc::clone(&self.prompt);
        let credentials = tokio::task::spawn_blocking(move || -> io::Result<Credentials> {
            let username = prompt.prompt_visible("username")?;
            let password = prompt.prompt_hidden("password")?;
            Ok(Credentials::new(username, password))
        })
        .await??;

        Ok(credentials)
    }
}
