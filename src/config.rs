//! Session configuration

use crate::error::{Error, Result};
use std::env;

/// Environment variable holding a pre-supplied password.
pub const PASSWORD_ENV: &str = "IMAP_PASSWORD";

/// Everything needed to open one IMAP session.
///
/// Built once at startup and passed by reference into the workflow.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub username: String,
    pub host: String,
    pub port: u16,
    /// Mailbox the user expects to clean. Only highlighted in the
    /// listing, never selected automatically.
    pub mailbox_hint: Option<String>,
    /// Skip TLS certificate verification.
    pub insecure: bool,
    /// Password supplied out of band. When `None` the user is prompted.
    pub password: Option<String>,
}

impl SessionConfig {
    /// Build a configuration from command-line values.
    ///
    /// The password is taken from `IMAP_PASSWORD` if set, reading a
    /// `.env` file first when present.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if a required value is empty.
    pub fn new(
        username: impl Into<String>,
        host: impl Into<String>,
        port: u16,
    ) -> Result<Self> {
        let username = username.into();
        let host = host.into();

        if username.trim().is_empty() {
            return Err(Error::Config("username must not be empty".into()));
        }
        if host.trim().is_empty() {
            return Err(Error::Config("server host must not be empty".into()));
        }
        if port == 0 {
            return Err(Error::Config("port must be non-zero".into()));
        }

        Ok(Self {
            username,
            host,
            port,
            mailbox_hint: None,
            insecure: false,
            password: None,
        })
    }

    #[must_use]
    pub fn with_mailbox_hint(mut self, hint: Option<String>) -> Self {
        self.mailbox_hint = hint.filter(|h| !h.is_empty());
        self
    }

    #[must_use]
    pub const fn with_insecure(mut self, insecure: bool) -> Self {
        self.insecure = insecure;
        self
    }

    #[must_use]
    pub fn with_password(mut self, password: Option<String>) -> Self {
        self.password = password;
        self
    }

    /// Pick up `IMAP_PASSWORD` from the environment or `.env`.
    #[must_use]
    pub fn with_env_password(self) -> Self {
        dotenvy::dotenv().ok();
        let password = env::var(PASSWORD_ENV).ok().filter(|p| !p.is_empty());
        self.with_password(password)
    }

    /// `host:port` as dialled.
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
