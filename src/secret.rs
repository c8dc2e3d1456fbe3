//! Password input

use crate::error::Result;

/// Source of the account password.
pub trait SecretReader {
    /// Read the secret once.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Io`] if the terminal cannot be switched
    /// to hidden input or the read fails.
    fn read_secret(&mut self) -> Result<String>;
}

/// Where the password comes from.
#[derive(Clone)]
pub enum PasswordSource {
    /// Read from the controlling terminal with echo disabled. The
    /// terminal mode is restored before returning, on success or error.
    Terminal,
    /// Supplied up front, e.g. through `IMAP_PASSWORD`.
    Fixed(String),
}

impl PasswordSource {
    #[must_use]
    pub fn from_option(password: Option<String>) -> Self {
        password.map_or(Self::Terminal, Self::Fixed)
    }
}

impl SecretReader for PasswordSource {
    fn read_secret(&mut self) -> Result<String> {
        match self {
            Self::Terminal => Ok(rpassword::read_password()?),
            Self::Fixed(password) => Ok(password.clone()),
        }
    }
}

impl std::fmt::Debug for PasswordSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Terminal => f.write_str("Terminal"),
            Self::Fixed(_) => f.write_str("Fixed(..)"),
        }
    }
}
