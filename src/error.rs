//! Error types for noclutter

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IMAP error: {0}")]
    Imap(String),

    #[error("TLS error: {0}")]
    Tls(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Validation(String),

    #[error("Could not get user input: {0}")]
    Input(String),

    #[error("No Mails matching this search criteria")]
    NoMatches,
}

impl Error {
    /// Process exit code for a run that ended with this error.
    ///
    /// `1` configuration, `2` connection or protocol, `3` user input,
    /// `4` empty search result.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Config(_) => 1,
            Self::Imap(_) | Self::Tls(_) | Self::Io(_) => 2,
            Self::Validation(_) | Self::Input(_) => 3,
            Self::NoMatches => 4,
        }
    }

    /// Whether the error came from the user rather than the server.
    #[must_use]
    pub const fn is_user_error(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::Input(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
