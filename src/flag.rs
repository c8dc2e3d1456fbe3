//! IMAP system flags

use std::fmt;

/// An IMAP system flag, as used in `STORE` commands.
///
/// ```
/// use noclutter::Flag;
///
/// assert_eq!(Flag::Deleted.as_imap_str(), "\\Deleted");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Flag {
    /// Message has been read (`\Seen`).
    Seen,
    /// Message is flagged for attention (`\Flagged`).
    Flagged,
    /// Message is marked for removal by the next `EXPUNGE` (`\Deleted`).
    Deleted,
}

impl Flag {
    /// The IMAP wire representation, including the leading backslash.
    #[must_use]
    pub const fn as_imap_str(self) -> &'static str {
        match self {
            Self::Seen => "\\Seen",
            Self::Flagged => "\\Flagged",
            Self::Deleted => "\\Deleted",
        }
    }

    /// `+FLAGS.SILENT (<flag>)`: add the flag without untagged FETCH
    /// echoes.
    #[must_use]
    pub fn add_silently(self) -> String {
        format!("+FLAGS.SILENT ({})", self.as_imap_str())
    }
}

impl fmt::Display for Flag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_imap_str())
    }
}
