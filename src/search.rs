//! Subject search
//!
//! The pattern is passed to the server as typed. Whether a partial
//! subject matches is up to the server: some only match on the full
//! subject line.

use crate::error::{Error, Result};
use crate::mailbox::CANCEL_HINT;
use crate::prompt::Prompter;
use crate::session::MailSession;
use std::fmt;
use std::io::{BufRead, Write};
use tracing::info;

/// Pattern that selects every message in the mailbox.
pub const WILDCARD: &str = "*";

/// What to search the selected mailbox for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchFilter {
    /// Every message; no subject constraint.
    All,
    /// Messages whose Subject header contains the string.
    Subject(String),
}

impl SearchFilter {
    /// `*` means all messages; anything else constrains the subject.
    #[must_use]
    pub fn from_pattern(pattern: &str) -> Self {
        if pattern == WILDCARD {
            Self::All
        } else {
            Self::Subject(pattern.to_string())
        }
    }

    /// The subject constraint, if any.
    #[must_use]
    pub fn subject(&self) -> Option<&str> {
        match self {
            Self::All => None,
            Self::Subject(s) => Some(s),
        }
    }

    /// Arguments of the IMAP SEARCH command.
    #[must_use]
    pub fn to_query(&self) -> String {
        match self {
            Self::All => "ALL".to_string(),
            Self::Subject(subject) if subject.is_ascii() => {
                format!("SUBJECT {}", quote(subject))
            }
            Self::Subject(subject) => format!("CHARSET UTF-8 SUBJECT {}", quote(subject)),
        }
    }
}

impl fmt::Display for SearchFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("all messages"),
            Self::Subject(s) => write!(f, "subject {s:?}"),
        }
    }
}

/// IMAP quoted string: backslash and double quote are escaped.
fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        if c == '"' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
    out
}

/// Ask for a subject pattern and search the selected mailbox.
///
/// # Errors
///
/// Returns [`Error::NoMatches`] when nothing matched,
/// [`Error::Input`] when input ends, and [`Error::Imap`] if the SEARCH
/// command fails.
pub async fn search_messages<S, R, W>(
    session: &mut S,
    prompter: &mut Prompter<R, W>,
) -> Result<Vec<u32>>
where
    S: MailSession,
    R: BufRead,
    W: Write,
{
    let palette = prompter.palette();
    let pattern = prompter.text(format_args!(
        "Please specify the pattern for SUBJECT for searching mails before deleting [{WILDCARD} for all][{}]",
        palette.red(CANCEL_HINT)
    ))?;

    let filter = SearchFilter::from_pattern(&pattern);
    let found = session.search(&filter).await?;
    if found.is_empty() {
        return Err(Error::NoMatches);
    }

    info!(%filter, count = found.len(), "Search matched");
    prompter.say(format_args!(
        "Total Emails Found for this search are : {}",
        palette.green(found.len())
    ))?;

    Ok(found)
}
