//! The mail-server operations the workflow depends on
//!
//! [`crate::ImapConnection`] is the real implementation; tests plug in
//! scripted sessions that record the order of calls.

#![allow(async_fn_in_trait)]

use crate::config::SessionConfig;
use crate::error::Result;
use crate::flag::Flag;
use crate::search::SearchFilter;
use crate::sequence::SequenceSet;

/// Pre-sized capacity of the mailbox listing buffer. Larger listings
/// still drain completely; the buffer grows past it.
pub const MAILBOX_LIST_CAPACITY: usize = 50;

/// A mailbox opened for modification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedMailbox {
    /// Canonical name reported back to the user.
    pub name: String,
    /// Number of messages at selection time.
    pub exists: u32,
}

/// One connection to a mail server.
///
/// Starts greeted but unauthenticated. [`MailSession::logout`] may be
/// called in either state and releases the connection; calling it again
/// is a no-op.
pub trait MailSession {
    /// Authenticate with username and password.
    async fn login(&mut self, username: &str, password: &str) -> Result<()>;

    /// Names of every mailbox matching `pattern`, in delivery order.
    async fn list(&mut self, reference: &str, pattern: &str) -> Result<Vec<String>>;

    /// Open `mailbox` read-write.
    async fn select(&mut self, mailbox: &str) -> Result<SelectedMailbox>;

    /// Sequence numbers of the messages matching `filter`.
    async fn search(&mut self, filter: &SearchFilter) -> Result<Vec<u32>>;

    /// Add `flag` to every message in `set` with one command.
    async fn add_flag(&mut self, set: &SequenceSet, flag: Flag) -> Result<()>;

    /// Permanently remove messages flagged `\Deleted`, returning the
    /// sequence numbers the server reported. `expected` sizes the
    /// receive buffer.
    async fn expunge(&mut self, expected: usize) -> Result<Vec<u32>>;

    /// End the session.
    async fn logout(&mut self) -> Result<()>;
}

/// Opens connections.
pub trait Connector {
    type Session: MailSession;

    /// Dial the server and wait for its greeting.
    async fn connect(&self, config: &SessionConfig) -> Result<Self::Session>;
}
