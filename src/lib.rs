//! Interactive IMAP mailbox cleanup
//!
//! Connects to an IMAP server over TLS, lets the user pick a mailbox,
//! searches it by subject and, after an explicit `Y`, flags the matches
//! `\Deleted` and expunges them.
//!
//! The steps are exposed individually ([`list_mailboxes`],
//! [`select_mailbox`], [`search_messages`], [`confirm_deletion`],
//! [`delete_and_expunge`]) and sequenced by [`Workflow`]. They talk to
//! the server through the [`MailSession`] trait, implemented for real
//! servers by [`ImapConnection`].

mod config;
mod connection;
mod delete;
mod error;
mod flag;
mod mailbox;
mod prompt;
mod search;
mod secret;
mod sequence;
mod session;
mod style;
mod workflow;

pub use config::{PASSWORD_ENV, SessionConfig};
pub use connection::{ImapConnection, ImapConnector};
pub use delete::{confirm_deletion, delete_and_expunge};
pub use error::{Error, Result};
pub use flag::Flag;
pub use mailbox::{CANCEL_HINT, list_mailboxes, select_mailbox};
pub use prompt::{AFFIRMATIVE, PREFIX, Prompter};
pub use search::{SearchFilter, WILDCARD, search_messages};
pub use secret::{PasswordSource, SecretReader};
pub use sequence::SequenceSet;
pub use session::{Connector, MAILBOX_LIST_CAPACITY, MailSession, SelectedMailbox};
pub use style::Palette;
pub use workflow::{Outcome, Stage, Workflow};
