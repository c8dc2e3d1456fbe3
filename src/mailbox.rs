//! Mailbox listing and interactive selection

use crate::error::Result;
use crate::prompt::Prompter;
use crate::session::{MailSession, SelectedMailbox};
use std::io::{BufRead, Write};
use tracing::info;

/// Hint shown with every prompt that waits for the user.
pub const CANCEL_HINT: &str = "CTRL+C to cancel";

/// Fetch every mailbox name (`LIST "" "*"`) in server order.
///
/// # Errors
///
/// Returns [`crate::Error::Imap`] if the LIST command or any of its
/// streamed responses fails.
pub async fn list_mailboxes<S: MailSession>(session: &mut S) -> Result<Vec<String>> {
    let names = session.list("", "*").await?;
    info!(count = names.len(), "Mailboxes listed");
    Ok(names)
}

/// Show `names` numbered from 1, ask for one and open it read-write.
///
/// A listed mailbox equal to `hint` is marked but never picked
/// automatically.
///
/// # Errors
///
/// Returns [`crate::Error::Validation`] for a non-numeric or
/// out-of-range answer (no SELECT is sent), [`crate::Error::Input`]
/// when input ends, and [`crate::Error::Imap`] if SELECT fails.
pub async fn select_mailbox<S, R, W>(
    session: &mut S,
    names: &[String],
    prompter: &mut Prompter<R, W>,
    hint: Option<&str>,
) -> Result<SelectedMailbox>
where
    S: MailSession,
    R: BufRead,
    W: Write,
{
    let palette = prompter.palette();

    prompter.say("Mailboxes:")?;
    for (index, name) in names.iter().enumerate() {
        let marker = if hint == Some(name.as_str()) { "  (-m)" } else { "" };
        prompter.raw(format_args!("{} - {name}{marker}", palette.green(index + 1)))?;
    }

    let choice = prompter.index(
        format_args!(
            "Please select a mailbox from which to delete mails, [{}][{}]: ",
            palette.green("Enter the number and press enter"),
            palette.red(CANCEL_HINT)
        ),
        names.len(),
    )?;

    let selected = session.select(&names[choice]).await?;
    info!(mailbox = %selected.name, exists = selected.exists, "Mailbox selected");
    prompter.say(format_args!("Selected : {}", palette.green(&selected.name)))?;

    Ok(selected)
}
