//! Confirmation and two-phase deletion
//!
//! Matched messages are first flagged `\Deleted` with a single STORE,
//! then removed with EXPUNGE. A failed STORE stops before EXPUNGE. A
//! failed EXPUNGE leaves the flags set; the messages stay in the
//! mailbox marked deleted until something expunges it.

use crate::error::{Error, Result};
use crate::flag::Flag;
use crate::prompt::Prompter;
use crate::session::MailSession;
use crate::sequence::SequenceSet;
use std::io::{BufRead, Write};
use tracing::{debug, info};

/// Ask before deleting. Only an exact `Y` proceeds.
///
/// # Errors
///
/// Returns [`Error::Input`] when input ends before an answer.
pub fn confirm_deletion<R: BufRead, W: Write>(prompter: &mut Prompter<R, W>) -> Result<bool> {
    let palette = prompter.palette();
    prompter.confirm(format_args!(
        "Do you want to proceed with deletion ? [{}/{}] : ",
        palette.green("Y"),
        palette.red("n")
    ))
}

/// Flag `numbers` deleted, expunge, and return what the server removed.
///
/// # Errors
///
/// Returns [`Error::Validation`] for an empty input and
/// [`Error::Imap`] if STORE or EXPUNGE fails.
pub async fn delete_and_expunge<S, R, W>(
    session: &mut S,
    numbers: &[u32],
    prompter: &mut Prompter<R, W>,
) -> Result<Vec<u32>>
where
    S: MailSession,
    R: BufRead,
    W: Write,
{
    let set = SequenceSet::from_numbers(numbers)
        .ok_or_else(|| Error::Validation("Nothing to delete".into()))?;

    prompter.say("Deletion Started")?;
    session.add_flag(&set, Flag::Deleted).await?;
    debug!(%set, "Marked deleted");
    prompter.say("Mark as deleted done")?;

    let expunged = session.expunge(set.len()).await?;
    info!(count = expunged.len(), "Expunge completed");

    let listed: Vec<String> = expunged.iter().map(ToString::to_string).collect();
    prompter.say(format_args!(
        "Expunge Completed for seq : {}",
        listed.join(" ")
    ))?;

    Ok(expunged)
}
