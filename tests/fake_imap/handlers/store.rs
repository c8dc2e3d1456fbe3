//! STORE command handler (sequence numbers, not UIDs).
//!
//! Supports `+FLAGS`, `-FLAGS` and `FLAGS` for `\Deleted`. The `.SILENT`
//! forms only send the tagged OK; the others echo
//! `* N FETCH (FLAGS (...))` for every touched message.

use crate::fake_imap::io::{write_line, write_tagged};
use crate::fake_imap::mailbox::Mailbox;
use imap_codec::imap_types::flag::{Flag, StoreResponse, StoreType};
use imap_codec::imap_types::sequence::{SeqOrUid, Sequence, SequenceSet};
use std::sync::Mutex;
use tokio::io::{AsyncRead, AsyncWrite, BufReader};

/// Expand a `SequenceSet` into sequence numbers; `*` is the last
/// message.
fn expand(seq_set: &SequenceSet, last: u32) -> Vec<u32> {
    let value = |s: &SeqOrUid| match s {
        SeqOrUid::Value(v) => v.get(),
        SeqOrUid::Asterisk => last,
    };

    let mut numbers = Vec::new();
    for seq in seq_set.0.as_ref() {
        match seq {
            Sequence::Single(s) => numbers.push(value(s)),
            Sequence::Range(a, b) => {
                let (lo, hi) = (value(a).min(value(b)), value(a).max(value(b)));
                numbers.extend(lo..=hi);
            }
        }
    }
    numbers
}

/// Parsed STORE command arguments.
pub struct StoreArgs<'a> {
    pub sequence_set: &'a SequenceSet,
    pub kind: &'a StoreType,
    pub response: &'a StoreResponse,
    pub flags: &'a [Flag<'a>],
}

pub async fn handle_store<S: AsyncRead + AsyncWrite + Unpin>(
    tag: &str,
    args: &StoreArgs<'_>,
    mailbox: &Mutex<Mailbox>,
    selected_folder: Option<&str>,
    stream: &mut BufReader<S>,
) {
    let Some(folder_name) = selected_folder else {
        write_tagged(stream, tag, "BAD", "No folder selected").await;
        return;
    };

    let wants_deleted = args.flags.iter().any(|f| matches!(f, Flag::Deleted));

    // Mutate under lock, write afterwards.
    let touched: Result<Vec<(u32, bool)>, &str> = {
        let mut mb = mailbox.lock().unwrap();
        match mb.get_folder_mut(folder_name) {
            None => Err("Folder not found"),
            Some(folder) => {
                let last = u32::try_from(folder.messages.len()).unwrap();
                let numbers = expand(args.sequence_set, last);
                if numbers.iter().any(|n| *n == 0 || *n > last) {
                    Err("Invalid sequence number")
                } else {
                    Ok(numbers
                        .into_iter()
                        .map(|n| {
                            let message = &mut folder.messages[(n - 1) as usize];
                            match args.kind {
                                StoreType::Add => message.deleted |= wants_deleted,
                                StoreType::Remove => message.deleted &= !wants_deleted,
                                StoreType::Replace => message.deleted = wants_deleted,
                            }
                            (n, message.deleted)
                        })
                        .collect())
                }
            }
        }
    };

    let touched = match touched {
        Ok(touched) => touched,
        Err(reason) => {
            write_tagged(stream, tag, "BAD", reason).await;
            return;
        }
    };

    if matches!(args.response, StoreResponse::Answer) {
        for (n, deleted) in touched {
            let flags = if deleted { "\\Deleted" } else { "" };
            let _ = write_line(stream, &format!("* {n} FETCH (FLAGS ({flags}))\r\n")).await;
        }
    }

    write_tagged(stream, tag, "OK", "STORE completed").await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake_imap::handlers::testing::collect;
    use crate::fake_imap::mailbox::MailboxBuilder;
    use std::num::NonZeroU32;

    fn set(numbers: &[u32]) -> SequenceSet {
        let seqs: Vec<Sequence> = numbers
            .iter()
            .map(|n| Sequence::Single(SeqOrUid::Value(NonZeroU32::new(*n).unwrap())))
            .collect();
        SequenceSet(seqs.try_into().unwrap())
    }

    async fn run(
        mailbox: &Mutex<Mailbox>,
        numbers: &[u32],
        response: StoreResponse,
    ) -> String {
        let (client, server) = tokio::io::duplex(4096);
        let mut stream = BufReader::new(server);
        let sequence_set = set(numbers);
        let flags = [Flag::Deleted];
        let args = StoreArgs {
            sequence_set: &sequence_set,
            kind: &StoreType::Add,
            response: &response,
            flags: &flags,
        };
        handle_store("A1", &args, mailbox, Some("INBOX"), &mut stream).await;
        drop(stream);
        collect(client).await
    }

    fn inbox() -> Mutex<Mailbox> {
        Mutex::new(
            MailboxBuilder::new()
                .folder("INBOX")
                .message("a")
                .message("b")
                .message("c")
                .build(),
        )
    }

    #[tokio::test]
    async fn silent_add_flags_without_echo() {
        let mb = inbox();

        let output = run(&mb, &[1, 3], StoreResponse::Silent).await;

        assert_eq!(output, "A1 OK STORE completed\r\n");
        let deleted: Vec<bool> = mb.lock().unwrap().get_folder("INBOX").unwrap().messages
            .iter()
            .map(|m| m.deleted)
            .collect();
        assert_eq!(deleted, vec![true, false, true]);
    }

    #[tokio::test]
    async fn answer_echoes_flags() {
        let mb = inbox();
        let output = run(&mb, &[2], StoreResponse::Answer).await;
        assert!(output.contains("* 2 FETCH (FLAGS (\\Deleted))"));
    }

    #[tokio::test]
    async fn out_of_range_is_bad() {
        let mb = inbox();
        let output = run(&mb, &[4], StoreResponse::Silent).await;
        assert_eq!(output, "A1 BAD Invalid sequence number\r\n");
    }
}
