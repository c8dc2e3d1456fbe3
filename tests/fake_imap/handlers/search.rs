//! SEARCH command handler (sequence numbers, not UIDs).
//!
//! Supported keys:
//!
//! - `ALL` -- every message
//! - `SUBJECT <s>` / `HEADER Subject <s>` -- case-insensitive substring
//!   of the subject, like most real servers
//! - `NOT`, `OR` and nested lists
//!
//! ```text
//! * SEARCH 2 4
//! A0004 OK SEARCH completed
//! ```

use crate::fake_imap::io::{write_line, write_tagged};
use crate::fake_imap::mailbox::{Mailbox, TestMessage};
use imap_codec::imap_types::search::SearchKey;
use tokio::io::{AsyncRead, AsyncWrite, BufReader};

pub async fn handle_search<S: AsyncRead + AsyncWrite + Unpin>(
    tag: &str,
    criteria: &[SearchKey<'_>],
    mailbox: &Mailbox,
    selected_folder: Option<&str>,
    stream: &mut BufReader<S>,
) {
    let Some(folder_name) = selected_folder else {
        write_tagged(stream, tag, "BAD", "No folder selected").await;
        return;
    };
    let Some(folder) = mailbox.get_folder(folder_name) else {
        write_tagged(stream, tag, "BAD", "Folder not found").await;
        return;
    };

    let numbers: Vec<String> = folder
        .messages
        .iter()
        .enumerate()
        .filter(|(_, m)| criteria.iter().all(|key| matches_key(m, key)))
        .map(|(i, _)| (i + 1).to_string())
        .collect();

    // An empty result is still a SEARCH line: "* SEARCH \r\n".
    let _ = write_line(stream, &format!("* SEARCH {}\r\n", numbers.join(" "))).await;
    write_tagged(stream, tag, "OK", "SEARCH completed").await;
}

fn contains_ignore_case(haystack: &str, needle: &[u8]) -> bool {
    let needle = String::from_utf8_lossy(needle).to_lowercase();
    haystack.to_lowercase().contains(&needle)
}

#[allow(clippy::match_same_arms)]
fn matches_key(message: &TestMessage, key: &SearchKey<'_>) -> bool {
    match key {
        SearchKey::All => true,
        SearchKey::Subject(s) => contains_ignore_case(&message.subject, s.as_ref()),
        SearchKey::Header(name, value) => {
            let name: &[u8] = name.as_ref();
            name.eq_ignore_ascii_case(b"subject")
                && contains_ignore_case(&message.subject, value.as_ref())
        }
        SearchKey::Deleted => message.deleted,
        SearchKey::Undeleted => !message.deleted,
        SearchKey::And(keys) => keys.as_ref().iter().all(|k| matches_key(message, k)),
        SearchKey::Or(a, b) => matches_key(message, a) || matches_key(message, b),
        SearchKey::Not(k) => !matches_key(message, k),
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake_imap::handlers::testing::collect;
    use crate::fake_imap::mailbox::MailboxBuilder;
    use imap_codec::imap_types::core::AString;

    fn mailbox() -> Mailbox {
        MailboxBuilder::new()
            .folder("INBOX")
            .message("Weekly report")
            .message("Lunch?")
            .message("weekly REPORT (draft)")
            .build()
    }

    async fn run(criteria: &[SearchKey<'_>], selected: Option<&str>) -> String {
        let (client, server) = tokio::io::duplex(4096);
        let mut stream = BufReader::new(server);
        handle_search("A1", criteria, &mailbox(), selected, &mut stream).await;
        drop(stream);
        collect(client).await
    }

    fn subject(s: &'static str) -> SearchKey<'static> {
        SearchKey::Subject(AString::try_from(s).unwrap())
    }

    #[tokio::test]
    async fn all_returns_every_sequence_number() {
        let output = run(&[SearchKey::All], Some("INBOX")).await;
        assert!(output.contains("* SEARCH 1 2 3\r\n"));
        assert!(output.contains("A1 OK SEARCH completed"));
    }

    #[tokio::test]
    async fn subject_is_case_insensitive_substring() {
        let output = run(&[subject("weekly report")], Some("INBOX")).await;
        assert!(output.contains("* SEARCH 1 3\r\n"));
    }

    #[tokio::test]
    async fn no_match_is_empty_search_line() {
        let output = run(&[subject("invoice")], Some("INBOX")).await;
        assert!(output.contains("* SEARCH \r\n"));
    }

    #[tokio::test]
    async fn requires_selected_folder() {
        let output = run(&[SearchKey::All], None).await;
        assert_eq!(output, "A1 BAD No folder selected\r\n");
    }
}
