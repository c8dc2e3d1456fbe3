//! IMAP command handlers for the fake server.
//!
//! One module per command the deletion workflow sends: LOGIN, LIST,
//! SELECT, SEARCH, STORE, EXPUNGE and LOGOUT.

mod search;
mod store;

pub use expunge::handle_expunge;
pub use list::handle_list;
pub use login::handle_login;
pub use logout::handle_logout;
pub use search::handle_search;
pub use select::handle_select;
pub use store::{StoreArgs, handle_store};

#[cfg(test)]
pub mod testing {
    use tokio::io::{AsyncReadExt, BufReader, DuplexStream};

    /// Drain everything a handler wrote to the client half.
    pub async fn collect(client: DuplexStream) -> String {
        let mut buf = Vec::new();
        BufReader::new(client).read_to_end(&mut buf).await.unwrap();
        String::from_utf8(buf).unwrap()
    }
}
