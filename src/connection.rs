//! IMAP connection over implicit TLS
//!
//! Dials `host:port`, performs the TLS handshake straight away (no
//! STARTTLS) and speaks IMAP through `async-imap`. Certificates are
//! checked against the webpki roots unless the session is configured
//! as insecure.

use crate::config::SessionConfig;
use crate::error::{Error, Result};
use crate::flag::Flag;
use crate::search::SearchFilter;
use crate::sequence::SequenceSet;
use crate::session::{Connector, MAILBOX_LIST_CAPACITY, MailSession, SelectedMailbox};
use async_imap::{Client, Session};
use futures::TryStreamExt;
use rustls::pki_types::ServerName;
use std::sync::Arc;
use tokio::net::TcpStream;
use tokio_rustls::TlsConnector;
use tokio_util::compat::{Compat, TokioAsyncReadCompatExt};
use tracing::{debug, info};

type TlsStream = Compat<tokio_rustls::client::TlsStream<TcpStream>>;

enum Link {
    Greeted(Client<TlsStream>),
    Authenticated(Session<TlsStream>),
}

/// A live IMAP connection, greeted or logged in.
pub struct ImapConnection {
    link: Option<Link>,
}

/// Dials real servers.
#[derive(Debug, Default, Clone, Copy)]
pub struct ImapConnector;

impl Connector for ImapConnector {
    type Session = ImapConnection;

    async fn connect(&self, config: &SessionConfig) -> Result<ImapConnection> {
        ImapConnection::connect(config).await
    }
}

/// Build the TLS connector, verifying certificates unless `insecure`.
fn tls_connector(insecure: bool) -> Result<TlsConnector> {
    let builder = rustls::ClientConfig::builder_with_provider(Arc::new(
        rustls::crypto::ring::default_provider(),
    ))
    .with_safe_default_protocol_versions()
    .map_err(|e| Error::Tls(e.to_string()))?;

    let config = if insecure {
        builder
            .dangerous()
            .with_custom_certificate_verifier(Arc::new(AcceptAnyCertificate))
            .with_no_client_auth()
    } else {
        let mut roots = rustls::RootCertStore::empty();
        roots.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());
        builder.with_root_certificates(roots).with_no_client_auth()
    };

    Ok(TlsConnector::from(Arc::new(config)))
}

impl ImapConnection {
    /// Open a TLS-wrapped, not yet authenticated connection.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the TCP dial fails and [`Error::Tls`]
    /// if the handshake fails or the host is not a valid server name.
    pub async fn connect(config: &SessionConfig) -> Result<Self> {
        let addr = config.address();
        debug!("Connecting to IMAP server at {}", addr);

        let tcp_stream = TcpStream::connect(&addr).await?;

        let connector = tls_connector(config.insecure)?;
        let server_name = ServerName::try_from(config.host.clone())
            .map_err(|e| Error::Tls(format!("Invalid server name: {e}")))?;

        let tls_stream = connector
            .connect(server_name, tcp_stream)
            .await
            .map_err(|e| Error::Tls(e.to_string()))?;

        info!(insecure = config.insecure, "Connected to IMAP server");
        Ok(Self {
            link: Some(Link::Greeted(Client::new(tls_stream.compat()))),
        })
    }

    /// Whether `login` has succeeded and `logout` has not run yet.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        matches!(self.link, Some(Link::Authenticated(_)))
    }

    fn session(&mut self) -> Result<&mut Session<TlsStream>> {
        match self.link.as_mut() {
            Some(Link::Authenticated(session)) => Ok(session),
            Some(Link::Greeted(_)) => Err(Error::Imap("Not logged in".into())),
            None => Err(Error::Imap("Connection already closed".into())),
        }
    }
}

impl MailSession for ImapConnection {
    async fn login(&mut self, username: &str, password: &str) -> Result<()> {
        match self.link.take() {
            Some(Link::Greeted(client)) => match client.login(username, password).await {
                Ok(session) => {
                    self.link = Some(Link::Authenticated(session));
                    info!(username, "Logged in");
                    Ok(())
                }
                Err((e, client)) => {
                    self.link = Some(Link::Greeted(client));
                    Err(Error::Imap(format!("Login failed: {e}")))
                }
            },
            other => {
                self.link = other;
                Err(Error::Imap("Login requires a fresh connection".into()))
            }
        }
    }

    async fn list(&mut self, reference: &str, pattern: &str) -> Result<Vec<String>> {
        let session = self.session()?;
        let stream = session
            .list(Some(reference), Some(pattern))
            .await
            .map_err(|e| Error::Imap(format!("List mailboxes failed: {e}")))?;

        let names = stream
            .try_fold(
                Vec::with_capacity(MAILBOX_LIST_CAPACITY),
                |mut names, name| async move {
                    names.push(name.name().to_string());
                    Ok::<_, async_imap::error::Error>(names)
                },
            )
            .await
            .map_err(|e| Error::Imap(format!("List mailboxes failed: {e}")))?;

        debug!(count = names.len(), "Listed mailboxes");
        Ok(names)
    }

    async fn select(&mut self, mailbox: &str) -> Result<SelectedMailbox> {
        let status = self
            .session()?
            .select(mailbox)
            .await
            .map_err(|e| Error::Imap(format!("Failed to select {mailbox}: {e}")))?;

        Ok(SelectedMailbox {
            name: mailbox.to_string(),
            exists: status.exists,
        })
    }

    async fn search(&mut self, filter: &SearchFilter) -> Result<Vec<u32>> {
        let query = filter.to_query();
        debug!(%query, "Searching");

        let found = self
            .session()?
            .search(&query)
            .await
            .map_err(|e| Error::Imap(format!("Search failed: {e}")))?;

        let mut numbers: Vec<u32> = found.into_iter().collect();
        numbers.sort_unstable();
        Ok(numbers)
    }

    async fn add_flag(&mut self, set: &SequenceSet, flag: Flag) -> Result<()> {
        let updates = self
            .session()?
            .store(set.to_string(), flag.add_silently())
            .await
            .map_err(|e| Error::Imap(format!("Store {flag} failed: {e}")))?;

        let echoed: Vec<_> = updates
            .try_collect()
            .await
            .map_err(|e| Error::Imap(format!("Store {flag} failed: {e}")))?;

        debug!(%set, echoed = echoed.len(), "Flagged {}", flag);
        Ok(())
    }

    async fn expunge(&mut self, expected: usize) -> Result<Vec<u32>> {
        let removed = self
            .session()?
            .expunge()
            .await
            .map_err(|e| Error::Imap(format!("Expunge failed: {e}")))?;

        removed
            .try_fold(Vec::with_capacity(expected), |mut seqs, seq| async move {
                seqs.push(seq);
                Ok::<_, async_imap::error::Error>(seqs)
            })
            .await
            .map_err(|e| Error::Imap(format!("Expunge failed: {e}")))
    }

    async fn logout(&mut self) -> Result<()> {
        match self.link.take() {
            Some(Link::Authenticated(mut session)) => session
                .logout()
                .await
                .map_err(|e| Error::Imap(format!("Logout failed: {e}"))),
            Some(Link::Greeted(mut client)) => client
                .run_command_and_check_ok("LOGOUT", None)
                .await
                .map_err(|e| Error::Imap(format!("Logout failed: {e}"))),
            None => Ok(()),
        }
    }
}

/// Certificate verifier that accepts all certificates, used when the
/// user forces an insecure connection.
#[derive(Debug)]
struct AcceptAnyCertificate;

impl rustls::client::danger::ServerCertVerifier for AcceptAnyCertificate {
    fn verify_server_cert(
        &self,
        _end_entity: &rustls::pki_types::CertificateDer<'_>,
        _intermediates: &[rustls::pki_types::CertificateDer<'_>],
        _server_name: &rustls::pki_types::ServerName<'_>,
        _ocsp_response: &[u8],
        _now: rustls::pki_types::UnixTime,
    ) -> std::result::Result<rustls::client::danger::ServerCertVerified, rustls::Error> {
        Ok(rustls::client::danger::ServerCertVerified::assertion())
    }

    fn verify_tls12_signature(
        &self,
        _message: &[u8],
        _cert: &rustls::pki_types::CertificateDer<'_>,
        _dss: &rustls::DigitallySignedStruct,
    ) -> std::result::Result<rustls::client::danger::HandshakeSignatureValid, rustls::Error> {
        Ok(rustls::client::danger::HandshakeSignatureValid::assertion())
    }

    fn verify_tls13_signature(
        &self,
        _message: &[u8],
        _cert: &rustls::pki_types::CertificateDer<'_>,
        _dss: &rustls::DigitallySignedStruct,
    ) -> std::result::Result<rustls::client::danger::HandshakeSignatureValid, rustls::Error> {
        Ok(rustls::client::danger::HandshakeSignatureValid::assertion())
    }

    fn supported_verify_schemes(&self) -> Vec<rustls::SignatureScheme> {
        rustls::crypto::ring::default_provider()
            .signature_verification_algorithms
            .supported_schemes()
    }
}
