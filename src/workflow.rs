//! The deletion workflow
//!
//! ```text
//! Disconnected -> Connected -> Authenticated -> MailboxesListed
//!     -> MailboxSelected -> Searched -> Confirmed -> Deleted | Aborted
//! ```
//!
//! Each step needs the previous step's output and there is no way
//! back. A failing step ends the run in [`Outcome::Failed`]. Once
//! connected, the session is logged out exactly once whatever the
//! outcome.

use crate::config::SessionConfig;
use crate::delete::{confirm_deletion, delete_and_expunge};
use crate::error::Error;
use crate::mailbox::{list_mailboxes, select_mailbox};
use crate::prompt::Prompter;
use crate::search::search_messages;
use crate::secret::SecretReader;
use crate::session::{Connector, MailSession};
use std::fmt;
use std::io::{BufRead, Write};
use tracing::{info, warn};

/// Progress through the workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    Disconnected,
    Connected,
    Authenticated,
    MailboxesListed,
    MailboxSelected,
    Searched,
    Confirmed,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Disconnected => "disconnected",
            Self::Connected => "connected",
            Self::Authenticated => "authenticated",
            Self::MailboxesListed => "mailboxes listed",
            Self::MailboxSelected => "mailbox selected",
            Self::Searched => "searched",
            Self::Confirmed => "confirmed",
        })
    }
}

/// How a run ended.
#[derive(Debug)]
pub enum Outcome {
    /// Messages were flagged and expunged.
    Deleted {
        mailbox: String,
        expunged: Vec<u32>,
    },
    /// The user declined at the confirmation prompt.
    Aborted,
    /// A step failed; `stage` is the last stage reached.
    Failed { stage: Stage, error: Error },
}

impl Outcome {
    /// Process exit code: `0` for deletion or abort, otherwise the
    /// error's code.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Deleted { .. } | Self::Aborted => 0,
            Self::Failed { error, .. } => error.exit_code(),
        }
    }
}

/// Where the steps after connecting stopped.
struct Halt {
    stage: Stage,
    error: Error,
}

fn halt(stage: Stage) -> impl FnOnce(Error) -> Halt {
    move |error| Halt { stage, error }
}

/// Drives one run against a connector, a password source and a user
/// dialogue.
pub struct Workflow<'a, C, K, R, W> {
    config: &'a SessionConfig,
    connector: C,
    secret: K,
    prompter: Prompter<R, W>,
}

impl<'a, C, K, R, W> Workflow<'a, C, K, R, W>
where
    C: Connector,
    K: SecretReader,
    R: BufRead,
    W: Write,
{
    pub const fn new(
        config: &'a SessionConfig,
        connector: C,
        secret: K,
        prompter: Prompter<R, W>,
    ) -> Self {
        Self {
            config,
            connector,
            secret,
            prompter,
        }
    }

    /// Run the workflow to a terminal state and report it to the user.
    pub async fn run(&mut self) -> Outcome {
        let outcome = self.execute().await;
        self.report(&outcome);
        outcome
    }

    /// Hand back the prompter, e.g. to inspect what a test run printed.
    pub fn into_prompter(self) -> Prompter<R, W> {
        self.prompter
    }

    async fn execute(&mut self) -> Outcome {
        let palette = self.prompter.palette();
        if let Err(error) = self
            .prompter
            .say(format_args!("Connecting to {}", palette.green(&self.config.host)))
        {
            return Outcome::Failed {
                stage: Stage::Disconnected,
                error,
            };
        }

        let mut session = match self.connector.connect(self.config).await {
            Ok(session) => session,
            Err(error) => {
                return Outcome::Failed {
                    stage: Stage::Disconnected,
                    error,
                };
            }
        };
        info!(host = %self.config.host, port = self.config.port, "Connected");

        let result = self.drive(&mut session).await;

        if let Err(e) = session.logout().await {
            warn!("Logout failed: {}", e);
        }

        match result {
            Ok(outcome) => outcome,
            Err(Halt { stage, error }) => Outcome::Failed { stage, error },
        }
    }

    /// Everything between connect and logout.
    async fn drive<S: MailSession>(
        &mut self,
        session: &mut S,
    ) -> std::result::Result<Outcome, Halt> {
        let mut stage = Stage::Connected;

        self.prompter.say("Connected").map_err(halt(stage))?;
        self.prompter
            .say("Please enter password")
            .map_err(halt(stage))?;
        let password = self.secret.read_secret().map_err(halt(stage))?;
        session
            .login(&self.config.username, &password)
            .await
            .map_err(halt(stage))?;
        stage = self.advance(stage, Stage::Authenticated);

        let names = list_mailboxes(session).await.map_err(halt(stage))?;
        stage = self.advance(stage, Stage::MailboxesListed);

        let selected = select_mailbox(
            session,
            &names,
            &mut self.prompter,
            self.config.mailbox_hint.as_deref(),
        )
        .await
        .map_err(halt(stage))?;
        stage = self.advance(stage, Stage::MailboxSelected);

        let found = search_messages(session, &mut self.prompter)
            .await
            .map_err(halt(stage))?;
        stage = self.advance(stage, Stage::Searched);

        if !confirm_deletion(&mut self.prompter).map_err(halt(stage))? {
            info!("Deletion declined");
            return Ok(Outcome::Aborted);
        }
        stage = self.advance(stage, Stage::Confirmed);

        let expunged = delete_and_expunge(session, &found, &mut self.prompter)
            .await
            .map_err(halt(stage))?;

        Ok(Outcome::Deleted {
            mailbox: selected.name,
            expunged,
        })
    }

    fn advance(&self, from: Stage, to: Stage) -> Stage {
        debug_assert!(from < to, "workflow cannot move from {from} back to {to}");
        info!(user = %self.config.username, "Stage: {} -> {}", from, to);
        to
    }

    fn report(&mut self, outcome: &Outcome) {
        let palette = self.prompter.palette();
        let shown = match outcome {
            Outcome::Deleted { .. } => Ok(()),
            Outcome::Aborted => self.prompter.say("Exiting"),
            Outcome::Failed { stage, error } => {
                warn!(%stage, "Run failed: {}", error);
                self.prompter
                    .say(format_args!("Error : {}", palette.red(error)))
            }
        };
        if let Err(e) = shown {
            warn!("Could not report outcome: {}", e);
        }
    }
}
