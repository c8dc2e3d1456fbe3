#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]

//! Delete IMAP messages by subject, interactively

use clap::Parser;
use clap::error::ErrorKind;
use noclutter::{ImapConnector, Palette, PasswordSource, Prompter, SessionConfig, Workflow};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "noclutter")]
#[command(about = "Search an IMAP mailbox by subject and bulk-delete the matches")]
struct Args {
    /// Username for the email account
    #[arg(short = 'u')]
    username: String,

    /// Email server host / ip
    #[arg(short = 's')]
    server: String,

    /// Port on which to connect
    #[arg(short = 'p')]
    port: u16,

    /// Mailbox which needs to be cleared (highlighted in the listing)
    #[arg(short = 'm')]
    mailbox: Option<String>,

    /// Force: skip TLS certificate verification
    #[arg(short = 'f')]
    force: bool,
}

fn parse_args() -> Result<Args, ExitCode> {
    match Args::try_parse() {
        Ok(args) => Ok(args),
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            let _ = e.print();
            Err(ExitCode::SUCCESS)
        }
        Err(e) => {
            println!("> Please Pass the required flags");
            let _ = e.print();
            Err(ExitCode::from(1))
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to initialise logging: {e}"))?;

    let args = match parse_args() {
        Ok(args) => args,
        Err(code) => return Ok(code),
    };

    let config = match SessionConfig::new(args.username, args.server, args.port) {
        Ok(config) => config
            .with_mailbox_hint(args.mailbox)
            .with_insecure(args.force)
            .with_env_password(),
        Err(e) => {
            println!("> {e}");
            return Ok(ExitCode::from(e.exit_code()));
        }
    };

    let secret = PasswordSource::from_option(config.password.clone());
    let prompter = Prompter::stdio(Palette::detect());
    let mut workflow = Workflow::new(&config, ImapConnector, secret, prompter);

    let outcome = workflow.run().await;
    Ok(ExitCode::from(outcome.exit_code()))
}
