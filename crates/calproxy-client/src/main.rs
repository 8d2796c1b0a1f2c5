//! calproxy CLI entry point.

use std::process::ExitCode;
use std::time::Duration;

use chrono::{Local, Utc};
use clap::Parser;

use calproxy_client::BackendClient;
use calproxy_client::cli::{Cli, Command};
use calproxy_client::commands;
use calproxy_client::error::ClientResult;
use calproxy_core::{CardOptions, TracingConfig, init_tracing};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_tracing(TracingConfig::cli(cli.debug)) {
        eprintln!("warning: failed to initialize logging: {}", e);
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> ClientResult<()> {
    let mut client = BackendClient::new(cli.backend.clone(), Duration::from_secs(cli.timeout))?;
    if let Some(session) = cli.session.clone() {
        client = client.with_session(session);
    }

    let mut options = CardOptions::default();
    if cli.max_description_length.is_some() {
        options.max_description_length = cli.max_description_length;
    }

    match cli.command.unwrap_or(Command::Events) {
        Command::Events => {
            let session = cli.session.as_deref().filter(|s| !s.is_empty());
            if cli.utc {
                commands::events::show(&client, session, &Utc, &options).await
            } else {
                commands::events::show(&client, session, &Local, &options).await
            }
        }
        Command::Logout => commands::session::logout(&client).await,
        Command::Health => commands::session::health(&client).await,
        Command::LoginUrl => commands::session::login_url(&client),
    }
}
