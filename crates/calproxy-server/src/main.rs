//! calproxy-server entry point.

use std::process::ExitCode;

use clap::Parser;
use tracing::{Level, debug, error, info, warn};

use calproxy_core::{TracingConfig, TracingOutputFormat, init_tracing};
use calproxy_server::{AppState, HttpServer, ServerConfig, ServerResult, ShutdownHandle, router};

/// Backend for the calendar dashboard: Google sign-in and events proxy.
///
/// Configuration comes from the environment (and a `.env` file if present).
#[derive(Debug, Parser)]
#[command(name = "calproxy-server", version)]
struct Args {
    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Log one JSON object per line
    #[arg(long, env = "CALPROXY_JSON_LOGS")]
    json_logs: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    // Load .env before tracing so RUST_LOG from the file applies.
    let dotenv = dotenvy::dotenv();

    let mut tracing_config = TracingConfig::server();
    if args.debug {
        tracing_config = tracing_config.with_level(Level::DEBUG);
    }
    if args.json_logs {
        tracing_config = tracing_config.with_format(TracingOutputFormat::Json);
    }
    if let Err(e) = init_tracing(tracing_config) {
        eprintln!("error: failed to initialize logging: {}", e);
        return ExitCode::FAILURE;
    }

    match dotenv {
        Ok(path) => debug!(path = %path.display(), "loaded .env"),
        Err(e) if e.not_found() => debug!("no .env file"),
        Err(e) => warn!(error = %e, "failed to load .env"),
    }

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "server failed");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> ServerResult<()> {
    let config = ServerConfig::from_env()?;

    if config.uses_default_secret() {
        warn!("SESSION_SECRET is not set; using the development default");
    }
    info!(
        frontend = %config.frontend_url,
        production = config.production,
        timeout_secs = config.google.timeout.as_secs(),
        "configuration loaded"
    );

    let addr = config.bind_addr;
    let state = AppState::new(config)?;
    let server = HttpServer::bind(addr, router(state)).await?;

    let shutdown = ShutdownHandle::new();
    shutdown.listen_for_signals();
    server.run(shutdown).await
}
