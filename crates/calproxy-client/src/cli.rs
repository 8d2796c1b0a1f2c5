//! Command-line interface definition.

use clap::{Parser, Subcommand};
use url::Url;

use crate::backend::DEFAULT_BACKEND_URL;

/// calproxy - upcoming Google Calendar events from your calproxy backend
#[derive(Debug, Parser)]
#[command(name = "calproxy")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Backend base URL
    #[arg(long, env = "CALPROXY_BACKEND", default_value = DEFAULT_BACKEND_URL)]
    pub backend: Url,

    /// Value of the backend's session cookie (`calproxy.sid`), copied from
    /// a signed-in browser
    #[arg(long, env = "CALPROXY_SESSION", hide_env_values = true)]
    pub session: Option<String>,

    /// Enable debug output
    #[arg(long, short = 'v')]
    pub debug: bool,

    /// Request timeout in seconds
    #[arg(long, default_value = "10")]
    pub timeout: u64,

    /// Show times in UTC instead of the local timezone
    #[arg(long)]
    pub utc: bool,

    /// Maximum description length (truncated with ellipsis)
    #[arg(long)]
    pub max_description_length: Option<usize>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Show upcoming events (default)
    Events,

    /// End the backend session
    Logout,

    /// Check that the backend is reachable
    Health,

    /// Print the URL that starts sign-in in a browser
    LoginUrl,
}
