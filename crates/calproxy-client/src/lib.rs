//! CLI dashboard for the calproxy backend.
//!
//! This crate provides the `calproxy` command-line interface and the
//! [`BackendClient`] it uses.

pub mod backend;
pub mod cli;
pub mod commands;
pub mod error;

pub use backend::BackendClient;
pub use cli::Cli;
pub use error::{ClientError, ClientResult};
