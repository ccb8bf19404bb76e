//! The `passport` command-line tool: wires the catalog, resolver, visit
//! session, persistence and share codec together.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;

pub use cli::{Args, Command, TagCommand};
pub use commands::{Outcome, run_command};
pub use config::Config;
pub use error::CliError;
