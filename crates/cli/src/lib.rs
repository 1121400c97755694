//! Hedera gateway CLI library: argument definitions and command execution.

pub mod args;
pub mod commands;

pub use args::{CliArgs, Command};
pub use commands::{load_settings, run, OfflineConnector};
