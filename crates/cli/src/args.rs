//! Command-line arguments.

use clap::{ArgGroup, Parser, Subcommand};
use std::path::PathBuf;

/// Hedera gateway operator CLI
#[derive(Parser, Debug, Clone)]
#[command(name = "hedera-cli", version, about = "Hedera gateway command-line interface")]
pub struct CliArgs {
    /// Path to a TOML settings file.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Network key; only `main` selects mainnet.
    #[arg(
        long,
        global = true,
        env = "HEDERA_NETWORK",
        default_value = "test",
        value_name = "KEY"
    )]
    pub network: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Checks whether an account id is structurally valid.
    Validate {
        /// Candidate account id, e.g. `0.0.1234`.
        address: String,
    },

    /// Prints explorer links.
    #[command(group(
        ArgGroup::new("target")
            .required(true)
            .multiple(true)
            .args(["transaction", "account"])
    ))]
    Links {
        /// Transaction id to link.
        #[arg(long = "tx", value_name = "ID")]
        transaction: Option<String>,

        /// Account id to link.
        #[arg(long, value_name = "ADDRESS")]
        account: Option<String>,
    },

    /// Looks a transaction up on the mirror service and prints it as JSON.
    Lookup {
        /// Transaction id in query or canonical form.
        transaction_id: String,
    },

    /// Prints the canonical form of a transaction id.
    Canonical {
        /// Transaction id in query or canonical form.
        transaction_id: String,

        /// Reject malformed ids instead of echoing them.
        #[arg(long)]
        strict: bool,
    },
}
