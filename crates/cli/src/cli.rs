//! Argument parsing and command dispatch.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};

use crate::commands;

/// Offline tooling for ledger query envelopes.
#[derive(Parser)]
#[command(name = "ledgerq")]
#[command(version)]
#[command(about = "Encode, inspect, and configure ledger queries")]
#[command(propagate_version = true)]
#[command(arg_required_else_help = true)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOptions,

    #[command(subcommand)]
    pub command: Commands,
}

/// Options shared by every command.
#[derive(Args, Clone)]
pub struct GlobalOptions {
    /// Emit logs as JSON lines instead of compact text.
    #[arg(long, env = "LEDGERQ_LOG_JSON", global = true)]
    pub log_json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build a request envelope and print it as base64.
    #[command(subcommand)]
    Encode(EncodeCommand),

    /// Rebuild the query carried by a base64 envelope and describe it.
    Decode {
        /// Base64-encoded request envelope.
        envelope: String,
    },

    /// Validate a configuration file and print the effective settings.
    CheckConfig {
        /// Path to the TOML configuration file.
        path: PathBuf,
    },
}

#[derive(Subcommand)]
pub enum EncodeCommand {
    /// Receipt lookup for a transaction.
    Receipt {
        /// Transaction ID, e.g. `0.0.1001@1700000000.000000042`.
        transaction_id: String,

        /// Also request receipts of duplicate submissions.
        #[arg(long)]
        include_duplicates: bool,

        /// Also request receipts of child transactions.
        #[arg(long)]
        include_children: bool,
    },

    /// Account state lookup.
    AccountInfo {
        /// Account ID, e.g. `0.0.1001`.
        account_id: String,
    },
}

impl Cli {
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Encode(EncodeCommand::Receipt {
                transaction_id,
                include_duplicates,
                include_children,
            }) => {
                let envelope =
                    commands::encode_receipt(&transaction_id, include_duplicates, include_children)?;
                println!("{envelope}");
            }
            Commands::Encode(EncodeCommand::AccountInfo { account_id }) => {
                println!("{}", commands::encode_account_info(&account_id)?);
            }
            Commands::Decode { envelope } => {
                let described = commands::decode(&envelope)?;
                println!("{}", serde_json::to_string_pretty(&described)?);
            }
            Commands::CheckConfig { path } => {
                let effective = commands::check_config(&path)?;
                println!("{}", serde_json::to_string_pretty(&effective)?);
            }
        }
        Ok(())
    }
}
