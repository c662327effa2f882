use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::command::{
    exec::ExecCommand, grant::GrantCommand, grants::GrantsCommand, overview::OverviewCommand,
    revoke::RevokeCommand,
};

#[derive(Parser)]
#[command(version, about, long_about = None)]
pub struct CliArgs {
    /// Path to the config file
    #[arg(long, default_value = "./warden.toml")]
    pub config: PathBuf,

    /// Set the logging level, overrides the config file
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevel>,

    #[command(subcommand)]
    /// The command to run
    pub command: Command,
}

#[derive(Clone, Subcommand)]
pub enum Command {
    /// List grants, received or given
    Grants(GrantsArgs),
    /// Grant an authorization
    Grant(GrantArgs),
    /// Revoke a grant given by the signer
    Revoke(RevokeCommand),
    /// Execute a message on behalf of a granter
    Exec(ExecCommand),
    /// Balances, staking and rewards across chains, in USD
    Overview(OverviewCommand),
}

#[derive(Clone, Args)]
pub struct GrantsArgs {
    #[command(subcommand)]
    pub command: GrantsCommand,
}

#[derive(Clone, Args)]
pub struct GrantArgs {
    #[command(subcommand)]
    pub command: GrantCommand,
}

/// Fee settings shared by every transaction command
#[derive(Clone, Debug, Default, Args)]
pub struct FeeArgs {
    /// Fee in the chain's base denom, derived from the gas price if not set
    #[arg(long)]
    pub fee_amount: Option<u128>,

    /// Account paying the fee through a feegrant, empty means the signer pays
    #[arg(long)]
    pub fee_granter: Option<String>,

    /// Fixed gas limit, overrides the gas table
    #[arg(long, conflicts_with = "simulate")]
    pub gas_limit: Option<u64>,

    /// Simulate first and use the gas it reports times this multiplier
    #[arg(long)]
    pub simulate: Option<f32>,
}

#[derive(Serialize, Deserialize, Copy, Clone, Debug, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl std::str::FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "trace" => Ok(Self::Trace),
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warn" => Ok(Self::Warn),
            "error" => Ok(Self::Error),
            _ => Err(format!("Unknown log level: {s}")),
        }
    }
}

impl From<LogLevel> for tracing::Level {
    fn from(log_level: LogLevel) -> Self {
        match log_level {
            LogLevel::Trace => tracing::Level::TRACE,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Error => tracing::Level::ERROR,
        }
    }
}
