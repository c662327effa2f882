mod args;
mod command;
mod config;
mod context;
mod signer;

use anyhow::Result;
use args::{CliArgs, Command, GrantArgs, GrantsArgs};
use clap::Parser;
use command::{grants::GrantsLog, overview::OverviewLog, TxLog};
use config::{Config, ConfigInit};
use context::AppContext;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use warden::prelude::*;

#[tokio::main]
async fn main() -> Result<()> {
    // Load the .env file before anything, in case it's used by args
    if dotenvy::dotenv().is_err() {
        eprintln!("Failed to load .env file");
    }

    let args = CliArgs::parse();
    let config = Config::try_from(ConfigInit::load(&args.config).await?)?;

    let level = args
        .log_level
        .map(tracing::Level::from)
        .unwrap_or(config.tracing_level);

    let mut tracing_env = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing_subscriber::filter::LevelFilter::from_level(level).into());
    for directive in &config.tracing_directives {
        tracing_env = tracing_env.add_directive(directive.parse()?);
    }

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_target(false),
        )
        .with(tracing_env)
        .try_init()?;

    let ctx = AppContext::new(args, config);

    match &ctx.args.command {
        Command::Grants(GrantsArgs { command }) => {
            command.run(&ctx, log_grants).await?;
        }
        Command::Grant(GrantArgs { command }) => {
            command.run(&ctx, log_tx).await?;
        }
        Command::Revoke(command) => {
            command
                .run(&ctx, log_tx, |grants| {
                    tracing::info!("{} grants remaining", grants.len());
                    for grant in grants {
                        log_grant(grant);
                    }
                })
                .await?;
        }
        Command::Exec(command) => {
            command.run(&ctx, log_tx).await?;
        }
        Command::Overview(command) => {
            command
                .run(&ctx, |line| match line {
                    OverviewLog::Row(row) => {
                        tracing::info!(
                            "{}: available {} staked {} rewards {} ({})",
                            row.name,
                            row.available,
                            row.staked,
                            row.rewards,
                            match row.price {
                                Some(_) => format_usd(row.usd_value()),
                                None => "no price".to_string(),
                            }
                        );
                    }
                    OverviewLog::Failed { chain_id, error } => {
                        tracing::warn!("{chain_id}: {error}");
                    }
                    OverviewLog::Totals(totals) => {
                        tracing::info!("Available: {}", format_usd(totals.available));
                        tracing::info!("Staked: {}", format_usd(totals.staked));
                        tracing::info!("Rewards: {}", format_usd(totals.rewards));
                        tracing::info!("Total: {}", format_usd(totals.total()));
                    }
                })
                .await?;
        }
    }

    Ok(())
}

fn log_grants(log: GrantsLog) {
    tracing::info!(
        "{} {} grants for {} on {}{}",
        log.grants.len(),
        log.direction,
        log.address,
        log.chain_id,
        log.total
            .map(|total| format!(" ({total} total)"))
            .unwrap_or_default()
    );

    for grant in &log.grants {
        log_grant(grant);
    }
}

fn log_grant(grant: &Grant) {
    tracing::info!(
        "{} -> {}: {} (expires {})",
        grant.granter,
        grant.grantee,
        grant
            .authorization
            .msg_type_url()
            .unwrap_or_else(|| grant.authorization.type_url.clone()),
        grant.expiration.as_deref().unwrap_or("never")
    );
}

fn log_tx(log: TxLog) {
    match log {
        TxLog::Landed { record } => {
            tracing::info!(
                "{} {} on {} landed, tx hash: {}",
                record.kind,
                record.request_id,
                record.chain_id,
                record.tx_hash.unwrap_or_default()
            );
        }
        TxLog::Failed { record } => {
            tracing::error!(
                "{} {} on {} failed: {}",
                record.kind,
                record.request_id,
                record.chain_id,
                record.error.unwrap_or_default()
            );
        }
    }
}
