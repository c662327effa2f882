use anyhow::{Context, Result};
use clap::Args;
use warden::{overview, prelude::*};

use crate::context::AppContext;

#[derive(Debug, Clone, Args)]
pub struct OverviewCommand {
    /// Any bech32 address of the account, re-encoded per chain. Defaults to the signer
    #[arg(long)]
    pub address: Option<String>,
    /// Network names, defaults to `overview_chains` from the config
    #[arg(long, value_delimiter = ',')]
    pub chains: Vec<String>,
}

#[derive(Debug)]
pub enum OverviewLog {
    Row(ChainRow),
    Failed { chain_id: ChainId, error: String },
    Totals(OverviewTotals),
}

impl OverviewCommand {
    pub async fn run(&self, ctx: &AppContext, log: impl Fn(OverviewLog)) -> Result<()> {
        let networks = &ctx.config.networks;

        let chain_ids = match self.chains.is_empty() {
            true => ctx.config.overview_chains.clone(),
            false => self
                .chains
                .iter()
                .map(|name| ctx.chain(name).map(|chain| chain.chain_id.clone()))
                .collect::<Result<Vec<_>>>()?,
        };

        let address = match &self.address {
            Some(address) => Address::new_str(address, None)?,
            None => {
                let first = chain_ids.first().context("no chains to load")?;
                ctx.signer_address(networks.get(first)?).await?
            }
        };

        let controller = ctx.portfolio_controller();
        controller.load(&chain_ids, &address).await;

        let state = controller.store.snapshot();

        for chain_id in &chain_ids {
            let Some(portfolio) = state.chain(chain_id) else {
                continue;
            };
            for error in [
                &portfolio.balances.error_message,
                &portfolio.delegations.error_message,
                &portfolio.rewards.error_message,
            ] {
                if !error.is_empty() {
                    log(OverviewLog::Failed {
                        chain_id: chain_id.clone(),
                        error: error.clone(),
                    });
                }
            }
        }

        for row in overview::chain_rows(&state, networks, &chain_ids, &ctx.config.prices) {
            log(OverviewLog::Row(row));
        }

        log(OverviewLog::Totals(overview::totals(
            &state,
            networks,
            &chain_ids,
            &ctx.config.prices,
        )));

        Ok(())
    }
}
