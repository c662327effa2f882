use anyhow::{bail, Result};
use clap::Subcommand;
use warden::prelude::*;

use crate::context::AppContext;

#[derive(Debug, Clone, Subcommand)]
pub enum GrantsCommand {
    /// Grants where the address is the grantee
    Received {
        /// Network name or chain id
        #[arg(long)]
        chain: String,
        /// Defaults to the signer's address
        #[arg(long)]
        address: Option<String>,
        #[arg(long)]
        limit: Option<u64>,
    },
    /// Grants where the address is the granter
    Given {
        /// Network name or chain id
        #[arg(long)]
        chain: String,
        /// Defaults to the signer's address
        #[arg(long)]
        address: Option<String>,
        #[arg(long)]
        limit: Option<u64>,
    },
}

#[derive(Debug)]
pub struct GrantsLog {
    pub direction: GrantDirection,
    pub chain_id: ChainId,
    pub address: Address,
    pub grants: Vec<Grant>,
    pub total: Option<String>,
}

impl GrantsCommand {
    pub async fn run(&self, ctx: &AppContext, log: impl Fn(GrantsLog)) -> Result<()> {
        let (direction, chain, address, limit) = match self {
            Self::Received {
                chain,
                address,
                limit,
            } => (GrantDirection::ToMe, chain, address, limit),
            Self::Given {
                chain,
                address,
                limit,
            } => (GrantDirection::ByMe, chain, address, limit),
        };

        let chain = ctx.chain(chain)?;
        let address = ctx.address_or_signer(chain, address.as_deref()).await?;
        let page = limit.map(PageRequest::with_limit);

        let controller = ctx.authz_controller();
        let state = match direction {
            GrantDirection::ToMe => {
                controller
                    .get_grants_to_me(&chain.chain_id, &address, page)
                    .await
            }
            GrantDirection::ByMe => {
                controller
                    .get_grants_by_me(&chain.chain_id, &address, page)
                    .await
            }
        };

        let Some(state) = state else {
            bail!("no {direction} grants state for {}", chain.chain_id);
        };

        if state.status == FetchStatus::Rejected {
            bail!("{}", state.error_message);
        }

        log(GrantsLog {
            direction,
            chain_id: chain.chain_id.clone(),
            address,
            grants: state.grants,
            total: state.pagination.and_then(|p| p.total),
        });

        Ok(())
    }
}
