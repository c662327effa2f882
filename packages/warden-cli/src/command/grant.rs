use std::time::Duration;

use anyhow::Result;
use clap::Subcommand;
use warden::{prelude::*, signing::msg::expiration_in};

use super::{settled, TxLog};
use crate::{args::FeeArgs, context::AppContext};

#[derive(Debug, Clone, Subcommand)]
pub enum GrantCommand {
    /// Let the grantee send up to a limit from the signer's account
    Send {
        /// Network name or chain id
        #[arg(long)]
        chain: String,
        #[arg(long)]
        grantee: String,
        /// Spend limit, in base units
        #[arg(long)]
        amount: u128,
        /// Defaults to the chain's native denom
        #[arg(long)]
        denom: Option<String>,
        /// Days until the grant expires, never if not set
        #[arg(long)]
        expires_in_days: Option<u64>,
        #[command(flatten)]
        fee: FeeArgs,
    },
    /// Let the grantee run any message of one type on the signer's behalf
    Generic {
        /// Network name or chain id
        #[arg(long)]
        chain: String,
        #[arg(long)]
        grantee: String,
        /// e.g. /cosmos.gov.v1beta1.MsgVote
        #[arg(long)]
        msg_type_url: String,
        /// Days until the grant expires, never if not set
        #[arg(long)]
        expires_in_days: Option<u64>,
        #[command(flatten)]
        fee: FeeArgs,
    },
}

impl GrantCommand {
    pub async fn run(&self, ctx: &AppContext, log: impl Fn(TxLog)) -> Result<()> {
        let controller = ctx.authz_controller();

        let request_id = match self {
            Self::Send {
                chain,
                grantee,
                amount,
                denom,
                expires_in_days,
                fee,
            } => {
                let chain = ctx.chain(chain)?;
                let granter = ctx.signer_address(chain).await?;
                let grantee = chain.parse_address(grantee)?;
                let spend_limit =
                    RestCoin::new(*amount, denom.as_deref().unwrap_or(&chain.denom));

                controller
                    .tx_grant_send(
                        &chain.chain_id,
                        &granter,
                        &grantee,
                        spend_limit,
                        expiration(*expires_in_days)?,
                        ctx.fee_options(chain, fee)?,
                    )
                    .await
            }
            Self::Generic {
                chain,
                grantee,
                msg_type_url,
                expires_in_days,
                fee,
            } => {
                let chain = ctx.chain(chain)?;
                let granter = ctx.signer_address(chain).await?;
                let grantee = chain.parse_address(grantee)?;

                controller
                    .tx_grant_generic(
                        &chain.chain_id,
                        &granter,
                        &grantee,
                        msg_type_url,
                        expiration(*expires_in_days)?,
                        ctx.fee_options(chain, fee)?,
                    )
                    .await
            }
        };

        log(settled(&controller, request_id)?);

        Ok(())
    }
}

fn expiration(days: Option<u64>) -> Result<Option<warden::proto::Timestamp>> {
    days.map(|days| expiration_in(Duration::from_secs(days * 24 * 60 * 60)))
        .transpose()
}
