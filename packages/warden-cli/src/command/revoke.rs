use anyhow::Result;
use clap::Args;
use warden::prelude::*;

use super::{settled, TxLog};
use crate::{args::FeeArgs, context::AppContext};

#[derive(Debug, Clone, Args)]
pub struct RevokeCommand {
    /// Network name or chain id
    #[arg(long)]
    pub chain: String,
    #[arg(long)]
    pub grantee: String,
    /// The message type the grant covers, e.g. /cosmos.bank.v1beta1.MsgSend
    #[arg(long)]
    pub msg_type_url: String,
    #[command(flatten)]
    pub fee: FeeArgs,
}

impl RevokeCommand {
    /// Revokes, then lists what the signer still grants on that chain
    pub async fn run(
        &self,
        ctx: &AppContext,
        log: impl Fn(TxLog),
        remaining: impl Fn(&[Grant]),
    ) -> Result<()> {
        let chain = ctx.chain(&self.chain)?;
        let granter = ctx.signer_address(chain).await?;
        let grantee = chain.parse_address(&self.grantee)?;

        let controller = ctx.authz_controller();
        let request_id = controller
            .tx_revoke(
                &chain.chain_id,
                &granter,
                &grantee,
                &self.msg_type_url,
                ctx.fee_options(chain, &self.fee)?,
            )
            .await;

        let result = settled(&controller, request_id)?;
        let landed = matches!(result, TxLog::Landed { .. });
        log(result);

        // the controller refreshed "grants given" after a successful revoke
        if landed {
            controller.store.with_state(|state| {
                if let Some(given) = state.fetch_state(GrantDirection::ByMe, &chain.chain_id) {
                    remaining(&given.grants);
                }
            });
        }

        Ok(())
    }
}
