use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;
use serde_json::Value;

use super::{settled, TxLog};
use crate::{args::FeeArgs, context::AppContext};

#[derive(Debug, Clone, Args)]
pub struct ExecCommand {
    /// Network name or chain id
    #[arg(long)]
    pub chain: String,
    /// The operation, e.g. '{"type": "vote", "granter": "cosmos1...", "proposal_id": 12, "option": "yes"}'
    #[arg(long, conflicts_with = "file", required_unless_present = "file")]
    pub json: Option<String>,
    /// Read the operation from a JSON file instead
    #[arg(long)]
    pub file: Option<PathBuf>,
    #[command(flatten)]
    pub fee: FeeArgs,
}

impl ExecCommand {
    pub async fn run(&self, ctx: &AppContext, log: impl Fn(TxLog)) -> Result<()> {
        let payload = match (&self.json, &self.file) {
            (Some(json), _) => json.clone(),
            (None, Some(file)) => tokio::fs::read_to_string(file)
                .await
                .with_context(|| format!("couldn't read {}", file.display()))?,
            (None, None) => bail!("either --json or --file is required"),
        };

        let value: Value = serde_json::from_str(&payload).context("operation is not valid json")?;

        let chain = ctx.chain(&self.chain)?;
        // the signer executes as grantee
        let grantee = ctx.signer_address(chain).await?;

        let controller = ctx.authz_controller();

        match controller
            .exec_value(
                &chain.chain_id,
                &grantee,
                value,
                ctx.fee_options(chain, &self.fee)?,
            )
            .await
        {
            Some(request_id) => {
                log(settled(&controller, request_id)?);
                Ok(())
            }
            None => {
                let alert = controller
                    .store
                    .with_state(|state| state.current_notification().map(|n| n.message.clone()))
                    .unwrap_or_default();
                bail!("{alert}")
            }
        }
    }
}
