use std::{sync::Arc, time::Duration};

use anyhow::{Context, Result};
use async_trait::async_trait;
use warden::prelude::*;

use crate::{
    args::{CliArgs, FeeArgs},
    config::Config,
    signer::CommandSigner,
};

pub struct AppContext {
    pub args: CliArgs,
    pub config: Config,
    pub cache: WardenCache,
}

impl AppContext {
    const TX_POLL_SLEEP: Duration = Duration::from_secs(1);

    // Getting a context requires parsing the args and loading the config first
    pub fn new(args: CliArgs, config: Config) -> Self {
        Self {
            args,
            config,
            cache: WardenCache::default(),
        }
    }

    pub fn query_client(&self) -> QueryClient {
        QueryClient::new_with_cache(self.cache.clone())
            .with_tx_polling(Self::TX_POLL_SLEEP, self.config.tx_poll_timeout)
    }

    /// Looks a chain up by network name first, then by chain id
    pub fn chain(&self, name_or_id: &str) -> Result<&ChainConfig> {
        let chain_id = self
            .config
            .networks
            .id_of(name_or_id)
            .cloned()
            .unwrap_or_else(|| ChainId::new(name_or_id));

        Ok(self.config.networks.get(&chain_id)?)
    }

    pub fn signer(&self) -> Result<CommandSigner> {
        let config = self
            .config
            .signer
            .as_ref()
            .context("no signer configured, set [signer] in the config or WARDEN_SIGNER_COMMAND")?;

        CommandSigner::new(config)
    }

    pub async fn signer_address(&self, chain: &ChainConfig) -> Result<Address> {
        Ok(chain.address_from_pub_key(&self.signer()?.public_key().await?)?)
    }

    /// The given address on `chain`, or the signer's if none is given
    pub async fn address_or_signer(
        &self,
        chain: &ChainConfig,
        address: Option<&str>,
    ) -> Result<Address> {
        match address {
            Some(address) => Ok(chain.parse_address(address)?),
            None => self.signer_address(chain).await,
        }
    }

    pub fn authz_controller(&self) -> AuthzController {
        let broadcaster: Arc<dyn Broadcaster> = match self.signer() {
            Ok(signer) => Arc::new(RestBroadcaster::new(self.query_client(), signer)),
            Err(_) => Arc::new(Unsigned),
        };

        AuthzController::new(
            self.config.networks.clone(),
            Arc::new(self.query_client()),
            broadcaster,
        )
        .with_gas_table(self.config.gas.clone())
    }

    pub fn portfolio_controller(&self) -> PortfolioController {
        PortfolioController::new(self.config.networks.clone(), Arc::new(self.query_client()))
    }

    pub fn fee_options(&self, chain: &ChainConfig, fee: &FeeArgs) -> Result<FeeOptions> {
        Ok(FeeOptions {
            fee_amount: fee.fee_amount,
            fee_granter: FeeOptions::parse_fee_granter(chain, fee.fee_granter.as_deref())?,
            gas: match (fee.gas_limit, fee.simulate) {
                (Some(gas_limit), _) => Some(GasLimit::Fixed(gas_limit)),
                (None, Some(multiplier)) => Some(GasLimit::Simulate { multiplier }),
                (None, None) => None,
            },
        })
    }
}

// stands in when no signer is configured, so read-only commands still work
struct Unsigned;

#[async_trait]
impl Broadcaster for Unsigned {
    async fn sign_and_broadcast(&self, _req: BroadcastRequest) -> Result<BroadcastResponse> {
        anyhow::bail!("no signer configured, set [signer] in the config or WARDEN_SIGNER_COMMAND")
    }
}
