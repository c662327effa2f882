use std::sync::Arc;

use async_trait::async_trait;
use warden_address::{direct_signer_info, ConfigAddressExt, TxSigner};

use crate::{
    error::TransactionError,
    prelude::*,
    querier::auth::AccountInfo,
    signing::{BroadcastRequest, BroadcastResponse, Broadcaster, GasLimit},
};

/// `Broadcaster` over the REST tx service, signing in direct mode with a `TxSigner`
///
/// The sender is whichever account the signer's public key maps to on the target chain,
/// so one instance serves every configured chain.
#[derive(Clone)]
pub struct RestBroadcaster {
    pub querier: QueryClient,
    pub signer: Arc<dyn TxSigner>,

    /// The broadcast mode to use. Default is `Sync`
    pub broadcast_mode: warden_proto::tx::BroadcastMode,

    /// Whether broadcasting should poll for the tx landing on chain before returning
    /// default is true. Polling cadence and timeout come from the querier
    pub broadcast_poll: bool,
}

impl std::fmt::Debug for RestBroadcaster {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestBroadcaster")
            .field("broadcast_mode", &self.broadcast_mode)
            .field("broadcast_poll", &self.broadcast_poll)
            .finish()
    }
}

impl RestBroadcaster {
    const DEFAULT_BROADCAST_MODE: warden_proto::tx::BroadcastMode =
        warden_proto::tx::BroadcastMode::Sync;

    pub fn new(querier: QueryClient, signer: impl TxSigner + 'static) -> Self {
        Self::new_shared(querier, Arc::new(signer))
    }

    pub fn new_shared(querier: QueryClient, signer: Arc<dyn TxSigner>) -> Self {
        Self {
            querier,
            signer,
            broadcast_mode: Self::DEFAULT_BROADCAST_MODE,
            broadcast_poll: true,
        }
    }

    pub fn set_broadcast_poll(&mut self, broadcast_poll: bool) -> &mut Self {
        self.broadcast_poll = broadcast_poll;
        self
    }

    /// The signing account on `chain`
    pub async fn sender(&self, chain: &ChainConfig) -> Result<Address> {
        Ok(chain.address_from_pub_key(&self.signer.public_key().await?)?)
    }

    pub async fn simulate_gas(
        &self,
        chain: &ChainConfig,
        account: &AccountInfo,
        body: &warden_proto::tx::TxBody,
    ) -> Result<u64> {
        let fee = FeeCalculation::Simulation { chain_config: chain }.calculate(None)?;

        let tx_bytes = self
            .sign_tx(chain, account, body, fee, true)
            .await?;

        let gas_info = self.querier.simulate_tx(chain, &tx_bytes).await?;

        Ok(gas_info.gas_used.u64())
    }

    async fn sign_tx(
        &self,
        chain: &ChainConfig,
        account: &AccountInfo,
        body: &warden_proto::tx::TxBody,
        fee: warden_proto::tx::Fee,
        simulate_only: bool,
    ) -> Result<Vec<u8>> {
        let signer_info =
            direct_signer_info(self.signer.public_key_as_proto().await?, account.sequence);

        #[allow(deprecated)]
        let auth_info = warden_proto::tx::AuthInfo {
            signer_infos: vec![signer_info],
            fee: Some(fee),
            tip: None,
        };

        let sign_doc = warden_proto::tx::SignDoc {
            body_bytes: proto_into_bytes(body)?,
            auth_info_bytes: proto_into_bytes(&auth_info)?,
            chain_id: chain.chain_id.to_string(),
            account_number: account.account_number,
        };

        let signature = match simulate_only {
            true => Vec::new(),
            false => self
                .signer
                .sign(&sign_doc)
                .await
                .map_err(|e| TransactionError::SigningFailed(format!("{e:#}")))?,
        };

        let tx_raw = warden_proto::tx::TxRaw {
            body_bytes: sign_doc.body_bytes,
            auth_info_bytes: sign_doc.auth_info_bytes,
            signatures: vec![signature],
        };

        proto_into_bytes(&tx_raw)
    }
}

#[async_trait]
impl Broadcaster for RestBroadcaster {
    async fn sign_and_broadcast(&self, req: BroadcastRequest) -> Result<BroadcastResponse> {
        let BroadcastRequest {
            chain,
            messages,
            gas,
            memo,
            fee,
            fee_granter,
        } = req;

        if messages.is_empty() {
            return Err(TransactionError::BuildFailed("no messages".to_string()).into());
        }

        let sender = self.sender(&chain).await?;
        let account = self.querier.base_account(&chain, &sender).await?;

        tracing::debug!(
            "{} is using sequence {} (account number {})",
            sender,
            account.sequence,
            account.account_number
        );

        let body = warden_proto::tx::TxBody {
            messages,
            memo,
            timeout_height: 0,
            extension_options: Default::default(),
            non_critical_extension_options: Default::default(),
        };

        let gas_units = match gas {
            GasLimit::Fixed(gas_units) => gas_units,
            GasLimit::Simulate { multiplier } => {
                let gas_used = self.simulate_gas(&chain, &account, &body).await?;
                (gas_used as f64 * multiplier as f64).ceil() as u64
            }
        };

        let fee = match fee {
            Some(gas_coin) => FeeCalculation::RealCoin {
                gas_coin,
                gas_units,
            },
            None => FeeCalculation::RealNetwork {
                chain_config: &chain,
                gas_units,
            },
        }
        .calculate(fee_granter.as_ref())?;

        let tx_bytes = self.sign_tx(&chain, &account, &body, fee, false).await?;

        let tx_response = self
            .querier
            .broadcast_tx_bytes(&chain, &tx_bytes, self.broadcast_mode)
            .await
            .map_err(|e| TransactionError::BroadcastFailed(format!("{e:#}")))?;

        tracing::info!(
            "broadcast {} on {}: code {}",
            tx_response.txhash,
            chain.chain_id,
            tx_response.code
        );

        // rejected at check-tx, it will never land
        if tx_response.code != 0 || !self.broadcast_poll {
            return Ok(tx_response.into());
        }

        let tx_response = self
            .querier
            .poll_until_tx_ready(
                &chain,
                &tx_response.txhash,
                self.querier.tx_poll_sleep_duration,
                self.querier.tx_poll_timeout_duration,
            )
            .await?;

        Ok(tx_response.into())
    }
}

pub enum FeeCalculation<'a> {
    Simulation {
        chain_config: &'a ChainConfig,
    },
    RealNetwork {
        chain_config: &'a ChainConfig,
        gas_units: u64,
    },
    RealCoin {
        gas_coin: warden_proto::Coin,
        gas_units: u64,
    },
}

impl FeeCalculation<'_> {
    pub fn calculate(&self, granter: Option<&Address>) -> Result<warden_proto::tx::Fee> {
        let (gas_coin, gas_limit) = match self {
            Self::Simulation { chain_config } => (new_coin(0, &chain_config.denom), 0),
            Self::RealNetwork {
                chain_config,
                gas_units,
            } => (
                new_coin(chain_config.fee_for_gas(*gas_units), &chain_config.denom),
                *gas_units,
            ),
            Self::RealCoin {
                gas_coin,
                gas_units,
            } => (gas_coin.clone(), *gas_units),
        };

        Ok(warden_proto::tx::Fee {
            amount: vec![gas_coin],
            gas_limit,
            payer: "".to_string(),
            granter: granter.map(|g| g.to_string()).unwrap_or_default(),
        })
    }
}
