// these do not go through request middleware since they are transaction-related
// (a retried broadcast could double-submit)

use std::time::Duration;

use base64::Engine;
use cosmwasm_std::Uint64;
use serde::{Deserialize, Serialize};

use crate::{error::NetworkError, prelude::*};

/// The subset of `cosmos.base.abci.v1beta1.TxResponse` the dashboard reads
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct TxResponse {
    #[serde(default)]
    pub height: Uint64,
    pub txhash: String,
    #[serde(default)]
    pub codespace: String,
    #[serde(default)]
    pub code: u32,
    #[serde(default)]
    pub raw_log: String,
    #[serde(default)]
    pub gas_wanted: Uint64,
    #[serde(default)]
    pub gas_used: Uint64,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct GasInfo {
    #[serde(default)]
    pub gas_wanted: Uint64,
    #[serde(default)]
    pub gas_used: Uint64,
}

#[derive(Serialize, Debug)]
struct TxBytesBody<'a> {
    tx_bytes: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    mode: Option<&'a str>,
}

#[derive(Deserialize, Debug)]
struct SimulateResp {
    gas_info: Option<GasInfo>,
}

#[derive(Deserialize, Debug)]
struct TxResponseWrapper {
    tx_response: Option<TxResponse>,
}

impl QueryClient {
    pub async fn simulate_tx(&self, chain: &ChainConfig, tx_bytes: &[u8]) -> Result<GasInfo> {
        let body = TxBytesBody {
            tx_bytes: base64::engine::general_purpose::STANDARD.encode(tx_bytes),
            mode: None,
        };

        let resp: SimulateResp = self
            .post_json(chain, "/cosmos/tx/v1beta1/simulate", &body)
            .await
            .context("couldn't simulate tx")?;

        resp.gas_info.context("unable to get gas from simulation")
    }

    pub async fn broadcast_tx_bytes(
        &self,
        chain: &ChainConfig,
        tx_bytes: &[u8],
        mode: warden_proto::tx::BroadcastMode,
    ) -> Result<TxResponse> {
        let body = TxBytesBody {
            tx_bytes: base64::engine::general_purpose::STANDARD.encode(tx_bytes),
            mode: Some(mode.as_str_name()),
        };

        let resp: TxResponseWrapper = self
            .post_json(chain, "/cosmos/tx/v1beta1/txs", &body)
            .await
            .context("couldn't broadcast tx")?;

        resp.tx_response.context("broadcast returned no tx_response")
    }

    /// Looks a tx up by hash, `None` while the node doesn't know it yet
    pub async fn get_tx(&self, chain: &ChainConfig, tx_hash: &str) -> Result<Option<TxResponse>> {
        let path = format!("/cosmos/tx/v1beta1/txs/{tx_hash}");

        match self.get_json::<TxResponseWrapper>(chain, &path, &[]).await {
            Ok(resp) => Ok(resp.tx_response),
            Err(e) if is_tx_not_found(&e) => Ok(None),
            Err(e) => {
                tracing::debug!("failed GetTx for {tx_hash}. Full error: {e:?}");
                Err(e)
            }
        }
    }

    #[tracing::instrument]
    pub async fn poll_until_tx_ready(
        &self,
        chain: &ChainConfig,
        tx_hash: &str,
        sleep_duration: Duration,
        timeout_duration: Duration,
    ) -> Result<TxResponse> {
        let mut total_duration = Duration::default();

        loop {
            if let Some(tx_response) = self.get_tx(chain, tx_hash).await? {
                return Ok(tx_response);
            }

            futures_timer::Delay::new(sleep_duration).await;
            total_duration += sleep_duration;
            if total_duration >= timeout_duration {
                return Err(NetworkError::Timeout(format!("tx {tx_hash}")).into());
            }
        }
    }
}

// nodes answer an unknown hash with a 404, older ones with a 400 and "tx not found"
fn is_tx_not_found(err: &anyhow::Error) -> bool {
    match err.downcast_ref::<NetworkError>() {
        Some(NetworkError::Rest {
            status, message, ..
        }) => *status == 404 || message.to_lowercase().contains("not found"),
        _ => false,
    }
}
