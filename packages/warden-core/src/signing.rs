pub mod msg;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::prelude::*;

/// How the gas limit of a transaction is decided
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum GasLimit {
    Fixed(u64),
    /// run a simulation first and scale the gas it used
    Simulate { multiplier: f32 },
}

impl GasLimit {
    pub const DEFAULT_SIMULATE_MULTIPLIER: f32 = 1.5;

    pub fn simulate() -> Self {
        Self::Simulate {
            multiplier: Self::DEFAULT_SIMULATE_MULTIPLIER,
        }
    }
}

/// Everything needed to get a list of messages on chain
#[derive(Clone, Debug)]
pub struct BroadcastRequest {
    pub chain: ChainConfig,
    pub messages: Vec<warden_proto::Any>,
    pub gas: GasLimit,
    pub memo: String,
    /// `None` means the fee is derived from the chain's gas price once the limit is known
    pub fee: Option<warden_proto::Coin>,
    pub fee_granter: Option<Address>,
}

/// Outcome of a broadcast that reached the chain
///
/// A non-zero `code` is a protocol failure, the reason is in `raw_log`
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct BroadcastResponse {
    pub code: u32,
    pub transaction_hash: String,
    pub raw_log: String,
}

impl BroadcastResponse {
    pub fn is_success(&self) -> bool {
        self.code == 0
    }
}

impl From<crate::querier::tx::TxResponse> for BroadcastResponse {
    fn from(resp: crate::querier::tx::TxResponse) -> Self {
        Self {
            code: resp.code,
            transaction_hash: resp.txhash,
            raw_log: resp.raw_log,
        }
    }
}

/// Signs and submits transactions
///
/// Errors are local faults (building, signing, network), a transaction the chain
/// rejected comes back as `Ok` with a non-zero code.
#[async_trait]
pub trait Broadcaster: Send + Sync {
    async fn sign_and_broadcast(&self, req: BroadcastRequest) -> Result<BroadcastResponse>;
}
