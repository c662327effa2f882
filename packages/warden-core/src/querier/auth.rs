use cosmwasm_std::Uint64;
use serde::Deserialize;
use serde_json::Value;
use tracing::instrument;

use crate::prelude::*;

/// The parts of an account a signer needs
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AccountInfo {
    pub address: Address,
    pub account_number: u64,
    pub sequence: u64,
}

impl QueryClient {
    #[instrument]
    pub async fn base_account(&self, chain: &ChainConfig, addr: &Address) -> Result<AccountInfo> {
        self.run_with_middleware(BaseAccountReq {
            chain: chain.clone(),
            addr: addr.clone(),
        })
        .await
    }
}

#[derive(Clone, Debug)]
pub struct BaseAccountReq {
    pub chain: ChainConfig,
    pub addr: Address,
}

#[derive(Deserialize, Debug)]
struct AccountResp {
    account: Value,
}

#[derive(Deserialize)]
struct BaseAccountJson {
    address: Address,
    #[serde(default)]
    account_number: Uint64,
    #[serde(default)]
    sequence: Uint64,
}

impl QueryRequest for BaseAccountReq {
    type QueryResponse = AccountInfo;

    async fn request(&self, client: QueryClient) -> Result<AccountInfo> {
        let path = format!("/cosmos/auth/v1beta1/accounts/{}", self.addr);
        let resp: AccountResp = client.get_json(&self.chain, &path, &[]).await?;

        account_from_json(&resp.account)
            .with_context(|| format!("unable to read account {}", self.addr))
    }
}

/// Finds the base account in plain, vesting, and module account encodings
pub fn account_from_json(account: &Value) -> Result<AccountInfo> {
    let base = [
        Some(account),
        account.get("base_account"),
        account
            .get("base_vesting_account")
            .and_then(|v| v.get("base_account")),
    ]
    .into_iter()
    .flatten()
    .find(|candidate| candidate.get("address").is_some())
    .ok_or_else(|| anyhow!("no base account in {account}"))?;

    let base: BaseAccountJson = serde_json::from_value(base.clone())?;

    Ok(AccountInfo {
        address: base.address,
        account_number: base.account_number.u64(),
        sequence: base.sequence.u64(),
    })
}

#[cfg(test)]
mod test {
    use super::account_from_json;
    use serde_json::json;

    const ADDR: &str = "osmo1h5qke5tzc0fgz93wcxg8da2en3advfect0gh4a";

    #[test]
    fn plain_account() {
        let account = account_from_json(&json!({
            "@type": "/cosmos.auth.v1beta1.BaseAccount",
            "address": ADDR,
            "pub_key": null,
            "account_number": "42",
            "sequence": "7"
        }))
        .unwrap();

        assert_eq!(account.account_number, 42);
        assert_eq!(account.sequence, 7);
    }

    #[test]
    fn vesting_account() {
        let account = account_from_json(&json!({
            "@type": "/cosmos.vesting.v1beta1.ContinuousVestingAccount",
            "base_vesting_account": {
                "base_account": {
                    "address": ADDR,
                    "account_number": "3",
                    "sequence": "0"
                },
                "original_vesting": []
            },
            "start_time": "0"
        }))
        .unwrap();

        assert_eq!(account.account_number, 3);
        assert_eq!(account.address.to_string(), ADDR);
    }

    #[test]
    fn missing_account() {
        assert!(account_from_json(&json!({"@type": "/weird"})).is_err());
    }
}
