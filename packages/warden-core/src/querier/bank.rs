use serde::Deserialize;
use tracing::instrument;

use super::types::{PageRequest, PageResponse, RestCoin};
use crate::prelude::*;

impl QueryClient {
    /// Every balance of the address, walking all pages
    #[instrument]
    pub async fn all_balances(&self, chain: &ChainConfig, addr: &Address) -> Result<Vec<RestCoin>> {
        self.run_with_middleware(AllBalancesReq {
            chain: chain.clone(),
            addr: addr.clone(),
            limit_per_page: None,
        })
        .await
    }

    /// Balance in the chain's native denom, zero if the account holds none
    #[instrument]
    pub async fn native_balance(&self, chain: &ChainConfig, addr: &Address) -> Result<RestCoin> {
        let balances = self.all_balances(chain, addr).await?;

        Ok(balances
            .into_iter()
            .find(|coin| coin.denom == chain.denom)
            .unwrap_or_else(|| RestCoin::new(0u128, &chain.denom)))
    }
}

#[derive(Clone, Debug)]
pub struct AllBalancesReq {
    pub chain: ChainConfig,
    pub addr: Address,
    pub limit_per_page: Option<u64>,
}

#[derive(Deserialize, Debug)]
struct BalancesResp {
    #[serde(default)]
    balances: Vec<RestCoin>,
    #[serde(default)]
    pagination: Option<PageResponse>,
}

impl QueryRequest for AllBalancesReq {
    type QueryResponse = Vec<RestCoin>;

    async fn request(&self, client: QueryClient) -> Result<Vec<RestCoin>> {
        let path = format!("/cosmos/bank/v1beta1/balances/{}", self.addr);
        let mut page = Some(PageRequest::with_limit(
            self.limit_per_page
                .unwrap_or(client.balances_pagination_limit),
        ));

        let mut coins = Vec::new();

        while let Some(current) = page.take() {
            let resp: BalancesResp = client
                .get_json(&self.chain, &path, &current.to_query())
                .await?;

            coins.extend(resp.balances);

            page = resp
                .pagination
                .as_ref()
                .and_then(|pagination| current.next(pagination));
        }

        Ok(coins)
    }
}
