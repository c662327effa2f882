use serde::Deserialize;
use tracing::instrument;

use super::types::{DelegationResponse, PageRequest, PageResponse};
use crate::prelude::*;

impl QueryClient {
    #[instrument]
    pub async fn delegator_delegations(
        &self,
        chain: &ChainConfig,
        delegator: &Address,
    ) -> Result<Vec<DelegationResponse>> {
        self.run_with_middleware(DelegatorDelegationsReq {
            chain: chain.clone(),
            delegator: delegator.clone(),
        })
        .await
    }
}

#[derive(Clone, Debug)]
pub struct DelegatorDelegationsReq {
    pub chain: ChainConfig,
    pub delegator: Address,
}

#[derive(Deserialize, Debug)]
struct DelegationsResp {
    #[serde(default)]
    delegation_responses: Vec<DelegationResponse>,
    #[serde(default)]
    pagination: Option<PageResponse>,
}

impl QueryRequest for DelegatorDelegationsReq {
    type QueryResponse = Vec<DelegationResponse>;

    async fn request(&self, client: QueryClient) -> Result<Vec<DelegationResponse>> {
        let path = format!("/cosmos/staking/v1beta1/delegations/{}", self.delegator);
        let mut page = Some(PageRequest::default());
        let mut delegations = Vec::new();

        while let Some(current) = page.take() {
            let resp: DelegationsResp = client
                .get_json(&self.chain, &path, &current.to_query())
                .await?;

            delegations.extend(resp.delegation_responses);

            page = resp
                .pagination
                .as_ref()
                .and_then(|pagination| current.next(pagination));
        }

        Ok(delegations)
    }
}
