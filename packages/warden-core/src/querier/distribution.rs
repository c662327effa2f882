use tracing::instrument;

use super::types::RewardsResponse;
use crate::prelude::*;

impl QueryClient {
    /// Pending rewards per validator, plus the total across all of them
    #[instrument]
    pub async fn delegation_total_rewards(
        &self,
        chain: &ChainConfig,
        delegator: &Address,
    ) -> Result<RewardsResponse> {
        self.run_with_middleware(DelegationTotalRewardsReq {
            chain: chain.clone(),
            delegator: delegator.clone(),
        })
        .await
    }
}

#[derive(Clone, Debug)]
pub struct DelegationTotalRewardsReq {
    pub chain: ChainConfig,
    pub delegator: Address,
}

impl QueryRequest for DelegationTotalRewardsReq {
    type QueryResponse = RewardsResponse;

    async fn request(&self, client: QueryClient) -> Result<RewardsResponse> {
        let path = format!(
            "/cosmos/distribution/v1beta1/delegators/{}/rewards",
            self.delegator
        );
        client.get_json(&self.chain, &path, &[]).await
    }
}
