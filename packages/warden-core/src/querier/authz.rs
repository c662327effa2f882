use async_trait::async_trait;
use tracing::instrument;

use super::{
    types::{GrantsPage, PageRequest},
    AuthzQuerier, GrantDirection,
};
use crate::prelude::*;

impl QueryClient {
    #[instrument]
    pub async fn grants_to_me(
        &self,
        chain: &ChainConfig,
        grantee: &Address,
        page: Option<PageRequest>,
    ) -> Result<GrantsPage> {
        self.run_with_middleware(GrantsReq {
            chain: chain.clone(),
            direction: GrantDirection::ToMe,
            address: grantee.clone(),
            page,
        })
        .await
    }

    #[instrument]
    pub async fn grants_by_me(
        &self,
        chain: &ChainConfig,
        granter: &Address,
        page: Option<PageRequest>,
    ) -> Result<GrantsPage> {
        self.run_with_middleware(GrantsReq {
            chain: chain.clone(),
            direction: GrantDirection::ByMe,
            address: granter.clone(),
            page,
        })
        .await
    }
}

#[async_trait]
impl AuthzQuerier for QueryClient {
    async fn grants(
        &self,
        chain: &ChainConfig,
        direction: GrantDirection,
        address: &Address,
        page: Option<PageRequest>,
    ) -> Result<GrantsPage> {
        match direction {
            GrantDirection::ToMe => self.grants_to_me(chain, address, page).await,
            GrantDirection::ByMe => self.grants_by_me(chain, address, page).await,
        }
    }
}

#[derive(Clone, Debug)]
pub struct GrantsReq {
    pub chain: ChainConfig,
    pub direction: GrantDirection,
    pub address: Address,
    pub page: Option<PageRequest>,
}

impl GrantsReq {
    pub fn path(&self) -> String {
        let side = match self.direction {
            GrantDirection::ToMe => "grantee",
            GrantDirection::ByMe => "granter",
        };
        format!("/cosmos/authz/v1beta1/grants/{side}/{}", self.address)
    }
}

impl QueryRequest for GrantsReq {
    type QueryResponse = GrantsPage;

    async fn request(&self, client: QueryClient) -> Result<GrantsPage> {
        let query = self
            .page
            .as_ref()
            .map(PageRequest::to_query)
            .unwrap_or_default();

        client.get_json(&self.chain, &self.path(), &query).await
    }
}
