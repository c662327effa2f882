pub mod auth;
pub mod authz;
pub mod bank;
pub mod distribution;
pub mod middleware;
pub mod staking;
pub mod tx;
pub mod types;

use std::{future::Future, sync::Arc, time::Duration};

use async_trait::async_trait;
use middleware::{QueryMiddlewareMapReq, QueryMiddlewareMapResp, QueryMiddlewareRun};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use types::{DelegationResponse, GrantsPage, PageRequest, RestCoin, RewardsResponse};

use crate::{cache::WardenCache, error::NetworkError, prelude::*};

/// Which side of a grant the queried address is on
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum GrantDirection {
    /// grants where the address is the grantee ("grants received")
    ToMe,
    /// grants where the address is the granter ("grants given")
    ByMe,
}

impl std::fmt::Display for GrantDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ToMe => write!(f, "to_me"),
            Self::ByMe => write!(f, "by_me"),
        }
    }
}

/// Grant lookups, as consumed by the authz controller
#[async_trait]
pub trait AuthzQuerier: Send + Sync {
    async fn grants(
        &self,
        chain: &ChainConfig,
        direction: GrantDirection,
        address: &Address,
        page: Option<PageRequest>,
    ) -> Result<GrantsPage>;
}

/// Account holdings, as consumed by the overview
#[async_trait]
pub trait PortfolioQuerier: Send + Sync {
    async fn balances(&self, chain: &ChainConfig, address: &Address) -> Result<Vec<RestCoin>>;
    async fn delegations(
        &self,
        chain: &ChainConfig,
        address: &Address,
    ) -> Result<Vec<DelegationResponse>>;
    async fn rewards(&self, chain: &ChainConfig, address: &Address) -> Result<RewardsResponse>;
}

/// REST (LCD) client
///
/// Not bound to any one chain, every request carries the `ChainConfig` it targets.
/// Cloning is cheap, the http pool and middleware are shared.
#[derive(Clone)]
pub struct QueryClient {
    pub cache: WardenCache,
    pub middleware_map_req: Arc<Vec<QueryMiddlewareMapReq>>,
    pub middleware_map_resp: Arc<Vec<QueryMiddlewareMapResp>>,
    pub middleware_run: Arc<Vec<QueryMiddlewareRun>>,
    pub balances_pagination_limit: u64,
    pub tx_poll_sleep_duration: Duration,
    pub tx_poll_timeout_duration: Duration,
}

impl std::fmt::Debug for QueryClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryClient")
            .field("middleware_run", &self.middleware_run.len())
            .finish()
    }
}

pub trait QueryRequest: Clone + std::fmt::Debug + Send + Sync {
    type QueryResponse: std::fmt::Debug + Send;

    fn request(
        &self,
        client: QueryClient,
    ) -> impl Future<Output = Result<Self::QueryResponse>> + Send;
}

const DEFAULT_BALANCES_PAGINATION_LIMIT: u64 = 100;
const DEFAULT_TX_POLL_SLEEP_DURATION: Duration = Duration::from_secs(1);
const DEFAULT_TX_POLL_TIMEOUT_DURATION: Duration = Duration::from_secs(30);

impl Default for QueryClient {
    fn default() -> Self {
        Self::new()
    }
}

impl QueryClient {
    pub fn new() -> Self {
        Self::new_with_cache(WardenCache::default())
    }

    pub fn new_with_cache(cache: WardenCache) -> Self {
        Self {
            cache,
            middleware_map_req: Arc::new(QueryMiddlewareMapReq::default_list()),
            middleware_map_resp: Arc::new(QueryMiddlewareMapResp::default_list()),
            middleware_run: Arc::new(QueryMiddlewareRun::default_list()),
            balances_pagination_limit: DEFAULT_BALANCES_PAGINATION_LIMIT,
            tx_poll_sleep_duration: DEFAULT_TX_POLL_SLEEP_DURATION,
            tx_poll_timeout_duration: DEFAULT_TX_POLL_TIMEOUT_DURATION,
        }
    }

    pub fn with_middleware_run(mut self, middleware: Vec<QueryMiddlewareRun>) -> Self {
        self.middleware_run = Arc::new(middleware);
        self
    }

    pub fn with_tx_polling(mut self, sleep: Duration, timeout: Duration) -> Self {
        self.tx_poll_sleep_duration = sleep;
        self.tx_poll_timeout_duration = timeout;
        self
    }

    pub async fn run_with_middleware<REQ: QueryRequest>(
        &self,
        mut req: REQ,
    ) -> Result<REQ::QueryResponse> {
        for middleware in self.middleware_map_req.iter() {
            req = middleware.map_req(req.clone()).await?;
        }

        let mut response = None;

        for middleware in self.middleware_run.iter() {
            response = Some(middleware.run(req.clone(), self.clone()).await?);
        }

        let mut response = match response {
            Some(response) => response,
            None => req.request(self.clone()).await?,
        };

        for middleware in self.middleware_map_resp.iter() {
            response = middleware.map_resp(response).await?;
        }

        Ok(response)
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        chain: &ChainConfig,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        let url = rest_url(&chain.rest_endpoint, path)?;

        let resp = self
            .cache
            .get_http_client()
            .get(url.clone())
            .query(query)
            .send()
            .await
            .with_context(|| format!("GET {url}"))?;

        read_json(url, resp).await
    }

    pub(crate) async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        chain: &ChainConfig,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let url = rest_url(&chain.rest_endpoint, path)?;

        let resp = self
            .cache
            .get_http_client()
            .post(url.clone())
            .json(body)
            .send()
            .await
            .with_context(|| format!("POST {url}"))?;

        read_json(url, resp).await
    }
}

async fn read_json<T: DeserializeOwned>(url: url::Url, resp: reqwest::Response) -> Result<T> {
    let status = resp.status();

    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(NetworkError::rest(url, status.as_u16(), rest_error_message(&body)).into());
    }

    resp.json::<T>()
        .await
        .with_context(|| format!("unable to parse response from {url}"))
}

// cosmos gateways answer errors as {"code": 5, "message": "...", "details": []}
fn rest_error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| value.get("message")?.as_str().map(str::to_string))
        .unwrap_or_else(|| body.to_string())
}

#[async_trait]
impl PortfolioQuerier for QueryClient {
    async fn balances(&self, chain: &ChainConfig, address: &Address) -> Result<Vec<RestCoin>> {
        self.all_balances(chain, address).await
    }

    async fn delegations(
        &self,
        chain: &ChainConfig,
        address: &Address,
    ) -> Result<Vec<DelegationResponse>> {
        self.delegator_delegations(chain, address).await
    }

    async fn rewards(&self, chain: &ChainConfig, address: &Address) -> Result<RewardsResponse> {
        self.delegation_total_rewards(chain, address).await
    }
}

#[cfg(test)]
mod test {
    use super::rest_error_message;

    #[test]
    fn error_message_from_gateway_body() {
        assert_eq!(
            rest_error_message(r#"{"code":5,"message":"account not found","details":[]}"#),
            "account not found"
        );
        assert_eq!(rest_error_message("bad gateway"), "bad gateway");
    }
}
