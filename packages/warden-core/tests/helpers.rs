#![allow(dead_code)]

use std::{
    collections::{BTreeMap, BTreeSet},
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
};

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use axum::Router;
use warden_address::{Address, PublicKey, TxSigner};
use warden_config::{ChainConfig, ChainId};
use warden_core::{
    prelude::*,
    querier::types::{DelegationResponse, RewardsResponse},
};

pub fn cosmoshub() -> ChainConfig {
    ChainConfig {
        chain_id: ChainId::new("cosmoshub-4"),
        name: "cosmoshub".to_string(),
        rest_endpoint: "https://rest.cosmos.directory/cosmoshub".to_string(),
        address_prefix: "cosmos".to_string(),
        denom: "uatom".to_string(),
        decimals: 6,
        gas_price: 0.025,
    }
}

pub fn osmosis() -> ChainConfig {
    ChainConfig {
        chain_id: ChainId::new("osmosis-1"),
        name: "osmosis".to_string(),
        rest_endpoint: "https://lcd.osmosis.zone".to_string(),
        address_prefix: "osmo".to_string(),
        denom: "uosmo".to_string(),
        decimals: 6,
        gas_price: 0.0025,
    }
}

pub fn addr(n: u8) -> Address {
    Address::new_bytes(vec![n; 20], "cosmos").unwrap()
}

pub fn valoper(n: u8) -> Address {
    Address::new_bytes(vec![n; 20], "cosmosvaloper").unwrap()
}

pub fn generic_grants(n: usize) -> GrantsPage {
    GrantsPage {
        grants: (0..n)
            .map(|_| Grant {
                granter: addr(1),
                grantee: addr(2),
                authorization: Authorization::generic("/cosmos.gov.v1beta1.MsgVote"),
                expiration: None,
            })
            .collect(),
        pagination: None,
    }
}

/// Answers grant queries from a fixed table and counts the calls
#[derive(Default)]
pub struct MockAuthzQuerier {
    pub pages: Mutex<BTreeMap<(ChainId, GrantDirection), Result<GrantsPage, String>>>,
    pub calls: Mutex<Vec<(ChainId, GrantDirection)>>,
}

impl MockAuthzQuerier {
    pub fn set(&self, chain_id: &ChainId, direction: GrantDirection, page: Result<GrantsPage, String>) {
        self.pages
            .lock()
            .unwrap()
            .insert((chain_id.clone(), direction), page);
    }

    pub fn call_count(&self, direction: GrantDirection) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(_, d)| *d == direction)
            .count()
    }
}

#[async_trait]
impl AuthzQuerier for MockAuthzQuerier {
    async fn grants(
        &self,
        chain: &ChainConfig,
        direction: GrantDirection,
        _address: &Address,
        _page: Option<PageRequest>,
    ) -> Result<GrantsPage> {
        self.calls
            .lock()
            .unwrap()
            .push((chain.chain_id.clone(), direction));

        match self
            .pages
            .lock()
            .unwrap()
            .get(&(chain.chain_id.clone(), direction))
        {
            Some(Ok(page)) => Ok(page.clone()),
            Some(Err(e)) => Err(anyhow!("{e}")),
            None => Ok(GrantsPage::default()),
        }
    }
}

pub enum MockOutcome {
    Landed(String),
    Rejected { code: u32, raw_log: String },
    Fault(String),
}

/// Records every request and answers with a fixed outcome
pub struct MockBroadcaster {
    pub outcome: Mutex<MockOutcome>,
    pub requests: Mutex<Vec<BroadcastRequest>>,
}

impl MockBroadcaster {
    pub fn new(outcome: MockOutcome) -> Self {
        Self {
            outcome: Mutex::new(outcome),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn landed() -> Self {
        Self::new(MockOutcome::Landed("ABCDEF".to_string()))
    }

    pub fn last_request(&self) -> BroadcastRequest {
        self.requests.lock().unwrap().last().cloned().unwrap()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl Broadcaster for MockBroadcaster {
    async fn sign_and_broadcast(&self, req: BroadcastRequest) -> Result<BroadcastResponse> {
        self.requests.lock().unwrap().push(req);

        match &*self.outcome.lock().unwrap() {
            MockOutcome::Landed(hash) => Ok(BroadcastResponse {
                code: 0,
                transaction_hash: hash.clone(),
                raw_log: String::new(),
            }),
            MockOutcome::Rejected { code, raw_log } => Ok(BroadcastResponse {
                code: *code,
                transaction_hash: "FAILED".to_string(),
                raw_log: raw_log.clone(),
            }),
            MockOutcome::Fault(e) => Err(anyhow!("{e}")),
        }
    }
}

/// Portfolio data for any chain, except the ones set to fail
#[derive(Default)]
pub struct MockPortfolioQuerier {
    pub failing: BTreeSet<ChainId>,
    pub addresses: Mutex<Vec<Address>>,
}

impl MockPortfolioQuerier {
    fn check(&self, chain: &ChainConfig, address: &Address) -> Result<()> {
        self.addresses.lock().unwrap().push(address.clone());
        match self.failing.contains(&chain.chain_id) {
            true => Err(anyhow!("{} is down", chain.name)),
            false => Ok(()),
        }
    }
}

#[async_trait]
impl PortfolioQuerier for MockPortfolioQuerier {
    async fn balances(&self, chain: &ChainConfig, address: &Address) -> Result<Vec<RestCoin>> {
        self.check(chain, address)?;
        Ok(vec![RestCoin::new(5_000_000u128, &chain.denom)])
    }

    async fn delegations(
        &self,
        chain: &ChainConfig,
        address: &Address,
    ) -> Result<Vec<DelegationResponse>> {
        self.check(chain, address)?;
        Ok(Vec::new())
    }

    async fn rewards(&self, chain: &ChainConfig, address: &Address) -> Result<RewardsResponse> {
        self.check(chain, address)?;
        Ok(RewardsResponse::default())
    }
}

/// Signs with a fixed signature, the key is the secp256k1 generator point
pub struct TestSigner {
    pub signed: AtomicUsize,
}

impl TestSigner {
    pub const PUBLIC_KEY: [u8; 33] = [
        0x02, 0x79, 0xBE, 0x66, 0x7E, 0xF9, 0xDC, 0xBB, 0xAC, 0x55, 0xA0, 0x62, 0x95, 0xCE, 0x87,
        0x0B, 0x07, 0x02, 0x9B, 0xFC, 0xDB, 0x2D, 0xCE, 0x28, 0xD9, 0x59, 0xF2, 0x81, 0x5B, 0x16,
        0xF8, 0x17, 0x98,
    ];

    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            signed: AtomicUsize::new(0),
        })
    }

    pub fn signed(&self) -> usize {
        self.signed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TxSigner for TestSigner {
    async fn sign(&self, _doc: &warden_proto::tx::SignDoc) -> Result<Vec<u8>> {
        self.signed.fetch_add(1, Ordering::SeqCst);
        Ok(vec![7; 64])
    }

    async fn public_key(&self) -> Result<PublicKey> {
        PublicKey::from_raw_secp256k1(&Self::PUBLIC_KEY).ok_or_else(|| anyhow!("bad test key"))
    }
}

/// Serves `router` on an ephemeral local port, returns its base url
pub async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    format!("http://{addr}")
}

pub fn chain_at(mut chain: ChainConfig, rest_endpoint: String) -> ChainConfig {
    chain.rest_endpoint = rest_endpoint;
    chain
}
