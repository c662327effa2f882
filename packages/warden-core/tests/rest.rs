mod helpers;

use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
    time::Duration,
};

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use base64::Engine;
use cosmwasm_std::Uint128;
use helpers::*;
use serde_json::{json, Value};
use warden_address::ConfigAddressExt;
use warden_config::Networks;
use warden_core::{
    prelude::*,
    querier::{middleware::QueryMiddlewareRun, types::AuthorizationKind},
};
use warden_proto::Message;

#[derive(Default)]
struct Node {
    tx_lookups: AtomicUsize,
    broadcasts: Mutex<Vec<Vec<u8>>>,
    grant_queries: Mutex<Vec<HashMap<String, String>>>,
}

async fn grants_by_grantee(
    State(node): State<Arc<Node>>,
    Path(grantee): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    node.grant_queries.lock().unwrap().push(params);

    Json(json!({
        "grants": [
            {
                "granter": addr(1).to_string(),
                "grantee": grantee,
                "authorization": {
                    "@type": "/cosmos.bank.v1beta1.SendAuthorization",
                    "spend_limit": [{"denom": "uatom", "amount": "1000000"}],
                    "allow_list": []
                },
                "expiration": "2027-01-01T00:00:00Z"
            },
            {
                "granter": addr(3).to_string(),
                "grantee": grantee,
                "authorization": {
                    "@type": "/cosmos.authz.v1beta1.GenericAuthorization",
                    "msg": "/cosmos.gov.v1beta1.MsgVote"
                },
                "expiration": null
            }
        ],
        "pagination": {"next_key": null, "total": "2"}
    }))
}

async fn balances(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
    // two pages, keyed off pagination.key
    match params.get("pagination.key").map(String::as_str) {
        None => Json(json!({
            "balances": [{"denom": "uatom", "amount": "5000000"}],
            "pagination": {"next_key": "cGFnZTI=", "total": "2"}
        })),
        Some(_) => Json(json!({
            "balances": [{"denom": "ibc/27394FB092D2ECCD56123C74F36E4C1F926001CEADA9CA97EA622B25F41E5EB2", "amount": "17"}],
            "pagination": {"next_key": null, "total": "2"}
        })),
    }
}

async fn delegations(Path(delegator): Path<String>) -> Json<Value> {
    Json(json!({
        "delegation_responses": [
            {
                "delegation": {
                    "delegator_address": delegator,
                    "validator_address": valoper(7).to_string(),
                    "shares": "2500000.000000000000000000"
                },
                "balance": {"denom": "uatom", "amount": "2500000"}
            }
        ],
        "pagination": {"next_key": null, "total": "1"}
    }))
}

async fn rewards() -> Json<Value> {
    Json(json!({
        "rewards": [
            {
                "validator_address": valoper(7).to_string(),
                "reward": [{"denom": "uatom", "amount": "1234.567000000000000000"}]
            }
        ],
        "total": [{"denom": "uatom", "amount": "1234.567000000000000000"}]
    }))
}

async fn account(Path(address): Path<String>) -> Json<Value> {
    Json(json!({
        "account": {
            "@type": "/cosmos.auth.v1beta1.BaseAccount",
            "address": address,
            "pub_key": null,
            "account_number": "42",
            "sequence": "7"
        }
    }))
}

async fn simulate() -> Json<Value> {
    Json(json!({"gas_info": {"gas_wanted": "0", "gas_used": "100000"}}))
}

async fn broadcast(State(node): State<Arc<Node>>, Json(body): Json<Value>) -> Json<Value> {
    let tx_bytes = base64::engine::general_purpose::STANDARD
        .decode(body["tx_bytes"].as_str().unwrap())
        .unwrap();
    node.broadcasts.lock().unwrap().push(tx_bytes);

    Json(json!({"tx_response": {"txhash": "C0FFEE", "code": 0, "height": "0", "raw_log": ""}}))
}

// unknown for the first lookup, then included
async fn tx_by_hash(State(node): State<Arc<Node>>, Path(hash): Path<String>) -> impl IntoResponse {
    match node.tx_lookups.fetch_add(1, Ordering::SeqCst) {
        0 => (
            StatusCode::NOT_FOUND,
            Json(json!({"code": 5, "message": format!("tx not found: {hash}"), "details": []})),
        ),
        _ => (
            StatusCode::OK,
            Json(json!({
                "tx_response": {
                    "height": "1001",
                    "txhash": hash,
                    "code": 0,
                    "raw_log": "",
                    "gas_wanted": "150000",
                    "gas_used": "98000"
                }
            })),
        ),
    }
}

async fn mock_node() -> (String, Arc<Node>) {
    let node = Arc::new(Node::default());

    let router = Router::new()
        .route(
            "/cosmos/authz/v1beta1/grants/grantee/{grantee}",
            get(grants_by_grantee),
        )
        .route(
            "/cosmos/authz/v1beta1/grants/granter/{granter}",
            get(|| async {
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({"code": 13, "message": "node is syncing", "details": []})),
                )
            }),
        )
        .route("/cosmos/bank/v1beta1/balances/{address}", get(balances))
        .route(
            "/cosmos/staking/v1beta1/delegations/{delegator}",
            get(delegations),
        )
        .route(
            "/cosmos/distribution/v1beta1/delegators/{delegator}/rewards",
            get(rewards),
        )
        .route("/cosmos/auth/v1beta1/accounts/{address}", get(account))
        .route("/cosmos/tx/v1beta1/simulate", post(simulate))
        .route("/cosmos/tx/v1beta1/txs", post(broadcast))
        .route("/cosmos/tx/v1beta1/txs/{hash}", get(tx_by_hash))
        .with_state(node.clone());

    (serve(router).await, node)
}

// no retries, so error tests don't wait on backoff
fn query_client() -> QueryClient {
    QueryClient::new()
        .with_middleware_run(Vec::<QueryMiddlewareRun>::new())
        .with_tx_polling(Duration::from_millis(10), Duration::from_secs(2))
}

#[tokio::test]
async fn grants_to_me() {
    let (url, node) = mock_node().await;
    let chain = chain_at(cosmoshub(), url);
    let client = query_client();

    let page = client
        .grants_to_me(&chain, &addr(2), Some(PageRequest::with_limit(50)))
        .await
        .unwrap();

    assert_eq!(page.grants.len(), 2);
    assert_eq!(page.grants[0].grantee, addr(2));
    assert_eq!(page.grants[0].expiration.as_deref(), Some("2027-01-01T00:00:00Z"));
    assert_eq!(page.pagination.unwrap().total.as_deref(), Some("2"));

    match page.grants[0].authorization.kind() {
        AuthorizationKind::Send { spend_limit, .. } => {
            assert_eq!(spend_limit, vec![RestCoin::new(1_000_000u128, "uatom")]);
        }
        other => panic!("expected a send authorization, got {other:?}"),
    }
    assert_eq!(
        page.grants[1].authorization.msg_type_url().as_deref(),
        Some("/cosmos.gov.v1beta1.MsgVote")
    );

    let queries = node.grant_queries.lock().unwrap();
    assert_eq!(
        queries[0].get("pagination.limit").map(String::as_str),
        Some("50")
    );
}

#[tokio::test]
async fn rest_errors_keep_the_node_message() {
    let (url, _node) = mock_node().await;
    let chain = chain_at(cosmoshub(), url);

    let err = query_client()
        .grants_by_me(&chain, &addr(1), None)
        .await
        .unwrap_err();

    match err.downcast_ref::<NetworkError>() {
        Some(NetworkError::Rest {
            status, message, ..
        }) => {
            assert_eq!(*status, 500);
            assert_eq!(message, "node is syncing");
        }
        other => panic!("expected a rest error, got {other:?}"),
    }
}

#[tokio::test]
async fn portfolio_queries() {
    let (url, _node) = mock_node().await;
    let chain = chain_at(cosmoshub(), url);
    let client = query_client();

    // both pages
    let balances = client.all_balances(&chain, &addr(1)).await.unwrap();
    assert_eq!(balances.len(), 2);
    assert_eq!(
        client.native_balance(&chain, &addr(1)).await.unwrap().amount,
        Uint128::new(5_000_000)
    );

    let delegations = client.delegator_delegations(&chain, &addr(1)).await.unwrap();
    assert_eq!(delegations.len(), 1);
    assert_eq!(delegations[0].delegation.validator_address, valoper(7));
    assert_eq!(delegations[0].balance.amount, Uint128::new(2_500_000));

    let rewards = client
        .delegation_total_rewards(&chain, &addr(1))
        .await
        .unwrap();
    assert_eq!(rewards.total[0].denom, "uatom");
    assert_eq!(rewards.rewards.len(), 1);

    let account = client.base_account(&chain, &addr(1)).await.unwrap();
    assert_eq!(account.address, addr(1));
    assert_eq!(account.account_number, 42);
    assert_eq!(account.sequence, 7);
}

#[tokio::test]
async fn portfolio_controller_over_rest() {
    let (url, _node) = mock_node().await;
    let chain = chain_at(cosmoshub(), url);
    let chain_id = chain.chain_id.clone();

    let controller =
        PortfolioController::new(Networks::new([chain]), Arc::new(query_client()));
    controller.load(&[chain_id.clone()], &addr(1)).await;

    let state = controller.store.snapshot();
    let portfolio = state.chain(&chain_id).unwrap();
    assert_eq!(portfolio.balances.status, FetchStatus::Idle);
    assert_eq!(portfolio.delegations.data.total_staked, Uint128::new(2_500_000));

    let prices = Prices::from([("uatom".to_string(), Price { usd: 10.0 })]);
    let rows = warden_core::overview::chain_rows(
        &state,
        &controller.networks,
        &[chain_id],
        &prices,
    );
    assert_eq!(rows[0].available, 5.0);
    assert_eq!(rows[0].staked, 2.5);
}

#[tokio::test]
async fn broadcast_signs_and_waits_for_inclusion() {
    let (url, node) = mock_node().await;
    let chain = chain_at(cosmoshub(), url);
    let signer = TestSigner::new();

    let broadcaster = RestBroadcaster::new_shared(query_client(), signer.clone());
    let sender = broadcaster.sender(&chain).await.unwrap();
    assert_eq!(sender.prefix(), "cosmos");

    let fee_granter = chain.parse_address(&addr(9).to_string()).unwrap();
    let message = proto_any(&warden_core::signing::msg::unjail_msg(&valoper(7)));

    let resp = broadcaster
        .sign_and_broadcast(BroadcastRequest {
            chain: chain.clone(),
            messages: vec![message],
            gas: GasLimit::simulate(),
            memo: "warden".to_string(),
            fee: None,
            fee_granter: Some(fee_granter.clone()),
        })
        .await
        .unwrap();

    assert!(resp.is_success());
    assert_eq!(resp.transaction_hash, "C0FFEE");
    assert_eq!(signer.signed(), 1);
    // one miss, then found
    assert_eq!(node.tx_lookups.load(Ordering::SeqCst), 2);

    let broadcasts = node.broadcasts.lock().unwrap();
    assert_eq!(broadcasts.len(), 1);

    let tx = warden_proto::tx::TxRaw::decode(broadcasts[0].as_slice()).unwrap();
    assert_eq!(tx.signatures, vec![vec![7; 64]]);

    let body = warden_proto::tx::TxBody::decode(tx.body_bytes.as_slice()).unwrap();
    assert_eq!(body.memo, "warden");
    assert_eq!(body.messages.len(), 1);

    let auth_info = warden_proto::tx::AuthInfo::decode(tx.auth_info_bytes.as_slice()).unwrap();
    assert_eq!(auth_info.signer_infos[0].sequence, 7);

    let fee = auth_info.fee.unwrap();
    // simulated 100_000 * 1.5
    assert_eq!(fee.gas_limit, 150_000);
    assert_eq!(fee.amount, vec![new_coin(3750, "uatom")]);
    assert_eq!(fee.granter, fee_granter.to_string());
}

#[tokio::test]
async fn broadcast_rejects_empty_transactions() {
    let (url, node) = mock_node().await;
    let chain = chain_at(cosmoshub(), url);
    let signer = TestSigner::new();

    let broadcaster = RestBroadcaster::new_shared(query_client(), signer.clone());

    let err = broadcaster
        .sign_and_broadcast(BroadcastRequest {
            chain,
            messages: Vec::new(),
            gas: GasLimit::Fixed(200_000),
            memo: String::new(),
            fee: None,
            fee_granter: None,
        })
        .await
        .unwrap_err();

    assert!(matches!(
        err.downcast_ref::<TransactionError>(),
        Some(TransactionError::BuildFailed(_))
    ));
    assert_eq!(signer.signed(), 0);
    assert!(node.broadcasts.lock().unwrap().is_empty());
}

fn proto_any<M: warden_proto::Name>(msg: &M) -> warden_proto::Any {
    warden_proto::proto_into_any(msg).unwrap()
}
