//! The async side of the dashboard: runs queries and broadcasts, and feeds their
//! outcomes into the stores as events

use std::sync::Arc;

use serde_json::Value;
use tracing::instrument;
use warden_address::ConfigAddressExt;
use warden_proto::{any_into_proto, authz::MsgExec, Any, Timestamp};

use crate::{
    dispatch::{ExecKind, ExecOperation},
    error::DispatchError,
    prelude::*,
    querier::{
        types::{PageRequest, RestCoin},
        AuthzQuerier, GrantDirection, PortfolioQuerier,
    },
    signing::{msg, BroadcastRequest, BroadcastResponse, Broadcaster, GasLimit},
    store::{
        AuthzEvent, AuthzStore, Delegations, GrantsFetchState, PortfolioEvent, PortfolioPart,
        PortfolioStore, RequestId, Rewards, TxRecord,
    },
};

/// Per-transaction fee settings
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FeeOptions {
    /// fee in the chain's native denom, base units. Derived from the gas price if unset
    pub fee_amount: Option<u128>,
    pub fee_granter: Option<Address>,
    /// overrides the gas table
    pub gas: Option<GasLimit>,
}

impl FeeOptions {
    /// Parses an optional fee-granter, where an empty string means none
    pub fn parse_fee_granter(chain: &ChainConfig, value: Option<&str>) -> Result<Option<Address>> {
        match value.map(str::trim) {
            None | Some("") => Ok(None),
            Some(value) => Ok(Some(chain.parse_address(value)?)),
        }
    }
}

/// Grant queries and mutations against the `AuthzStore`
///
/// Every operation reports through the store rather than its return value:
/// fetches land in the per-chain fetch states, mutations in their `TxRecord`,
/// the `tx`/`exec_tx` slots, and the notification queue.
#[derive(Clone)]
pub struct AuthzController {
    pub store: AuthzStore,
    pub networks: Arc<Networks>,
    pub gas: GasTable,
    querier: Arc<dyn AuthzQuerier>,
    broadcaster: Arc<dyn Broadcaster>,
}

impl std::fmt::Debug for AuthzController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthzController")
            .field("chains", &self.networks.len())
            .field("gas", &self.gas)
            .finish()
    }
}

impl AuthzController {
    pub fn new(
        networks: Networks,
        querier: Arc<dyn AuthzQuerier>,
        broadcaster: Arc<dyn Broadcaster>,
    ) -> Self {
        Self {
            store: AuthzStore::new(),
            networks: Arc::new(networks),
            gas: GasTable::default(),
            querier,
            broadcaster,
        }
    }

    pub fn with_gas_table(mut self, gas: GasTable) -> Self {
        self.gas = gas;
        self
    }

    pub fn with_store(mut self, store: AuthzStore) -> Self {
        self.store = store;
        self
    }

    /// Grants where `grantee` is on the receiving end
    #[instrument(skip(self))]
    pub async fn get_grants_to_me(
        &self,
        chain_id: &ChainId,
        grantee: &Address,
        page: Option<PageRequest>,
    ) -> Option<GrantsFetchState> {
        self.fetch_grants(GrantDirection::ToMe, chain_id, grantee, page)
            .await
    }

    /// Grants `granter` has handed out
    #[instrument(skip(self))]
    pub async fn get_grants_by_me(
        &self,
        chain_id: &ChainId,
        granter: &Address,
        page: Option<PageRequest>,
    ) -> Option<GrantsFetchState> {
        self.fetch_grants(GrantDirection::ByMe, chain_id, granter, page)
            .await
    }

    async fn fetch_grants(
        &self,
        direction: GrantDirection,
        chain_id: &ChainId,
        address: &Address,
        page: Option<PageRequest>,
    ) -> Option<GrantsFetchState> {
        let token = self.store.next_token();

        self.store.dispatch(AuthzEvent::GrantsFetchStarted {
            direction,
            chain_id: chain_id.clone(),
            token,
        });

        let result = match self.networks.get(chain_id) {
            Ok(chain) => self.querier.grants(chain, direction, address, page).await,
            Err(e) => Err(e.into()),
        };

        match result {
            Ok(page) => {
                tracing::debug!(
                    "{} {direction} grants on {chain_id} for {address}",
                    page.grants.len()
                );
                self.store.dispatch(AuthzEvent::GrantsFetchSucceeded {
                    direction,
                    chain_id: chain_id.clone(),
                    token,
                    page,
                });
            }
            Err(e) => {
                tracing::warn!("{direction} grants on {chain_id} failed: {e:#}");
                self.store.dispatch(AuthzEvent::GrantsFetchFailed {
                    direction,
                    chain_id: chain_id.clone(),
                    token,
                    error: format!("{e:#}"),
                });
            }
        }

        self.store
            .with_state(|state| state.fetch_state(direction, chain_id).cloned())
    }

    /// Grants a bank send authorization, spending up to `spend_limit`
    #[instrument(skip(self))]
    pub async fn tx_grant_send(
        &self,
        chain_id: &ChainId,
        granter: &Address,
        grantee: &Address,
        spend_limit: RestCoin,
        expiration: Option<Timestamp>,
        fee: FeeOptions,
    ) -> RequestId {
        let messages =
            msg::grant_send_msg(granter, grantee, vec![spend_limit.to_proto()], expiration)
                .and_then(|msg| proto_into_any(&msg))
                .map(|any| vec![any]);

        self.submit(TxKind::GrantSend, chain_id, messages, String::new(), &fee)
            .await
            .0
    }

    /// Grants permission to run any message of type `msg_type_url`
    #[instrument(skip(self))]
    pub async fn tx_grant_generic(
        &self,
        chain_id: &ChainId,
        granter: &Address,
        grantee: &Address,
        msg_type_url: &str,
        expiration: Option<Timestamp>,
        fee: FeeOptions,
    ) -> RequestId {
        let messages = msg::grant_generic_msg(granter, grantee, msg_type_url, expiration)
            .and_then(|msg| proto_into_any(&msg))
            .map(|any| vec![any]);

        self.submit(TxKind::GrantGeneric, chain_id, messages, String::new(), &fee)
            .await
            .0
    }

    /// Revokes a grant, then reloads "grants given" for the same chain
    #[instrument(skip(self))]
    pub async fn tx_revoke(
        &self,
        chain_id: &ChainId,
        granter: &Address,
        grantee: &Address,
        msg_type_url: &str,
        fee: FeeOptions,
    ) -> RequestId {
        let messages = proto_into_any(&msg::revoke_msg(granter, grantee, msg_type_url))
            .map(|any| vec![any]);

        let (request_id, response) = self
            .submit(TxKind::Revoke, chain_id, messages, String::new(), &fee)
            .await;

        if response.is_some_and(|resp| resp.is_success()) {
            self.get_grants_by_me(chain_id, granter, None).await;
        }

        request_id
    }

    /// Broadcasts already-built `MsgExec` messages
    #[instrument(skip(self, messages))]
    pub async fn tx_exec(
        &self,
        chain_id: &ChainId,
        kind: ExecKind,
        messages: Vec<Any>,
        memo: String,
        fee: FeeOptions,
    ) -> RequestId {
        self.submit(kind.tx_kind(), chain_id, Ok(messages), memo, &fee)
            .await
            .0
    }

    /// Builds and broadcasts a typed exec operation
    #[instrument(skip(self))]
    pub async fn exec(
        &self,
        chain_id: &ChainId,
        grantee: &Address,
        op: &ExecOperation,
        fee: FeeOptions,
    ) -> RequestId {
        let messages = op
            .build(grantee)
            .map(|any| vec![any])
            .map_err(anyhow::Error::from);

        self.submit(op.kind().tx_kind(), chain_id, messages, op.memo(), &fee)
            .await
            .0
    }

    /// Routes an untyped exec payload
    ///
    /// An unknown kind raises an alert and touches nothing else, returning `None`.
    /// Any other problem with the payload is a failed exec transaction.
    #[instrument(skip(self, value))]
    pub async fn exec_value(
        &self,
        chain_id: &ChainId,
        grantee: &Address,
        value: Value,
        fee: FeeOptions,
    ) -> Option<RequestId> {
        match ExecOperation::from_value(value) {
            Ok(op) => Some(self.exec(chain_id, grantee, &op, fee).await),
            Err(err) => {
                let known_kind = match &err {
                    DispatchError::InvalidPayload { kind, .. } => kind.parse::<ExecKind>().ok(),
                    DispatchError::Unsupported(_) | DispatchError::MissingKind => None,
                };

                match known_kind {
                    Some(kind) => {
                        let (request_id, _) = self
                            .submit(kind.tx_kind(), chain_id, Err(err.into()), String::new(), &fee)
                            .await;
                        Some(request_id)
                    }
                    None => {
                        tracing::warn!("{err}");
                        self.store.dispatch(AuthzEvent::Alert(err.to_string()));
                        None
                    }
                }
            }
        }
    }

    pub fn set_selected_granter(&self, granter: Address) {
        self.store.dispatch(AuthzEvent::SetSelectedGranter(granter));
    }

    pub fn exit_authz_mode(&self) {
        self.store.dispatch(AuthzEvent::ExitAuthzMode);
    }

    pub fn reset_alerts(&self) {
        self.store.dispatch(AuthzEvent::ResetAlerts);
    }

    pub fn reset_exec_tx(&self) {
        self.store.dispatch(AuthzEvent::ResetExecTx);
    }

    pub fn reset_tx_result(&self) {
        self.store.dispatch(AuthzEvent::ResetTxResult);
    }

    pub fn dismiss_notifications(&self) {
        self.store.dispatch(AuthzEvent::DismissNotifications);
    }

    pub fn request(&self, request_id: RequestId) -> Option<TxRecord> {
        self.store
            .with_state(|state| state.request(request_id).cloned())
    }

    /// Drops a record once the caller is done with it
    pub fn forget_request(&self, request_id: RequestId) {
        self.store.dispatch(AuthzEvent::ForgetRequest(request_id));
    }

    // one mutation from start to settled record, no retry
    async fn submit(
        &self,
        kind: TxKind,
        chain_id: &ChainId,
        messages: Result<Vec<Any>>,
        memo: String,
        fee: &FeeOptions,
    ) -> (RequestId, Option<BroadcastResponse>) {
        let request_id = self.store.next_request_id();

        self.store.dispatch(AuthzEvent::TxStarted {
            request_id,
            kind,
            chain_id: chain_id.clone(),
        });

        let outcome = match messages {
            Ok(messages) => self.broadcast(kind, chain_id, messages, memo, fee).await,
            Err(e) => Err(e),
        };

        match &outcome {
            Ok(resp) if resp.is_success() => {
                tracing::info!("{kind} {request_id} landed: {}", resp.transaction_hash);
                self.store.dispatch(AuthzEvent::TxSucceeded {
                    request_id,
                    tx_hash: resp.transaction_hash.clone(),
                });
            }
            Ok(resp) => {
                tracing::warn!("{kind} {request_id} failed with code {}", resp.code);
                self.store.dispatch(AuthzEvent::TxFailed {
                    request_id,
                    error: resp.raw_log.clone(),
                });
            }
            Err(e) => {
                tracing::warn!("{kind} {request_id} failed: {e:#}");
                self.store.dispatch(AuthzEvent::TxFailed {
                    request_id,
                    error: format!("{e:#}"),
                });
            }
        }

        (request_id, outcome.ok())
    }

    async fn broadcast(
        &self,
        kind: TxKind,
        chain_id: &ChainId,
        messages: Vec<Any>,
        memo: String,
        fee: &FeeOptions,
    ) -> Result<BroadcastResponse> {
        let chain = self.networks.get(chain_id)?;
        let req = self.broadcast_request(chain, kind, messages, memo, fee);
        self.broadcaster.sign_and_broadcast(req).await
    }

    pub fn broadcast_request(
        &self,
        chain: &ChainConfig,
        kind: TxKind,
        messages: Vec<Any>,
        memo: String,
        fee: &FeeOptions,
    ) -> BroadcastRequest {
        let gas = fee.gas.unwrap_or_else(|| {
            GasLimit::Fixed(self.gas.gas_limit(kind, message_count(&messages)))
        });

        let fee_coin = match (fee.fee_amount, gas) {
            (Some(amount), _) => Some(new_coin(amount, &chain.denom)),
            (None, GasLimit::Fixed(gas_limit)) => {
                Some(new_coin(chain.fee_for_gas(gas_limit), &chain.denom))
            }
            (None, GasLimit::Simulate { .. }) => None,
        };

        BroadcastRequest {
            chain: chain.clone(),
            messages,
            gas,
            memo,
            fee: fee_coin,
            fee_granter: fee.fee_granter.clone(),
        }
    }
}

// MsgExec counts by the messages it wraps
fn message_count(messages: &[Any]) -> usize {
    messages
        .iter()
        .map(|any| {
            any_into_proto::<MsgExec>(any)
                .map(|exec| exec.msgs.len().max(1))
                .unwrap_or(1)
        })
        .sum()
}

/// Loads balances, delegations and rewards for one account across chains
#[derive(Clone)]
pub struct PortfolioController {
    pub store: PortfolioStore,
    pub networks: Arc<Networks>,
    querier: Arc<dyn PortfolioQuerier>,
}

impl std::fmt::Debug for PortfolioController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PortfolioController")
            .field("chains", &self.networks.len())
            .finish()
    }
}

impl PortfolioController {
    pub fn new(networks: Networks, querier: Arc<dyn PortfolioQuerier>) -> Self {
        Self {
            store: PortfolioStore::new(),
            networks: Arc::new(networks),
            querier,
        }
    }

    /// Fires all three queries for every chain at once
    ///
    /// `address` is re-encoded with each chain's prefix.
    #[instrument(skip(self))]
    pub async fn load(&self, chain_ids: &[ChainId], address: &Address) {
        futures::future::join_all(
            chain_ids
                .iter()
                .map(|chain_id| self.load_chain(chain_id, address)),
        )
        .await;
    }

    async fn load_chain(&self, chain_id: &ChainId, address: &Address) {
        for part in [
            PortfolioPart::Balances,
            PortfolioPart::Delegations,
            PortfolioPart::Rewards,
        ] {
            self.store.dispatch(PortfolioEvent::Started {
                chain_id: chain_id.clone(),
                part,
            });
        }

        let target = self
            .networks
            .get(chain_id)
            .map_err(anyhow::Error::from)
            .and_then(|chain| {
                let address = address.change_prefix(&chain.address_prefix)?;
                Ok((chain, address))
            });

        let (chain, address) = match target {
            Ok(target) => target,
            Err(e) => {
                for part in [
                    PortfolioPart::Balances,
                    PortfolioPart::Delegations,
                    PortfolioPart::Rewards,
                ] {
                    self.fail(chain_id, part, &e);
                }
                return;
            }
        };

        let (balances, delegations, rewards) = futures::join!(
            self.querier.balances(chain, &address),
            self.querier.delegations(chain, &address),
            self.querier.rewards(chain, &address),
        );

        match balances {
            Ok(balances) => self.store.dispatch(PortfolioEvent::BalancesLoaded {
                chain_id: chain_id.clone(),
                balances,
            }),
            Err(e) => self.fail(chain_id, PortfolioPart::Balances, &e),
        }

        match delegations {
            Ok(delegations) => self.store.dispatch(PortfolioEvent::DelegationsLoaded {
                chain_id: chain_id.clone(),
                delegations: Delegations::new(delegations, &chain.denom),
            }),
            Err(e) => self.fail(chain_id, PortfolioPart::Delegations, &e),
        }

        match rewards {
            Ok(rewards) => self.store.dispatch(PortfolioEvent::RewardsLoaded {
                chain_id: chain_id.clone(),
                rewards: Rewards::new(rewards, &chain.denom),
            }),
            Err(e) => self.fail(chain_id, PortfolioPart::Rewards, &e),
        }
    }

    fn fail(&self, chain_id: &ChainId, part: PortfolioPart, error: &anyhow::Error) {
        tracing::warn!("{part} on {chain_id} failed: {error:#}");
        self.store.dispatch(PortfolioEvent::Failed {
            chain_id: chain_id.clone(),
            part,
            error: format!("{error:#}"),
        });
    }
}
