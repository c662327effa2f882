use std::collections::BTreeMap;

use futures_signals::signal::{Mutable, Signal};
use serde::{Deserialize, Serialize};

use super::{Counter, FetchStatus, Notification, RequestId, RequestToken};
use crate::{
    prelude::*,
    querier::{
        types::{Grant, GrantsPage, PageResponse},
        GrantDirection,
    },
};

/// Grants for one chain in one direction
///
/// `grants` and `pagination` always come from the same successful fetch,
/// or are both empty.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct GrantsFetchState {
    pub status: FetchStatus,
    pub error_message: String,
    pub grants: Vec<Grant>,
    pub pagination: Option<PageResponse>,
    /// the fetch this state belongs to
    pub token: RequestToken,
}

impl GrantsFetchState {
    pub fn pending(token: RequestToken) -> Self {
        Self {
            status: FetchStatus::Pending,
            token,
            ..Default::default()
        }
    }

    pub fn loaded(token: RequestToken, page: GrantsPage) -> Self {
        Self {
            status: FetchStatus::Idle,
            error_message: String::new(),
            grants: page.grants,
            pagination: page.pagination,
            token,
        }
    }

    pub fn rejected(token: RequestToken, error_message: impl Into<String>) -> Self {
        Self {
            status: FetchStatus::Rejected,
            error_message: error_message.into(),
            token,
            ..Default::default()
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TxStatus {
    /// nothing submitted since the last reset
    #[default]
    Init,
    Pending,
    Idle,
    Rejected,
}

/// Which singleton status slot a mutation drives
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TxClass {
    /// grant and revoke
    Tx,
    ExecTx,
}

impl From<TxKind> for TxClass {
    fn from(kind: TxKind) -> Self {
        if kind.is_exec() {
            Self::ExecTx
        } else {
            Self::Tx
        }
    }
}

/// The lifecycle of one mutation
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct TxRecord {
    pub request_id: RequestId,
    pub kind: TxKind,
    pub chain_id: ChainId,
    pub status: TxStatus,
    pub tx_hash: Option<String>,
    pub error: Option<String>,
}

impl TxRecord {
    pub fn class(&self) -> TxClass {
        self.kind.into()
    }
}

#[derive(Clone, Debug)]
pub enum AuthzEvent {
    GrantsFetchStarted {
        direction: GrantDirection,
        chain_id: ChainId,
        token: RequestToken,
    },
    GrantsFetchSucceeded {
        direction: GrantDirection,
        chain_id: ChainId,
        token: RequestToken,
        page: GrantsPage,
    },
    GrantsFetchFailed {
        direction: GrantDirection,
        chain_id: ChainId,
        token: RequestToken,
        error: String,
    },
    TxStarted {
        request_id: RequestId,
        kind: TxKind,
        chain_id: ChainId,
    },
    TxSucceeded {
        request_id: RequestId,
        tx_hash: String,
    },
    TxFailed {
        request_id: RequestId,
        error: String,
    },
    SetSelectedGranter(Address),
    ExitAuthzMode,
    /// back to a clean slate: slots reset, rejected fetches go idle, grants are kept
    ResetAlerts,
    ResetExecTx,
    ResetTxResult,
    Alert(String),
    DismissNotifications,
    ForgetRequest(RequestId),
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct AuthzState {
    pub grants_to_me: BTreeMap<ChainId, GrantsFetchState>,
    pub grants_by_me: BTreeMap<ChainId, GrantsFetchState>,
    /// grant and revoke
    pub tx: TxStatus,
    pub exec_tx: TxStatus,
    /// the latest grant or revoke
    pub tx_result: Option<TxRecord>,
    pub requests: BTreeMap<RequestId, TxRecord>,
    pub selected_granter: Option<Address>,
    pub notifications: Vec<Notification>,
}

impl Default for AuthzState {
    fn default() -> Self {
        Self {
            grants_to_me: BTreeMap::new(),
            grants_by_me: BTreeMap::new(),
            tx: TxStatus::Idle,
            exec_tx: TxStatus::Init,
            tx_result: None,
            requests: BTreeMap::new(),
            selected_granter: None,
            notifications: Vec::new(),
        }
    }
}

impl AuthzState {
    /// Settled records kept around for lookup, pending ones are never evicted
    pub const MAX_SETTLED_REQUESTS: usize = 64;

    pub fn grants(&self, direction: GrantDirection) -> &BTreeMap<ChainId, GrantsFetchState> {
        match direction {
            GrantDirection::ToMe => &self.grants_to_me,
            GrantDirection::ByMe => &self.grants_by_me,
        }
    }

    fn grants_mut(&mut self, direction: GrantDirection) -> &mut BTreeMap<ChainId, GrantsFetchState> {
        match direction {
            GrantDirection::ToMe => &mut self.grants_to_me,
            GrantDirection::ByMe => &mut self.grants_by_me,
        }
    }

    pub fn fetch_state(
        &self,
        direction: GrantDirection,
        chain_id: &ChainId,
    ) -> Option<&GrantsFetchState> {
        self.grants(direction).get(chain_id)
    }

    pub fn request(&self, request_id: RequestId) -> Option<&TxRecord> {
        self.requests.get(&request_id)
    }

    pub fn slot(&self, class: TxClass) -> TxStatus {
        match class {
            TxClass::Tx => self.tx,
            TxClass::ExecTx => self.exec_tx,
        }
    }

    fn slot_mut(&mut self, class: TxClass) -> &mut TxStatus {
        match class {
            TxClass::Tx => &mut self.tx,
            TxClass::ExecTx => &mut self.exec_tx,
        }
    }

    /// The newest notification, i.e. what an alert banner shows
    pub fn current_notification(&self) -> Option<&Notification> {
        self.notifications.last()
    }

    pub fn in_authz_mode(&self) -> bool {
        self.selected_granter.is_some()
    }

    pub fn reduce(mut self, event: AuthzEvent) -> Self {
        match event {
            AuthzEvent::GrantsFetchStarted {
                direction,
                chain_id,
                token,
            } => {
                if !chain_id.is_empty() {
                    self.grants_mut(direction)
                        .insert(chain_id, GrantsFetchState::pending(token));
                }
            }
            AuthzEvent::GrantsFetchSucceeded {
                direction,
                chain_id,
                token,
                page,
            } => {
                self.complete_fetch(direction, chain_id, token, |token| {
                    GrantsFetchState::loaded(token, page)
                });
            }
            AuthzEvent::GrantsFetchFailed {
                direction,
                chain_id,
                token,
                error,
            } => {
                self.complete_fetch(direction, chain_id, token, |token| {
                    GrantsFetchState::rejected(token, error)
                });
            }
            AuthzEvent::TxStarted {
                request_id,
                kind,
                chain_id,
            } => {
                let record = TxRecord {
                    request_id,
                    kind,
                    chain_id,
                    status: TxStatus::Pending,
                    tx_hash: None,
                    error: None,
                };
                self.settle(record);
            }
            AuthzEvent::TxSucceeded {
                request_id,
                tx_hash,
            } => {
                if let Some(mut record) = self.requests.get(&request_id).cloned() {
                    record.status = TxStatus::Idle;
                    record.tx_hash = Some(tx_hash.clone());
                    self.settle(record);
                    self.notifications
                        .push(Notification::tx_hash(request_id, tx_hash));
                }
            }
            AuthzEvent::TxFailed { request_id, error } => {
                if let Some(mut record) = self.requests.get(&request_id).cloned() {
                    record.status = TxStatus::Rejected;
                    record.error = Some(error.clone());
                    self.settle(record);
                    self.notifications.push(Notification::error(request_id, error));
                }
            }
            AuthzEvent::SetSelectedGranter(granter) => {
                self.selected_granter = Some(granter);
            }
            AuthzEvent::ExitAuthzMode => {
                self.selected_granter = None;
            }
            AuthzEvent::ResetAlerts => {
                self.tx = TxStatus::Idle;
                self.exec_tx = TxStatus::Init;
                for state in self
                    .grants_to_me
                    .values_mut()
                    .chain(self.grants_by_me.values_mut())
                {
                    if state.status == FetchStatus::Rejected {
                        state.status = FetchStatus::Idle;
                        state.error_message.clear();
                    }
                }
            }
            AuthzEvent::ResetExecTx => {
                self.exec_tx = TxStatus::Init;
            }
            AuthzEvent::ResetTxResult => {
                self.tx_result = None;
            }
            AuthzEvent::Alert(message) => {
                self.notifications.push(Notification::alert(message));
            }
            AuthzEvent::DismissNotifications => {
                self.notifications.clear();
            }
            AuthzEvent::ForgetRequest(request_id) => {
                self.requests.remove(&request_id);
            }
        }

        self
    }

    fn complete_fetch(
        &mut self,
        direction: GrantDirection,
        chain_id: ChainId,
        token: RequestToken,
        next: impl FnOnce(RequestToken) -> GrantsFetchState,
    ) {
        match self.grants_mut(direction).get_mut(&chain_id) {
            Some(state) if state.token == token && state.status == FetchStatus::Pending => {
                *state = next(token);
            }
            _ => {
                tracing::debug!("dropping stale {direction} grants for {chain_id}");
            }
        }
    }

    // writes the record and mirrors its status into the singleton slot
    fn settle(&mut self, record: TxRecord) {
        let class = record.class();
        *self.slot_mut(class) = record.status;
        if class == TxClass::Tx {
            self.tx_result = Some(record.clone());
        }
        self.requests.insert(record.request_id, record);
        self.evict_settled();
    }

    // ids only grow, so map order is submission order
    fn evict_settled(&mut self) {
        let mut settled = self
            .requests
            .values()
            .filter(|record| record.status != TxStatus::Pending)
            .count();

        while settled > Self::MAX_SETTLED_REQUESTS {
            let oldest = self
                .requests
                .values()
                .find(|record| record.status != TxStatus::Pending)
                .map(|record| record.request_id);

            match oldest {
                Some(request_id) => {
                    self.requests.remove(&request_id);
                    settled -= 1;
                }
                None => break,
            }
        }
    }
}

/// Shared, observable `AuthzState`
///
/// Clones share the same state and id counters.
#[derive(Clone, Default)]
pub struct AuthzStore {
    state: Mutable<AuthzState>,
    request_ids: Counter,
    tokens: Counter,
}

impl std::fmt::Debug for AuthzStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthzStore").finish_non_exhaustive()
    }
}

impl AuthzStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dispatch(&self, event: AuthzEvent) {
        let mut state = self.state.lock_mut();
        let current = std::mem::take(&mut *state);
        *state = current.reduce(event);
    }

    pub fn snapshot(&self) -> AuthzState {
        self.state.get_cloned()
    }

    pub fn with_state<R>(&self, f: impl FnOnce(&AuthzState) -> R) -> R {
        f(&self.state.lock_ref())
    }

    pub fn signal(&self) -> impl Signal<Item = AuthzState> {
        self.state.signal_cloned()
    }

    pub fn next_request_id(&self) -> RequestId {
        RequestId::new(self.request_ids.next())
    }

    pub fn next_token(&self) -> RequestToken {
        RequestToken::new(self.tokens.next())
    }
}
