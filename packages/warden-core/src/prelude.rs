// local "prelude" that isn't exported
// some of these may be exported in the main prelude
pub(crate) use anyhow::{anyhow, bail, Context, Result};
pub(crate) use warden_address::Address;
pub(crate) use warden_config::*;
pub(crate) use warden_proto::{proto_into_any, proto_into_bytes};

// common types
pub use crate::{
    cache::WardenCache,
    controller::{AuthzController, FeeOptions, PortfolioController},
    dispatch::{ExecKind, ExecOperation, VoteChoice},
    error::{DispatchError, NetworkError, TransactionError, WardenError},
    overview::{format_usd, ChainRow, OverviewTotals, Price, Prices},
    querier::{
        types::{
            Authorization, AuthorizationKind, Grant, GrantsPage, PageRequest, PageResponse,
            RestCoin, RestDecCoin,
        },
        AuthzQuerier, GrantDirection, PortfolioQuerier, QueryClient, QueryRequest,
    },
    signing::{BroadcastRequest, BroadcastResponse, Broadcaster, GasLimit},
    store::{
        AuthzEvent, AuthzState, AuthzStore, FetchStatus, GrantsFetchState, Notification,
        NotificationKind, PortfolioState, PortfolioStore, RequestId, RequestToken, TxClass,
        TxRecord, TxStatus,
    },
    transaction::RestBroadcaster,
};

/// helper function to create a Coin
pub fn new_coin(amount: impl ToString, denom: impl ToString) -> warden_proto::Coin {
    warden_proto::Coin {
        denom: denom.to_string(),
        amount: amount.to_string(),
    }
}
