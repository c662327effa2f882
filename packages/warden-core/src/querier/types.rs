//! JSON shapes of the Cosmos REST (LCD) responses the dashboard reads
//!
//! Amounts arrive as decimal strings, which `Uint128`/`Decimal256` parse directly.

use cosmwasm_std::{Decimal256, Uint128};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::prelude::*;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct RestCoin {
    pub denom: String,
    pub amount: Uint128,
}

impl RestCoin {
    pub fn new(amount: impl Into<Uint128>, denom: impl ToString) -> Self {
        Self {
            denom: denom.to_string(),
            amount: amount.into(),
        }
    }

    pub fn to_proto(&self) -> warden_proto::Coin {
        new_coin(self.amount, &self.denom)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct RestDecCoin {
    pub denom: String,
    pub amount: Decimal256,
}

/// A grant as listed by `/cosmos/authz/v1beta1/grants/{grantee,granter}/{address}`
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Grant {
    pub granter: Address,
    pub grantee: Address,
    pub authorization: Authorization,
    #[serde(default)]
    pub expiration: Option<String>,
}

/// The capability a grant carries, kept as the raw JSON object behind its `@type`
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Authorization {
    #[serde(rename = "@type")]
    pub type_url: String,
    #[serde(flatten)]
    pub body: Map<String, Value>,
}

pub const GENERIC_AUTHORIZATION: &str = "/cosmos.authz.v1beta1.GenericAuthorization";
pub const SEND_AUTHORIZATION: &str = "/cosmos.bank.v1beta1.SendAuthorization";
pub const STAKE_AUTHORIZATION: &str = "/cosmos.staking.v1beta1.StakeAuthorization";

#[derive(Debug, Clone, PartialEq)]
pub enum AuthorizationKind {
    Generic {
        msg: String,
    },
    Send {
        spend_limit: Vec<RestCoin>,
        allow_list: Vec<String>,
    },
    Stake {
        authorization_type: String,
        max_tokens: Option<RestCoin>,
        allow_list: Vec<String>,
        deny_list: Vec<String>,
    },
    Other(String),
}

#[derive(Deserialize)]
struct GenericBody {
    msg: String,
}

#[derive(Deserialize)]
struct SendBody {
    #[serde(default)]
    spend_limit: Vec<RestCoin>,
    #[serde(default)]
    allow_list: Vec<String>,
}

#[derive(Deserialize, Default)]
struct ValidatorList {
    #[serde(default)]
    address: Vec<String>,
}

#[derive(Deserialize)]
struct StakeBody {
    #[serde(default)]
    authorization_type: String,
    #[serde(default)]
    max_tokens: Option<RestCoin>,
    #[serde(default)]
    allow_list: Option<ValidatorList>,
    #[serde(default)]
    deny_list: Option<ValidatorList>,
}

impl Authorization {
    pub fn generic(msg: impl ToString) -> Self {
        let mut body = Map::new();
        body.insert("msg".to_string(), Value::String(msg.to_string()));
        Self {
            type_url: GENERIC_AUTHORIZATION.to_string(),
            body,
        }
    }

    pub fn kind(&self) -> AuthorizationKind {
        let body = Value::Object(self.body.clone());

        let parsed = match self.type_url.as_str() {
            GENERIC_AUTHORIZATION => serde_json::from_value::<GenericBody>(body)
                .ok()
                .map(|b| AuthorizationKind::Generic { msg: b.msg }),
            SEND_AUTHORIZATION => serde_json::from_value::<SendBody>(body).ok().map(|b| {
                AuthorizationKind::Send {
                    spend_limit: b.spend_limit,
                    allow_list: b.allow_list,
                }
            }),
            STAKE_AUTHORIZATION => serde_json::from_value::<StakeBody>(body).ok().map(|b| {
                AuthorizationKind::Stake {
                    authorization_type: b.authorization_type,
                    max_tokens: b.max_tokens,
                    allow_list: b.allow_list.unwrap_or_default().address,
                    deny_list: b.deny_list.unwrap_or_default().address,
                }
            }),
            _ => None,
        };

        parsed.unwrap_or_else(|| AuthorizationKind::Other(self.type_url.clone()))
    }

    /// The message type this authorization covers, which is what a revoke needs
    pub fn msg_type_url(&self) -> Option<String> {
        match self.kind() {
            AuthorizationKind::Generic { msg } => Some(msg),
            AuthorizationKind::Send { .. } => Some("/cosmos.bank.v1beta1.MsgSend".to_string()),
            AuthorizationKind::Stake {
                authorization_type, ..
            } => match authorization_type.as_str() {
                "AUTHORIZATION_TYPE_DELEGATE" => {
                    Some("/cosmos.staking.v1beta1.MsgDelegate".to_string())
                }
                "AUTHORIZATION_TYPE_UNDELEGATE" => {
                    Some("/cosmos.staking.v1beta1.MsgUndelegate".to_string())
                }
                "AUTHORIZATION_TYPE_REDELEGATE" => {
                    Some("/cosmos.staking.v1beta1.MsgBeginRedelegate".to_string())
                }
                _ => None,
            },
            AuthorizationKind::Other(_) => None,
        }
    }
}

/// Cursor for a paginated REST query, sent as `pagination.*` query parameters
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct PageRequest {
    pub key: Option<String>,
    pub offset: Option<u64>,
    pub limit: Option<u64>,
    #[serde(default)]
    pub count_total: bool,
    #[serde(default)]
    pub reverse: bool,
}

impl PageRequest {
    pub fn with_limit(limit: u64) -> Self {
        Self {
            limit: Some(limit),
            ..Default::default()
        }
    }

    /// The request for the page following `resp`, if there is one
    pub fn next(&self, resp: &PageResponse) -> Option<Self> {
        let key = resp.next_key.as_ref().filter(|key| !key.is_empty())?;
        Some(Self {
            key: Some(key.clone()),
            offset: None,
            ..self.clone()
        })
    }

    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();

        if let Some(key) = &self.key {
            query.push(("pagination.key", key.clone()));
        }
        if let Some(offset) = self.offset {
            query.push(("pagination.offset", offset.to_string()));
        }
        if let Some(limit) = self.limit {
            query.push(("pagination.limit", limit.to_string()));
        }
        if self.count_total {
            query.push(("pagination.count_total", "true".to_string()));
        }
        if self.reverse {
            query.push(("pagination.reverse", "true".to_string()));
        }

        query
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct PageResponse {
    #[serde(default)]
    pub next_key: Option<String>,
    #[serde(default)]
    pub total: Option<String>,
}

/// One page of grants, exactly as the node returned it
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct GrantsPage {
    #[serde(default)]
    pub grants: Vec<Grant>,
    #[serde(default)]
    pub pagination: Option<PageResponse>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Delegation {
    pub delegator_address: Address,
    pub validator_address: Address,
    pub shares: Decimal256,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DelegationResponse {
    pub delegation: Delegation,
    pub balance: RestCoin,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ValidatorReward {
    pub validator_address: Address,
    #[serde(default)]
    pub reward: Vec<RestDecCoin>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct RewardsResponse {
    #[serde(default)]
    pub rewards: Vec<ValidatorReward>,
    #[serde(default)]
    pub total: Vec<RestDecCoin>,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn authorization_kinds() {
        let send: Authorization = serde_json::from_value(serde_json::json!({
            "@type": SEND_AUTHORIZATION,
            "spend_limit": [{"denom": "uatom", "amount": "1000"}],
            "allow_list": []
        }))
        .unwrap();

        assert_eq!(
            send.kind(),
            AuthorizationKind::Send {
                spend_limit: vec![RestCoin::new(1000u128, "uatom")],
                allow_list: vec![],
            }
        );
        assert_eq!(
            send.msg_type_url().as_deref(),
            Some("/cosmos.bank.v1beta1.MsgSend")
        );

        let generic = Authorization::generic("/cosmos.gov.v1beta1.MsgVote");
        assert_eq!(
            generic.msg_type_url().as_deref(),
            Some("/cosmos.gov.v1beta1.MsgVote")
        );

        let stake: Authorization = serde_json::from_value(serde_json::json!({
            "@type": STAKE_AUTHORIZATION,
            "max_tokens": null,
            "allow_list": {"address": ["cosmosvaloper1abc"]},
            "authorization_type": "AUTHORIZATION_TYPE_DELEGATE"
        }))
        .unwrap();

        match stake.kind() {
            AuthorizationKind::Stake {
                allow_list,
                max_tokens,
                ..
            } => {
                assert_eq!(allow_list, vec!["cosmosvaloper1abc".to_string()]);
                assert!(max_tokens.is_none());
            }
            other => panic!("unexpected kind {other:?}"),
        }

        let unknown: Authorization =
            serde_json::from_value(serde_json::json!({"@type": "/custom.Auth"})).unwrap();
        assert_eq!(unknown.kind(), AuthorizationKind::Other("/custom.Auth".into()));
        assert_eq!(unknown.msg_type_url(), None);
    }

    #[test]
    fn pagination_query_params() {
        let page = PageRequest {
            key: Some("abc=".to_string()),
            limit: Some(10),
            reverse: true,
            ..Default::default()
        };

        assert_eq!(
            page.to_query(),
            vec![
                ("pagination.key", "abc=".to_string()),
                ("pagination.limit", "10".to_string()),
                ("pagination.reverse", "true".to_string()),
            ]
        );

        let done = PageResponse {
            next_key: None,
            total: Some("3".to_string()),
        };
        assert!(page.next(&done).is_none());

        let more = PageResponse {
            next_key: Some("def=".to_string()),
            total: None,
        };
        assert_eq!(page.next(&more).unwrap().key.as_deref(), Some("def="));
    }
}
