//! Routing of "exec on behalf of" operations to their message builders
//!
//! An operation arrives as a symbolic kind plus a payload (typically JSON from a form),
//! and leaves as exactly one `MsgExec` wrapping the granter's messages.

use std::str::FromStr;

use cosmwasm_std::Uint128;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use warden_proto::{gov::v1beta1::VoteOption, Any};

use crate::{
    error::{DispatchError, WardenError},
    prelude::*,
    signing::msg,
};

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ExecKind {
    Send,
    Vote,
    Withdraw,
    Delegate,
    Redelegate,
    Undelegate,
    Unjail,
}

impl ExecKind {
    pub const ALL: [ExecKind; 7] = [
        Self::Send,
        Self::Vote,
        Self::Withdraw,
        Self::Delegate,
        Self::Redelegate,
        Self::Undelegate,
        Self::Unjail,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Send => "send",
            Self::Vote => "vote",
            Self::Withdraw => "withdraw",
            Self::Delegate => "delegate",
            Self::Redelegate => "redelegate",
            Self::Undelegate => "undelegate",
            Self::Unjail => "unjail",
        }
    }

    pub fn tx_kind(&self) -> TxKind {
        match self {
            Self::Send => TxKind::ExecSend,
            Self::Vote => TxKind::ExecVote,
            Self::Withdraw => TxKind::ExecWithdraw,
            Self::Delegate => TxKind::ExecDelegate,
            Self::Redelegate => TxKind::ExecRedelegate,
            Self::Undelegate => TxKind::ExecUndelegate,
            Self::Unjail => TxKind::ExecUnjail,
        }
    }
}

impl FromStr for ExecKind {
    type Err = DispatchError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| DispatchError::unsupported(s))
    }
}

impl std::fmt::Display for ExecKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case", try_from = "VoteChoiceRepr")]
pub enum VoteChoice {
    Yes,
    Abstain,
    No,
    NoWithVeto,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum VoteChoiceRepr {
    Number(u8),
    Text(String),
}

impl TryFrom<VoteChoiceRepr> for VoteChoice {
    type Error = DispatchError;

    fn try_from(repr: VoteChoiceRepr) -> std::result::Result<Self, Self::Error> {
        match repr {
            VoteChoiceRepr::Number(n) => n.to_string().parse(),
            VoteChoiceRepr::Text(s) => s.parse(),
        }
    }
}

impl FromStr for VoteChoice {
    type Err = DispatchError;

    // accepts the names, the proto enum names, and the proto numbers
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        let normalized = normalized
            .strip_prefix("vote_option_")
            .unwrap_or(&normalized);

        match normalized {
            "yes" | "1" => Ok(Self::Yes),
            "abstain" | "2" => Ok(Self::Abstain),
            "no" | "3" => Ok(Self::No),
            "no_with_veto" | "nowithveto" | "veto" | "4" => Ok(Self::NoWithVeto),
            _ => Err(DispatchError::invalid_payload(
                "vote",
                format!("unknown vote option {s}"),
            )),
        }
    }
}

impl From<VoteChoice> for VoteOption {
    fn from(choice: VoteChoice) -> Self {
        match choice {
            VoteChoice::Yes => VoteOption::Yes,
            VoteChoice::Abstain => VoteOption::Abstain,
            VoteChoice::No => VoteOption::No,
            VoteChoice::NoWithVeto => VoteOption::NoWithVeto,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct WithdrawPair {
    pub delegator: Address,
    pub validator: Address,
}

/// A typed exec payload, one variant per `ExecKind`
///
/// As JSON the kind is the `type` field, e.g.
/// `{"type": "vote", "granter": "cosmos1...", "proposal_id": 42, "option": "yes"}`
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ExecOperation {
    Send {
        granter: Address,
        recipient: Address,
        amount: Uint128,
        denom: String,
    },
    Vote {
        granter: Address,
        #[serde(deserialize_with = "u64_from_str_or_num")]
        proposal_id: u64,
        option: VoteChoice,
        /// becomes the transaction memo
        #[serde(default)]
        metadata: Option<String>,
    },
    Withdraw {
        pairs: Vec<WithdrawPair>,
    },
    Delegate {
        delegator: Address,
        validator: Address,
        amount: Uint128,
        denom: String,
    },
    Redelegate {
        delegator: Address,
        src_validator: Address,
        dst_validator: Address,
        amount: Uint128,
        denom: String,
    },
    Undelegate {
        delegator: Address,
        validator: Address,
        amount: Uint128,
        denom: String,
    },
    Unjail {
        validator: Address,
    },
}

impl ExecOperation {
    /// Parses an untyped payload, telling an unknown kind apart from a malformed payload
    pub fn from_value(value: Value) -> std::result::Result<Self, DispatchError> {
        let kind = match value.get("type") {
            Some(Value::String(kind)) => kind.parse::<ExecKind>()?,
            Some(other) => return Err(DispatchError::unsupported(other.to_string())),
            None => return Err(DispatchError::MissingKind),
        };

        let op: Self = serde_json::from_value(value)
            .map_err(|e| DispatchError::invalid_payload(kind.as_str(), e))?;

        op.validate()?;

        Ok(op)
    }

    pub fn kind(&self) -> ExecKind {
        match self {
            Self::Send { .. } => ExecKind::Send,
            Self::Vote { .. } => ExecKind::Vote,
            Self::Withdraw { .. } => ExecKind::Withdraw,
            Self::Delegate { .. } => ExecKind::Delegate,
            Self::Redelegate { .. } => ExecKind::Redelegate,
            Self::Undelegate { .. } => ExecKind::Undelegate,
            Self::Unjail { .. } => ExecKind::Unjail,
        }
    }

    pub fn validate(&self) -> std::result::Result<(), DispatchError> {
        match self {
            Self::Withdraw { pairs } if pairs.is_empty() => Err(DispatchError::invalid_payload(
                "withdraw",
                "needs at least one delegator/validator pair",
            )),
            Self::Redelegate {
                src_validator,
                dst_validator,
                ..
            } if src_validator == dst_validator => Err(DispatchError::invalid_payload(
                "redelegate",
                "source and destination validators are the same",
            )),
            Self::Send { denom, .. }
            | Self::Delegate { denom, .. }
            | Self::Redelegate { denom, .. }
            | Self::Undelegate { denom, .. }
                if denom.is_empty() =>
            {
                Err(DispatchError::invalid_payload(self.kind().as_str(), "missing denom"))
            }
            _ => Ok(()),
        }
    }

    /// Memo to broadcast with, only votes carry one
    pub fn memo(&self) -> String {
        match self {
            Self::Vote { metadata, .. } => metadata.clone().unwrap_or_default(),
            _ => String::new(),
        }
    }

    /// The granter's messages, before wrapping
    pub fn messages(&self) -> Result<Vec<Any>> {
        let msgs = match self {
            Self::Send {
                granter,
                recipient,
                amount,
                denom,
            } => vec![proto_into_any(&msg::send_msg(
                granter,
                recipient,
                vec![new_coin(amount, denom)],
            ))?],
            Self::Vote {
                granter,
                proposal_id,
                option,
                ..
            } => vec![proto_into_any(&msg::vote_msg(
                granter,
                *proposal_id,
                (*option).into(),
            ))?],
            Self::Withdraw { pairs } => pairs
                .iter()
                .map(|pair| {
                    proto_into_any(&msg::withdraw_rewards_msg(&pair.delegator, &pair.validator))
                })
                .collect::<Result<Vec<_>>>()?,
            Self::Delegate {
                delegator,
                validator,
                amount,
                denom,
            } => vec![proto_into_any(&msg::delegate_msg(
                delegator,
                validator,
                new_coin(amount, denom),
            ))?],
            Self::Redelegate {
                delegator,
                src_validator,
                dst_validator,
                amount,
                denom,
            } => vec![proto_into_any(&msg::redelegate_msg(
                delegator,
                src_validator,
                dst_validator,
                new_coin(amount, denom),
            ))?],
            Self::Undelegate {
                delegator,
                validator,
                amount,
                denom,
            } => vec![proto_into_any(&msg::undelegate_msg(
                delegator,
                validator,
                new_coin(amount, denom),
            ))?],
            Self::Unjail { validator } => vec![proto_into_any(&msg::unjail_msg(validator))?],
        };

        Ok(msgs)
    }

    /// Exactly one `MsgExec`, signed by `grantee`
    pub fn build(&self, grantee: &Address) -> std::result::Result<Any, WardenError> {
        self.validate()?;
        let exec = msg::exec_msg(grantee, self.messages()?);
        Ok(proto_into_any(&exec)?)
    }
}

fn u64_from_str_or_num<'de, D>(deserializer: D) -> std::result::Result<u64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Number(u64),
        Text(String),
    }

    match Repr::deserialize(deserializer)? {
        Repr::Number(n) => Ok(n),
        Repr::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}
