//! Message builders for every transaction the dashboard submits
//!
//! Grants and revokes are signed by the granter. Everything wrapped in a `MsgExec`
//! is authored by the granter but signed by the grantee.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use warden_proto::{authz, bank, distribution, gov, slashing, staking, Any, Timestamp};

use crate::prelude::*;

pub fn grant_send_msg(
    granter: &Address,
    grantee: &Address,
    spend_limit: Vec<warden_proto::Coin>,
    expiration: Option<Timestamp>,
) -> Result<authz::MsgGrant> {
    let authorization = bank::SendAuthorization {
        spend_limit,
        allow_list: Vec::new(),
    };

    grant_msg(granter, grantee, proto_into_any(&authorization)?, expiration)
}

pub fn grant_generic_msg(
    granter: &Address,
    grantee: &Address,
    msg_type_url: impl Into<String>,
    expiration: Option<Timestamp>,
) -> Result<authz::MsgGrant> {
    let msg = msg_type_url.into();
    if msg.is_empty() {
        bail!("generic grant needs a message type url");
    }

    let authorization = authz::GenericAuthorization { msg };

    grant_msg(granter, grantee, proto_into_any(&authorization)?, expiration)
}

pub fn grant_msg(
    granter: &Address,
    grantee: &Address,
    authorization: Any,
    expiration: Option<Timestamp>,
) -> Result<authz::MsgGrant> {
    Ok(authz::MsgGrant {
        granter: granter.to_string(),
        grantee: grantee.to_string(),
        grant: Some(authz::Grant {
            authorization: Some(authorization),
            expiration,
        }),
    })
}

pub fn revoke_msg(
    granter: &Address,
    grantee: &Address,
    msg_type_url: impl Into<String>,
) -> authz::MsgRevoke {
    authz::MsgRevoke {
        granter: granter.to_string(),
        grantee: grantee.to_string(),
        msg_type_url: msg_type_url.into(),
    }
}

pub fn exec_msg(grantee: &Address, msgs: Vec<Any>) -> authz::MsgExec {
    authz::MsgExec {
        grantee: grantee.to_string(),
        msgs,
    }
}

pub fn send_msg(from: &Address, to: &Address, amount: Vec<warden_proto::Coin>) -> bank::MsgSend {
    bank::MsgSend {
        from_address: from.to_string(),
        to_address: to.to_string(),
        amount,
    }
}

pub fn vote_msg(
    voter: &Address,
    proposal_id: u64,
    option: gov::v1beta1::VoteOption,
) -> gov::v1beta1::MsgVote {
    gov::v1beta1::MsgVote {
        proposal_id,
        voter: voter.to_string(),
        option: option.into(),
    }
}

pub fn withdraw_rewards_msg(
    delegator: &Address,
    validator: &Address,
) -> distribution::MsgWithdrawDelegatorReward {
    distribution::MsgWithdrawDelegatorReward {
        delegator_address: delegator.to_string(),
        validator_address: validator.to_string(),
    }
}

pub fn delegate_msg(
    delegator: &Address,
    validator: &Address,
    amount: warden_proto::Coin,
) -> staking::MsgDelegate {
    staking::MsgDelegate {
        delegator_address: delegator.to_string(),
        validator_address: validator.to_string(),
        amount: Some(amount),
    }
}

pub fn redelegate_msg(
    delegator: &Address,
    src_validator: &Address,
    dst_validator: &Address,
    amount: warden_proto::Coin,
) -> staking::MsgBeginRedelegate {
    staking::MsgBeginRedelegate {
        delegator_address: delegator.to_string(),
        validator_src_address: src_validator.to_string(),
        validator_dst_address: dst_validator.to_string(),
        amount: Some(amount),
    }
}

pub fn undelegate_msg(
    delegator: &Address,
    validator: &Address,
    amount: warden_proto::Coin,
) -> staking::MsgUndelegate {
    staking::MsgUndelegate {
        delegator_address: delegator.to_string(),
        validator_address: validator.to_string(),
        amount: Some(amount),
    }
}

pub fn unjail_msg(validator: &Address) -> slashing::MsgUnjail {
    slashing::MsgUnjail {
        validator_addr: validator.to_string(),
    }
}

/// Expiration `duration` from now
pub fn expiration_in(duration: Duration) -> Result<Timestamp> {
    let at = SystemTime::now()
        .checked_add(duration)
        .context("expiration overflows")?
        .duration_since(UNIX_EPOCH)?;

    Ok(Timestamp {
        seconds: i64::try_from(at.as_secs())?,
        nanos: 0,
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use warden_proto::{any_into_proto, type_url_of};

    fn granter() -> Address {
        Address::new_bytes(vec![1; 20], "cosmos").unwrap()
    }

    fn grantee() -> Address {
        Address::new_bytes(vec![2; 20], "cosmos").unwrap()
    }

    #[test]
    fn grant_send_wraps_send_authorization() {
        let expiration = Timestamp {
            seconds: 1_900_000_000,
            nanos: 0,
        };
        let msg = grant_send_msg(
            &granter(),
            &grantee(),
            vec![new_coin(1_000_000, "uatom")],
            Some(expiration.clone()),
        )
        .unwrap();

        assert_eq!(msg.granter, granter().to_string());
        let grant = msg.grant.unwrap();
        assert_eq!(grant.expiration, Some(expiration));

        let any = grant.authorization.unwrap();
        assert_eq!(any.type_url, "/cosmos.bank.v1beta1.SendAuthorization");
        let authorization: bank::SendAuthorization = any_into_proto(&any).unwrap();
        assert_eq!(authorization.spend_limit, vec![new_coin(1_000_000, "uatom")]);
    }

    #[test]
    fn grant_generic_requires_type_url() {
        assert!(grant_generic_msg(&granter(), &grantee(), "", None).is_err());

        let msg = grant_generic_msg(
            &granter(),
            &grantee(),
            "/cosmos.gov.v1beta1.MsgVote",
            None,
        )
        .unwrap();
        let any = msg.grant.unwrap().authorization.unwrap();
        let authorization: authz::GenericAuthorization = any_into_proto(&any).unwrap();
        assert_eq!(authorization.msg, "/cosmos.gov.v1beta1.MsgVote");
    }

    #[test]
    fn exec_carries_inner_messages() {
        let inner = proto_into_any(&send_msg(
            &granter(),
            &grantee(),
            vec![new_coin(5, "uatom")],
        ))
        .unwrap();
        let exec = exec_msg(&grantee(), vec![inner.clone()]);

        assert_eq!(exec.grantee, grantee().to_string());
        assert_eq!(exec.msgs, vec![inner]);
        assert_eq!(exec.msgs[0].type_url, type_url_of::<bank::MsgSend>());
    }

    #[test]
    fn expiration_is_in_the_future() {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_secs() as i64;
        let ts = expiration_in(Duration::from_secs(3600)).unwrap();
        assert!(ts.seconds >= now + 3599);
    }
}
