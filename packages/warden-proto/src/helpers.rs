use super::proto::*;
use anyhow::Result;

/// the typical type used for turning protobuf messages into `Any` messages
/// especially used in transactions, and needed for multi-message transactions
/// so exported in the prelude
pub fn proto_into_any<M>(msg: &M) -> Result<Any>
where
    M: Name,
{
    Any::from_msg(msg).map_err(|e| e.into())
}

pub fn proto_into_bytes<M>(msg: &M) -> Result<Vec<u8>>
where
    M: Name,
{
    Ok(proto_into_any(msg)?.value)
}

/// The type url a message will carry once packed into an `Any`
pub fn type_url_of<M>() -> String
where
    M: Name,
{
    M::type_url()
}

/// Decodes an `Any` back into a concrete message, checking the type url first
pub fn any_into_proto<M>(any: &Any) -> Result<M>
where
    M: Name + Default,
{
    if any.type_url != M::type_url() {
        anyhow::bail!(
            "expected type url {}, got {}",
            M::type_url(),
            any.type_url
        );
    }

    Ok(M::decode(any.value.as_slice())?)
}
