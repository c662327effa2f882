use anyhow::{bail, Result};
use async_trait::async_trait;
use warden_proto::MessageExt;

pub use tendermint::PublicKey;

// Signing itself (key storage, wallets, hardware) lives outside of this crate,
// anything that can produce a signature over a SignDoc plugs in here
#[async_trait]
pub trait TxSigner: Send + Sync {
    async fn sign(&self, doc: &warden_proto::tx::SignDoc) -> Result<Vec<u8>>;
    async fn public_key(&self) -> Result<PublicKey>;
    async fn public_key_as_proto(&self) -> Result<warden_proto::Any> {
        public_key_to_proto(&self.public_key().await?)
    }
}

/// SignerInfo for direct-mode signing at the given sequence
pub fn direct_signer_info(
    public_key: warden_proto::Any,
    sequence: u64,
) -> warden_proto::tx::SignerInfo {
    warden_proto::tx::SignerInfo {
        public_key: Some(public_key),
        mode_info: Some(warden_proto::tx::ModeInfo {
            sum: Some(warden_proto::tx::mode_info::Sum::Single(
                warden_proto::tx::mode_info::Single {
                    mode: warden_proto::tx::signing::SignMode::Direct.into(),
                },
            )),
        }),
        sequence,
    }
}

pub fn public_key_to_proto(public_key: &PublicKey) -> Result<warden_proto::Any> {
    let value = match public_key {
        tendermint::PublicKey::Ed25519(_) => warden_proto::crypto::ed25519::PubKey {
            key: public_key.to_bytes(),
        }
        .to_bytes()?,
        tendermint::PublicKey::Secp256k1(_) => warden_proto::crypto::secp256k1::PubKey {
            key: public_key.to_bytes(),
        }
        .to_bytes()?,
        _ => {
            bail!("Invalid public key type!")
        }
    };

    let type_url = match public_key {
        tendermint::PublicKey::Ed25519(_) => "/cosmos.crypto.ed25519.PubKey",
        tendermint::PublicKey::Secp256k1(_) => "/cosmos.crypto.secp256k1.PubKey",
        _ => {
            bail!("Invalid public key type!")
        }
    };

    Ok(warden_proto::Any {
        type_url: type_url.to_string(),
        value,
    })
}
