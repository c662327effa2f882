use std::process::Stdio;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use base64::Engine;
use tokio::io::AsyncWriteExt;
use warden::{prelude::*, proto::MessageExt};

use crate::config::SignerConfigInit;

/// Hands signing to an external program, the cli never sees a key
///
/// The program gets the SignDoc bytes, base64 encoded, on stdin and must print the
/// base64 signature on stdout.
#[derive(Clone, Debug)]
pub struct CommandSigner {
    pub command: String,
    pub args: Vec<String>,
    public_key: PublicKey,
}

impl CommandSigner {
    pub fn new(config: &SignerConfigInit) -> Result<Self> {
        let key_bytes = base64::engine::general_purpose::STANDARD
            .decode(config.public_key.trim())
            .context("signer public key is not valid base64")?;

        let public_key = PublicKey::from_raw_secp256k1(&key_bytes)
            .context("signer public key is not a secp256k1 key")?;

        Ok(Self {
            command: config.command.clone(),
            args: config.args.clone(),
            public_key,
        })
    }
}

#[async_trait]
impl TxSigner for CommandSigner {
    async fn sign(&self, doc: &warden::proto::tx::SignDoc) -> Result<Vec<u8>> {
        let doc = base64::engine::general_purpose::STANDARD.encode(doc.to_bytes()?);

        let mut child = tokio::process::Command::new(&self.command)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .with_context(|| format!("couldn't start signer {}", self.command))?;

        let mut stdin = child.stdin.take().context("signer stdin unavailable")?;
        stdin.write_all(doc.as_bytes()).await?;
        drop(stdin);

        let output = child.wait_with_output().await?;
        if !output.status.success() {
            bail!("signer {} exited with {}", self.command, output.status);
        }

        let signature = String::from_utf8(output.stdout).context("signer output is not utf-8")?;

        base64::engine::general_purpose::STANDARD
            .decode(signature.trim())
            .context("signer output is not valid base64")
    }

    async fn public_key(&self) -> Result<PublicKey> {
        Ok(self.public_key)
    }
}
