use std::{collections::BTreeMap, path::PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use warden::prelude::*;

use crate::args::LogLevel;

/// This is first loaded via the filepath (warden.toml by default, settable via CLI arg --config)
/// Then, the .env file is loaded if specified in the `dotenv` field
/// Finally, any env vars are loaded, overwriting any previous values if found
/// For the environment variables, the prefix `WARDEN_` is used and the field name in all caps
/// For example, the field `log_level` would be set by the env var `WARDEN_LOG_LEVEL`
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ConfigInit {
    pub dotenv: Option<PathBuf>,
    pub log_level: LogLevel,
    /// extra `tracing_subscriber::EnvFilter` directives, e.g. "warden_core=debug"
    #[serde(default)]
    pub tracing_directives: Vec<String>,
    pub chains: Vec<ChainConfig>,
    /// network names the overview covers when none are given, all chains if empty
    #[serde(default)]
    pub overview_chains: Vec<String>,
    #[serde(default)]
    pub gas: GasTable,
    /// USD per display unit, keyed by base denom
    #[serde(default)]
    pub prices: BTreeMap<String, f64>,
    pub signer: Option<SignerConfigInit>,
    /// seconds to wait for a broadcast tx to be included
    pub tx_poll_timeout: Option<u64>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct SignerConfigInit {
    /// Program that signs, it reads a base64 SignDoc on stdin and prints a base64 signature
    pub command: String,
    #[serde(default)]
    pub args: Vec<String>,
    /// base64 of the compressed secp256k1 public key
    pub public_key: String,
}

// This is simply derived from ConfigInit in a format that's more reasonable to pass around
#[derive(Debug, Clone)]
pub struct Config {
    pub tracing_level: tracing::Level,
    pub tracing_directives: Vec<String>,
    pub networks: Networks,
    pub overview_chains: Vec<ChainId>,
    pub gas: GasTable,
    pub prices: Prices,
    pub signer: Option<SignerConfigInit>,
    pub tx_poll_timeout: std::time::Duration,
}

impl ConfigInit {
    pub const DEFAULT_TX_POLL_TIMEOUT_SECS: u64 = 30;

    pub async fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let s = tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("couldn't read config at {}", path.display()))?;
        Self::load_inner(&s)
    }

    fn load_inner(s: &str) -> Result<Self> {
        // first load from the file
        let mut config: Self = toml::from_str(s).context("couldn't parse config")?;

        // next load .env file, if specified
        if let Some(dotenv) = &config.dotenv {
            if dotenvy::from_filename(dotenv).is_err() {
                eprintln!("Failed to load .env file");
            }
        }

        config.apply_env(|key| std::env::var(key).ok())?;

        Ok(config)
    }

    // none of these fail when unset, only when set to something unparseable
    fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(log_level) = var("WARDEN_LOG_LEVEL") {
            self.log_level = log_level.parse().unwrap_or(self.log_level);
        }

        if let Some(directives) = var("WARDEN_TRACING_DIRECTIVES") {
            self.tracing_directives = split_list(&directives);
        }

        if let Some(overview_chains) = var("WARDEN_OVERVIEW_CHAINS") {
            self.overview_chains = split_list(&overview_chains);
        }

        if let Some(timeout) = var("WARDEN_TX_POLL_TIMEOUT") {
            self.tx_poll_timeout = Some(timeout.parse().context("Failed to parse tx poll timeout")?);
        }

        if let Some(command) = var("WARDEN_SIGNER_COMMAND") {
            match &mut self.signer {
                Some(signer) => signer.command = command,
                None => {
                    self.signer = Some(SignerConfigInit {
                        command,
                        args: Vec::new(),
                        public_key: var("WARDEN_SIGNER_PUBLIC_KEY").unwrap_or_default(),
                    })
                }
            }
        }

        if let Some(public_key) = var("WARDEN_SIGNER_PUBLIC_KEY") {
            if let Some(signer) = &mut self.signer {
                signer.public_key = public_key;
            }
        }

        Ok(())
    }
}

fn split_list(s: &str) -> Vec<String> {
    s.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

impl TryFrom<ConfigInit> for Config {
    type Error = anyhow::Error;

    fn try_from(config: ConfigInit) -> Result<Self> {
        if config.chains.is_empty() {
            anyhow::bail!("no chains configured");
        }

        for chain in &config.chains {
            // fails early on a bad endpoint instead of on the first query
            warden::prelude::rest_url(&chain.rest_endpoint, "/")
                .with_context(|| format!("invalid rest endpoint for {}", chain.chain_id))?;
        }

        let networks = Networks::new(config.chains);

        let overview_chains = match config.overview_chains.is_empty() {
            true => networks.ids().cloned().collect(),
            false => {
                let ids = networks.ids_for_names(config.overview_chains.iter().map(String::as_str));
                if ids.len() != config.overview_chains.len() {
                    anyhow::bail!(
                        "unknown network in overview_chains: {}",
                        config.overview_chains.join(", ")
                    );
                }
                ids
            }
        };

        if let Some(signer) = &config.signer {
            if signer.command.is_empty() {
                anyhow::bail!("signer command is empty");
            }
        }

        Ok(Self {
            tracing_level: tracing::Level::from(config.log_level),
            tracing_directives: config.tracing_directives,
            networks,
            overview_chains,
            gas: config.gas,
            prices: config
                .prices
                .into_iter()
                .map(|(denom, usd)| (denom, Price { usd }))
                .collect(),
            signer: config.signer,
            tx_poll_timeout: std::time::Duration::from_secs(
                config
                    .tx_poll_timeout
                    .unwrap_or(ConfigInit::DEFAULT_TX_POLL_TIMEOUT_SECS),
            ),
        })
    }
}
