use serde::{Deserialize, Serialize};
use std::{
    collections::BTreeMap,
    fmt::{Debug, Display},
    str::FromStr,
};

use crate::error::{ConfigError, Result};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ChainConfig {
    pub chain_id: ChainId,
    /// Human-readable network name, e.g. "cosmoshub"
    pub name: String,
    /// Base url of the chain's REST (LCD) endpoint
    pub rest_endpoint: String,
    pub address_prefix: String,
    /// The native staking/fee currency in base units, e.g. "uatom"
    pub denom: String,
    /// Number of decimals between the base denom and its display unit
    pub decimals: u32,
    /// not micro-units, e.g. 0.025 would be a typical value
    pub gas_price: f32,
}

impl ChainConfig {
    /// Fee for a given gas limit, rounded up to the next base unit
    pub fn fee_for_gas(&self, gas_limit: u64) -> u128 {
        (self.gas_price * gas_limit as f32).ceil() as u128
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, Hash, PartialEq, Eq, PartialOrd, Ord)]
#[serde(transparent)]
pub struct ChainId(String);
impl ChainId {
    pub fn new(id: impl ToString) -> Self {
        Self(id.to_string())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromStr for ChainId {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

impl Display for ChainId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// All the chains the dashboard knows about, keyed by chain id
///
/// Also keeps the name <-> id lookups the overview needs
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(from = "Vec<ChainConfig>", into = "Vec<ChainConfig>")]
pub struct Networks {
    chains: BTreeMap<ChainId, ChainConfig>,
}

impl Networks {
    pub fn new(chains: impl IntoIterator<Item = ChainConfig>) -> Self {
        Self {
            chains: chains
                .into_iter()
                .map(|chain| (chain.chain_id.clone(), chain))
                .collect(),
        }
    }

    pub fn insert(&mut self, chain: ChainConfig) {
        self.chains.insert(chain.chain_id.clone(), chain);
    }

    pub fn get(&self, chain_id: &ChainId) -> Result<&ChainConfig> {
        self.chains
            .get(chain_id)
            .ok_or_else(|| ConfigError::unknown_chain(chain_id.as_str()))
    }

    pub fn id_of(&self, name: &str) -> Option<&ChainId> {
        self.chains
            .values()
            .find(|chain| chain.name == name)
            .map(|chain| &chain.chain_id)
    }

    pub fn name_of(&self, chain_id: &ChainId) -> Option<&str> {
        self.chains.get(chain_id).map(|chain| chain.name.as_str())
    }

    /// Resolves network names to chain ids, names that aren't known are skipped
    pub fn ids_for_names<'a>(&self, names: impl IntoIterator<Item = &'a str>) -> Vec<ChainId> {
        names
            .into_iter()
            .filter_map(|name| self.id_of(name).cloned())
            .collect()
    }

    pub fn ids(&self) -> impl Iterator<Item = &ChainId> {
        self.chains.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ChainConfig> {
        self.chains.values()
    }

    pub fn len(&self) -> usize {
        self.chains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chains.is_empty()
    }
}

impl From<Vec<ChainConfig>> for Networks {
    fn from(chains: Vec<ChainConfig>) -> Self {
        Self::new(chains)
    }
}

impl From<Networks> for Vec<ChainConfig> {
    fn from(networks: Networks) -> Self {
        networks.chains.into_values().collect()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    pub fn cosmoshub() -> ChainConfig {
        ChainConfig {
            chain_id: ChainId::new("cosmoshub-4"),
            name: "cosmoshub".to_string(),
            rest_endpoint: "https://rest.cosmos.directory/cosmoshub".to_string(),
            address_prefix: "cosmos".to_string(),
            denom: "uatom".to_string(),
            decimals: 6,
            gas_price: 0.025,
        }
    }

    #[test]
    fn fee_rounds_up() {
        let chain = cosmoshub();
        assert_eq!(chain.fee_for_gas(260000), 6500);
        assert_eq!(chain.fee_for_gas(1), 1);
    }

    #[test]
    fn networks_lookup() {
        let networks = Networks::new([cosmoshub()]);
        let id = ChainId::new("cosmoshub-4");

        assert_eq!(networks.id_of("cosmoshub"), Some(&id));
        assert_eq!(networks.name_of(&id), Some("cosmoshub"));
        assert_eq!(
            networks.ids_for_names(["cosmoshub", "missing"]),
            vec![id.clone()]
        );
        assert!(networks.get(&ChainId::new("osmosis-1")).is_err());
    }

    #[test]
    fn networks_from_toml() {
        #[derive(Deserialize)]
        struct File {
            chains: Networks,
        }

        let file: File = toml::from_str(
            r#"
            [[chains]]
            chain_id = "osmosis-1"
            name = "osmosis"
            rest_endpoint = "https://lcd.osmosis.zone"
            address_prefix = "osmo"
            denom = "uosmo"
            decimals = 6
            gas_price = 0.0025
            "#,
        )
        .unwrap();

        let chain = file.chains.get(&ChainId::new("osmosis-1")).unwrap();
        assert_eq!(chain.denom, "uosmo");
        assert_eq!(file.chains.len(), 1);
    }
}
