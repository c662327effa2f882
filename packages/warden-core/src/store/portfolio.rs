use std::collections::BTreeMap;

use cosmwasm_std::{Decimal256, Uint128};
use futures_signals::signal::{Mutable, Signal};
use serde::{Deserialize, Serialize};

use super::FetchStatus;
use crate::{
    prelude::*,
    querier::types::{DelegationResponse, RestCoin, RewardsResponse},
};

/// One async-loaded piece of per-chain data
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Loadable<T> {
    pub status: FetchStatus,
    pub error_message: String,
    pub data: T,
}

impl<T: Default> Loadable<T> {
    fn pending() -> Self {
        Self {
            status: FetchStatus::Pending,
            error_message: String::new(),
            data: T::default(),
        }
    }

    fn loaded(data: T) -> Self {
        Self {
            status: FetchStatus::Idle,
            error_message: String::new(),
            data,
        }
    }

    fn rejected(error_message: String) -> Self {
        Self {
            status: FetchStatus::Rejected,
            error_message,
            data: T::default(),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Delegations {
    pub delegations: Vec<DelegationResponse>,
    /// sum of the delegated balances in the chain's native denom, base units
    pub total_staked: Uint128,
}

impl Delegations {
    pub fn new(delegations: Vec<DelegationResponse>, denom: &str) -> Self {
        let total_staked = delegations
            .iter()
            .filter(|d| d.balance.denom == denom)
            .fold(Uint128::zero(), |acc, d| acc.saturating_add(d.balance.amount));

        Self {
            delegations,
            total_staked,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Rewards {
    pub rewards: RewardsResponse,
    /// pending rewards in the chain's native denom, base units
    pub total_rewards: Decimal256,
}

impl Rewards {
    pub fn new(rewards: RewardsResponse, denom: &str) -> Self {
        let total_rewards = rewards
            .total
            .iter()
            .filter(|coin| coin.denom == denom)
            .fold(Decimal256::zero(), |acc, coin| acc.saturating_add(coin.amount));

        Self {
            rewards,
            total_rewards,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct ChainPortfolio {
    pub balances: Loadable<Vec<RestCoin>>,
    pub delegations: Loadable<Delegations>,
    pub rewards: Loadable<Rewards>,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PortfolioPart {
    Balances,
    Delegations,
    Rewards,
}

impl std::fmt::Display for PortfolioPart {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Balances => write!(f, "balances"),
            Self::Delegations => write!(f, "delegations"),
            Self::Rewards => write!(f, "rewards"),
        }
    }
}

#[derive(Clone, Debug)]
pub enum PortfolioEvent {
    Started {
        chain_id: ChainId,
        part: PortfolioPart,
    },
    BalancesLoaded {
        chain_id: ChainId,
        balances: Vec<RestCoin>,
    },
    DelegationsLoaded {
        chain_id: ChainId,
        delegations: Delegations,
    },
    RewardsLoaded {
        chain_id: ChainId,
        rewards: Rewards,
    },
    Failed {
        chain_id: ChainId,
        part: PortfolioPart,
        error: String,
    },
}

/// Balances, delegations and rewards per chain, for one account
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct PortfolioState {
    pub chains: BTreeMap<ChainId, ChainPortfolio>,
}

impl PortfolioState {
    pub fn chain(&self, chain_id: &ChainId) -> Option<&ChainPortfolio> {
        self.chains.get(chain_id)
    }

    pub fn reduce(mut self, event: PortfolioEvent) -> Self {
        match event {
            PortfolioEvent::Started { chain_id, part } => {
                let chain = self.chains.entry(chain_id).or_default();
                match part {
                    PortfolioPart::Balances => chain.balances = Loadable::pending(),
                    PortfolioPart::Delegations => chain.delegations = Loadable::pending(),
                    PortfolioPart::Rewards => chain.rewards = Loadable::pending(),
                }
            }
            PortfolioEvent::BalancesLoaded { chain_id, balances } => {
                self.chains.entry(chain_id).or_default().balances = Loadable::loaded(balances);
            }
            PortfolioEvent::DelegationsLoaded {
                chain_id,
                delegations,
            } => {
                self.chains.entry(chain_id).or_default().delegations =
                    Loadable::loaded(delegations);
            }
            PortfolioEvent::RewardsLoaded { chain_id, rewards } => {
                self.chains.entry(chain_id).or_default().rewards = Loadable::loaded(rewards);
            }
            PortfolioEvent::Failed {
                chain_id,
                part,
                error,
            } => {
                let chain = self.chains.entry(chain_id).or_default();
                match part {
                    PortfolioPart::Balances => chain.balances = Loadable::rejected(error),
                    PortfolioPart::Delegations => chain.delegations = Loadable::rejected(error),
                    PortfolioPart::Rewards => chain.rewards = Loadable::rejected(error),
                }
            }
        }

        self
    }
}

/// Shared, observable `PortfolioState`
#[derive(Clone, Default)]
pub struct PortfolioStore {
    state: Mutable<PortfolioState>,
}

impl std::fmt::Debug for PortfolioStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PortfolioStore").finish_non_exhaustive()
    }
}

impl PortfolioStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dispatch(&self, event: PortfolioEvent) {
        let mut state = self.state.lock_mut();
        let current = std::mem::take(&mut *state);
        *state = current.reduce(event);
    }

    pub fn snapshot(&self) -> PortfolioState {
        self.state.get_cloned()
    }

    pub fn with_state<R>(&self, f: impl FnOnce(&PortfolioState) -> R) -> R {
        f(&self.state.lock_ref())
    }

    pub fn signal(&self) -> impl Signal<Item = PortfolioState> {
        self.state.signal_cloned()
    }

    /// Any derived value, recomputed whenever the state changes
    pub fn signal_map<B, F>(&self, f: F) -> impl Signal<Item = B>
    where
        F: FnMut(&PortfolioState) -> B,
    {
        self.state.signal_ref(f)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::querier::types::{Delegation, RestDecCoin};
    use std::str::FromStr;

    fn delegation(amount: u128, denom: &str) -> DelegationResponse {
        DelegationResponse {
            delegation: Delegation {
                delegator_address: Address::new_bytes(vec![1; 20], "cosmos").unwrap(),
                validator_address: Address::new_bytes(vec![9; 20], "cosmosvaloper").unwrap(),
                shares: Decimal256::from_str("1").unwrap(),
            },
            balance: RestCoin::new(amount, denom),
        }
    }

    #[test]
    fn totals_only_count_native_denom() {
        let delegations = Delegations::new(
            vec![
                delegation(1_000, "uatom"),
                delegation(2_000, "uatom"),
                delegation(5, "ibc/ABC"),
            ],
            "uatom",
        );
        assert_eq!(delegations.total_staked, Uint128::new(3_000));

        let rewards = Rewards::new(
            RewardsResponse {
                rewards: vec![],
                total: vec![
                    RestDecCoin {
                        denom: "uatom".to_string(),
                        amount: Decimal256::from_str("12.5").unwrap(),
                    },
                    RestDecCoin {
                        denom: "uosmo".to_string(),
                        amount: Decimal256::from_str("99").unwrap(),
                    },
                ],
            },
            "uatom",
        );
        assert_eq!(rewards.total_rewards, Decimal256::from_str("12.5").unwrap());
    }

    #[test]
    fn parts_load_independently() {
        let chain_id = ChainId::new("cosmoshub-4");

        let state = PortfolioState::default()
            .reduce(PortfolioEvent::Started {
                chain_id: chain_id.clone(),
                part: PortfolioPart::Balances,
            })
            .reduce(PortfolioEvent::Started {
                chain_id: chain_id.clone(),
                part: PortfolioPart::Rewards,
            })
            .reduce(PortfolioEvent::BalancesLoaded {
                chain_id: chain_id.clone(),
                balances: vec![RestCoin::new(10u128, "uatom")],
            })
            .reduce(PortfolioEvent::Failed {
                chain_id: chain_id.clone(),
                part: PortfolioPart::Rewards,
                error: "timeout".to_string(),
            });

        let chain = state.chain(&chain_id).unwrap();
        assert_eq!(chain.balances.status, FetchStatus::Idle);
        assert_eq!(chain.balances.data.len(), 1);
        assert_eq!(chain.rewards.status, FetchStatus::Rejected);
        assert_eq!(chain.rewards.error_message, "timeout");
        assert_eq!(chain.rewards.data.total_rewards, Decimal256::zero());
        assert_eq!(chain.delegations.status, FetchStatus::Idle);
    }
}
