//! Portfolio aggregation for display: fiat totals across chains, and one row per chain
//!
//! Everything here is a pure function of `PortfolioState` and a price table.

use std::collections::BTreeMap;

use cosmwasm_std::{Decimal256, Uint128};
use futures_signals::signal::Signal;
use serde::{Deserialize, Serialize};

use crate::{
    prelude::*,
    querier::types::RestCoin,
    store::{ChainPortfolio, PortfolioState, PortfolioStore},
};

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct Price {
    pub usd: f64,
}

/// Prices keyed by base denom, e.g. "uatom"
pub type Prices = BTreeMap<String, Price>;

/// `amount` base units of `denom` in USD, 0 when there's no price for it
pub fn convert_to_dollars(prices: &Prices, denom: &str, amount: f64, decimals: u32) -> f64 {
    match prices.get(denom) {
        Some(price) => to_display_units(amount, decimals) * price.usd,
        None => 0.0,
    }
}

pub fn to_display_units(amount: f64, decimals: u32) -> f64 {
    amount / 10f64.powi(decimals as i32)
}

/// The available `denom` balance in display units, 0 if absent
pub fn parse_balance(coins: &[RestCoin], decimals: u32, denom: &str) -> f64 {
    coins
        .iter()
        .find(|coin| coin.denom == denom)
        .map(|coin| to_display_units(uint_to_f64(coin.amount), decimals))
        .unwrap_or_default()
}

fn uint_to_f64(value: Uint128) -> f64 {
    value.u128() as f64
}

fn dec_to_f64(value: Decimal256) -> f64 {
    value.to_string().parse().unwrap_or_default()
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq)]
pub struct OverviewTotals {
    pub available: f64,
    pub staked: f64,
    pub rewards: f64,
}

impl OverviewTotals {
    pub fn total(&self) -> f64 {
        self.available + self.staked + self.rewards
    }
}

/// One chain's holdings in display units of its native denom
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ChainRow {
    pub chain_id: ChainId,
    pub name: String,
    pub available: f64,
    pub staked: f64,
    pub rewards: f64,
    /// USD per display unit, `None` when unknown
    pub price: Option<f64>,
}

impl ChainRow {
    pub fn usd_value(&self) -> f64 {
        self.price
            .map(|price| (self.available + self.staked + self.rewards) * price)
            .unwrap_or_default()
    }
}

fn native_amounts(chain: &ChainConfig, portfolio: &ChainPortfolio) -> (f64, f64, f64) {
    let available = portfolio
        .balances
        .data
        .iter()
        .find(|coin| coin.denom == chain.denom)
        .map(|coin| uint_to_f64(coin.amount))
        .unwrap_or_default();

    (
        available,
        uint_to_f64(portfolio.delegations.data.total_staked),
        dec_to_f64(portfolio.rewards.data.total_rewards),
    )
}

/// Fiat totals over `chain_ids`
///
/// Chains that are unknown, not loaded, or unpriced contribute nothing.
pub fn totals(
    state: &PortfolioState,
    networks: &Networks,
    chain_ids: &[ChainId],
    prices: &Prices,
) -> OverviewTotals {
    chain_ids
        .iter()
        .filter_map(|chain_id| Some((networks.get(chain_id).ok()?, state.chain(chain_id)?)))
        .fold(OverviewTotals::default(), |mut totals, (chain, portfolio)| {
            let (available, staked, rewards) = native_amounts(chain, portfolio);
            totals.available += convert_to_dollars(prices, &chain.denom, available, chain.decimals);
            totals.staked += convert_to_dollars(prices, &chain.denom, staked, chain.decimals);
            totals.rewards += convert_to_dollars(prices, &chain.denom, rewards, chain.decimals);
            totals
        })
}

/// Per-chain rows, in the order of `chain_ids`
pub fn chain_rows(
    state: &PortfolioState,
    networks: &Networks,
    chain_ids: &[ChainId],
    prices: &Prices,
) -> Vec<ChainRow> {
    chain_ids
        .iter()
        .filter_map(|chain_id| networks.get(chain_id).ok())
        .map(|chain| {
            let (available, staked, rewards) = state
                .chain(&chain.chain_id)
                .map(|portfolio| native_amounts(chain, portfolio))
                .unwrap_or_default();

            ChainRow {
                chain_id: chain.chain_id.clone(),
                name: chain.name.clone(),
                available: to_display_units(available, chain.decimals),
                staked: to_display_units(staked, chain.decimals),
                rewards: to_display_units(rewards, chain.decimals),
                price: prices.get(&chain.denom).map(|price| price.usd),
            }
        })
        .collect()
}

/// `totals`, recomputed whenever the store changes
pub fn totals_signal(
    store: &PortfolioStore,
    networks: Networks,
    chain_ids: Vec<ChainId>,
    prices: Prices,
) -> impl Signal<Item = OverviewTotals> {
    store.signal_map(move |state| totals(state, &networks, &chain_ids, &prices))
}

/// USD with two decimals and thousands separators, "N/A" for NaN and infinities
pub fn format_usd(value: f64) -> String {
    if !value.is_finite() {
        return "N/A".to_string();
    }

    let formatted = format!("{:.2}", value.abs());
    let (whole, fraction) = formatted.split_once('.').unwrap_or((&formatted, "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, c) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    let sign = if value < 0.0 && formatted != "0.00" { "-" } else { "" };

    format!("{sign}${grouped}.{fraction}")
}

#[cfg(test)]
mod test {
    use std::str::FromStr;

    use super::*;
    use crate::{
        querier::types::{RestDecCoin, RewardsResponse},
        store::{Delegations, PortfolioEvent, Rewards},
    };

    fn prices() -> Prices {
        Prices::from([("uatom".to_string(), Price { usd: 10.0 })])
    }

    fn cosmoshub() -> ChainConfig {
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

    fn osmosis() -> ChainConfig {
        ChainConfig {
            chain_id: ChainId::new("osmosis-1"),
            name: "osmosis".to_string(),
            rest_endpoint: "https://lcd.osmosis.zone".to_string(),
            address_prefix: "osmo".to_string(),
            denom: "uosmo".to_string(),
            decimals: 6,
            gas_price: 0.0025,
        }
    }

    #[test]
    fn converts_with_price() {
        assert_eq!(convert_to_dollars(&prices(), "uatom", 5_000_000.0, 6), 50.0);
    }

    #[test]
    fn missing_price_is_zero() {
        assert_eq!(convert_to_dollars(&prices(), "uosmo", 5_000_000.0, 6), 0.0);
        assert_eq!(convert_to_dollars(&Prices::new(), "uatom", 1.0, 6), 0.0);
    }

    #[test]
    fn balance_in_display_units() {
        let coins = vec![
            RestCoin::new(2_500_000u128, "uatom"),
            RestCoin::new(7u128, "ibc/ABC"),
        ];
        assert_eq!(parse_balance(&coins, 6, "uatom"), 2.5);
        assert_eq!(parse_balance(&coins, 6, "uosmo"), 0.0);
    }

    #[test]
    fn totals_across_chains() {
        let hub = cosmoshub();
        let osmo = osmosis();
        let networks = Networks::new([hub.clone(), osmo.clone()]);

        let state = PortfolioState::default()
            .reduce(PortfolioEvent::BalancesLoaded {
                chain_id: hub.chain_id.clone(),
                balances: vec![RestCoin::new(5_000_000u128, "uatom")],
            })
            .reduce(PortfolioEvent::DelegationsLoaded {
                chain_id: hub.chain_id.clone(),
                delegations: Delegations {
                    delegations: vec![],
                    total_staked: Uint128::new(1_000_000),
                },
            })
            .reduce(PortfolioEvent::RewardsLoaded {
                chain_id: hub.chain_id.clone(),
                rewards: Rewards::new(
                    RewardsResponse {
                        rewards: vec![],
                        total: vec![RestDecCoin {
                            denom: "uatom".to_string(),
                            amount: Decimal256::from_str("500000.5").unwrap(),
                        }],
                    },
                    "uatom",
                ),
            })
            // unpriced, contributes nothing
            .reduce(PortfolioEvent::BalancesLoaded {
                chain_id: osmo.chain_id.clone(),
                balances: vec![RestCoin::new(9_000_000u128, "uosmo")],
            });

        let chain_ids = vec![hub.chain_id.clone(), osmo.chain_id.clone()];
        let totals = totals(&state, &networks, &chain_ids, &prices());

        assert_eq!(totals.available, 50.0);
        assert_eq!(totals.staked, 10.0);
        assert!((totals.rewards - 5.000005).abs() < 1e-9);

        let rows = chain_rows(&state, &networks, &chain_ids, &prices());
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].name, "cosmoshub");
        assert_eq!(rows[0].available, 5.0);
        assert_eq!(rows[0].price, Some(10.0));
        assert_eq!(rows[1].available, 9.0);
        assert_eq!(rows[1].price, None);
        assert_eq!(rows[1].usd_value(), 0.0);
    }

    #[test]
    fn unloaded_chain_contributes_zero() {
        let networks = Networks::new([cosmoshub()]);
        let totals = totals(
            &PortfolioState::default(),
            &networks,
            &[ChainId::new("cosmoshub-4"), ChainId::new("unknown-1")],
            &prices(),
        );
        assert_eq!(totals, OverviewTotals::default());
    }

    #[test]
    fn usd_formatting() {
        assert_eq!(format_usd(50.0), "$50.00");
        assert_eq!(format_usd(1234567.891), "$1,234,567.89");
        assert_eq!(format_usd(999.999), "$1,000.00");
        assert_eq!(format_usd(-12.5), "-$12.50");
        assert_eq!(format_usd(f64::NAN), "N/A");
        assert_eq!(format_usd(f64::INFINITY), "N/A");
    }
}
