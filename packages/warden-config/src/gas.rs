use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Every transaction the dashboard can submit
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TxKind {
    GrantSend,
    GrantGeneric,
    Revoke,
    ExecSend,
    ExecVote,
    ExecWithdraw,
    ExecDelegate,
    ExecRedelegate,
    ExecUndelegate,
    ExecUnjail,
}

impl TxKind {
    pub fn is_exec(&self) -> bool {
        matches!(
            self,
            Self::ExecSend
                | Self::ExecVote
                | Self::ExecWithdraw
                | Self::ExecDelegate
                | Self::ExecRedelegate
                | Self::ExecUndelegate
                | Self::ExecUnjail
        )
    }
}

impl std::fmt::Display for TxKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::GrantSend => "grant_send",
            Self::GrantGeneric => "grant_generic",
            Self::Revoke => "revoke",
            Self::ExecSend => "exec_send",
            Self::ExecVote => "exec_vote",
            Self::ExecWithdraw => "exec_withdraw",
            Self::ExecDelegate => "exec_delegate",
            Self::ExecRedelegate => "exec_redelegate",
            Self::ExecUndelegate => "exec_undelegate",
            Self::ExecUnjail => "exec_unjail",
        };
        write!(f, "{s}")
    }
}

/// Gas limits per transaction kind
///
/// Anything not listed in `overrides` falls back to `default`.
/// Multi-message transactions (e.g. withdrawing from many validators in one exec)
/// are charged per message.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct GasTable {
    #[serde(default = "GasTable::default_limit")]
    pub default: u64,
    #[serde(default)]
    pub overrides: BTreeMap<TxKind, u64>,
}

impl GasTable {
    pub const DEFAULT_GAS_LIMIT: u64 = 260_000;

    fn default_limit() -> u64 {
        Self::DEFAULT_GAS_LIMIT
    }

    pub fn with_override(mut self, kind: TxKind, gas_limit: u64) -> Self {
        self.overrides.insert(kind, gas_limit);
        self
    }

    pub fn per_message(&self, kind: TxKind) -> u64 {
        self.overrides.get(&kind).copied().unwrap_or(self.default)
    }

    pub fn gas_limit(&self, kind: TxKind, message_count: usize) -> u64 {
        self.per_message(kind)
            .saturating_mul(message_count.max(1) as u64)
    }
}

impl Default for GasTable {
    fn default() -> Self {
        Self {
            default: Self::DEFAULT_GAS_LIMIT,
            overrides: BTreeMap::new(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn defaults_and_overrides() {
        let table = GasTable::default().with_override(TxKind::ExecWithdraw, 150_000);

        assert_eq!(table.gas_limit(TxKind::Revoke, 1), 260_000);
        assert_eq!(table.gas_limit(TxKind::GrantSend, 0), 260_000);
        assert_eq!(table.gas_limit(TxKind::ExecWithdraw, 3), 450_000);
    }

    #[test]
    fn from_toml() {
        let table: GasTable = toml::from_str(
            r#"
            [overrides]
            exec_vote = 120000
            "#,
        )
        .unwrap();

        assert_eq!(table.default, 260_000);
        assert_eq!(table.per_message(TxKind::ExecVote), 120_000);
        assert!(TxKind::ExecVote.is_exec());
        assert!(!TxKind::Revoke.is_exec());
    }
}
