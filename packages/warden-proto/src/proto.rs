// Exported in the root because they're commonly used
pub use cosmos_sdk_proto::{
    cosmos::base::v1beta1::{Coin, DecCoin},
    tendermint::google::protobuf::{Any, Timestamp},
    traits::{Message, MessageExt, Name},
};

/// Authentication of accounts and transactions.
pub mod auth {
    pub use cosmos_sdk_proto::cosmos::auth::v1beta1::*;
}

/// Granting of arbitrary privileges from one account to another.
pub mod authz {
    pub use cosmos_sdk_proto::cosmos::authz::v1beta1::*;
}

/// Balances, and the spend-limited `SendAuthorization`.
pub mod bank {
    pub use cosmos_sdk_proto::cosmos::bank::v1beta1::*;
}

/// Application BlockChain Interface (ABCI).
pub mod abci {
    pub use cosmos_sdk_proto::cosmos::base::abci::v1beta1::*;
}

/// Query support.
pub mod query {
    pub use cosmos_sdk_proto::cosmos::base::query::v1beta1::*;
}

/// Cryptographic primitives.
pub mod crypto {
    pub mod ed25519 {
        pub use cosmos_sdk_proto::cosmos::crypto::ed25519::*;
    }
    pub mod secp256k1 {
        pub use cosmos_sdk_proto::cosmos::crypto::secp256k1::*;
    }
}

/// Messages and services handling token distribution
pub mod distribution {
    pub use cosmos_sdk_proto::cosmos::distribution::v1beta1::*;
}

/// Allows accounts to grant fee allowances and to use fees from their accounts.
pub mod feegrant {
    pub use cosmos_sdk_proto::cosmos::feegrant::v1beta1::*;
}

/// Messages and services handling governance
pub mod gov {
    pub mod v1beta1 {
        pub use cosmos_sdk_proto::cosmos::gov::v1beta1::*;
    }
}

/// Handling slashing parameters and unjailing
pub mod slashing {
    pub use cosmos_sdk_proto::cosmos::slashing::v1beta1::*;
}

/// Proof-of-Stake layer for public blockchains.
pub mod staking {
    pub use cosmos_sdk_proto::cosmos::staking::v1beta1::*;
}

/// Transactions.
pub mod tx {
    pub use cosmos_sdk_proto::cosmos::tx::v1beta1::*;
    /// Transaction signing support.
    pub mod signing {
        pub use cosmos_sdk_proto::cosmos::tx::signing::v1beta1::*;
    }
}
