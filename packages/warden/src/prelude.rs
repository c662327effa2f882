pub use warden_address::{
    direct_signer_info, public_key_to_proto, Address, AddressError, ConfigAddressExt, PublicKey,
    TxSigner,
};
pub use warden_config::{rest_url, ChainConfig, ChainId, ConfigError, GasTable, Networks, TxKind};
pub use warden_core::prelude::*;
pub use warden_proto::{proto_into_any, proto_into_bytes};
