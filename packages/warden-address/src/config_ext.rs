use crate::{address::Address, error::Result, signer::PublicKey};
use warden_config::ChainConfig;

pub trait ConfigAddressExt {
    fn parse_address(&self, value: &str) -> Result<Address>;
    fn address_from_pub_key(&self, pub_key: &PublicKey) -> Result<Address>;
}

impl ConfigAddressExt for ChainConfig {
    fn parse_address(&self, value: &str) -> Result<Address> {
        Address::new_str(value, Some(&self.address_prefix))
    }

    fn address_from_pub_key(&self, pub_key: &PublicKey) -> Result<Address> {
        Address::new_pub_key(pub_key, &self.address_prefix)
    }
}
