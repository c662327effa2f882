use std::str::FromStr;

use subtle_encoding::bech32;

use crate::error::{AddressError, Result};

/// The canonical type used everywhere for (bech32) addresses
///
/// This covers accounts as well as validator operators (e.g. `cosmosvaloper1...`),
/// the prefix is whatever the string was encoded with.
/// Display is implemented as the plain bech32 string
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Address {
    bech32_addr: String,
    // prefix is the first part of the bech32 address
    prefix_len: usize,
}

impl Address {
    pub fn new_bytes(bytes: Vec<u8>, prefix: &str) -> Result<Self> {
        if prefix.is_empty() || !prefix.chars().all(|c| matches!(c, 'a'..='z' | '0'..='9')) {
            return Err(AddressError::InvalidFormat(format!(
                "expected prefix to be lowercase alphanumeric characters only, got \"{prefix}\""
            )));
        }

        if bytes.len() > 255 {
            return Err(AddressError::InvalidFormat(format!(
                "account ID should be at most 255 bytes long, but was {} bytes long",
                bytes.len()
            )));
        }

        let bech32_addr = bech32::encode(prefix, bytes);

        Ok(Self {
            bech32_addr,
            prefix_len: prefix.len(),
        })
    }

    /// if you just have a string address, use new_str instead
    pub fn new_pub_key(pub_key: &tendermint::PublicKey, prefix: &str) -> Result<Self> {
        match pub_key {
            tendermint::PublicKey::Secp256k1(encoded_point) => {
                let id = tendermint::account::Id::from(*encoded_point);
                Self::new_bytes(id.as_bytes().to_vec(), prefix)
            }
            _ => Err(AddressError::UnsupportedPubKey),
        }
    }

    // if the prefix is supplied, this will validate the address against the prefix to ensure they match
    pub fn new_str(value: &str, prefix: Option<&str>) -> Result<Self> {
        let value = value.trim();
        let (decoded_prefix, decoded_bytes) = if value.starts_with(|c: char| c.is_uppercase()) {
            bech32::decode_upper(value)
        } else {
            bech32::decode(value)
        }
        .map_err(|e| AddressError::InvalidFormat(format!("invalid bech32 '{value}': {e}")))?;

        if let Some(prefix) = prefix {
            if decoded_prefix != prefix {
                return Err(AddressError::InvalidPrefix {
                    expected: prefix.to_string(),
                    actual: decoded_prefix,
                });
            }
        }

        Self::new_bytes(decoded_bytes, &decoded_prefix)
    }

    pub fn to_vec(&self) -> Vec<u8> {
        // the string was produced by bech32::encode, so it always decodes
        bech32::decode(&self.bech32_addr)
            .map(|(_, bytes)| bytes)
            .unwrap_or_default()
    }

    pub fn prefix(&self) -> &str {
        &self.bech32_addr[..self.prefix_len]
    }

    pub fn as_str(&self) -> &str {
        &self.bech32_addr
    }

    /// Same underlying account, different chain
    pub fn change_prefix(&self, new_prefix: &str) -> Result<Self> {
        if self.prefix() == new_prefix {
            Ok(self.clone())
        } else {
            Self::new_bytes(self.to_vec(), new_prefix)
        }
    }
}

impl std::fmt::Display for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.bech32_addr)
    }
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self> {
        Self::new_str(s, None)
    }
}

impl serde::Serialize for Address {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> serde::Deserialize<'de> for Address {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod test {
    use super::Address;

    const TEST_COSMOS_STR: &str = "osmo1h5qke5tzc0fgz93wcxg8da2en3advfect0gh4a";

    #[test]
    fn basic_roundtrip() {
        let addr: Address = TEST_COSMOS_STR.parse().unwrap();
        assert_eq!(addr.to_string(), TEST_COSMOS_STR);
        assert_eq!(addr.prefix(), "osmo");

        let again = Address::new_bytes(addr.to_vec(), "osmo").unwrap();
        assert_eq!(again, addr);
    }

    #[test]
    fn prefix_validation() {
        assert!(Address::new_str(TEST_COSMOS_STR, Some("osmo")).is_ok());
        assert!(Address::new_str(TEST_COSMOS_STR, Some("cosmos")).is_err());
        assert!(Address::new_str("not-an-address", None).is_err());
    }

    #[test]
    fn change_prefix_keeps_bytes() {
        let addr: Address = TEST_COSMOS_STR.parse().unwrap();
        let cosmos = addr.change_prefix("cosmos").unwrap();

        assert_eq!(cosmos.prefix(), "cosmos");
        assert_eq!(cosmos.to_vec(), addr.to_vec());
        assert!(cosmos.to_string().starts_with("cosmos1"));
    }

    #[test]
    fn serde_as_string() {
        let addr: Address = TEST_COSMOS_STR.parse().unwrap();
        let json = serde_json::to_string(&addr).unwrap();
        assert_eq!(json, format!("\"{TEST_COSMOS_STR}\""));

        let back: Address = serde_json::from_str(&json).unwrap();
        assert_eq!(back, addr);

        assert!(serde_json::from_str::<Address>("\"nope\"").is_err());
    }
}
