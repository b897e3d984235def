//! Wallet address and read-only session state.
//!
//! The signing key and chain connection are owned by the chain layer; the
//! rest of the client only ever sees a [`WalletSession`], which answers
//! "is a wallet connected, and with which address".

use std::fmt;
use std::str::FromStr;

use ethers::types::Address;
use ethers::utils::to_checksum;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::MarketError;

/// An EVM account address.
///
/// Displays and serializes in EIP-55 checksum form, which is what the
/// backend stores for buyers and sellers, and parses case-insensitively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WalletAddress(Address);

impl WalletAddress {
    /// Wraps a raw [`Address`].
    #[must_use]
    pub const fn new(address: Address) -> Self {
        Self(address)
    }

    /// Returns the inner [`Address`].
    #[must_use]
    pub const fn as_address(&self) -> Address {
        self.0
    }

    /// Returns the checksummed hex form.
    #[must_use]
    pub fn checksummed(&self) -> String {
        to_checksum(&self.0, None)
    }

    /// Abbreviated form shown in headers: `0x1234...abcd`.
    #[must_use]
    pub fn short(&self) -> String {
        let full = self.checksummed();
        let head: String = full.chars().take(6).collect();
        let tail: String = full
            .chars()
            .rev()
            .take(4)
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .collect();
        format!("{head}...{tail}")
    }
}

impl fmt::Display for WalletAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.checksummed())
    }
}

impl FromStr for WalletAddress {
    type Err = MarketError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Address::from_str(s.trim())
            .map(Self)
            .map_err(|e| MarketError::Config(format!("invalid address {s:?}: {e}")))
    }
}

impl From<Address> for WalletAddress {
    fn from(address: Address) -> Self {
        Self(address)
    }
}

impl From<WalletAddress> for Address {
    fn from(address: WalletAddress) -> Self {
        address.0
    }
}

impl Serialize for WalletAddress {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.checksummed())
    }
}

impl<'de> Deserialize<'de> for WalletAddress {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Address::from_str(raw.trim())
            .map(Self)
            .map_err(serde::de::Error::custom)
    }
}

/// Read-only view of the wallet connection.
///
/// Built once from the configured signer (or its absence) and passed by
/// reference into every operation that needs the user's address.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WalletSession {
    address: Option<WalletAddress>,
}

impl WalletSession {
    /// A session with a connected wallet.
    #[must_use]
    pub const fn connected(address: WalletAddress) -> Self {
        Self {
            address: Some(address),
        }
    }

    /// A session with no wallet.
    #[must_use]
    pub const fn disconnected() -> Self {
        Self { address: None }
    }

    /// Whether a wallet is connected.
    #[must_use]
    pub const fn is_connected(&self) -> bool {
        self.address.is_some()
    }

    /// The connected address, if any.
    #[must_use]
    pub const fn address(&self) -> Option<WalletAddress> {
        self.address
    }

    /// The connected address, or [`MarketError::WalletNotConnected`].
    ///
    /// # Errors
    ///
    /// Returns [`MarketError::WalletNotConnected`] when no wallet is
    /// connected.
    pub fn require_address(&self) -> Result<WalletAddress, MarketError> {
        self.address.ok_or(MarketError::WalletNotConnected)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    const SELLER: &str = "0x7b96af9bd211cbf6ba5b0dd53aa61dc5806b6ace";

    #[test]
    fn displays_checksummed() {
        let Ok(addr) = SELLER.parse::<WalletAddress>() else {
            panic!("valid address");
        };
        assert_eq!(addr.to_string(), "0x7b96aF9Bd211cBf6BA5b0dd53aa61Dc5806b6AcE");
    }

    #[test]
    fn short_form_keeps_head_and_tail() {
        let Ok(addr) = SELLER.parse::<WalletAddress>() else {
            panic!("valid address");
        };
        assert_eq!(addr.short(), "0x7b96...6AcE");
    }

    #[test]
    fn rejects_garbage() {
        assert!("not-an-address".parse::<WalletAddress>().is_err());
    }

    #[test]
    fn serde_uses_checksum_form() {
        let Ok(addr) = SELLER.parse::<WalletAddress>() else {
            panic!("valid address");
        };
        let Ok(json) = serde_json::to_string(&addr) else {
            panic!("serialization failed");
        };
        assert_eq!(json, "\"0x7b96aF9Bd211cBf6BA5b0dd53aa61Dc5806b6AcE\"");
        let Ok(back) = serde_json::from_str::<WalletAddress>(&json) else {
            panic!("deserialization failed");
        };
        assert_eq!(back, addr);
    }

    #[test]
    fn disconnected_session_has_no_address() {
        let session = WalletSession::disconnected();
        assert!(!session.is_connected());
        assert!(matches!(
            session.require_address(),
            Err(MarketError::WalletNotConnected)
        ));
    }
}
