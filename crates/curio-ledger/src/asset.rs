//! Asset identities.

use crate::error::{LedgerError, Result};
use rand::rngs::OsRng;
use rand::RngCore;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A 32-byte asset identity.
///
/// Every non-fungible asset tracked by the ledger has one. The all-zero id is
/// reserved for the payment token and can never be minted as an asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AssetId([u8; 32]);

impl AssetId {
    /// The well-known payment token identity.
    pub const PAYMENT: Self = Self([0u8; 32]);

    /// Create an asset id from raw bytes.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Mint a fresh random asset identity.
    ///
    /// Uses `OsRng` so ids come from the operating system's CSPRNG and cannot
    /// collide in practice.
    #[must_use]
    pub fn random() -> Self {
        let mut bytes = [0u8; 32];
        OsRng.fill_bytes(&mut bytes);
        Self(bytes)
    }

    /// Parse an asset id from a base58 string.
    ///
    /// # Errors
    ///
    /// Returns error if the string is not valid base58 or not 32 bytes.
    pub fn from_base58(s: &str) -> Result<Self> {
        let bytes = bs58::decode(s)
            .into_vec()
            .map_err(|e| LedgerError::invalid_address(format!("invalid base58: {e}")))?;
        let array: [u8; 32] = bytes.try_into().map_err(|v: Vec<u8>| {
            LedgerError::invalid_address(format!("asset id must be 32 bytes, got {}", v.len()))
        })?;
        Ok(Self(array))
    }

    /// Get the raw bytes of the id.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Check whether this is the payment token identity.
    #[must_use]
    pub fn is_payment(&self) -> bool {
        *self == Self::PAYMENT
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", bs58::encode(self.0).into_string())
    }
}

impl FromStr for AssetId {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_base58(s)
    }
}

impl Serialize for AssetId {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for AssetId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_base58(&s).map_err(D::Error::custom)
    }
}
