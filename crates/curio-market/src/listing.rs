//! Listing records and their derived addresses.
//!
//! A listing lives at an address derived from `(market, asset, seller)`, so
//! one seller can hold at most one open listing per asset per market. The
//! escrowed asset sits in a vault derived from `(market, asset)` alone; the
//! vault address does not change if the listing is closed and reopened.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{MarketError, Result};
use curio_ledger::derive::{self, LISTING_SEED, VAULT_SEED};
use curio_ledger::{AccountId, Amount, AssetId};

/// Derive the listing address for a `(market, asset, seller)` triple.
///
/// # Errors
/// Returns [`MarketError::InvalidVaultDerivation`] if no bump yields an
/// off-curve address for these seeds.
pub fn listing_address(
    market: &AccountId,
    asset: &AssetId,
    seller: &AccountId,
) -> Result<(AccountId, u8)> {
    derive::find_address(&[
        LISTING_SEED,
        market.as_bytes(),
        asset.as_bytes(),
        seller.as_bytes(),
    ])
    .map_err(MarketError::from)
}

/// Derive the escrow vault address for an asset on a market.
///
/// # Errors
/// Returns [`MarketError::InvalidVaultDerivation`] if no bump yields an
/// off-curve address for these seeds.
pub fn asset_vault_address(market: &AccountId, asset: &AssetId) -> Result<(AccountId, u8)> {
    derive::find_address(&[VAULT_SEED, market.as_bytes(), asset.as_bytes()])
        .map_err(MarketError::from)
}

/// An open listing with its escrowed asset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Listing {
    /// Derived address the listing is booked under.
    pub address: AccountId,
    /// Bump that produced the listing address.
    pub bump: u8,
    /// Market the listing belongs to.
    pub market: AccountId,
    /// Account that created the listing and receives the proceeds.
    pub seller: AccountId,
    /// Asset held in escrow for sale.
    pub asset: AssetId,
    /// Current asking price.
    pub ask: Amount,
    /// Whether a settlement currently holds the listing.
    pub lock: bool,
    /// Derived vault holding the escrowed asset.
    pub asset_vault: AccountId,
    /// Bump that produced the vault address.
    pub asset_vault_bump: u8,
    /// Deposit escrowed at creation, refunded when the listing leaves the books.
    pub deposit: Amount,
    /// When the listing was created.
    pub created_at: DateTime<Utc>,
    /// When the listing last changed.
    pub updated_at: DateTime<Utc>,
}

impl Listing {
    /// Whether a settlement currently holds the listing.
    #[must_use]
    pub const fn is_locked(&self) -> bool {
        self.lock
    }

    /// Replace the asking price.
    pub fn set_ask(&mut self, new_ask: Amount) {
        self.ask = new_ask;
        self.updated_at = Utc::now();
    }

    /// Reserve the listing for settlement. Returns `false` if it is
    /// already reserved.
    pub fn reserve(&mut self) -> bool {
        if self.lock {
            return false;
        }
        self.lock = true;
        self.updated_at = Utc::now();
        true
    }

    /// Clear a settlement reservation.
    pub fn release(&mut self) {
        self.lock = false;
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use curio_ledger::Wallet;

    fn sample_listing() -> Listing {
        let market = Wallet::generate().address();
        let seller = Wallet::generate().address();
        let asset = AssetId::random();
        let (address, bump) = listing_address(&market, &asset, &seller).expect("derive listing");
        let (asset_vault, asset_vault_bump) =
            asset_vault_address(&market, &asset).expect("derive vault");
        let now = Utc::now();
        Listing {
            address,
            bump,
            market,
            seller,
            asset,
            ask: Amount::tokens(1),
            lock: false,
            asset_vault,
            asset_vault_bump,
            deposit: Amount::from_units(1_000_000),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_listing_addresses_differ_per_seller() {
        let market = Wallet::generate().address();
        let asset = AssetId::random();
        let (one, _) = listing_address(&market, &asset, &Wallet::generate().address())
            .expect("derive listing");
        let (two, _) = listing_address(&market, &asset, &Wallet::generate().address())
            .expect("derive listing");
        assert_ne!(one, two);
    }

    #[test]
    fn test_vault_address_ignores_seller() {
        let market = Wallet::generate().address();
        let asset = AssetId::random();
        let (one, one_bump) = asset_vault_address(&market, &asset).expect("derive vault");
        let (two, two_bump) = asset_vault_address(&market, &asset).expect("derive vault");
        assert_eq!(one, two);
        assert_eq!(one_bump, two_bump);
    }

    #[test]
    fn test_listing_and_vault_addresses_are_distinct() {
        let listing = sample_listing();
        assert_ne!(listing.address, listing.asset_vault);
    }

    #[test]
    fn test_reserve_blocks_second_reservation() {
        let mut listing = sample_listing();
        assert!(!listing.is_locked());
        assert!(listing.reserve());
        assert!(listing.is_locked());
        assert!(!listing.reserve());
        listing.release();
        assert!(!listing.is_locked());
        assert!(listing.reserve());
    }

    #[test]
    fn test_set_ask_touches_updated_at() {
        let mut listing = sample_listing();
        let before = listing.updated_at;
        listing.set_ask(Amount::tokens(2));
        assert_eq!(listing.ask, Amount::tokens(2));
        assert!(listing.updated_at >= before);
    }

    #[test]
    fn test_listing_serde_roundtrip() {
        let listing = sample_listing();
        let json = serde_json::to_string(&listing).expect("serialize");
        let parsed: Listing = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(parsed.address, listing.address);
        assert_eq!(parsed.asset_vault, listing.asset_vault);
        assert_eq!(parsed.ask, listing.ask);
        assert!(!parsed.lock);
    }
}
