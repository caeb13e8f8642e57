//! Marketplace configuration.

use curio_ledger::{Amount, AssetId};
use serde::{Deserialize, Serialize};

/// Deposit escrowed with every listing, refunded when the listing leaves
/// the books (0.001 tokens).
pub const DEFAULT_LISTING_DEPOSIT: Amount = Amount::from_units(1_000_000);

/// Configuration for a [`Marketplace`](crate::Marketplace) instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketplaceConfig {
    /// Deposit a seller escrows when creating a listing.
    pub listing_deposit: Amount,
    /// Asset id all prices and fees are denominated in.
    pub payment_asset: AssetId,
}

impl Default for MarketplaceConfig {
    fn default() -> Self {
        Self {
            listing_deposit: DEFAULT_LISTING_DEPOSIT,
            payment_asset: AssetId::PAYMENT,
        }
    }
}
