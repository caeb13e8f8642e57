//! Market records and fee vault derivation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{MarketError, Result};
use crate::fees::FeeRate;
use curio_ledger::derive::{self, VAULT_SEED};
use curio_ledger::{AccountId, AssetId};

/// Derive the fee vault address for a market and payment asset.
///
/// Returns the address together with the bump that produced it. Operations
/// that take a claimed fee vault re-derive it from the same seeds and reject
/// mismatches.
///
/// # Errors
/// Returns [`MarketError::InvalidVaultDerivation`] if no bump yields an
/// off-curve address for these seeds.
pub fn fee_vault_address(market: &AccountId, payment_asset: &AssetId) -> Result<(AccountId, u8)> {
    derive::find_address(&[VAULT_SEED, market.as_bytes(), payment_asset.as_bytes()])
        .map_err(MarketError::from)
}

/// A registered market.
///
/// The market binds an operator authority to a derived fee vault and the
/// per-mille rate collected on every settlement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Market {
    /// Id the market is registered under.
    pub id: AccountId,
    /// Operator account allowed to withdraw accumulated fees.
    pub authority: AccountId,
    /// Derived vault that accumulates settlement fees.
    pub fee_vault: AccountId,
    /// Bump that produced the fee vault address.
    pub fee_vault_bump: u8,
    /// Per-mille fee collected on every settlement.
    pub fee_rate: FeeRate,
    /// When the market was registered.
    pub created_at: DateTime<Utc>,
}
