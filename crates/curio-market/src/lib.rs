//! # curio-market
//!
//! Marketplace core for fixed-price sales of unique assets on the Curio
//! ledger.
//!
//! This crate provides:
//!
//! - Market records with per-mille fee rates and derived fee vaults
//! - Listings that escrow the asset and a refundable deposit
//! - Atomic buy settlement splitting the ask into fee and proceeds
//! - Fee withdrawal bounded by the vault's live balance
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use curio_ledger::{AssetId, Ledger, Wallet};
//! use curio_market::{
//!     fee_vault_address, CreateMarketInput, FeeRate, Marketplace, MarketplaceConfig,
//! };
//!
//! # async fn example() -> curio_market::Result<()> {
//! let ledger = Arc::new(Ledger::new());
//! let marketplace = Marketplace::new(MarketplaceConfig::default(), Arc::clone(&ledger));
//!
//! let operator = Wallet::generate();
//! let market_id = Wallet::generate().address();
//! let (fee_vault, fee_vault_bump) = fee_vault_address(&market_id, &AssetId::PAYMENT)?;
//!
//! let market = marketplace
//!     .create_market(CreateMarketInput {
//!         authority: operator.address(),
//!         market: market_id,
//!         fee_vault,
//!         fee_vault_bump,
//!         payment_asset: AssetId::PAYMENT,
//!         fee_rate: FeeRate::new(25)?,
//!     })
//!     .await?;
//! println!("market {} charges {}", market.id, market.fee_rate);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod fees;
pub mod listing;
pub mod market;
pub mod marketplace;

pub use config::{MarketplaceConfig, DEFAULT_LISTING_DEPOSIT};
pub use error::{MarketError, Result};
pub use fees::{listing_fee, split_ask, FeeRate, FEE_DENOMINATOR};
pub use listing::{asset_vault_address, listing_address, Listing};
pub use market::{fee_vault_address, Market};
pub use marketplace::{
    BuyInput, BuyReceipt, CloseListingInput, CloseReceipt, CreateListingInput, CreateMarketInput,
    Marketplace, RepriceInput, WithdrawFeesInput, WithdrawReceipt,
};
