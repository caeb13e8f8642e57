//! Marketplace entry points and settlement.
//!
//! [`Marketplace`] owns the books (markets and listings keyed by derived
//! address) and a shared [`Ledger`]. Every operation takes the full account
//! set the caller presents, re-derives each claimed address from its seeds
//! and bump, and applies all balance motion through a single ledger commit,
//! so a failure anywhere leaves both books and ledger untouched.
//!
//! Mutual exclusion is per listing. [`Marketplace::buy`] reserves a listing
//! by setting its lock flag under the books lock, runs the three-part
//! settlement against the ledger with the books lock released, then
//! re-acquires it to retire the listing, or to clear the reservation if the
//! commit failed. Settlements on distinct listings overlap; any operation
//! that reaches a reserved listing fails fast with
//! [`MarketError::ListingLocked`]. Lock order is books before ledger
//! everywhere.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::config::MarketplaceConfig;
use crate::error::{MarketError, Result};
use crate::fees::{split_ask, FeeRate};
use crate::listing::Listing;
use crate::market::Market;
use curio_ledger::derive::{create_address, LISTING_SEED, VAULT_SEED};
use curio_ledger::{
    AccountId, Amount, AssetId, Ledger, LedgerError, Transaction, TransactionId,
};

/// Accounts and arguments for registering a market.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateMarketInput {
    /// Signer who becomes the market authority.
    pub authority: AccountId,
    /// Id to register the market under.
    pub market: AccountId,
    /// Claimed fee vault address.
    pub fee_vault: AccountId,
    /// Bump claimed for the fee vault derivation.
    pub fee_vault_bump: u8,
    /// Asset the fee vault is denominated in.
    pub payment_asset: AssetId,
    /// Per-mille fee collected on every settlement.
    pub fee_rate: FeeRate,
}

/// Accounts and arguments for creating a listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateListingInput {
    /// Signer who sells the asset.
    pub seller: AccountId,
    /// Claimed listing address.
    pub listing: AccountId,
    /// Bump claimed for the listing derivation.
    pub listing_bump: u8,
    /// Market the listing joins.
    pub market: AccountId,
    /// Claimed escrow vault address.
    pub asset_vault: AccountId,
    /// Bump claimed for the vault derivation.
    pub asset_vault_bump: u8,
    /// Account the asset is escrowed from. Must be the seller's.
    pub source: AccountId,
    /// Asset being listed.
    pub asset: AssetId,
    /// Asking price.
    pub ask: Amount,
}

/// Accounts and arguments for re-pricing a listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepriceInput {
    /// Signer. Must be the listing seller.
    pub seller: AccountId,
    /// Address of the listing to re-price.
    pub listing: AccountId,
    /// Bump claimed for the listing derivation.
    pub listing_bump: u8,
    /// Market the listing belongs to.
    pub market: AccountId,
    /// Asset the listing sells.
    pub asset: AssetId,
    /// Replacement asking price.
    pub new_ask: Amount,
}

/// Accounts and arguments for closing a listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CloseListingInput {
    /// Signer. Must be the listing seller.
    pub seller: AccountId,
    /// Account the asset returns to. Must be the seller's.
    pub destination: AccountId,
    /// Claimed escrow vault address.
    pub asset_vault: AccountId,
    /// Bump claimed for the vault derivation.
    pub asset_vault_bump: u8,
    /// Address of the listing to close.
    pub listing: AccountId,
    /// Bump claimed for the listing derivation.
    pub listing_bump: u8,
    /// Market the listing belongs to.
    pub market: AccountId,
    /// Asset the listing sells.
    pub asset: AssetId,
}

/// Accounts and arguments for buying a listed asset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuyInput {
    /// Signer who pays the asking price.
    pub buyer: AccountId,
    /// Account the asset lands in. Must be the buyer's.
    pub destination: AccountId,
    /// Address of the listing to settle.
    pub listing: AccountId,
    /// Bump claimed for the listing derivation.
    pub listing_bump: u8,
    /// Seller recorded on the listing, paid the proceeds.
    pub seller: AccountId,
    /// Market the listing belongs to.
    pub market: AccountId,
    /// Claimed fee vault address.
    pub fee_vault: AccountId,
    /// Bump claimed for the fee vault derivation.
    pub fee_vault_bump: u8,
    /// Claimed escrow vault address.
    pub asset_vault: AccountId,
    /// Bump claimed for the vault derivation.
    pub asset_vault_bump: u8,
    /// Asset being bought.
    pub asset: AssetId,
    /// Asset prices are denominated in.
    pub payment_asset: AssetId,
}

/// Accounts and arguments for withdrawing accumulated fees.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WithdrawFeesInput {
    /// Signer. Must be the market authority.
    pub authority: AccountId,
    /// Account the fees are paid to.
    pub destination: AccountId,
    /// Market whose fee vault is drawn down.
    pub market: AccountId,
    /// Claimed fee vault address.
    pub fee_vault: AccountId,
    /// Bump claimed for the fee vault derivation.
    pub fee_vault_bump: u8,
    /// Asset the fee vault is denominated in.
    pub payment_asset: AssetId,
    /// Amount to withdraw.
    pub amount: Amount,
}

/// Outcome of a completed purchase.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuyReceipt {
    /// Listing that was settled and retired.
    pub listing: AccountId,
    /// Asset that changed hands.
    pub asset: AssetId,
    /// Account that paid.
    pub buyer: AccountId,
    /// Account that was paid.
    pub seller: AccountId,
    /// Asking price the buyer paid.
    pub price: Amount,
    /// Portion of the price kept by the market.
    pub fee: Amount,
    /// Portion of the price paid to the seller.
    pub seller_proceeds: Amount,
    /// Listing deposit returned to the seller.
    pub deposit_refund: Amount,
    /// Ledger transaction that applied the settlement.
    pub transaction: TransactionId,
}

/// Outcome of closing a listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CloseReceipt {
    /// Listing that was retired.
    pub listing: AccountId,
    /// Asset returned to the seller.
    pub asset: AssetId,
    /// Account the asset and deposit returned to.
    pub seller: AccountId,
    /// Listing deposit returned to the seller.
    pub deposit_refund: Amount,
    /// Ledger transaction that applied the return.
    pub transaction: TransactionId,
}

/// Outcome of a fee withdrawal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WithdrawReceipt {
    /// Market whose vault was drawn down.
    pub market: AccountId,
    /// Account the fees were paid to.
    pub destination: AccountId,
    /// Amount withdrawn.
    pub amount: Amount,
    /// Fee vault balance left after the withdrawal.
    pub remaining: Amount,
    /// Ledger transaction that applied the withdrawal.
    pub transaction: TransactionId,
}

#[derive(Debug, Default)]
struct Books {
    markets: HashMap<AccountId, Market>,
    listings: HashMap<AccountId, Listing>,
}

/// The marketplace service.
#[derive(Debug)]
pub struct Marketplace {
    config: MarketplaceConfig,
    ledger: Arc<Ledger>,
    books: RwLock<Books>,
}

impl Marketplace {
    /// Create a marketplace over a shared ledger.
    #[must_use]
    pub fn new(config: MarketplaceConfig, ledger: Arc<Ledger>) -> Self {
        Self {
            config,
            ledger,
            books: RwLock::new(Books::default()),
        }
    }

    /// The ledger this marketplace settles against.
    #[must_use]
    pub fn ledger(&self) -> &Arc<Ledger> {
        &self.ledger
    }

    /// The configuration this marketplace was built with.
    #[must_use]
    pub fn config(&self) -> &MarketplaceConfig {
        &self.config
    }

    /// Snapshot of a market record.
    pub async fn market(&self, id: &AccountId) -> Option<Market> {
        self.books.read().await.markets.get(id).cloned()
    }

    /// Snapshot of a listing record.
    pub async fn listing(&self, address: &AccountId) -> Option<Listing> {
        self.books.read().await.listings.get(address).cloned()
    }

    /// Register a market with its derived fee vault.
    ///
    /// # Errors
    ///
    /// Returns [`MarketError::InvalidVaultDerivation`] if the claimed vault
    /// or bump does not re-derive, and [`MarketError::AlreadyInitialized`]
    /// if the market id is already registered.
    pub async fn create_market(&self, input: CreateMarketInput) -> Result<Market> {
        if input.payment_asset != self.config.payment_asset {
            return Err(MarketError::invalid_derivation(
                "fee vault is not denominated in the payment asset",
            ));
        }
        let expected_vault = create_address(
            &[
                VAULT_SEED,
                input.market.as_bytes(),
                input.payment_asset.as_bytes(),
            ],
            input.fee_vault_bump,
        )?;
        if expected_vault != input.fee_vault {
            return Err(MarketError::invalid_derivation(
                "fee vault address does not match its seeds",
            ));
        }

        let mut books = self.books.write().await;
        if books.markets.contains_key(&input.market) {
            return Err(MarketError::AlreadyInitialized {
                market: input.market,
            });
        }

        let market = Market {
            id: input.market,
            authority: input.authority,
            fee_vault: input.fee_vault,
            fee_vault_bump: input.fee_vault_bump,
            fee_rate: input.fee_rate,
            created_at: Utc::now(),
        };
        books.markets.insert(market.id, market.clone());

        info!(
            market = %market.id,
            authority = %market.authority,
            fee_rate = %market.fee_rate,
            "market created"
        );
        Ok(market)
    }

    /// Create a listing, escrowing the asset and the listing deposit.
    ///
    /// The asset moves from the seller to the derived vault and the
    /// configured deposit moves from the seller to the listing address, both
    /// in one ledger commit.
    ///
    /// # Errors
    ///
    /// Returns [`MarketError::InvalidVaultDerivation`] if a claimed address
    /// does not re-derive, [`MarketError::MarketNotFound`] if the market is
    /// not registered, [`MarketError::AlreadyListed`] if the listing address
    /// is occupied, [`MarketError::AssetNotOwned`] if the seller does not
    /// hold the asset, [`MarketError::InvalidAsk`] if the ask is zero, and
    /// [`MarketError::InsufficientFunds`] if the seller cannot cover the
    /// deposit.
    pub async fn create_listing(&self, input: CreateListingInput) -> Result<Listing> {
        let expected_listing = create_address(
            &[
                LISTING_SEED,
                input.market.as_bytes(),
                input.asset.as_bytes(),
                input.seller.as_bytes(),
            ],
            input.listing_bump,
        )?;
        if expected_listing != input.listing {
            return Err(MarketError::invalid_derivation(
                "listing address does not match its seeds",
            ));
        }
        let expected_vault = create_address(
            &[VAULT_SEED, input.market.as_bytes(), input.asset.as_bytes()],
            input.asset_vault_bump,
        )?;
        if expected_vault != input.asset_vault {
            return Err(MarketError::invalid_derivation(
                "asset vault address does not match its seeds",
            ));
        }

        let mut books = self.books.write().await;
        if !books.markets.contains_key(&input.market) {
            return Err(MarketError::MarketNotFound {
                market: input.market,
            });
        }
        if books.listings.contains_key(&input.listing) {
            return Err(MarketError::AlreadyListed {
                listing: input.listing,
            });
        }

        // Assets sit directly under their owner's account, so the escrow
        // source must be the seller's own account.
        if input.source != input.seller {
            return Err(MarketError::AssetNotOwned {
                asset: input.asset,
                account: input.source,
            });
        }
        match self.ledger.holder(&input.asset).await {
            Some(holder) if holder == input.seller => {}
            _ => {
                return Err(MarketError::AssetNotOwned {
                    asset: input.asset,
                    account: input.seller,
                });
            }
        }
        if input.ask.is_zero() {
            return Err(MarketError::InvalidAsk);
        }

        let tx = Transaction::with_memo("create_listing")
            .debit(input.seller, self.config.listing_deposit)
            .credit(input.listing, self.config.listing_deposit)
            .move_asset(input.asset, input.seller, input.asset_vault);
        self.ledger.commit(tx).await?;

        let now = Utc::now();
        let listing = Listing {
            address: input.listing,
            bump: input.listing_bump,
            market: input.market,
            seller: input.seller,
            asset: input.asset,
            ask: input.ask,
            lock: false,
            asset_vault: input.asset_vault,
            asset_vault_bump: input.asset_vault_bump,
            deposit: self.config.listing_deposit,
            created_at: now,
            updated_at: now,
        };
        books.listings.insert(listing.address, listing.clone());

        info!(
            listing = %listing.address,
            market = %listing.market,
            seller = %listing.seller,
            asset = %listing.asset,
            ask = %listing.ask,
            "listing created"
        );
        Ok(listing)
    }

    /// Replace the asking price of an open listing.
    ///
    /// # Errors
    ///
    /// Returns [`MarketError::ListingNotFound`] if no listing exists at the
    /// address, [`MarketError::NotSeller`] if the signer is not the recorded
    /// seller, [`MarketError::InvalidVaultDerivation`] if the bump proof
    /// does not re-derive, [`MarketError::ListingLocked`] during an
    /// in-flight settlement, and [`MarketError::InvalidAsk`] for a zero ask.
    pub async fn reprice(&self, input: RepriceInput) -> Result<Listing> {
        let expected_listing = create_address(
            &[
                LISTING_SEED,
                input.market.as_bytes(),
                input.asset.as_bytes(),
                input.seller.as_bytes(),
            ],
            input.listing_bump,
        )?;

        let mut books = self.books.write().await;
        let entry = books
            .listings
            .get_mut(&input.listing)
            .ok_or(MarketError::ListingNotFound {
                listing: input.listing,
            })?;
        if entry.seller != input.seller {
            return Err(MarketError::NotSeller {
                account: input.seller,
            });
        }
        if expected_listing != input.listing {
            return Err(MarketError::invalid_derivation(
                "listing address does not match its seeds",
            ));
        }
        if entry.is_locked() {
            return Err(MarketError::ListingLocked {
                listing: input.listing,
            });
        }
        if input.new_ask.is_zero() {
            return Err(MarketError::InvalidAsk);
        }

        let old_ask = entry.ask;
        entry.set_ask(input.new_ask);
        info!(
            listing = %input.listing,
            old_ask = %old_ask,
            new_ask = %input.new_ask,
            "listing re-priced"
        );
        Ok(entry.clone())
    }

    /// Close a listing, returning the asset and deposit to the seller.
    ///
    /// # Errors
    ///
    /// Returns [`MarketError::ListingNotFound`] if no listing exists at the
    /// address (including a listing already closed or sold),
    /// [`MarketError::NotSeller`] if the signer is not the recorded seller,
    /// [`MarketError::InvalidVaultDerivation`] if a claimed address does not
    /// re-derive or the destination is not the seller's,
    /// [`MarketError::ListingLocked`] during an in-flight settlement, and
    /// [`MarketError::VaultEmpty`] if the vault no longer holds the asset.
    pub async fn close_listing(&self, input: CloseListingInput) -> Result<CloseReceipt> {
        let expected_listing = create_address(
            &[
                LISTING_SEED,
                input.market.as_bytes(),
                input.asset.as_bytes(),
                input.seller.as_bytes(),
            ],
            input.listing_bump,
        )?;
        let expected_vault = create_address(
            &[VAULT_SEED, input.market.as_bytes(), input.asset.as_bytes()],
            input.asset_vault_bump,
        )?;
        if input.destination != input.seller {
            return Err(MarketError::invalid_derivation(
                "destination account is not controlled by the seller",
            ));
        }

        let mut books = self.books.write().await;
        let (vault, deposit) = {
            let entry =
                books
                    .listings
                    .get(&input.listing)
                    .ok_or(MarketError::ListingNotFound {
                        listing: input.listing,
                    })?;
            if entry.seller != input.seller {
                return Err(MarketError::NotSeller {
                    account: input.seller,
                });
            }
            if expected_listing != input.listing {
                return Err(MarketError::invalid_derivation(
                    "listing address does not match its seeds",
                ));
            }
            if expected_vault != input.asset_vault {
                return Err(MarketError::invalid_derivation(
                    "asset vault address does not match its seeds",
                ));
            }
            if entry.is_locked() {
                return Err(MarketError::ListingLocked {
                    listing: input.listing,
                });
            }
            (entry.asset_vault, entry.deposit)
        };

        match self.ledger.holder(&input.asset).await {
            Some(holder) if holder == vault => {}
            _ => {
                return Err(MarketError::VaultEmpty {
                    listing: input.listing,
                });
            }
        }

        let tx = Transaction::with_memo("close_listing")
            .move_asset(input.asset, vault, input.destination)
            .debit(input.listing, deposit)
            .credit(input.seller, deposit);
        let record = self.ledger.commit(tx).await?;
        books.listings.remove(&input.listing);

        info!(
            listing = %input.listing,
            seller = %input.seller,
            asset = %input.asset,
            "listing closed"
        );
        Ok(CloseReceipt {
            listing: input.listing,
            asset: input.asset,
            seller: input.seller,
            deposit_refund: deposit,
            transaction: record.id,
        })
    }

    /// Buy a listed asset at its current asking price.
    ///
    /// The settlement debits the buyer exactly the ask and partitions it
    /// into the market fee and the seller proceeds, returns the listing
    /// deposit to the seller, and moves the asset from the vault to the
    /// buyer, all in one ledger commit. The listing is reserved for the
    /// duration; a failed commit clears the reservation and leaves the
    /// listing open.
    ///
    /// # Errors
    ///
    /// Returns [`MarketError::MarketNotFound`] or
    /// [`MarketError::ListingNotFound`] for missing records,
    /// [`MarketError::NotSeller`] if the claimed seller is not the recorded
    /// one, [`MarketError::InvalidVaultDerivation`] if a claimed address
    /// does not re-derive or the destination is not the buyer's,
    /// [`MarketError::ListingLocked`] if another settlement holds the
    /// listing, [`MarketError::VaultEmpty`] if the vault no longer holds
    /// the asset, and [`MarketError::InsufficientFunds`] if the buyer
    /// cannot cover the ask.
    pub async fn buy(&self, input: BuyInput) -> Result<BuyReceipt> {
        if input.payment_asset != self.config.payment_asset {
            return Err(MarketError::invalid_derivation(
                "fee vault is not denominated in the payment asset",
            ));
        }
        if input.destination != input.buyer {
            return Err(MarketError::invalid_derivation(
                "destination account is not controlled by the buyer",
            ));
        }
        let expected_listing = create_address(
            &[
                LISTING_SEED,
                input.market.as_bytes(),
                input.asset.as_bytes(),
                input.seller.as_bytes(),
            ],
            input.listing_bump,
        )?;
        let expected_fee_vault = create_address(
            &[
                VAULT_SEED,
                input.market.as_bytes(),
                input.payment_asset.as_bytes(),
            ],
            input.fee_vault_bump,
        )?;
        let expected_asset_vault = create_address(
            &[VAULT_SEED, input.market.as_bytes(), input.asset.as_bytes()],
            input.asset_vault_bump,
        )?;

        // Validate under the books lock and reserve the listing, then let
        // the lock go before settling.
        let (reserved, fee_rate) = {
            let mut books = self.books.write().await;
            let (fee_rate, market_fee_vault) = {
                let market =
                    books
                        .markets
                        .get(&input.market)
                        .ok_or(MarketError::MarketNotFound {
                            market: input.market,
                        })?;
                (market.fee_rate, market.fee_vault)
            };
            if market_fee_vault != input.fee_vault {
                return Err(MarketError::invalid_derivation(
                    "fee vault does not belong to this market",
                ));
            }
            if expected_fee_vault != input.fee_vault {
                return Err(MarketError::invalid_derivation(
                    "fee vault address does not match its seeds",
                ));
            }

            let entry =
                books
                    .listings
                    .get_mut(&input.listing)
                    .ok_or(MarketError::ListingNotFound {
                        listing: input.listing,
                    })?;
            if entry.seller != input.seller {
                return Err(MarketError::NotSeller {
                    account: input.seller,
                });
            }
            if expected_listing != input.listing {
                return Err(MarketError::invalid_derivation(
                    "listing address does not match its seeds",
                ));
            }
            if expected_asset_vault != input.asset_vault {
                return Err(MarketError::invalid_derivation(
                    "asset vault address does not match its seeds",
                ));
            }

            // Reserve before touching the ledger: while a settlement is in
            // flight the lock answers for the listing, not the vault state.
            if !entry.reserve() {
                return Err(MarketError::ListingLocked {
                    listing: input.listing,
                });
            }
            let vault = entry.asset_vault;
            match self.ledger.holder(&input.asset).await {
                Some(holder) if holder == vault => {}
                _ => {
                    entry.release();
                    return Err(MarketError::VaultEmpty {
                        listing: input.listing,
                    });
                }
            }
            (entry.clone(), fee_rate)
        };

        let (fee, proceeds) = split_ask(reserved.ask, fee_rate);
        let tx = Transaction::with_memo("buy")
            .debit(input.buyer, reserved.ask)
            .credit(input.seller, proceeds)
            .credit(input.fee_vault, fee)
            .debit(reserved.address, reserved.deposit)
            .credit(input.seller, reserved.deposit)
            .move_asset(input.asset, reserved.asset_vault, input.destination);

        match self.ledger.commit(tx).await {
            Ok(record) => {
                let mut books = self.books.write().await;
                books.listings.remove(&input.listing);
                info!(
                    listing = %input.listing,
                    buyer = %input.buyer,
                    seller = %input.seller,
                    price = %reserved.ask,
                    fee = %fee,
                    "listing settled"
                );
                Ok(BuyReceipt {
                    listing: input.listing,
                    asset: input.asset,
                    buyer: input.buyer,
                    seller: input.seller,
                    price: reserved.ask,
                    fee,
                    seller_proceeds: proceeds,
                    deposit_refund: reserved.deposit,
                    transaction: record.id,
                })
            }
            Err(err) => {
                let mut books = self.books.write().await;
                if let Some(entry) = books.listings.get_mut(&input.listing) {
                    entry.release();
                }
                warn!(
                    listing = %input.listing,
                    buyer = %input.buyer,
                    error = %err,
                    "settlement aborted"
                );
                Err(match err {
                    LedgerError::AssetNotHeld { account, .. }
                        if account == reserved.asset_vault =>
                    {
                        MarketError::VaultEmpty {
                            listing: input.listing,
                        }
                    }
                    other => other.into(),
                })
            }
        }
    }

    /// Withdraw accumulated fees from a market's fee vault.
    ///
    /// The vault's live balance bounds the withdrawal; nothing is reserved
    /// ahead of the commit.
    ///
    /// # Errors
    ///
    /// Returns [`MarketError::MarketNotFound`] if the market is not
    /// registered, [`MarketError::InvalidVaultDerivation`] if the claimed
    /// vault does not re-derive or does not belong to the market,
    /// [`MarketError::NotAuthority`] if the signer is not the market
    /// authority, and [`MarketError::InsufficientVaultBalance`] if the vault
    /// holds less than the requested amount.
    pub async fn withdraw_fees(&self, input: WithdrawFeesInput) -> Result<WithdrawReceipt> {
        if input.payment_asset != self.config.payment_asset {
            return Err(MarketError::invalid_derivation(
                "fee vault is not denominated in the payment asset",
            ));
        }
        let expected_vault = create_address(
            &[
                VAULT_SEED,
                input.market.as_bytes(),
                input.payment_asset.as_bytes(),
            ],
            input.fee_vault_bump,
        )?;
        if expected_vault != input.fee_vault {
            return Err(MarketError::invalid_derivation(
                "fee vault address does not match its seeds",
            ));
        }

        let (authority, fee_vault) = {
            let books = self.books.read().await;
            let market = books
                .markets
                .get(&input.market)
                .ok_or(MarketError::MarketNotFound {
                    market: input.market,
                })?;
            (market.authority, market.fee_vault)
        };
        if fee_vault != input.fee_vault {
            return Err(MarketError::invalid_derivation(
                "fee vault does not belong to this market",
            ));
        }
        if authority != input.authority {
            return Err(MarketError::NotAuthority {
                account: input.authority,
            });
        }

        let tx = Transaction::with_memo("withdraw_fees")
            .debit(input.fee_vault, input.amount)
            .credit(input.destination, input.amount);
        let record = match self.ledger.commit(tx).await {
            Ok(record) => record,
            Err(LedgerError::InsufficientFunds { available, .. }) => {
                return Err(MarketError::InsufficientVaultBalance {
                    available,
                    requested: input.amount,
                });
            }
            Err(err) => return Err(err.into()),
        };
        let remaining = self.ledger.balance(&input.fee_vault).await;

        info!(
            market = %input.market,
            destination = %input.destination,
            amount = %input.amount,
            remaining = %remaining,
            "fees withdrawn"
        );
        Ok(WithdrawReceipt {
            market: input.market,
            destination: input.destination,
            amount: input.amount,
            remaining,
            transaction: record.id,
        })
    }
}
