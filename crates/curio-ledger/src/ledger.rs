//! In-memory keyed ledger with atomic multi-account commits.
//!
//! The ledger provides the storage primitives the marketplace core consumes:
//! payment balances keyed by account, a registry mapping each non-fungible
//! asset to its sole holder, and [`Ledger::commit`], which validates and
//! applies a whole [`Transaction`] under one write guard. A transaction that
//! fails validation leaves every balance and holding untouched.

use crate::account::AccountId;
use crate::amount::Amount;
use crate::asset::AssetId;
use crate::error::{LedgerError, Result};
use crate::transaction::{Entry, Transaction, TransactionId, TransactionRecord};
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::{debug, info};

#[derive(Debug, Default)]
struct LedgerState {
    balances: HashMap<AccountId, Amount>,
    holdings: HashMap<AssetId, AccountId>,
    committed: HashMap<String, TransactionRecord>,
}

/// Keyed account ledger for the payment token and non-fungible assets.
#[derive(Debug, Default)]
pub struct Ledger {
    state: RwLock<LedgerState>,
}

impl Ledger {
    /// Create an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the payment balance of an account. Unknown accounts hold zero.
    pub async fn balance(&self, account: &AccountId) -> Amount {
        let state = self.state.read().await;
        state.balances.get(account).copied().unwrap_or(Amount::ZERO)
    }

    /// Credit an account from outside the ledger (faucet-style funding).
    ///
    /// Returns the new balance.
    ///
    /// # Errors
    ///
    /// Returns error if the credit would overflow the balance.
    pub async fn deposit(&self, account: &AccountId, amount: Amount) -> Result<Amount> {
        let mut state = self.state.write().await;
        let balance = state.balances.entry(*account).or_insert(Amount::ZERO);
        *balance = balance
            .checked_add(amount)
            .ok_or(LedgerError::BalanceOverflow { account: *account })?;
        let new_balance = *balance;
        debug!(account = %account, amount = %amount, balance = %new_balance, "deposit credited");
        Ok(new_balance)
    }

    /// Register a new non-fungible asset held by `owner`.
    ///
    /// # Errors
    ///
    /// Returns error if the asset id is the reserved payment id or was
    /// already minted.
    pub async fn mint(&self, asset: AssetId, owner: &AccountId) -> Result<()> {
        if asset.is_payment() {
            return Err(LedgerError::ReservedAsset { asset });
        }
        let mut state = self.state.write().await;
        if state.holdings.contains_key(&asset) {
            return Err(LedgerError::AssetExists { asset });
        }
        state.holdings.insert(asset, *owner);
        info!(asset = %asset, owner = %owner, "asset minted");
        Ok(())
    }

    /// Current holder of an asset, if it has been minted.
    pub async fn holder(&self, asset: &AssetId) -> Option<AccountId> {
        let state = self.state.read().await;
        state.holdings.get(asset).copied()
    }

    /// Validate and apply a transaction as one unit.
    ///
    /// Debits are validated against balances as they stood before the
    /// transaction; credits in the same transaction do not fund them. Asset
    /// moves validate against the holder produced by any earlier move of the
    /// same asset in the batch. Nothing is written until every entry has
    /// checked out.
    ///
    /// # Errors
    ///
    /// Returns error if the transaction is empty, an account cannot cover its
    /// total debits, a credit would overflow, or an asset move names a
    /// non-holder. On error no entry is applied.
    pub async fn commit(&self, tx: Transaction) -> Result<TransactionRecord> {
        if tx.is_empty() {
            return Err(LedgerError::EmptyTransaction);
        }

        let mut state = self.state.write().await;

        let mut debits: HashMap<AccountId, Amount> = HashMap::new();
        let mut credits: HashMap<AccountId, Amount> = HashMap::new();
        // Post-move holder overlay so a later move of the same asset
        // validates against the holder an earlier entry produced.
        let mut moved: HashMap<AssetId, AccountId> = HashMap::new();

        for entry in tx.entries() {
            match entry {
                Entry::Debit { account, amount } => {
                    let total = debits.entry(*account).or_insert(Amount::ZERO);
                    *total = total
                        .checked_add(*amount)
                        .ok_or(LedgerError::BalanceOverflow { account: *account })?;
                }
                Entry::Credit { account, amount } => {
                    let total = credits.entry(*account).or_insert(Amount::ZERO);
                    *total = total
                        .checked_add(*amount)
                        .ok_or(LedgerError::BalanceOverflow { account: *account })?;
                }
                Entry::MoveAsset { asset, from, to } => {
                    let holder = moved
                        .get(asset)
                        .copied()
                        .or_else(|| state.holdings.get(asset).copied())
                        .ok_or(LedgerError::UnknownAsset { asset: *asset })?;
                    if holder != *from {
                        return Err(LedgerError::AssetNotHeld {
                            asset: *asset,
                            account: *from,
                        });
                    }
                    moved.insert(*asset, *to);
                }
            }
        }

        // Stage final balances before touching state.
        let mut staged: HashMap<AccountId, Amount> = HashMap::new();
        for (account, required) in &debits {
            let available = state.balances.get(account).copied().unwrap_or(Amount::ZERO);
            let remaining =
                available
                    .checked_sub(*required)
                    .ok_or(LedgerError::InsufficientFunds {
                        account: *account,
                        available,
                        required: *required,
                    })?;
            staged.insert(*account, remaining);
        }
        for (account, added) in &credits {
            let base = staged.get(account).copied().unwrap_or_else(|| {
                state.balances.get(account).copied().unwrap_or(Amount::ZERO)
            });
            let next = base
                .checked_add(*added)
                .ok_or(LedgerError::BalanceOverflow { account: *account })?;
            staged.insert(*account, next);
        }

        for (account, balance) in staged {
            state.balances.insert(account, balance);
        }
        for (asset, holder) in moved {
            state.holdings.insert(asset, holder);
        }

        let (entries, memo) = tx.into_parts();
        let record = TransactionRecord {
            id: TransactionId::new(),
            entries,
            memo,
            committed_at: Utc::now(),
        };
        state
            .committed
            .insert(record.id.as_str().to_string(), record.clone());

        info!(
            transaction = %record.id,
            entries = record.entries.len(),
            memo = record.memo.as_deref().unwrap_or(""),
            "transaction committed"
        );

        Ok(record)
    }

    /// Look up a committed transaction by id.
    pub async fn record(&self, id: &TransactionId) -> Option<TransactionRecord> {
        let state = self.state.read().await;
        state.committed.get(id.as_str()).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(byte: u8) -> AccountId {
        AccountId::from_bytes([byte; 32])
    }

    fn asset(byte: u8) -> AssetId {
        AssetId::from_bytes([byte; 32])
    }

    #[tokio::test]
    async fn balance_defaults_to_zero() {
        let ledger = Ledger::new();
        assert!(ledger.balance(&account(1)).await.is_zero());
    }

    #[tokio::test]
    async fn deposit_accumulates() {
        let ledger = Ledger::new();
        ledger
            .deposit(&account(1), Amount::from_units(100))
            .await
            .expect("should deposit");
        let balance = ledger
            .deposit(&account(1), Amount::from_units(50))
            .await
            .expect("should deposit");
        assert_eq!(balance, Amount::from_units(150));
        assert_eq!(ledger.balance(&account(1)).await, Amount::from_units(150));
    }

    #[tokio::test]
    async fn deposit_overflow_fails() {
        let ledger = Ledger::new();
        ledger
            .deposit(&account(1), Amount::MAX)
            .await
            .expect("should deposit");
        let result = ledger.deposit(&account(1), Amount::from_units(1)).await;
        assert!(matches!(result, Err(LedgerError::BalanceOverflow { .. })));
        assert_eq!(ledger.balance(&account(1)).await, Amount::MAX);
    }

    #[tokio::test]
    async fn mint_registers_holder() {
        let ledger = Ledger::new();
        ledger
            .mint(asset(9), &account(1))
            .await
            .expect("should mint");
        assert_eq!(ledger.holder(&asset(9)).await, Some(account(1)));
    }

    #[tokio::test]
    async fn mint_rejects_payment_id() {
        let ledger = Ledger::new();
        let result = ledger.mint(AssetId::PAYMENT, &account(1)).await;
        assert!(matches!(result, Err(LedgerError::ReservedAsset { .. })));
        assert_eq!(ledger.holder(&AssetId::PAYMENT).await, None);
    }

    #[tokio::test]
    async fn mint_rejects_duplicate() {
        let ledger = Ledger::new();
        ledger
            .mint(asset(9), &account(1))
            .await
            .expect("should mint");
        let result = ledger.mint(asset(9), &account(2)).await;
        assert!(matches!(result, Err(LedgerError::AssetExists { .. })));
        assert_eq!(ledger.holder(&asset(9)).await, Some(account(1)));
    }

    #[tokio::test]
    async fn commit_transfer_moves_balance() {
        let ledger = Ledger::new();
        ledger
            .deposit(&account(1), Amount::from_units(100))
            .await
            .expect("should deposit");

        let tx = Transaction::with_memo("transfer").transfer(
            account(1),
            account(2),
            Amount::from_units(30),
        );
        let record = ledger.commit(tx).await.expect("should commit");

        assert_eq!(record.entries.len(), 2);
        assert_eq!(ledger.balance(&account(1)).await, Amount::from_units(70));
        assert_eq!(ledger.balance(&account(2)).await, Amount::from_units(30));
    }

    #[tokio::test]
    async fn commit_rejects_empty_transaction() {
        let ledger = Ledger::new();
        let result = ledger.commit(Transaction::new()).await;
        assert!(matches!(result, Err(LedgerError::EmptyTransaction)));
    }

    #[tokio::test]
    async fn commit_insufficient_funds_applies_nothing() {
        let ledger = Ledger::new();
        ledger
            .deposit(&account(1), Amount::from_units(10))
            .await
            .expect("should deposit");

        let tx = Transaction::new()
            .debit(account(1), Amount::from_units(5))
            .credit(account(2), Amount::from_units(5))
            .debit(account(1), Amount::from_units(7));
        let result = ledger.commit(tx).await;

        assert!(matches!(
            result,
            Err(LedgerError::InsufficientFunds { required, .. }) if required == Amount::from_units(12)
        ));
        assert_eq!(ledger.balance(&account(1)).await, Amount::from_units(10));
        assert!(ledger.balance(&account(2)).await.is_zero());
    }

    #[tokio::test]
    async fn commit_aggregates_debits_per_account() {
        let ledger = Ledger::new();
        ledger
            .deposit(&account(1), Amount::from_units(10))
            .await
            .expect("should deposit");

        // Each debit alone fits; together they do not.
        let tx = Transaction::new()
            .debit(account(1), Amount::from_units(6))
            .debit(account(1), Amount::from_units(6));
        let result = ledger.commit(tx).await;
        assert!(matches!(result, Err(LedgerError::InsufficientFunds { .. })));
        assert_eq!(ledger.balance(&account(1)).await, Amount::from_units(10));
    }

    #[tokio::test]
    async fn credits_do_not_fund_debits_in_same_transaction() {
        let ledger = Ledger::new();
        let tx = Transaction::new()
            .credit(account(1), Amount::from_units(10))
            .debit(account(1), Amount::from_units(5));
        let result = ledger.commit(tx).await;
        assert!(matches!(
            result,
            Err(LedgerError::InsufficientFunds { available, .. }) if available.is_zero()
        ));
        assert!(ledger.balance(&account(1)).await.is_zero());
    }

    #[tokio::test]
    async fn commit_credit_overflow_applies_nothing() {
        let ledger = Ledger::new();
        ledger
            .deposit(&account(1), Amount::from_units(10))
            .await
            .expect("should deposit");
        ledger
            .deposit(&account(2), Amount::MAX)
            .await
            .expect("should deposit");

        let tx = Transaction::new()
            .debit(account(1), Amount::from_units(10))
            .credit(account(2), Amount::from_units(1));
        let result = ledger.commit(tx).await;

        assert!(matches!(result, Err(LedgerError::BalanceOverflow { .. })));
        assert_eq!(ledger.balance(&account(1)).await, Amount::from_units(10));
        assert_eq!(ledger.balance(&account(2)).await, Amount::MAX);
    }

    #[tokio::test]
    async fn commit_move_requires_current_holder() {
        let ledger = Ledger::new();
        ledger
            .mint(asset(9), &account(1))
            .await
            .expect("should mint");

        let tx = Transaction::new().move_asset(asset(9), account(2), account(3));
        let result = ledger.commit(tx).await;
        assert!(matches!(
            result,
            Err(LedgerError::AssetNotHeld { account: a, .. }) if a == account(2)
        ));
        assert_eq!(ledger.holder(&asset(9)).await, Some(account(1)));
    }

    #[tokio::test]
    async fn commit_move_unknown_asset_fails() {
        let ledger = Ledger::new();
        let tx = Transaction::new().move_asset(asset(9), account(1), account(2));
        let result = ledger.commit(tx).await;
        assert!(matches!(result, Err(LedgerError::UnknownAsset { .. })));
    }

    #[tokio::test]
    async fn sequential_moves_validate_against_overlay() {
        let ledger = Ledger::new();
        ledger
            .mint(asset(9), &account(1))
            .await
            .expect("should mint");

        let tx = Transaction::new()
            .move_asset(asset(9), account(1), account(2))
            .move_asset(asset(9), account(2), account(3));
        ledger.commit(tx).await.expect("should commit");
        assert_eq!(ledger.holder(&asset(9)).await, Some(account(3)));
    }

    #[tokio::test]
    async fn stale_move_in_same_transaction_fails() {
        let ledger = Ledger::new();
        ledger
            .mint(asset(9), &account(1))
            .await
            .expect("should mint");

        // Second entry still claims the pre-transaction holder.
        let tx = Transaction::new()
            .move_asset(asset(9), account(1), account(2))
            .move_asset(asset(9), account(1), account(3));
        let result = ledger.commit(tx).await;
        assert!(matches!(result, Err(LedgerError::AssetNotHeld { .. })));
        assert_eq!(ledger.holder(&asset(9)).await, Some(account(1)));
    }

    #[tokio::test]
    async fn failed_commit_leaves_asset_and_funds_in_place() {
        let ledger = Ledger::new();
        ledger
            .deposit(&account(1), Amount::from_units(100))
            .await
            .expect("should deposit");
        ledger
            .mint(asset(9), &account(5))
            .await
            .expect("should mint");

        // Balance motion is fine, asset move is not.
        let tx = Transaction::new()
            .transfer(account(1), account(2), Amount::from_units(40))
            .move_asset(asset(9), account(6), account(1));
        let result = ledger.commit(tx).await;

        assert!(result.is_err());
        assert_eq!(ledger.balance(&account(1)).await, Amount::from_units(100));
        assert!(ledger.balance(&account(2)).await.is_zero());
        assert_eq!(ledger.holder(&asset(9)).await, Some(account(5)));
    }

    #[tokio::test]
    async fn committed_records_are_retrievable() {
        let ledger = Ledger::new();
        ledger
            .deposit(&account(1), Amount::from_units(10))
            .await
            .expect("should deposit");

        let tx = Transaction::with_memo("probe").transfer(
            account(1),
            account(2),
            Amount::from_units(1),
        );
        let record = ledger.commit(tx).await.expect("should commit");

        let fetched = ledger.record(&record.id).await.expect("should find record");
        assert_eq!(fetched.memo.as_deref(), Some("probe"));
        assert_eq!(fetched.entries.len(), 2);
    }
}
