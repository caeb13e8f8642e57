//! Atomic multi-account transactions.
//!
//! A [`Transaction`] is an ordered list of entries that the ledger validates
//! and applies as one unit. Either every entry lands or none of them do;
//! there is no partial application.

use crate::account::AccountId;
use crate::amount::Amount;
use crate::asset::AssetId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier of a committed transaction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TransactionId(String);

impl TransactionId {
    /// Create a new random transaction ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Create from a string.
    #[must_use]
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the ID as a string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for TransactionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single movement inside a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum Entry {
    /// Remove payment units from an account.
    Debit {
        /// Account to debit.
        account: AccountId,
        /// Units removed.
        amount: Amount,
    },
    /// Add payment units to an account.
    Credit {
        /// Account to credit.
        account: AccountId,
        /// Units added.
        amount: Amount,
    },
    /// Move a non-fungible asset between holders.
    MoveAsset {
        /// Asset being moved.
        asset: AssetId,
        /// Current holder.
        from: AccountId,
        /// New holder.
        to: AccountId,
    },
}

/// An atomic batch of ledger entries, built up before commit.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Transaction {
    entries: Vec<Entry>,
    memo: Option<String>,
}

impl Transaction {
    /// Create an empty transaction.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty transaction with a memo describing the operation.
    #[must_use]
    pub fn with_memo(memo: impl Into<String>) -> Self {
        Self {
            entries: Vec::new(),
            memo: Some(memo.into()),
        }
    }

    /// Add a debit entry.
    #[must_use]
    pub fn debit(mut self, account: AccountId, amount: Amount) -> Self {
        self.entries.push(Entry::Debit { account, amount });
        self
    }

    /// Add a credit entry.
    #[must_use]
    pub fn credit(mut self, account: AccountId, amount: Amount) -> Self {
        self.entries.push(Entry::Credit { account, amount });
        self
    }

    /// Add a paired debit and credit moving `amount` between two accounts.
    #[must_use]
    pub fn transfer(self, from: AccountId, to: AccountId, amount: Amount) -> Self {
        self.debit(from, amount).credit(to, amount)
    }

    /// Add an asset move entry.
    #[must_use]
    pub fn move_asset(mut self, asset: AssetId, from: AccountId, to: AccountId) -> Self {
        self.entries.push(Entry::MoveAsset { asset, from, to });
        self
    }

    /// The entries in submission order.
    #[must_use]
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// The memo, if one was set.
    #[must_use]
    pub fn memo(&self) -> Option<&str> {
        self.memo.as_deref()
    }

    /// Whether the transaction has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Consume the transaction into its parts.
    #[must_use]
    pub fn into_parts(self) -> (Vec<Entry>, Option<String>) {
        (self.entries, self.memo)
    }
}

/// A committed transaction with its audit metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionRecord {
    /// Unique transaction ID.
    pub id: TransactionId,
    /// The entries that were applied.
    pub entries: Vec<Entry>,
    /// Memo carried from submission.
    pub memo: Option<String>,
    /// Commit timestamp.
    pub committed_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(byte: u8) -> AccountId {
        AccountId::from_bytes([byte; 32])
    }

    #[test]
    fn transaction_ids_are_unique() {
        assert_ne!(TransactionId::new(), TransactionId::new());
    }

    #[test]
    fn builder_preserves_entry_order() {
        let asset = AssetId::from_bytes([9u8; 32]);
        let tx = Transaction::with_memo("buy")
            .debit(account(1), Amount::from_units(100))
            .credit(account(2), Amount::from_units(97))
            .credit(account(3), Amount::from_units(3))
            .move_asset(asset, account(4), account(1));

        assert_eq!(tx.len(), 4);
        assert_eq!(tx.memo(), Some("buy"));
        assert!(matches!(tx.entries()[0], Entry::Debit { .. }));
        assert!(matches!(tx.entries()[3], Entry::MoveAsset { .. }));
    }

    #[test]
    fn transfer_expands_to_debit_and_credit() {
        let tx = Transaction::new().transfer(account(1), account(2), Amount::from_units(5));
        assert_eq!(tx.len(), 2);
        assert!(matches!(
            tx.entries()[0],
            Entry::Debit { account: a, amount } if a == account(1) && amount == Amount::from_units(5)
        ));
        assert!(matches!(
            tx.entries()[1],
            Entry::Credit { account: a, amount } if a == account(2) && amount == Amount::from_units(5)
        ));
    }

    #[test]
    fn empty_transaction_reports_empty() {
        let tx = Transaction::new();
        assert!(tx.is_empty());
        assert_eq!(tx.len(), 0);
        assert!(tx.memo().is_none());
    }

    #[test]
    fn entry_serialization_is_tagged() {
        let entry = Entry::Debit {
            account: account(1),
            amount: Amount::from_units(10),
        };
        let json = serde_json::to_string(&entry).expect("serialize");
        assert!(json.contains("\"kind\":\"debit\""));
        let parsed: Entry = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(entry, parsed);
    }
}
