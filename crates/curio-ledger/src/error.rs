//! Error types for ledger operations.

use crate::account::AccountId;
use crate::amount::Amount;
use crate::asset::AssetId;
use thiserror::Error;

/// Result type alias for ledger operations.
pub type Result<T> = std::result::Result<T, LedgerError>;

/// Errors that can occur during ledger operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// Malformed account or asset identifier.
    #[error("invalid address: {message}")]
    InvalidAddress {
        /// Description of the address error.
        message: String,
    },

    /// An account cannot cover the debits charged against it.
    #[error("insufficient funds: account {account} holds {available}, requires {required}")]
    InsufficientFunds {
        /// Account being debited.
        account: AccountId,
        /// Balance at validation time.
        available: Amount,
        /// Total debit the transaction requires.
        required: Amount,
    },

    /// Crediting an account would overflow its balance.
    #[error("balance overflow crediting account {account}")]
    BalanceOverflow {
        /// Account being credited.
        account: AccountId,
    },

    /// An asset move names a holder that does not currently hold the asset.
    #[error("asset {asset} is not held by account {account}")]
    AssetNotHeld {
        /// Asset being moved.
        asset: AssetId,
        /// Claimed source account.
        account: AccountId,
    },

    /// The asset has never been minted.
    #[error("unknown asset: {asset}")]
    UnknownAsset {
        /// Unrecognized asset id.
        asset: AssetId,
    },

    /// The asset id has already been minted.
    #[error("asset already minted: {asset}")]
    AssetExists {
        /// Duplicate asset id.
        asset: AssetId,
    },

    /// The asset id is reserved for the payment token and cannot be minted.
    #[error("asset id {asset} is reserved for the payment token")]
    ReservedAsset {
        /// Reserved asset id.
        asset: AssetId,
    },

    /// Address derivation failed or a claimed derivation does not hold.
    #[error("invalid derivation: {message}")]
    InvalidDerivation {
        /// Description of the derivation failure.
        message: String,
    },

    /// Signature verification failed.
    #[error("invalid signature for account {account}")]
    InvalidSignature {
        /// Claimed signer.
        account: AccountId,
    },

    /// A transaction with no entries was submitted.
    #[error("transaction has no entries")]
    EmptyTransaction,
}

impl LedgerError {
    /// Create an invalid address error.
    #[must_use]
    pub fn invalid_address(message: impl Into<String>) -> Self {
        Self::InvalidAddress {
            message: message.into(),
        }
    }

    /// Create an invalid derivation error.
    #[must_use]
    pub fn invalid_derivation(message: impl Into<String>) -> Self {
        Self::InvalidDerivation {
            message: message.into(),
        }
    }
}
