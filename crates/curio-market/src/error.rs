//! Error types for marketplace operations.

use curio_ledger::{AccountId, Amount, AssetId, LedgerError};
use thiserror::Error;

/// Result type alias for marketplace operations.
pub type Result<T> = std::result::Result<T, MarketError>;

/// Errors that can occur during marketplace operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MarketError {
    /// A market record already exists under this id.
    #[error("market {market} is already initialized")]
    AlreadyInitialized {
        /// Id of the market that was already registered.
        market: AccountId,
    },

    /// No market record exists under this id.
    #[error("market {market} not found")]
    MarketNotFound {
        /// Id the caller presented.
        market: AccountId,
    },

    /// A listing record already exists at this address.
    #[error("listing {listing} already exists")]
    AlreadyListed {
        /// Derived listing address that is already occupied.
        listing: AccountId,
    },

    /// No listing record exists at this address.
    #[error("listing {listing} not found")]
    ListingNotFound {
        /// Derived listing address the caller presented.
        listing: AccountId,
    },

    /// The asking price must be greater than zero.
    #[error("asking price must be greater than zero")]
    InvalidAsk,

    /// The fee rate exceeds the per-mille denominator.
    #[error("fee rate {rate} exceeds the maximum of {denominator} per mille")]
    InvalidFeeRate {
        /// Rate that was rejected.
        rate: u16,
        /// Maximum admissible rate.
        denominator: u16,
    },

    /// The account is not the seller recorded on the listing.
    #[error("account {account} is not the listing seller")]
    NotSeller {
        /// Account that failed the seller check.
        account: AccountId,
    },

    /// The account is not the authority recorded on the market.
    #[error("account {account} is not the market authority")]
    NotAuthority {
        /// Account that failed the authority check.
        account: AccountId,
    },

    /// The listing is reserved by an in-flight settlement.
    #[error("listing {listing} is locked by an in-flight settlement")]
    ListingLocked {
        /// Address of the reserved listing.
        listing: AccountId,
    },

    /// A claimed address does not match its seed derivation.
    #[error("invalid vault derivation: {message}")]
    InvalidVaultDerivation {
        /// What failed to re-derive.
        message: String,
    },

    /// The asset is not held by the expected account.
    #[error("asset {asset} is not owned by account {account}")]
    AssetNotOwned {
        /// Asset that was checked.
        asset: AssetId,
        /// Account that does not hold it.
        account: AccountId,
    },

    /// The escrow vault no longer holds the listed asset.
    #[error("asset vault for listing {listing} is empty")]
    VaultEmpty {
        /// Listing whose vault failed the check.
        listing: AccountId,
    },

    /// An account has too little balance to fund a transfer.
    #[error("insufficient funds in {account}: available {available}, required {required}")]
    InsufficientFunds {
        /// Account that came up short.
        account: AccountId,
        /// Balance the account holds.
        available: Amount,
        /// Balance the transfer needed.
        required: Amount,
    },

    /// A fee vault withdrawal asked for more than the vault holds.
    #[error("fee vault holds {available}, cannot withdraw {requested}")]
    InsufficientVaultBalance {
        /// Live balance of the fee vault.
        available: Amount,
        /// Amount the authority asked for.
        requested: Amount,
    },

    /// Balance arithmetic overflowed.
    #[error("arithmetic overflow: {message}")]
    ArithmeticOverflow {
        /// Which computation overflowed.
        message: String,
    },

    /// A ledger failure with no more specific marketplace meaning.
    #[error("ledger error: {0}")]
    Ledger(#[source] LedgerError),
}

impl MarketError {
    /// Create an invalid derivation error with a message.
    pub fn invalid_derivation(message: impl Into<String>) -> Self {
        Self::InvalidVaultDerivation {
            message: message.into(),
        }
    }

    /// Create an arithmetic overflow error with a message.
    pub fn overflow(message: impl Into<String>) -> Self {
        Self::ArithmeticOverflow {
            message: message.into(),
        }
    }
}

impl From<LedgerError> for MarketError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::InsufficientFunds {
                account,
                available,
                required,
            } => Self::InsufficientFunds {
                account,
                available,
                required,
            },
            LedgerError::BalanceOverflow { account } => {
                Self::overflow(format!("balance of {account} would exceed the maximum"))
            }
            LedgerError::AssetNotHeld { asset, account } => {
                Self::AssetNotOwned { asset, account }
            }
            LedgerError::InvalidDerivation { message } => {
                Self::InvalidVaultDerivation { message }
            }
            other => Self::Ledger(other),
        }
    }
}
