//! # curio-ledger
//!
//! Accounts, assets, and derived vault addresses for the Curio marketplace.
//!
//! This crate provides the primitives the marketplace core builds on:
//! - Wallet keypairs and signature verification (Ed25519, base58 addresses)
//! - Payment balances and a non-fungible asset registry
//! - Deterministic vault/record address derivation with bump proofs
//! - Atomic multi-account transactions with a single commit boundary
//!
//! ## Units
//!
//! The payment token has 9 decimals: 1 token = `1_000_000_000` base units.
//! All arithmetic is integer and checked; nothing wraps.
//!
//! ## Example
//!
//! ```rust,no_run
//! use curio_ledger::{Amount, AssetId, Ledger, Transaction, Wallet};
//!
//! # async fn example() -> curio_ledger::Result<()> {
//! let ledger = Ledger::new();
//!
//! let alice = Wallet::generate();
//! let bob = Wallet::generate();
//! ledger.deposit(&alice.address(), Amount::tokens(10)).await?;
//!
//! let artwork = AssetId::random();
//! ledger.mint(artwork, &bob.address()).await?;
//!
//! // One atomic unit: payment moves one way, the asset moves the other.
//! let tx = Transaction::with_memo("sale")
//!     .transfer(alice.address(), bob.address(), Amount::tokens(3))
//!     .move_asset(artwork, bob.address(), alice.address());
//! ledger.commit(tx).await?;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod account;
pub mod amount;
pub mod asset;
pub mod derive;
pub mod error;
pub mod ledger;
pub mod transaction;
pub mod wallet;

pub use account::AccountId;
pub use amount::Amount;
pub use asset::AssetId;
pub use error::{LedgerError, Result};
pub use ledger::Ledger;
pub use transaction::{Entry, Transaction, TransactionId, TransactionRecord};
pub use wallet::{verify_signature, Wallet};

/// Payment token decimals.
pub const TOKEN_DECIMALS: u8 = 9;

/// One payment token in base units.
pub const UNITS_PER_TOKEN: u64 = 1_000_000_000;
