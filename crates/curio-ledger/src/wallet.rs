//! Wallet keypairs and signature verification.
//!
//! A wallet's address is its Ed25519 verifying key, so every wallet address
//! is a valid curve point. Derived vault addresses are constructed to be
//! off-curve, which keeps the two identity spaces disjoint: no keypair can
//! ever sign on behalf of a vault.

use crate::account::AccountId;
use crate::error::{LedgerError, Result};
use ed25519_dalek::{Signature, Signer, SigningKey, VerifyingKey};
use rand::rngs::OsRng;
use rand::RngCore;
use std::fmt;

/// An Ed25519 wallet keypair.
pub struct Wallet {
    signing_key: SigningKey,
    address: AccountId,
}

impl Wallet {
    /// Generate a new random wallet.
    ///
    /// Uses `OsRng` directly instead of `thread_rng()` because cryptographic
    /// key material should come directly from the operating system's CSPRNG
    /// rather than a userspace PRNG that is merely seeded from system entropy.
    #[must_use]
    pub fn generate() -> Self {
        let mut secret_bytes = [0u8; 32];
        OsRng.fill_bytes(&mut secret_bytes);
        Self::from_secret_key(&secret_bytes)
    }

    /// Create a wallet from a 32-byte secret key.
    #[must_use]
    pub fn from_secret_key(secret: &[u8; 32]) -> Self {
        let signing_key = SigningKey::from_bytes(secret);
        let address = AccountId::from_bytes(signing_key.verifying_key().to_bytes());
        Self {
            signing_key,
            address,
        }
    }

    /// Get the wallet address.
    #[must_use]
    pub const fn address(&self) -> AccountId {
        self.address
    }

    /// Get the public verifying key.
    #[must_use]
    pub fn verifying_key(&self) -> VerifyingKey {
        self.signing_key.verifying_key()
    }

    /// Get the secret key bytes (careful with this!).
    #[must_use]
    pub fn secret_key(&self) -> &[u8; 32] {
        self.signing_key.as_bytes()
    }

    /// Sign a message.
    #[must_use]
    pub fn sign(&self, message: &[u8]) -> Signature {
        self.signing_key.sign(message)
    }
}

impl Default for Wallet {
    fn default() -> Self {
        Self::generate()
    }
}

#[allow(clippy::missing_fields_in_debug)]
impl fmt::Debug for Wallet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Wallet")
            .field("address", &self.address)
            .field("secret_key", &"[REDACTED]")
            .finish()
    }
}

/// Verify a signature against the claimed signer's address.
///
/// Uses strict verification to prevent signature malleability. Fails with
/// `InvalidAddress` if the address is not a curve point at all, which is the
/// case for every derived vault address.
///
/// # Errors
///
/// Returns error if the address is not a signing identity or the signature
/// does not verify.
pub fn verify_signature(address: &AccountId, message: &[u8], signature: &Signature) -> Result<()> {
    let key = VerifyingKey::from_bytes(address.as_bytes())
        .map_err(|_| LedgerError::invalid_address("account is not a signing identity"))?;
    key.verify_strict(message, signature)
        .map_err(|_| LedgerError::InvalidSignature { account: *address })
}
