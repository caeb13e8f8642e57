//! Deterministic address derivation for custodial accounts.
//!
//! Vault and listing-record addresses are never chosen by a caller. Each is a
//! pure function of its seed components plus a one-byte bump proof: the digest
//! of the seeds is accepted only if it is *not* a valid Ed25519 public key.
//! Wallet addresses are always valid public keys, so the two address spaces
//! cannot overlap and no keypair exists that signs for a derived account.
//!
//! [`find_address`] searches bumps downward from 255 and returns the first
//! off-curve hit together with the bump. A caller presenting an address later
//! must also present that bump; [`create_address`] re-derives and the caller's
//! claim is checked by comparing the result.

use crate::account::AccountId;
use crate::error::{LedgerError, Result};
use ed25519_dalek::VerifyingKey;

/// Seed tag for listing record addresses.
pub const LISTING_SEED: &[u8] = b"listing";

/// Seed tag for vault addresses.
pub const VAULT_SEED: &[u8] = b"vault";

/// Domain separator mixed into every derived address.
const DERIVE_DOMAIN: &[u8] = b"curio-derive-v1";

/// Hash seed components with a bump into a candidate address.
///
/// Seeds are length-prefixed so `["ab", "c"]` and `["a", "bc"]` can never
/// collide.
fn candidate(seeds: &[&[u8]], bump: u8) -> [u8; 32] {
    let mut hasher = blake3::Hasher::new();
    hasher.update(DERIVE_DOMAIN);
    for seed in seeds {
        hasher.update(&(seed.len() as u64).to_le_bytes());
        hasher.update(seed);
    }
    hasher.update(&[bump]);
    *hasher.finalize().as_bytes()
}

fn is_off_curve(bytes: &[u8; 32]) -> bool {
    VerifyingKey::from_bytes(bytes).is_err()
}

/// Find the derived address for the given seeds.
///
/// Searches bumps from 255 downward and returns the first candidate that is
/// off-curve, together with the bump that produced it. Roughly half of all
/// candidates qualify, so the search terminates after one or two probes in
/// practice.
///
/// # Errors
///
/// Returns error if no bump yields an off-curve address. With 256 independent
/// candidates this cannot occur for real inputs, but the exhaustion path is
/// checked rather than assumed.
pub fn find_address(seeds: &[&[u8]]) -> Result<(AccountId, u8)> {
    for bump in (0..=255u8).rev() {
        let digest = candidate(seeds, bump);
        if is_off_curve(&digest) {
            return Ok((AccountId::from_bytes(digest), bump));
        }
    }
    Err(LedgerError::invalid_derivation(
        "no off-curve address exists for seeds",
    ))
}

/// Re-derive the address for the given seeds and a claimed bump.
///
/// # Errors
///
/// Returns error if the candidate at this bump is a valid public key. A wrong
/// but off-curve bump succeeds here and yields a different address; callers
/// must compare the result against the claimed address.
pub fn create_address(seeds: &[&[u8]], bump: u8) -> Result<AccountId> {
    let digest = candidate(seeds, bump);
    if is_off_curve(&digest) {
        Ok(AccountId::from_bytes(digest))
    } else {
        Err(LedgerError::invalid_derivation(format!(
            "bump {bump} lands on a valid signing key"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derivation_is_deterministic() {
        let seeds: &[&[u8]] = &[VAULT_SEED, b"market-1", b"asset-1"];
        let (a1, b1) = find_address(seeds).expect("should derive");
        let (a2, b2) = find_address(seeds).expect("should derive");
        assert_eq!(a1, a2);
        assert_eq!(b1, b2);
    }

    #[test]
    fn bump_proof_roundtrips() {
        let seeds: &[&[u8]] = &[LISTING_SEED, b"market-1", b"asset-1", b"seller-1"];
        let (address, bump) = find_address(seeds).expect("should derive");
        let rederived = create_address(seeds, bump).expect("should rederive");
        assert_eq!(address, rederived);
    }

    #[test]
    fn derived_address_is_off_curve() {
        let (address, _) = find_address(&[VAULT_SEED, b"anything"]).expect("should derive");
        assert!(VerifyingKey::from_bytes(address.as_bytes()).is_err());
    }

    #[test]
    fn different_seeds_differ() {
        let (a, _) = find_address(&[VAULT_SEED, b"market-1"]).expect("should derive");
        let (b, _) = find_address(&[VAULT_SEED, b"market-2"]).expect("should derive");
        assert_ne!(a, b);
    }

    #[test]
    fn seed_boundaries_matter() {
        let (a, _) = find_address(&[b"ab", b"c"]).expect("should derive");
        let (b, _) = find_address(&[b"a", b"bc"]).expect("should derive");
        assert_ne!(a, b);
    }

    #[test]
    fn wrong_bump_never_yields_same_address() {
        let seeds: &[&[u8]] = &[VAULT_SEED, b"market-1", b"asset-1"];
        let (address, bump) = find_address(seeds).expect("should derive");
        for wrong in (0..=255u8).filter(|b| *b != bump) {
            if let Ok(other) = create_address(seeds, wrong) {
                assert_ne!(other, address);
            }
        }
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn any_seeds_derive_and_roundtrip(
                market in proptest::collection::vec(any::<u8>(), 0..64),
                asset in proptest::collection::vec(any::<u8>(), 0..64),
            ) {
                let seeds: &[&[u8]] = &[VAULT_SEED, &market, &asset];
                let (address, bump) = find_address(seeds).expect("should derive");
                let rederived = create_address(seeds, bump).expect("should rederive");
                prop_assert_eq!(address, rederived);
                prop_assert!(VerifyingKey::from_bytes(address.as_bytes()).is_err());
            }
        }
    }
}
