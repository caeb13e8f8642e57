//! Fee arithmetic for listing settlements.
//!
//! Calculates the marketplace cut of a sale and the exact partition of the
//! asking price into fee and seller proceeds.
//!
//! # Precision Guarantees
//!
//! All fee calculations use **fixed-point arithmetic** with the following guarantees:
//!
//! - **No floating-point**: All calculations use integer arithmetic only
//! - **No precision loss**: Intermediate calculations use `u128` to prevent overflow
//! - **Floor rounding**: When a fractional unit would result, the fee rounds DOWN,
//!   so the rounding remainder always stays with the seller
//! - **Exact partition**: `fee + proceeds == ask` holds for every admissible rate
//!
//! ## Rounding Rules
//!
//! The fee formula is: `fee = floor(ask × rate / 1000)`
//!
//! Examples:
//! - 1_000_000_000 units at 25 per mille = 25_000_000 units (exact)
//! - 999 units at 25 per mille = 24 units (rounded down from 24.975)
//! - 1 unit at 999 per mille = 0 units (rounded down from 0.999)

use serde::{Deserialize, Serialize};

use crate::error::{MarketError, Result};
use curio_ledger::Amount;

/// Per-mille denominator for fee rates.
pub const FEE_DENOMINATOR: u64 = 1000;

/// A validated per-mille fee rate.
///
/// Admissible rates run from 0 (no fee) to [`FEE_DENOMINATOR`] (the entire
/// asking price). Construction through [`FeeRate::new`] is the only way to
/// obtain a rate, so every held value is already in range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub struct FeeRate(u16);

impl FeeRate {
    /// A rate that charges no fee.
    pub const ZERO: Self = Self(0);

    /// A rate that takes the entire asking price.
    pub const MAX: Self = Self(FEE_DENOMINATOR as u16);

    /// Create a fee rate, rejecting values above the denominator.
    ///
    /// # Errors
    /// Returns [`MarketError::InvalidFeeRate`] if `per_mille` exceeds
    /// [`FEE_DENOMINATOR`].
    pub const fn new(per_mille: u16) -> Result<Self> {
        if per_mille as u64 > FEE_DENOMINATOR {
            return Err(MarketError::InvalidFeeRate {
                rate: per_mille,
                denominator: FEE_DENOMINATOR as u16,
            });
        }
        Ok(Self(per_mille))
    }

    /// The rate in parts per thousand.
    #[must_use]
    pub const fn per_mille(self) -> u16 {
        self.0
    }
}

impl TryFrom<u16> for FeeRate {
    type Error = MarketError;

    fn try_from(value: u16) -> Result<Self> {
        Self::new(value)
    }
}

impl From<FeeRate> for u16 {
    fn from(rate: FeeRate) -> Self {
        rate.0
    }
}

impl std::fmt::Display for FeeRate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.0, FEE_DENOMINATOR)
    }
}

/// Calculates the marketplace fee for an asking price.
///
/// Uses fixed-point arithmetic with u128 intermediates to ensure:
/// - No precision loss for any valid input combination
/// - No overflow for any `ask`, up to `u64::MAX` units
/// - Floor rounding (the remainder stays with the seller)
///
/// # Precision Guarantee
/// For any `ask` and admissible `rate`, this function returns
/// `floor(ask × rate / 1000)`, which never exceeds `ask`.
///
/// # Examples
/// ```
/// use curio_ledger::Amount;
/// use curio_market::fees::{listing_fee, FeeRate};
///
/// let rate = FeeRate::new(25).expect("25 per mille is admissible");
///
/// // Exact calculation: 1 token at 2.5% = 0.025 tokens
/// assert_eq!(
///     listing_fee(Amount::from_units(1_000_000_000), rate),
///     Amount::from_units(25_000_000)
/// );
///
/// // Floor rounding: 999 units at 2.5% = 24 units, not 25
/// assert_eq!(listing_fee(Amount::from_units(999), rate), Amount::from_units(24));
/// ```
#[must_use]
pub const fn listing_fee(ask: Amount, rate: FeeRate) -> Amount {
    // u128 intermediate: ask * rate cannot overflow even at u64::MAX
    let numerator = ask.units() as u128 * rate.0 as u128;
    let fee = numerator / FEE_DENOMINATOR as u128;

    // rate <= 1000 so fee <= ask <= u64::MAX; the cast cannot truncate
    Amount::from_units(fee as u64)
}

/// Splits an asking price into `(fee, seller_proceeds)`.
///
/// The two parts always sum back to `ask` exactly. No unit is created or
/// destroyed by the split.
#[must_use]
pub const fn split_ask(ask: Amount, rate: FeeRate) -> (Amount, Amount) {
    let fee = listing_fee(ask, rate);
    // fee <= ask for every admissible rate; the subtraction cannot underflow
    (fee, ask.saturating_sub(fee))
}
