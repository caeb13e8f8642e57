//! Payment token amount representation.
//!
//! Amounts are stored as integer base units. All arithmetic in transaction
//! paths is checked; nothing here wraps or goes through floating point.

use crate::UNITS_PER_TOKEN;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};

/// An amount of the payment token.
///
/// Stored as base units (1 token = 10^9 units) for exact accounting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Amount {
    units: u64,
}

impl Amount {
    /// Zero tokens.
    pub const ZERO: Self = Self { units: 0 };

    /// Maximum amount (`u64::MAX` base units).
    pub const MAX: Self = Self { units: u64::MAX };

    /// Create an amount from base units.
    #[must_use]
    pub const fn from_units(units: u64) -> Self {
        Self { units }
    }

    /// Create an amount from whole tokens, saturating at [`Amount::MAX`].
    #[must_use]
    pub const fn tokens(count: u64) -> Self {
        Self {
            units: count.saturating_mul(UNITS_PER_TOKEN),
        }
    }

    /// Get the amount in base units.
    #[must_use]
    pub const fn units(&self) -> u64 {
        self.units
    }

    /// Check if the amount is zero.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.units == 0
    }

    /// Saturating addition.
    #[must_use]
    pub const fn saturating_add(&self, other: Self) -> Self {
        Self {
            units: self.units.saturating_add(other.units),
        }
    }

    /// Saturating subtraction.
    #[must_use]
    pub const fn saturating_sub(&self, other: Self) -> Self {
        Self {
            units: self.units.saturating_sub(other.units),
        }
    }

    /// Checked addition.
    #[must_use]
    pub const fn checked_add(&self, other: Self) -> Option<Self> {
        match self.units.checked_add(other.units) {
            Some(units) => Some(Self { units }),
            None => None,
        }
    }

    /// Checked subtraction.
    #[must_use]
    pub const fn checked_sub(&self, other: Self) -> Option<Self> {
        match self.units.checked_sub(other.units) {
            Some(units) => Some(Self { units }),
            None => None,
        }
    }
}

impl Default for Amount {
    fn default() -> Self {
        Self::ZERO
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{:09} CUR",
            self.units / UNITS_PER_TOKEN,
            self.units % UNITS_PER_TOKEN
        )
    }
}

impl Add for Amount {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            units: self.units + other.units,
        }
    }
}

impl Sub for Amount {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self {
            units: self.units - other.units,
        }
    }
}

impl From<u64> for Amount {
    fn from(units: u64) -> Self {
        Self::from_units(units)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_to_units() {
        let amount = Amount::tokens(1);
        assert_eq!(amount.units(), UNITS_PER_TOKEN);
    }

    #[test]
    fn zero_is_zero() {
        assert!(Amount::ZERO.is_zero());
        assert_eq!(Amount::ZERO.units(), 0);
        assert_eq!(Amount::default(), Amount::ZERO);
    }

    #[test]
    fn add_and_sub() {
        let a = Amount::tokens(1);
        let b = Amount::tokens(2);
        assert_eq!((a + b).units(), 3 * UNITS_PER_TOKEN);
        assert_eq!((b - a).units(), UNITS_PER_TOKEN);
    }

    #[test]
    fn saturating_add_caps_at_max() {
        let c = Amount::MAX.saturating_add(Amount::tokens(1));
        assert_eq!(c, Amount::MAX);
    }

    #[test]
    fn saturating_sub_floors_at_zero() {
        let c = Amount::tokens(1).saturating_sub(Amount::tokens(2));
        assert!(c.is_zero());
    }

    #[test]
    fn checked_add_detects_overflow() {
        assert!(Amount::MAX.checked_add(Amount::from_units(1)).is_none());
        assert_eq!(
            Amount::from_units(2).checked_add(Amount::from_units(3)),
            Some(Amount::from_units(5))
        );
    }

    #[test]
    fn checked_sub_detects_underflow() {
        assert!(Amount::ZERO.checked_sub(Amount::from_units(1)).is_none());
        assert_eq!(
            Amount::from_units(5).checked_sub(Amount::from_units(3)),
            Some(Amount::from_units(2))
        );
    }

    #[test]
    fn display_renders_nine_decimals() {
        let amount = Amount::from_units(1_500_000_000);
        let s = format!("{amount}");
        assert_eq!(s, "1.500000000 CUR");
    }

    #[test]
    fn display_pads_small_amounts() {
        let amount = Amount::from_units(25);
        assert_eq!(format!("{amount}"), "0.000000025 CUR");
    }

    #[test]
    fn ordering_follows_units() {
        assert!(Amount::tokens(1) < Amount::tokens(2));
        assert!(Amount::MAX > Amount::ZERO);
    }

    #[test]
    fn serialization_roundtrip() {
        let amount = Amount::from_units(975_000_000);
        let json = serde_json::to_string(&amount).expect("serialize");
        let parsed: Amount = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(amount, parsed);
    }
}
