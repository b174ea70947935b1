//! # Money Module
//!
//! Provides the `Money` type for handling product prices and inventory
//! valuations safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In floating point:                                                     │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  Inventory value = Σ price × stock over thousands of products          │
//! │    drifts by cents when accumulated in f64                             │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents                                            │
//! │    Operator input (f64) is rounded ONCE at the validation boundary,    │
//! │    everything after that is exact i64 arithmetic                       │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use depot_core::money::Money;
//!
//! let price = Money::from_cents(1099); // $10.99
//! let stock_value = price * 3;
//! assert_eq!(stock_value.cents(), 3297);
//! ```

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Mul};

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in the smallest currency unit (cents).
///
/// ## Design Decisions
/// - **i64 (signed)**: Differences between valuations can be negative
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - **Derives**: Full serde support for JSON serialization
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use depot_core::money::Money;
    ///
    /// let price = Money::from_cents(1099); // Represents $10.99
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Converts a decimal amount to cents, rounding half away from zero.
    ///
    /// This is the only place a float becomes `Money`. The float is first
    /// read as the shortest decimal that round-trips, so `1.005` rounds to
    /// 101 cents. `None` for NaN, infinities and amounts beyond `i64` cents.
    ///
    /// ## Example
    /// ```rust
    /// use depot_core::money::Money;
    ///
    /// assert_eq!(Money::round_from_decimal(99.999).unwrap().cents(), 10000);
    /// assert_eq!(Money::round_from_decimal(0.125).unwrap().cents(), 13);
    /// assert!(Money::round_from_decimal(f64::NAN).is_none());
    /// ```
    pub fn round_from_decimal(amount: f64) -> Option<Self> {
        let rounded = Decimal::from_f64(amount)?
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        let cents = rounded.checked_mul(Decimal::ONE_HUNDRED)?.to_i64()?;
        Some(Money(cents))
    }

    /// Returns the value in cents (smallest currency unit).
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit (dollars) portion.
    #[inline]
    pub const fn dollars(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit (cents) portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns the amount as a decimal number (for display and export only).
    #[inline]
    pub fn as_decimal(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(
            f,
            "{}${}.{:02}",
            sign,
            self.dollars().abs(),
            self.cents_part()
        )
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

/// Value of `qty` units at this unit price.
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        let money = Money::from_cents(1099);
        assert_eq!(money.cents(), 1099);
        assert_eq!(money.dollars(), 10);
        assert_eq!(money.cents_part(), 99);
    }

    #[test]
    fn test_round_from_decimal_half_up() {
        let cents = |amount: f64| Money::round_from_decimal(amount).unwrap().cents();

        assert_eq!(cents(99.999), 10000);
        assert_eq!(cents(99.99), 9999);
        assert_eq!(cents(10.005), 1001);
        assert_eq!(cents(1.005), 101);
        assert_eq!(cents(2.675), 268);
        assert_eq!(cents(10.004), 1000);
        assert_eq!(cents(0.0), 0);
        assert_eq!(cents(-0.125), -13);
        assert_eq!(cents(999_999.99), 99_999_999);
    }

    #[test]
    fn test_round_from_decimal_rejects_non_finite() {
        assert!(Money::round_from_decimal(f64::NAN).is_none());
        assert!(Money::round_from_decimal(f64::INFINITY).is_none());
        assert!(Money::round_from_decimal(f64::MAX).is_none());
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_cents(1099)), "$10.99");
        assert_eq!(format!("{}", Money::from_cents(500)), "$5.00");
        assert_eq!(format!("{}", Money::from_cents(-550)), "-$5.50");
        assert_eq!(format!("{}", Money::from_cents(0)), "$0.00");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!((a + b).cents(), 1500);
        assert_eq!((a * 3).cents(), 3000);
        assert_eq!((b * 0).cents(), 0);
    }

    #[test]
    fn test_sum_of_valuations() {
        let total: Money = [Money::from_cents(129_999) * 10, Money::from_cents(2_999) * 50]
            .into_iter()
            .sum();
        assert_eq!(total.cents(), 1_299_990 + 149_950);
        assert_eq!(total.to_string(), "$14499.40");
    }
}
