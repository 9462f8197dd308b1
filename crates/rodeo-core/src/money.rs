//! # Money Module
//!
//! Provides the `Money` type for won amounts.
//!
//! ## Why Integer Won?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE ALLOCATION PROBLEM                                                 │
//! │                                                                         │
//! │  The cashier types ONE total for the whole transaction:                 │
//! │    10,000원 for 3 items                                                 │
//! │                                                                         │
//! │  Splitting it by quantity with floats:                                  │
//! │    10000 × (1/3) = 3333.3333...  → rounding depends on float noise      │
//! │                                                                         │
//! │  OUR SOLUTION: Integer won + exact half-up rounding                     │
//! │    (2 × 10000 × 1 + 3) / (2 × 3) = 3333                                 │
//! │    Same answer on every machine, every time                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use rodeo_core::money::Money;
//!
//! let total = Money::from_won(1_000);
//! assert_eq!(total.share_of(2, 5).won(), 400);
//! assert_eq!(total.to_string(), "1,000원");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub};
use ts_rs::TS;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in won (KRW has no minor unit).
///
/// ## Where Money is Used
/// ```text
/// Product.price ──► shown in inventory lists
///
/// Draft.total_amount ──► Settlement ──► item_total / price_per_unit
///                                           │
///                                           ▼
///                                   POST /api/sales
/// ```
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from whole won.
    #[inline]
    pub const fn from_won(won: i64) -> Self {
        Money(won)
    }

    /// Returns the value in won.
    #[inline]
    pub const fn won(&self) -> i64 {
        self.0
    }

    /// Returns zero won.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Multiplies by a quantity.
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }

    /// Returns `self × part / whole`, rounded half-up.
    ///
    /// This is the proportional share used by settlement: an item holding
    /// `part` of `whole` units gets this much of the total.
    ///
    /// A `whole` of zero yields zero.
    ///
    /// ## Example
    /// ```rust
    /// use rodeo_core::money::Money;
    ///
    /// let total = Money::from_won(1_000);
    /// assert_eq!(total.share_of(1, 3).won(), 333);
    /// assert_eq!(total.share_of(2, 3).won(), 667);
    /// assert_eq!(Money::from_won(1).share_of(1, 2).won(), 1); // 0.5 rounds up
    /// ```
    pub fn share_of(&self, part: i64, whole: i64) -> Money {
        if whole == 0 {
            return Money::zero();
        }
        Money(div_round_half_up(self.0 as i128 * part as i128, whole as i128) as i64)
    }

    /// Returns the per-unit price for `qty` units, rounded half-up.
    ///
    /// ## Example
    /// ```rust
    /// use rodeo_core::money::Money;
    ///
    /// assert_eq!(Money::from_won(1_000).per_unit(3).won(), 333);
    /// assert_eq!(Money::from_won(1_001).per_unit(2).won(), 501);
    /// ```
    pub fn per_unit(&self, qty: i64) -> Money {
        self.share_of(1, qty)
    }
}

/// Integer division rounding half toward positive infinity.
///
/// Matches `floor(n / d + 0.5)` exactly, for any sign of `n` and `d`.
fn div_round_half_up(n: i128, d: i128) -> i128 {
    let (n, d) = if d < 0 { (-n, -d) } else { (n, d) };
    (2 * n + d).div_euclid(2 * d)
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Shows the amount with thousands separators, e.g. `12,500원`.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = self.0.unsigned_abs().to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(ch);
        }
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}원", sign, grouped)
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + *m)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_groups_thousands() {
        assert_eq!(Money::from_won(0).to_string(), "0원");
        assert_eq!(Money::from_won(999).to_string(), "999원");
        assert_eq!(Money::from_won(1_000).to_string(), "1,000원");
        assert_eq!(Money::from_won(1_234_567).to_string(), "1,234,567원");
        assert_eq!(Money::from_won(-12_500).to_string(), "-12,500원");
    }

    #[test]
    fn test_share_of_exact_split() {
        let total = Money::from_won(1_000);
        assert_eq!(total.share_of(2, 5).won(), 400);
        assert_eq!(total.share_of(3, 5).won(), 600);
    }

    #[test]
    fn test_share_of_rounds_half_up() {
        // 5 × 1/2 = 2.5 → 3
        assert_eq!(Money::from_won(5).share_of(1, 2).won(), 3);
        // 1000 × 1/3 = 333.33 → 333
        assert_eq!(Money::from_won(1_000).share_of(1, 3).won(), 333);
        // 1000 × 2/3 = 666.67 → 667
        assert_eq!(Money::from_won(1_000).share_of(2, 3).won(), 667);
    }

    #[test]
    fn test_share_of_zero_whole() {
        assert_eq!(Money::from_won(1_000).share_of(1, 0), Money::zero());
    }

    #[test]
    fn test_half_up_on_negative_values() {
        // floor(-2.5 + 0.5) = -2
        assert_eq!(div_round_half_up(-5, 2), -2);
        assert_eq!(div_round_half_up(5, -2), -2);
        assert_eq!(div_round_half_up(-7, 2), -3);
    }

    #[test]
    fn test_sum_and_arithmetic() {
        let amounts = [Money::from_won(400), Money::from_won(600)];
        let total: Money = amounts.iter().sum();
        assert_eq!(total.won(), 1_000);
        assert_eq!((total - Money::from_won(1)).won(), 999);
        assert_eq!((Money::from_won(250) * 4).won(), 1_000);
        assert!(total.is_positive());
        assert!(Money::zero().is_zero());
    }

    #[test]
    fn test_serializes_as_plain_number() {
        let json = serde_json::to_string(&Money::from_won(15_000)).unwrap();
        assert_eq!(json, "15000");
    }
}
