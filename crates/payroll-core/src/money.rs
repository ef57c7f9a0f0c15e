//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely, the
//! `Multiplier` type for premium rate composition, and `ExactPay` — the
//! sub-centavo accumulator behind the crate's single rounding point.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In floating point:                                                     │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  In a payroll system that is an audit finding, not a rounding quirk:   │
//! │    ₱76.71/hr × 1.25 × 0.5h must come out identical on every run        │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Centavos                                         │
//! │    All amounts are i64 centavos; exact intermediate products are i128  │
//! │    fractions, rounded half-up ONCE at the summation boundary           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Rounding Policy (the audit-discrepancy hotspot)
//! Per-segment pay is the exact fraction `base × minutes × multiplier`.
//! Rounding to centavos happens round-half-up at the point of summation
//! into a `total` — never per segment — so rounding error cannot compound
//! across a breakdown. Per-line displayed pay is rounded for display only;
//! totals always come from the exact sum.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use ts_rs::TS;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in centavos (the smallest currency unit).
///
/// ## Design Decisions
/// - **i64 (signed)**: deductions and adjustments can go negative
/// - **Single-field tuple struct**: zero-cost abstraction over i64
/// - **Derives**: full serde support for JSON serialization
///
/// Every monetary value in the pipeline flows through this type:
/// hourly rates, segment pay, contributions, tax, gross and net.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from centavos.
    ///
    /// ## Example
    /// ```rust
    /// use payroll_core::money::Money;
    ///
    /// let rate = Money::from_cents(7671); // ₱76.71
    /// assert_eq!(rate.cents(), 7671);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from whole pesos.
    #[inline]
    pub const fn from_pesos(pesos: i64) -> Self {
        Money(pesos * 100)
    }

    /// Returns the value in centavos.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the whole-peso portion.
    #[inline]
    pub const fn pesos(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the centavo portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Zero money value.
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

    /// Returns the absolute value.
    #[inline]
    pub const fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    /// Clamps the value to be at least zero.
    ///
    /// Used where a floor-at-zero rule applies (e.g. net pay display,
    /// overtime after early-arrival deduction).
    #[inline]
    pub const fn max_zero(&self) -> Self {
        if self.0 < 0 { Money(0) } else { *self }
    }

    /// Applies a rate in basis points with round-half-up.
    ///
    /// ## Implementation
    /// Integer math: `(amount × bps + 5000) / 10000`. The `+5000`
    /// provides the half-up rounding (5000/10000 = 0.5). i128 prevents
    /// overflow on large amounts.
    ///
    /// ## Example
    /// ```rust
    /// use payroll_core::money::Money;
    ///
    /// let salary = Money::from_cents(2_500_000); // ₱25,000.00
    /// let share = salary.apply_rate_bps(450);    // 4.5%
    /// assert_eq!(share.cents(), 112_500);        // ₱1,125.00
    /// ```
    pub fn apply_rate_bps(&self, bps: u32) -> Money {
        let cents = (self.0 as i128 * bps as i128 + 5000) / 10000;
        Money::from_cents(cents as i64)
    }

    /// Returns the smaller of two amounts.
    #[inline]
    pub fn min(self, other: Money) -> Money {
        if self.0 <= other.0 { self } else { other }
    }
}

/// Display implementation shows money in a human-readable format.
///
/// ## Note
/// This is for logs and debugging. Payslip rendering is the frontend's
/// job (localization, thousands separators).
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}₱{}.{:02}", sign, self.pesos().abs(), self.cents_part())
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

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
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
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

// =============================================================================
// Multiplier
// =============================================================================

/// A premium rate multiplier in basis points of 1.0× (10000 = 1.00×).
///
/// ## Why Basis Points?
/// Every statutory multiplier is exact in bps:
/// 12500 = 1.25× (overtime), 13000 = 1.30× (rest day),
/// 16900 = 1.69× (rest-day overtime), 18590 = 1.859× (rest-day OT + ND).
///
/// Stacked combinations are stored as ONE composite table entry, never
/// multiplied together at runtime (see the rates module).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Multiplier(u32);

impl Multiplier {
    /// The identity multiplier (1.00×).
    pub const ONE: Multiplier = Multiplier(10000);

    /// Creates a multiplier from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        Multiplier(bps)
    }

    /// Returns the multiplier in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the multiplier as a factor (for display only).
    #[inline]
    pub fn factor(&self) -> f64 {
        self.0 as f64 / 10000.0
    }

    /// Applies the multiplier to an hourly rate, round-half-up.
    ///
    /// This is the per-line `rate.total` shown on the audit breakdown;
    /// actual pay is computed exactly via [`ExactPay::segment`].
    pub fn apply(&self, base: Money) -> Money {
        base.apply_rate_bps(self.0)
    }
}

impl Default for Multiplier {
    fn default() -> Self {
        Multiplier::ONE
    }
}

impl fmt::Display for Multiplier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}x", self.factor())
    }
}

// =============================================================================
// ExactPay
// =============================================================================

/// Exact pay amount in 1/600000ths of a centavo.
///
/// ## Why This Denominator?
/// Segment pay is `base_cents × minutes × multiplier_bps / (60 × 10000)`.
/// Keeping the numerator as an i128 over the fixed denominator 600000
/// makes every intermediate value exact; centavo rounding happens once,
/// at [`ExactPay::to_money`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct ExactPay(i128);

impl ExactPay {
    /// Numerator units per centavo: 60 minutes × 10000 bps.
    const SCALE: i128 = 600_000;

    /// Zero pay.
    #[inline]
    pub const fn zero() -> Self {
        ExactPay(0)
    }

    /// Exact pay for one worked segment.
    ///
    /// ## Example
    /// ```rust
    /// use payroll_core::money::{ExactPay, Money, Multiplier};
    ///
    /// // ₱76.71/hr × 30 min × 1.25 = ₱47.94375 exactly
    /// let pay = ExactPay::segment(Money::from_cents(7671), 30, Multiplier::from_bps(12500));
    /// assert_eq!(pay.to_money().cents(), 4794); // .375 rounds down
    /// ```
    #[inline]
    pub fn segment(base: Money, minutes: i64, multiplier: Multiplier) -> Self {
        ExactPay(base.cents() as i128 * minutes as i128 * multiplier.bps() as i128)
    }

    /// Lifts an already-rounded amount into exact units.
    #[inline]
    pub fn from_money(money: Money) -> Self {
        ExactPay(money.cents() as i128 * Self::SCALE)
    }

    /// Rounds to centavos, half-up.
    ///
    /// Pay amounts are non-negative by construction; the half-up rule is
    /// therefore the plain `(n + d/2) / d` integer form.
    pub fn to_money(&self) -> Money {
        debug_assert!(self.0 >= 0, "pay amounts are non-negative");
        Money::from_cents(((self.0 + Self::SCALE / 2) / Self::SCALE) as i64)
    }
}

impl Add for ExactPay {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        ExactPay(self.0 + other.0)
    }
}

impl AddAssign for ExactPay {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sum for ExactPay {
    fn sum<I: Iterator<Item = ExactPay>>(iter: I) -> ExactPay {
        iter.fold(ExactPay::zero(), |acc, p| acc + p)
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
        let money = Money::from_cents(7671);
        assert_eq!(money.cents(), 7671);
        assert_eq!(money.pesos(), 76);
        assert_eq!(money.cents_part(), 71);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_cents(7671)), "₱76.71");
        assert_eq!(format!("{}", Money::from_cents(500)), "₱5.00");
        assert_eq!(format!("{}", Money::from_cents(-550)), "-₱5.50");
        assert_eq!(format!("{}", Money::from_cents(0)), "₱0.00");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!((a + b).cents(), 1500);
        assert_eq!((a - b).cents(), 500);
        assert_eq!((a * 3).cents(), 3000);
    }

    #[test]
    fn test_apply_rate_half_up() {
        // ₱10.00 at 8.25% = ₱0.825 → rounds half-up to ₱0.83
        let amount = Money::from_cents(1000);
        assert_eq!(amount.apply_rate_bps(825).cents(), 83);

        // Exact half: ₱1.00 at 0.5% = ₱0.005 → ₱0.01
        assert_eq!(Money::from_cents(100).apply_rate_bps(50).cents(), 1);
    }

    #[test]
    fn test_multiplier_apply() {
        let base = Money::from_cents(7671); // ₱76.71/hr
        let ot = Multiplier::from_bps(12500);
        // 76.71 × 1.25 = 95.8875 → ₱95.89
        assert_eq!(ot.apply(base).cents(), 9589);
        assert_eq!(Multiplier::ONE.apply(base), base);
    }

    #[test]
    fn test_exact_pay_rounds_at_summation_not_per_segment() {
        let base = Money::from_cents(10001); // ₱100.01/hr
        let mult = Multiplier::from_bps(10000);

        // Three 20-minute segments: each is ₱33.336666..., which would
        // round to ₱33.34 per segment (3 × 33.34 = ₱100.02 — off by one).
        let per_segment = ExactPay::segment(base, 20, mult);
        assert_eq!(per_segment.to_money().cents(), 3334);

        // Summed exactly first, the hour comes out to ₱100.01.
        let total: ExactPay = (0..3).map(|_| per_segment).sum();
        assert_eq!(total.to_money().cents(), 10001);
    }

    #[test]
    fn test_exact_pay_half_up_boundary() {
        // 1 cent/hr for 30 min = 0.5 cent → rounds up to 1 cent
        let half = ExactPay::segment(Money::from_cents(1), 30, Multiplier::ONE);
        assert_eq!(half.to_money().cents(), 1);

        // 1 cent/hr for 29 min = 0.4833 cent → rounds down to 0
        let under = ExactPay::segment(Money::from_cents(1), 29, Multiplier::ONE);
        assert_eq!(under.to_money().cents(), 0);
    }

    #[test]
    fn test_max_zero() {
        assert_eq!(Money::from_cents(-100).max_zero(), Money::zero());
        assert_eq!(Money::from_cents(100).max_zero().cents(), 100);
    }
}
