//! # Money Module
//!
//! Provides the `Money` type for rupee amounts.
//!
//! ## Why Integer Paise?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In floating point:                                                     │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Paise (1 rupee = 100 paise)                      │
//! │    Menu prices are whole rupees, sums are exact, and the single        │
//! │    rounding step (order total → whole rupee) is explicit.              │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use annabill_core::money::Money;
//!
//! let price = Money::from_rupees(180);
//! let doubled = price * 2u32;
//! assert_eq!(doubled.rupees(), 360);
//! assert_eq!(doubled.to_string(), "₹360");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub};
use ts_rs::TS;

use crate::CURRENCY_SYMBOL;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in paise (the smallest rupee unit).
///
/// ## Where Money is Used
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  MenuItem.full_price ──► OrderLine.base_price ──► line_total            │
/// │  AddOnDefinition.price ──► OrderLineAddOn.price ──┘                     │
/// │                                                                         │
/// │  Σ line_total ──► Order.subtotal ──► round_to_rupee ──► Order.total    │
/// │                                                                         │
/// │  Displayed everywhere as "₹200" (whole rupees, no decimals)            │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from paise.
    ///
    /// ## Example
    /// ```rust
    /// use annabill_core::money::Money;
    ///
    /// let price = Money::from_paise(18050); // ₹180.50
    /// assert_eq!(price.paise(), 18050);
    /// ```
    #[inline]
    pub const fn from_paise(paise: i64) -> Self {
        Money(paise)
    }

    /// Creates a Money value from whole rupees.
    ///
    /// Menu prices are configured in whole rupees.
    #[inline]
    pub const fn from_rupees(rupees: i64) -> Self {
        Money(rupees * 100)
    }

    /// Returns the value in paise.
    #[inline]
    pub const fn paise(&self) -> i64 {
        self.0
    }

    /// Returns the whole-rupee part, truncated toward zero.
    ///
    /// Use [`Money::round_to_rupee`] first when the amount may carry paise.
    #[inline]
    pub const fn rupees(&self) -> i64 {
        self.0 / 100
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Rounds to the nearest whole rupee, halves rounding up.
    ///
    /// ## Rounding Rule
    /// ```text
    /// ┌─────────────────────────────────────────────────────────────────────┐
    /// │  ROUND HALF UP (toward +∞)                                          │
    /// │                                                                     │
    /// │    ₹199.49 → ₹199      ₹199.50 → ₹200      ₹199.51 → ₹200          │
    /// │   -₹0.50  → ₹0        -₹0.51  → -₹1                                │
    /// │                                                                     │
    /// │  This is the only place an order amount is ever rounded.           │
    /// └─────────────────────────────────────────────────────────────────────┘
    /// ```
    ///
    /// ## Example
    /// ```rust
    /// use annabill_core::money::Money;
    ///
    /// assert_eq!(Money::from_paise(19950).round_to_rupee(), Money::from_rupees(200));
    /// assert_eq!(Money::from_paise(19949).round_to_rupee(), Money::from_rupees(199));
    /// ```
    pub const fn round_to_rupee(&self) -> Money {
        Money((self.0 + 50).div_euclid(100) * 100)
    }

    /// Multiplies money by a quantity.
    #[inline]
    pub const fn multiply_quantity(&self, qty: u32) -> Self {
        Money(self.0 * qty as i64)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display shows the amount the way it is printed: `₹` and whole rupees.
///
/// Amounts carrying paise are rounded half up before display.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rupees = self.round_to_rupee().rupees();
        if rupees < 0 {
            write!(f, "-{}{}", CURRENCY_SYMBOL, rupees.abs())
        } else {
            write!(f, "{}{}", CURRENCY_SYMBOL, rupees)
        }
    }
}

/// Default money is zero.
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

/// Multiplication by a line or add-on quantity.
impl Mul<u32> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: u32) -> Self {
        self.multiply_quantity(qty)
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
        iter.fold(Money::zero(), Add::add)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
