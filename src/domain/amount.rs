//! Raw token amounts with checked arithmetic.

use core::fmt;

use crate::error::{ManagerError, Result};
use crate::math::{div_round, Rounding};

/// A raw token amount in the smallest unit of the token.
///
/// `Amount` never interprets decimals. All `u128` values are valid amounts.
/// Arithmetic is checked: the `checked_*` methods return `None` on
/// overflow, underflow, or division by zero instead of panicking.
///
/// # Examples
///
/// ```
/// use hydra_asset_manager::domain::Amount;
///
/// let cash = Amount::new(40);
/// let managed = Amount::new(160);
/// assert_eq!(cash.checked_add(&managed), Some(Amount::new(200)));
/// assert_eq!(cash.checked_sub(&managed), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
#[must_use]
pub struct Amount(u128);

impl Amount {
    /// Zero amount.
    pub const ZERO: Self = Self(0);

    /// Maximum representable amount.
    pub const MAX: Self = Self(u128::MAX);

    /// Creates a new `Amount` from a raw `u128` value.
    pub const fn new(value: u128) -> Self {
        Self(value)
    }

    /// Returns the underlying `u128` value.
    #[must_use]
    pub const fn get(&self) -> u128 {
        self.0
    }

    /// Returns `true` if the amount is zero.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checked addition. Returns `None` on overflow.
    #[must_use]
    pub const fn checked_add(&self, other: &Self) -> Option<Self> {
        match self.0.checked_add(other.0) {
            Some(v) => Some(Self(v)),
            None => None,
        }
    }

    /// Checked subtraction. Returns `None` on underflow.
    #[must_use]
    pub const fn checked_sub(&self, other: &Self) -> Option<Self> {
        match self.0.checked_sub(other.0) {
            Some(v) => Some(Self(v)),
            None => None,
        }
    }

    /// Checked multiplication. Returns `None` on overflow.
    #[must_use]
    pub const fn checked_mul(&self, other: &Self) -> Option<Self> {
        match self.0.checked_mul(other.0) {
            Some(v) => Some(Self(v)),
            None => None,
        }
    }

    /// Checked division with explicit rounding direction.
    ///
    /// Returns `None` if `divisor` is zero.
    #[must_use]
    pub const fn checked_div(&self, divisor: &Self, rounding: Rounding) -> Option<Self> {
        match div_round(self.0, divisor.0, rounding) {
            Some(v) => Some(Self(v)),
            None => None,
        }
    }

    /// Returns the difference `self - other` if `self` is larger, zero otherwise.
    pub const fn excess_over(&self, other: &Self) -> Self {
        Self(self.0.saturating_sub(other.0))
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A signed difference between two amounts.
///
/// Produced by [`AssetManager::max_investable_balance`]: a positive value is
/// the amount still investable, a negative value is the amount the manager
/// holds above its target and should divest.
///
/// [`AssetManager::max_investable_balance`]: crate::manager::AssetManager::max_investable_balance
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
#[must_use]
pub struct SignedAmount(i128);

impl SignedAmount {
    /// Zero difference.
    pub const ZERO: Self = Self(0);

    /// Creates a `SignedAmount` from a raw `i128` value.
    pub const fn new(value: i128) -> Self {
        Self(value)
    }

    /// Computes `minuend - subtrahend`.
    ///
    /// # Errors
    ///
    /// Returns [`ManagerError::Overflow`] if either operand or the
    /// difference does not fit in an `i128`.
    pub fn difference(minuend: Amount, subtrahend: Amount) -> Result<Self> {
        let lhs = i128::try_from(minuend.get())
            .map_err(|_| ManagerError::Overflow("signed amount minuend"))?;
        let rhs = i128::try_from(subtrahend.get())
            .map_err(|_| ManagerError::Overflow("signed amount subtrahend"))?;
        lhs.checked_sub(rhs)
            .map(Self)
            .ok_or(ManagerError::Overflow("signed amount difference"))
    }

    /// Returns the underlying `i128` value.
    #[must_use]
    pub const fn get(&self) -> i128 {
        self.0
    }

    /// Returns `true` if the difference is below zero.
    #[must_use]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Returns `true` if the difference is above zero.
    #[must_use]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Returns `true` if the difference is exactly zero.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Magnitude of the difference as an unsigned amount.
    pub const fn magnitude(&self) -> Amount {
        Amount::new(self.0.unsigned_abs())
    }
}

impl fmt::Display for SignedAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
