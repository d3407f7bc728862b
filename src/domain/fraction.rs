//! 18-decimal fixed-point fractions.

use core::fmt;

use super::Amount;
use crate::error::{ManagerError, Result};
use crate::math::{mul_div, Rounding};

/// Raw value that represents 100%.
const ONE_RAW: u64 = 1_000_000_000_000_000_000;

/// A fraction in 18-decimal fixed point: `1e18` is 100%.
///
/// All `u64` values are representable, but only `0..=1e18` are meaningful
/// as percentages. Use [`is_valid_percent`](Self::is_valid_percent) to check.
///
/// # Examples
///
/// ```
/// use hydra_asset_manager::domain::{Amount, Fraction};
/// use hydra_asset_manager::math::Rounding;
///
/// let eighty = Fraction::new(800_000_000_000_000_000);
/// let invested = eighty.mul_amount(Amount::new(200), Rounding::Down).expect("no overflow");
/// assert_eq!(invested, Amount::new(160));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Fraction(u64);

impl Fraction {
    /// 0%.
    pub const ZERO: Self = Self(0);

    /// 100%.
    pub const ONE: Self = Self(ONE_RAW);

    /// Creates a `Fraction` from its raw 18-decimal representation.
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw 18-decimal representation.
    #[must_use]
    pub const fn get(&self) -> u64 {
        self.0
    }

    /// Returns `true` if the value lies in `0..=1e18`.
    #[must_use]
    pub const fn is_valid_percent(&self) -> bool {
        self.0 <= ONE_RAW
    }

    /// Computes `numerator / denominator` as a fraction.
    ///
    /// # Errors
    ///
    /// - [`ManagerError::DivisionByZero`] if `denominator` is zero.
    /// - [`ManagerError::Overflow`] if the ratio exceeds the `u64` range.
    pub fn from_ratio(numerator: Amount, denominator: Amount, rounding: Rounding) -> Result<Self> {
        if denominator.is_zero() {
            return Err(ManagerError::DivisionByZero);
        }
        let raw = mul_div(
            numerator.get(),
            u128::from(ONE_RAW),
            denominator.get(),
            rounding,
        )
        .ok_or(ManagerError::Overflow("fraction ratio"))?;
        u64::try_from(raw)
            .map(Self)
            .map_err(|_| ManagerError::Overflow("fraction ratio exceeds range"))
    }

    /// Computes `amount * self / 1e18` with explicit rounding.
    ///
    /// The intermediate product is carried in 256 bits, so only a result
    /// above `u128::MAX` can fail.
    ///
    /// # Errors
    ///
    /// Returns [`ManagerError::Overflow`] if the result does not fit.
    pub fn mul_amount(&self, amount: Amount, rounding: Rounding) -> Result<Amount> {
        mul_div(
            amount.get(),
            u128::from(self.0),
            u128::from(ONE_RAW),
            rounding,
        )
        .map(Amount::new)
        .ok_or(ManagerError::Overflow("fraction multiplication"))
    }
}

impl fmt::Display for Fraction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.0 / ONE_RAW;
        let frac = self.0 % ONE_RAW;
        if frac == 0 {
            return write!(f, "{whole}");
        }
        let digits = format!("{frac:018}");
        write!(f, "{whole}.{}", digits.trim_end_matches('0'))
    }
}
