//! Rounding direction and rounded integer division.
//!
//! Every division in the crate names its rounding direction. The
//! convention is to round in favour of the pool:
//!
//! | Quantity | Direction |
//! |----------|-----------|
//! | Target investment (`total × target`) | [`Rounding::Down`] |
//! | Cash fraction used for the band check | [`Rounding::Down`] |
//! | Shares redeemed to cover a withdrawal | [`Rounding::Up`] |
//! | Shares minted / value of shares in an adapter | [`Rounding::Down`] |

use alloy_primitives::U256;

/// Rounding direction for division.
///
/// # Examples
///
/// ```
/// use hydra_asset_manager::math::Rounding;
///
/// assert!(Rounding::Up.is_up());
/// assert!(Rounding::Down.is_down());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rounding {
    /// Round towards positive infinity (ceiling).
    Up,
    /// Round towards zero (floor).
    Down,
}

impl Rounding {
    /// Returns `true` if this is [`Rounding::Up`].
    #[must_use]
    pub const fn is_up(&self) -> bool {
        matches!(self, Self::Up)
    }

    /// Returns `true` if this is [`Rounding::Down`].
    #[must_use]
    pub const fn is_down(&self) -> bool {
        matches!(self, Self::Down)
    }
}

/// Integer division of `u128` values with explicit rounding direction.
///
/// Returns [`None`] if `denominator` is zero.
///
/// # Examples
///
/// ```
/// use hydra_asset_manager::math::{div_round, Rounding};
///
/// assert_eq!(div_round(7, 2, Rounding::Down), Some(3));
/// assert_eq!(div_round(7, 2, Rounding::Up), Some(4));
/// assert_eq!(div_round(10, 0, Rounding::Down), None);
/// ```
#[must_use]
pub const fn div_round(numerator: u128, denominator: u128, rounding: Rounding) -> Option<u128> {
    if denominator == 0 {
        return None;
    }
    let q = numerator / denominator;
    match rounding {
        Rounding::Down => Some(q),
        // q + 1 cannot overflow: a non-zero remainder implies q < u128::MAX.
        Rounding::Up if numerator % denominator != 0 => Some(q + 1),
        Rounding::Up => Some(q),
    }
}

/// Computes `a × b / denominator` with a 256-bit intermediate product.
///
/// Returns [`None`] if `denominator` is zero or the quotient does not fit
/// in a `u128`.
///
/// # Examples
///
/// ```
/// use hydra_asset_manager::math::{mul_div, Rounding};
///
/// // 80% of u128::MAX without overflowing the intermediate product.
/// let one = 1_000_000_000_000_000_000u128;
/// let eighty = 800_000_000_000_000_000u128;
/// assert!(mul_div(u128::MAX, eighty, one, Rounding::Down).is_some());
/// assert_eq!(mul_div(10, 1, 3, Rounding::Up), Some(4));
/// ```
#[must_use]
pub fn mul_div(a: u128, b: u128, denominator: u128, rounding: Rounding) -> Option<u128> {
    if denominator == 0 {
        return None;
    }
    let product = U256::from(a) * U256::from(b);
    let divisor = U256::from(denominator);
    let mut quotient = product / divisor;
    if rounding.is_up() && !(product % divisor).is_zero() {
        quotient += U256::from(1u8);
    }
    u128::try_from(quotient).ok()
}
