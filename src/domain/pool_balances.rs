//! The `(cash, managed)` split of one pool token.

use super::{Amount, Fraction};
use crate::error::{ManagerError, Result};
use crate::math::Rounding;

/// Balances of one token in one pool.
///
/// `cash` is authoritative in the ledger and immediately available for
/// exits; `managed` is authoritative in the asset manager and lives in the
/// investment adapter. Their sum is the pool's total value for the token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PoolBalances {
    cash: Amount,
    managed: Amount,
}

impl PoolBalances {
    /// Creates a new balance pair.
    pub const fn new(cash: Amount, managed: Amount) -> Self {
        Self { cash, managed }
    }

    /// Immediately available balance held by the ledger.
    pub const fn cash(&self) -> Amount {
        self.cash
    }

    /// Balance delegated to the investment adapter.
    pub const fn managed(&self) -> Amount {
        self.managed
    }

    /// `cash + managed`.
    ///
    /// # Errors
    ///
    /// Returns [`ManagerError::Overflow`] if the sum does not fit.
    pub fn total(&self) -> Result<Amount> {
        self.cash
            .checked_add(&self.managed)
            .ok_or(ManagerError::Overflow("pool total balance"))
    }

    /// Share of the total held as cash, rounded down.
    ///
    /// Returns `None` when the pool holds nothing.
    ///
    /// # Errors
    ///
    /// Returns [`ManagerError::Overflow`] if the total does not fit.
    pub fn cash_fraction(&self) -> Result<Option<Fraction>> {
        let total = self.total()?;
        if total.is_zero() {
            return Ok(None);
        }
        Fraction::from_ratio(self.cash, total, Rounding::Down).map(Some)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn total_sums_both_sides() {
        let balances = PoolBalances::new(Amount::new(40), Amount::new(160));
        assert_eq!(balances.total(), Ok(Amount::new(200)));
    }

    #[test]
    fn total_overflow() {
        let balances = PoolBalances::new(Amount::MAX, Amount::new(1));
        let Err(ManagerError::Overflow(_)) = balances.total() else {
            panic!("expected Overflow");
        };
    }

    #[test]
    fn cash_fraction_of_empty_pool_is_none() {
        assert_eq!(PoolBalances::default().cash_fraction(), Ok(None));
    }

    #[test]
    fn cash_fraction_twenty_percent() {
        let balances = PoolBalances::new(Amount::new(40), Amount::new(160));
        assert_eq!(
            balances.cash_fraction(),
            Ok(Some(Fraction::new(200_000_000_000_000_000)))
        );
    }

    #[test]
    fn cash_fraction_all_cash() {
        let balances = PoolBalances::new(Amount::new(200), Amount::ZERO);
        assert_eq!(balances.cash_fraction(), Ok(Some(Fraction::ONE)));
    }
}
