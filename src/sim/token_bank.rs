//! Multi-token balance sheet.

use std::collections::HashMap;
use std::rc::Rc;

use crate::domain::{Address, Amount};
use crate::error::{ManagerError, Result};
use crate::math::CheckedArithmetic;
use crate::traits::{TokenLedger, Transactional};
use crate::unit_of_work::{UnitOfWork, Versioned};

type Balances = HashMap<(Address, Address), Amount>;

/// In-memory fungible token ledger keyed by `(token, holder)`.
///
/// # Examples
///
/// ```
/// use hydra_asset_manager::domain::{Address, Amount};
/// use hydra_asset_manager::sim::TokenBank;
/// use hydra_asset_manager::traits::TokenLedger;
/// use hydra_asset_manager::unit_of_work::UnitOfWork;
///
/// let uow = UnitOfWork::new();
/// let bank = TokenBank::new(&uow);
/// let (dai, alice, bob) = (Address::repeat_byte(1), Address::repeat_byte(2), Address::repeat_byte(3));
///
/// bank.mint(dai, alice, Amount::new(100)).expect("mint");
/// bank.transfer(dai, alice, bob, Amount::new(30)).expect("transfer");
/// assert_eq!(bank.balance_of(dai, bob), Amount::new(30));
/// ```
#[derive(Debug, Default)]
pub struct TokenBank {
    balances: Versioned<Balances>,
}

impl TokenBank {
    /// Creates an empty bank enlisted in `uow`.
    #[must_use]
    pub fn new(uow: &Rc<UnitOfWork>) -> Rc<Self> {
        let bank = Rc::new(Self::default());
        uow.enlist(&bank);
        bank
    }

    /// Creates `amount` new tokens for `to`.
    ///
    /// # Errors
    ///
    /// Returns [`ManagerError::Overflow`] if the balance would overflow.
    pub fn mint(&self, token: Address, to: Address, amount: Amount) -> Result<()> {
        self.balances.update(|balances| {
            let entry = balances.entry((token, to)).or_insert(Amount::ZERO);
            *entry = entry.safe_add(&amount)?;
            Ok(())
        })
    }
}

impl TokenLedger for TokenBank {
    fn balance_of(&self, token: Address, holder: Address) -> Amount {
        self.balances
            .read(|balances| balances.get(&(token, holder)).copied().unwrap_or(Amount::ZERO))
    }

    fn transfer(&self, token: Address, from: Address, to: Address, amount: Amount) -> Result<()> {
        self.balances.update(|balances| {
            let available = balances.get(&(token, from)).copied().unwrap_or(Amount::ZERO);
            let Some(remaining) = available.checked_sub(&amount) else {
                return Err(ManagerError::InsufficientBalance {
                    token,
                    holder: from,
                    needed: amount,
                    available,
                });
            };
            if from == to || amount.is_zero() {
                return Ok(());
            }
            let credited = balances
                .get(&(token, to))
                .copied()
                .unwrap_or(Amount::ZERO)
                .safe_add(&amount)?;
            balances.insert((token, from), remaining);
            balances.insert((token, to), credited);
            Ok(())
        })
    }
}

impl Transactional for TokenBank {
    fn begin(&self) {
        self.balances.begin();
    }

    fn commit(&self) {
        self.balances.commit();
    }

    fn rollback(&self) {
        self.balances.rollback();
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    const DAI: Address = Address::repeat_byte(0xd1);
    const ALICE: Address = Address::repeat_byte(0xa1);
    const BOB: Address = Address::repeat_byte(0xb0);

    fn funded() -> (Rc<UnitOfWork>, Rc<TokenBank>) {
        let uow = UnitOfWork::new();
        let bank = TokenBank::new(&uow);
        let Ok(()) = bank.mint(DAI, ALICE, Amount::new(100)) else {
            panic!("expected Ok");
        };
        (uow, bank)
    }

    #[test]
    fn unknown_holder_has_zero() {
        let (_uow, bank) = funded();
        assert_eq!(bank.balance_of(DAI, BOB), Amount::ZERO);
    }

    #[test]
    fn transfer_moves_balance() {
        let (_uow, bank) = funded();
        assert!(bank.transfer(DAI, ALICE, BOB, Amount::new(40)).is_ok());
        assert_eq!(bank.balance_of(DAI, ALICE), Amount::new(60));
        assert_eq!(bank.balance_of(DAI, BOB), Amount::new(40));
    }

    #[test]
    fn overdraft_is_rejected() {
        let (_uow, bank) = funded();
        let Err(ManagerError::InsufficientBalance {
            needed, available, ..
        }) = bank.transfer(DAI, ALICE, BOB, Amount::new(101))
        else {
            panic!("expected InsufficientBalance");
        };
        assert_eq!(needed, Amount::new(101));
        assert_eq!(available, Amount::new(100));
        assert_eq!(bank.balance_of(DAI, ALICE), Amount::new(100));
    }

    #[test]
    fn self_transfer_keeps_balance() {
        let (_uow, bank) = funded();
        assert!(bank.transfer(DAI, ALICE, ALICE, Amount::new(100)).is_ok());
        assert_eq!(bank.balance_of(DAI, ALICE), Amount::new(100));
    }

    #[test]
    fn failed_scope_restores_balances() {
        let (uow, bank) = funded();
        let result: Result<()> = uow.run(|| {
            bank.transfer(DAI, ALICE, BOB, Amount::new(50))?;
            bank.transfer(DAI, ALICE, BOB, Amount::new(51))
        });
        assert!(result.is_err());
        assert_eq!(bank.balance_of(DAI, ALICE), Amount::new(100));
        assert_eq!(bank.balance_of(DAI, BOB), Amount::ZERO);
    }
}
