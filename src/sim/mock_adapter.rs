//! 1:1 adapter with injectable faults.

use std::cell::Cell;
use std::collections::HashMap;
use std::rc::Rc;

use super::TokenBank;
use crate::domain::{Address, Amount};
use crate::error::{ManagerError, Result};
use crate::math::CheckedArithmetic;
use crate::traits::{InvestmentAdapter, RewardSource, TokenLedger, Transactional};
use crate::unit_of_work::{UnitOfWork, Versioned};

/// Misbehaviour a [`MockAdapter`] can be told to exhibit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdapterFault {
    /// Takes the tokens on deposit but mints no shares, while still
    /// reporting a full mint.
    SkipShareMint,
    /// Pays this many tokens less than owed on redeem, while still
    /// reporting a full payout.
    ShortRedeem(Amount),
    /// Rejects every deposit.
    FailDeposit,
}

#[derive(Debug, Clone, Default)]
struct MockState {
    shares: HashMap<Address, Amount>,
    accrued_rewards: HashMap<Address, Amount>,
}

/// Adapter where one share is always worth one token.
///
/// The fault switch is test configuration, not adapter state, so it is
/// not restored by a rolled-back unit of work.
#[derive(Debug)]
pub struct MockAdapter {
    address: Address,
    underlying: Address,
    reward_token: Option<Address>,
    bank: Rc<TokenBank>,
    fault: Cell<Option<AdapterFault>>,
    state: Versioned<MockState>,
}

impl MockAdapter {
    /// Creates a well-behaved adapter.
    #[must_use]
    pub fn new(
        uow: &Rc<UnitOfWork>,
        bank: Rc<TokenBank>,
        address: Address,
        underlying: Address,
    ) -> Rc<Self> {
        Self::build(uow, bank, address, underlying, None)
    }

    /// Creates an adapter that also pays rewards in `reward_token`.
    #[must_use]
    pub fn with_rewards(
        uow: &Rc<UnitOfWork>,
        bank: Rc<TokenBank>,
        address: Address,
        underlying: Address,
        reward_token: Address,
    ) -> Rc<Self> {
        Self::build(uow, bank, address, underlying, Some(reward_token))
    }

    fn build(
        uow: &Rc<UnitOfWork>,
        bank: Rc<TokenBank>,
        address: Address,
        underlying: Address,
        reward_token: Option<Address>,
    ) -> Rc<Self> {
        let adapter = Rc::new(Self {
            address,
            underlying,
            reward_token,
            bank,
            fault: Cell::new(None),
            state: Versioned::default(),
        });
        uow.enlist(&adapter);
        adapter
    }

    /// Switches fault injection on (`Some`) or off (`None`).
    pub fn set_fault(&self, fault: Option<AdapterFault>) {
        self.fault.set(fault);
    }

    /// Accrues `amount` reward tokens for `holder`.
    ///
    /// # Errors
    ///
    /// - [`ManagerError::InvalidArgument`] if the adapter pays no rewards.
    /// - [`ManagerError::Overflow`] on balance overflow.
    pub fn accrue_rewards(&self, holder: Address, amount: Amount) -> Result<()> {
        let Some(reward_token) = self.reward_token else {
            return Err(ManagerError::InvalidArgument("adapter pays no rewards"));
        };
        self.bank.mint(reward_token, self.address, amount)?;
        self.state.update(|s| {
            let entry = s.accrued_rewards.entry(holder).or_insert(Amount::ZERO);
            *entry = entry.safe_add(&amount)?;
            Ok(())
        })
    }
}

impl InvestmentAdapter for MockAdapter {
    fn address(&self) -> Address {
        self.address
    }

    fn underlying(&self) -> Address {
        self.underlying
    }

    fn deposit(&self, depositor: Address, amount: Amount) -> Result<Amount> {
        let fault = self.fault.get();
        if fault == Some(AdapterFault::FailDeposit) {
            return Err(ManagerError::InvalidArgument("deposit rejected by adapter"));
        }
        self.bank
            .transfer(self.underlying, depositor, self.address, amount)?;
        if fault != Some(AdapterFault::SkipShareMint) {
            self.state.update(|s| {
                let balance = s.shares.entry(depositor).or_insert(Amount::ZERO);
                *balance = balance.safe_add(&amount)?;
                Ok::<_, ManagerError>(())
            })?;
        }
        Ok(amount)
    }

    fn preview_deposit(&self, amount: Amount) -> Result<Amount> {
        Ok(amount)
    }

    fn redeem(&self, holder: Address, shares: Amount) -> Result<Amount> {
        let held = self.share_balance(holder);
        let Some(remaining) = held.checked_sub(&shares) else {
            return Err(ManagerError::InsufficientBalance {
                token: self.address,
                holder,
                needed: shares,
                available: held,
            });
        };
        self.state.update(|s| s.shares.insert(holder, remaining));
        let paid = match self.fault.get() {
            Some(AdapterFault::ShortRedeem(short)) => shares.excess_over(&short),
            _ => shares,
        };
        self.bank
            .transfer(self.underlying, self.address, holder, paid)?;
        Ok(shares)
    }

    fn share_balance(&self, holder: Address) -> Amount {
        self.state
            .read(|s| s.shares.get(&holder).copied().unwrap_or(Amount::ZERO))
    }

    fn value_of(&self, shares: Amount) -> Result<Amount> {
        Ok(shares)
    }

    fn reward_source(&self) -> Option<&dyn RewardSource> {
        self.reward_token.map(|_| self as &dyn RewardSource)
    }
}

impl RewardSource for MockAdapter {
    fn reward_token(&self) -> Address {
        self.reward_token.unwrap_or_default()
    }

    fn harvest(&self, holder: Address) -> Result<Amount> {
        let Some(reward_token) = self.reward_token else {
            return Ok(Amount::ZERO);
        };
        let owed = self
            .state
            .update(|s| s.accrued_rewards.remove(&holder).unwrap_or(Amount::ZERO));
        if !owed.is_zero() {
            self.bank
                .transfer(reward_token, self.address, holder, owed)?;
        }
        Ok(owed)
    }
}

impl Transactional for MockAdapter {
    fn begin(&self) {
        self.state.begin();
    }

    fn commit(&self) {
        self.state.commit();
    }

    fn rollback(&self) {
        self.state.rollback();
    }
}
