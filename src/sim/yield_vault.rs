//! Share-based yield vault with an optional reward stream.

use std::collections::HashMap;
use std::rc::Rc;

use tracing::trace;

use super::TokenBank;
use crate::domain::{Address, Amount};
use crate::error::{ManagerError, Result};
use crate::math::{mul_div, CheckedArithmetic, Rounding};
use crate::traits::{InvestmentAdapter, RewardSource, TokenLedger, Transactional};
use crate::unit_of_work::{UnitOfWork, Versioned};

#[derive(Debug, Clone, Default)]
struct VaultShares {
    balances: HashMap<Address, Amount>,
    supply: Amount,
    accrued_rewards: HashMap<Address, Amount>,
}

/// Vault whose share price rises as yield accrues.
///
/// Assets are the underlying tokens the vault holds in the [`TokenBank`].
/// The first deposit mints shares 1:1; later deposits mint
/// `amount * supply / assets` rounded down, and [`value_of`] converts back
/// with `shares * assets / supply`, also rounded down, so the vault never
/// owes more than it holds.
///
/// [`value_of`]: InvestmentAdapter::value_of
#[derive(Debug)]
pub struct YieldVaultAdapter {
    address: Address,
    underlying: Address,
    reward_token: Option<Address>,
    bank: Rc<TokenBank>,
    shares: Versioned<VaultShares>,
}

impl YieldVaultAdapter {
    /// Creates a vault for `underlying` without rewards.
    #[must_use]
    pub fn new(
        uow: &Rc<UnitOfWork>,
        bank: Rc<TokenBank>,
        address: Address,
        underlying: Address,
    ) -> Rc<Self> {
        Self::build(uow, bank, address, underlying, None)
    }

    /// Creates a vault that also pays incentive rewards in `reward_token`.
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
        let vault = Rc::new(Self {
            address,
            underlying,
            reward_token,
            bank,
            shares: Versioned::default(),
        });
        uow.enlist(&vault);
        vault
    }

    /// Underlying tokens held by the vault.
    #[must_use]
    pub fn total_assets(&self) -> Amount {
        self.bank.balance_of(self.underlying, self.address)
    }

    /// Outstanding shares.
    #[must_use]
    pub fn total_supply(&self) -> Amount {
        self.shares.read(|s| s.supply)
    }

    /// Simulates strategy profit by growing the vault's assets.
    ///
    /// # Errors
    ///
    /// Returns [`ManagerError::Overflow`] if the vault balance overflows.
    pub fn accrue_yield(&self, amount: Amount) -> Result<()> {
        self.bank.mint(self.underlying, self.address, amount)
    }

    /// Accrues `amount` reward tokens for `holder`, claimable through
    /// [`RewardSource::harvest`].
    ///
    /// # Errors
    ///
    /// - [`ManagerError::InvalidArgument`] if the vault pays no rewards.
    /// - [`ManagerError::Overflow`] on balance overflow.
    pub fn accrue_rewards(&self, holder: Address, amount: Amount) -> Result<()> {
        let Some(reward_token) = self.reward_token else {
            return Err(ManagerError::InvalidArgument("vault pays no rewards"));
        };
        self.bank.mint(reward_token, self.address, amount)?;
        self.shares.update(|s| {
            let entry = s.accrued_rewards.entry(holder).or_insert(Amount::ZERO);
            *entry = entry.safe_add(&amount)?;
            Ok(())
        })
    }

    fn shares_for_deposit(&self, amount: Amount) -> Result<Amount> {
        let supply = self.total_supply();
        let assets = self.total_assets();
        if supply.is_zero() || assets.is_zero() {
            return Ok(amount);
        }
        mul_div(amount.get(), supply.get(), assets.get(), Rounding::Down)
            .map(Amount::new)
            .ok_or(ManagerError::Overflow("vault share conversion"))
    }
}

impl InvestmentAdapter for YieldVaultAdapter {
    fn address(&self) -> Address {
        self.address
    }

    fn underlying(&self) -> Address {
        self.underlying
    }

    fn deposit(&self, depositor: Address, amount: Amount) -> Result<Amount> {
        if amount.is_zero() {
            return Err(ManagerError::InvalidArgument("deposit amount must be positive"));
        }
        let minted = self.shares_for_deposit(amount)?;
        if minted.is_zero() {
            return Err(ManagerError::InvalidArgument("deposit too small to mint shares"));
        }
        self.bank
            .transfer(self.underlying, depositor, self.address, amount)?;
        self.shares.update(|s| {
            let balance = s.balances.entry(depositor).or_insert(Amount::ZERO);
            *balance = balance.safe_add(&minted)?;
            s.supply = s.supply.safe_add(&minted)?;
            Ok::<_, ManagerError>(())
        })?;
        trace!(%depositor, %amount, %minted, "vault deposit");
        Ok(minted)
    }

    fn preview_deposit(&self, amount: Amount) -> Result<Amount> {
        self.shares_for_deposit(amount)
    }

    fn redeem(&self, holder: Address, shares: Amount) -> Result<Amount> {
        let held = self.share_balance(holder);
        if shares > held {
            return Err(ManagerError::InsufficientBalance {
                token: self.address,
                holder,
                needed: shares,
                available: held,
            });
        }
        let amount = self.value_of(shares)?;
        self.shares.update(|s| {
            s.balances.insert(holder, held.safe_sub(&shares)?);
            s.supply = s.supply.safe_sub(&shares)?;
            Ok::<_, ManagerError>(())
        })?;
        self.bank
            .transfer(self.underlying, self.address, holder, amount)?;
        trace!(%holder, %shares, %amount, "vault redeem");
        Ok(amount)
    }

    fn share_balance(&self, holder: Address) -> Amount {
        self.shares
            .read(|s| s.balances.get(&holder).copied().unwrap_or(Amount::ZERO))
    }

    fn value_of(&self, shares: Amount) -> Result<Amount> {
        let supply = self.total_supply();
        if supply.is_zero() {
            return Ok(Amount::ZERO);
        }
        mul_div(
            shares.get(),
            self.total_assets().get(),
            supply.get(),
            Rounding::Down,
        )
        .map(Amount::new)
        .ok_or(ManagerError::Overflow("vault share value"))
    }

    fn reward_source(&self) -> Option<&dyn RewardSource> {
        self.reward_token.map(|_| self as &dyn RewardSource)
    }
}

impl RewardSource for YieldVaultAdapter {
    fn reward_token(&self) -> Address {
        self.reward_token.unwrap_or_default()
    }

    fn harvest(&self, holder: Address) -> Result<Amount> {
        let Some(reward_token) = self.reward_token else {
            return Ok(Amount::ZERO);
        };
        let owed = self
            .shares
            .update(|s| s.accrued_rewards.remove(&holder).unwrap_or(Amount::ZERO));
        if owed.is_zero() {
            return Ok(Amount::ZERO);
        }
        self.bank
            .transfer(reward_token, self.address, holder, owed)?;
        Ok(owed)
    }
}

impl Transactional for YieldVaultAdapter {
    fn begin(&self) {
        self.shares.begin();
    }

    fn commit(&self) {
        self.shares.commit();
    }

    fn rollback(&self) {
        self.shares.rollback();
    }
}
