//! The rebalancing engine for one pool token.

use std::collections::HashSet;
use std::rc::Rc;

use tracing::{debug, info, warn};

use crate::config::{ConfigBlob, ConfigStore, InvestmentConfig};
use crate::domain::{Address, Amount, CallContext, PoolBalances, PoolId, SignedAmount};
use crate::error::{ManagerError, Result};
use crate::math::Rounding;
use crate::traits::{
    AssetManagerHooks, InvestmentAdapter, Ledger, PoolBalanceOp, TokenLedger, Transactional,
};
use crate::unit_of_work::{UnitOfWork, Versioned};

/// Binding state of an [`AssetManager`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Lifecycle {
    /// Constructed but not yet bound to a pool.
    #[default]
    Uninitialized,
    /// Bound to `pool_id` for the rest of its life.
    Active {
        /// The pool this manager serves.
        pool_id: PoolId,
    },
}

#[derive(Debug, Clone, Default)]
pub(super) struct ManagerState {
    lifecycle: Lifecycle,
    configs: ConfigStore,
}

/// Keeps a target share of one pool token invested in an adapter.
///
/// The manager owns the managed side of the pool's `(cash, managed)` pair:
/// the managed balance is always the live value of the adapter shares it
/// holds. [`rebalance`](Self::rebalance) moves capital toward
/// `total * target` whenever the cash share leaves the critical band, and
/// [`capital_out`](Self::capital_out) lets the ledger or relayer pull
/// capital back ahead of an exit.
///
/// The adapter is untrusted. After every deposit the share balance must
/// have grown, and after every redemption the token balance must have grown
/// by the requested amount; otherwise the operation fails with
/// [`ManagerError::AdapterShortfall`] and the surrounding unit of work
/// restores every balance.
///
/// Built with [`AssetManagerBuilder`](super::AssetManagerBuilder).
pub struct AssetManager {
    pub(super) address: Address,
    pub(super) underlying: Address,
    pub(super) reward_collector: Address,
    pub(super) rebalancers: HashSet<Address>,
    pub(super) adapter: Rc<dyn InvestmentAdapter>,
    pub(super) ledger: Rc<dyn Ledger>,
    pub(super) tokens: Rc<dyn TokenLedger>,
    pub(super) uow: Rc<UnitOfWork>,
    pub(super) state: Versioned<ManagerState>,
}

impl AssetManager {
    /// Identity of this manager in the ledger and token ledger.
    #[must_use]
    pub const fn address(&self) -> Address {
        self.address
    }

    /// The pool token this manager invests.
    #[must_use]
    pub const fn underlying(&self) -> Address {
        self.underlying
    }

    /// Recipient of every harvested reward.
    #[must_use]
    pub const fn reward_collector(&self) -> Address {
        self.reward_collector
    }

    /// Current binding state.
    #[must_use]
    pub fn lifecycle(&self) -> Lifecycle {
        self.state.read(|s| s.lifecycle)
    }

    /// Whether `caller` may call [`capital_out`](Self::capital_out).
    #[must_use]
    pub fn is_rebalancer(&self, caller: Address) -> bool {
        self.rebalancers.contains(&caller)
    }

    /// Binds the manager to `pool_id`. Allowed exactly once.
    ///
    /// # Errors
    ///
    /// - [`ManagerError::InvalidArgument`] for the empty pool id.
    /// - [`ManagerError::AlreadyInitialized`] on a second call; the first
    ///   binding is kept.
    pub fn initialize(&self, pool_id: PoolId) -> Result<()> {
        self.uow.run(|| {
            if pool_id.is_empty() {
                return Err(ManagerError::InvalidArgument("pool id must not be empty"));
            }
            self.state.update(|s| match s.lifecycle {
                Lifecycle::Active { .. } => Err(ManagerError::AlreadyInitialized),
                Lifecycle::Uninitialized => {
                    s.lifecycle = Lifecycle::Active { pool_id };
                    Ok(())
                }
            })?;
            info!(%pool_id, manager = %self.address, token = %self.underlying, "asset manager initialized");
            Ok(())
        })
    }

    /// Managed balance: the live value of the adapter shares held.
    ///
    /// # Errors
    ///
    /// Lifecycle errors, or an adapter conversion failure.
    pub fn get_aum(&self, pool_id: PoolId) -> Result<Amount> {
        self.ensure_pool(pool_id)?;
        self.aum()
    }

    /// Ledger cash and live managed balance of the underlying token.
    ///
    /// # Errors
    ///
    /// Lifecycle, ledger or adapter failures.
    pub fn get_pool_balances(&self, pool_id: PoolId) -> Result<PoolBalances> {
        self.ensure_pool(pool_id)?;
        self.balances(pool_id)
    }

    /// `total * target - managed`: positive means room to invest,
    /// negative means over-invested.
    ///
    /// # Errors
    ///
    /// Lifecycle, ledger, adapter or arithmetic failures.
    pub fn max_investable_balance(&self, pool_id: PoolId) -> Result<SignedAmount> {
        self.ensure_pool(pool_id)?;
        let balances = self.balances(pool_id)?;
        Self::investable(&balances, &self.config(pool_id))
    }

    /// The stored config for `pool_id`, all zeros if never set.
    ///
    /// # Errors
    ///
    /// Lifecycle errors.
    pub fn get_investment_config(&self, pool_id: PoolId) -> Result<InvestmentConfig> {
        self.ensure_pool(pool_id)?;
        Ok(self.config(pool_id))
    }

    /// The stored config for `pool_id` in packed form.
    ///
    /// # Errors
    ///
    /// Lifecycle errors.
    pub fn get_config(&self, pool_id: PoolId) -> Result<ConfigBlob> {
        self.get_investment_config(pool_id).map(ConfigBlob::from)
    }

    /// Stores a packed config. Only the ledger, forwarding for the pool that
    /// owns `pool_id`, may call this.
    ///
    /// # Errors
    ///
    /// - Lifecycle errors.
    /// - [`ManagerError::Unauthorized`] for any other caller.
    /// - [`ManagerError::InvalidArgument`] or [`ManagerError::ConfigInvalid`]
    ///   for a bad blob; the previous config is kept.
    pub fn set_config(&self, ctx: &CallContext, pool_id: PoolId, blob: ConfigBlob) -> Result<()> {
        self.uow.run(|| {
            self.ensure_pool(pool_id)?;
            let pool_address = self.ledger.pool_address(pool_id)?;
            if ctx.sender() != self.ledger.address() || ctx.forwarded_for() != Some(pool_address) {
                warn!(%pool_id, caller = %ctx.sender(), "config change rejected");
                return Err(ManagerError::Unauthorized {
                    caller: ctx.sender(),
                    action: "only the ledger acting for the pool can set config",
                });
            }
            let config = blob.decode()?;
            self.state.update(|s| s.configs.set(pool_id, config))?;
            info!(
                %pool_id,
                target = %config.target(),
                upper = %config.upper_critical(),
                lower = %config.lower_critical(),
                "investment config updated"
            );
            Ok(())
        })
    }

    /// Moves capital between cash and the adapter toward `total * target`.
    ///
    /// Without `force`, acts only when the cash share of the total lies
    /// outside `[lower_critical, upper_critical]`. An empty pool is left
    /// alone.
    ///
    /// When the adapter's share price is not 1:1 the managed value lands a
    /// little under target. Cash keeps flowing in until the remaining gap is
    /// worth less than one share, so an immediate second call moves nothing.
    ///
    /// # Errors
    ///
    /// Lifecycle, ledger, arithmetic or adapter failures, including
    /// [`ManagerError::AdapterShortfall`].
    pub fn rebalance(&self, pool_id: PoolId, force: bool) -> Result<()> {
        self.uow.run(|| {
            self.ensure_pool(pool_id)?;
            let balances = self.balances(pool_id)?;
            if balances.total()?.is_zero() {
                debug!(%pool_id, "rebalance skipped: empty pool");
                return Ok(());
            }
            let config = self.config(pool_id);
            if !force {
                let Some(cash_fraction) = balances.cash_fraction()? else {
                    return Ok(());
                };
                if !config.is_outside_band(cash_fraction) {
                    debug!(%pool_id, %cash_fraction, "rebalance skipped: within band");
                    return Ok(());
                }
            }
            let delta = Self::investable(&balances, &config)?;
            if delta.is_zero() {
                debug!(%pool_id, "rebalance skipped: on target");
                return Ok(());
            }
            if delta.is_negative() {
                let amount = delta.magnitude().min(balances.managed());
                if amount.is_zero() {
                    debug!(%pool_id, "rebalance skipped: nothing managed");
                    return Ok(());
                }
                self.divest(pool_id, amount)?;
            }
            self.invest_toward_target(pool_id, &config)
        })
    }

    /// Divests exactly `amount` back into pool cash.
    ///
    /// # Errors
    ///
    /// - Lifecycle errors.
    /// - [`ManagerError::Unauthorized`] unless `ctx.sender()` is a
    ///   rebalancer; nothing moves.
    /// - [`ManagerError::AdapterShortfall`] if fewer than `amount` tokens
    ///   arrive.
    pub fn capital_out(&self, ctx: &CallContext, pool_id: PoolId, amount: Amount) -> Result<()> {
        self.uow.run(|| {
            self.ensure_pool(pool_id)?;
            if !self.is_rebalancer(ctx.sender()) {
                warn!(%pool_id, caller = %ctx.sender(), %amount, "capital out rejected");
                return Err(ManagerError::Unauthorized {
                    caller: ctx.sender(),
                    action: "only rebalancers can move capital out",
                });
            }
            if amount.is_zero() {
                debug!(%pool_id, "capital out skipped: zero amount");
                return Ok(());
            }
            let received = self.divest(pool_id, amount)?;
            info!(%pool_id, caller = %ctx.sender(), %amount, %received, "capital out");
            Ok(())
        })
    }

    /// Reports the live managed balance to the ledger and returns it.
    ///
    /// # Errors
    ///
    /// Lifecycle, adapter or ledger failures.
    pub fn update_balance_of_pool(&self, pool_id: PoolId) -> Result<Amount> {
        self.uow.run(|| {
            self.ensure_pool(pool_id)?;
            let aum = self.aum()?;
            self.ledger
                .update_managed_balance(&self.ctx(), pool_id, self.underlying, aum)?;
            debug!(%pool_id, %aum, "managed balance reported");
            Ok(aum)
        })
    }

    /// Harvests adapter rewards and forwards all of them to the reward
    /// collector. Returns the amount forwarded.
    ///
    /// # Errors
    ///
    /// [`ManagerError::NotInitialized`], or reward source and token ledger
    /// failures.
    pub fn claim_rewards(&self) -> Result<Amount> {
        self.uow.run(|| {
            let Lifecycle::Active { pool_id } = self.lifecycle() else {
                return Err(ManagerError::NotInitialized);
            };
            let Some(source) = self.adapter.reward_source() else {
                debug!(%pool_id, "no reward source");
                return Ok(Amount::ZERO);
            };
            let reward_token = source.reward_token();
            let before = self.tokens.balance_of(reward_token, self.address);
            source.harvest(self.address)?;
            let harvested = self
                .tokens
                .balance_of(reward_token, self.address)
                .excess_over(&before);
            if harvested.is_zero() {
                debug!(%pool_id, "no rewards to claim");
                return Ok(Amount::ZERO);
            }
            self.tokens
                .transfer(reward_token, self.address, self.reward_collector, harvested)?;
            info!(
                %pool_id,
                token = %reward_token,
                %harvested,
                collector = %self.reward_collector,
                "rewards forwarded"
            );
            Ok(harvested)
        })
    }

    fn ctx(&self) -> CallContext {
        CallContext::new(self.address)
    }

    fn ensure_pool(&self, pool_id: PoolId) -> Result<()> {
        match self.lifecycle() {
            Lifecycle::Uninitialized => Err(ManagerError::NotInitialized),
            Lifecycle::Active { pool_id: expected } if expected != pool_id => {
                Err(ManagerError::PoolIdMismatch {
                    expected,
                    actual: pool_id,
                })
            }
            Lifecycle::Active { .. } => Ok(()),
        }
    }

    fn config(&self, pool_id: PoolId) -> InvestmentConfig {
        self.state.read(|s| s.configs.get(pool_id))
    }

    fn aum(&self) -> Result<Amount> {
        self.adapter
            .value_of(self.adapter.share_balance(self.address))
    }

    fn balances(&self, pool_id: PoolId) -> Result<PoolBalances> {
        let cash = self.ledger.pool_token_info(pool_id, self.underlying)?.cash;
        Ok(PoolBalances::new(cash, self.aum()?))
    }

    fn investable(balances: &PoolBalances, config: &InvestmentConfig) -> Result<SignedAmount> {
        let target = config.target().mul_amount(balances.total()?, Rounding::Down)?;
        SignedAmount::difference(target, balances.managed())
    }

    /// Invests cash until the gap to target cannot mint a share.
    ///
    /// Neither an invest nor a divest overshoots the target, so the gap seen
    /// here is never negative after a move. A pass that fails to shrink the
    /// gap ends the loop.
    fn invest_toward_target(&self, pool_id: PoolId, config: &InvestmentConfig) -> Result<()> {
        let mut previous_gap: Option<Amount> = None;
        loop {
            let balances = self.balances(pool_id)?;
            let delta = Self::investable(&balances, config)?;
            if !delta.is_positive() {
                return Ok(());
            }
            let gap = delta.magnitude();
            if previous_gap.is_some_and(|previous| gap >= previous) {
                debug!(%pool_id, %gap, "rebalance stopped: gap no longer shrinking");
                return Ok(());
            }
            let amount = gap.min(balances.cash());
            if amount.is_zero() {
                debug!(%pool_id, "rebalance skipped: no cash to invest");
                return Ok(());
            }
            if self.adapter.preview_deposit(amount)?.is_zero() {
                debug!(%pool_id, %amount, "rebalance skipped: amount below one share");
                return Ok(());
            }
            self.invest(pool_id, amount)?;
            previous_gap = Some(gap);
        }
    }

    /// Cash → adapter. The ledger sends `amount` to this manager, which
    /// deposits it and checks that shares were minted.
    fn invest(&self, pool_id: PoolId, amount: Amount) -> Result<()> {
        let ctx = self.ctx();
        self.ledger.manage_pool_balance(
            &ctx,
            &[PoolBalanceOp::withdraw(pool_id, self.underlying, amount)],
        )?;
        let shares_before = self.adapter.share_balance(self.address);
        self.adapter.deposit(self.address, amount)?;
        let shares_after = self.adapter.share_balance(self.address);
        if shares_after <= shares_before {
            warn!(%pool_id, %amount, adapter = %self.adapter.address(), "adapter minted no shares");
            return Err(ManagerError::AdapterShortfall("expected shares after deposit"));
        }
        let aum = self.aum()?;
        self.ledger
            .update_managed_balance(&ctx, pool_id, self.underlying, aum)?;
        info!(%pool_id, %amount, %aum, "capital invested");
        Ok(())
    }

    /// Adapter → cash. Redeems enough shares to receive at least `amount`
    /// and returns what actually arrived.
    fn divest(&self, pool_id: PoolId, amount: Amount) -> Result<Amount> {
        let aum_before = self.aum()?;
        let held = self.adapter.share_balance(self.address);
        let shares = if aum_before.is_zero() {
            Amount::ZERO
        } else {
            crate::math::mul_div(amount.get(), held.get(), aum_before.get(), Rounding::Up)
                .map(Amount::new)
                .ok_or(ManagerError::Overflow("shares to redeem"))?
                .min(held)
        };
        let tokens_before = self.tokens.balance_of(self.underlying, self.address);
        if !shares.is_zero() {
            self.adapter.redeem(self.address, shares)?;
        }
        let received = self
            .tokens
            .balance_of(self.underlying, self.address)
            .excess_over(&tokens_before);
        if received < amount {
            warn!(%pool_id, %amount, %received, adapter = %self.adapter.address(), "adapter paid short");
            return Err(ManagerError::AdapterShortfall("expected tokens after withdraw"));
        }
        let aum_after = self.aum()?;
        self.ledger.manage_pool_balance(
            &self.ctx(),
            &[
                PoolBalanceOp::update(pool_id, self.underlying, aum_before),
                PoolBalanceOp::deposit(pool_id, self.underlying, received),
                PoolBalanceOp::update(pool_id, self.underlying, aum_after),
            ],
        )?;
        info!(%pool_id, %amount, %received, aum = %aum_after, "capital divested");
        Ok(received)
    }
}

impl AssetManagerHooks for AssetManager {
    fn address(&self) -> Address {
        self.address
    }

    fn rebalance(&self, pool_id: PoolId, force: bool) -> Result<()> {
        Self::rebalance(self, pool_id, force)
    }

    fn update_balance_of_pool(&self, pool_id: PoolId) -> Result<Amount> {
        Self::update_balance_of_pool(self, pool_id)
    }

    fn capital_out(&self, ctx: &CallContext, pool_id: PoolId, amount: Amount) -> Result<()> {
        Self::capital_out(self, ctx, pool_id, amount)
    }

    fn claim_rewards(&self) -> Result<Amount> {
        Self::claim_rewards(self)
    }

    fn set_config(&self, ctx: &CallContext, pool_id: PoolId, blob: ConfigBlob) -> Result<()> {
        Self::set_config(self, ctx, pool_id, blob)
    }
}

impl Transactional for AssetManager {
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

impl core::fmt::Debug for AssetManager {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AssetManager")
            .field("address", &self.address)
            .field("underlying", &self.underlying)
            .field("reward_collector", &self.reward_collector)
            .field("lifecycle", &self.lifecycle())
            .finish_non_exhaustive()
    }
}
