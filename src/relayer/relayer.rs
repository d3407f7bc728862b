//! User-facing entry points that coordinate the ledger and asset managers.

use std::rc::Rc;

use tracing::{debug, info, warn};

use super::{LockGuard, ReentrancyLock};
use crate::domain::{Address, Amount, CallContext, PoolId};
use crate::error::{ManagerError, Result};
use crate::traits::{ExitOutcome, ExitRequest, JoinOutcome, JoinRequest, Ledger};
use crate::unit_of_work::UnitOfWork;

/// Wraps joins, exits and reward claims so each runs under one lock and one
/// unit of work.
///
/// The relayer is the only account a relayed pool accepts joins and exits
/// from. Before an exit it pulls the requested managed capital back into
/// cash through each token's asset manager, so users can exit more than the
/// pool holds as cash.
///
/// Any call that re-enters the relayer while another is in flight fails
/// with [`ManagerError::Reentrancy`], and the outer call fails with it.
pub struct Relayer {
    address: Address,
    ledger: Rc<dyn Ledger>,
    uow: Rc<UnitOfWork>,
    lock: ReentrancyLock,
}

impl Relayer {
    /// Creates a relayer acting as `address` against `ledger`.
    #[must_use]
    pub fn new(address: Address, ledger: Rc<dyn Ledger>, uow: Rc<UnitOfWork>) -> Rc<Self> {
        Rc::new(Self {
            address,
            ledger,
            uow,
            lock: ReentrancyLock::new(),
        })
    }

    /// Identity of the relayer.
    #[must_use]
    pub const fn address(&self) -> Address {
        self.address
    }

    /// Whether an entry point is in flight.
    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.lock.is_locked()
    }

    /// Joins `pool_id` for `ctx.principal()`, crediting `recipient`.
    ///
    /// # Errors
    ///
    /// [`ManagerError::Reentrancy`] if called while locked, otherwise
    /// whatever the ledger or a settlement hook returns.
    pub fn join_pool(
        &self,
        ctx: &CallContext,
        pool_id: PoolId,
        recipient: Address,
        request: &JoinRequest,
    ) -> Result<JoinOutcome> {
        let _guard = self.enter("join pool")?;
        let outcome = self.uow.run(|| {
            self.ledger
                .join_pool(&self.forward(ctx), pool_id, recipient, request)
        })?;
        info!(%pool_id, user = %ctx.principal(), minted = %outcome.shares_minted, "relayed join");
        Ok(outcome)
    }

    /// Exits `pool_id` for `ctx.principal()`, paying `recipient`.
    ///
    /// `managed_amounts_out[i]` is the amount of pool token `i` to divest
    /// through its asset manager before the exit settles.
    ///
    /// # Errors
    ///
    /// - [`ManagerError::Reentrancy`] if called while locked.
    /// - [`ManagerError::InvalidArgument`] if `managed_amounts_out` does not
    ///   have one entry per pool token, or names a token without an asset
    ///   manager.
    /// - [`ManagerError::AdapterShortfall`] if a divestment comes up short.
    /// - Whatever the ledger returns.
    pub fn exit_pool(
        &self,
        ctx: &CallContext,
        pool_id: PoolId,
        recipient: Address,
        request: &ExitRequest,
        managed_amounts_out: &[Amount],
    ) -> Result<ExitOutcome> {
        let _guard = self.enter("exit pool")?;
        let outcome = self.uow.run(|| {
            let tokens = self.ledger.pool_tokens(pool_id)?;
            if managed_amounts_out.len() != tokens.len() {
                return Err(ManagerError::InvalidArgument(
                    "managed amounts must match pool tokens",
                ));
            }
            let as_relayer = CallContext::new(self.address);
            for (token, amount) in tokens.iter().zip(managed_amounts_out) {
                if amount.is_zero() {
                    continue;
                }
                let Some(asset_manager) = self.ledger.asset_manager(pool_id, *token)? else {
                    return Err(ManagerError::InvalidArgument(
                        "managed amount for a token without asset manager",
                    ));
                };
                asset_manager.capital_out(&as_relayer, pool_id, *amount)?;
                debug!(%pool_id, %token, %amount, "managed capital pulled for exit");
            }
            self.ledger
                .exit_pool(&self.forward(ctx), pool_id, recipient, request)
        })?;
        info!(%pool_id, user = %ctx.principal(), burned = %outcome.shares_burned, "relayed exit");
        Ok(outcome)
    }

    /// Claims rewards from every asset manager of `pool_id`.
    ///
    /// Returns one amount per pool token, in pool token order; tokens
    /// without an asset manager or reward source report zero.
    ///
    /// # Errors
    ///
    /// [`ManagerError::Reentrancy`] if called while locked, otherwise the
    /// first asset manager failure.
    pub fn claim_asset_manager_rewards(&self, pool_id: PoolId) -> Result<Vec<Amount>> {
        let _guard = self.enter("claim rewards")?;
        self.uow.run(|| {
            let tokens = self.ledger.pool_tokens(pool_id)?;
            let mut claimed = Vec::with_capacity(tokens.len());
            for token in tokens {
                let amount = match self.ledger.asset_manager(pool_id, token)? {
                    Some(asset_manager) => asset_manager.claim_rewards()?,
                    None => Amount::ZERO,
                };
                claimed.push(amount);
            }
            debug!(%pool_id, ?claimed, "asset manager rewards claimed");
            Ok(claimed)
        })
    }

    fn enter(&self, entry: &'static str) -> Result<LockGuard<'_>> {
        self.lock.acquire().inspect_err(|_| {
            warn!(relayer = %self.address, entry, "reentrant call rejected");
        })
    }

    fn forward(&self, ctx: &CallContext) -> CallContext {
        CallContext::on_behalf_of(self.address, ctx.principal())
    }
}

impl core::fmt::Debug for Relayer {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Relayer")
            .field("address", &self.address)
            .field("locked", &self.lock.is_locked())
            .finish_non_exhaustive()
    }
}
