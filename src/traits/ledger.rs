//! Ledger capability set and its request/response types.
//!
//! The [`Ledger`] owns the authoritative cash balance of every pool token,
//! settles joins and exits, and calls back into asset managers while doing
//! so. The asset manager reaches it through
//! [`manage_pool_balance`](Ledger::manage_pool_balance) to move capital
//! between cash and managed state.
//!
//! # Balance Operations
//!
//! | Kind | Cash | Managed | Tokens |
//! |------|------|---------|--------|
//! | [`BalanceOpKind::Withdraw`] | `- amount` | `+ amount` | ledger → manager |
//! | [`BalanceOpKind::Deposit`] | `+ amount` | `- amount` | manager → ledger |
//! | [`BalanceOpKind::Update`] | unchanged | `= amount` | none |

use std::rc::Rc;

use super::AssetManagerHooks;
use crate::domain::{Address, Amount, CallContext, PoolBalances, PoolId};
use crate::error::Result;

/// Snapshot of one token's state inside one pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolTokenInfo {
    /// Immediately available balance.
    pub cash: Amount,
    /// Last managed balance reported by the asset manager.
    pub managed: Amount,
    /// Asset manager registered for the token, if any.
    pub asset_manager: Option<Address>,
}

impl PoolTokenInfo {
    /// The `(cash, managed)` pair as recorded by the ledger.
    pub const fn balances(&self) -> PoolBalances {
        PoolBalances::new(self.cash, self.managed)
    }
}

/// Direction of a [`PoolBalanceOp`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BalanceOpKind {
    /// Move cash into managed state and send the tokens to the manager.
    Withdraw,
    /// Move managed capital back into cash, pulling tokens from the manager.
    Deposit,
    /// Overwrite the recorded managed balance.
    Update,
}

/// One cash/managed adjustment requested by an asset manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolBalanceOp {
    /// Operation kind.
    pub kind: BalanceOpKind,
    /// Pool the token belongs to.
    pub pool_id: PoolId,
    /// Token being adjusted.
    pub token: Address,
    /// Amount moved, or the new managed balance for `Update`.
    pub amount: Amount,
}

impl PoolBalanceOp {
    /// Cash → managed.
    pub const fn withdraw(pool_id: PoolId, token: Address, amount: Amount) -> Self {
        Self {
            kind: BalanceOpKind::Withdraw,
            pool_id,
            token,
            amount,
        }
    }

    /// Managed → cash.
    pub const fn deposit(pool_id: PoolId, token: Address, amount: Amount) -> Self {
        Self {
            kind: BalanceOpKind::Deposit,
            pool_id,
            token,
            amount,
        }
    }

    /// Managed := `amount`.
    pub const fn update(pool_id: PoolId, token: Address, amount: Amount) -> Self {
        Self {
            kind: BalanceOpKind::Update,
            pool_id,
            token,
            amount,
        }
    }
}

/// Tokens a user adds to a pool, one entry per pool token in registration
/// order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinRequest {
    amounts_in: Vec<Amount>,
}

impl JoinRequest {
    /// Creates a join request.
    #[must_use]
    pub fn new(amounts_in: Vec<Amount>) -> Self {
        Self { amounts_in }
    }

    /// Amounts to add, per pool token.
    #[must_use]
    pub fn amounts_in(&self) -> &[Amount] {
        &self.amounts_in
    }
}

/// Tokens a user takes out of a pool, one entry per pool token in
/// registration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExitRequest {
    amounts_out: Vec<Amount>,
}

impl ExitRequest {
    /// Creates an exit request.
    #[must_use]
    pub fn new(amounts_out: Vec<Amount>) -> Self {
        Self { amounts_out }
    }

    /// Amounts to withdraw, per pool token.
    #[must_use]
    pub fn amounts_out(&self) -> &[Amount] {
        &self.amounts_out
    }
}

/// Result of a settled join.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JoinOutcome {
    /// Pool shares minted to the recipient.
    pub shares_minted: Amount,
}

/// Result of a settled exit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitOutcome {
    /// Pool shares burned from the sender.
    pub shares_burned: Amount,
}

/// The pool ledger consumed by asset managers and the relayer.
///
/// # Implementors
///
/// - `InMemoryVault`: reference ledger with relayer-gated joins and exits.
pub trait Ledger {
    /// Identity of the ledger.
    fn address(&self) -> Address;

    /// Address of the pool contract that owns `pool_id`.
    ///
    /// # Errors
    ///
    /// Returns `UnknownPool` for an unregistered id.
    fn pool_address(&self, pool_id: PoolId) -> Result<Address>;

    /// Tokens of the pool in registration order.
    ///
    /// # Errors
    ///
    /// Returns `UnknownPool` for an unregistered id.
    fn pool_tokens(&self, pool_id: PoolId) -> Result<Vec<Address>>;

    /// Cash, managed balance and asset manager of one pool token.
    ///
    /// # Errors
    ///
    /// Returns `UnknownPool` or `UnknownToken`.
    fn pool_token_info(&self, pool_id: PoolId, token: Address) -> Result<PoolTokenInfo>;

    /// Live handle to the asset manager of one pool token.
    ///
    /// # Errors
    ///
    /// Returns `UnknownPool` or `UnknownToken`.
    fn asset_manager(
        &self,
        pool_id: PoolId,
        token: Address,
    ) -> Result<Option<Rc<dyn AssetManagerHooks>>>;

    /// Applies cash/managed adjustments requested by an asset manager.
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` unless `ctx.sender()` is the asset manager of
    /// every token touched.
    fn manage_pool_balance(&self, ctx: &CallContext, ops: &[PoolBalanceOp]) -> Result<()>;

    /// Records `managed` as the new managed balance of one pool token.
    ///
    /// # Errors
    ///
    /// Same as [`manage_pool_balance`](Self::manage_pool_balance).
    fn update_managed_balance(
        &self,
        ctx: &CallContext,
        pool_id: PoolId,
        token: Address,
        managed: Amount,
    ) -> Result<()> {
        self.manage_pool_balance(ctx, &[PoolBalanceOp::update(pool_id, token, managed)])
    }

    /// Settles a join for `ctx.principal()`, crediting shares to `recipient`.
    ///
    /// # Errors
    ///
    /// Implementation specific; any error aborts the join.
    fn join_pool(
        &self,
        ctx: &CallContext,
        pool_id: PoolId,
        recipient: Address,
        request: &JoinRequest,
    ) -> Result<JoinOutcome>;

    /// Settles an exit for `ctx.principal()`, paying tokens to `recipient`.
    ///
    /// # Errors
    ///
    /// Implementation specific; any error aborts the exit.
    fn exit_pool(
        &self,
        ctx: &CallContext,
        pool_id: PoolId,
        recipient: Address,
        request: &ExitRequest,
    ) -> Result<ExitOutcome>;
}
