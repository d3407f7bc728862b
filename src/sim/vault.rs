//! Reference pool ledger.
//!
//! [`InMemoryVault`] keeps `(cash, managed)` per pool token, holds the cash
//! as real token balances in a [`TokenLedger`], mints pool shares on join
//! and burns them on exit. Pools are registered with a relayer: only that
//! relayer may join or exit, and only for users who approved it.
//!
//! After a join or exit the vault notifies every asset manager of the pool,
//! as selected by its [`SettlementPolicy`].

use std::collections::{HashMap, HashSet};
use std::rc::{Rc, Weak};

use tracing::{debug, warn};

use crate::config::ConfigBlob;
use crate::domain::{Address, Amount, CallContext, PoolId};
use crate::error::{ManagerError, Result};
use crate::math::CheckedArithmetic;
use crate::traits::{
    AssetManagerHooks, BalanceOpKind, ExitOutcome, ExitRequest, JoinOutcome, JoinRequest, Ledger,
    PoolBalanceOp, PoolTokenInfo, TokenLedger, Transactional,
};
use crate::unit_of_work::{UnitOfWork, Versioned};

/// Which asset manager hooks the vault runs after settling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SettlementPolicy {
    /// `rebalance(pool, false)` after a join, `update_balance_of_pool`
    /// after an exit.
    #[default]
    Rebalance,
    /// `update_balance_of_pool` after both joins and exits.
    UpdateOnly,
    /// No hooks.
    None,
}

/// A token handed to [`InMemoryVault::register_pool`].
#[derive(Clone)]
pub struct TokenRegistration {
    token: Address,
    asset_manager: Option<Rc<dyn AssetManagerHooks>>,
}

impl TokenRegistration {
    /// A token kept entirely as cash.
    #[must_use]
    pub fn plain(token: Address) -> Self {
        Self {
            token,
            asset_manager: None,
        }
    }

    /// A token whose capital is managed by `asset_manager`.
    #[must_use]
    pub fn managed(token: Address, asset_manager: Rc<dyn AssetManagerHooks>) -> Self {
        Self {
            token,
            asset_manager: Some(asset_manager),
        }
    }
}

impl core::fmt::Debug for TokenRegistration {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TokenRegistration")
            .field("token", &self.token)
            .field("asset_manager", &self.asset_manager.as_ref().map(|am| am.address()))
            .finish()
    }
}

#[derive(Debug, Clone)]
struct TokenSlot {
    token: Address,
    cash: Amount,
    managed: Amount,
    asset_manager: Option<(Address, Weak<dyn AssetManagerHooks>)>,
}

#[derive(Debug, Clone)]
struct PoolRecord {
    owner: Address,
    address: Address,
    relayer: Address,
    tokens: Vec<TokenSlot>,
    shares: HashMap<Address, Amount>,
    total_shares: Amount,
}

impl PoolRecord {
    fn slot(&self, pool_id: PoolId, token: Address) -> Result<&TokenSlot> {
        self.tokens
            .iter()
            .find(|slot| slot.token == token)
            .ok_or(ManagerError::UnknownToken { pool_id, token })
    }

    fn slot_mut(&mut self, pool_id: PoolId, token: Address) -> Result<&mut TokenSlot> {
        self.tokens
            .iter_mut()
            .find(|slot| slot.token == token)
            .ok_or(ManagerError::UnknownToken { pool_id, token })
    }
}

#[derive(Debug, Clone, Default)]
struct VaultState {
    pools: HashMap<PoolId, PoolRecord>,
    approvals: HashSet<(Address, Address)>,
    nonce: u64,
}

impl VaultState {
    fn pool(&self, pool_id: PoolId) -> Result<&PoolRecord> {
        self.pools
            .get(&pool_id)
            .ok_or(ManagerError::UnknownPool(pool_id))
    }

    fn pool_mut(&mut self, pool_id: PoolId) -> Result<&mut PoolRecord> {
        self.pools
            .get_mut(&pool_id)
            .ok_or(ManagerError::UnknownPool(pool_id))
    }
}

/// Which relayer entry point a settlement belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Settlement {
    Join,
    Exit,
}

/// In-memory [`Ledger`] with relayer-gated joins and exits.
pub struct InMemoryVault {
    address: Address,
    policy: SettlementPolicy,
    tokens: Rc<dyn TokenLedger>,
    uow: Rc<UnitOfWork>,
    state: Versioned<VaultState>,
}

impl InMemoryVault {
    /// Creates an empty vault enlisted in `uow`.
    #[must_use]
    pub fn new(
        uow: &Rc<UnitOfWork>,
        address: Address,
        tokens: Rc<dyn TokenLedger>,
        policy: SettlementPolicy,
    ) -> Rc<Self> {
        let vault = Rc::new(Self {
            address,
            policy,
            tokens,
            uow: Rc::clone(uow),
            state: Versioned::default(),
        });
        uow.enlist(&vault);
        vault
    }

    /// Settlement policy fixed at construction.
    #[must_use]
    pub const fn policy(&self) -> SettlementPolicy {
        self.policy
    }

    /// Registers a pool and returns its id.
    ///
    /// # Errors
    ///
    /// Returns [`ManagerError::InvalidArgument`] for fewer than two tokens,
    /// a zero or duplicate token, or a zero owner, pool or relayer address.
    pub fn register_pool(
        &self,
        owner: Address,
        pool_address: Address,
        relayer: Address,
        tokens: Vec<TokenRegistration>,
    ) -> Result<PoolId> {
        if owner.is_zero() || pool_address.is_zero() || relayer.is_zero() {
            return Err(ManagerError::InvalidArgument(
                "pool owner, address and relayer must be set",
            ));
        }
        if tokens.len() < 2 {
            return Err(ManagerError::InvalidArgument("pool needs at least two tokens"));
        }
        let mut seen = HashSet::new();
        for registration in &tokens {
            if registration.token.is_zero() || !seen.insert(registration.token) {
                return Err(ManagerError::InvalidArgument(
                    "pool tokens must be non-zero and distinct",
                ));
            }
        }
        let slots = tokens
            .into_iter()
            .map(|registration| TokenSlot {
                token: registration.token,
                cash: Amount::ZERO,
                managed: Amount::ZERO,
                asset_manager: registration
                    .asset_manager
                    .map(|am| (am.address(), Rc::downgrade(&am))),
            })
            .collect();
        self.state.update(|state| {
            let pool_id = PoolId::derive(pool_address, state.nonce);
            state.nonce += 1;
            state.pools.insert(
                pool_id,
                PoolRecord {
                    owner,
                    address: pool_address,
                    relayer,
                    tokens: slots,
                    shares: HashMap::new(),
                    total_shares: Amount::ZERO,
                },
            );
            debug!(%pool_id, pool = %pool_address, "pool registered");
            Ok(pool_id)
        })
    }

    /// Records whether `relayer` may act for `ctx.sender()`.
    pub fn set_relayer_approval(&self, ctx: &CallContext, relayer: Address, approved: bool) {
        let user = ctx.sender();
        self.state.update(|state| {
            if approved {
                state.approvals.insert((user, relayer));
            } else {
                state.approvals.remove(&(user, relayer));
            }
        });
    }

    /// Whether `user` approved `relayer`.
    #[must_use]
    pub fn is_relayer_approved(&self, user: Address, relayer: Address) -> bool {
        self.state
            .read(|state| state.approvals.contains(&(user, relayer)))
    }

    /// Pool shares held by `holder`.
    ///
    /// # Errors
    ///
    /// Returns [`ManagerError::UnknownPool`] for an unregistered id.
    pub fn pool_shares(&self, pool_id: PoolId, holder: Address) -> Result<Amount> {
        self.state.read(|state| {
            Ok(state
                .pool(pool_id)?
                .shares
                .get(&holder)
                .copied()
                .unwrap_or(Amount::ZERO))
        })
    }

    /// Total pool shares outstanding.
    ///
    /// # Errors
    ///
    /// Returns [`ManagerError::UnknownPool`] for an unregistered id.
    pub fn total_pool_shares(&self, pool_id: PoolId) -> Result<Amount> {
        self.state
            .read(|state| Ok(state.pool(pool_id)?.total_shares))
    }

    /// Forwards a packed investment config to the asset manager of `token`,
    /// acting on behalf of the pool.
    ///
    /// # Errors
    ///
    /// - [`ManagerError::Unauthorized`] unless `ctx.sender()` owns the pool.
    /// - [`ManagerError::InvalidArgument`] if `token` has no asset manager.
    /// - Whatever the asset manager's `set_config` returns.
    pub fn set_asset_manager_pool_config(
        &self,
        ctx: &CallContext,
        pool_id: PoolId,
        token: Address,
        blob: ConfigBlob,
    ) -> Result<()> {
        let (owner, pool_address) = self.state.read(|state| {
            let pool = state.pool(pool_id)?;
            Ok::<_, ManagerError>((pool.owner, pool.address))
        })?;
        if ctx.sender() != owner {
            warn!(%pool_id, caller = %ctx.sender(), "asset manager config rejected");
            return Err(ManagerError::Unauthorized {
                caller: ctx.sender(),
                action: "only the pool owner can configure asset managers",
            });
        }
        let Some(asset_manager) = self.asset_manager(pool_id, token)? else {
            return Err(ManagerError::InvalidArgument("token has no asset manager"));
        };
        asset_manager.set_config(
            &CallContext::on_behalf_of(self.address, pool_address),
            pool_id,
            blob,
        )
    }

    /// Checks the relayer gate and returns the user the call acts for.
    fn authorize_relayed(
        &self,
        ctx: &CallContext,
        pool_id: PoolId,
        action: &'static str,
    ) -> Result<Address> {
        let relayer = self
            .state
            .read(|state| state.pool(pool_id).map(|pool| pool.relayer))?;
        if ctx.sender() != relayer {
            warn!(%pool_id, caller = %ctx.sender(), action, "relayed call rejected");
            return Err(ManagerError::Unauthorized {
                caller: ctx.sender(),
                action,
            });
        }
        let user = ctx.principal();
        if !self.is_relayer_approved(user, relayer) {
            warn!(%pool_id, %user, "relayer not approved");
            return Err(ManagerError::Unauthorized {
                caller: relayer,
                action: "relayer not approved by user",
            });
        }
        Ok(user)
    }

    fn live_asset_managers(&self, pool_id: PoolId) -> Result<Vec<Rc<dyn AssetManagerHooks>>> {
        self.state.read(|state| {
            Ok(state
                .pool(pool_id)?
                .tokens
                .iter()
                .filter_map(|slot| slot.asset_manager.as_ref())
                .filter_map(|(_, weak)| weak.upgrade())
                .collect())
        })
    }

    fn settle(&self, pool_id: PoolId, settlement: Settlement) -> Result<()> {
        let rebalance = match (self.policy, settlement) {
            (SettlementPolicy::None, _) => return Ok(()),
            (SettlementPolicy::Rebalance, Settlement::Join) => true,
            _ => false,
        };
        for asset_manager in self.live_asset_managers(pool_id)? {
            if rebalance {
                asset_manager.rebalance(pool_id, false)?;
            } else {
                asset_manager.update_balance_of_pool(pool_id)?;
            }
        }
        Ok(())
    }

    fn apply_op(&self, ctx: &CallContext, op: &PoolBalanceOp) -> Result<()> {
        let manager = self.state.update(|state| {
            let pool = state.pool_mut(op.pool_id)?;
            let pool_address = pool.address;
            let slot = pool.slot_mut(op.pool_id, op.token)?;
            let manager = slot.asset_manager.as_ref().map(|(address, _)| *address);
            if manager != Some(ctx.sender()) {
                return Err(ManagerError::Unauthorized {
                    caller: ctx.sender(),
                    action: "only the token's asset manager can manage pool balance",
                });
            }
            match op.kind {
                BalanceOpKind::Withdraw => {
                    if op.amount > slot.cash {
                        return Err(ManagerError::InsufficientBalance {
                            token: op.token,
                            holder: pool_address,
                            needed: op.amount,
                            available: slot.cash,
                        });
                    }
                    slot.cash = slot.cash.safe_sub(&op.amount)?;
                    slot.managed = slot.managed.safe_add(&op.amount)?;
                }
                BalanceOpKind::Deposit => {
                    slot.managed = slot.managed.safe_sub(&op.amount)?;
                    slot.cash = slot.cash.safe_add(&op.amount)?;
                }
                BalanceOpKind::Update => slot.managed = op.amount,
            }
            Ok(ctx.sender())
        })?;
        match op.kind {
            BalanceOpKind::Withdraw => {
                self.tokens
                    .transfer(op.token, self.address, manager, op.amount)
            }
            BalanceOpKind::Deposit => {
                self.tokens
                    .transfer(op.token, manager, self.address, op.amount)
            }
            BalanceOpKind::Update => Ok(()),
        }
    }
}

impl Ledger for InMemoryVault {
    fn address(&self) -> Address {
        self.address
    }

    fn pool_address(&self, pool_id: PoolId) -> Result<Address> {
        self.state
            .read(|state| state.pool(pool_id).map(|pool| pool.address))
    }

    fn pool_tokens(&self, pool_id: PoolId) -> Result<Vec<Address>> {
        self.state.read(|state| {
            Ok(state
                .pool(pool_id)?
                .tokens
                .iter()
                .map(|slot| slot.token)
                .collect())
        })
    }

    fn pool_token_info(&self, pool_id: PoolId, token: Address) -> Result<PoolTokenInfo> {
        self.state.read(|state| {
            let slot = state.pool(pool_id)?.slot(pool_id, token)?;
            Ok(PoolTokenInfo {
                cash: slot.cash,
                managed: slot.managed,
                asset_manager: slot.asset_manager.as_ref().map(|(address, _)| *address),
            })
        })
    }

    fn asset_manager(
        &self,
        pool_id: PoolId,
        token: Address,
    ) -> Result<Option<Rc<dyn AssetManagerHooks>>> {
        self.state.read(|state| {
            let slot = state.pool(pool_id)?.slot(pool_id, token)?;
            Ok(slot
                .asset_manager
                .as_ref()
                .and_then(|(_, weak)| weak.upgrade()))
        })
    }

    fn manage_pool_balance(&self, ctx: &CallContext, ops: &[PoolBalanceOp]) -> Result<()> {
        self.uow.run(|| {
            for op in ops {
                self.apply_op(ctx, op)?;
            }
            Ok(())
        })
    }

    fn join_pool(
        &self,
        ctx: &CallContext,
        pool_id: PoolId,
        recipient: Address,
        request: &JoinRequest,
    ) -> Result<JoinOutcome> {
        self.uow.run(|| {
            let user = self.authorize_relayed(ctx, pool_id, "only relayer can join pool")?;
            let tokens = self.pool_tokens(pool_id)?;
            let amounts = request.amounts_in();
            if amounts.len() != tokens.len() {
                return Err(ManagerError::InvalidArgument(
                    "join amounts must match pool tokens",
                ));
            }
            let mut minted = Amount::ZERO;
            for amount in amounts {
                minted = minted.safe_add(amount)?;
            }
            if minted.is_zero() {
                return Err(ManagerError::InvalidArgument("join must add tokens"));
            }
            for (token, amount) in tokens.iter().zip(amounts) {
                if !amount.is_zero() {
                    self.tokens.transfer(*token, user, self.address, *amount)?;
                }
            }
            self.state.update(|state| {
                let pool = state.pool_mut(pool_id)?;
                for (slot, amount) in pool.tokens.iter_mut().zip(amounts) {
                    slot.cash = slot.cash.safe_add(amount)?;
                }
                let held = pool.shares.entry(recipient).or_insert(Amount::ZERO);
                *held = held.safe_add(&minted)?;
                pool.total_shares = pool.total_shares.safe_add(&minted)?;
                Ok::<_, ManagerError>(())
            })?;
            debug!(%pool_id, %user, %recipient, %minted, "pool joined");
            self.settle(pool_id, Settlement::Join)?;
            Ok(JoinOutcome {
                shares_minted: minted,
            })
        })
    }

    fn exit_pool(
        &self,
        ctx: &CallContext,
        pool_id: PoolId,
        recipient: Address,
        request: &ExitRequest,
    ) -> Result<ExitOutcome> {
        self.uow.run(|| {
            let user = self.authorize_relayed(ctx, pool_id, "only relayer can exit pool")?;
            let tokens = self.pool_tokens(pool_id)?;
            let amounts = request.amounts_out();
            if amounts.len() != tokens.len() {
                return Err(ManagerError::InvalidArgument(
                    "exit amounts must match pool tokens",
                ));
            }
            let mut burned = Amount::ZERO;
            for amount in amounts {
                burned = burned.safe_add(amount)?;
            }
            self.state.update(|state| {
                let pool = state.pool_mut(pool_id)?;
                let held = pool.shares.get(&user).copied().unwrap_or(Amount::ZERO);
                if burned > held {
                    return Err(ManagerError::InsufficientBalance {
                        token: pool.address,
                        holder: user,
                        needed: burned,
                        available: held,
                    });
                }
                for (slot, amount) in pool.tokens.iter_mut().zip(amounts) {
                    if *amount > slot.cash {
                        return Err(ManagerError::InsufficientBalance {
                            token: slot.token,
                            holder: pool.address,
                            needed: *amount,
                            available: slot.cash,
                        });
                    }
                    slot.cash = slot.cash.safe_sub(amount)?;
                }
                pool.shares.insert(user, held.safe_sub(&burned)?);
                pool.total_shares = pool.total_shares.safe_sub(&burned)?;
                Ok(())
            })?;
            for (token, amount) in tokens.iter().zip(amounts) {
                if !amount.is_zero() {
                    self.tokens
                        .transfer(*token, self.address, recipient, *amount)?;
                }
            }
            debug!(%pool_id, %user, %recipient, %burned, "pool exited");
            self.settle(pool_id, Settlement::Exit)?;
            Ok(ExitOutcome {
                shares_burned: burned,
            })
        })
    }
}

impl Transactional for InMemoryVault {
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

impl core::fmt::Debug for InMemoryVault {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("InMemoryVault")
            .field("address", &self.address)
            .field("policy", &self.policy)
            .field("pools", &self.state.read(|state| state.pools.len()))
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::sim::TokenBank;

    const VAULT: Address = Address::repeat_byte(0x0f);
    const OWNER: Address = Address::repeat_byte(0x01);
    const POOL: Address = Address::repeat_byte(0x02);
    const RELAYER: Address = Address::repeat_byte(0xee);
    const DAI: Address = Address::repeat_byte(0xd1);
    const USDC: Address = Address::repeat_byte(0xc1);
    const ALICE: Address = Address::repeat_byte(0xa1);

    struct Fixture {
        bank: Rc<TokenBank>,
        vault: Rc<InMemoryVault>,
        pool_id: PoolId,
    }

    fn fixture() -> Fixture {
        let uow = UnitOfWork::new();
        let bank = TokenBank::new(&uow);
        for token in [DAI, USDC] {
            let Ok(()) = bank.mint(token, ALICE, Amount::new(1_000)) else {
                panic!("expected Ok");
            };
        }
        let vault = InMemoryVault::new(&uow, VAULT, bank.clone(), SettlementPolicy::None);
        let Ok(pool_id) = vault.register_pool(
            OWNER,
            POOL,
            RELAYER,
            vec![TokenRegistration::plain(DAI), TokenRegistration::plain(USDC)],
        ) else {
            panic!("expected Ok");
        };
        vault.set_relayer_approval(&CallContext::new(ALICE), RELAYER, true);
        Fixture {
            bank,
            vault,
            pool_id,
        }
    }

    fn relayed() -> CallContext {
        CallContext::on_behalf_of(RELAYER, ALICE)
    }

    fn join(f: &Fixture, dai: u128, usdc: u128) -> Result<JoinOutcome> {
        f.vault.join_pool(
            &relayed(),
            f.pool_id,
            ALICE,
            &JoinRequest::new(vec![Amount::new(dai), Amount::new(usdc)]),
        )
    }

    #[test]
    fn register_rejects_single_token() {
        let f = fixture();
        let Err(ManagerError::InvalidArgument(_)) =
            f.vault
                .register_pool(OWNER, POOL, RELAYER, vec![TokenRegistration::plain(DAI)])
        else {
            panic!("expected InvalidArgument");
        };
    }

    #[test]
    fn register_rejects_duplicate_tokens() {
        let f = fixture();
        let Err(ManagerError::InvalidArgument(_)) = f.vault.register_pool(
            OWNER,
            POOL,
            RELAYER,
            vec![TokenRegistration::plain(DAI), TokenRegistration::plain(DAI)],
        ) else {
            panic!("expected InvalidArgument");
        };
    }

    #[test]
    fn pool_ids_are_unique() {
        let f = fixture();
        let Ok(second) = f.vault.register_pool(
            OWNER,
            POOL,
            RELAYER,
            vec![TokenRegistration::plain(DAI), TokenRegistration::plain(USDC)],
        ) else {
            panic!("expected Ok");
        };
        assert_ne!(second, f.pool_id);
    }

    #[test]
    fn join_moves_tokens_into_cash() {
        let f = fixture();
        assert_eq!(
            join(&f, 200, 50),
            Ok(JoinOutcome {
                shares_minted: Amount::new(250)
            })
        );
        let Ok(info) = f.vault.pool_token_info(f.pool_id, DAI) else {
            panic!("expected Ok");
        };
        assert_eq!(info.cash, Amount::new(200));
        assert_eq!(info.managed, Amount::ZERO);
        assert_eq!(f.bank.balance_of(DAI, VAULT), Amount::new(200));
        assert_eq!(f.vault.pool_shares(f.pool_id, ALICE), Ok(Amount::new(250)));
    }

    #[test]
    fn only_relayer_can_join() {
        let f = fixture();
        let result = f.vault.join_pool(
            &CallContext::new(ALICE),
            f.pool_id,
            ALICE,
            &JoinRequest::new(vec![Amount::new(1), Amount::new(1)]),
        );
        let Err(ManagerError::Unauthorized { action, .. }) = result else {
            panic!("expected Unauthorized");
        };
        assert_eq!(action, "only relayer can join pool");
    }

    #[test]
    fn join_requires_approval() {
        let f = fixture();
        f.vault
            .set_relayer_approval(&CallContext::new(ALICE), RELAYER, false);
        let Err(ManagerError::Unauthorized { action, .. }) = join(&f, 1, 1) else {
            panic!("expected Unauthorized");
        };
        assert_eq!(action, "relayer not approved by user");
    }

    #[test]
    fn failed_join_leaves_no_trace() {
        let f = fixture();
        let Err(ManagerError::InsufficientBalance { .. }) = join(&f, 10, 5_000) else {
            panic!("expected InsufficientBalance");
        };
        assert_eq!(f.bank.balance_of(DAI, ALICE), Amount::new(1_000));
        assert_eq!(f.vault.total_pool_shares(f.pool_id), Ok(Amount::ZERO));
    }

    #[test]
    fn exit_pays_recipient_and_burns_shares() {
        let f = fixture();
        assert!(join(&f, 200, 50).is_ok());
        let result = f.vault.exit_pool(
            &relayed(),
            f.pool_id,
            ALICE,
            &ExitRequest::new(vec![Amount::new(100), Amount::ZERO]),
        );
        assert_eq!(
            result,
            Ok(ExitOutcome {
                shares_burned: Amount::new(100)
            })
        );
        assert_eq!(f.bank.balance_of(DAI, ALICE), Amount::new(900));
        assert_eq!(f.vault.pool_shares(f.pool_id, ALICE), Ok(Amount::new(150)));
    }

    #[test]
    fn exit_beyond_cash_rejected() {
        let f = fixture();
        assert!(join(&f, 10, 300).is_ok());
        let result = f.vault.exit_pool(
            &relayed(),
            f.pool_id,
            ALICE,
            &ExitRequest::new(vec![Amount::new(11), Amount::ZERO]),
        );
        let Err(ManagerError::InsufficientBalance { token, .. }) = result else {
            panic!("expected InsufficientBalance");
        };
        assert_eq!(token, DAI);
    }

    #[test]
    fn manage_ops_require_asset_manager() {
        let f = fixture();
        assert!(join(&f, 10, 10).is_ok());
        let op = PoolBalanceOp::withdraw(f.pool_id, DAI, Amount::new(5));
        let Err(ManagerError::Unauthorized { caller, .. }) =
            f.vault.manage_pool_balance(&CallContext::new(ALICE), &[op])
        else {
            panic!("expected Unauthorized");
        };
        assert_eq!(caller, ALICE);
    }

    #[test]
    fn config_forwarding_is_owner_only() {
        let f = fixture();
        let Err(ManagerError::Unauthorized { caller, .. }) = f.vault.set_asset_manager_pool_config(
            &CallContext::new(ALICE),
            f.pool_id,
            DAI,
            ConfigBlob::default(),
        ) else {
            panic!("expected Unauthorized");
        };
        assert_eq!(caller, ALICE);
    }

    #[test]
    fn config_forwarding_needs_asset_manager() {
        let f = fixture();
        let Err(ManagerError::InvalidArgument(_)) = f.vault.set_asset_manager_pool_config(
            &CallContext::new(OWNER),
            f.pool_id,
            DAI,
            ConfigBlob::default(),
        ) else {
            panic!("expected InvalidArgument");
        };
    }

    #[test]
    fn unknown_pool_is_reported() {
        let f = fixture();
        let other = PoolId::from_bytes([9u8; 32]);
        assert_eq!(
            f.vault.pool_tokens(other),
            Err(ManagerError::UnknownPool(other))
        );
    }
}
