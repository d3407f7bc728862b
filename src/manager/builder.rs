//! Construction-time wiring for [`AssetManager`].

use std::collections::HashSet;
use std::rc::Rc;

use tracing::debug;

use super::AssetManager;
use crate::domain::Address;
use crate::error::{ManagerError, Result};
use crate::traits::{InvestmentAdapter, Ledger, TokenLedger};
use crate::unit_of_work::{UnitOfWork, Versioned};

/// Collects the collaborators of an [`AssetManager`] and validates them once.
///
/// Every collaborator is required. The ledger's own address is always a
/// rebalancer; further rebalancers (typically the relayer) are granted with
/// [`rebalancer`](Self::rebalancer). The built manager is enlisted in the
/// unit of work and starts [`Uninitialized`](super::Lifecycle::Uninitialized).
///
/// # Example
///
/// ```rust
/// use std::rc::Rc;
///
/// use hydra_asset_manager::domain::Address;
/// use hydra_asset_manager::manager::{AssetManagerBuilder, Lifecycle};
/// use hydra_asset_manager::sim::{InMemoryVault, SettlementPolicy, TokenBank, YieldVaultAdapter};
/// use hydra_asset_manager::unit_of_work::UnitOfWork;
///
/// let dai = Address::repeat_byte(0xd1);
/// let uow = UnitOfWork::new();
/// let bank = TokenBank::new(&uow);
/// let vault = InMemoryVault::new(&uow, Address::repeat_byte(0x0f), bank.clone(), SettlementPolicy::Rebalance);
/// let adapter = YieldVaultAdapter::new(&uow, Rc::clone(&bank), Address::repeat_byte(0x40), dai);
///
/// let manager = AssetManagerBuilder::new(Address::repeat_byte(0xa0))
///     .underlying(dai)
///     .reward_collector(Address::repeat_byte(0xfe))
///     .adapter(adapter)
///     .ledger(vault)
///     .token_ledger(bank)
///     .unit_of_work(Rc::clone(&uow))
///     .build()
///     .expect("complete wiring");
/// assert_eq!(manager.lifecycle(), Lifecycle::Uninitialized);
/// ```
#[derive(Default)]
pub struct AssetManagerBuilder {
    address: Address,
    underlying: Address,
    reward_collector: Address,
    rebalancers: HashSet<Address>,
    adapter: Option<Rc<dyn InvestmentAdapter>>,
    ledger: Option<Rc<dyn Ledger>>,
    tokens: Option<Rc<dyn TokenLedger>>,
    uow: Option<Rc<UnitOfWork>>,
}

impl AssetManagerBuilder {
    /// Starts a builder for a manager identified by `address`.
    #[must_use]
    pub fn new(address: Address) -> Self {
        Self {
            address,
            ..Self::default()
        }
    }

    /// The pool token to invest.
    #[must_use]
    pub fn underlying(mut self, token: Address) -> Self {
        self.underlying = token;
        self
    }

    /// Recipient of harvested rewards.
    #[must_use]
    pub fn reward_collector(mut self, collector: Address) -> Self {
        self.reward_collector = collector;
        self
    }

    /// Grants `caller` the right to move capital out.
    #[must_use]
    pub fn rebalancer(mut self, caller: Address) -> Self {
        self.rebalancers.insert(caller);
        self
    }

    /// The investment adapter.
    #[must_use]
    pub fn adapter(mut self, adapter: Rc<dyn InvestmentAdapter>) -> Self {
        self.adapter = Some(adapter);
        self
    }

    /// The pool ledger.
    #[must_use]
    pub fn ledger(mut self, ledger: Rc<dyn Ledger>) -> Self {
        self.ledger = Some(ledger);
        self
    }

    /// The token ledger used to verify adapter payouts and forward rewards.
    #[must_use]
    pub fn token_ledger(mut self, tokens: Rc<dyn TokenLedger>) -> Self {
        self.tokens = Some(tokens);
        self
    }

    /// The unit of work shared with the other collaborators.
    #[must_use]
    pub fn unit_of_work(mut self, uow: Rc<UnitOfWork>) -> Self {
        self.uow = Some(uow);
        self
    }

    /// Validates the wiring and builds the manager.
    ///
    /// # Errors
    ///
    /// Returns [`ManagerError::InvalidArgument`] if a collaborator is
    /// missing, an address is zero, or the adapter invests a different
    /// token than the underlying.
    pub fn build(self) -> Result<Rc<AssetManager>> {
        let adapter = self
            .adapter
            .ok_or(ManagerError::InvalidArgument("investment adapter is required"))?;
        let ledger = self
            .ledger
            .ok_or(ManagerError::InvalidArgument("ledger is required"))?;
        let tokens = self
            .tokens
            .ok_or(ManagerError::InvalidArgument("token ledger is required"))?;
        let uow = self
            .uow
            .ok_or(ManagerError::InvalidArgument("unit of work is required"))?;
        if self.address.is_zero() {
            return Err(ManagerError::InvalidArgument("manager address is required"));
        }
        if self.underlying.is_zero() {
            return Err(ManagerError::InvalidArgument("underlying token is required"));
        }
        if self.reward_collector.is_zero() {
            return Err(ManagerError::InvalidArgument("reward collector is required"));
        }
        if adapter.underlying() != self.underlying {
            return Err(ManagerError::InvalidArgument(
                "adapter invests a different token",
            ));
        }
        let mut rebalancers = self.rebalancers;
        rebalancers.insert(ledger.address());

        let manager = Rc::new(AssetManager {
            address: self.address,
            underlying: self.underlying,
            reward_collector: self.reward_collector,
            rebalancers,
            adapter,
            ledger,
            tokens,
            uow: Rc::clone(&uow),
            state: Versioned::default(),
        });
        uow.enlist(&manager);
        debug!(manager = %manager.address, token = %manager.underlying, "asset manager built");
        Ok(manager)
    }
}
