//! # Hydra Asset Manager
//!
//! Rebalancing asset manager for pooled reserves: keep a target fraction of
//! a pool token invested in an external yield adapter, pull capital back on
//! demand, and route joins and exits through a reentrancy-safe relayer.
//!
//! This crate provides domain types, collaborator traits, the
//! [`AssetManager`](manager::AssetManager) engine, the
//! [`Relayer`](relayer::Relayer) wrapper and, behind the `in-memory`
//! feature, a complete set of in-memory collaborators:
//!
//! - **Asset Manager** — invests `total * target`, divests on request,
//!   verifies every adapter interaction by observed balance deltas
//! - **Relayer** — serializes user entry points and pre-divests managed
//!   capital ahead of exits
//! - **Unit of work** — restores every participant when an operation fails
//!
//! # Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `in-memory` | yes | Token bank, vault ledger, yield vault and mock adapters |
//! | `serde` | no | `Serialize`/`Deserialize` for value types and configs |
//!
//! # Quick Start
//!
//! ```rust
//! use std::rc::Rc;
//!
//! use hydra_asset_manager::config::{ConfigBlob, InvestmentConfig};
//! use hydra_asset_manager::domain::{Address, Amount, CallContext, Fraction};
//! use hydra_asset_manager::manager::AssetManagerBuilder;
//! use hydra_asset_manager::relayer::Relayer;
//! use hydra_asset_manager::sim::{
//!     InMemoryVault, SettlementPolicy, TokenBank, TokenRegistration, YieldVaultAdapter,
//! };
//! use hydra_asset_manager::traits::{JoinRequest, TokenLedger};
//! use hydra_asset_manager::unit_of_work::UnitOfWork;
//!
//! let (dai, usdc) = (Address::repeat_byte(0xd1), Address::repeat_byte(0xc1));
//! let (owner, pool, user) = (Address::repeat_byte(1), Address::repeat_byte(2), Address::repeat_byte(3));
//! let relayer_address = Address::repeat_byte(0xee);
//!
//! // 1. Shared unit of work, token balances and the pool ledger
//! let uow = UnitOfWork::new();
//! let bank = TokenBank::new(&uow);
//! bank.mint(dai, user, Amount::new(200)).expect("mint");
//! let vault = InMemoryVault::new(&uow, Address::repeat_byte(0x0f), bank.clone(), SettlementPolicy::Rebalance);
//!
//! // 2. An asset manager investing DAI into a yield vault
//! let adapter = YieldVaultAdapter::new(&uow, Rc::clone(&bank), Address::repeat_byte(0x40), dai);
//! let manager = AssetManagerBuilder::new(Address::repeat_byte(0xa0))
//!     .underlying(dai)
//!     .reward_collector(Address::repeat_byte(0xfe))
//!     .rebalancer(relayer_address)
//!     .adapter(adapter)
//!     .ledger(vault.clone())
//!     .token_ledger(bank.clone())
//!     .unit_of_work(Rc::clone(&uow))
//!     .build()
//!     .expect("complete wiring");
//!
//! // 3. Register the pool, bind the manager and set an 80% target
//! let pool_id = vault
//!     .register_pool(owner, pool, relayer_address, vec![
//!         TokenRegistration::managed(dai, manager.clone()),
//!         TokenRegistration::plain(usdc),
//!     ])
//!     .expect("valid pool");
//! manager.initialize(pool_id).expect("first binding");
//! let config = InvestmentConfig::new(
//!     Fraction::new(800_000_000_000_000_000),
//!     Fraction::new(900_000_000_000_000_000),
//!     Fraction::new(700_000_000_000_000_000),
//! )
//! .expect("ordered");
//! vault
//!     .set_asset_manager_pool_config(&CallContext::new(owner), pool_id, dai, ConfigBlob::encode(&config))
//!     .expect("owner may configure");
//!
//! // 4. Join through the relayer; the vault rebalances on settlement
//! let relayer = Relayer::new(relayer_address, vault.clone(), Rc::clone(&uow));
//! vault.set_relayer_approval(&CallContext::new(user), relayer_address, true);
//! relayer
//!     .join_pool(&CallContext::new(user), pool_id, user, &JoinRequest::new(vec![Amount::new(200), Amount::ZERO]))
//!     .expect("join");
//!
//! let balances = manager.get_pool_balances(pool_id).expect("bound");
//! assert_eq!(balances.cash(), Amount::new(40));
//! assert_eq!(balances.managed(), Amount::new(160));
//! assert_eq!(bank.balance_of(dai, user), Amount::ZERO);
//! ```
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │    User      │  join / exit / claim
//! └──────┬──────┘
//!        ▼
//! ┌─────────────┐
//! │   Relayer    │  reentrancy lock + unit of work, capital_out before exit
//! └──────┬──────┘
//!        ▼
//! ┌─────────────┐
//! │   Ledger     │  cash accounting, settlement hooks
//! └──────┬──────┘
//!        │ AssetManagerHooks
//!        ▼
//! ┌─────────────┐
//! │ AssetManager │  target / band logic, delta-verified adapter calls
//! └──────┬──────┘
//!        ▼
//! ┌─────────────┐
//! │   Adapter    │  yield-bearing shares
//! └─────────────┘
//! ```
//!
//! # Module Guide
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`domain`] | Value types: [`Amount`](domain::Amount), [`Fraction`](domain::Fraction), [`PoolId`](domain::PoolId), [`CallContext`](domain::CallContext), etc. |
//! | [`math`] | Checked arithmetic and 256-bit `mul_div` with explicit rounding |
//! | [`config`] | [`InvestmentConfig`](config::InvestmentConfig), its packed [`ConfigBlob`](config::ConfigBlob) and per-pool store |
//! | [`traits`] | Collaborator abstractions: adapter, ledger, token ledger, asset manager hooks |
//! | [`unit_of_work`] | All-or-nothing scopes over savepointed state |
//! | [`manager`] | [`AssetManager`](manager::AssetManager) and its builder |
//! | [`relayer`] | [`Relayer`](relayer::Relayer) and its reentrancy lock |
//! | `sim` | In-memory collaborators (`in-memory` feature) |
//! | [`error`] | [`ManagerError`](error::ManagerError) unified error enum |
//! | [`prelude`] | Convenience re-exports for common types and traits |

pub mod config;
pub mod domain;
pub mod error;
pub mod manager;
pub mod math;
pub mod prelude;
pub mod relayer;
pub mod traits;
pub mod unit_of_work;

#[cfg(feature = "in-memory")]
pub mod sim;
