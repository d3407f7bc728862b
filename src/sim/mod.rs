//! In-memory collaborators.
//!
//! Concrete implementations of the collaborator traits, enlisted in a
//! shared [`UnitOfWork`](crate::unit_of_work::UnitOfWork), for wiring a
//! complete deployment without a chain:
//!
//! | Type | Implements |
//! |------|------------|
//! | [`TokenBank`] | `TokenLedger` |
//! | [`InMemoryVault`] | `Ledger` |
//! | [`YieldVaultAdapter`] | `InvestmentAdapter`, `RewardSource` |
//! | [`MockAdapter`] | `InvestmentAdapter`, `RewardSource`, with [`AdapterFault`]s |

mod mock_adapter;
mod token_bank;
mod vault;
mod yield_vault;

pub use mock_adapter::{AdapterFault, MockAdapter};
pub use token_bank::TokenBank;
pub use vault::{InMemoryVault, SettlementPolicy, TokenRegistration};
pub use yield_vault::YieldVaultAdapter;
