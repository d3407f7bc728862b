//! Collaborator abstractions.
//!
//! The asset manager and the relayer never see concrete collaborators: they
//! are wired with `Rc<dyn Trait>` handles to an [`InvestmentAdapter`], a
//! [`Ledger`] and a [`TokenLedger`]. The ledger, in turn, calls back into
//! asset managers through [`AssetManagerHooks`]. Every stateful
//! collaborator implements [`Transactional`] so a
//! [`UnitOfWork`](crate::unit_of_work::UnitOfWork) can restore it.
//!
//! All methods take `&self`: call chains are reentrant (ledger → manager →
//! ledger), so implementors keep their state behind interior mutability and
//! never hold a borrow across a call to another collaborator.

mod adapter;
mod hooks;
mod ledger;
mod token_ledger;
mod transactional;

pub use adapter::{InvestmentAdapter, RewardSource};
pub use hooks::AssetManagerHooks;
pub use ledger::{
    BalanceOpKind, ExitOutcome, ExitRequest, JoinOutcome, JoinRequest, Ledger, PoolBalanceOp,
    PoolTokenInfo,
};
pub use token_ledger::TokenLedger;
pub use transactional::Transactional;
