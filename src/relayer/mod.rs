//! Reentrancy-safe wrapper around pool joins and exits.
//!
//! The [`Relayer`] is the user-facing surface. Each entry point takes the
//! [`ReentrancyLock`], runs inside the shared unit of work, and forwards to
//! the ledger with a [`CallContext`](crate::domain::CallContext) whose
//! sender is the relayer and whose principal is the user.

mod lock;
#[allow(clippy::module_inception)]
mod relayer;

pub use lock::{LockGuard, ReentrancyLock};
pub use relayer::Relayer;
