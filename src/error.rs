//! Unified error types for the asset manager library.
//!
//! All fallible operations across the crate return [`ManagerError`] as their
//! error type, ensuring a consistent error handling experience for consumers.
//!
//! Every error is terminal for the operation that raised it: nothing in this
//! crate retries, and the enclosing [`UnitOfWork`](crate::unit_of_work::UnitOfWork)
//! restores all balances touched by the failed operation.

use crate::config::ConfigBound;
use crate::domain::{Address, Amount, PoolId};

/// Crate-wide error type.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ManagerError {
    /// An investment config broke the `lower ≤ target ≤ upper ≤ 1` ordering.
    #[error("invalid investment config: {0}")]
    ConfigInvalid(ConfigBound),

    /// `initialize` was called on an asset manager that is already bound.
    #[error("asset manager is already initialized")]
    AlreadyInitialized,

    /// An operation other than `initialize` reached an unbound asset manager.
    #[error("asset manager is not initialized")]
    NotInitialized,

    /// The pool id passed in is not the one the asset manager is bound to.
    #[error("pool id mismatch: bound to {expected}, called with {actual}")]
    PoolIdMismatch {
        /// The pool id fixed at initialization.
        expected: PoolId,
        /// The pool id supplied by the caller.
        actual: PoolId,
    },

    /// The caller does not hold the role required by the operation.
    #[error("unauthorized caller {caller}: {action}")]
    Unauthorized {
        /// Authenticated sender of the rejected call.
        caller: Address,
        /// The access rule the caller failed.
        action: &'static str,
    },

    /// The investment adapter moved less value than it was asked to.
    #[error("adapter shortfall: {0}")]
    AdapterShortfall(&'static str),

    /// A relayer entry point was called while another one was in flight.
    #[error("reentrant call rejected")]
    Reentrancy,

    /// A supplied argument or construction-time reference is invalid.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    /// Arithmetic overflow.
    #[error("arithmetic overflow: {0}")]
    Overflow(&'static str),

    /// Arithmetic underflow.
    #[error("arithmetic underflow: {0}")]
    Underflow(&'static str),

    /// Division by zero.
    #[error("division by zero")]
    DivisionByZero,

    /// A holder tried to move more tokens (or shares) than it owns.
    #[error("insufficient balance of {token} for {holder}: needed {needed}, available {available}")]
    InsufficientBalance {
        /// Token (or share class) being moved.
        token: Address,
        /// Holder whose balance is short.
        holder: Address,
        /// Amount requested.
        needed: Amount,
        /// Amount actually held.
        available: Amount,
    },

    /// The ledger has no pool registered under this id.
    #[error("unknown pool {0}")]
    UnknownPool(PoolId),

    /// The token is not registered in the given pool.
    #[error("token {token} is not registered in pool {pool_id}")]
    UnknownToken {
        /// Pool that was queried.
        pool_id: PoolId,
        /// Token that was not found.
        token: Address,
    },
}

/// Convenience alias used throughout the crate.
pub type Result<T, E = ManagerError> = core::result::Result<T, E>;
