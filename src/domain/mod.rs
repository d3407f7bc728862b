//! Fundamental domain value types used throughout the asset manager.
//!
//! This module contains the value types that model the reserve domain:
//! participant identities, pool ids, raw amounts, 18-decimal fractions,
//! the `(cash, managed)` balance pair and the authenticated call context.
//! All types are small `Copy` newtypes with checked arithmetic.

mod address;
mod amount;
mod call_context;
mod fraction;
mod pool_balances;
mod pool_id;

pub use address::Address;
pub use amount::{Amount, SignedAmount};
pub use call_context::CallContext;
pub use fraction::Fraction;
pub use pool_balances::PoolBalances;
pub use pool_id::PoolId;
