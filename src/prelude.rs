//! Convenience re-exports for common types and traits.
//!
//! The prelude provides a single import to bring all commonly used items
//! into scope:
//!
//! ```rust
//! use hydra_asset_manager::prelude::*;
//! ```

// Re-export domain types
pub use crate::domain::{
    Address, Amount, CallContext, Fraction, PoolBalances, PoolId, SignedAmount,
};

// Re-export core traits
pub use crate::traits::{
    AssetManagerHooks, ExitRequest, InvestmentAdapter, JoinRequest, Ledger, RewardSource,
    TokenLedger, Transactional,
};

// Re-export math utilities
pub use crate::math::{CheckedArithmetic, Rounding};

// Re-export configuration
pub use crate::config::{ConfigBlob, InvestmentConfig};

// Re-export error types
pub use crate::error::{ManagerError, Result};

// Re-export engine and wrapper
pub use crate::manager::{AssetManager, AssetManagerBuilder, Lifecycle};
pub use crate::relayer::Relayer;
pub use crate::unit_of_work::UnitOfWork;
