//! The rebalancing asset manager.
//!
//! An [`AssetManager`] serves one token of one pool. It is built once with
//! an [`AssetManagerBuilder`], bound to its pool with
//! [`initialize`](AssetManager::initialize), configured by the ledger with a
//! packed [`ConfigBlob`](crate::config::ConfigBlob), and from then on keeps
//! `target` of the pool's total invested:
//!
//! ```text
//! total      = cash + managed
//! delta      = total * target - managed
//! delta > 0  → invest  min(delta, cash)
//! delta < 0  → divest  min(-delta, managed)
//! ```
//!
//! A non-forced rebalance only acts when `cash / total` falls outside
//! `[lower_critical, upper_critical]`.

mod asset_manager;
mod builder;

#[cfg(all(test, feature = "in-memory"))]
mod proptest_properties;

pub use asset_manager::{AssetManager, Lifecycle};
pub use builder::AssetManagerBuilder;
