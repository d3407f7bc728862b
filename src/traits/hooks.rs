//! The asset manager as seen by the ledger and the relayer.

use crate::config::ConfigBlob;
use crate::domain::{Address, Amount, CallContext, PoolId};
use crate::error::Result;

/// Callbacks a ledger or relayer may invoke on a pool token's asset manager.
///
/// Object safe, so a ledger can hold managers of different concrete types
/// behind `Rc<dyn AssetManagerHooks>`.
pub trait AssetManagerHooks {
    /// Identity of the asset manager.
    fn address(&self) -> Address;

    /// Moves capital between cash and the adapter toward the target.
    ///
    /// # Errors
    ///
    /// Lifecycle, arithmetic and adapter failures.
    fn rebalance(&self, pool_id: PoolId, force: bool) -> Result<()>;

    /// Reports the live managed balance to the ledger and returns it.
    ///
    /// # Errors
    ///
    /// Lifecycle and ledger failures.
    fn update_balance_of_pool(&self, pool_id: PoolId) -> Result<Amount>;

    /// Divests exactly `amount` back into cash.
    ///
    /// # Errors
    ///
    /// `Unauthorized` for a non-rebalancer, `AdapterShortfall` if the adapter
    /// pays less than `amount`.
    fn capital_out(&self, ctx: &CallContext, pool_id: PoolId, amount: Amount) -> Result<()>;

    /// Harvests adapter rewards and forwards them to the reward collector.
    ///
    /// # Errors
    ///
    /// Reward source and token ledger failures.
    fn claim_rewards(&self) -> Result<Amount>;

    /// Stores a packed investment config for `pool_id`.
    ///
    /// # Errors
    ///
    /// `Unauthorized` unless the ledger forwards for the pool,
    /// `ConfigInvalid` or `InvalidArgument` for a bad blob.
    fn set_config(&self, ctx: &CallContext, pool_id: PoolId, blob: ConfigBlob) -> Result<()>;
}
