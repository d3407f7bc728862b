//! Per-pool storage of investment configs.

use std::collections::HashMap;

use super::InvestmentConfig;
use crate::domain::PoolId;
use crate::error::Result;

/// Investment configs keyed by pool id.
///
/// Writes validate the ordering invariant before touching the map, so a
/// rejected write leaves the previous config in place. Reads of a pool that
/// was never configured return the all-zero default.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigStore {
    configs: HashMap<PoolId, InvestmentConfig>,
}

impl ConfigStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `config` for `pool_id`.
    ///
    /// # Errors
    ///
    /// Returns [`ManagerError::ConfigInvalid`](crate::error::ManagerError::ConfigInvalid)
    /// if the thresholds are not ordered.
    pub fn set(&mut self, pool_id: PoolId, config: InvestmentConfig) -> Result<()> {
        config.validate()?;
        self.configs.insert(pool_id, config);
        Ok(())
    }

    /// Returns the config for `pool_id`, or the default if none was set.
    #[must_use]
    pub fn get(&self, pool_id: PoolId) -> InvestmentConfig {
        self.configs.get(&pool_id).copied().unwrap_or_default()
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::Fraction;

    fn pct(p: u64) -> Fraction {
        Fraction::new(p * 10_000_000_000_000_000)
    }

    fn pool() -> PoolId {
        PoolId::from_bytes([7u8; 32])
    }

    #[test]
    fn unset_pool_reads_default() {
        assert_eq!(ConfigStore::new().get(pool()), InvestmentConfig::default());
    }

    #[test]
    fn set_then_get() {
        let mut store = ConfigStore::new();
        let Ok(cfg) = InvestmentConfig::new(pct(60), pct(70), pct(40)) else {
            panic!("expected Ok");
        };
        assert!(store.set(pool(), cfg).is_ok());
        assert_eq!(store.get(pool()), cfg);
    }

    #[test]
    fn overwrite_replaces_previous() {
        let mut store = ConfigStore::new();
        let Ok(first) = InvestmentConfig::new(pct(60), pct(70), pct(40)) else {
            panic!("expected Ok");
        };
        let Ok(second) = InvestmentConfig::new(pct(30), pct(50), pct(10)) else {
            panic!("expected Ok");
        };
        assert!(store.set(pool(), first).is_ok());
        assert!(store.set(pool(), second).is_ok());
        assert_eq!(store.get(pool()), second);
    }

    #[test]
    fn configs_are_per_pool() {
        let mut store = ConfigStore::new();
        let Ok(cfg) = InvestmentConfig::new(pct(60), pct(70), pct(40)) else {
            panic!("expected Ok");
        };
        assert!(store.set(pool(), cfg).is_ok());
        let other = PoolId::from_bytes([8u8; 32]);
        assert_eq!(store.get(other), InvestmentConfig::default());
    }
}
