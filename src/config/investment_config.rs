//! Target and critical thresholds for one managed pool token.

use core::fmt;

use crate::domain::Fraction;
use crate::error::{ManagerError, Result};

/// Which ordering bound an [`InvestmentConfig`] violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigBound {
    /// `lower_critical > target`.
    LowerAboveTarget,
    /// `target > upper_critical`.
    TargetAboveUpper,
    /// `upper_critical > 1e18`.
    UpperAboveOne,
}

impl fmt::Display for ConfigBound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::LowerAboveTarget => "lower critical percentage exceeds target",
            Self::TargetAboveUpper => "target percentage exceeds upper critical",
            Self::UpperAboveOne => "upper critical percentage exceeds 100%",
        })
    }
}

/// Investment thresholds for one pool token.
///
/// - `target`: share of the pool's total to keep invested in the adapter.
/// - `upper_critical` / `lower_critical`: band on the cash share outside
///   of which a non-forced rebalance acts.
///
/// # Validation
///
/// `0 ≤ lower_critical ≤ target ≤ upper_critical ≤ 1e18`. The default
/// config is all zeros, which never invests.
///
/// # Examples
///
/// ```
/// use hydra_asset_manager::config::InvestmentConfig;
/// use hydra_asset_manager::domain::Fraction;
///
/// let cfg = InvestmentConfig::new(
///     Fraction::new(600_000_000_000_000_000),
///     Fraction::new(700_000_000_000_000_000),
///     Fraction::new(400_000_000_000_000_000),
/// )
/// .expect("ordered thresholds");
/// assert_eq!(cfg.target().get(), 600_000_000_000_000_000);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "UncheckedConfig"))]
pub struct InvestmentConfig {
    target: Fraction,
    upper_critical: Fraction,
    lower_critical: Fraction,
}

/// Wire form accepted by `Deserialize`, validated through
/// [`InvestmentConfig::new`].
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct UncheckedConfig {
    target: Fraction,
    upper_critical: Fraction,
    lower_critical: Fraction,
}

#[cfg(feature = "serde")]
impl TryFrom<UncheckedConfig> for InvestmentConfig {
    type Error = ManagerError;

    fn try_from(raw: UncheckedConfig) -> Result<Self> {
        Self::new(raw.target, raw.upper_critical, raw.lower_critical)
    }
}

impl InvestmentConfig {
    /// Creates a validated config.
    ///
    /// # Errors
    ///
    /// Returns [`ManagerError::ConfigInvalid`] naming the first violated
    /// bound, checked from the top: `upper ≤ 1`, then `target ≤ upper`,
    /// then `lower ≤ target`.
    pub fn new(target: Fraction, upper_critical: Fraction, lower_critical: Fraction) -> Result<Self> {
        let config = Self {
            target,
            upper_critical,
            lower_critical,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validates the ordering invariant.
    ///
    /// # Errors
    ///
    /// Returns [`ManagerError::ConfigInvalid`] with the violated bound.
    pub fn validate(&self) -> Result<()> {
        if !self.upper_critical.is_valid_percent() {
            return Err(ManagerError::ConfigInvalid(ConfigBound::UpperAboveOne));
        }
        if self.target > self.upper_critical {
            return Err(ManagerError::ConfigInvalid(ConfigBound::TargetAboveUpper));
        }
        if self.lower_critical > self.target {
            return Err(ManagerError::ConfigInvalid(ConfigBound::LowerAboveTarget));
        }
        Ok(())
    }

    /// Target invested share of the pool total.
    #[must_use]
    pub const fn target(&self) -> Fraction {
        self.target
    }

    /// Upper edge of the cash-share band.
    #[must_use]
    pub const fn upper_critical(&self) -> Fraction {
        self.upper_critical
    }

    /// Lower edge of the cash-share band.
    #[must_use]
    pub const fn lower_critical(&self) -> Fraction {
        self.lower_critical
    }

    /// Returns `true` if `cash_fraction` lies outside the critical band.
    #[must_use]
    pub fn is_outside_band(&self, cash_fraction: Fraction) -> bool {
        cash_fraction < self.lower_critical || cash_fraction > self.upper_critical
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn pct(p: u64) -> Fraction {
        Fraction::new(p * 10_000_000_000_000_000)
    }

    #[test]
    fn valid_config() {
        let Ok(cfg) = InvestmentConfig::new(pct(60), pct(70), pct(40)) else {
            panic!("expected Ok");
        };
        assert_eq!(cfg.target(), pct(60));
        assert_eq!(cfg.upper_critical(), pct(70));
        assert_eq!(cfg.lower_critical(), pct(40));
    }

    #[test]
    fn all_equal_is_valid() {
        assert!(InvestmentConfig::new(pct(50), pct(50), pct(50)).is_ok());
        assert!(InvestmentConfig::new(pct(100), pct(100), pct(100)).is_ok());
    }

    #[test]
    fn default_never_invests() {
        let cfg = InvestmentConfig::default();
        assert_eq!(cfg.target(), Fraction::ZERO);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn lower_above_target_rejected() {
        assert_eq!(
            InvestmentConfig::new(pct(50), pct(70), pct(60)),
            Err(ManagerError::ConfigInvalid(ConfigBound::LowerAboveTarget))
        );
    }

    #[test]
    fn target_above_upper_rejected() {
        assert_eq!(
            InvestmentConfig::new(pct(80), pct(70), pct(40)),
            Err(ManagerError::ConfigInvalid(ConfigBound::TargetAboveUpper))
        );
    }

    #[test]
    fn upper_above_one_rejected() {
        let above_one = Fraction::new(Fraction::ONE.get() + 1);
        assert_eq!(
            InvestmentConfig::new(pct(80), above_one, pct(40)),
            Err(ManagerError::ConfigInvalid(ConfigBound::UpperAboveOne))
        );
    }

    #[test]
    fn band_edges_are_inside() {
        let Ok(cfg) = InvestmentConfig::new(pct(60), pct(70), pct(40)) else {
            panic!("expected Ok");
        };
        assert!(!cfg.is_outside_band(pct(40)));
        assert!(!cfg.is_outside_band(pct(70)));
        assert!(cfg.is_outside_band(pct(39)));
        assert!(cfg.is_outside_band(pct(71)));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serde_roundtrip() {
        let Ok(cfg) = InvestmentConfig::new(pct(60), pct(70), pct(40)) else {
            panic!("expected Ok");
        };
        let Ok(json) = serde_json::to_string(&cfg) else {
            panic!("expected serialization");
        };
        let Ok(back) = serde_json::from_str::<InvestmentConfig>(&json) else {
            panic!("expected deserialization");
        };
        assert_eq!(back, cfg);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serde_rejects_unordered() {
        let json = r#"{"target":800000000000000000,"upper_critical":700000000000000000,"lower_critical":0}"#;
        assert!(serde_json::from_str::<InvestmentConfig>(json).is_err());
    }
}
