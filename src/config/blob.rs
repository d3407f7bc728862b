//! Packed wire form of an [`InvestmentConfig`].
//!
//! The ledger and the asset manager exchange configs as one opaque 32-byte
//! value:
//!
//! ```text
//! bytes  0..8   target           (u64, big-endian)
//! bytes  8..16  upper critical   (u64, big-endian)
//! bytes 16..24  lower critical   (u64, big-endian)
//! bytes 24..32  reserved, must be zero
//! ```

use core::fmt;

use super::InvestmentConfig;
use crate::domain::Fraction;
use crate::error::{ManagerError, Result};

const WORD: usize = 8;

/// A bit-packed [`InvestmentConfig`].
///
/// # Examples
///
/// ```
/// use hydra_asset_manager::config::{ConfigBlob, InvestmentConfig};
/// use hydra_asset_manager::domain::Fraction;
///
/// let cfg = InvestmentConfig::new(
///     Fraction::new(600_000_000_000_000_000),
///     Fraction::new(700_000_000_000_000_000),
///     Fraction::new(400_000_000_000_000_000),
/// )
/// .expect("ordered");
/// let blob = ConfigBlob::encode(&cfg);
/// assert_eq!(blob.decode().expect("valid blob"), cfg);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ConfigBlob([u8; 32]);

impl ConfigBlob {
    /// Wraps raw bytes received from a ledger.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Returns the raw bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> [u8; 32] {
        self.0
    }

    /// Packs a config.
    #[must_use]
    pub fn encode(config: &InvestmentConfig) -> Self {
        let mut bytes = [0u8; 32];
        bytes[..WORD].copy_from_slice(&config.target().get().to_be_bytes());
        bytes[WORD..2 * WORD].copy_from_slice(&config.upper_critical().get().to_be_bytes());
        bytes[2 * WORD..3 * WORD].copy_from_slice(&config.lower_critical().get().to_be_bytes());
        Self(bytes)
    }

    /// Unpacks and validates the config.
    ///
    /// # Errors
    ///
    /// - [`ManagerError::InvalidArgument`] if the reserved bytes are not zero.
    /// - [`ManagerError::ConfigInvalid`] if the unpacked thresholds are not
    ///   ordered.
    pub fn decode(&self) -> Result<InvestmentConfig> {
        if self.0[3 * WORD..].iter().any(|b| *b != 0) {
            return Err(ManagerError::InvalidArgument(
                "config blob reserved bytes must be zero",
            ));
        }
        InvestmentConfig::new(
            Fraction::new(self.word(0)),
            Fraction::new(self.word(1)),
            Fraction::new(self.word(2)),
        )
    }

    fn word(&self, index: usize) -> u64 {
        let mut word = [0u8; WORD];
        word.copy_from_slice(&self.0[index * WORD..(index + 1) * WORD]);
        u64::from_be_bytes(word)
    }
}

impl From<InvestmentConfig> for ConfigBlob {
    fn from(config: InvestmentConfig) -> Self {
        Self::encode(&config)
    }
}

impl fmt::Debug for ConfigBlob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigBlob")
            .field("target", &self.word(0))
            .field("upper_critical", &self.word(1))
            .field("lower_critical", &self.word(2))
            .finish()
    }
}
