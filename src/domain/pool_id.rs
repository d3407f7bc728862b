//! Pool identifiers.

use core::fmt;

use super::address::write_hex;
use super::Address;

/// Opaque 32-byte identifier binding a pool instance to its registered tokens.
///
/// The all-zero id is "empty" and never names a real pool.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PoolId([u8; 32]);

impl PoolId {
    /// The empty pool id.
    pub const EMPTY: Self = Self([0u8; 32]);

    /// Creates a `PoolId` from raw bytes.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Derives a pool id from the pool's address and a registration nonce.
    ///
    /// The first 24 bytes come from the pool address, the last 8 hold the
    /// nonce in big-endian order, so two registrations never collide.
    #[must_use]
    pub fn derive(pool_address: Address, nonce: u64) -> Self {
        let mut bytes = pool_address.as_bytes();
        bytes[24..].copy_from_slice(&nonce.to_be_bytes());
        Self(bytes)
    }

    /// Returns the underlying 32-byte representation.
    #[must_use]
    pub const fn as_bytes(&self) -> [u8; 32] {
        self.0
    }

    /// Returns `true` for the empty id.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0 == [0u8; 32]
    }
}

impl fmt::Display for PoolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_hex(f, &self.0)
    }
}

impl fmt::Debug for PoolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PoolId(")?;
        write_hex(f, &self.0)?;
        f.write_str(")")
    }
}
