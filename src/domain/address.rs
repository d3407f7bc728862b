//! Chain-agnostic participant identities.

use core::fmt;

/// Writes `bytes` as a `0x`-prefixed lowercase hex string.
pub(crate) fn write_hex(f: &mut fmt::Formatter<'_>, bytes: &[u8]) -> fmt::Result {
    f.write_str("0x")?;
    for byte in bytes {
        write!(f, "{byte:02x}")?;
    }
    Ok(())
}

/// Identity of any participant: a token, a user, the ledger, an adapter,
/// an asset manager, the relayer or a reward collector.
///
/// Wraps a fixed-size `[u8; 32]`. The all-zero address is reserved to mean
/// "absent" and is rejected wherever a real participant is required.
///
/// # Examples
///
/// ```
/// use hydra_asset_manager::domain::Address;
///
/// let usdc = Address::repeat_byte(1);
/// assert!(!usdc.is_zero());
/// assert!(Address::zero().is_zero());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Address([u8; 32]);

impl Address {
    /// Creates an `Address` from raw bytes.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Creates an `Address` whose 32 bytes are all `byte`.
    #[must_use]
    pub const fn repeat_byte(byte: u8) -> Self {
        Self([byte; 32])
    }

    /// Returns the underlying 32-byte representation.
    #[must_use]
    pub const fn as_bytes(&self) -> [u8; 32] {
        self.0
    }

    /// Returns the all-zero (absent) address.
    #[must_use]
    pub const fn zero() -> Self {
        Self([0u8; 32])
    }

    /// Returns `true` for the all-zero address.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        let mut i = 0;
        while i < 32 {
            if self.0[i] != 0 {
                return false;
            }
            i += 1;
        }
        true
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_hex(f, &self.0)
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Address(")?;
        write_hex(f, &self.0)?;
        f.write_str(")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_detection() {
        assert!(Address::zero().is_zero());
        assert!(Address::default().is_zero());
        let mut bytes = [0u8; 32];
        bytes[31] = 1;
        assert!(!Address::from_bytes(bytes).is_zero());
    }

    #[test]
    fn repeat_byte_fills_every_byte() {
        assert_eq!(Address::repeat_byte(7).as_bytes(), [7u8; 32]);
    }

    #[test]
    fn display_is_hex() {
        let text = Address::repeat_byte(0xab).to_string();
        assert!(text.starts_with("0xabab"));
        assert_eq!(text.len(), 2 + 64);
    }

    #[test]
    fn debug_names_type() {
        let dbg = format!("{:?}", Address::zero());
        assert!(dbg.starts_with("Address(0x00"));
    }

    #[test]
    fn ordering_is_lexicographic() {
        assert!(Address::repeat_byte(1) < Address::repeat_byte(2));
    }
}
