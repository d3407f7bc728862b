//! Fungible token balances.

use crate::domain::{Address, Amount};
use crate::error::Result;

/// Balance sheet for every token the asset manager touches.
///
/// The asset manager reads it to verify adapter behaviour by balance delta
/// and writes it only to forward harvested rewards.
pub trait TokenLedger {
    /// Balance of `token` held by `holder`.
    fn balance_of(&self, token: Address, holder: Address) -> Amount;

    /// Moves `amount` of `token` from `from` to `to`.
    ///
    /// # Errors
    ///
    /// Returns `InsufficientBalance` if `from` holds less than `amount`.
    fn transfer(&self, token: Address, from: Address, to: Address, amount: Amount) -> Result<()>;
}
