//! Investment adapter capability set.
//!
//! An [`InvestmentAdapter`] is the external yield-bearing sink the asset
//! manager delegates capital to. It is **untrusted**: the asset manager
//! never relies on the values it returns and instead verifies every
//! deposit and redemption by observing share and token balance deltas.
//!
//! # Share Accounting
//!
//! Deposits mint shares to the depositor; redemptions burn shares and pay
//! out underlying tokens. The value of a share block is reported by
//! [`InvestmentAdapter::value_of`] at the adapter's current exchange rate,
//! so the managed balance of a holder is always
//!
//! ```text
//! managed = value_of(share_balance(holder))
//! ```

use crate::domain::{Address, Amount};
use crate::error::Result;

/// Yield-bearing vault that accepts underlying tokens in exchange for shares.
///
/// # Implementors
///
/// - `YieldVaultAdapter`: share vault with an accruing exchange rate and
///   an optional reward stream.
/// - `MockAdapter`: 1:1 adapter with injectable faults.
///
/// # Errors
///
/// Methods that move value return [`Result`]; an adapter may fail for its
/// own reasons (insufficient balance, paused strategy). The asset manager
/// propagates such failures unchanged.
pub trait InvestmentAdapter {
    /// Identity of the adapter in the token ledger.
    fn address(&self) -> Address;

    /// Token accepted by [`deposit`](Self::deposit) and paid out by
    /// [`redeem`](Self::redeem).
    fn underlying(&self) -> Address;

    /// Pulls `amount` underlying from `depositor` and mints shares to it.
    ///
    /// Returns the number of shares the adapter *claims* to have minted.
    ///
    /// # Errors
    ///
    /// Propagates token-ledger failures (e.g. insufficient balance).
    fn deposit(&self, depositor: Address, amount: Amount) -> Result<Amount>;

    /// Shares a deposit of `amount` would mint right now.
    ///
    /// Zero means the amount is worth less than one share.
    ///
    /// # Errors
    ///
    /// Returns an arithmetic error if the conversion overflows.
    fn preview_deposit(&self, amount: Amount) -> Result<Amount>;

    /// Burns `shares` from `holder` and pays the underlying back to it.
    ///
    /// Returns the amount the adapter *claims* to have paid.
    ///
    /// # Errors
    ///
    /// Fails if `holder` owns fewer than `shares`.
    fn redeem(&self, holder: Address, shares: Amount) -> Result<Amount>;

    /// Shares currently held by `holder`.
    fn share_balance(&self, holder: Address) -> Amount;

    /// Underlying value of `shares` at the current exchange rate.
    ///
    /// # Errors
    ///
    /// Returns an arithmetic error if the conversion overflows.
    fn value_of(&self, shares: Amount) -> Result<Amount>;

    /// Optional incentive-reward stream attached to the adapter.
    fn reward_source(&self) -> Option<&dyn RewardSource> {
        None
    }
}

/// Incentive rewards paid on top of the adapter's yield.
pub trait RewardSource {
    /// Token the rewards are paid in.
    fn reward_token(&self) -> Address;

    /// Pays all rewards accrued for `holder` to `holder`.
    ///
    /// Returns the amount the source *claims* to have paid.
    ///
    /// # Errors
    ///
    /// Propagates token-ledger failures.
    fn harvest(&self, holder: Address) -> Result<Amount>;
}
