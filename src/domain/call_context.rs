//! Authenticated caller context for privileged operations.

use super::Address;

/// Who is calling, and for whom.
///
/// Every privileged operation takes a `CallContext` and checks it locally
/// against the roles fixed at construction. `sender` is the component or
/// account making the call. `on_behalf_of` is set when an intermediary
/// forwards a call: the ledger acting for a pool, or the relayer acting for
/// a user.
///
/// # Examples
///
/// ```
/// use hydra_asset_manager::domain::{Address, CallContext};
///
/// let relayer = Address::repeat_byte(0xee);
/// let user = Address::repeat_byte(0x01);
/// let ctx = CallContext::on_behalf_of(relayer, user);
/// assert_eq!(ctx.sender(), relayer);
/// assert_eq!(ctx.principal(), user);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CallContext {
    sender: Address,
    on_behalf_of: Option<Address>,
}

impl CallContext {
    /// A direct call from `sender`.
    #[must_use]
    pub const fn new(sender: Address) -> Self {
        Self {
            sender,
            on_behalf_of: None,
        }
    }

    /// A call forwarded by `sender` for `principal`.
    #[must_use]
    pub const fn on_behalf_of(sender: Address, principal: Address) -> Self {
        Self {
            sender,
            on_behalf_of: Some(principal),
        }
    }

    /// The immediate caller.
    #[must_use]
    pub const fn sender(&self) -> Address {
        self.sender
    }

    /// The forwarded-for principal, if any.
    #[must_use]
    pub const fn forwarded_for(&self) -> Option<Address> {
        self.on_behalf_of
    }

    /// The account the call ultimately acts for: the forwarded-for
    /// principal, or the sender for a direct call.
    #[must_use]
    pub const fn principal(&self) -> Address {
        match self.on_behalf_of {
            Some(principal) => principal,
            None => self.sender,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direct_call_principal_is_sender() {
        let ctx = CallContext::new(Address::repeat_byte(3));
        assert_eq!(ctx.principal(), Address::repeat_byte(3));
        assert_eq!(ctx.forwarded_for(), None);
    }

    #[test]
    fn forwarded_call_keeps_both() {
        let ctx = CallContext::on_behalf_of(Address::repeat_byte(1), Address::repeat_byte(2));
        assert_eq!(ctx.sender(), Address::repeat_byte(1));
        assert_eq!(ctx.forwarded_for(), Some(Address::repeat_byte(2)));
        assert_eq!(ctx.principal(), Address::repeat_byte(2));
    }
}
