//! Non-reentrant entry guard.

use std::cell::Cell;

use crate::error::{ManagerError, Result};

/// Single-holder lock for user-facing entry points.
///
/// [`acquire`](Self::acquire) flips the lock from idle to locked and hands
/// back a [`LockGuard`] that flips it back when dropped, on success, error
/// and unwind paths alike.
#[derive(Debug, Default)]
pub struct ReentrancyLock {
    locked: Cell<bool>,
}

impl ReentrancyLock {
    /// An idle lock.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            locked: Cell::new(false),
        }
    }

    /// Whether an entry point is currently in flight.
    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.locked.get()
    }

    /// Takes the lock.
    ///
    /// # Errors
    ///
    /// Returns [`ManagerError::Reentrancy`] if the lock is already held.
    pub fn acquire(&self) -> Result<LockGuard<'_>> {
        if self.locked.replace(true) {
            return Err(ManagerError::Reentrancy);
        }
        Ok(LockGuard { lock: self })
    }
}

/// Releases its [`ReentrancyLock`] on drop.
#[derive(Debug)]
#[must_use = "the lock is released as soon as the guard is dropped"]
pub struct LockGuard<'a> {
    lock: &'a ReentrancyLock,
}

impl Drop for LockGuard<'_> {
    fn drop(&mut self) {
        self.lock.locked.set(false);
    }
}
