//! Savepoint protocol for unit-of-work participants.

/// State that can be checkpointed and restored.
///
/// Calls always nest: every [`begin`](Self::begin) is matched by exactly
/// one [`commit`](Self::commit) or [`rollback`](Self::rollback), innermost
/// first.
pub trait Transactional {
    /// Pushes a savepoint of the current state.
    fn begin(&self);

    /// Drops the innermost savepoint, keeping the current state.
    fn commit(&self);

    /// Restores the state captured by the innermost savepoint.
    fn rollback(&self);
}
