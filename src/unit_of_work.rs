//! All-or-nothing execution across collaborators.
//!
//! A [`UnitOfWork`] is shared by every stateful component of one deployment
//! (token bank, ledger, adapters, asset managers). Components enlist
//! themselves at construction; [`UnitOfWork::run`] then brackets an
//! operation with a savepoint on every live participant and either releases
//! the savepoints (the operation returned `Ok`) or restores them (it
//! returned `Err`, or unwound).
//!
//! Scopes nest. A failing inner scope restores the inner savepoints and
//! hands the error to the outer closure, which normally propagates it with
//! `?` and so restores the outer savepoints as well.
//!
//! # Examples
//!
//! ```
//! use std::rc::Rc;
//!
//! use hydra_asset_manager::error::ManagerError;
//! use hydra_asset_manager::unit_of_work::{UnitOfWork, Versioned};
//!
//! let uow = UnitOfWork::new();
//! let counter = Rc::new(Versioned::new(1u32));
//! uow.enlist(&counter);
//!
//! let failed: Result<(), ManagerError> = uow.run(|| {
//!     counter.update(|n| *n = 2);
//!     Err(ManagerError::Reentrancy)
//! });
//! assert!(failed.is_err());
//! assert_eq!(counter.get(), 1);
//! ```

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use tracing::debug;

use crate::error::Result;
use crate::traits::Transactional;

/// A value with a stack of savepoints.
///
/// The building block the in-memory components use for their state. Reads
/// and writes go through short closures so no borrow outlives the call.
#[derive(Debug, Default)]
pub struct Versioned<T: Clone> {
    current: RefCell<T>,
    savepoints: RefCell<Vec<T>>,
}

impl<T: Clone> Versioned<T> {
    /// Wraps an initial value with no savepoints.
    pub fn new(value: T) -> Self {
        Self {
            current: RefCell::new(value),
            savepoints: RefCell::new(Vec::new()),
        }
    }

    /// Runs `f` against the current value.
    pub fn read<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.current.borrow())
    }

    /// Runs `f` against the current value, mutably.
    pub fn update<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        f(&mut self.current.borrow_mut())
    }

    /// Number of open savepoints.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.savepoints.borrow().len()
    }
}

impl<T: Clone + Copy> Versioned<T> {
    /// Copy of the current value.
    #[must_use]
    pub fn get(&self) -> T {
        *self.current.borrow()
    }
}

impl<T: Clone> Transactional for Versioned<T> {
    fn begin(&self) {
        let snapshot = self.current.borrow().clone();
        self.savepoints.borrow_mut().push(snapshot);
    }

    fn commit(&self) {
        self.savepoints.borrow_mut().pop();
    }

    fn rollback(&self) {
        let restored = self.savepoints.borrow_mut().pop();
        if let Some(snapshot) = restored {
            *self.current.borrow_mut() = snapshot;
        }
    }
}

/// Shared all-or-nothing scope over enlisted participants.
#[derive(Default)]
pub struct UnitOfWork {
    participants: RefCell<Vec<Weak<dyn Transactional>>>,
    depth: Cell<usize>,
}

impl UnitOfWork {
    /// Creates an empty unit of work.
    #[must_use]
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    /// Enlists `participant`. Only a weak handle is kept, so dropping the
    /// participant removes it.
    pub fn enlist<P: Transactional + 'static>(&self, participant: &Rc<P>) {
        let weak = Rc::downgrade(participant);
        let weak: Weak<dyn Transactional> = weak;
        let mut participants = self.participants.borrow_mut();
        participants.retain(|p| p.strong_count() > 0);
        participants.push(weak);
    }

    /// Number of live participants.
    #[must_use]
    pub fn participant_count(&self) -> usize {
        self.participants
            .borrow()
            .iter()
            .filter(|p| p.strong_count() > 0)
            .count()
    }

    /// Nesting depth of the scope currently executing, `0` outside any.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.depth.get()
    }

    /// Runs `f` inside a new scope.
    ///
    /// # Errors
    ///
    /// Returns whatever `f` returns; on `Err` every participant that was
    /// live on entry is restored first.
    pub fn run<T>(&self, f: impl FnOnce() -> Result<T>) -> Result<T> {
        let scope = Scope::open(self);
        let outcome = f();
        match &outcome {
            Ok(_) => scope.commit(),
            Err(err) => {
                debug!(depth = self.depth.get(), %err, "unit of work rolled back");
                drop(scope);
            }
        }
        outcome
    }

    fn live_participants(&self) -> Vec<Rc<dyn Transactional>> {
        self.participants
            .borrow()
            .iter()
            .filter_map(Weak::upgrade)
            .collect()
    }
}

impl core::fmt::Debug for UnitOfWork {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("UnitOfWork")
            .field("participants", &self.participant_count())
            .field("depth", &self.depth.get())
            .finish()
    }
}

/// One open savepoint level. Restores on drop unless committed.
struct Scope<'a> {
    uow: &'a UnitOfWork,
    participants: Vec<Rc<dyn Transactional>>,
    committed: bool,
}

impl<'a> Scope<'a> {
    fn open(uow: &'a UnitOfWork) -> Self {
        let participants = uow.live_participants();
        for participant in &participants {
            participant.begin();
        }
        uow.depth.set(uow.depth.get() + 1);
        Self {
            uow,
            participants,
            committed: false,
        }
    }

    fn commit(mut self) {
        for participant in self.participants.iter().rev() {
            participant.commit();
        }
        self.committed = true;
    }
}

impl Drop for Scope<'_> {
    fn drop(&mut self) {
        if !self.committed {
            for participant in self.participants.iter().rev() {
                participant.rollback();
            }
        }
        self.uow.depth.set(self.uow.depth.get().saturating_sub(1));
    }
}
