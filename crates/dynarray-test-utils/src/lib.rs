//! Test fixtures for dynarray development.
//!
//! Provides [`Tracked`], an element type that reports its construction,
//! cloning and destruction to a shared [`DropLedger`], so tests can assert
//! that a container destroys every live element exactly once.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use std::fmt;
use std::rc::Rc;

#[derive(Default)]
struct LedgerState {
    next_id: Cell<u64>,
    live: RefCell<HashSet<u64>>,
    created: Cell<usize>,
    cloned: Cell<usize>,
    dropped: Cell<usize>,
    /// Clones remaining before `Tracked::clone` panics. `None` = unlimited.
    clone_budget: Cell<Option<usize>>,
}

/// Shared record of every [`Tracked`] value created from it.
///
/// Cheap to clone; all clones observe the same counters.
#[derive(Clone, Default)]
pub struct DropLedger {
    state: Rc<LedgerState>,
}

impl DropLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the `n`-th subsequent clone panic (0 = the very next one).
    pub fn fail_clone_after(&self, n: usize) {
        self.state.clone_budget.set(Some(n));
    }

    /// Construct a tracked value.
    pub fn track(&self, value: i32) -> Tracked {
        let id = self.state.next_id.get();
        self.state.next_id.set(id + 1);
        self.state.live.borrow_mut().insert(id);
        self.state.created.set(self.state.created.get() + 1);
        Tracked {
            id,
            value,
            ledger: self.clone(),
        }
    }

    /// Number of tracked values currently alive.
    pub fn live(&self) -> usize {
        self.state.live.borrow().len()
    }

    /// Total values constructed, including clones.
    pub fn created(&self) -> usize {
        self.state.created.get()
    }

    /// Total successful clones.
    pub fn cloned(&self) -> usize {
        self.state.cloned.get()
    }

    /// Total destructor runs.
    pub fn dropped(&self) -> usize {
        self.state.dropped.get()
    }

    /// Panics unless every created value has been dropped exactly once.
    pub fn assert_balanced(&self) {
        assert_eq!(
            self.live(),
            0,
            "leaked {} tracked values ({} created, {} dropped)",
            self.live(),
            self.created(),
            self.dropped()
        );
        assert_eq!(self.created(), self.dropped());
    }
}

impl fmt::Debug for DropLedger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DropLedger")
            .field("live", &self.live())
            .field("created", &self.created())
            .field("dropped", &self.dropped())
            .finish()
    }
}

/// Element whose lifetime is recorded in a [`DropLedger`].
///
/// Dropping the same instance twice panics with "double drop".
pub struct Tracked {
    id: u64,
    pub value: i32,
    ledger: DropLedger,
}

impl Tracked {
    /// Unique id assigned at construction (clones get fresh ids).
    pub fn id(&self) -> u64 {
        self.id
    }
}

impl Clone for Tracked {
    fn clone(&self) -> Self {
        let state = &self.ledger.state;
        if let Some(budget) = state.clone_budget.get() {
            if budget == 0 {
                panic!("clone budget exhausted");
            }
            state.clone_budget.set(Some(budget - 1));
        }
        state.cloned.set(state.cloned.get() + 1);
        self.ledger.track(self.value)
    }
}

impl Drop for Tracked {
    fn drop(&mut self) {
        let state = &self.ledger.state;
        let was_live = state.live.borrow_mut().remove(&self.id);
        assert!(was_live, "double drop of tracked value {}", self.id);
        state.dropped.set(state.dropped.get() + 1);
    }
}

impl PartialEq for Tracked {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl fmt::Debug for Tracked {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tracked({})", self.value)
    }
}
