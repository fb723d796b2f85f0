//! Snapshot stacks behind helper undo, breakpoint and rollback

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// A stack of immutable state snapshots.
///
/// The bottom snapshot is the initial state and is never popped. Snapshots
/// are shared through `Rc` so a [`StateView`] handed to another helper always
/// sees the current top of the stack.
pub struct History<S> {
    snapshots: Rc<RefCell<Vec<Rc<S>>>>,
    breakpoints: HashMap<String, usize>,
}

impl<S> History<S> {
    pub fn new(initial: S) -> Self {
        Self {
            snapshots: Rc::new(RefCell::new(vec![Rc::new(initial)])),
            breakpoints: HashMap::new(),
        }
    }

    pub fn current(&self) -> Rc<S> {
        let snapshots = self.snapshots.borrow();
        Rc::clone(&snapshots[snapshots.len() - 1])
    }

    /// Push a new snapshot
    pub fn set(&mut self, state: S) {
        self.snapshots.borrow_mut().push(Rc::new(state));
    }

    /// Number of snapshots, the initial one included
    pub fn depth(&self) -> usize {
        self.snapshots.borrow().len()
    }

    /// Pop the top snapshot. Returns false when only the initial one is left.
    ///
    /// Breakpoints recorded above the new top are dropped: the snapshot they
    /// named is gone, and a later `set` must not stand in for it.
    pub fn undo(&mut self) -> bool {
        let depth = {
            let mut snapshots = self.snapshots.borrow_mut();
            if snapshots.len() <= 1 {
                return false;
            }
            snapshots.pop();
            snapshots.len()
        };
        self.breakpoints.retain(|_, recorded| *recorded <= depth);
        true
    }

    /// Record the current depth under `name`, replacing an earlier record
    pub fn breakpoint(&mut self, name: &str) {
        let depth = self.depth();
        self.breakpoints.insert(name.to_string(), depth);
    }

    pub fn has_breakpoint(&self, name: &str) -> bool {
        self.breakpoints.contains_key(name)
    }

    /// Truncate to the depth recorded under `name`.
    ///
    /// Breakpoints recorded deeper than the target are dropped; the target
    /// itself stays so the same rollback can be repeated.
    pub fn rollback(&mut self, name: &str) -> bool {
        let Some(&depth) = self.breakpoints.get(name) else {
            return false;
        };
        self.snapshots.borrow_mut().truncate(depth);
        self.breakpoints.retain(|_, recorded| *recorded <= depth);
        true
    }

    /// Read-only handle on the live stack
    pub fn view(&self) -> StateView<S> {
        StateView {
            snapshots: Rc::clone(&self.snapshots),
        }
    }
}

impl<S: Default> Default for History<S> {
    fn default() -> Self {
        Self::new(S::default())
    }
}

/// Read-only access to another helper's current state
pub struct StateView<S> {
    snapshots: Rc<RefCell<Vec<Rc<S>>>>,
}

impl<S> StateView<S> {
    pub fn current(&self) -> Rc<S> {
        let snapshots = self.snapshots.borrow();
        Rc::clone(&snapshots[snapshots.len() - 1])
    }
}

impl<S> Clone for StateView<S> {
    fn clone(&self) -> Self {
        Self {
            snapshots: Rc::clone(&self.snapshots),
        }
    }
}
