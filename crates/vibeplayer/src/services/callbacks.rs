//! Callback registry shared by the main-thread services.
//!
//! Services hand out a [`CallbackId`] per connected listener; widgets
//! store the id and disconnect in their `Drop`. Everything here is
//! single-threaded (GTK main thread), hence `Rc` and `RefCell`.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Identifies one connected callback, for later disconnection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CallbackId(u64);

/// A list of listeners for one kind of notification.
pub struct Callbacks<T> {
    next_id: Cell<u64>,
    entries: RefCell<Vec<(CallbackId, Rc<dyn Fn(&T)>)>>,
}

impl<T> Callbacks<T> {
    pub fn new() -> Self {
        Self {
            next_id: Cell::new(1),
            entries: RefCell::new(Vec::new()),
        }
    }

    /// Register a callback, returning its id.
    pub fn connect(&self, callback: impl Fn(&T) + 'static) -> CallbackId {
        let id = CallbackId(self.next_id.get());
        self.next_id.set(self.next_id.get() + 1);
        self.entries.borrow_mut().push((id, Rc::new(callback)));
        id
    }

    /// Remove a callback. Returns false when the id was already gone,
    /// which is fine to ignore during teardown.
    pub fn disconnect(&self, id: CallbackId) -> bool {
        let mut entries = self.entries.borrow_mut();
        let before = entries.len();
        entries.retain(|(entry_id, _)| *entry_id != id);
        entries.len() != before
    }

    /// Invoke every connected callback with `value`.
    ///
    /// The list is snapshotted first so a callback may connect or
    /// disconnect listeners without holding the borrow.
    pub fn emit(&self, value: &T) {
        let snapshot: Vec<Rc<dyn Fn(&T)>> = self
            .entries
            .borrow()
            .iter()
            .map(|(_, cb)| cb.clone())
            .collect();
        for callback in snapshot {
            callback(value);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl<T> Default for Callbacks<T> {
    fn default() -> Self {
        Self::new()
    }
}
