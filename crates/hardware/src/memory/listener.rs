//! Memory Change Notification.
//!
//! Observers (a memory editor, a waveform viewer, a test recorder) register a handle with
//! the store and are called synchronously after every word read or write. The set is an
//! ordered list: notification follows registration order, the same handle may be added
//! more than once, and removal drops every registration of that identity.

use std::fmt;
use std::rc::Rc;

use tracing::warn;

use super::Word;
use crate::common::MemoryError;

/// Observer of word-level memory traffic.
///
/// Calls happen on the simulation thread in the middle of an evaluation step, so
/// implementations must not re-enter the store that is notifying them.
pub trait MemoryListener {
    /// Called after `addr` changed from `old` to `new`.
    fn on_write(&self, addr: usize, old: Word, new: Word);

    /// Called after `addr` was read and produced `value`.
    fn on_read(&self, addr: usize, value: Word);
}

/// Shared handle to a registered listener. Identity is the allocation it points to.
pub type ListenerHandle = Rc<dyn MemoryListener>;

/// Returns true if both handles point at the same listener.
fn same_listener(a: &ListenerHandle, b: &ListenerHandle) -> bool {
    std::ptr::addr_eq(Rc::as_ptr(a), Rc::as_ptr(b))
}

/// Ordered, duplicate-tolerant collection of listeners.
#[derive(Default, Clone)]
pub struct ListenerSet {
    listeners: Vec<ListenerHandle>,
}

impl ListenerSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a listener. Adding the same handle twice notifies it twice.
    pub fn add(&mut self, listener: ListenerHandle) {
        self.listeners.push(listener);
    }

    /// Removes every registration of `listener`.
    ///
    /// # Errors
    ///
    /// [`MemoryError::NoListeners`] if the set is empty and
    /// [`MemoryError::ListenerNotRegistered`] if `listener` was never added.
    pub fn remove(&mut self, listener: &ListenerHandle) -> Result<(), MemoryError> {
        if self.listeners.is_empty() {
            warn!("no memory listeners registered, cannot remove");
            return Err(MemoryError::NoListeners);
        }
        if !self.contains(listener) {
            warn!("cannot remove unregistered memory listener");
            return Err(MemoryError::ListenerNotRegistered);
        }
        self.listeners.retain(|l| !same_listener(l, listener));
        Ok(())
    }

    /// True if `listener` is registered at least once.
    pub fn contains(&self, listener: &ListenerHandle) -> bool {
        self.listeners.iter().any(|l| same_listener(l, listener))
    }

    /// Number of registrations, counting duplicates.
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    /// True if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// Notifies every listener of a write.
    pub fn notify_write(&self, addr: usize, old: Word, new: Word) {
        for l in &self.listeners {
            l.on_write(addr, old, new);
        }
    }

    /// Notifies every listener of a read.
    pub fn notify_read(&self, addr: usize, value: Word) {
        for l in &self.listeners {
            l.on_read(addr, value);
        }
    }
}

impl fmt::Debug for ListenerSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerSet")
            .field("len", &self.listeners.len())
            .finish()
    }
}
